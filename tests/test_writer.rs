use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use docroot::http::writer::{send_all, SendError};
use tokio::io::AsyncWrite;

/// Accepts at most `max_per_write` bytes per call, optionally failing or
/// stalling after `limit` total bytes.
struct ShortWriter {
    max_per_write: usize,
    limit: Option<usize>,
    fail_at_limit: bool,
    interrupt_next: bool,
    written: Vec<u8>,
    calls: usize,
}

impl ShortWriter {
    fn new(max_per_write: usize) -> Self {
        Self {
            max_per_write,
            limit: None,
            fail_at_limit: false,
            interrupt_next: false,
            written: Vec::new(),
            calls: 0,
        }
    }
}

impl AsyncWrite for ShortWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.calls += 1;

        if self.interrupt_next {
            self.interrupt_next = false;
            return Poll::Ready(Err(io::ErrorKind::Interrupted.into()));
        }

        let mut n = buf.len().min(self.max_per_write);
        if let Some(limit) = self.limit {
            let room = limit.saturating_sub(self.written.len());
            if room == 0 && self.fail_at_limit {
                return Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()));
            }
            n = n.min(room);
        }

        self.written.extend_from_slice(&buf[..n]);
        Poll::Ready(Ok(n))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

fn data(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[tokio::test]
async fn test_short_writes_deliver_everything() {
    for (k, n) in [(1, 17), (7, 100), (64, 65), (1000, 10_000)] {
        let mut writer = ShortWriter::new(k);
        let buf = data(n);

        send_all(&mut writer, &buf).await.unwrap();

        assert_eq!(writer.written, buf);
        assert_eq!(writer.calls, n.div_ceil(k));
    }
}

#[tokio::test]
async fn test_empty_buffer_writes_nothing() {
    let mut writer = ShortWriter::new(4);
    send_all(&mut writer, &[]).await.unwrap();

    assert_eq!(writer.calls, 0);
    assert!(writer.written.is_empty());
}

#[tokio::test]
async fn test_interrupted_write_is_retried() {
    let mut writer = ShortWriter::new(3);
    writer.interrupt_next = true;
    let buf = data(10);

    send_all(&mut writer, &buf).await.unwrap();

    assert_eq!(writer.written, buf);
}

#[tokio::test]
async fn test_zero_length_write_is_an_error() {
    let mut writer = ShortWriter::new(4);
    writer.limit = Some(10);

    let err = send_all(&mut writer, &data(25)).await.unwrap_err();

    assert!(matches!(
        err,
        SendError::Closed {
            written: 10,
            total: 25
        }
    ));
}

#[tokio::test]
async fn test_io_error_is_propagated() {
    let mut writer = ShortWriter::new(4);
    writer.limit = Some(8);
    writer.fail_at_limit = true;

    let err = send_all(&mut writer, &data(20)).await.unwrap_err();

    match err {
        SendError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected Io error, got {:?}", other),
    }
    assert_eq!(writer.written.len(), 8);
}
