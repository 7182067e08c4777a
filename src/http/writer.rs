use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("peer stopped accepting data after {written} of {total} bytes")]
    Closed { written: usize, total: usize },
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// Writes every byte of `buf`, retrying short writes from the advanced offset.
///
/// Returns only once the whole buffer has been accepted by `stream` or a
/// hard error occurred. A write that accepts zero bytes is treated as the
/// peer going away.
pub async fn send_all<W>(stream: &mut W, buf: &[u8]) -> Result<(), SendError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut written = 0;

    while written < buf.len() {
        let n = match stream.write(&buf[written..]).await {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        if n == 0 {
            return Err(SendError::Closed {
                written,
                total: buf.len(),
            });
        }

        written += n;
    }

    Ok(())
}
