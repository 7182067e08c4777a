use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use bytes::BytesMut;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::http::mime::content_type;
use crate::http::parser::{find_line_end, parse_request_line};
use crate::http::path::{resolve, ResolvedPath};
use crate::http::request::Request;
use crate::http::response::ResponseHead;
use crate::http::writer::send_all;

/// Longest request line accepted before the connection is dropped.
pub const MAX_REQUEST_LINE: usize = 8192;

/// Most request bytes discarded after the response before giving up.
pub const LINGER_LIMIT: usize = 256 * 1024;

/// How long to wait for the client to finish sending after the response.
pub const LINGER_TIMEOUT: Duration = Duration::from_secs(2);

/// Serves exactly one request on a stream, then closes it.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    site: Arc<SiteConfig>,
    state: ConnectionState,
}

pub enum ConnectionState {
    ReadingRequestLine,
    Parsing(BytesMut),
    Resolving(Request),
    OpeningFile {
        resolved: ResolvedPath,
        content_type: &'static str,
    },
    SendingHead {
        head: ResponseHead,
        body: Option<FileBody>,
    },
    SendingBody(FileBody),
    Closed,
}

/// An open file and the length captured before anything was sent.
pub struct FileBody {
    file: File,
    len: u64,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, site: Arc<SiteConfig>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(1024),
            site,
            state: ConnectionState::ReadingRequestLine,
        }
    }

    /// Drives the connection to `Closed`.
    ///
    /// The file handle (if any) is released before the stream is shut down,
    /// whatever the outcome. Requests that end without a response (empty,
    /// malformed) are not errors.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        // `drive` owns the file while it works, so it is already dropped here
        self.linger().await;

        result
    }

    /// Half-closes the stream, then discards client input until end of
    /// stream, [`LINGER_LIMIT`] or [`LINGER_TIMEOUT`].
    ///
    /// Closing a TCP socket with unread input resets the connection, and the
    /// client loses whatever part of the response it has not read yet.
    async fn linger(&mut self) {
        if self.stream.shutdown().await.is_err() {
            return;
        }

        let mut discarded = self.buffer.len();
        self.buffer.clear();

        let drain = async {
            while discarded < LINGER_LIMIT {
                match self.stream.read_buf(&mut self.buffer).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        discarded += n;
                        self.buffer.clear();
                    }
                }
            }
        };

        if timeout(LINGER_TIMEOUT, drain).await.is_err() {
            debug!("Client kept sending after the response");
        }
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::ReadingRequestLine => {
                    if let Some(line) = self.read_request_line().await? {
                        self.state = ConnectionState::Parsing(line);
                    }
                }

                ConnectionState::Parsing(line) => match parse_request_line(&line) {
                    Ok(request) => self.state = ConnectionState::Resolving(request),
                    Err(e) => debug!(error = %e, "Dropping malformed request"),
                },

                ConnectionState::Resolving(request) => {
                    debug!(
                        method = %request.method,
                        uri = %request.target,
                        version = %request.version,
                        "Request received"
                    );

                    match resolve(
                        &self.site.web_root,
                        &request.target,
                        &self.site.default_document,
                    ) {
                        Ok(resolved) => {
                            let content_type = content_type(&resolved.target);
                            self.state = ConnectionState::OpeningFile {
                                resolved,
                                content_type,
                            };
                        }
                        Err(e) => {
                            debug!(error = %e, "Refusing target");
                            self.state = ConnectionState::SendingHead {
                                head: ResponseHead::not_found(content_type(&request.target)),
                                body: None,
                            };
                        }
                    }
                }

                ConnectionState::OpeningFile {
                    resolved,
                    content_type,
                } => {
                    let (head, body) = match open_file(&resolved.absolute_path).await {
                        Ok(body) => (ResponseHead::ok(content_type), Some(body)),
                        Err(e) => {
                            debug!(path = %resolved.absolute_path.display(), error = %e, "Cannot open file");
                            (ResponseHead::not_found(content_type), None)
                        }
                    };

                    info!(
                        uri = %resolved.target,
                        status = head.status.as_u16(),
                        bytes = body.as_ref().map_or(0, FileBody::len),
                        "Serving request"
                    );

                    self.state = ConnectionState::SendingHead { head, body };
                }

                ConnectionState::SendingHead { head, body } => {
                    send_all(&mut self.stream, &head.to_bytes())
                        .await
                        .context("sending response head")?;

                    if let Some(body) = body {
                        self.state = ConnectionState::SendingBody(body);
                    } else {
                        self.stream.flush().await?;
                    }
                }

                ConnectionState::SendingBody(body) => {
                    self.send_body(body).await?;
                    self.stream.flush().await?;
                }

                ConnectionState::Closed => break,
            }
        }

        Ok(())
    }

    /// Reads up to and including the first line terminator.
    ///
    /// Returns `None` when the client sent nothing or the line outgrew
    /// [`MAX_REQUEST_LINE`]. Bytes left unterminated at end of stream count
    /// as a line.
    async fn read_request_line(&mut self) -> anyhow::Result<Option<BytesMut>> {
        loop {
            if let Some(end) = find_line_end(&self.buffer) {
                if end > MAX_REQUEST_LINE {
                    debug!(length = end, "Request line too long");
                    return Ok(None);
                }
                return Ok(Some(self.buffer.split_to(end)));
            }

            if self.buffer.len() >= MAX_REQUEST_LINE {
                debug!(buffered = self.buffer.len(), "Request line too long");
                return Ok(None);
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                if self.buffer.is_empty() {
                    debug!("Client closed connection before sending a request");
                    return Ok(None);
                }
                return Ok(Some(self.buffer.split()));
            }
        }
    }

    /// Streams exactly `body.len` bytes in chunks of at most `chunk_size`.
    async fn send_body(&mut self, mut body: FileBody) -> anyhow::Result<()> {
        let chunk_len = body.len.min(self.site.chunk_size as u64) as usize;
        let mut chunk = vec![0u8; chunk_len];
        let mut remaining = body.len;

        while remaining > 0 {
            let want = remaining.min(chunk_len as u64) as usize;
            let n = body.file.read(&mut chunk[..want]).await?;

            if n == 0 {
                anyhow::bail!(
                    "file ended after {} of {} bytes",
                    body.len - remaining,
                    body.len
                );
            }

            send_all(&mut self.stream, &chunk[..n])
                .await
                .context("sending response body")?;

            remaining -= n as u64;
        }

        Ok(())
    }
}

impl FileBody {
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Opens a regular file for reading and captures its length.
async fn open_file(path: &Path) -> io::Result<FileBody> {
    let file = File::open(path).await?;
    let meta = file.metadata().await?;

    if !meta.is_file() {
        return Err(io::Error::other("not a regular file"));
    }

    Ok(FileBody {
        file,
        len: meta.len(),
    })
}
