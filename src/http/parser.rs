use crate::http::request::Request;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("request line is not valid UTF-8")]
    InvalidEncoding,
    #[error("request line is empty")]
    EmptyLine,
    #[error("request line has no target")]
    MissingTarget,
    #[error("request line has no version")]
    MissingVersion,
    #[error("unexpected token after version: {0:?}")]
    UnexpectedToken(String),
}

/// Parses one `<METHOD> <TARGET> <VERSION>` line.
///
/// A single trailing `\r\n` or `\n` is accepted and stripped.
pub fn parse_request_line(line: &[u8]) -> Result<Request, ParseError> {
    let line = strip_line_ending(line);
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidEncoding)?;

    let mut parts = line.split_whitespace();

    let method = parts.next().ok_or(ParseError::EmptyLine)?;
    let target = parts.next().ok_or(ParseError::MissingTarget)?;
    let version = parts.next().ok_or(ParseError::MissingVersion)?;

    if let Some(extra) = parts.next() {
        return Err(ParseError::UnexpectedToken(extra.to_string()));
    }

    Ok(Request::new(method, target, version))
}

/// Returns the length of the first line in `buf`, terminator included.
pub fn find_line_end(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n').map(|pos| pos + 1)
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
