use log::{error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::auth::CredentialVerifier;
use crate::client::Session;
use crate::config::ServerConfig;
use crate::error::ProtocolError;
use crate::protocol::responses::{READY, format_response};
use crate::protocol::{CommandStatus, error_result, handle_command, parse_command};

/// Outcome of reading one request line.
#[derive(Debug, PartialEq)]
pub enum RequestLine {
    /// A complete line is in the buffer.
    Line,
    /// The line exceeded the limit and was discarded.
    TooLong,
    /// The client closed the connection.
    Eof,
}

/// Reads one request line of at most `limit` bytes into `buf`.
///
/// At most `limit + 1` bytes are buffered. The remainder of an oversized
/// line is consumed and dropped, up to and including its newline.
pub async fn read_request<R>(reader: &mut R, buf: &mut Vec<u8>, limit: usize) -> io::Result<RequestLine>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let n = (&mut *reader)
        .take(limit as u64 + 1)
        .read_until(b'\n', buf)
        .await?;

    if n == 0 {
        return Ok(RequestLine::Eof);
    }

    if buf.len() <= limit {
        return Ok(RequestLine::Line);
    }

    if buf.last() != Some(&b'\n') {
        discard_line(reader).await?;
    }
    buf.clear();
    Ok(RequestLine::TooLong)
}

async fn discard_line<R>(reader: &mut R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let (consumed, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(pos) => (pos + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(consumed);
        if done {
            return Ok(());
        }
    }
}

/// Handles one client connection using the Tokio async runtime.
///
/// - Sends the greeting, then reads bounded request lines with a `BufReader`.
/// - Dispatches each request with `handle_command` and writes the reply.
/// - Returns when the client quits, disconnects, or the socket fails.
pub async fn handle_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    verifier: Arc<CredentialVerifier>,
    config: Arc<ServerConfig>,
) -> io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();
    let mut session = Session::new(client_addr);

    write_half
        .write_all(format_response(READY, "Credential verification service ready").as_bytes())
        .await?;
    write_half.flush().await?;

    loop {
        let request = match read_request(&mut reader, &mut buf, config.max_request_length).await {
            Ok(request) => request,
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                return Err(e);
            }
        };

        let result = match request {
            RequestLine::Eof => {
                // Client closed the connection
                info!("Connection closed by client {}", client_addr);
                return Ok(());
            }
            RequestLine::TooLong => {
                warn!("Oversized request from {} discarded", client_addr);
                error_result(ProtocolError::RequestTooLong(config.max_request_length).into())
            }
            RequestLine::Line => {
                // Invalid UTF-8 becomes U+FFFD and simply fails to match.
                let line = String::from_utf8_lossy(&buf);
                match parse_command(&line) {
                    Ok(command) => {
                        info!("Received from {}: {:?}", client_addr, command);
                        handle_command(&mut session, &command, &verifier, &config)
                    }
                    Err(e) => error_result(e.into()),
                }
            }
        };

        if let Some(msg) = &result.message {
            info!("Sending response to client {}: {}", client_addr, msg.trim_end());
            write_half.write_all(msg.as_bytes()).await?;
            write_half.flush().await?;
        }

        if result.status == CommandStatus::CloseConnection {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_request_lines() {
        let mut reader = BufReader::new(&b"NOOP\r\nQUIT"[..]);
        let mut buf = Vec::new();

        assert_eq!(read_request(&mut reader, &mut buf, 16).await.unwrap(), RequestLine::Line);
        assert_eq!(buf, b"NOOP\r\n");

        assert_eq!(read_request(&mut reader, &mut buf, 16).await.unwrap(), RequestLine::Line);
        assert_eq!(buf, b"QUIT");

        assert_eq!(read_request(&mut reader, &mut buf, 16).await.unwrap(), RequestLine::Eof);
    }

    #[tokio::test]
    async fn test_oversized_line_is_discarded_without_buffering() {
        let mut input = vec![b'x'; 100_000];
        input.extend_from_slice(b"\r\nNOOP\r\n");
        let mut reader = BufReader::new(&input[..]);
        let mut buf = Vec::new();

        assert_eq!(read_request(&mut reader, &mut buf, 64).await.unwrap(), RequestLine::TooLong);
        assert!(buf.capacity() <= 1024);

        assert_eq!(read_request(&mut reader, &mut buf, 64).await.unwrap(), RequestLine::Line);
        assert_eq!(buf, b"NOOP\r\n");
    }

    #[tokio::test]
    async fn test_oversized_line_without_terminator() {
        let input = vec![b'x'; 10_000];
        let mut reader = BufReader::new(&input[..]);
        let mut buf = Vec::new();

        assert_eq!(read_request(&mut reader, &mut buf, 64).await.unwrap(), RequestLine::TooLong);
        assert_eq!(read_request(&mut reader, &mut buf, 64).await.unwrap(), RequestLine::Eof);
    }

    #[tokio::test]
    async fn test_line_at_limit_is_accepted() {
        let mut reader = BufReader::new(&b"AUTH a b\r\n"[..]);
        let mut buf = Vec::new();

        assert_eq!(read_request(&mut reader, &mut buf, 10).await.unwrap(), RequestLine::Line);
    }
}
