use crate::dispatch::dispatcher::Dispatcher;
use crate::dispatch::types::DispatchError;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Marks the end of a request. Anything from here on is ignored.
pub const SENTINEL: &[u8] = b"end";

/// Requests larger than this are rejected before the sentinel is found.
pub const MAX_REQUEST_BYTES: usize = 1 << 20;

const READ_CHUNK: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),

    #[error("peer closed the connection before the end marker")]
    Truncated,

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Read until the sentinel and return the request lines, with carriage
/// returns removed.
pub async fn read_request<R>(reader: &mut R) -> Result<Vec<String>, ConnectionError>
where
    R: AsyncRead + Unpin,
{
    let mut data: Vec<u8> = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    let end = loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(ConnectionError::Truncated);
        }

        // Re-scan the tail of the previous chunk in case the marker straddles reads.
        let scan_from = data.len().saturating_sub(SENTINEL.len() - 1);
        data.extend_from_slice(&chunk[..n]);

        if let Some(offset) = data[scan_from..]
            .windows(SENTINEL.len())
            .position(|w| w == SENTINEL)
        {
            break scan_from + offset;
        }

        if data.len() > MAX_REQUEST_BYTES {
            return Err(DispatchError::BadRequest(format!(
                "request exceeds {} bytes",
                MAX_REQUEST_BYTES
            ))
            .into());
        }
    };

    data.truncate(end);
    data.retain(|&b| b != b'\r');
    let text = String::from_utf8(data)
        .map_err(|_| DispatchError::BadRequest("request is not valid UTF-8".to_string()))?;

    Ok(text.lines().map(str::to_string).collect())
}

/// Serve one request on `stream`: read it, dispatch it, write the reply
/// followed by a newline. On any error nothing is written; dropping the
/// stream closes the connection.
pub async fn handle_connection<S>(stream: &mut S, dispatcher: &Dispatcher) -> Result<(), ConnectionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let lines = read_request(stream).await?;
    tracing::debug!("Received request with {} lines", lines.len());

    let reply = dispatcher.handle(&lines).await?;

    let mut payload = reply.into_bytes();
    payload.push(b'\n');
    stream.write_all(&payload).await?;
    stream.flush().await?;
    stream.shutdown().await?;
    Ok(())
}
