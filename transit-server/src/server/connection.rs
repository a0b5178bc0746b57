//! One client connection: read a request line, write one response line.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::planner::Planner;

use super::dto::Response;
use super::protocol::{ProtocolError, Request};
use super::state::ServerState;

/// Longest request line accepted, excluding the newline.
pub const MAX_LINE_BYTES: usize = 4096;

/// One line read from the client.
enum Line {
    Request(Vec<u8>),
    TooLong,
    Closed,
}

/// Serve requests until the client disconnects.
///
/// Returns the number of requests answered. A final line without a newline
/// is treated as a disconnect and gets no response. Lines longer than
/// [`MAX_LINE_BYTES`] or not valid UTF-8 get a protocol error.
pub async fn serve_connection<R, W>(
    mut reader: R,
    mut writer: W,
    state: &ServerState,
) -> io::Result<u64>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut answered = 0;

    loop {
        let response = match read_request(&mut reader, &mut buf).await? {
            Line::Closed => break,
            Line::TooLong => ProtocolError::LineTooLong {
                limit: MAX_LINE_BYTES,
            }
            .into(),
            Line::Request(bytes) => match std::str::from_utf8(&bytes) {
                Ok(request) => handle_line(state, request),
                Err(_) => {
                    debug!(bytes = bytes.len(), "request is not UTF-8");
                    ProtocolError::InvalidEncoding.into()
                }
            },
        };

        let mut encoded = serde_json::to_string(&response).map_err(io::Error::other)?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
        answered += 1;
    }

    Ok(answered)
}

/// Read one newline-terminated line, without the newline.
///
/// At most `MAX_LINE_BYTES + 1` bytes are buffered. The rest of an
/// over-long line is read and dropped.
async fn read_request<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Line>
where
    R: AsyncBufRead + Unpin,
{
    const LIMIT: u64 = MAX_LINE_BYTES as u64 + 1;

    buf.clear();
    (&mut *reader).take(LIMIT).read_until(b'\n', buf).await?;
    if buf.pop() == Some(b'\n') {
        return Ok(Line::Request(std::mem::take(buf)));
    }
    if buf.len() < MAX_LINE_BYTES {
        debug!(bytes = buf.len(), "unterminated request, closing");
        return Ok(Line::Closed);
    }

    loop {
        buf.clear();
        if (&mut *reader).take(LIMIT).read_until(b'\n', buf).await? == 0 {
            return Ok(Line::Closed);
        }
        if buf.ends_with(b"\n") {
            debug!("over-long request dropped");
            return Ok(Line::TooLong);
        }
    }
}

/// Answer one request line against the current plan.
pub fn handle_line(state: &ServerState, line: &str) -> Response {
    let request = match Request::parse(line) {
        Ok(request) => request,
        Err(err) => {
            debug!(error = %err, "rejected request");
            return err.into();
        }
    };
    debug!(command = request.command(), "request");

    match request {
        Request::Route(request) => {
            let plan = state.plan.current();
            match Planner::new(&plan, &state.search).find_path(&request) {
                Ok(route) => Response::route(&route),
                Err(err) => err.into(),
            }
        }
        Request::Journey(request) => {
            let plan = state.plan.current();
            match Planner::new(&plan, &state.search).search(&request) {
                Ok(itinerary) => Response::journey(&itinerary),
                Err(err) => err.into(),
            }
        }
        Request::Search(_) => Response::not_implemented("SEARCH"),
    }
}
