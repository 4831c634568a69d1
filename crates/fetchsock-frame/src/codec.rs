use bytes::{BufMut, BytesMut};

/// Response terminator as it appears on the wire.
pub const SENTINEL: &[u8; 4] = b"EOF\n";

/// The terminator as a line, without its separator.
pub const SENTINEL_LINE: &str = "EOF";

/// Line separator used by the response format.
pub const LINE_SEPARATOR: u8 = b'\n';

/// Size of each read from the endpoint.
pub const CHUNK_SIZE: usize = 1024;

/// Largest request the server takes in its single read.
pub const MAX_REQUEST_LEN: usize = CHUNK_SIZE - 1;

/// Default cap on an accumulated response: 16 MiB.
pub const DEFAULT_MAX_RESPONSE: usize = 16 * 1024 * 1024;

/// Encode content lines into the response wire format.
///
/// Wire format:
/// ```text
/// line-1 \n line-2 \n ... line-N \n E O F \n
/// ```
/// No line may contain `\n`; a line equal to `EOF` ends the response early
/// on the receiving side.
pub fn encode_response<S: AsRef<str>>(lines: &[S], dst: &mut BytesMut) {
    let body: usize = lines.iter().map(|l| l.as_ref().len() + 1).sum();
    dst.reserve(body + SENTINEL.len());
    for line in lines {
        dst.put_slice(line.as_ref().as_bytes());
        dst.put_u8(LINE_SEPARATOR);
    }
    dst.put_slice(SENTINEL);
}

/// Find the first `EOF\n` at or after `from`.
///
/// This is a raw byte search, not a line match: `xEOF\n` also counts.
pub fn find_sentinel(buf: &[u8], from: usize) -> Option<usize> {
    if from >= buf.len() {
        return None;
    }
    buf[from..]
        .windows(SENTINEL.len())
        .position(|window| window == SENTINEL)
        .map(|pos| pos + from)
}

fn is_separator(byte: &u8) -> bool {
    *byte == LINE_SEPARATOR
}

/// Split a buffer into lines on `\n`.
///
/// A trailing separator does not open an extra empty line, and an empty
/// buffer has no lines. `\r` is kept.
pub fn split_lines(buf: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = buf.strip_suffix(&[LINE_SEPARATOR]).unwrap_or(buf);
    let lines = (!buf.is_empty()).then(|| body.split(is_separator));
    lines.into_iter().flatten()
}

/// Rebuild content lines from an accumulated response buffer.
///
/// Lines are copied until one equals [`SENTINEL_LINE`]; it and everything
/// after it are dropped. Invalid UTF-8 is replaced, not rejected.
pub fn deframe_response(buf: &[u8]) -> Vec<String> {
    split_lines(buf)
        .take_while(|line| *line != SENTINEL_LINE.as_bytes())
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect()
}

/// Buffer sizing for the framing layer.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Bytes requested per read. Default: 1024.
    pub chunk_size: usize,
    /// Largest request accepted in one read. Default: 1023.
    pub max_request_len: usize,
    /// Cap on the accumulated response before the sentinel. Default: 16 MiB.
    pub max_response_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            max_request_len: MAX_REQUEST_LEN,
            max_response_size: DEFAULT_MAX_RESPONSE,
        }
    }
}
