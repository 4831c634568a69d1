use std::io::Write;

use bytes::BytesMut;
use fetchsock_transport::write_bytes;
use tracing::trace;

use crate::codec::{encode_response, FrameConfig};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Send a request (a file name) as one unframed write.
///
/// Empty names and names longer than the server's single read are refused
/// before anything is written.
pub fn write_request<W: Write + ?Sized>(
    dst: &mut W,
    name: &str,
    config: &FrameConfig,
) -> Result<()> {
    if name.is_empty() {
        return Err(FrameError::EmptyRequest);
    }
    if name.len() > config.max_request_len {
        return Err(FrameError::RequestTooLarge {
            size: name.len(),
            max: config.max_request_len,
        });
    }
    write_bytes(dst, name.as_bytes())?;
    trace!(len = name.len(), "request sent");
    Ok(())
}

/// Writes complete sentinel-terminated responses to any `Write` stream.
///
/// The whole response is encoded into memory first and handed to the stream
/// in one write; nothing partial is produced by the encoder.
pub struct ResponseWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> ResponseWriter<T> {
    /// Create a new response writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Encode `lines` plus the sentinel and send them (blocking).
    ///
    /// Returns the number of bytes written.
    pub fn send<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<usize> {
        self.buf.clear();
        encode_response(lines, &mut self.buf);
        write_bytes(&mut self.inner, &self.buf)?;
        trace!(lines = lines.len(), bytes = self.buf.len(), "response sent");
        Ok(self.buf.len())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
