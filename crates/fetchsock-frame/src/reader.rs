use std::io::Read;

use bytes::BytesMut;
use fetchsock_transport::read_chunk;
use tracing::trace;

use crate::codec::{deframe_response, find_sentinel, FrameConfig, SENTINEL};
use crate::error::{FrameError, Result};

/// Read a request (a file name) with a single read.
///
/// The request has no framing of its own: whatever arrives in the first read
/// of up to `max_request_len` bytes is the whole name.
pub fn read_request<R: Read + ?Sized>(src: &mut R, config: &FrameConfig) -> Result<String> {
    let mut buf = vec![0u8; config.max_request_len.max(1)];
    let read = read_chunk(src, &mut buf)?;
    let name = std::str::from_utf8(&buf[..read])?;
    trace!(len = read, "request received");
    Ok(name.to_owned())
}

/// Reads one sentinel-terminated response from any `Read` stream.
///
/// Chunks are accumulated until `EOF\n` shows up anywhere in the buffer. A
/// failed or closed read before that point fails the whole response; nothing
/// partial is ever returned.
pub struct ResponseReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read> ResponseReader<T> {
    /// Create a new response reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new response reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(config.chunk_size),
            config,
        }
    }

    /// Read until the sentinel and return the content lines (blocking).
    pub fn read_response(&mut self) -> Result<Vec<String>> {
        self.buf.clear();
        let result = self.accumulate();
        let lines = result.map(|()| deframe_response(&self.buf));
        self.buf.clear();
        lines
    }

    fn accumulate(&mut self) -> Result<()> {
        let mut chunk = vec![0u8; self.config.chunk_size.max(1)];
        let mut scanned = 0usize;

        loop {
            if find_sentinel(&self.buf, scanned).is_some() {
                return Ok(());
            }
            // A sentinel may straddle two chunks.
            scanned = self.buf.len().saturating_sub(SENTINEL.len() - 1);

            let read = read_chunk(&mut self.inner, &mut chunk)?;
            self.buf.extend_from_slice(&chunk[..read]);
            trace!(read, total = self.buf.len(), "response chunk");

            if self.buf.len() > self.config.max_response_size {
                return Err(FrameError::ResponseTooLarge {
                    size: self.buf.len(),
                    max: self.config.max_response_size,
                });
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
