//! Blocking chunk read / full write over any byte stream.
//!
//! These are the only two primitives the protocol layer uses to move bytes.
//! They are generic so the layers above can be exercised against in-memory
//! readers and writers as well as real [`Endpoint`](crate::Endpoint)s.

use std::io::{ErrorKind, Read, Write};

use crate::error::{Result, TransportError};

/// Read up to `buf.len()` bytes (blocking).
///
/// A zero-length read means the peer closed the stream and is reported as
/// [`TransportError::Read`] with [`ErrorKind::UnexpectedEof`]; it is never
/// silently retried. Interrupted reads are retried.
pub fn read_chunk<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> Result<usize> {
    if buf.is_empty() {
        return Err(TransportError::Read(std::io::Error::new(
            ErrorKind::InvalidInput,
            "read buffer must not be empty",
        )));
    }

    loop {
        match src.read(buf) {
            Ok(0) => {
                return Err(TransportError::Read(std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "peer closed the connection",
                )))
            }
            Ok(n) => return Ok(n),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Read(err)),
        }
    }
}

/// Write the whole buffer (blocking) and flush.
pub fn write_bytes<W: Write + ?Sized>(dst: &mut W, bytes: &[u8]) -> Result<()> {
    dst.write_all(bytes).map_err(TransportError::Write)?;
    dst.flush().map_err(TransportError::Write)
}
