use std::io::{Read, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

use socket2::{Domain, SockAddr, Socket, Type};
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::uds::check_path_len;

/// One end of a connected Unix domain stream.
///
/// Returned by [`SocketListener::accept`](crate::SocketListener::accept) on the
/// server and by [`Endpoint::connect`] on the client. Implements `Read` and
/// `Write`; use [`read_chunk`](crate::read_chunk) and
/// [`write_bytes`](crate::write_bytes) for the protocol-level semantics.
pub struct Endpoint {
    stream: UnixStream,
    address: PathBuf,
}

impl Endpoint {
    /// Connect to a listening socket at `path` (blocking, no retry).
    pub fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        check_path_len(&path)?;

        let socket = Socket::new(Domain::UNIX, Type::STREAM, None).map_err(TransportError::Create)?;
        let addr = SockAddr::unix(&path).map_err(|e| TransportError::Connect {
            path: path.clone(),
            source: e,
        })?;
        socket.connect(&addr).map_err(|e| TransportError::Connect {
            path: path.clone(),
            source: e,
        })?;

        debug!(?path, "connected to unix domain socket");
        Ok(Self {
            stream: socket.into(),
            address: path,
        })
    }

    pub(crate) fn from_accepted(stream: UnixStream, address: PathBuf) -> Self {
        Self { stream, address }
    }

    /// Address this endpoint was connected through.
    pub fn address(&self) -> &Path {
        &self.address
    }

    /// Set read timeout on the underlying stream. `None` blocks forever.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_read_timeout(timeout).map_err(Into::into)
    }

    /// Set write timeout on the underlying stream. `None` blocks forever.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_write_timeout(timeout).map_err(Into::into)
    }

    /// Release the connection.
    ///
    /// Both directions are shut down before the descriptor is dropped. A peer
    /// that already went away is not an error.
    pub fn close(self) -> Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotConnected => {}
            Err(err) => {
                return Err(TransportError::Close {
                    path: self.address.clone(),
                    source: err,
                })
            }
        }
        debug!(path = ?self.address, "endpoint closed");
        Ok(())
    }

    /// Get the credentials of the connected peer (Linux only).
    ///
    /// Returns `(uid, gid, pid)` via `SO_PEERCRED`, or `None` if unavailable.
    #[cfg(target_os = "linux")]
    pub fn peer_credentials(&self) -> Option<(u32, u32, u32)> {
        use std::os::fd::AsRawFd;

        let fd = self.stream.as_raw_fd();
        let mut cred = libc::ucred {
            pid: 0,
            uid: 0,
            gid: 0,
        };
        let mut len = std::mem::size_of::<libc::ucred>() as libc::socklen_t;

        // SAFETY: `cred` and `len` are valid writable pointers for the provided sizes,
        // and `fd` is an open Unix socket descriptor owned by this endpoint.
        let rc = unsafe {
            libc::getsockopt(
                fd,
                libc::SOL_SOCKET,
                libc::SO_PEERCRED,
                (&mut cred as *mut libc::ucred).cast::<libc::c_void>(),
                &mut len,
            )
        };

        if rc == 0 && len as usize == std::mem::size_of::<libc::ucred>() {
            Some((cred.uid, cred.gid, cred.pid as u32))
        } else {
            None
        }
    }

    /// Get the credentials of the connected peer.
    ///
    /// Returns `None` on platforms that do not expose peer credentials.
    #[cfg(not(target_os = "linux"))]
    pub fn peer_credentials(&self) -> Option<(u32, u32, u32)> {
        None
    }
}

impl Read for Endpoint {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for Endpoint {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.stream.flush()
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("address", &self.address)
            .finish()
    }
}
