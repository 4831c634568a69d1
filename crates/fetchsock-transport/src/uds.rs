use std::os::unix::fs::{FileTypeExt, MetadataExt, PermissionsExt};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};

use socket2::{Domain, SockAddr, Socket, Type};
use tracing::{debug, info};

use crate::endpoint::Endpoint;
use crate::error::{Result, TransportError};

/// Default permission mode for created socket paths.
pub const DEFAULT_SOCKET_MODE: u32 = 0o600;

/// Maximum socket path length.
/// Unix `sockaddr_un.sun_path` is typically 108 bytes on Linux, 104 on macOS.
#[cfg(target_os = "linux")]
const MAX_PATH_LEN: usize = 108;
#[cfg(not(target_os = "linux"))]
const MAX_PATH_LEN: usize = 104;

pub(crate) fn check_path_len(path: &Path) -> Result<()> {
    let len = path.as_os_str().len();
    if len >= MAX_PATH_LEN {
        return Err(TransportError::PathTooLong {
            path: path.to_path_buf(),
            len,
            max: MAX_PATH_LEN,
        });
    }
    Ok(())
}

/// Listening Unix domain socket bound to a filesystem path.
///
/// The socket file is removed on [`close`](Self::close), or on drop if the
/// listener was never closed explicitly. Removal only happens while the path
/// still refers to the socket this listener created.
pub struct SocketListener {
    listener: UnixListener,
    path: PathBuf,
    created_inode: Option<(u64, u64)>,
    closed: bool,
}

impl SocketListener {
    /// Create, bind and listen on `path`.
    ///
    /// A stale socket file at `path` is removed first. A socket that still
    /// accepts connections, or any other kind of file, is left alone and the
    /// bind fails.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        Self::bind_with_mode(path, DEFAULT_SOCKET_MODE)
    }

    /// Bind and listen with an explicit socket file mode.
    pub fn bind_with_mode(path: impl AsRef<Path>, mode: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        check_path_len(&path)?;

        let bind_err = |source| TransportError::Bind {
            path: path.clone(),
            source,
        };

        // Remove stale socket if it exists, but never remove non-socket files.
        if let Ok(metadata) = std::fs::symlink_metadata(&path) {
            if metadata.file_type().is_socket() {
                if UnixStream::connect(&path).is_ok() {
                    return Err(bind_err(std::io::Error::new(
                        std::io::ErrorKind::AddrInUse,
                        "socket is in use by a live listener",
                    )));
                }
                debug!(?path, "removing stale socket");
                std::fs::remove_file(&path).map_err(bind_err)?;
            } else {
                return Err(bind_err(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "existing path is not a unix socket",
                )));
            }
        }

        let socket = Socket::new(Domain::UNIX, Type::STREAM, None).map_err(TransportError::Create)?;
        let addr = SockAddr::unix(&path).map_err(bind_err)?;
        socket.bind(&addr).map_err(bind_err)?;

        // From here on the path exists; a failure must not leave it behind.
        let listener = match Self::finish_setup(socket, &path, mode) {
            Ok(listener) => listener,
            Err(err) => {
                let _ = std::fs::remove_file(&path);
                return Err(err);
            }
        };

        let created_metadata = std::fs::symlink_metadata(&path).map_err(bind_err)?;
        let created_inode = Some((created_metadata.dev(), created_metadata.ino()));

        info!(?path, "listening on unix domain socket");

        Ok(Self {
            listener,
            path,
            created_inode,
            closed: false,
        })
    }

    fn finish_setup(socket: Socket, path: &Path, mode: u32) -> Result<UnixListener> {
        socket
            .listen(libc::SOMAXCONN)
            .map_err(|source| TransportError::Listen {
                path: path.to_path_buf(),
                source,
            })?;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(
            |source| TransportError::Bind {
                path: path.to_path_buf(),
                source,
            },
        )?;
        Ok(socket.into())
    }

    /// Accept an incoming connection (blocking).
    ///
    /// Failures are [`TransportError::Accept`], which the caller may retry.
    pub fn accept(&self) -> Result<Endpoint> {
        let (stream, _addr) = self.listener.accept().map_err(TransportError::Accept)?;
        debug!(path = ?self.path, "accepted connection");
        Ok(Endpoint::from_accepted(stream, self.path.clone()))
    }

    /// The path this socket is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop listening and remove the socket file.
    ///
    /// A path that is already gone is not an error.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        match self.owned_path_still_present() {
            Ok(true) => {
                std::fs::remove_file(&self.path).map_err(|source| TransportError::Close {
                    path: self.path.clone(),
                    source,
                })?;
                info!(path = ?self.path, "socket closed and unlinked");
            }
            Ok(false) => {
                debug!(path = ?self.path, "socket path already gone; nothing to unlink");
            }
            Err(source) => {
                return Err(TransportError::Close {
                    path: self.path.clone(),
                    source,
                })
            }
        }
        Ok(())
    }

    fn owned_path_still_present(&self) -> std::io::Result<bool> {
        let Some((expected_dev, expected_ino)) = self.created_inode else {
            return Ok(false);
        };
        let metadata = match std::fs::symlink_metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err),
        };
        if metadata.file_type().is_socket()
            && metadata.dev() == expected_dev
            && metadata.ino() == expected_ino
        {
            Ok(true)
        } else {
            debug!(path = ?self.path, "socket path identity changed; skipping cleanup");
            Ok(false)
        }
    }
}

impl Drop for SocketListener {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Ok(true) = self.owned_path_still_present() {
            debug!(path = ?self.path, "cleaning up socket file");
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

impl std::fmt::Debug for SocketListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketListener")
            .field("path", &self.path)
            .finish()
    }
}
