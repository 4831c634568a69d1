use std::path::PathBuf;

/// Errors that can occur on a fetchsock endpoint.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The OS refused to allocate a new socket.
    #[error("failed to create socket: {0}")]
    Create(std::io::Error),

    /// Failed to bind to the specified address.
    #[error("failed to bind to {path}: {source}")]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to mark the bound socket as listening.
    #[error("failed to listen on {path}: {source}")]
    Listen {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to connect to the specified address.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to accept an incoming connection. Recoverable.
    #[error("failed to accept connection: {0}")]
    Accept(std::io::Error),

    /// A read failed or the peer closed the stream.
    #[error("failed to read from peer: {0}")]
    Read(std::io::Error),

    /// A write failed.
    #[error("failed to write to peer: {0}")]
    Write(std::io::Error),

    /// Releasing the endpoint or its address failed.
    #[error("failed to close {path}: {source}")]
    Close {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The socket path is too long for the platform.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// Any other I/O error on the endpoint.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Whether the accept loop may simply retry after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TransportError::Accept(_))
    }

    /// The underlying OS error, if there is one.
    pub fn io_source(&self) -> Option<&std::io::Error> {
        match self {
            TransportError::Create(source)
            | TransportError::Accept(source)
            | TransportError::Read(source)
            | TransportError::Write(source)
            | TransportError::Io(source)
            | TransportError::Bind { source, .. }
            | TransportError::Listen { source, .. }
            | TransportError::Connect { source, .. }
            | TransportError::Close { source, .. } => Some(source),
            TransportError::PathTooLong { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_accept_failures_are_recoverable() {
        let accept = TransportError::Accept(std::io::Error::from(std::io::ErrorKind::Interrupted));
        assert!(accept.is_recoverable());

        let read = TransportError::Read(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
        assert!(!read.is_recoverable());
    }

    #[test]
    fn io_source_exposes_kind() {
        let err = TransportError::Connect {
            path: PathBuf::from("/tmp/missing.sock"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(
            err.io_source().map(std::io::Error::kind),
            Some(std::io::ErrorKind::PermissionDenied)
        );

        let err = TransportError::PathTooLong {
            path: PathBuf::from("/tmp/x"),
            len: 200,
            max: 108,
        };
        assert!(err.io_source().is_none());
    }
}
