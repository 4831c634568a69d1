use fetchsock_frame::FrameError;
use fetchsock_transport::TransportError;

/// Errors that can end an exchange.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// Endpoint-level failure (connect, read, write, close, ...).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Framing failure (bad request, oversized response, ...).
    #[error(transparent)]
    Frame(FrameError),
}

impl From<FrameError> for ExchangeError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Transport(err) => ExchangeError::Transport(err),
            other => ExchangeError::Frame(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_transport_errors_are_flattened() {
        let err: ExchangeError = FrameError::Transport(TransportError::Read(
            std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
        ))
        .into();
        assert!(matches!(err, ExchangeError::Transport(TransportError::Read(_))));
    }

    #[test]
    fn other_frame_errors_stay_frame_errors() {
        let err: ExchangeError = FrameError::EmptyRequest.into();
        assert!(matches!(err, ExchangeError::Frame(FrameError::EmptyRequest)));
    }
}
