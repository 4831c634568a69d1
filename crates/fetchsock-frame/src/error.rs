/// Errors that can occur while framing requests and responses.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The underlying endpoint failed to read or write.
    #[error(transparent)]
    Transport(#[from] fetchsock_transport::TransportError),

    /// The request payload is not valid UTF-8.
    #[error("request is not valid UTF-8: {0}")]
    InvalidRequest(#[from] std::str::Utf8Error),

    /// A request must name something.
    #[error("request is empty")]
    EmptyRequest,

    /// The request does not fit in the server's single read.
    #[error("request too large ({size} bytes, max {max})")]
    RequestTooLarge { size: usize, max: usize },

    /// The response grew past the configured maximum before the sentinel.
    #[error("response too large ({size} bytes, max {max})")]
    ResponseTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
