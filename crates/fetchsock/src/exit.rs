use std::fmt;
use std::io;

use fetchsock_exchange::ExchangeError;
use fetchsock_frame::FrameError;
use fetchsock_transport::TransportError;

pub const SUCCESS: i32 = 0;
/// Generic failure, including "the server had no content for that name".
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

fn io_code(err: &io::Error) -> Option<i32> {
    match err.kind() {
        io::ErrorKind::PermissionDenied => Some(PERMISSION_DENIED),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Some(TIMEOUT),
        _ => None,
    }
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    let code = err.io_source().and_then(io_code).unwrap_or(TRANSPORT_ERROR);
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Transport(err) => transport_error(context, err),
        FrameError::EmptyRequest | FrameError::RequestTooLarge { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        FrameError::InvalidRequest(_) | FrameError::ResponseTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn exchange_error(context: &str, err: ExchangeError) -> CliError {
    match err {
        ExchangeError::Transport(err) => transport_error(context, err),
        ExchangeError::Frame(err) => frame_error(context, err),
    }
}
