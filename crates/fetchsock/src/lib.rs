//! Fetch files from a local server over a Unix domain socket.
//!
//! A `fetchsock serve` process answers one request at a time: the client
//! sends a file name, the server replies with the file's lines followed by an
//! `EOF` line.
//!
//! # Crate Structure
//!
//! - [`transport`]: Unix domain socket endpoints
//! - [`frame`]: Sentinel-terminated request/response framing
//! - [`exchange`]: Client fetch, server exchange and accept loop (behind `exchange` feature)

/// Re-export transport types.
pub mod transport {
    pub use fetchsock_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use fetchsock_frame::*;
}

/// Re-export exchange types (requires `exchange` feature).
#[cfg(feature = "exchange")]
pub mod exchange {
    pub use fetchsock_exchange::*;
}
