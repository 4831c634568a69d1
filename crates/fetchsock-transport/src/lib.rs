//! Unix domain socket endpoints.
//!
//! This is the lowest layer of fetchsock. A [`SocketListener`] owns the bound
//! filesystem address on the server side; every accepted or connected peer is
//! an [`Endpoint`]. Both are closed exactly once: explicitly via `close`, or
//! implicitly on drop.

pub mod endpoint;
pub mod error;
pub mod io;
pub mod uds;

pub use endpoint::Endpoint;
pub use error::{Result, TransportError};
pub use io::{read_chunk, write_bytes};
pub use uds::SocketListener;
