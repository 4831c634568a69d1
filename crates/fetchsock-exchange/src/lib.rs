//! The fetchsock request/response exchange.
//!
//! Server side: read a file name, resolve it through a [`ContentResolver`],
//! answer with sentinel-framed lines. Client side: send a name, read lines
//! back until the sentinel. [`FileServer`] runs the server side for one
//! connection at a time until its [`Shutdown`] token fires.

pub mod client;
pub mod config;
pub mod error;
pub mod resolve;
pub mod serve;
pub mod server;
pub mod shutdown;

pub use client::{fetch, fetch_with_config};
pub use config::ExchangeConfig;
pub use error::{ExchangeError, Result};
pub use resolve::{ContentResolver, DirectoryResolver, ResolveError};
pub use serve::{FileServer, ServeSummary};
pub use server::{serve_connection, ServedRequest};
pub use shutdown::Shutdown;
