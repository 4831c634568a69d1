//! Sentinel-terminated framing for the fetchsock protocol.
//!
//! The wire format is deliberately tiny:
//! - request: the raw bytes of a file name, no prefix, no terminator
//! - response: zero or more `\n`-terminated lines followed by `EOF\n`
//!
//! A content line that is exactly `EOF` cannot be told apart from the
//! terminator. That limitation is part of the format.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    deframe_response, encode_response, find_sentinel, split_lines, FrameConfig, CHUNK_SIZE,
    DEFAULT_MAX_RESPONSE, MAX_REQUEST_LEN, SENTINEL, SENTINEL_LINE,
};
pub use error::{FrameError, Result};
pub use reader::{read_request, ResponseReader};
pub use writer::{write_request, ResponseWriter};
