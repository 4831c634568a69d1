use std::path::Path;

use fetchsock_frame::{write_request, ResponseReader};
use fetchsock_transport::Endpoint;
use tracing::debug;

use crate::config::ExchangeConfig;
use crate::error::Result;

/// Fetch the content lines of `name` from the server at `path`.
///
/// An empty result means the server could not provide the file (or the file
/// is empty; the protocol does not distinguish the two).
pub fn fetch(path: impl AsRef<Path>, name: &str) -> Result<Vec<String>> {
    fetch_with_config(path, name, &ExchangeConfig::default())
}

/// Fetch with explicit configuration.
///
/// All-or-nothing: any failure before the sentinel yields an error and no
/// lines. The endpoint is closed on every path.
pub fn fetch_with_config(
    path: impl AsRef<Path>,
    name: &str,
    config: &ExchangeConfig,
) -> Result<Vec<String>> {
    let mut endpoint = Endpoint::connect(path)?;
    config.apply(&endpoint)?;

    write_request(&mut endpoint, name, &config.frame)?;
    debug!(file = %name, "request sent");

    let lines = ResponseReader::with_config(&mut endpoint, config.frame.clone()).read_response()?;
    debug!(file = %name, lines = lines.len(), "response received");

    endpoint.close()?;
    Ok(lines)
}
