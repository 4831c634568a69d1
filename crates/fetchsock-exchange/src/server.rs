use std::io::{Read, Write};

use fetchsock_frame::{read_request, ResponseWriter};
use fetchsock_transport::Endpoint;
use tracing::{debug, info, warn};

use crate::config::ExchangeConfig;
use crate::error::Result;
use crate::resolve::ContentResolver;

/// What one server-side exchange did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedRequest {
    /// The requested name, as received.
    pub name: String,
    /// Whether the resolver produced content.
    pub resolved: bool,
    /// Number of content lines sent (excluding the sentinel).
    pub lines: usize,
    /// Total bytes written, sentinel included.
    pub bytes: usize,
}

/// Run one complete exchange on an accepted connection and close it.
///
/// The endpoint is closed on every path. An exchange error takes precedence
/// over a close error in the returned result.
pub fn serve_connection<R: ContentResolver + ?Sized>(
    mut endpoint: Endpoint,
    resolver: &R,
    config: &ExchangeConfig,
) -> Result<ServedRequest> {
    if let Some((uid, gid, pid)) = endpoint.peer_credentials() {
        debug!(uid, gid, pid, "client connected");
    }

    let exchanged = match config.apply(&endpoint) {
        Ok(()) => exchange(&mut endpoint, resolver, config),
        Err(err) => Err(err.into()),
    };
    let closed = endpoint.close();

    let served = exchanged?;
    closed?;
    Ok(served)
}

/// Request → resolve → response over any stream.
pub(crate) fn exchange<S, R>(
    stream: &mut S,
    resolver: &R,
    config: &ExchangeConfig,
) -> Result<ServedRequest>
where
    S: Read + Write,
    R: ContentResolver + ?Sized,
{
    let name = read_request(stream, &config.frame)?;
    info!(file = %name, "request received");

    let (content, resolved) = match resolver.resolve(&name) {
        Ok(lines) => (lines, true),
        Err(err) => {
            warn!(file = %name, error = %err, "could not obtain file contents");
            (Vec::new(), false)
        }
    };

    let mut writer = ResponseWriter::new(stream);
    let bytes = writer.send(&content[..])?;
    info!(file = %name, lines = content.len(), bytes, "response sent");

    Ok(ServedRequest {
        name,
        resolved,
        lines: content.len(),
        bytes,
    })
}
