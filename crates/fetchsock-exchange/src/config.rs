use std::time::Duration;

use fetchsock_frame::FrameConfig;
use fetchsock_transport::Endpoint;

/// Per-connection settings shared by both sides of an exchange.
#[derive(Debug, Clone, Default)]
pub struct ExchangeConfig {
    /// Buffer sizing for requests and responses.
    pub frame: FrameConfig,
    /// Read timeout on the endpoint. `None` blocks indefinitely.
    pub read_timeout: Option<Duration>,
    /// Write timeout on the endpoint. `None` blocks indefinitely.
    pub write_timeout: Option<Duration>,
}

impl ExchangeConfig {
    pub(crate) fn apply(&self, endpoint: &Endpoint) -> fetchsock_transport::Result<()> {
        endpoint.set_read_timeout(self.read_timeout)?;
        endpoint.set_write_timeout(self.write_timeout)
    }
}
