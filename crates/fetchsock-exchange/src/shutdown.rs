use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fetchsock_transport::Endpoint;
use tracing::debug;

/// Cooperative shutdown token for the accept loop.
///
/// Cheap to clone; every clone observes the same flag. Triggering is
/// idempotent. A token created with [`Shutdown::waking`] also connects once
/// to the listener's address so a blocked `accept` returns and the loop can
/// observe the flag.
#[derive(Clone, Debug, Default)]
pub struct Shutdown {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    requested: AtomicBool,
    wake_path: Option<PathBuf>,
}

impl Shutdown {
    /// A token that only sets the flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also wakes a listener bound at `path`.
    pub fn waking(path: impl AsRef<Path>) -> Self {
        Self {
            inner: Arc::new(Inner {
                requested: AtomicBool::new(false),
                wake_path: Some(path.as_ref().to_path_buf()),
            }),
        }
    }

    /// Request shutdown. Only the first call has any effect.
    pub fn trigger(&self) {
        if self.inner.requested.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("shutdown requested");
        if let Some(path) = &self.inner.wake_path {
            // The listener may already be gone; nothing to wake then.
            if let Ok(endpoint) = Endpoint::connect(path) {
                drop(endpoint);
            }
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }
}
