use std::path::Path;

use fetchsock_transport::SocketListener;
use tracing::{debug, info, warn};

use crate::config::ExchangeConfig;
use crate::error::Result;
use crate::resolve::ContentResolver;
use crate::server::serve_connection;
use crate::shutdown::Shutdown;

/// Counters reported when the server loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeSummary {
    /// Exchanges that completed.
    pub served: u64,
    /// Exchanges aborted by a read, write or close failure.
    pub aborted: u64,
    /// Accept calls that failed and were retried.
    pub accept_errors: u64,
}

/// Sequential file server: one connection at a time, until shutdown.
pub struct FileServer<R> {
    listener: SocketListener,
    resolver: R,
    config: ExchangeConfig,
    shutdown: Shutdown,
}

impl<R: ContentResolver> FileServer<R> {
    /// Bind the listening socket at `path`.
    pub fn bind(path: impl AsRef<Path>, resolver: R) -> Result<Self> {
        let listener = SocketListener::bind(path)?;
        let shutdown = Shutdown::waking(listener.path());
        Ok(Self {
            listener,
            resolver,
            config: ExchangeConfig::default(),
            shutdown,
        })
    }

    /// Override per-connection configuration.
    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Token that stops [`run`](Self::run); safe to trigger from any thread.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Bound socket path.
    pub fn path(&self) -> &Path {
        self.listener.path()
    }

    /// Accept and serve connections until shutdown, then unlink the socket.
    ///
    /// Per-connection failures are logged and do not stop the loop. The only
    /// error returned is a failure to release the listener.
    pub fn run(self) -> Result<ServeSummary> {
        let mut summary = ServeSummary::default();

        while !self.shutdown.is_triggered() {
            let endpoint = match self.listener.accept() {
                Ok(endpoint) => endpoint,
                Err(err) if self.shutdown.is_triggered() => {
                    debug!(error = %err, "accept failed during shutdown");
                    break;
                }
                Err(err) if err.is_recoverable() => {
                    warn!(error = %err, "accept failed; retrying");
                    summary.accept_errors += 1;
                    continue;
                }
                // The listener's Drop still unlinks the socket.
                Err(err) => return Err(err.into()),
            };

            if self.shutdown.is_triggered() {
                debug!("connection accepted during shutdown; not serving it");
                drop(endpoint);
                break;
            }

            match serve_connection(endpoint, &self.resolver, &self.config) {
                Ok(served) => {
                    debug!(file = %served.name, resolved = served.resolved, "exchange complete");
                    summary.served += 1;
                }
                Err(err) => {
                    warn!(error = %err, "exchange aborted");
                    summary.aborted += 1;
                }
            }
        }

        info!(
            served = summary.served,
            aborted = summary.aborted,
            "server shutting down"
        );
        self.listener.close()?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::path::PathBuf;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use fetchsock_transport::Endpoint;

    use super::*;
    use crate::client::fetch;
    use crate::resolve::{DirectoryResolver, ResolveError};

    fn make_dir(tag: &str) -> PathBuf {
        let dir = PathBuf::from(format!(
            "/tmp/fsock-serve-{}-{}-{}",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir
    }

    fn files(name: &str) -> std::result::Result<Vec<String>, ResolveError> {
        match name {
            "greeting.txt" => Ok(vec!["hi".to_string(), "there".to_string()]),
            other => Err(ResolveError::Rejected {
                name: other.to_string(),
                reason: "not in fixture",
            }),
        }
    }

    #[test]
    fn serves_until_shutdown_and_unlinks() {
        let dir = make_dir("basic");
        let sock_path = dir.join("server.sock");
        let server = FileServer::bind(&sock_path, files).expect("server should bind");
        let shutdown = server.shutdown_handle();
        let handle = thread::spawn(move || server.run());

        assert_eq!(fetch(&sock_path, "greeting.txt").unwrap(), vec!["hi", "there"]);
        // Same request again on a fresh connection gives the same answer.
        assert_eq!(fetch(&sock_path, "greeting.txt").unwrap(), vec!["hi", "there"]);
        assert!(fetch(&sock_path, "missing.txt").unwrap().is_empty());

        shutdown.trigger();
        let summary = handle
            .join()
            .expect("server thread should finish")
            .expect("server should shut down cleanly");

        assert_eq!(summary.served, 3);
        assert_eq!(summary.aborted, 0);
        assert!(!sock_path.exists(), "socket path should be removed");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn shutdown_before_any_client() {
        let dir = make_dir("idle");
        let sock_path = dir.join("server.sock");
        let server = FileServer::bind(&sock_path, files).expect("server should bind");
        let shutdown = server.shutdown_handle();
        let handle = thread::spawn(move || server.run());

        shutdown.trigger();
        let summary = handle.join().unwrap().unwrap();
        assert_eq!(summary, ServeSummary::default());
        assert!(!sock_path.exists());

        // Nothing is listening any more.
        assert!(Endpoint::connect(&sock_path).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn broken_client_does_not_stop_the_server() {
        let dir = make_dir("broken");
        let sock_path = dir.join("server.sock");
        let server = FileServer::bind(&sock_path, files).expect("server should bind");
        let shutdown = server.shutdown_handle();
        let handle = thread::spawn(move || server.run());

        // Connects and hangs up without sending a request.
        drop(Endpoint::connect(&sock_path).unwrap());

        assert_eq!(fetch(&sock_path, "greeting.txt").unwrap(), vec!["hi", "there"]);

        shutdown.trigger();
        let summary = handle.join().unwrap().unwrap();
        assert_eq!(summary.aborted, 1);
        assert_eq!(summary.served, 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn clients_are_served_one_after_another() {
        let dir = make_dir("sequential");
        let sock_path = dir.join("server.sock");
        let server = FileServer::bind(&sock_path, files).expect("server should bind");
        let shutdown = server.shutdown_handle();
        let handle = thread::spawn(move || server.run());

        // First client connects but holds its request back.
        let mut first = Endpoint::connect(&sock_path).unwrap();
        thread::sleep(Duration::from_millis(50));

        let (tx, rx) = mpsc::channel();
        let second_path = sock_path.clone();
        let second = thread::spawn(move || {
            let lines = fetch(&second_path, "greeting.txt");
            tx.send(()).expect("receiver alive");
            lines
        });

        // The second client cannot complete while the first is in flight.
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());

        first.write_all(b"greeting.txt").unwrap();
        let mut wire = Vec::new();
        first.read_to_end(&mut wire).unwrap();
        assert_eq!(wire, b"hi\nthere\nEOF\n");

        rx.recv_timeout(Duration::from_secs(5))
            .expect("second client should finish after the first");
        assert_eq!(second.join().unwrap().unwrap(), vec!["hi", "there"]);

        shutdown.trigger();
        handle.join().unwrap().unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn directory_resolver_round_trip() {
        let dir = make_dir("files");
        let root = dir.join("include");
        std::fs::create_dir_all(&root).unwrap();
        let content = ["first line", "", "  indented", "last"];
        std::fs::write(root.join("doc.txt"), content.join("\n") + "\n").unwrap();

        let sock_path = dir.join("server.sock");
        let server = FileServer::bind(&sock_path, DirectoryResolver::new(&root))
            .expect("server should bind");
        let shutdown = server.shutdown_handle();
        let handle = thread::spawn(move || server.run());

        assert_eq!(fetch(&sock_path, "doc.txt").unwrap(), content);
        assert!(fetch(&sock_path, "../server.sock").unwrap().is_empty());

        shutdown.trigger();
        handle.join().unwrap().unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }
}
