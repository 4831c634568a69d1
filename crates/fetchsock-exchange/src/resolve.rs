use std::path::{Component, Path, PathBuf};

use fetchsock_frame::split_lines;
use tracing::debug;

/// Why a name could not be turned into content.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The name is not something this resolver will look up.
    #[error("refusing to resolve {name:?}: {reason}")]
    Rejected { name: String, reason: &'static str },

    /// The file could not be opened or read.
    #[error("failed reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Maps a requested name to its content lines.
///
/// An `Err` means the content is unavailable; the server answers it with an
/// empty response rather than failing the connection.
pub trait ContentResolver {
    fn resolve(&self, name: &str) -> Result<Vec<String>, ResolveError>;
}

impl<F> ContentResolver for F
where
    F: Fn(&str) -> Result<Vec<String>, ResolveError>,
{
    fn resolve(&self, name: &str) -> Result<Vec<String>, ResolveError> {
        self(name)
    }
}

/// Resolves names as files directly under a fixed root directory.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `name` onto the root. Only plain relative names are accepted.
    pub fn locate(&self, name: &str) -> Result<PathBuf, ResolveError> {
        let reject = |reason| ResolveError::Rejected {
            name: name.to_string(),
            reason,
        };

        if name.is_empty() {
            return Err(reject("empty name"));
        }
        let relative = Path::new(name);
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => return Err(reject("parent directory components")),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(reject("absolute paths"))
                }
            }
        }
        Ok(self.root.join(relative))
    }
}

impl ContentResolver for DirectoryResolver {
    fn resolve(&self, name: &str) -> Result<Vec<String>, ResolveError> {
        let path = self.locate(name)?;
        let bytes = std::fs::read(&path).map_err(|source| ResolveError::Io {
            path: path.clone(),
            source,
        })?;
        let lines: Vec<String> = split_lines(&bytes)
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect();
        debug!(?path, lines = lines.len(), "resolved file");
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "fetchsock-resolve-{}-{}-{}",
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

    #[test]
    fn resolves_lines_in_order() {
        let root = make_root("lines");
        std::fs::write(root.join("a.txt"), "one\ntwo\n\nfour").unwrap();

        let resolver = DirectoryResolver::new(&root);
        assert_eq!(
            resolver.resolve("a.txt").unwrap(),
            vec!["one", "two", "", "four"]
        );

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn empty_file_resolves_to_no_lines() {
        let root = make_root("empty");
        std::fs::write(root.join("empty.txt"), "").unwrap();

        let resolver = DirectoryResolver::new(&root);
        assert!(resolver.resolve("empty.txt").unwrap().is_empty());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_file_is_io_error() {
        let root = make_root("missing");
        let resolver = DirectoryResolver::new(&root);
        let err = resolver.resolve("nope.txt").unwrap_err();
        assert!(
            matches!(err, ResolveError::Io { ref source, .. } if source.kind() == std::io::ErrorKind::NotFound)
        );
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn subdirectories_are_allowed() {
        let root = make_root("nested");
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::write(root.join("sub/b.txt"), "x\n").unwrap();

        let resolver = DirectoryResolver::new(&root);
        assert_eq!(resolver.resolve("sub/b.txt").unwrap(), vec!["x"]);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn rejects_names_escaping_root() {
        let resolver = DirectoryResolver::new("/srv/files");
        assert!(matches!(
            resolver.locate("../etc/passwd"),
            Err(ResolveError::Rejected { .. })
        ));
        assert!(matches!(
            resolver.locate("/etc/passwd"),
            Err(ResolveError::Rejected { .. })
        ));
        assert!(matches!(
            resolver.locate(""),
            Err(ResolveError::Rejected { .. })
        ));
        assert_eq!(
            resolver.locate("./notes.txt").unwrap(),
            PathBuf::from("/srv/files/notes.txt")
        );
    }

    #[test]
    fn closures_are_resolvers() {
        let resolver = |name: &str| -> Result<Vec<String>, ResolveError> {
            Ok(vec![name.to_uppercase()])
        };
        assert_eq!(resolver.resolve("abc").unwrap(), vec!["ABC"]);
    }
}
