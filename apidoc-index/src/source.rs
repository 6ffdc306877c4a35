//! Document locations: http(s) URLs or filesystem paths.

use crate::error::LoadError;
use reqwest::Url;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Where a document (root or externally referenced) lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    Url(Url),
    File(PathBuf),
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

impl Location {
    /// Interpret a source string. Anything that is not an `http://` or
    /// `https://` URL is a path relative to the working directory.
    pub fn parse(source: &str) -> Result<Self, LoadError> {
        if is_url(source) {
            return Url::parse(source)
                .map(Location::Url)
                .map_err(|e| LoadError::InvalidLocation(format!("{}: {}", source, e)));
        }

        if source.trim().is_empty() {
            return Err(LoadError::InvalidLocation("empty source".to_string()));
        }

        let path = Path::new(source);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            let cwd = std::env::current_dir().map_err(|source| LoadError::Io {
                path: PathBuf::from("."),
                source,
            })?;
            cwd.join(path)
        };
        Ok(Location::File(normalize(&absolute)))
    }

    /// Resolve the location part of a `$ref` against this document.
    pub fn join(&self, reference: &str) -> Result<Self, LoadError> {
        if is_url(reference) {
            return Location::parse(reference);
        }

        match self {
            Location::Url(base) => base
                .join(reference)
                .map(Location::Url)
                .map_err(|e| LoadError::InvalidLocation(format!("{}: {}", reference, e))),
            Location::File(path) => {
                let dir = path.parent().unwrap_or_else(|| Path::new(""));
                Ok(Location::File(normalize(&dir.join(reference))))
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Url(url) => write!(f, "{}", url),
            Location::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Lexically drop `.` and fold `..` so equal files compare equal.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
