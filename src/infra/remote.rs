use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, UNIX_EPOCH};

use tracing::info;
use url::Url;

use crate::domain::models::{join_remote, NodeMeta, RemoteNode};
use crate::error::{ConnectError, ListingError};

const DEFAULT_SFTP_PORT: u16 = 22;

/// Read-only view of a remote directory tree.
pub trait RemoteFs {
    fn stat(&self, path: &str) -> Result<RemoteNode, ListingError>;

    /// Immediate children of `path`, in the server's listing order.
    fn read_dir(&self, path: &str) -> Result<Vec<RemoteNode>, ListingError>;
}

/// Where the file server lives, parsed from the configured host url.
#[derive(Clone, PartialEq, Eq)]
pub enum RemoteTarget {
    Sftp {
        host: String,
        port: u16,
        user: String,
        password: String,
    },
    /// A tree reachable on local disk, e.g. a mounted share.
    Local { root: PathBuf },
}

impl RemoteTarget {
    pub fn parse(host: &str, user: &str, password: &str) -> Result<Self, ConnectError> {
        let url = Url::parse(host).map_err(|e| ConnectError::InvalidUrl(host.to_string(), e))?;
        match url.scheme() {
            "sftp" => {
                let Some(hostname) = url.host_str().filter(|h| !h.is_empty()) else {
                    return Err(ConnectError::MissingHost(host.to_string()));
                };
                Ok(Self::Sftp {
                    host: hostname.to_string(),
                    port: url.port().unwrap_or(DEFAULT_SFTP_PORT),
                    user: user.to_string(),
                    password: password.to_string(),
                })
            }
            "file" => {
                let root = url
                    .to_file_path()
                    .map_err(|()| ConnectError::NotAFilePath(host.to_string()))?;
                Ok(Self::Local { root })
            }
            other => Err(ConnectError::InvalidScheme(other.to_string())),
        }
    }
}

impl fmt::Debug for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sftp {
                host, port, user, ..
            } => f
                .debug_struct("Sftp")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .finish_non_exhaustive(),
            Self::Local { root } => f.debug_struct("Local").field("root", root).finish(),
        }
    }
}

/// Opens a session against the target. `timeout` bounds every blocking call
/// made through the returned handle where the backend supports it.
#[cfg_attr(not(feature = "sftp"), allow(unused_variables))]
pub fn connect(
    target: &RemoteTarget,
    timeout: Duration,
) -> Result<Box<dyn RemoteFs>, ConnectError> {
    match target {
        RemoteTarget::Local { root } => {
            let fs = LocalFs::open(root.clone())?;
            info!("Using local tree at {}", root.display());
            Ok(Box::new(fs))
        }
        #[cfg(feature = "sftp")]
        RemoteTarget::Sftp {
            host,
            port,
            user,
            password,
        } => {
            let fs = super::sftp::SftpFs::connect(host, *port, user, password, timeout)?;
            info!("Connected to sftp://{host}:{port} as {user}");
            Ok(Box::new(fs))
        }
        #[cfg(not(feature = "sftp"))]
        RemoteTarget::Sftp { .. } => Err(ConnectError::Unsupported("sftp")),
    }
}

/// Serves remote paths out of a local directory. Remote `/a/b` maps to
/// `<root>/a/b`. Listings are sorted by name since local directory order is
/// unspecified.
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    pub fn open(root: PathBuf) -> Result<Self, ConnectError> {
        match fs::metadata(&root) {
            Ok(meta) if meta.is_dir() => Ok(Self { root }),
            Ok(_) => Err(ConnectError::Transport {
                host: root.display().to_string(),
                source: io::Error::new(io::ErrorKind::Other, "not a directory"),
            }),
            Err(source) => Err(ConnectError::Transport {
                host: root.display().to_string(),
                source,
            }),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

fn listing_error(path: &str, source: io::Error) -> ListingError {
    if source.kind() == io::ErrorKind::NotFound {
        ListingError::NotFound(path.to_string())
    } else {
        ListingError::Io {
            path: path.to_string(),
            source,
        }
    }
}

fn node_meta(meta: &fs::Metadata) -> NodeMeta {
    NodeMeta {
        size: Some(meta.len()),
        modified: meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs()),
    }
}

impl RemoteFs for LocalFs {
    fn stat(&self, path: &str) -> Result<RemoteNode, ListingError> {
        let meta = fs::metadata(self.resolve(path)).map_err(|e| listing_error(path, e))?;
        let node = if meta.is_dir() {
            RemoteNode::dir(path)
        } else {
            RemoteNode::file(path)
        };
        Ok(node.with_meta(node_meta(&meta)))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<RemoteNode>, ListingError> {
        let entries = fs::read_dir(self.resolve(path)).map_err(|e| listing_error(path, e))?;

        let mut nodes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| listing_error(path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let child_path = join_remote(path, &name);
            // Follows symlinks; a dangling link is listed as a plain file.
            let node = match entry.path().metadata() {
                Ok(meta) if meta.is_dir() => {
                    RemoteNode::dir(child_path).with_meta(node_meta(&meta))
                }
                Ok(meta) => RemoteNode::file(child_path).with_meta(node_meta(&meta)),
                Err(_) => RemoteNode::file(child_path),
            };
            nodes.push(node);
        }
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(nodes)
    }
}
