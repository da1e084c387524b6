use std::net::TcpStream;
use std::path::Path;
use std::time::Duration;

use ssh2::{FileStat, Session, Sftp};

use super::remote::RemoteFs;
use crate::domain::models::{join_remote, NodeMeta, RemoteNode};
use crate::error::{ConnectError, ListingError};

/// SFTP subsystem over a password-authenticated SSH session.
pub struct SftpFs {
    // Kept alive for as long as the sftp channel is in use.
    _session: Session,
    sftp: Sftp,
}

impl SftpFs {
    pub fn connect(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        timeout: Duration,
    ) -> Result<Self, ConnectError> {
        let tcp = TcpStream::connect((host, port)).map_err(|source| ConnectError::Transport {
            host: format!("{host}:{port}"),
            source,
        })?;

        let mut session = Session::new().map_err(|e| ConnectError::Session(e.to_string()))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));
        session
            .handshake()
            .map_err(|e| ConnectError::Session(e.to_string()))?;

        session
            .userauth_password(user, password)
            .map_err(|_| ConnectError::Auth(user.to_string()))?;
        if !session.authenticated() {
            return Err(ConnectError::Auth(user.to_string()));
        }

        let sftp = session
            .sftp()
            .map_err(|e| ConnectError::Session(e.to_string()))?;

        Ok(Self {
            _session: session,
            sftp,
        })
    }
}

fn listing_error(path: &str, err: ssh2::Error) -> ListingError {
    // LIBSSH2_FX_NO_SUCH_FILE
    if matches!(err.code(), ssh2::ErrorCode::SFTP(2)) {
        ListingError::NotFound(path.to_string())
    } else {
        ListingError::Remote {
            path: path.to_string(),
            message: err.message().to_string(),
        }
    }
}

fn to_node(path: String, stat: &FileStat) -> RemoteNode {
    let node = if stat.is_dir() {
        RemoteNode::dir(path)
    } else {
        RemoteNode::file(path)
    };
    node.with_meta(NodeMeta {
        size: stat.size,
        modified: stat.mtime,
    })
}

impl RemoteFs for SftpFs {
    fn stat(&self, path: &str) -> Result<RemoteNode, ListingError> {
        let stat = self
            .sftp
            .stat(Path::new(path))
            .map_err(|e| listing_error(path, e))?;
        Ok(to_node(path.to_string(), &stat))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<RemoteNode>, ListingError> {
        let entries = self
            .sftp
            .readdir(Path::new(path))
            .map_err(|e| listing_error(path, e))?;

        Ok(entries
            .into_iter()
            .filter_map(|(child, stat)| {
                let name = child.file_name()?.to_string_lossy().into_owned();
                Some(to_node(join_remote(path, &name), &stat))
            })
            .collect())
    }
}
