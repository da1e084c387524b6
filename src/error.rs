use thiserror::Error;

/// Failure to open the remote session. Always fatal for the run.
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("invalid host url {0:?}")]
    InvalidUrl(String, #[source] url::ParseError),

    #[error("invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("host url {0:?} is not a local directory path")]
    NotAFilePath(String),

    #[error("host url {0:?} has no host")]
    MissingHost(String),

    #[error("{0} support was not compiled in (enable the `{0}` feature)")]
    Unsupported(&'static str),

    #[error("connection to {host} failed")]
    Transport {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("session setup failed: {0}")]
    Session(String),

    #[error("authentication failed for user {0}")]
    Auth(String),
}

/// A single remote listing failed. The walk logs it and moves on.
#[derive(Error, Debug)]
pub enum ListingError {
    #[error("path not found: {0}")]
    NotFound(String),

    #[error("listing {path} failed")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("listing {path} failed: {message}")]
    Remote { path: String, message: String },
}

impl ListingError {
    /// The remote path the failure occurred at.
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound(p) | Self::Io { path: p, .. } | Self::Remote { path: p, .. } => p,
        }
    }
}

/// A metadata lookup for one title failed. The entry stays unmatched.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("request for {title:?} failed")]
    Request {
        title: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("search for {title:?} returned HTTP {status}")]
    Status { title: String, status: u16 },

    #[error("response for {title:?} could not be decoded")]
    Decode {
        title: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required setting(s): {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("could not read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_error_reports_its_path() {
        let err = ListingError::Remote {
            path: "/movies/x".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(err.path(), "/movies/x");
        assert_eq!(ListingError::NotFound("/gone".into()).path(), "/gone");
    }

    #[test]
    fn missing_settings_are_listed() {
        let err = ConfigError::Missing(vec!["host", "dir"]);
        assert_eq!(err.to_string(), "missing required setting(s): host, dir");
    }
}
