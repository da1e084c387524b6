use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::infra::omdb::OMDB_API_BASE;
use crate::workflows::walker::DEFAULT_MAX_ENTRIES;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    host: Option<String>,
    user: Option<String>,
    password: Option<String>,
    dir: Option<String>,
    omdb_url: Option<String>,
    omdb_api_key: Option<String>,
    max_entries: Option<usize>,
    timeout_secs: Option<u64>,
    port: Option<u16>,
}

impl ConfigFile {
    /// Reads `explicit` if given, else the default location. Only an
    /// explicitly named file has to exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = get_config_path();
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Connection details for the file server. All four are required to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub host: String,
    pub user: String,
    pub password: String,
    pub dir: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    host: Option<String>,
    user: Option<String>,
    password: Option<String>,
    dir: Option<String>,
    pub omdb_url: String,
    pub omdb_api_key: Option<String>,
    pub max_entries: usize,
    pub timeout: Duration,
    pub port: u16,
}

// Empty values count as unset, same as a missing flag.
fn pick(flag: &Option<String>, file: Option<String>) -> Option<String> {
    flag.clone()
        .filter(|v| !v.is_empty())
        .or(file.filter(|v| !v.is_empty()))
}

impl Settings {
    /// Flags and environment win over the config file, which wins over
    /// defaults.
    pub fn resolve(cli: &Cli, file: ConfigFile) -> Self {
        Self {
            host: pick(&cli.host, file.host),
            user: pick(&cli.user, file.user),
            password: pick(&cli.password, file.password),
            dir: pick(&cli.dir, file.dir),
            omdb_url: pick(&cli.omdb_url, file.omdb_url)
                .unwrap_or_else(|| OMDB_API_BASE.to_string()),
            omdb_api_key: pick(&cli.omdb_api_key, file.omdb_api_key),
            max_entries: cli
                .max_entries
                .or(file.max_entries)
                .unwrap_or(DEFAULT_MAX_ENTRIES),
            timeout: Duration::from_secs(
                cli.timeout
                    .or(file.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
        }
    }

    pub fn remote(&self) -> Result<RemoteSettings, ConfigError> {
        let missing: Vec<&'static str> = [
            ("ssh-host", &self.host),
            ("ssh-user", &self.user),
            ("ssh-password", &self.password),
            ("ssh-dir", &self.dir),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect();

        match (&self.host, &self.user, &self.password, &self.dir) {
            (Some(host), Some(user), Some(password), Some(dir)) => Ok(RemoteSettings {
                host: host.clone(),
                user: user.clone(),
                password: password.clone(),
                dir: dir.clone(),
            }),
            _ => Err(ConfigError::Missing(missing)),
        }
    }
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("movie-catalog"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

pub fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}
