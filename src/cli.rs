use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "movie-catalog")]
#[command(
    about = "Walk a remote file server for videos, identify them by title and serve the catalog as JSON"
)]
pub struct Cli {
    /// File server url (sftp://host[:port], or file:///path for a mounted share)
    #[arg(long = "ssh-host", alias = "ssh.host", env = "FILESERVER_HOST")]
    pub host: Option<String>,

    /// User to connect with
    #[arg(long = "ssh-user", alias = "ssh.user", env = "FILESERVER_USER")]
    pub user: Option<String>,

    /// Password to connect with
    #[arg(
        long = "ssh-password",
        alias = "ssh.password",
        env = "FILESERVER_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Directory to walk on the file server
    #[arg(long = "ssh-dir", alias = "ssh.dir", env = "FILESERVER_DIR")]
    pub dir: Option<String>,

    /// Base url of the title search service
    #[arg(long, env = "OMDB_URL")]
    pub omdb_url: Option<String>,

    /// API key for the title search service
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true)]
    pub omdb_api_key: Option<String>,

    /// Maximum number of titles collected per walk
    #[arg(long)]
    pub max_entries: Option<usize>,

    /// Timeout in seconds for each remote listing and each title lookup
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Port for the catalog endpoint
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Serve a previously written catalog instead of scanning
    #[arg(long)]
    pub catalog_file: Option<PathBuf>,

    /// Write the catalog as JSON to this file ("-" for stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Exit after building the catalog instead of serving it
    #[arg(long)]
    pub no_serve: bool,

    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
