mod cli;
mod config;
mod domain;
mod error;
mod infra;
mod server;
mod workflows;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::{ConfigFile, Settings};
use domain::models::CatalogEntry;
use error::ConfigError;
use infra::omdb::OmdbClient;
use infra::remote::{self, RemoteTarget};
use workflows::catalog::{self, AssembleOptions};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "movie_catalog=debug,warn"
    } else {
        "movie_catalog=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(&cli, ConfigFile::load(cli.config.as_deref())?);

    let entries = match &cli.catalog_file {
        Some(path) => load_catalog(path)?,
        None => scan(&settings)?,
    };

    if let Some(output) = &cli.output {
        write_catalog(output, &entries)?;
    }

    if cli.no_serve {
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(server::serve(entries, settings.port))
}

fn scan(settings: &Settings) -> Result<Vec<CatalogEntry>> {
    let remote_settings = match settings.remote() {
        Ok(remote_settings) => remote_settings,
        Err(e @ ConfigError::Missing(_)) => Cli::command()
            .error(clap::error::ErrorKind::MissingRequiredArgument, e)
            .exit(),
        Err(e) => return Err(e.into()),
    };

    let target = RemoteTarget::parse(
        &remote_settings.host,
        &remote_settings.user,
        &remote_settings.password,
    )?;
    let remote_fs = remote::connect(&target, settings.timeout)
        .with_context(|| format!("connecting to {}", remote_settings.host))?;

    let search = OmdbClient::new(
        settings.omdb_url.clone(),
        settings.omdb_api_key.clone(),
        settings.timeout,
    )
    .context("building metadata client")?;

    let options = AssembleOptions {
        max_entries: settings.max_entries,
        ..AssembleOptions::new(remote_settings.dir)
    };
    let catalog = catalog::assemble(remote_fs.as_ref(), &search, &options);
    debug!(report = ?catalog.report, "Assembly finished");
    Ok(catalog.entries)
}

fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let entries: Vec<CatalogEntry> =
        serde_json::from_str(&content).with_context(|| format!("decoding {}", path.display()))?;
    info!("Loaded {} catalog entries from {}", entries.len(), path.display());
    Ok(entries)
}

fn write_catalog(output: &str, entries: &[CatalogEntry]) -> Result<()> {
    if output == "-" {
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, entries)?;
        writeln!(stdout)?;
        return Ok(());
    }

    let content = serde_json::to_string_pretty(entries)?;
    fs::write(output, content).with_context(|| format!("writing {output}"))?;
    info!("Wrote {} catalog entries to {output}", entries.len());
    Ok(())
}
