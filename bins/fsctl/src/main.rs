//! fsctl - Filestore command line client
//!
//! Runs one file storage operation against the backend selected by
//! configuration (`config/default`, `config/{RUN_MODE}`, `FILESTORE__*`).

mod backend;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use filestore_core::storage::{FileStorageService, StorageError};
use filestore_shared::AppConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        let code = err
            .downcast_ref::<StorageError>()
            .map_or("ERROR", |e| e.kind().code());
        let _ = writeln!(io::stderr(), "Error [{code}]: {err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[tokio::main]
async fn try_main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::load_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => AppConfig::load().context("failed to load configuration")?,
    };

    let service = backend::build_service(&config.storage)?;
    info!(backend = config.storage.backend_name(), "storage backend ready");

    run(&service, cli.command).await
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "filestore=debug,fsctl=debug"
    } else {
        "filestore=info,fsctl=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

async fn run(service: &FileStorageService, command: Command) -> Result<()> {
    match command {
        Command::Mkdir { path } => service.create_directory(&path).await?,
        Command::Rmdir { path } => service.delete_directory(&path).await?,
        Command::Upload { directory, file } => service.upload_file(&directory, &file).await?,
        Command::Rm { path } => service.delete_file(&path).await?,
        Command::Ls {
            directory,
            directories,
        } => {
            for name in service
                .list_files_in_directory(&directory, directories)
                .await?
            {
                writeln!(io::stdout(), "{name}")?;
            }
        }
        Command::Url { path } => {
            let url = service.get_public_file_url(&path).await?;
            writeln!(io::stdout(), "{url}")?;
        }
    }

    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "fsctl",
    author,
    version,
    about = "Manage files on local, Azure File Share or Azure Blob storage."
)]
struct Cli {
    /// Configuration file, replacing config/default and config/{RUN_MODE}
    #[arg(long, short = 'c', env = "FILESTORE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log backend calls
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a directory (a container on blob storage)
    Mkdir {
        /// Directory path, e.g. reports/2024
        path: String,
    },
    /// Delete a directory
    Rmdir {
        /// Directory path
        path: String,
    },
    /// Upload a local file into a directory under its own name
    Upload {
        /// Destination directory
        directory: String,
        /// Local file to upload
        file: PathBuf,
    },
    /// Delete a file
    Rm {
        /// File path, e.g. reports/2024/q1.pdf
        path: String,
    },
    /// List the files in a directory
    Ls {
        /// Directory path
        directory: String,
        /// Include subdirectories
        #[arg(long, short = 'd')]
        directories: bool,
    },
    /// Print the public URL of a file
    Url {
        /// File path
        path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_upload() {
        let cli = Cli::try_parse_from(["fsctl", "upload", "/reports", "./q1.pdf"]).expect("parse");
        assert!(matches!(
            cli.command,
            Command::Upload { ref directory, ref file }
                if directory == "/reports" && file == &PathBuf::from("./q1.pdf")
        ));
    }

    #[test]
    fn test_parse_ls_with_directories() {
        let cli = Cli::try_parse_from(["fsctl", "-v", "ls", "reports", "--directories"])
            .expect("parse");
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Ls { ref directory, directories: true } if directory == "reports"
        ));
    }

    #[test]
    fn test_missing_argument_is_rejected() {
        assert!(Cli::try_parse_from(["fsctl", "upload", "reports"]).is_err());
    }
}
