//! upmirror: fires the host's upload lifecycle events from the command line.
//!
//! Reads S3_UPLOADS_* plus UPLOADS_BASEDIR / UPLOADS_BASEURL from the environment (or `.env`).
//! Results are printed as JSON on stdout, logs go to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use upmirror_cli::{init_tracing, metadata_from_args, read_metadata};
use upmirror_core::{MirrorConfig, UploadDirs};
use upmirror_engine::{register_bindings, HostEvents, MirrorEngine};
use upmirror_storage::create_object_store;

#[derive(Parser)]
#[command(name = "upmirror", about = "Mirror host uploads into an object store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// An asset and its sizes were generated
    Created {
        /// Host metadata JSON file (`-` for stdin)
        metadata: Option<PathBuf>,
        /// Primary file, relative to the uploads root
        #[arg(long, conflicts_with = "metadata")]
        file: Option<String>,
        /// Size variant as name=filename, repeatable
        #[arg(long = "size", requires = "file")]
        sizes: Vec<String>,
    },
    /// A file under the uploads root is being deleted
    Deleted {
        /// Absolute local path
        path: PathBuf,
    },
    /// Resolve the upload location for a subdirectory, e.g. 2024/05
    Url {
        #[arg(default_value = "")]
        subdir: String,
    },
    /// Print the parsed bucket target
    Target,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = MirrorConfig::from_env()
        .context("Failed to load configuration. Set UPLOADS_BASEDIR and UPLOADS_BASEURL")?;
    init_tracing(config.log_format);

    let store = match create_object_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "Could not create object store client, mirroring disabled");
            None
        }
    };
    let engine = Arc::new(MirrorEngine::from_config(&config, store));

    let events = HostEvents::new();
    register_bindings(&events, engine.clone()).await;

    match cli.command {
        Commands::Created {
            metadata,
            file,
            sizes,
        } => {
            let metadata = match (metadata, file) {
                (Some(path), _) => read_metadata(&path)?,
                (None, Some(file)) => metadata_from_args(&file, &sizes)?,
                (None, None) => anyhow::bail!("Pass a metadata file or --file"),
            };
            let returned = events.asset_created(metadata).await;
            print_json(&returned)?;
        }
        Commands::Deleted { path } => {
            let returned = events.asset_deleted(path).await;
            print_json(&serde_json::json!({ "file": returned.display().to_string() }))?;
        }
        Commands::Url { subdir } => {
            let dirs = UploadDirs::for_subdir(engine.upload_root(), &subdir);
            let filtered = events.upload_dir(dirs).await;
            print_json(&filtered)?;
        }
        Commands::Target => {
            print_json(&serde_json::json!({
                "enabled": engine.is_enabled(),
                "backend": config.backend.to_string(),
                "target": config.bucket_target(),
                "public_base_url": engine.upload_root().public_base_url(),
            }))?;
        }
    }

    Ok(())
}
