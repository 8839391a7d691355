//! SnapShare command-line front end
//!
//! Every command goes through `Gallery`; nothing here touches storage.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use snapshare_core::{Config, Gallery};

#[derive(Parser)]
#[command(
    name = "snapshare",
    version,
    about = "Share batches of images through local, self-expiring links"
)]
struct Cli {
    /// Data directory (defaults to $SNAPSHARE_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store images as a new batch and print its share link
    Upload {
        /// Image files to include
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show a batch by share link or id
    View {
        link: String,
        /// Write the images into this directory
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// List live batches, newest first
    List,
    /// Delete a batch by share link or id
    Delete {
        link: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Evict expired batches now
    Sweep,
    /// Keep sweeping expired batches on a timer until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> ExitCode {
    snapshare_core::init_logging();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = cli.data_dir.unwrap_or_else(Config::data_dir);
    let config = Config::load(&data_dir)?;
    let gallery = Gallery::new(config)?;
    gallery.initialize()?;

    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::Upload { files } => commands::upload::upload(&gallery, &files, &mut out).await,
        Command::View { link, export } => {
            commands::view::view(&gallery, &link, export.as_deref(), &mut out)
        }
        Command::List => commands::view::list(&gallery, &mut out),
        Command::Delete { link, yes } => {
            let mut input = std::io::stdin().lock();
            commands::delete::delete(&gallery, &link, yes, &mut input, &mut out)
        }
        Command::Sweep => commands::sweep::sweep(&gallery, &mut out),
        Command::Watch => {
            drop(out);
            commands::sweep::watch(&gallery).await
        }
    }
}
