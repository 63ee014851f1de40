use std::{io, path::PathBuf};

use clap::{Parser, Subcommand};
use log::info;
use shelf_launch::{Fs, LaunchPlan, Launcher, Outcome, Paths, Snapshot};
use tokio_util::sync::CancellationToken;

mod tree;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the library file, defaults to $XDG_CONFIG_HOME/shelf/shelf.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the library tree
    List,
    /// Print what launching an item would run, without running it
    Preview {
        /// Item id or title
        item: String,
        /// Disc index to launch instead of the first one
        #[arg(short, long)]
        disc: Option<u32>,
        /// Print the whole launch plan as json
        #[arg(long)]
        json: bool,
    },
    /// Launch an item and wait for it to exit
    Launch {
        /// Item id or title
        item: String,
        /// Disc index to launch instead of the first one
        #[arg(short, long)]
        disc: Option<u32>,
    },
}

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .with_module_level("shelf", log::LevelFilter::Trace)
        .with_module_level("shelf_launch", log::LevelFilter::Trace)
        .init()
        .ok();

    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error("Xdg error. {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
    #[error("Config error. {0}")]
    Config(#[from] shelf_cfg::Error),
    #[error("Unable to resolve launch. {0}")]
    Snapshot(#[from] shelf_launch::SnapshotError),
    #[error("Launch error. {0}")]
    Launch(#[from] shelf_launch::LaunchError),
    #[error("Json error. {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error. {0}")]
    Io(#[from] io::Error),
}

/// Returns the process exit code.
fn run() -> Result<i32, Error> {
    let cli = Cli::parse();
    let xdg = xdg::BaseDirectories::with_prefix("shelf")?;
    let config_file = cli
        .config
        .unwrap_or_else(|| xdg.get_config_home().join("shelf.yaml"));
    let paths = Paths::new(&xdg.get_data_home());

    let shelf = shelf_cfg::read(config_file)?;

    match cli.command {
        Commands::List => {
            print!("{}", tree::Tree(&shelf.library));
        }
        Commands::Preview { item, disc, json } => {
            let snapshot = Snapshot::capture(&shelf, &paths, &item, disc)?;
            let plan = LaunchPlan::recompute(&snapshot, &Fs);

            match json {
                true => println!("{}", serde_json::to_string_pretty(&plan)?),
                false => println!("{}", plan.preview()),
            }
        }
        Commands::Launch { item, disc } => {
            let snapshot = Snapshot::capture(&shelf, &paths, &item, disc)?;
            let plan = LaunchPlan::recompute(&snapshot, &Fs);

            let runtime = tokio::runtime::Runtime::new()?;
            let outcome = runtime.block_on(launch(&plan))?;

            return Ok(match outcome {
                Outcome::Exited(status) => status.code().unwrap_or(1),
                Outcome::Cancelled => 130,
                Outcome::Ignored => 1,
            });
        }
    }

    Ok(0)
}

async fn launch(plan: &LaunchPlan) -> Result<Outcome, shelf_launch::LaunchError> {
    let cancel = CancellationToken::new();

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, cancelling launch");
                cancel.cancel();
            }
        }
    });

    Launcher::new().launch(plan, cancel).await
}
