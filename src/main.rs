//! IsaacScript - watch, compile and sync mods into the game's mods directory.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use isaacscript::compiler::CompilerProcessBuilder;
use isaacscript::config::{ConfigOverrides, SaveSlot};
use isaacscript::display;
use isaacscript::monitor::{copy_mod, CopyOptions, Monitor, MonitorError, MonitorOptions};

#[derive(Parser)]
#[command(
    name = "isaacscript",
    about = "Watch, compile and sync IsaacScript mods",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the project, recompile on change and sync the mod (default).
    Monitor(MonitorArgs),
    /// Compile once and copy the mod to the mods directory.
    Copy(CopyArgs),
}

#[derive(Args, Default)]
struct MonitorArgs {
    /// The game's mods directory. Overrides the config file.
    #[arg(long)]
    mods_directory: Option<PathBuf>,
    /// Save slot the companion mod reads from. Overrides the config file.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    save_slot: Option<u8>,
    /// Do not check package.json for the required dependencies.
    #[arg(long)]
    skip_project_checks: bool,
    /// Use the development version of isaacscript-common.
    #[arg(long)]
    dev: bool,
    /// Location of the bundled isaacscript-watcher mod.
    #[arg(long)]
    watcher_mod: Option<PathBuf>,
    /// Program to run as the compiler instead of "npx tstl".
    #[arg(long)]
    compiler: Option<String>,
}

#[derive(Args, Default)]
struct CopyArgs {
    /// Program to run as the compiler instead of "npx tstl".
    #[arg(long)]
    compiler: Option<String>,
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn current_dir() -> Result<PathBuf, MonitorError> {
    std::env::current_dir().map_err(MonitorError::CurrentDir)
}

async fn run_monitor(args: MonitorArgs) -> Result<(), MonitorError> {
    let mut options = MonitorOptions::new(current_dir()?);
    options.overrides = ConfigOverrides {
        mods_directory: args.mods_directory,
        save_slot: args.save_slot.and_then(SaveSlot::new),
        dev: args.dev.then_some(true),
    };
    options.skip_project_checks = args.skip_project_checks;
    options.watcher_mod_source_dir = args.watcher_mod;
    if let Some(program) = args.compiler {
        options.compiler = CompilerProcessBuilder::new(program);
    }

    tracing::info!(project = %options.project_root.display(), "Starting monitor");
    let monitor = Monitor::prepare(&options)?;
    monitor.run(CancellationToken::new()).await
}

async fn run_copy(args: CopyArgs) -> Result<(), MonitorError> {
    let mut options = CopyOptions::new(current_dir()?);
    if let Some(program) = args.compiler {
        options.compiler = CompilerProcessBuilder::new(program);
    }
    copy_mod(&options).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        None => run_monitor(MonitorArgs::default()).await,
        Some(Commands::Monitor(args)) => run_monitor(args).await,
        Some(Commands::Copy(args)) => run_copy(args).await,
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "Fatal error");
        display::print_fatal(&e.to_string());
        std::process::exit(1);
    }
}
