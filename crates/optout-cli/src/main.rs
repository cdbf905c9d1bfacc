mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::run::RunArgs;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "optout",
    about = "Disable telemetry for developer tools in one pass",
    version,
    propagate_version = true,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    /// Output as JSON
    #[arg(long, global = true, short = 'j', env = "OPTOUT_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the opt-out catalog
    List {
        /// Include actions gated to other platforms
        #[arg(long)]
        all: bool,
    },

    /// Show the detected platform
    Platform,
}

fn main() {
    let cli = Cli::parse();

    // A quiet run prints nothing at all, diagnostics included.
    let default_level = if cli.run.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        None => cmd::run::run(&cli.run, cli.json),
        Some(Commands::List { all }) => cmd::list::run(all, cli.json),
        Some(Commands::Platform) => cmd::platform::run(cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
