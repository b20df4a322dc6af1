//! wbscope: entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use wbscope::ScoutConfig;
use wbscope_cli::commands::ids_cmd::{self, IdsArgs};
use wbscope_cli::commands::sales_cmd::{self, SalesArgs};
use wbscope_cli::commands::search_cmd::{self, SearchArgs};
use wbscope_cli::RunContext;

#[derive(Parser)]
#[command(
    name = "wbscope",
    about = "Wildberries catalog search with Mayak sales analytics",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Suppress status lines; only results are printed.
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog and list product ids.
    Search(SearchArgs),

    /// Search the catalog and enrich results with sales data.
    Sales(SalesArgs),

    /// Fetch sales data for explicit product ids.
    Ids(IdsArgs),

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   wbscope completions bash > ~/.local/share/bash-completion/completions/wbscope
    ///   wbscope completions zsh > ~/.zfunc/_wbscope
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet { "error" } else { cli.log_level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let ctx = RunContext {
        config: ScoutConfig::from_env(),
        quiet: cli.quiet,
    };

    if let Err(e) = run(&ctx, cli.command).await {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(ctx: &RunContext, command: Commands) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    match command {
        Commands::Search(args) => search_cmd::run(ctx, &args, &mut stdout).await,
        Commands::Sales(args) => sales_cmd::run(ctx, &args, &mut stdout).await,
        Commands::Ids(args) => ids_cmd::run(ctx, &args, &mut stdout).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "wbscope", &mut stdout);
            Ok(())
        }
    }
}
