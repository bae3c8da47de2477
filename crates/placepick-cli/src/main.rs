use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod picker;

#[derive(Debug, Parser)]
#[command(name = "placepick")]
#[command(about = "Pick a place from a local places file")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the candidates a picker would show
    List {
        /// Only show places whose name or address contains this text
        #[arg(long)]
        query: Option<String>,
        /// Maximum number of candidates (defaults to `PLACEPICK_SEARCH_LIMIT`)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Run a picker session and pick the candidate at INDEX
    Pick {
        index: usize,
        #[arg(long)]
        query: Option<String>,
        /// Print the picked place as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a picker session and dismiss it without choosing
    Dismiss,
    /// Validate the places file and report invalid entries
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("placepick ready; see --help");
        return Ok(());
    };

    let config = placepick_core::load_app_config()?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match command {
        Commands::List { query, limit } => {
            picker::run_list(&config, query.as_deref(), limit).await?;
        }
        Commands::Pick { index, query, json } => {
            picker::run_pick(&config, index, query.as_deref(), json).await?;
        }
        Commands::Dismiss => picker::run_dismiss(&config).await?,
        Commands::Check => picker::run_check(&config)?,
    }

    Ok(())
}
