use crate::prelude::*;
use clap::Parser;
use pokedex_core::catalog::{DEFAULT_API_BASE, DEFAULT_ARTWORK_BASE};

mod browse;
mod cache;
mod catalog;
mod client;
mod config;
mod error;
mod list;
mod prelude;
mod render;
mod types;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Browse the PokeAPI catalog, filtered by one or more Pokémon types"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// PokeAPI base URL
    #[clap(long, env = "POKEDEX_BASE_URL", global = true, default_value = DEFAULT_API_BASE)]
    base_url: String,

    /// Base URL for official artwork images
    #[clap(long, env = "POKEDEX_ARTWORK_URL", global = true, default_value = DEFAULT_ARTWORK_BASE)]
    artwork_url: String,

    /// Upper bound for a single request, in seconds
    #[clap(long, env = "POKEDEX_TIMEOUT", global = true, default_value = "300")]
    timeout: u64,

    /// Seconds before cached results are fetched again
    #[clap(long, env = "POKEDEX_STALE_AFTER", global = true, default_value = "300")]
    stale_after: u64,

    /// Retries for failed requests (the type catalog is never retried)
    #[clap(long, env = "POKEDEX_RETRIES", global = true, default_value = "3")]
    retries: u32,

    /// Whether to display additional information.
    #[clap(long, env = "POKEDEX_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// List the Pokémon types available as filters
    Types(crate::types::TypesOptions),

    /// Show one page of Pokémon, optionally filtered by type
    List(crate::list::ListOptions),

    /// Interactive browser: toggle types and page through results
    Browse(crate::browse::BrowseOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Types(options) => crate::types::run(options, app.global).await,
        SubCommands::List(options) => crate::list::run(options, app.global).await,
        SubCommands::Browse(options) => crate::browse::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
