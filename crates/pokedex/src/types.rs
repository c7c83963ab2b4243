use crate::prelude::{println, *};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::render::types_table;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct TypesOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: TypesOptions, global: crate::Global) -> Result<()> {
    let config = Config::from_global(&global)?;

    if config.verbose {
        println!("PokeAPI Base: {}", config.base_url);
        println!();
    }

    let catalog = Catalog::connect(&config)?;
    let facets = catalog
        .facets()
        .await
        .map_err(|e| eyre!("Failed to fetch Pokémon types: {}", e))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&facets)?);
    } else {
        types_table(&facets, &[]).printstd();
    }

    Ok(())
}
