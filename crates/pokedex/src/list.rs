use crate::prelude::{println, *};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pokedex_core::aggregate::ResultView;
use pokedex_core::catalog::{resolve_facet, Facet};
use pokedex_core::output::{build_result_output, selected_facets, ResultOutput};
use pokedex_core::session::Session;

use crate::catalog::Catalog;
use crate::client::Transport;
use crate::config::Config;
use crate::render::{format_result_json, format_result_text};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ListOptions {
    /// Pokémon type name or id; repeat to require every given type
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub types: Vec<String>,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let config = Config::from_global(&global)?;

    if config.verbose {
        println!("PokeAPI Base: {}", config.base_url);
        println!();
    }

    let page = to_page_index(options.page)?;
    let catalog = Catalog::connect(&config)?;

    let spinner = (!options.json).then(|| {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Fetching Pokémon...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        spinner
    });

    let output = list_data(&catalog, &options.types, page, &config.artwork_url).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let output = output?;

    if options.json {
        println!("{}", format_result_json(&output)?);
    } else {
        print!("{}", format_result_text(&output));
        print!("{}", format_navigation(&output, &options));
    }

    Ok(())
}

/// Convert a 1-based page number into the internal page index
fn to_page_index(page: usize) -> Result<usize> {
    page.checked_sub(1)
        .ok_or_else(|| eyre!("Page numbers start at 1"))
}

/// Resolve type references against the catalog
pub fn resolve_types(facets: &[Facet], references: &[String]) -> Result<Vec<u32>> {
    references
        .iter()
        .map(|reference| {
            resolve_facet(facets, reference)
                .ok_or_else(|| eyre!("Unknown Pokémon type: {}", reference))
        })
        .collect()
}

/// Build the result output for the session's current state
pub fn result_output(
    session: &Session,
    view: ResultView,
    facets: &[Facet],
    artwork_base: &str,
) -> ResultOutput {
    let pagination = session.page_control(view.total_count);
    let selected = selected_facets(facets, session.selected());
    build_result_output(view, pagination, selected, artwork_base)
}

/// Fetches one page of Pokémon for the given types and returns it as a structured ResultOutput
pub async fn list_data<T: Transport>(
    catalog: &Catalog<T>,
    types: &[String],
    page: usize,
    artwork_base: &str,
) -> Result<ResultOutput> {
    let facets = if types.is_empty() {
        Vec::new()
    } else {
        catalog
            .facets()
            .await
            .map_err(|e| eyre!("Type catalog unavailable, filtering is disabled: {}", e))?
    };

    let selected = resolve_types(&facets, types)?;
    let mut session = Session::with_selection(selected, page);
    let view = catalog.settle(&mut session).await;

    Ok(result_output(&session, view, &facets, artwork_base))
}

fn list_command(options: &ListOptions, page: u64) -> String {
    let mut command = "pokedex list".to_string();
    for t in &options.types {
        command.push_str(&format!(" --type {t}"));
    }
    command.push_str(&format!(" --page {page}"));
    command
}

/// Navigation hints for the one-shot listing
fn format_navigation(output: &ResultOutput, options: &ListOptions) -> String {
    let mut result = String::new();
    if output.total_count == 0 || output.error.is_some() {
        result.push('\n');
        return result;
    }

    let current = output.pagination.current_page;
    let total = output.pagination.total_pages;

    result.push_str(&format!("\n{}:\n", "To navigate".bright_white().bold()));
    if current < total {
        result.push_str(&format!(
            "  {}: {}\n",
            "Next page".green(),
            list_command(options, current + 1).cyan()
        ));
    }
    if current > 1 {
        result.push_str(&format!(
            "  {}: {}\n",
            "Previous page".green(),
            list_command(options, current - 1).cyan()
        ));
    }
    result.push_str(&format!(
        "\n{}:\n  {}\n",
        "To filter by type".bright_white().bold(),
        "pokedex list --type <type> [--type <type>...]  (see: pokedex types)".cyan()
    ));

    result.push('\n');
    result
}
