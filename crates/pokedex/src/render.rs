use crate::prelude::*;
use colored::Colorize;
use pokedex_core::catalog::Facet;
use pokedex_core::output::ResultOutput;

/// Number of placeholder rows shown while results load
const SKELETON_ROWS: usize = 5;

/// Build the type catalog table, marking selected types
pub fn types_table(facets: &[Facet], selected: &[u32]) -> prettytable::Table {
    let mut table = new_table();
    table.set_titles(prettytable::row!["Type", "Value", "Selected"]);

    for facet in facets {
        let value = facet
            .value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let marker = match facet.value {
            Some(v) if selected.contains(&v) => "*",
            _ => "",
        };
        table.add_row(prettytable::row![facet.name, value, marker]);
    }

    table
}

/// Convert result output to JSON string
pub fn format_result_json(output: &ResultOutput) -> Result<String> {
    serde_json::to_string_pretty(output).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn header(output: &ResultOutput) -> String {
    let mut result = String::new();
    let types = if output.selected_types.is_empty() {
        "ALL TYPES".to_string()
    } else {
        output
            .selected_types
            .iter()
            .map(|t| t.name.to_uppercase())
            .collect::<Vec<_>>()
            .join(" + ")
    };

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!(
        "{}\n",
        format!("POKÉMON · {types}").bright_cyan().bold()
    ));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));
    result
}

/// Placeholder shown while the current page is in flight
pub fn format_loading_text(output: &ResultOutput) -> String {
    let mut result = header(output);
    result.push_str(&format!(
        "\n{} Results Found\n\n",
        output.total_count.to_string().bright_white().bold()
    ));
    for _ in 0..SKELETON_ROWS {
        result.push_str(&format!(
            "  {}  {}\n",
            "▒▒▒▒".bright_black(),
            "▒".repeat(24).bright_black()
        ));
    }
    result
}

/// Convert result output to formatted text with colors
pub fn format_result_text(output: &ResultOutput) -> String {
    let mut result = header(output);

    if let Some(error) = &output.error {
        result.push_str(&format!(
            "\n{} {}\n",
            "Failed to load results:".red().bold(),
            error.red()
        ));
        return result;
    }

    result.push_str(&format!(
        "\n{} Results Found\n",
        output.total_count.to_string().bright_white().bold()
    ));

    if output.items.is_empty() {
        result.push_str(&format!("\n{}\n", "No Result Found".yellow()));
    } else {
        let offset = (output.pagination.current_page.saturating_sub(1) as usize)
            * output.pagination.limit;
        for (idx, item) in output.items.iter().enumerate() {
            let id = item
                .id
                .map(|id| format!("#{id}"))
                .unwrap_or_else(|| "#?".to_string());
            result.push_str(&format!(
                "\n{} {} {}\n",
                format!("[{}]", offset + idx + 1).yellow().bold(),
                item.name.white().bold(),
                id.bright_black()
            ));
            if let Some(artwork) = &item.artwork_url {
                result.push_str(&format!(
                    "    {}: {}\n",
                    "Artwork".green(),
                    artwork.cyan().underline()
                ));
            }
        }
    }

    if output.total_count > 0 {
        result.push_str(&format!(
            "\n{} {} {} {}\n",
            "Page".bright_white(),
            output.pagination.current_page.to_string().bright_cyan().bold(),
            "of".bright_white(),
            output.pagination.total_pages.to_string().bright_cyan().bold(),
        ));
    }

    result
}
