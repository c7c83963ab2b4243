use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use log::debug;
use pokedex_core::catalog::{resolve_facet, Facet};
use pokedex_core::session::Session;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::catalog::Catalog;
use crate::client::Transport;
use crate::config::Config;
use crate::list::result_output;
use crate::render::{format_loading_text, format_result_text, types_table};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct BrowseOptions {
    /// Types selected when the session starts (name or id, repeatable)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub types: Vec<String>,
}

/// A command typed at the browse prompt
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Toggle(String),
    Clear,
    Next,
    Prev,
    Goto(usize),
    Types,
    Help,
    Quit,
}

/// What the loop does after applying a command
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Refresh,
    Message(String),
    ShowTypes,
    Quit,
}

fn parse_command(line: &str) -> std::result::Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };
    let rest = parts.collect::<Vec<_>>().join(" ");

    let command = match verb.to_lowercase().as_str() {
        "t" | "toggle" if !rest.is_empty() => Command::Toggle(rest),
        "t" | "toggle" => return Err("Usage: toggle <type>".to_string()),
        "c" | "clear" => Command::Clear,
        "n" | "next" => Command::Next,
        "p" | "prev" => Command::Prev,
        "g" | "goto" => match rest.parse::<usize>() {
            Ok(page) if page >= 1 => Command::Goto(page),
            _ => return Err("Usage: goto <page>, pages start at 1".to_string()),
        },
        "types" => Command::Types,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command: {other} (type 'help')")),
    };

    Ok(Some(command))
}

fn help_text() -> String {
    let mut result = String::new();
    result.push_str(&format!("\n{}\n", "Commands".bright_white().bold()));
    for (command, description) in [
        ("t, toggle <type>", "add or remove a type filter"),
        ("c, clear", "remove every type filter"),
        ("n, next", "next page"),
        ("p, prev", "previous page"),
        ("g, goto <page>", "jump to a page"),
        ("types", "list the available types"),
        ("h, help", "show this help"),
        ("q, quit", "leave the browser"),
    ] {
        result.push_str(&format!("  {:<18} {}\n", command.cyan(), description));
    }
    result
}

struct Browser<T: Transport> {
    catalog: Catalog<T>,
    facets: Vec<Facet>,
    session: Session,
    artwork_base: String,
    last_total: u64,
}

impl<T: Transport> Browser<T> {
    fn new(catalog: Catalog<T>, facets: Vec<Facet>, artwork_base: String) -> Self {
        Self {
            catalog,
            facets,
            session: Session::new(),
            artwork_base,
            last_total: 0,
        }
    }

    fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::Toggle(reference) => {
                if self.facets.is_empty() {
                    return Outcome::Message(
                        "Type catalog unavailable, filtering is disabled".to_string(),
                    );
                }
                match resolve_facet(&self.facets, &reference) {
                    Some(facet) => {
                        self.session.toggle(facet);
                        Outcome::Refresh
                    }
                    None => Outcome::Message(format!("Unknown Pokémon type: {reference}")),
                }
            }
            Command::Clear => {
                self.session.clear();
                Outcome::Refresh
            }
            Command::Next => {
                if self.session.next_page(self.last_total) {
                    Outcome::Refresh
                } else {
                    Outcome::Message("Already on the last page".to_string())
                }
            }
            Command::Prev => {
                if self.session.prev_page() {
                    Outcome::Refresh
                } else {
                    Outcome::Message("Already on the first page".to_string())
                }
            }
            Command::Goto(page) => {
                self.session.set_page(page - 1);
                Outcome::Refresh
            }
            Command::Types => Outcome::ShowTypes,
            Command::Help => Outcome::Message(help_text()),
            Command::Quit => Outcome::Quit,
        }
    }

    /// Render the loading placeholder if the page is still in flight, then the settled page
    async fn refresh(&mut self) {
        debug!(
            "refresh: selected={:?} page={}",
            self.session.selected(),
            self.session.page()
        );

        let request = self.catalog.request(&self.session);
        let view = self.catalog.current_view(&mut self.session);
        if view.is_loading {
            let output = result_output(&self.session, view, &self.facets, &self.artwork_base);
            print!("{}", format_loading_text(&output));
        }

        request.await;
        let view = self.catalog.current_view(&mut self.session);
        self.last_total = view.total_count;
        let output = result_output(&self.session, view, &self.facets, &self.artwork_base);
        print!("{}", format_result_text(&output));
    }
}

pub async fn run(options: BrowseOptions, global: crate::Global) -> Result<()> {
    let config = Config::from_global(&global)?;

    if config.verbose {
        println!("PokeAPI Base: {}", config.base_url);
        println!();
    }

    let catalog = Catalog::connect(&config)?;
    let facets = match catalog.facets().await {
        Ok(facets) => facets,
        Err(e) => {
            eprintln!(
                "{} {}",
                "Type catalog unavailable, filtering is disabled:".yellow(),
                e
            );
            Vec::new()
        }
    };

    let mut browser = Browser::new(catalog, facets, config.artwork_url.clone());
    for reference in &options.types {
        if let Outcome::Message(message) = browser.apply(Command::Toggle(reference.clone())) {
            eprintln!("{}", message.yellow());
        }
    }

    print!("{}", help_text());
    browser.refresh().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n{} ", "pokedex>".bright_cyan().bold());
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{}", message.yellow());
                continue;
            }
        };

        match browser.apply(command) {
            Outcome::Refresh => browser.refresh().await,
            Outcome::Message(message) => println!("{message}"),
            Outcome::ShowTypes => {
                if browser.facets.is_empty() {
                    println!("{}", "No types available".yellow());
                } else {
                    types_table(&browser.facets, browser.session.selected()).printstd();
                }
            }
            Outcome::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RetryPolicy;
    use crate::catalog::tests::{fake_pokeapi, FakeTransport};
    use std::time::Duration;

    async fn browser() -> Browser<FakeTransport> {
        let catalog = Catalog::new(fake_pokeapi(), Duration::from_secs(60), RetryPolicy::none());
        let facets = catalog.facets().await.unwrap();
        Browser::new(catalog, facets, "https://img.example/".to_string())
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("t fire").unwrap(),
            Some(Command::Toggle("fire".to_string()))
        );
        assert_eq!(
            parse_command("toggle  Fire ").unwrap(),
            Some(Command::Toggle("Fire".to_string()))
        );
        assert_eq!(parse_command("n").unwrap(), Some(Command::Next));
        assert_eq!(parse_command("PREV").unwrap(), Some(Command::Prev));
        assert_eq!(parse_command("g 3").unwrap(), Some(Command::Goto(3)));
        assert_eq!(parse_command("q").unwrap(), Some(Command::Quit));
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_command_errors() {
        assert!(parse_command("toggle").is_err());
        assert!(parse_command("goto 0").is_err());
        assert!(parse_command("goto two").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[tokio::test]
    async fn test_toggle_selects_and_resets_page() {
        let mut browser = browser().await;
        browser.session.set_page(3);

        assert_eq!(browser.apply(Command::Toggle("fire".to_string())), Outcome::Refresh);

        assert_eq!(browser.session.selected(), &[10]);
        assert_eq!(browser.session.page(), 0);
    }

    #[tokio::test]
    async fn test_toggle_unknown_type() {
        let mut browser = browser().await;

        let outcome = browser.apply(Command::Toggle("shadow".to_string()));

        assert_eq!(
            outcome,
            Outcome::Message("Unknown Pokémon type: shadow".to_string())
        );
        assert!(browser.session.selected().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_without_catalog_is_disabled() {
        let catalog = Catalog::new(fake_pokeapi(), Duration::from_secs(60), RetryPolicy::none());
        let mut browser = Browser::new(catalog, Vec::new(), String::new());

        let outcome = browser.apply(Command::Toggle("fire".to_string()));

        assert!(matches!(outcome, Outcome::Message(m) if m.contains("filtering is disabled")));
    }

    #[tokio::test]
    async fn test_next_page_respects_last_total() {
        let mut browser = browser().await;
        browser.refresh().await;
        assert_eq!(browser.last_total, 1302);

        assert_eq!(browser.apply(Command::Next), Outcome::Refresh);
        assert_eq!(browser.session.page(), 1);

        browser.apply(Command::Toggle("fire".to_string()));
        browser.refresh().await;
        assert_eq!(browser.last_total, 2);
        assert_eq!(
            browser.apply(Command::Next),
            Outcome::Message("Already on the last page".to_string())
        );
    }

    #[tokio::test]
    async fn test_prev_and_goto() {
        let mut browser = browser().await;

        assert!(matches!(browser.apply(Command::Prev), Outcome::Message(_)));
        assert_eq!(browser.apply(Command::Goto(4)), Outcome::Refresh);
        assert_eq!(browser.session.page(), 3);
        assert_eq!(browser.apply(Command::Prev), Outcome::Refresh);
        assert_eq!(browser.session.page(), 2);
    }

    #[tokio::test]
    async fn test_clear_and_quit() {
        let mut browser = browser().await;
        browser.apply(Command::Toggle("fire".to_string()));

        assert_eq!(browser.apply(Command::Clear), Outcome::Refresh);
        assert!(browser.session.selected().is_empty());
        assert_eq!(browser.apply(Command::Quit), Outcome::Quit);
        assert_eq!(browser.apply(Command::Types), Outcome::ShowTypes);
    }
}
