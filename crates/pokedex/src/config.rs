use crate::prelude::*;
use std::time::Duration;

use crate::cache::RetryPolicy;

/// Runtime configuration resolved from global CLI arguments and environment
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: reqwest::Url,
    pub artwork_url: String,
    pub timeout: Duration,
    pub stale_after: Duration,
    pub retry: RetryPolicy,
    pub verbose: bool,
}

impl Config {
    pub fn from_global(global: &crate::Global) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(&global.base_url)?,
            artwork_url: global.artwork_url.clone(),
            timeout: Duration::from_secs(global.timeout),
            stale_after: Duration::from_secs(global.stale_after),
            retry: RetryPolicy::new(global.retries),
            verbose: global.verbose,
        })
    }
}

/// Parse the API base URL, making sure relative paths join under it
fn parse_base_url(raw: &str) -> Result<reqwest::Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };

    let url = reqwest::Url::parse(&normalized)
        .with_context(|| format!("Invalid API base URL: {raw}"))?;

    if url.cannot_be_a_base() {
        return Err(eyre!("API base URL cannot be used as a base: {}", raw));
    }

    Ok(url)
}
