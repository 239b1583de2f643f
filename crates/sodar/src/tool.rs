//! The outermost tool surface: `fetch_data` speaks the plain string
//! contract (a URL string, or `Error: <reason>`) that callers
//! pattern-match on. Everything beneath it is typed.

use std::env;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use sodar_core::config::SessionConfig;
use sodar_engine::resolver::{ResolveError, Resolver, ResolverConfig, Strategy};
use sodar_engine::session::resolve_with_session;
use sodar_h::HeadlessBackend;

#[derive(Debug, Clone)]
pub struct ToolOptions {
    pub session: SessionConfig,
    pub resolver: ResolverConfig,
    pub app_token: Option<String>,
}

impl ToolOptions {
    /// Read `APP_TOKEN` and `HEADLESS_MODE` from the environment (after
    /// any `.env` load) and fold in the CLI flags. A missing token is kept
    /// as `None` so `fetch_data` can fail with the contract string before
    /// any browser work.
    pub fn from_env(
        visible: bool,
        candidates: usize,
        records: u32,
        strategy: Strategy,
        settle_ms: u64,
    ) -> Self {
        let headless = !visible && parse_headless(env::var("HEADLESS_MODE").ok().as_deref());
        Self {
            session: SessionConfig {
                headless,
                ..SessionConfig::default()
            },
            resolver: ResolverConfig {
                max_candidates: candidates,
                record_limit: records,
                strategy,
                settle_delay: Duration::from_millis(settle_ms),
                ..ResolverConfig::default()
            },
            app_token: env::var("APP_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }
}

/// `HEADLESS_MODE` unset defaults to headless; only an explicit truthy
/// value keeps it on once set.
fn parse_headless(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => {
            let normalized = v.trim().to_ascii_lowercase();
            matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("APP_TOKEN not found in environment variables")]
    MissingToken,

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Invalid URL returned from webscrape: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Fetch(#[from] reqwest::Error),
}

/// Resolve the search term to an API endpoint, fetch one page of records,
/// and return the raw response body. All failures come back as
/// `Error: <reason>`; no error crosses this boundary any other way.
pub async fn fetch_data(query: &str, options: &ToolOptions) -> String {
    match run(query, options).await {
        Ok(body) => body,
        Err(e) => format!("Error: {e}"),
    }
}

async fn run(query: &str, options: &ToolOptions) -> Result<String, ToolError> {
    // Token check comes first: zero browser launches without it.
    let token = options.app_token.as_deref().ok_or(ToolError::MissingToken)?;

    let resolver = Resolver::new(options.resolver.clone());
    let mut backend = HeadlessBackend::new();
    let endpoint =
        resolve_with_session(&mut backend, &options.session, &resolver, query, token).await?;

    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(ToolError::InvalidUrl(endpoint));
    }

    info!("fetching resolved endpoint");
    let response = reqwest::get(&endpoint).await?.error_for_status()?;
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_contract_string() {
        assert_eq!(
            format!("Error: {}", ToolError::MissingToken),
            "Error: APP_TOKEN not found in environment variables"
        );
    }

    #[test]
    fn no_results_contract_string() {
        assert_eq!(
            format!("Error: {}", ToolError::Resolve(ResolveError::NoResults)),
            "Error: No datasets found for the given search query"
        );
    }

    #[test]
    fn exhaustion_contract_string() {
        assert_eq!(
            format!("Error: {}", ToolError::Resolve(ResolveError::Exhausted)),
            "Error: Could not extract API URL from any of the found datasets"
        );
    }

    #[test]
    fn invalid_url_contract_string() {
        assert_eq!(
            format!("Error: {}", ToolError::InvalidUrl("ftp://x".into())),
            "Error: Invalid URL returned from webscrape: ftp://x"
        );
    }

    #[test]
    fn headless_defaults_on_and_respects_truthy_values() {
        assert!(parse_headless(None));
        assert!(parse_headless(Some("True")));
        assert!(parse_headless(Some("1")));
        assert!(!parse_headless(Some("false")));
        assert!(!parse_headless(Some("garbage")));
    }
}
