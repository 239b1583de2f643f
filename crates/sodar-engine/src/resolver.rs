//! Candidate iteration over the portal's search results. One resolution
//! walks the listing in display order and returns the first dataset whose
//! extraction flow yields a well-formed endpoint; every per-candidate
//! failure is absorbed and logged.

use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use sodar_core::backend::{Backend, BackendError, ElementId};

use crate::endpoint::{ResolvedEndpoint, TemplateError};
use crate::portal;

/// Which extraction flow to run on each candidate page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Drive the portal's export UI: download button, "API" format toggle,
    /// then read the generated endpoint field. Authoritative for the
    /// portal's current forge-component markup.
    #[default]
    ExportFlow,
    /// Infer the resource id from the dataset page URL without touching
    /// the UI. Fallback for pages where the export panel never renders.
    UrlPattern,
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Upper bound on candidates tried per resolution (listing order).
    pub max_candidates: usize,
    /// `$limit` value for the final data request.
    pub record_limit: u32,
    pub strategy: Strategy,
    /// How long to poll for an expected element before giving up on it.
    pub element_timeout: Duration,
    pub poll_interval: Duration,
    /// Extra fixed pause after each navigation, for pages where element
    /// polling alone proves flaky. Zero by default.
    pub settle_delay: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_candidates: 5,
            record_limit: 5,
            strategy: Strategy::default(),
            element_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
            settle_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No datasets found for the given search query")]
    NoResults,

    #[error("Could not extract API URL from any of the found datasets")]
    Exhausted,

    #[error("Could not start Chrome browser - {0}")]
    Launch(BackendError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Why one candidate was skipped. Never crosses the resolver boundary;
/// these are logged and the next candidate is tried.
#[derive(Debug, Error)]
enum CandidateError {
    #[error("timed out waiting for {needed} `{selector}` element(s), found {found}")]
    Timeout {
        selector: String,
        needed: usize,
        found: usize,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Resolve a search term to a fetchable data-API URL on an already
    /// launched backend. The app token is appended verbatim to the result
    /// and never logged.
    pub async fn resolve<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        query: &str,
        app_token: &str,
    ) -> Result<String, ResolveError> {
        let search = portal::search_url(query);
        info!(url = %search, "searching portal listing");
        backend.navigate(&search).await?;
        self.settle().await;

        let anchors = self
            .wait_for(backend, portal::LISTING_LINK, 1)
            .await
            .map_err(|_| ResolveError::NoResults)?;

        let candidates = self.collect_candidates(backend, anchors).await;
        if candidates.is_empty() {
            return Err(ResolveError::NoResults);
        }
        info!(count = candidates.len(), "candidate datasets collected");

        for (index, href) in candidates.iter().enumerate() {
            info!(candidate = index + 1, url = %href, "trying candidate dataset");
            match self.try_candidate(backend, href).await {
                Ok(endpoint) => {
                    info!(
                        candidate = index + 1,
                        resource = %endpoint.resource_id,
                        "extracted resource identifier"
                    );
                    return Ok(endpoint.url(self.config.record_limit, app_token));
                }
                Err(reason) => {
                    warn!(candidate = index + 1, %reason, "candidate failed, moving on");
                }
            }
        }
        Err(ResolveError::Exhausted)
    }

    /// Read the detail-page hrefs off the listing anchors, keeping display
    /// order and the configured bound. Anchors without an href are dropped.
    async fn collect_candidates<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        anchors: Vec<ElementId>,
    ) -> Vec<String> {
        let mut candidates = Vec::new();
        for id in anchors.into_iter().take(self.config.max_candidates) {
            match backend.read_attribute(id, "href").await {
                Ok(Some(href)) if !href.is_empty() => candidates.push(href),
                Ok(_) => debug!(element = %id, "listing anchor without href"),
                Err(error) => warn!(element = %id, %error, "failed to read listing anchor"),
            }
        }
        candidates
    }

    async fn try_candidate<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        href: &str,
    ) -> Result<ResolvedEndpoint, CandidateError> {
        backend.navigate(href).await?;
        self.settle().await;

        match self.config.strategy {
            Strategy::ExportFlow => self.export_flow(backend).await,
            Strategy::UrlPattern => {
                let url = backend.current_url().await?;
                Ok(ResolvedEndpoint::from_page_url(&url)?)
            }
        }
    }

    /// The UI-driven flow: open the download panel, switch it to the API
    /// export format, read the generated endpoint template.
    async fn export_flow<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
    ) -> Result<ResolvedEndpoint, CandidateError> {
        let buttons = self.wait_for(backend, portal::DOWNLOAD_BUTTON, 1).await?;
        backend.click(buttons[0]).await?;

        // A panel with fewer than two toggles cannot carry the API format;
        // the wait bound also makes the index below panic-free.
        let toggles = self
            .wait_for(backend, portal::EXPORT_TOGGLE, portal::API_TOGGLE_INDEX + 1)
            .await?;
        backend.click(toggles[portal::API_TOGGLE_INDEX]).await?;

        let fields = self.wait_for(backend, portal::API_ENDPOINT_FIELD, 1).await?;
        let value = backend
            .read_attribute(fields[0], "value")
            .await?
            .unwrap_or_default();
        Ok(ResolvedEndpoint::from_template(&value)?)
    }

    /// Poll for at least `needed` matches of `selector` until the element
    /// timeout elapses. Lookup errors are treated as "not there yet"; the
    /// first probe always runs even with a zero timeout.
    async fn wait_for<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        selector: &str,
        needed: usize,
    ) -> Result<Vec<ElementId>, CandidateError> {
        let deadline = Instant::now() + self.config.element_timeout;
        let mut found = 0;
        loop {
            match backend.find_elements(selector).await {
                Ok(elements) if elements.len() >= needed => {
                    debug!(selector, count = elements.len(), "elements present");
                    return Ok(elements);
                }
                Ok(elements) => found = elements.len(),
                Err(error) => debug!(selector, %error, "element lookup failed, retrying"),
            }
            if Instant::now() >= deadline {
                return Err(CandidateError::Timeout {
                    selector: selector.to_string(),
                    needed,
                    found,
                });
            }
            sleep(self.config.poll_interval).await;
        }
    }

    async fn settle(&self) {
        if !self.config.settle_delay.is_zero() {
            sleep(self.config.settle_delay).await;
        }
    }
}
