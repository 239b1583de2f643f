use crate::config::SessionConfig;
use async_trait::async_trait;

/// Handle to an element found by a previous `find_elements` call. Handles
/// are only valid until the next navigation on the same backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u32);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
    pub status: u16, // generic status code (e.g. 200)
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum BackendError {
    #[error("Browser binary not found: {0}")]
    BrowserUnavailable(String),

    #[error("Launch failed: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element {id} not found")]
    ElementNotFound { id: ElementId },

    #[error("Element lookup failed: {0}")]
    Lookup(String),

    #[error("Interaction failed: {0}")]
    Interaction(String),

    #[error("Not ready")]
    NotReady,

    #[error("Other: {0}")]
    Other(String),
}

/// The Backend trait is the capability seam between the resolver and the
/// browser. The real implementation drives Chromium over CDP; tests inject
/// a scripted double.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Launch the backend (start browser process, open a page).
    async fn launch(&mut self, config: &SessionConfig) -> Result<(), BackendError>;

    /// Close the backend and clean up resources. Must be safe to call on a
    /// backend that never launched.
    async fn close(&mut self) -> Result<(), BackendError>;

    /// Check if the backend is ready to accept commands.
    async fn is_ready(&self) -> bool;

    /// Navigate the page to a specific URL. Invalidates element handles.
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError>;

    /// The URL the page currently shows (after any redirects).
    async fn current_url(&mut self) -> Result<String, BackendError>;

    /// All elements matching a CSS selector, in document order. An empty
    /// match is `Ok(vec![])`, not an error.
    async fn find_elements(&mut self, selector: &str) -> Result<Vec<ElementId>, BackendError>;

    /// Click a previously found element.
    async fn click(&mut self, element: ElementId) -> Result<(), BackendError>;

    /// Read an attribute (or property such as `value`) of an element.
    async fn read_attribute(
        &mut self,
        element: ElementId,
        name: &str,
    ) -> Result<Option<String>, BackendError>;
}
