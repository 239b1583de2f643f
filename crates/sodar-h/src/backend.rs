use std::collections::HashMap;

use async_trait::async_trait;
use chromiumoxide::Element;
use chromiumoxide::Page;
use chromiumoxide::error::CdpError;
use tracing::debug;

use sodar_core::backend::{Backend, BackendError, ElementId, NavigationResult};
use sodar_core::config::SessionConfig;

use crate::cdp::CdpClient;

/// `Backend` implementation over a live Chromium session. Element handles
/// map to CDP remote objects and are dropped on every navigation.
pub struct HeadlessBackend {
    client: Option<CdpClient>,
    elements: HashMap<u32, Element>,
    next_element_id: u32,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            client: None,
            elements: HashMap::new(),
            next_element_id: 0,
        }
    }

    pub fn get_client(&self) -> Option<&CdpClient> {
        self.client.as_ref()
    }

    fn page(&self) -> Result<Page, BackendError> {
        Ok(self
            .client
            .as_ref()
            .ok_or(BackendError::NotReady)?
            .page
            .clone())
    }

    fn element(&self, id: ElementId) -> Result<&Element, BackendError> {
        self.elements
            .get(&id.0)
            .ok_or(BackendError::ElementNotFound { id })
    }

    fn register(&mut self, found: Vec<Element>) -> Vec<ElementId> {
        let mut ids = Vec::with_capacity(found.len());
        for element in found {
            let id = self.next_element_id;
            self.next_element_id += 1;
            self.elements.insert(id, element);
            ids.push(ElementId(id));
        }
        ids
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for HeadlessBackend {
    async fn launch(&mut self, config: &SessionConfig) -> Result<(), BackendError> {
        if self.client.is_some() {
            return Ok(());
        }
        self.client = Some(CdpClient::launch(config).await?);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        self.elements.clear();
        if let Some(client) = self.client.take() {
            client.close().await?;
        }
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.client.is_some()
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, BackendError> {
        self.elements.clear();
        let page = self.page()?;

        debug!("Navigating to: {}", url);
        page.goto(url)
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?;

        let title = page
            .get_title()
            .await
            .unwrap_or_default()
            .unwrap_or_default();
        let current = page
            .url()
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?
            .unwrap_or_else(|| url.to_string());

        Ok(NavigationResult {
            url: current,
            title,
            status: 200, // assumed when navigation raised no error
        })
    }

    async fn current_url(&mut self) -> Result<String, BackendError> {
        let page = self.page()?;
        page.url()
            .await
            .map_err(|e| BackendError::Navigation(e.to_string()))?
            .ok_or_else(|| BackendError::Other("page reports no URL".into()))
    }

    async fn find_elements(&mut self, selector: &str) -> Result<Vec<ElementId>, BackendError> {
        let page = self.page()?;
        match page.find_elements(selector).await {
            Ok(found) => Ok(self.register(found)),
            // chromiumoxide reports an empty match as NotFound.
            Err(CdpError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(BackendError::Lookup(e.to_string())),
        }
    }

    async fn click(&mut self, element: ElementId) -> Result<(), BackendError> {
        let el = self.element(element)?;
        el.click()
            .await
            .map_err(|e| BackendError::Interaction(e.to_string()))?;
        Ok(())
    }

    async fn read_attribute(
        &mut self,
        element: ElementId,
        name: &str,
    ) -> Result<Option<String>, BackendError> {
        let el = self.element(element)?;

        // DOM property first: generated input values and absolute hrefs
        // only exist as properties, not as HTML attributes.
        let js = format!("function() {{ return this[{name:?}]; }}");
        let returned = el
            .call_js_fn(&js, false)
            .await
            .map_err(|e| BackendError::Lookup(e.to_string()))?;
        if let Some(value) = returned.result.value.as_ref().and_then(|v| v.as_str()) {
            return Ok(Some(value.to_string()));
        }

        el.attribute(name)
            .await
            .map_err(|e| BackendError::Lookup(e.to_string()))
    }
}
