//! Construction of the final data-API URL from either extraction source:
//! the generated template in the export panel, or the dataset page URL.

use crate::portal::PORTAL_HOST;
use thiserror::Error;

/// Templates look like `https://host/api/odata/v4/<id>`: scheme, empty
/// authority separator, host, then path. The resource id sits in the
/// seventh `/`-delimited component.
pub const MIN_TEMPLATE_SEGMENTS: usize = 7;
const RESOURCE_ID_SEGMENT: usize = 6;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("endpoint field is empty")]
    Empty,

    #[error("endpoint template has {0} segments, expected at least {MIN_TEMPLATE_SEGMENTS}")]
    TooFewSegments(usize),

    #[error("page URL exposes no dataset identifier: {0}")]
    NoIdentifier(String),
}

/// A dataset located on the portal, ready to be turned into a fetchable
/// `/resource/<id>.json` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub base: String,
    pub resource_id: String,
}

impl ResolvedEndpoint {
    /// Parse the value of the export panel's endpoint field. The first
    /// three `/`-delimited components carry scheme and host; the seventh
    /// is the resource id.
    pub fn from_template(value: &str) -> Result<Self, TemplateError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(TemplateError::Empty);
        }
        let components: Vec<&str> = value.split('/').collect();
        if components.len() < MIN_TEMPLATE_SEGMENTS {
            return Err(TemplateError::TooFewSegments(components.len()));
        }
        Ok(Self {
            base: components[..3].join("/"),
            resource_id: components[RESOURCE_ID_SEGMENT].to_string(),
        })
    }

    /// Infer the resource id from a dataset page URL without touching the
    /// page UI: the id is the second-to-last path segment
    /// (`.../<id>/about_data`).
    pub fn from_page_url(url: &str) -> Result<Self, TemplateError> {
        let segments: Vec<&str> = url.trim_end_matches('/').split('/').collect();
        let id = segments
            .len()
            .checked_sub(2)
            .and_then(|i| segments.get(i))
            .copied()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TemplateError::NoIdentifier(url.to_string()))?;
        Ok(Self {
            base: PORTAL_HOST.to_string(),
            resource_id: id.to_string(),
        })
    }

    /// Render the fetchable URL with record limit and app token attached.
    /// The token comes from the caller's environment and must never be
    /// logged; callers log `resource_id` instead.
    pub fn url(&self, record_limit: u32, app_token: &str) -> String {
        format!(
            "{}/resource/{}.json?$limit={}&$$app_token={}",
            self.base, self.resource_id, record_limit, app_token
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_with_seven_segments_parses() {
        let endpoint =
            ResolvedEndpoint::from_template("https://www.datos.gov.co/api/odata/v4/abcd-1234")
                .unwrap();
        assert_eq!(endpoint.base, "https://www.datos.gov.co");
        assert_eq!(endpoint.resource_id, "abcd-1234");
    }

    #[test]
    fn template_keeps_original_host() {
        let endpoint =
            ResolvedEndpoint::from_template("https://other.example/api/odata/v4/xy12-zz34")
                .unwrap();
        assert_eq!(endpoint.base, "https://other.example");
    }

    #[test]
    fn short_template_is_rejected() {
        assert_eq!(
            ResolvedEndpoint::from_template("https://www.datos.gov.co/resource/abcd-1234.json"),
            Err(TemplateError::TooFewSegments(5))
        );
    }

    #[test]
    fn empty_template_is_rejected() {
        assert_eq!(ResolvedEndpoint::from_template("   "), Err(TemplateError::Empty));
    }

    #[test]
    fn page_url_uses_second_to_last_segment() {
        let endpoint = ResolvedEndpoint::from_page_url(
            "https://www.datos.gov.co/Educaci-n/Colegios-Bogota/abcd-1234/about_data",
        )
        .unwrap();
        assert_eq!(endpoint.resource_id, "abcd-1234");
        assert_eq!(endpoint.base, PORTAL_HOST);
    }

    #[test]
    fn page_url_ignores_trailing_slash() {
        let endpoint =
            ResolvedEndpoint::from_page_url("https://www.datos.gov.co/d/abcd-1234/about_data/")
                .unwrap();
        assert_eq!(endpoint.resource_id, "abcd-1234");
    }

    #[test]
    fn bare_page_url_has_no_identifier() {
        assert!(matches!(
            ResolvedEndpoint::from_page_url("https:/"),
            Err(TemplateError::NoIdentifier(_))
        ));
    }

    #[test]
    fn url_carries_limit_and_token() {
        let endpoint = ResolvedEndpoint {
            base: "https://www.datos.gov.co".into(),
            resource_id: "abcd-1234".into(),
        };
        assert_eq!(
            endpoint.url(5, "tok"),
            "https://www.datos.gov.co/resource/abcd-1234.json?$limit=5&$$app_token=tok"
        );
    }
}
