//! Markup and URL conventions of the datos.gov.co portal. Nothing here is
//! meant to generalize to other Socrata installations.

use url::form_urlencoded;

pub const PORTAL_HOST: &str = "https://www.datos.gov.co";

/// Anchor rendered for each dataset in the search-results listing.
pub const LISTING_LINK: &str = ".entry-name-link";

/// The primary "Descargar" action on a dataset detail page.
pub const DOWNLOAD_BUTTON: &str = "forge-button";

/// Export-format toggles shown after the download action.
pub const EXPORT_TOGGLE: &str = "forge-button-toggle";

/// Ordinal of the "API" toggle within the export panel (second control).
pub const API_TOGGLE_INDEX: usize = 1;

/// Input carrying the generated API URL template.
pub const API_ENDPOINT_FIELD: &str = "#api-endpoint";

pub fn search_url(query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{PORTAL_HOST}/browse?sortBy=relevance&pageSize=20&q={encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_encodes_query() {
        assert_eq!(
            search_url("calidad del aire"),
            "https://www.datos.gov.co/browse?sortBy=relevance&pageSize=20&q=calidad+del+aire"
        );
    }

    #[test]
    fn search_url_passes_plain_terms_through() {
        assert_eq!(
            search_url("educacion"),
            "https://www.datos.gov.co/browse?sortBy=relevance&pageSize=20&q=educacion"
        );
    }
}
