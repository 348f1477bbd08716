//! Citation and bibliography rendering endpoints.

use crate::client::ZoteroClient;
use crate::error::{Result, ZoteroError};
use crate::parse::{parse_bibliography_response, parse_citation_response};
use crate::types::CitationStyle;

impl ZoteroClient {
    /// Render a citation for one item in the given style.
    ///
    /// Returns the server-rendered XHTML fragment, guaranteed non-empty.
    /// An unknown (but well-formed) style surfaces the upstream error.
    pub async fn citation(&self, item_key: &str, style: &CitationStyle) -> Result<String> {
        let body = self
            .get(
                &format!("/items/{}", item_key),
                &[("include", "citation"), ("style", style.as_str())],
            )
            .await?;
        parse_citation_response(&body)
    }

    /// Render a bibliography for a set of items in the given style.
    pub async fn bibliography(&self, item_keys: &[&str], style: &CitationStyle) -> Result<String> {
        if item_keys.is_empty() {
            return Err(ZoteroError::InvalidArgument(
                "bibliography requires at least one item key".to_string(),
            ));
        }

        let keys = item_keys.join(",");
        let body = self
            .get(
                "/items",
                &[
                    ("itemKey", keys.as_str()),
                    ("format", "bib"),
                    ("style", style.as_str()),
                ],
            )
            .await?;
        parse_bibliography_response(&body)
    }
}
