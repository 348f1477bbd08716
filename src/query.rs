//! Type-safe builder for Zotero item-listing parameters.
//!
//! Helps construct the query string shared by the item and collection
//! listing endpoints.
//!
//! # Example
//!
//! ```
//! use zotero_client::ItemsQuery;
//!
//! let params = ItemsQuery::new()
//!     .quick("machine ethics")
//!     .item_type("journalArticle")
//!     .limit(25)
//!     .build();
//! assert!(params.contains(&("q".to_string(), "machine ethics".to_string())));
//! ```

use crate::types::Sort;

/// How the quick-search `q` parameter matches items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Match titles and individual creator fields (the API default).
    TitleCreatorYear,
    /// Match all fields and full-text content.
    Everything,
}

impl QueryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TitleCreatorYear => "titleCreatorYear",
            Self::Everything => "everything",
        }
    }
}

/// Builder for item-listing query parameters.
#[derive(Debug, Clone, Default)]
pub struct ItemsQuery {
    params: Vec<(String, String)>,
}

impl ItemsQuery {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Quick-search text (`q` parameter).
    pub fn quick(mut self, text: &str) -> Self {
        self.params.push(("q".to_string(), text.to_string()));
        self
    }

    /// Set the quick-search mode.
    pub fn mode(mut self, mode: QueryMode) -> Self {
        self.params
            .push(("qmode".to_string(), mode.as_str().to_string()));
        self
    }

    /// Restrict to a single item type (e.g. "journalArticle").
    pub fn item_type(mut self, item_type: &str) -> Self {
        self.params
            .push(("itemType".to_string(), item_type.to_string()));
        self
    }

    /// Restrict to items carrying the given tag. May be repeated.
    pub fn tag(mut self, tag: &str) -> Self {
        self.params.push(("tag".to_string(), tag.to_string()));
        self
    }

    /// Exclude items carrying the given tag.
    pub fn exclude_tag(mut self, tag: &str) -> Self {
        self.params.push(("tag".to_string(), format!("-{}", tag)));
        self
    }

    /// Maximum number of results (the API caps this at 100).
    pub fn limit(mut self, limit: u32) -> Self {
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    /// Offset for pagination.
    pub fn start(mut self, start: u32) -> Self {
        self.params.push(("start".to_string(), start.to_string()));
        self
    }

    /// Sort order; becomes separate `sort` and `direction` parameters.
    pub fn sort(mut self, sort: &Sort) -> Self {
        self.params.push(("sort".to_string(), sort.field.clone()));
        self.params.push((
            "direction".to_string(),
            sort.direction.as_str().to_string(),
        ));
        self
    }

    /// Only objects modified since the given library version.
    pub fn since(mut self, version: u64) -> Self {
        self.params.push(("since".to_string(), version.to_string()));
        self
    }

    /// Build the final parameter list.
    pub fn build(self) -> Vec<(String, String)> {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SortDirection;

    fn has(params: &[(String, String)], key: &str, value: &str) -> bool {
        params
            .iter()
            .any(|(k, v)| k == key && v == value)
    }

    #[test]
    fn test_quick_search() {
        let params = ItemsQuery::new().quick("ethics").build();
        assert_eq!(params, vec![("q".to_string(), "ethics".to_string())]);
    }

    #[test]
    fn test_combined_query() {
        let params = ItemsQuery::new()
            .quick("ethics")
            .mode(QueryMode::Everything)
            .item_type("book")
            .limit(5)
            .build();
        assert!(has(&params, "q", "ethics"));
        assert!(has(&params, "qmode", "everything"));
        assert!(has(&params, "itemType", "book"));
        assert!(has(&params, "limit", "5"));
    }

    #[test]
    fn test_sort_becomes_two_params() {
        let sort = Sort::new("dateModified", SortDirection::Desc);
        let params = ItemsQuery::new().sort(&sort).build();
        assert!(has(&params, "sort", "dateModified"));
        assert!(has(&params, "direction", "desc"));
    }

    #[test]
    fn test_tag_negation() {
        let params = ItemsQuery::new().tag("ethics").exclude_tag("draft").build();
        assert!(has(&params, "tag", "ethics"));
        assert!(has(&params, "tag", "-draft"));
    }

    #[test]
    fn test_pagination() {
        let params = ItemsQuery::new().limit(50).start(100).build();
        assert!(has(&params, "limit", "50"));
        assert!(has(&params, "start", "100"));
    }
}
