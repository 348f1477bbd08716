//! Zotero API response parsing.
//!
//! The Web API v3 returns typed JSON envelopes for items and collections,
//! a map-of-indexes envelope for writes, and raw XHTML for bibliographies.

use crate::error::ZoteroError;
use crate::types::{Collection, Item, WriteResponse};

/// Deserialize Zotero's `parentCollection` field, which is `false` for
/// top-level collections and a key string otherwise.
pub(crate) fn deserialize_parent_collection<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct ParentVisitor;

    impl<'de> Visitor<'de> for ParentVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a collection key, false, or null")
        }

        fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(ParentVisitor)
        }
    }

    deserializer.deserialize_any(ParentVisitor)
}

/// Parse a JSON array of items.
pub fn parse_items(json: &str) -> crate::error::Result<Vec<Item>> {
    serde_json::from_str(json)
        .map_err(|e| ZoteroError::Parse(format!("Invalid items response: {}", e)))
}

/// Parse a single item.
pub fn parse_item(json: &str) -> crate::error::Result<Item> {
    serde_json::from_str(json)
        .map_err(|e| ZoteroError::Parse(format!("Invalid item response: {}", e)))
}

/// Parse a JSON array of collections.
pub fn parse_collections(json: &str) -> crate::error::Result<Vec<Collection>> {
    serde_json::from_str(json)
        .map_err(|e| ZoteroError::Parse(format!("Invalid collections response: {}", e)))
}

/// Parse a single collection.
pub fn parse_collection(json: &str) -> crate::error::Result<Collection> {
    serde_json::from_str(json)
        .map_err(|e| ZoteroError::Parse(format!("Invalid collection response: {}", e)))
}

/// Parse the multi-object write envelope.
pub fn parse_write_response(json: &str) -> crate::error::Result<WriteResponse> {
    serde_json::from_str(json)
        .map_err(|e| ZoteroError::Parse(format!("Invalid write response: {}", e)))
}

/// Extract the rendered citation from an `include=citation` item response.
pub fn parse_citation_response(json: &str) -> crate::error::Result<String> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| ZoteroError::Parse(format!("Invalid citation response: {}", e)))?;

    let citation = value["citation"].as_str().unwrap_or("").trim().to_string();
    if citation.is_empty() {
        return Err(ZoteroError::Parse(
            "Citation response contained no citation text".to_string(),
        ));
    }
    Ok(citation)
}

/// Validate a `format=bib` response body (raw XHTML, not JSON).
pub fn parse_bibliography_response(body: &str) -> crate::error::Result<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ZoteroError::Parse(
            "Bibliography response was empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_ITEM: &str = r#"{
        "key": "ABCD2345",
        "version": 1337,
        "meta": {
            "creatorSummary": "Jonas",
            "parsedDate": "2005-03-01",
            "numChildren": 1
        },
        "data": {
            "key": "ABCD2345",
            "version": 1337,
            "itemType": "journalArticle",
            "title": "On the Ethics of Machine Translation",
            "creators": [
                {"creatorType": "author", "firstName": "Hannah", "lastName": "Jonas"}
            ],
            "abstractNote": "A study.",
            "publicationTitle": "Journal of Applied Ethics",
            "DOI": "10.1000/xyz123",
            "date": "March 2005",
            "dateAdded": "2023-01-15T10:30:00Z",
            "dateModified": "2023-02-01T08:00:00Z",
            "collections": ["COLL1111"],
            "tags": [{"tag": "ethics", "type": 1}]
        }
    }"#;

    #[test]
    fn test_parse_item() {
        let item = parse_item(SAMPLE_ITEM).unwrap();
        assert_eq!(item.key, "ABCD2345");
        assert_eq!(item.version, 1337);
        assert_eq!(item.data.item_type, "journalArticle");
        assert_eq!(item.data.title, "On the Ethics of Machine Translation");
        assert_eq!(item.data.creators.len(), 1);
        assert_eq!(item.data.creators[0].display_name(), "Hannah Jonas");
        assert_eq!(item.data.collections, vec!["COLL1111".to_string()]);
        assert_eq!(item.year(), Some(2005));
    }

    #[test]
    fn test_unmodeled_fields_preserved() {
        let item = parse_item(SAMPLE_ITEM).unwrap();
        assert_eq!(
            item.data.extra.get("DOI").and_then(|v| v.as_str()),
            Some("10.1000/xyz123")
        );
        assert_eq!(
            item.data.extra.get("publicationTitle").and_then(|v| v.as_str()),
            Some("Journal of Applied Ethics")
        );

        // Round-trip: serializing the data must keep pass-through fields
        // and camelCase names so versioned updates don't drop anything.
        let json = serde_json::to_value(&item.data).unwrap();
        assert_eq!(json["DOI"], "10.1000/xyz123");
        assert_eq!(json["itemType"], "journalArticle");
        assert_eq!(json["abstractNote"], "A study.");
    }

    #[test]
    fn test_parse_items_array() {
        let json = format!("[{}, {}]", SAMPLE_ITEM, SAMPLE_ITEM);
        let items = parse_items(&json).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_parse_item_single_field_creator() {
        let json = r#"{
            "key": "WXYZ9876",
            "version": 2,
            "data": {
                "itemType": "report",
                "title": "Annual Report",
                "creators": [{"creatorType": "author", "name": "UNESCO"}]
            }
        }"#;
        let item = parse_item(json).unwrap();
        assert_eq!(item.data.creators[0].display_name(), "UNESCO");
        assert_eq!(item.data.creators[0].index_name(), "UNESCO");
        assert_eq!(item.year(), None);
    }

    #[test]
    fn test_parse_collection_top_level() {
        let json = r#"{
            "key": "COLL1111",
            "version": 99,
            "meta": {"numCollections": 0, "numItems": 12},
            "data": {
                "key": "COLL1111",
                "version": 99,
                "name": "Ethics Reading",
                "parentCollection": false
            }
        }"#;
        let collection = parse_collection(json).unwrap();
        assert_eq!(collection.data.name, "Ethics Reading");
        assert!(collection.data.parent_collection.is_none());
        assert_eq!(collection.meta.num_items, 12);
    }

    #[test]
    fn test_parse_collection_nested() {
        let json = r#"{
            "key": "COLL2222",
            "version": 100,
            "data": {
                "key": "COLL2222",
                "version": 100,
                "name": "Subtopic",
                "parentCollection": "COLL1111"
            }
        }"#;
        let collection = parse_collection(json).unwrap();
        assert_eq!(
            collection.data.parent_collection.as_deref(),
            Some("COLL1111")
        );
    }

    #[test]
    fn test_parse_write_response() {
        let json = r#"{
            "successful": {"0": {"key": "NEWKEY01", "version": 1}},
            "success": {"0": "NEWKEY01"},
            "unchanged": {},
            "failed": {"1": {"code": 400, "message": "'invalidField' is not a valid field"}}
        }"#;
        let response = parse_write_response(json).unwrap();
        assert_eq!(response.first_key(), Some("NEWKEY01"));
        assert!(!response.is_success());
        assert_eq!(response.failed["1"].code, 400);
    }

    #[test]
    fn test_parse_citation_response() {
        let json = r#"{
            "key": "ABCD2345",
            "version": 1337,
            "citation": "<span>Jonas, H. (2005). On the ethics of machine translation.</span>"
        }"#;
        let citation = parse_citation_response(json).unwrap();
        assert!(citation.contains("Jonas"));
    }

    #[test]
    fn test_parse_citation_response_empty_is_error() {
        let json = r#"{"key": "ABCD2345", "version": 1337, "citation": "  "}"#;
        assert!(parse_citation_response(json).is_err());

        let json = r#"{"key": "ABCD2345", "version": 1337}"#;
        assert!(parse_citation_response(json).is_err());
    }

    #[test]
    fn test_parse_bibliography_response() {
        let body = "\n<div class=\"csl-bib-body\">\n  <div class=\"csl-entry\">Jonas 2005</div>\n</div>\n";
        let bib = parse_bibliography_response(body).unwrap();
        assert!(bib.starts_with("<div"));
        assert!(parse_bibliography_response("   \n").is_err());
    }

    #[test]
    fn test_creator_index_name() {
        let creator = crate::types::Creator::author("Hannah", "Jonas");
        assert_eq!(creator.index_name(), "Jonas, Hannah");
        assert_eq!(creator.display_name(), "Hannah Jonas");
    }
}
