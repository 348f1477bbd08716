//! Public types for the Zotero client.
//!
//! These types are self-contained with no external dependencies beyond serde,
//! making this crate publishable to crates.io independently.
//!
//! Items and collections deserialize directly from the Zotero Web API v3
//! JSON envelopes. Fields the typed structs do not model are preserved in a
//! flattened map, so read-modify-write cycles are lossless.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which kind of Zotero library the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LibraryKind {
    /// A personal library (`/users/{id}`).
    User,
    /// A group library (`/groups/{id}`).
    Group,
}

/// Reference to a Zotero library: kind plus numeric identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRef {
    pub kind: LibraryKind,
    pub id: String,
}

impl LibraryRef {
    /// A personal library.
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            kind: LibraryKind::User,
            id: id.into(),
        }
    }

    /// A group library.
    pub fn group(id: impl Into<String>) -> Self {
        Self {
            kind: LibraryKind::Group,
            id: id.into(),
        }
    }

    /// URL path prefix for all library-scoped endpoints.
    pub(crate) fn path_prefix(&self) -> String {
        match self.kind {
            LibraryKind::User => format!("/users/{}", self.id),
            LibraryKind::Group => format!("/groups/{}", self.id),
        }
    }
}

impl std::fmt::Display for LibraryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            LibraryKind::User => write!(f, "user {}", self.id),
            LibraryKind::Group => write!(f, "group {}", self.id),
        }
    }
}

/// A bibliographic item from the Zotero library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Opaque key assigned by Zotero (primary identifier).
    pub key: String,
    /// Library-wide version number, required for writes.
    pub version: u64,
    /// Derived metadata computed by the server.
    #[serde(default)]
    pub meta: ItemMeta,
    /// The item's editable data.
    pub data: ItemData,
}

impl Item {
    /// Publication year, if one can be read from the server-parsed date.
    pub fn year(&self) -> Option<u16> {
        let date = self.meta.parsed_date.as_deref()?;
        let digits: String = date.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.len() == 4 {
            digits.parse().ok()
        } else {
            None
        }
    }
}

/// Server-computed metadata attached to an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Short creator summary ("Smith", "Smith and Jones", "Smith et al.").
    #[serde(rename = "creatorSummary", skip_serializing_if = "Option::is_none")]
    pub creator_summary: Option<String>,
    /// Date parsed into ISO form ("2020-01-15", "2020").
    #[serde(rename = "parsedDate", skip_serializing_if = "Option::is_none")]
    pub parsed_date: Option<String>,
    /// Number of child items (notes, attachments).
    #[serde(rename = "numChildren", skip_serializing_if = "Option::is_none")]
    pub num_children: Option<u64>,
}

/// The editable fields of an item.
///
/// Common fields are typed; everything else (DOI, url, publisher, ...)
/// rides in `extra` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub version: u64,
    /// Zotero item type ("journalArticle", "book", "webpage", ...).
    pub item_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creators: Vec<Creator>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub abstract_note: String,
    /// Publication date as entered (free-form).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date_added: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date_modified: String,
    /// Keys of collections this item belongs to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// All remaining item-type-specific fields, passed through verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

/// A creator (author, editor, translator, ...) of an item.
///
/// Zotero stores names either split (`firstName`/`lastName`) or as a
/// single `name` field for institutional creators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    /// Creator role ("author", "editor", ...).
    pub creator_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Single-field name (used instead of first/last).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Creator {
    /// An author with split first/last name.
    pub fn author(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            creator_type: "author".to_string(),
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            name: None,
        }
    }

    /// Format as "First Last" (or the single-field name) for display.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (None, Some(last)) => last.clone(),
            (Some(first), None) => first.clone(),
            (None, None) => String::new(),
        }
    }

    /// Format as "Last, First" for sorted listings.
    pub fn index_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{}, {}", last, first),
            (None, Some(last)) => last.clone(),
            (Some(first), None) => first.clone(),
            (None, None) => String::new(),
        }
    }
}

/// A tag attached to an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
    /// 0 for manual tags, 1 for automatic; absent on writes.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<u8>,
}

/// A named grouping of items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub key: String,
    pub version: u64,
    #[serde(default)]
    pub meta: CollectionMeta,
    pub data: CollectionData,
}

/// Server-computed metadata attached to a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionMeta {
    #[serde(rename = "numCollections", default)]
    pub num_collections: u64,
    #[serde(rename = "numItems", default)]
    pub num_items: u64,
}

/// The editable fields of a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionData {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub version: u64,
    pub name: String,
    /// Parent collection key; the API encodes "no parent" as `false`.
    #[serde(
        rename = "parentCollection",
        default,
        deserialize_with = "crate::parse::deserialize_parent_collection",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_collection: Option<String>,
}

/// Outcome of a multi-object write (`POST /items`, `POST /collections`).
///
/// Keys of the maps are zero-based indexes into the submitted array,
/// as strings, exactly as the API returns them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteResponse {
    /// Index → full created/updated object.
    #[serde(default)]
    pub successful: BTreeMap<String, serde_json::Value>,
    /// Index → assigned key.
    #[serde(default)]
    pub success: BTreeMap<String, String>,
    /// Index → key of objects the write did not change.
    #[serde(default)]
    pub unchanged: BTreeMap<String, String>,
    /// Index → failure detail.
    #[serde(default)]
    pub failed: BTreeMap<String, WriteFailure>,
}

impl WriteResponse {
    /// Key assigned to the first submitted object, if it succeeded.
    pub fn first_key(&self) -> Option<&str> {
        self.success.get("0").map(String::as_str)
    }

    /// True when no submitted object failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Failure detail for one object in a multi-object write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteFailure {
    pub code: u16,
    pub message: String,
}

/// A citation style identifier ("apa", "mla", "chicago-note-bibliography").
///
/// Only validates the identifier's shape; whether the style exists is up
/// to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationStyle(String);

impl CitationStyle {
    /// Parse and validate a style identifier.
    ///
    /// Accepts lowercase ASCII alphanumerics and hyphens, which covers the
    /// Zotero style repository's naming scheme.
    pub fn parse(s: &str) -> crate::error::Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(crate::error::ZoteroError::InvalidArgument(
                "citation style must not be empty".to_string(),
            ));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(crate::error::ZoteroError::InvalidArgument(format!(
                "invalid citation style: {:?}",
                s
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CitationStyle {
    fn default() -> Self {
        Self("apa".to_string())
    }
}

impl std::fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sort specification for item and collection listings.
///
/// Zotero passes these as separate `sort` and `direction` query parameters.
#[derive(Debug, Clone)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn date_modified_desc() -> Self {
        Self::new("dateModified", SortDirection::Desc)
    }

    pub fn date_added_desc() -> Self {
        Self::new("dateAdded", SortDirection::Desc)
    }

    pub fn title_asc() -> Self {
        Self::new("title", SortDirection::Asc)
    }
}

impl std::fmt::Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_str())
    }
}
