//! Global schema endpoints.
//!
//! These live outside any library prefix and describe the Zotero data
//! model itself: valid item types, their fields, and creator roles.

use crate::client::ZoteroClient;
use crate::error::{Result, ZoteroError};

impl ZoteroClient {
    /// All item types known to the server.
    ///
    /// Returns the raw array of `{itemType, localized}` objects.
    pub async fn item_types(&self) -> Result<serde_json::Value> {
        let body = self.get_global("/itemTypes", &[]).await?;
        serde_json::from_str(&body)
            .map_err(|e| ZoteroError::Parse(format!("Invalid item types response: {}", e)))
    }

    /// Valid fields for the given item type.
    pub async fn item_type_fields(&self, item_type: &str) -> Result<serde_json::Value> {
        let body = self
            .get_global("/itemTypeFields", &[("itemType", item_type)])
            .await?;
        serde_json::from_str(&body)
            .map_err(|e| ZoteroError::Parse(format!("Invalid item fields response: {}", e)))
    }

    /// Valid creator roles for the given item type.
    pub async fn creator_types(&self, item_type: &str) -> Result<serde_json::Value> {
        let body = self
            .get_global("/itemTypeCreatorTypes", &[("itemType", item_type)])
            .await?;
        serde_json::from_str(&body)
            .map_err(|e| ZoteroError::Parse(format!("Invalid creator types response: {}", e)))
    }
}
