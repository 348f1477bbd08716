//! Item read and write endpoints.
//!
//! Covers: listing/search, top-level items, recently modified items,
//! single-item fetch, template fetch, create, update, delete.

use crate::client::ZoteroClient;
use crate::error::{Result, ZoteroError};
use crate::parse::{parse_item, parse_items, parse_write_response};
use crate::query::ItemsQuery;
use crate::types::{Item, Sort, WriteResponse};

impl ZoteroClient {
    /// Quick-search the library.
    ///
    /// Matches titles, creators, and years; use [`ZoteroClient::items`]
    /// for full parameter control.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Item>> {
        self.items(ItemsQuery::new().quick(query).limit(limit)).await
    }

    /// List items with full control over search, filtering, and pagination.
    pub async fn items(&self, query: ItemsQuery) -> Result<Vec<Item>> {
        let params = query.build();
        let params_ref: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let body = self.get("/items", &params_ref).await?;
        parse_items(&body)
    }

    /// Top-level items (items without a parent).
    pub async fn top_items(&self, limit: u32) -> Result<Vec<Item>> {
        let limit_str = limit.to_string();
        let body = self
            .get("/items/top", &[("limit", limit_str.as_str())])
            .await?;
        parse_items(&body)
    }

    /// Recently added or modified items, newest first.
    pub async fn recent_items(&self, limit: u32) -> Result<Vec<Item>> {
        self.items(
            ItemsQuery::new()
                .limit(limit)
                .sort(&Sort::date_modified_desc()),
        )
        .await
    }

    /// Fetch a single item by key.
    pub async fn item(&self, key: &str) -> Result<Item> {
        let body = self.get(&format!("/items/{}", key), &[]).await?;
        parse_item(&body)
    }

    /// Fetch an empty item template for the given item type.
    ///
    /// Templates come from the global `/items/new` endpoint and carry every
    /// valid field for the type; unknown fields in a create are rejected by
    /// the server, so creates start from a template.
    pub async fn item_template(&self, item_type: &str) -> Result<serde_json::Value> {
        let body = self
            .get_global("/items/new", &[("itemType", item_type)])
            .await?;
        serde_json::from_str(&body)
            .map_err(|e| ZoteroError::Parse(format!("Invalid item template: {}", e)))
    }

    /// Create items from filled-in templates.
    pub async fn create_items(&self, items: &[serde_json::Value]) -> Result<WriteResponse> {
        if items.is_empty() {
            return Err(ZoteroError::InvalidArgument(
                "create_items requires at least one item".to_string(),
            ));
        }
        let body = serde_json::Value::Array(items.to_vec());
        let response_body = self.post_json("/items", &body).await?;
        parse_write_response(&response_body)
    }

    /// Write an item's data back, using its version as the precondition.
    pub async fn update_item(&self, item: &Item) -> Result<()> {
        let data = serde_json::to_value(&item.data)?;
        self.patch_json(&format!("/items/{}", item.key), &data, item.version)
            .await?;
        Ok(())
    }

    /// Delete an item. `version` must be the item's current version.
    pub async fn delete_item(&self, key: &str, version: u64) -> Result<()> {
        self.delete(&format!("/items/{}", key), version).await?;
        Ok(())
    }
}
