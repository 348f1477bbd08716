//! Collection endpoints.

use crate::client::ZoteroClient;
use crate::error::Result;
use crate::parse::{parse_collection, parse_collections, parse_items, parse_write_response};
use crate::query::ItemsQuery;
use crate::types::{Collection, Item, WriteResponse};

impl ZoteroClient {
    /// List all collections in the library.
    pub async fn collections(&self) -> Result<Vec<Collection>> {
        let body = self.get("/collections", &[]).await?;
        parse_collections(&body)
    }

    /// Fetch a single collection by key.
    pub async fn collection(&self, key: &str) -> Result<Collection> {
        let body = self.get(&format!("/collections/{}", key), &[]).await?;
        parse_collection(&body)
    }

    /// All items in a collection, including child notes and attachments.
    pub async fn collection_items(&self, key: &str) -> Result<Vec<Item>> {
        let body = self
            .get(&format!("/collections/{}/items", key), &[])
            .await?;
        parse_items(&body)
    }

    /// Top-level items in a collection, with search and pagination.
    pub async fn collection_items_top(&self, key: &str, query: ItemsQuery) -> Result<Vec<Item>> {
        let params = query.build();
        let params_ref: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let body = self
            .get(&format!("/collections/{}/items/top", key), &params_ref)
            .await?;
        parse_items(&body)
    }

    /// Create a new collection, optionally nested under a parent.
    pub async fn create_collection(
        &self,
        name: &str,
        parent_key: Option<&str>,
    ) -> Result<WriteResponse> {
        let mut collection = serde_json::json!({ "name": name });
        if let Some(parent) = parent_key {
            collection["parentCollection"] = serde_json::json!(parent);
        }

        let body = serde_json::json!([collection]);
        let response_body = self.post_json("/collections", &body).await?;
        parse_write_response(&response_body)
    }

    /// Add an existing item to a collection.
    ///
    /// The API models membership as a property of the item, so this is a
    /// read-modify-write on the item's collection list.
    pub async fn add_to_collection(&self, collection_key: &str, item_key: &str) -> Result<()> {
        let mut item = self.item(item_key).await?;
        if item
            .data
            .collections
            .iter()
            .any(|key| key == collection_key)
        {
            return Ok(());
        }
        item.data.collections.push(collection_key.to_string());
        self.update_item(&item).await
    }
}
