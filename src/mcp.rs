//! MCP (Model Context Protocol) server implementation.
//!
//! Implements the JSON-RPC 2.0 protocol over stdio, exposing Zotero library
//! tools and resources for AI agent integration.

use crate::client::ZoteroClient;
use crate::error::ZoteroError;
use crate::query::ItemsQuery;
use crate::types::CitationStyle;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};
use url::Url;

/// Run the MCP server over stdin/stdout.
///
/// One JSON-RPC message per line; responses go to stdout, logs to stderr.
/// The loop ends when stdin is closed. A malformed or failing request never
/// terminates the loop.
pub async fn run_server(client: ZoteroClient) -> crate::error::Result<()> {
    info!("Zotero MCP server listening on stdio ({})", client.library());

    let stdin = io::stdin();
    let stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line.map_err(|e| ZoteroError::Config(format!("stdin error: {}", e)))?;
        if line.trim().is_empty() {
            continue;
        }

        let Some(response) = process_line(&client, &line).await else {
            continue;
        };

        writeln!(stdout.lock(), "{}", response)
            .map_err(|e| ZoteroError::Config(format!("stdout error: {}", e)))?;
        stdout
            .lock()
            .flush()
            .map_err(|e| ZoteroError::Config(format!("stdout flush error: {}", e)))?;
    }

    Ok(())
}

/// Handle one input line. Returns `None` for notifications (no response).
async fn process_line(client: &ZoteroClient, line: &str) -> Option<Value> {
    let request: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            return Some(json!({
                "jsonrpc": "2.0",
                "id": null,
                "error": { "code": -32700, "message": format!("Parse error: {}", e) }
            }));
        }
    };

    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request["method"].as_str().unwrap_or("");
    debug!("request: {}", method);

    let response = match method {
        "initialize" => handle_initialize(&id),
        "tools/list" => handle_tools_list(&id),
        "tools/call" => handle_tool_call(client, &id, &request["params"]).await,
        "resources/list" => handle_resources_list(&id),
        "resources/templates/list" => handle_resource_templates_list(&id),
        "resources/read" => handle_resource_read(client, &id, &request["params"]).await,
        "notifications/initialized" | "notifications/cancelled" => return None,
        _ => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32601, "message": format!("Method not found: {}", method) }
        }),
    };

    Some(response)
}

fn handle_initialize(id: &Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": {},
                "resources": {}
            },
            "serverInfo": {
                "name": "zotero-mcp",
                "version": env!("CARGO_PKG_VERSION")
            }
        }
    })
}

fn handle_tools_list(id: &Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "tools": tool_definitions()
        }
    })
}

fn handle_resources_list(id: &Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "resources": [
                {
                    "uri": "zotero://collections",
                    "name": "Zotero Collections",
                    "description": "All collections in the library",
                    "mimeType": "application/json"
                },
                {
                    "uri": "zotero://items/top",
                    "name": "Top-Level Items",
                    "description": "Top-level items in the library",
                    "mimeType": "application/json"
                },
                {
                    "uri": "zotero://items/recent",
                    "name": "Recent Items",
                    "description": "Recently added or modified items",
                    "mimeType": "application/json"
                }
            ]
        }
    })
}

fn handle_resource_templates_list(id: &Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "resourceTemplates": [
                {
                    "uriTemplate": "zotero://collections/{collection_key}/items",
                    "name": "Collection Items",
                    "description": "Items in a specific collection",
                    "mimeType": "application/json"
                },
                {
                    "uriTemplate": "zotero://items/{item_key}",
                    "name": "Item Details",
                    "description": "Full details of a specific item",
                    "mimeType": "application/json"
                },
                {
                    "uriTemplate": "zotero://items/{item_key}/citation/{style}",
                    "name": "Item Citation",
                    "description": "Formatted citation for a specific item",
                    "mimeType": "text/html"
                }
            ]
        }
    })
}

async fn handle_resource_read(client: &ZoteroClient, id: &Value, params: &Value) -> Value {
    let uri = params["uri"].as_str().unwrap_or("");

    let target = match parse_resource_uri(uri) {
        Ok(target) => target,
        Err(e) => {
            return json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32602, "message": e.to_string() }
            });
        }
    };

    match read_resource(client, &target).await {
        Ok((mime_type, text)) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "contents": [{
                    "uri": uri,
                    "mimeType": mime_type,
                    "text": text
                }]
            }
        }),
        Err(e) => {
            warn!("resource read failed for {}: {}", uri, e);
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32603, "message": e.to_string() }
            })
        }
    }
}

async fn handle_tool_call(client: &ZoteroClient, id: &Value, params: &Value) -> Value {
    let tool_name = params["name"].as_str().unwrap_or("");
    let args = &params["arguments"];
    debug!("tool call: {}", tool_name);

    let result = match tool_name {
        "search_items" => tool_search_items(client, args).await,
        "get_citation" => tool_get_citation(client, args).await,
        "add_item" => tool_add_item(client, args).await,
        "get_bibliography" => tool_get_bibliography(client, args).await,
        "create_collection" => tool_create_collection(client, args).await,
        "update_item" => tool_update_item(client, args).await,
        "delete_item" => tool_delete_item(client, args).await,
        "get_item_types" => tool_get_item_types(client, args).await,
        "get_item_fields" => tool_get_item_fields(client, args).await,
        _ => Err(ZoteroError::InvalidArgument(format!(
            "Unknown tool: {}",
            tool_name
        ))),
    };

    match result {
        Ok(content) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "content": [{ "type": "text", "text": content }]
            }
        }),
        Err(e) => {
            warn!("tool {} failed: {}", tool_name, e);
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "content": [{ "type": "text", "text": format!("Error: {}", e) }],
                    "isError": true
                }
            })
        }
    }
}

// --- Resource addressing ---

/// A resource URI resolved to its upstream operation.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ResourceTarget {
    Collections,
    TopItems,
    RecentItems,
    CollectionItems(String),
    Item(String),
    ItemCitation(String, CitationStyle),
}

/// Parse a `zotero://` resource URI into a [`ResourceTarget`].
///
/// Path segments are positional: `zotero://items/{key}/citation/{style}`.
fn parse_resource_uri(uri: &str) -> Result<ResourceTarget, ZoteroError> {
    let parsed = Url::parse(uri)
        .map_err(|e| ZoteroError::InvalidArgument(format!("Invalid resource URI {:?}: {}", uri, e)))?;

    if parsed.scheme() != "zotero" {
        return Err(ZoteroError::InvalidArgument(format!(
            "Unknown resource scheme: {}",
            parsed.scheme()
        )));
    }

    let host = parsed.host_str().unwrap_or("");
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    match (host, segments.as_slice()) {
        ("collections", []) => Ok(ResourceTarget::Collections),
        ("collections", [key, "items"]) => Ok(ResourceTarget::CollectionItems(key.to_string())),
        ("items", ["top"]) => Ok(ResourceTarget::TopItems),
        ("items", ["recent"]) => Ok(ResourceTarget::RecentItems),
        ("items", [key]) => Ok(ResourceTarget::Item(key.to_string())),
        ("items", [key, "citation", style]) => Ok(ResourceTarget::ItemCitation(
            key.to_string(),
            CitationStyle::parse(style)?,
        )),
        _ => Err(ZoteroError::InvalidArgument(format!(
            "Unknown resource: {}",
            uri
        ))),
    }
}

/// Fetch a resource's content. Returns (mime type, text).
async fn read_resource(
    client: &ZoteroClient,
    target: &ResourceTarget,
) -> Result<(&'static str, String), ZoteroError> {
    match target {
        ResourceTarget::Collections => {
            let collections = client.collections().await?;
            Ok(("application/json", serde_json::to_string_pretty(&collections)?))
        }
        ResourceTarget::TopItems => {
            let items = client.top_items(50).await?;
            Ok(("application/json", serde_json::to_string_pretty(&items)?))
        }
        ResourceTarget::RecentItems => {
            let items = client.recent_items(20).await?;
            Ok(("application/json", serde_json::to_string_pretty(&items)?))
        }
        ResourceTarget::CollectionItems(key) => {
            let items = client.collection_items(key).await?;
            Ok(("application/json", serde_json::to_string_pretty(&items)?))
        }
        ResourceTarget::Item(key) => {
            let item = client.item(key).await?;
            Ok(("application/json", serde_json::to_string_pretty(&item)?))
        }
        ResourceTarget::ItemCitation(key, style) => {
            let citation = client.citation(key, style).await?;
            Ok(("text/html", citation))
        }
    }
}

// --- Tool implementations ---

async fn tool_search_items(client: &ZoteroClient, args: &Value) -> Result<String, ZoteroError> {
    let query = args["query"]
        .as_str()
        .ok_or_else(|| ZoteroError::InvalidArgument("'query' parameter required".into()))?;
    let limit = args["limit"].as_u64().unwrap_or(20).min(100) as u32;

    let items = match args["collection_key"].as_str() {
        Some(collection_key) => {
            client
                .collection_items_top(collection_key, ItemsQuery::new().quick(query).limit(limit))
                .await?
        }
        None => client.search(query, limit).await?,
    };

    let result = json!({
        "query": query,
        "count": items.len(),
        "results": items,
    });
    serde_json::to_string_pretty(&result).map_err(|e| ZoteroError::Parse(e.to_string()))
}

async fn tool_get_citation(client: &ZoteroClient, args: &Value) -> Result<String, ZoteroError> {
    let item_key = args["item_key"]
        .as_str()
        .ok_or_else(|| ZoteroError::InvalidArgument("'item_key' parameter required".into()))?;
    let style = CitationStyle::parse(args["style"].as_str().unwrap_or("apa"))?;

    client.citation(item_key, &style).await
}

async fn tool_add_item(client: &ZoteroClient, args: &Value) -> Result<String, ZoteroError> {
    let item_type = args["item_type"]
        .as_str()
        .ok_or_else(|| ZoteroError::InvalidArgument("'item_type' parameter required".into()))?;
    let title = args["title"]
        .as_str()
        .ok_or_else(|| ZoteroError::InvalidArgument("'title' parameter required".into()))?;

    // Start from the server template so every field is valid for the type.
    let mut template = client.item_template(item_type).await?;
    let fields = template
        .as_object_mut()
        .ok_or_else(|| ZoteroError::Parse("Item template was not an object".into()))?;

    fields.insert("title".to_string(), json!(title));

    if !args["creators"].is_null() {
        let creators = args["creators"]
            .as_array()
            .ok_or_else(|| ZoteroError::InvalidArgument("'creators' must be an array".into()))?;
        fields.insert("creators".to_string(), json!(creators));
    }

    if let Some(additional) = args["additional_fields"].as_object() {
        for (key, value) in additional {
            fields.insert(key.clone(), value.clone());
        }
    }

    let response = client.create_items(&[template]).await?;

    if let Some(collection_key) = args["collection_key"].as_str() {
        if let Some(item_key) = response.first_key() {
            client.add_to_collection(collection_key, item_key).await?;
        }
    }

    serde_json::to_string_pretty(&response).map_err(|e| ZoteroError::Parse(e.to_string()))
}

async fn tool_get_bibliography(client: &ZoteroClient, args: &Value) -> Result<String, ZoteroError> {
    let item_keys: Vec<&str> = args["item_keys"]
        .as_array()
        .ok_or_else(|| ZoteroError::InvalidArgument("'item_keys' array required".into()))?
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    let style = CitationStyle::parse(args["style"].as_str().unwrap_or("apa"))?;

    client.bibliography(&item_keys, &style).await
}

async fn tool_create_collection(client: &ZoteroClient, args: &Value) -> Result<String, ZoteroError> {
    let name = args["name"]
        .as_str()
        .ok_or_else(|| ZoteroError::InvalidArgument("'name' parameter required".into()))?;
    let parent_key = args["parent_key"].as_str();

    let response = client.create_collection(name, parent_key).await?;
    serde_json::to_string_pretty(&response).map_err(|e| ZoteroError::Parse(e.to_string()))
}

async fn tool_update_item(client: &ZoteroClient, args: &Value) -> Result<String, ZoteroError> {
    let item_key = args["item_key"]
        .as_str()
        .ok_or_else(|| ZoteroError::InvalidArgument("'item_key' parameter required".into()))?;
    let updates = args["updates"]
        .as_object()
        .ok_or_else(|| ZoteroError::InvalidArgument("'updates' object required".into()))?;

    let mut item = client.item(item_key).await?;

    let mut data = serde_json::to_value(&item.data)?;
    let fields = data
        .as_object_mut()
        .ok_or_else(|| ZoteroError::Parse("Item data was not an object".into()))?;
    for (key, value) in updates {
        fields.insert(key.clone(), value.clone());
    }
    item.data = serde_json::from_value(data)
        .map_err(|e| ZoteroError::InvalidArgument(format!("Invalid update: {}", e)))?;

    client.update_item(&item).await?;
    Ok(format!("Item {} updated", item_key))
}

async fn tool_delete_item(client: &ZoteroClient, args: &Value) -> Result<String, ZoteroError> {
    let item_key = args["item_key"]
        .as_str()
        .ok_or_else(|| ZoteroError::InvalidArgument("'item_key' parameter required".into()))?;

    // The delete precondition needs the current version.
    let item = client.item(item_key).await?;
    client.delete_item(&item.key, item.version).await?;
    Ok(format!("Item {} deleted", item_key))
}

async fn tool_get_item_types(client: &ZoteroClient, _args: &Value) -> Result<String, ZoteroError> {
    let types = client.item_types().await?;
    serde_json::to_string_pretty(&types).map_err(|e| ZoteroError::Parse(e.to_string()))
}

async fn tool_get_item_fields(client: &ZoteroClient, args: &Value) -> Result<String, ZoteroError> {
    let item_type = args["item_type"]
        .as_str()
        .ok_or_else(|| ZoteroError::InvalidArgument("'item_type' parameter required".into()))?;

    let fields = client.item_type_fields(item_type).await?;
    serde_json::to_string_pretty(&fields).map_err(|e| ZoteroError::Parse(e.to_string()))
}

// --- Tool definitions ---

fn tool_definitions() -> Value {
    json!([
        {
            "name": "search_items",
            "description": "Search for items in the Zotero library. Matches titles, creators, and years; optionally scoped to one collection.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query string" },
                    "collection_key": { "type": "string", "description": "Optional collection key to search within" },
                    "limit": { "type": "integer", "description": "Max results (default 20, capped at 100)", "default": 20 }
                },
                "required": ["query"]
            },
            "annotations": {
                "readOnlyHint": true,
                "destructiveHint": false,
                "idempotentHint": true,
                "openWorldHint": true
            }
        },
        {
            "name": "get_citation",
            "description": "Get a formatted citation for a specific item.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "item_key": { "type": "string", "description": "The Zotero item key" },
                    "style": { "type": "string", "description": "Citation style (e.g. apa, mla, chicago-note-bibliography)", "default": "apa" }
                },
                "required": ["item_key"]
            },
            "annotations": {
                "readOnlyHint": true,
                "destructiveHint": false,
                "idempotentHint": true,
                "openWorldHint": true
            }
        },
        {
            "name": "add_item",
            "description": "Add a new item to the Zotero library, optionally filing it into a collection.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "item_type": { "type": "string", "description": "Item type (e.g. journalArticle, book, webpage)" },
                    "title": { "type": "string", "description": "Item title" },
                    "creators": {
                        "type": "array",
                        "items": { "type": "object" },
                        "description": "Creators, e.g. [{\"creatorType\": \"author\", \"firstName\": \"...\", \"lastName\": \"...\"}]"
                    },
                    "collection_key": { "type": "string", "description": "Optional collection key to add the item to" },
                    "additional_fields": { "type": "object", "description": "Additional fields (e.g. date, url, publisher)" }
                },
                "required": ["item_type", "title"]
            },
            "annotations": {
                "readOnlyHint": false,
                "destructiveHint": false,
                "idempotentHint": false,
                "openWorldHint": true
            }
        },
        {
            "name": "get_bibliography",
            "description": "Get a formatted bibliography for multiple items.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "item_keys": { "type": "array", "items": { "type": "string" }, "description": "Zotero item keys" },
                    "style": { "type": "string", "description": "Citation style (e.g. apa, mla)", "default": "apa" }
                },
                "required": ["item_keys"]
            },
            "annotations": {
                "readOnlyHint": true,
                "destructiveHint": false,
                "idempotentHint": true,
                "openWorldHint": true
            }
        },
        {
            "name": "create_collection",
            "description": "Create a new collection, optionally nested under a parent collection.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Name of the new collection" },
                    "parent_key": { "type": "string", "description": "Optional parent collection key" }
                },
                "required": ["name"]
            },
            "annotations": {
                "readOnlyHint": false,
                "destructiveHint": false,
                "idempotentHint": false,
                "openWorldHint": true
            }
        },
        {
            "name": "update_item",
            "description": "Update fields of an existing item.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "item_key": { "type": "string", "description": "The Zotero item key to update" },
                    "updates": { "type": "object", "description": "Fields to update (e.g. {\"title\": \"New Title\"})" }
                },
                "required": ["item_key", "updates"]
            },
            "annotations": {
                "readOnlyHint": false,
                "destructiveHint": false,
                "idempotentHint": false,
                "openWorldHint": true
            }
        },
        {
            "name": "delete_item",
            "description": "Delete an item from the Zotero library.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "item_key": { "type": "string", "description": "The Zotero item key to delete" }
                },
                "required": ["item_key"]
            },
            "annotations": {
                "readOnlyHint": false,
                "destructiveHint": true,
                "idempotentHint": false,
                "openWorldHint": true
            }
        },
        {
            "name": "get_item_types",
            "description": "List all item types the library supports.",
            "inputSchema": {
                "type": "object",
                "properties": {}
            },
            "annotations": {
                "readOnlyHint": true,
                "destructiveHint": false,
                "idempotentHint": true,
                "openWorldHint": true
            }
        },
        {
            "name": "get_item_fields",
            "description": "List the valid fields for a specific item type.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "item_type": { "type": "string", "description": "The item type (e.g. journalArticle, book)" }
                },
                "required": ["item_type"]
            },
            "annotations": {
                "readOnlyHint": true,
                "destructiveHint": false,
                "idempotentHint": true,
                "openWorldHint": true
            }
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LibraryRef;

    fn test_client() -> ZoteroClient {
        ZoteroClient::new("test-key", LibraryRef::user("12345"))
    }

    #[tokio::test]
    async fn test_malformed_line_yields_parse_error() {
        let client = test_client();
        let response = process_line(&client, "{not json").await.unwrap();
        assert_eq!(response["error"]["code"], -32700);
        assert_eq!(response["id"], Value::Null);

        // The next well-formed request is still served.
        let next = process_line(&client, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#)
            .await
            .unwrap();
        assert!(next["result"]["tools"].is_array());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let client = test_client();
        let response = process_line(
            &client,
            r#"{"jsonrpc":"2.0","id":42,"method":"no/such/method"}"#,
        )
        .await
        .unwrap();
        assert_eq!(response["error"]["code"], -32601);
        assert_eq!(response["id"], 42);
    }

    #[tokio::test]
    async fn test_id_echoed_for_string_ids() {
        let client = test_client();
        let response = process_line(
            &client,
            r#"{"jsonrpc":"2.0","id":"req-7","method":"resources/list"}"#,
        )
        .await
        .unwrap();
        assert_eq!(response["id"], "req-7");
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let client = test_client();
        let response = process_line(
            &client,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        )
        .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_initialize() {
        let client = test_client();
        let response = process_line(&client, r#"{"jsonrpc":"2.0","id":0,"method":"initialize"}"#)
            .await
            .unwrap();
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], "zotero-mcp");
    }

    #[tokio::test]
    async fn test_tools_list_contains_all_tools() {
        let client = test_client();
        let response = process_line(&client, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#)
            .await
            .unwrap();
        let tools = response["result"]["tools"].as_array().unwrap();
        let names: Vec<&str> = tools
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();

        for expected in [
            "search_items",
            "get_citation",
            "add_item",
            "get_bibliography",
            "create_collection",
            "update_item",
            "delete_item",
            "get_item_types",
            "get_item_fields",
        ] {
            assert!(names.contains(&expected), "missing tool {}", expected);
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_tool_error_not_crash() {
        let client = test_client();
        let response = process_line(
            &client,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"frobnicate","arguments":{}}}"#,
        )
        .await
        .unwrap();
        assert_eq!(response["result"]["isError"], true);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("Unknown tool"));
        assert_eq!(response["id"], 2);
    }

    #[tokio::test]
    async fn test_search_items_requires_query() {
        let client = test_client();
        let response = process_line(
            &client,
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"search_items","arguments":{}}}"#,
        )
        .await
        .unwrap();
        assert_eq!(response["result"]["isError"], true);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("query"));
    }

    #[tokio::test]
    async fn test_get_citation_rejects_malformed_style() {
        let client = test_client();
        let response = process_line(
            &client,
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"get_citation","arguments":{"item_key":"ABCD1234","style":"Not A Style!"}}}"#,
        )
        .await
        .unwrap();
        assert_eq!(response["result"]["isError"], true);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("citation style") || text.contains("Invalid"));
    }

    #[tokio::test]
    async fn test_get_bibliography_requires_item_keys() {
        let client = test_client();
        let response = process_line(
            &client,
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"get_bibliography","arguments":{"style":"apa"}}}"#,
        )
        .await
        .unwrap();
        assert_eq!(response["result"]["isError"], true);
    }

    #[tokio::test]
    async fn test_resource_read_rejects_unknown_uri() {
        let client = test_client();
        let response = process_line(
            &client,
            r#"{"jsonrpc":"2.0","id":6,"method":"resources/read","params":{"uri":"zotero://nonsense"}}"#,
        )
        .await
        .unwrap();
        assert_eq!(response["error"]["code"], -32602);
    }

    #[test]
    fn test_parse_resource_uri_static() {
        assert_eq!(
            parse_resource_uri("zotero://collections").unwrap(),
            ResourceTarget::Collections
        );
        assert_eq!(
            parse_resource_uri("zotero://items/top").unwrap(),
            ResourceTarget::TopItems
        );
        assert_eq!(
            parse_resource_uri("zotero://items/recent").unwrap(),
            ResourceTarget::RecentItems
        );
    }

    #[test]
    fn test_parse_resource_uri_templated() {
        assert_eq!(
            parse_resource_uri("zotero://collections/COLL1111/items").unwrap(),
            ResourceTarget::CollectionItems("COLL1111".to_string())
        );
        assert_eq!(
            parse_resource_uri("zotero://items/ABCD2345").unwrap(),
            ResourceTarget::Item("ABCD2345".to_string())
        );
        assert_eq!(
            parse_resource_uri("zotero://items/ABCD2345/citation/mla").unwrap(),
            ResourceTarget::ItemCitation(
                "ABCD2345".to_string(),
                CitationStyle::parse("mla").unwrap()
            )
        );
    }

    #[test]
    fn test_parse_resource_uri_rejects_garbage() {
        assert!(parse_resource_uri("zotero://items/KEY/extra/deep/path").is_err());
        assert!(parse_resource_uri("http://collections").is_err());
        assert!(parse_resource_uri("not a uri").is_err());
        assert!(parse_resource_uri("zotero://items/KEY/citation/Bad Style!").is_err());
    }

    #[test]
    fn test_citation_style_validation() {
        assert!(CitationStyle::parse("apa").is_ok());
        assert!(CitationStyle::parse("chicago-note-bibliography").is_ok());
        assert!(CitationStyle::parse("  mla ").is_ok());
        assert!(CitationStyle::parse("").is_err());
        assert!(CitationStyle::parse("APA").is_err());
        assert!(CitationStyle::parse("apa style").is_err());
        assert_eq!(CitationStyle::default().as_str(), "apa");
    }
}
