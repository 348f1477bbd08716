//! # zotero-client
//!
//! A Rust client for the Zotero Web API (v3).
//!
//! Provides:
//! - **Library**: Async API client for items, collections, citations, and
//!   the global schema endpoints
//! - **MCP server**: JSON-RPC 2.0 over stdio, exposing the library as tools
//!   and resources for AI agent integration (`zotero serve`)
//! - **CLI**: `zotero` binary for terminal use
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn example() -> zotero_client::error::Result<()> {
//! use zotero_client::ZoteroClient;
//!
//! // Create client from ZOTERO_API_KEY and ZOTERO_USER_ID (or
//! // ZOTERO_GROUP_ID) environment variables
//! let client = ZoteroClient::from_env()?;
//!
//! // Search the library
//! let items = client.search("machine ethics", 10).await?;
//! for item in &items {
//!     println!("{} [{}]", item.data.title, item.key);
//! }
//!
//! // Render a citation
//! let style = zotero_client::CitationStyle::parse("apa")?;
//! let citation = client.citation("ABCD1234", &style).await?;
//! println!("{}", citation);
//! # Ok(())
//! # }
//! ```
//!
//! ## Listing Parameters
//!
//! ```
//! use zotero_client::ItemsQuery;
//!
//! let params = ItemsQuery::new()
//!     .quick("dark patterns")
//!     .item_type("journalArticle")
//!     .limit(25)
//!     .build();
//! ```

pub mod citations;
pub mod client;
pub mod collections;
pub mod error;
pub mod items;
pub mod parse;
pub mod query;
pub mod rate_limit;
pub mod schema;
pub mod types;

pub mod mcp;

// Re-export key types at the crate root.
pub use client::ZoteroClient;
pub use error::ZoteroError;
pub use query::{ItemsQuery, QueryMode};
pub use types::*;
