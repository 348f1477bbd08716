//! CLI binary for the Zotero client.
//!
//! Usage: zotero search "machine ethics" --limit 10

#[cfg(feature = "cli")]
mod cli {
    use clap::{Parser, Subcommand};
    use zotero_client::{CitationStyle, Creator, ItemsQuery, LibraryRef, Sort, SortDirection, ZoteroClient, ZoteroError};

    #[derive(Parser)]
    #[command(name = "zotero", about = "Zotero Web API client", version)]
    struct Cli {
        /// API key (overrides ZOTERO_API_KEY env var)
        #[arg(long, global = true)]
        api_key: Option<String>,

        /// Personal library ID (overrides ZOTERO_USER_ID env var)
        #[arg(long, global = true)]
        user_id: Option<String>,

        /// Group library ID (overrides ZOTERO_GROUP_ID env var)
        #[arg(long, global = true)]
        group_id: Option<String>,

        /// Output format
        #[arg(long, global = true, default_value = "table")]
        output: OutputFormat,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Clone, Copy, clap::ValueEnum)]
    enum OutputFormat {
        Table,
        Json,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Search the library
        Search {
            /// Search query (matches titles, creators, years)
            query: String,
            /// Maximum results to return
            #[arg(short, long, default_value = "20")]
            limit: u32,
            /// Sort order (e.g. "dateModified desc", "title asc")
            #[arg(short, long)]
            sort: Option<String>,
            /// Restrict to an item type (e.g. journalArticle)
            #[arg(short = 't', long)]
            item_type: Option<String>,
        },
        /// Show a single item
        Item {
            /// Item key
            key: String,
        },
        /// Render a citation for an item
        Citation {
            /// Item key
            key: String,
            /// Citation style
            #[arg(short, long, default_value = "apa")]
            style: String,
        },
        /// Render a bibliography for items
        Bib {
            /// Item keys
            keys: Vec<String>,
            /// Citation style
            #[arg(short, long, default_value = "apa")]
            style: String,
        },
        /// Add a new item to the library
        Add {
            /// Item type (e.g. journalArticle, book, webpage)
            item_type: String,
            /// Item title
            title: String,
            /// Creator as "Last, First" (repeatable)
            #[arg(short, long)]
            creator: Vec<String>,
            /// Collection key to file the item into
            #[arg(long)]
            collection: Option<String>,
        },
        /// Manage collections
        Collections {
            #[command(subcommand)]
            action: CollectionsAction,
        },
        /// List all item types
        Types,
        /// List the valid fields for an item type
        Fields {
            /// Item type (e.g. journalArticle)
            item_type: String,
        },
        /// Start MCP server (stdio)
        Serve,
    }

    #[derive(Subcommand)]
    enum CollectionsAction {
        /// List all collections
        List,
        /// List items in a collection
        Items { key: String },
        /// Create a new collection
        Create {
            name: String,
            /// Parent collection key for nesting
            #[arg(long)]
            parent: Option<String>,
        },
    }

    fn make_client(
        api_key: Option<String>,
        user_id: Option<String>,
        group_id: Option<String>,
    ) -> zotero_client::error::Result<ZoteroClient> {
        let api_key = api_key
            .or_else(|| std::env::var("ZOTERO_API_KEY").ok())
            .filter(|key| !key.is_empty())
            .ok_or(ZoteroError::AuthRequired)?;

        let library = if let Some(user) = user_id.or_else(|| std::env::var("ZOTERO_USER_ID").ok())
        {
            LibraryRef::user(user)
        } else if let Some(group) = group_id.or_else(|| std::env::var("ZOTERO_GROUP_ID").ok()) {
            LibraryRef::group(group)
        } else {
            return Err(ZoteroError::Config(
                "Either --user-id/ZOTERO_USER_ID or --group-id/ZOTERO_GROUP_ID must be set"
                    .to_string(),
            ));
        };

        Ok(ZoteroClient::new(api_key, library))
    }

    fn parse_sort(s: &str) -> Sort {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let field = parts.first().copied().unwrap_or("dateModified");
        let dir = match parts.get(1).copied() {
            Some("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        };
        Sort::new(field, dir)
    }

    /// Parse "Last, First" into a split-name author; anything without a
    /// comma becomes a single-field (institutional) name.
    fn parse_creator(spec: &str) -> Creator {
        match spec.split_once(',') {
            Some((last, first)) => Creator::author(first.trim(), last.trim()),
            None => Creator {
                creator_type: "author".to_string(),
                first_name: None,
                last_name: None,
                name: Some(spec.trim().to_string()),
            },
        }
    }

    fn print_items_table(items: &[zotero_client::Item]) {
        use comfy_table::{ContentArrangement, Table};

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Key", "Year", "Creators", "Type", "Title"]);

        for item in items {
            let year = item.year().map(|y| y.to_string()).unwrap_or_default();
            let creators = item
                .meta
                .creator_summary
                .clone()
                .unwrap_or_else(|| {
                    item.data
                        .creators
                        .first()
                        .map(|c| c.display_name())
                        .unwrap_or_else(|| "-".to_string())
                });
            let title = if item.data.title.chars().count() > 60 {
                let prefix: String = item.data.title.chars().take(57).collect();
                format!("{}...", prefix)
            } else {
                item.data.title.clone()
            };

            table.add_row(vec![
                &item.key,
                &year,
                &creators,
                &item.data.item_type,
                &title,
            ]);
        }

        println!("{table}");
    }

    fn init_tracing() {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_env("ZOTERO_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("info"));

        // Logging goes to stderr only — stdout is the MCP transport.
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .init();
    }

    pub async fn run() -> zotero_client::error::Result<()> {
        let cli = Cli::parse();
        init_tracing();

        let client = make_client(
            cli.api_key.clone(),
            cli.user_id.clone(),
            cli.group_id.clone(),
        )?;

        match cli.command {
            Commands::Search {
                query,
                limit,
                sort,
                item_type,
            } => {
                let mut params = ItemsQuery::new().quick(&query).limit(limit);
                if let Some(sort) = sort.as_deref() {
                    params = params.sort(&parse_sort(sort));
                }
                if let Some(item_type) = item_type.as_deref() {
                    params = params.item_type(item_type);
                }
                let items = client.items(params).await?;

                match cli.output {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&items)?);
                    }
                    OutputFormat::Table => {
                        println!("Found {} items:", items.len());
                        print_items_table(&items);
                    }
                }
            }

            Commands::Item { key } => {
                let item = client.item(&key).await?;
                println!("{}", serde_json::to_string_pretty(&item)?);
            }

            Commands::Citation { key, style } => {
                let style = CitationStyle::parse(&style)?;
                let citation = client.citation(&key, &style).await?;
                println!("{}", citation);
            }

            Commands::Bib { keys, style } => {
                let style = CitationStyle::parse(&style)?;
                let refs: Vec<&str> = keys.iter().map(|s| s.as_str()).collect();
                let bibliography = client.bibliography(&refs, &style).await?;
                println!("{}", bibliography);
            }

            Commands::Add {
                item_type,
                title,
                creator,
                collection,
            } => {
                let mut template = client.item_template(&item_type).await?;
                let fields = template.as_object_mut().ok_or_else(|| {
                    ZoteroError::Parse("Item template was not an object".to_string())
                })?;
                fields.insert("title".to_string(), serde_json::json!(title));
                if !creator.is_empty() {
                    let creators: Vec<Creator> =
                        creator.iter().map(|spec| parse_creator(spec)).collect();
                    fields.insert("creators".to_string(), serde_json::to_value(creators)?);
                }

                let response = client.create_items(&[template]).await?;
                match response.first_key() {
                    Some(key) => {
                        if let Some(collection_key) = collection.as_deref() {
                            client.add_to_collection(collection_key, key).await?;
                        }
                        println!("Created item: {}", key);
                    }
                    None => {
                        println!("{}", serde_json::to_string_pretty(&response)?);
                    }
                }
            }

            Commands::Collections { action } => match action {
                CollectionsAction::List => {
                    let collections = client.collections().await?;
                    match cli.output {
                        OutputFormat::Json => {
                            println!("{}", serde_json::to_string_pretty(&collections)?);
                        }
                        OutputFormat::Table => {
                            use comfy_table::{ContentArrangement, Table};
                            let mut table = Table::new();
                            table.set_content_arrangement(ContentArrangement::Dynamic);
                            table.set_header(vec!["Key", "Name", "Items", "Parent"]);
                            for collection in &collections {
                                let parent = collection
                                    .data
                                    .parent_collection
                                    .as_deref()
                                    .unwrap_or("-")
                                    .to_string();
                                table.add_row(vec![
                                    collection.key.clone(),
                                    collection.data.name.clone(),
                                    collection.meta.num_items.to_string(),
                                    parent,
                                ]);
                            }
                            println!("{table}");
                        }
                    }
                }
                CollectionsAction::Items { key } => {
                    let items = client.collection_items(&key).await?;
                    match cli.output {
                        OutputFormat::Json => {
                            println!("{}", serde_json::to_string_pretty(&items)?)
                        }
                        OutputFormat::Table => {
                            println!("Items in {}:", key);
                            print_items_table(&items);
                        }
                    }
                }
                CollectionsAction::Create { name, parent } => {
                    let response = client.create_collection(&name, parent.as_deref()).await?;
                    match response.first_key() {
                        Some(key) => println!("Created collection: {} ({})", name, key),
                        None => println!("{}", serde_json::to_string_pretty(&response)?),
                    }
                }
            },

            Commands::Types => {
                let types = client.item_types().await?;
                println!("{}", serde_json::to_string_pretty(&types)?);
            }

            Commands::Fields { item_type } => {
                let fields = client.item_type_fields(&item_type).await?;
                println!("{}", serde_json::to_string_pretty(&fields)?);
            }

            Commands::Serve => {
                zotero_client::mcp::run_server(client).await?;
            }
        }

        Ok(())
    }
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature. Build with: cargo build --features cli");
    std::process::exit(1);
}
