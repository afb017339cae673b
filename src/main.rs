//! Social Graph Connector CLI
//!
//! Operator tool around [`GraphClient`]: runs one operation for one
//! organisation and prints the result as JSON.
//!
//! # Architecture Overview
//!
//! ```text
//!   social-graph --org <id> <command>
//!        │
//!        ▼
//!   ┌──────────┐   ┌──────────────────┐   ┌───────────────┐   ┌───────────────┐
//!   │  config  │──▶│   credentials    │──▶│  http gateway │──▶│  Graph API    │
//!   │  (TOML)  │   │ store → decrypt  │   │ retry/timeout │   │  (upstream)   │
//!   └──────────┘   └──────────────────┘   └───────────────┘   └───────────────┘
//!                                                 │
//!                                                 ▼
//!                                  JSON result or failure (exit 1)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;

use social_graph::config::{load_config, ConnectorConfig};
use social_graph::credentials::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, OrgId, PassthroughDecryptor,
};
use social_graph::graph::{GraphClient, MediaQuery, PublishRequest};
use social_graph::observability::logging::init_logging;
use social_graph::OperationError;

#[derive(Parser)]
#[command(name = "social-graph")]
#[command(about = "Query and publish to an organisation's connected social account", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Organisation whose credentials are used.
    #[arg(short, long)]
    org: String,

    /// Credential file, overriding `[credentials] file`.
    #[arg(long)]
    credentials: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show display name, follower count and media count
    Account,
    /// Aggregate account insights over a trailing window
    Insights {
        #[arg(long)]
        days: Option<u32>,
    },
    /// List media, one page or following cursors
    Media {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        after: Option<String>,
        /// Keep fetching while a next cursor is returned
        #[arg(long)]
        all: bool,
        /// Upper bound on pages fetched with --all
        #[arg(long, default_value_t = 20)]
        max_pages: u32,
    },
    /// Show insights for one media item
    MediaInsights {
        media_id: String,
        #[arg(long = "metric")]
        metrics: Vec<String>,
    },
    /// Create and publish an image post
    Publish {
        #[arg(long)]
        image_url: String,
        #[arg(long)]
        caption: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ConnectorConfig::default(),
    };

    init_logging(&config.observability);

    tracing::info!(
        base_url = %config.graph.base_url,
        provider = %config.graph.provider,
        max_attempts = config.retries.max_attempts,
        retry_delay_ms = config.retries.delay_ms,
        "Configuration loaded"
    );

    let store: Arc<dyn CredentialStore> = match cli
        .credentials
        .clone()
        .or_else(|| config.credentials.file.clone())
    {
        Some(path) => Arc::new(FileCredentialStore::new(path)),
        None => {
            tracing::warn!("No credential file configured; every operation will report no_credentials");
            Arc::new(MemoryCredentialStore::new())
        }
    };

    let client = GraphClient::from_config(&config, store, Arc::new(PassthroughDecryptor))?;
    let org_id = OrgId::from(cli.org.clone());

    match cli.command {
        Commands::Account => print_result(client.account_info(&org_id).await),
        Commands::Insights { days } => print_result(client.account_insights(&org_id, days).await),
        Commands::Media {
            limit,
            after,
            all,
            max_pages,
        } => {
            if all {
                print_result(collect_media(&client, &org_id, limit, after, max_pages).await)
            } else {
                print_result(client.list_media(&org_id, MediaQuery { limit, after }).await)
            }
        }
        Commands::MediaInsights { media_id, metrics } => {
            let metrics: Vec<&str> = metrics.iter().map(String::as_str).collect();
            let wanted = (!metrics.is_empty()).then_some(metrics.as_slice());
            print_result(client.media_insights(&org_id, &media_id, wanted).await)
        }
        Commands::Publish { image_url, caption } => {
            let request = PublishRequest { image_url, caption };
            print_result(client.publish_image(&org_id, request).await)
        }
    }
}

/// Follow cursors until the listing is exhausted or `max_pages` is reached.
async fn collect_media(
    client: &GraphClient,
    org_id: &OrgId,
    limit: Option<u32>,
    mut after: Option<String>,
    max_pages: u32,
) -> Result<social_graph::graph::MediaPage, OperationError> {
    let mut items = Vec::new();
    for page_number in 1..=max_pages.max(1) {
        let page = client
            .list_media(org_id, MediaQuery { limit, after: after.take() })
            .await?;
        items.extend(page.items);
        match page.next_cursor {
            Some(cursor) => after = Some(cursor),
            None => {
                tracing::debug!(pages = page_number, "Media listing exhausted");
                break;
            }
        }
    }
    Ok(social_graph::graph::MediaPage {
        items,
        next_cursor: after,
    })
}

fn print_result<T: Serialize>(result: Result<T, OperationError>) -> Result<(), Box<dyn std::error::Error>> {
    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err.to_failure())?);
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}
