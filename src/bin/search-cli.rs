use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use search_client::config::{load_config, ClientConfig};
use search_client::observability::logging::init_logging;
use search_client::{GetRequest, IndexRequest, MultiGetItem, MultiGetRequest, SearchClient, SearchRequest};

#[derive(Parser)]
#[command(name = "search-cli")]
#[command(about = "Command line client for a search cluster", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, conflicts_with = "node")]
    config: Option<PathBuf>,

    /// Node address; repeat for several nodes
    #[arg(short, long, default_value = "localhost:9200")]
    node: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the cluster answers
    Ping,
    /// Show cluster name and version
    Info,
    /// Fetch one document
    Get { index: String, id: String },
    /// Fetch several documents of one index
    Mget {
        index: String,
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long, default_value = "_doc")]
        doc_type: String,
        /// Shard routing value applied to every document
        #[arg(long)]
        routing: Option<String>,
    },
    /// Run a query
    Search {
        index: String,
        /// Query clause as JSON, e.g. '{"match":{"user":"kimchy"}}'
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long)]
        size: Option<u32>,
    },
    /// Store a document
    Index {
        index: String,
        id: Option<String>,
        /// Document as JSON
        #[arg(short, long)]
        source: String,
        /// Fail if the document already exists
        #[arg(long)]
        create: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::with_nodes(cli.node.iter().cloned()),
    };
    init_logging(&config.observability);

    let client = SearchClient::from_config(&config)?;

    match cli.command {
        Commands::Ping => {
            let alive = client.ping().await;
            println!("{}", alive);
            if !alive {
                std::process::exit(1);
            }
        }
        Commands::Info => {
            print_json(&client.info().await?)?;
        }
        Commands::Get { index, id } => {
            print_json(&client.get(GetRequest::new(index, id)).await?)?;
        }
        Commands::Mget { index, ids, doc_type, routing } => {
            let request = ids.into_iter().fold(MultiGetRequest::new(), |request, id| {
                request.item(MultiGetItem {
                    index: index.clone(),
                    doc_type: Some(doc_type.clone()),
                    id,
                    routing: routing.clone(),
                })
            });
            let mut results = client.multi_get(request);
            while let Some(result) = results.next().await {
                print_json(&result?)?;
            }
        }
        Commands::Search { index, query, size } => {
            let mut request = SearchRequest::new([index]);
            if let Some(query) = query {
                request = request.query(serde_json::from_str::<Value>(&query)?);
            }
            if let Some(size) = size {
                request = request.size(size);
            }
            let mut hits = client.search(request);
            while let Some(hit) = hits.next().await {
                print_json(&hit?)?;
            }
        }
        Commands::Index { index, id, source, create } => {
            // Reject malformed JSON before sending.
            serde_json::from_str::<Value>(&source)?;
            let mut request = IndexRequest::new(index).source(source).create(create);
            if let Some(id) = id {
                request = request.id(id);
            }
            print_json(&client.index(request).await?)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
