use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use tokio::net::TcpListener;

use catalog_qa::api;
use catalog_qa::catalog::load_catalog;
use catalog_qa::config::AppConfig;
use catalog_qa::embedding::EmbeddingEncoder;
use catalog_qa::index::{build_documents, HttpVectorIndex, VectorIndex};
use catalog_qa::qa::QaSpanModel;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "3000")]
    port: u16,

    #[arg(long)]
    catalog_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize colored output
    colored::control::set_override(true);

    // Load environment variables
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let mut config = AppConfig::from_env();
    if let Some(url) = args.catalog_url {
        config.catalog_url = url;
    }

    println!("{}", "Loading product catalog...".cyan());
    let catalog = load_catalog(&config.catalog_url)
        .await
        .context("Failed to load product catalog")?;
    println!("Loaded {} products", catalog.len());

    let encoder =
        EmbeddingEncoder::load(&config.encoder).context("Failed to load embedding model")?;

    println!("{}", "Encoding catalog...".cyan());
    let texts: Vec<&str> = catalog.input_texts().collect();
    let embeddings = encoder
        .encode_batch(&texts)
        .context("Failed to encode catalog")?;

    let documents = build_documents(catalog.records(), embeddings)?;

    // A rejected batch is logged and startup continues; the service can
    // still answer queries without the index.
    let index = HttpVectorIndex::new(config.index_endpoint.clone());
    match index.index_batch(&documents).await {
        Ok(()) => log::info!("Vectors indexed successfully"),
        Err(e) => log::error!("Failed to index vectors: {}", e),
    }

    let extractor = QaSpanModel::load(&config.qa).context("Failed to load QA model")?;

    let app = api::create_api(Arc::new(catalog), Arc::new(extractor));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    println!("Starting API server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("{}", "Ready to accept connections!".green());

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
