use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payment_network::application::engine::PaymentEngine;
use payment_network::domain::ids::RandomIdGenerator;
use payment_network::domain::ports::StoreRef;
use payment_network::infrastructure::in_memory::InMemoryStore;
use payment_network::interfaces::cli::{self, Cli};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "storage-rocksdb")]
fn open_store(db_path: Option<PathBuf>) -> Result<StoreRef> {
    use payment_network::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "opening RocksDB store");
            Ok(Arc::new(RocksDBStore::open(path).into_diagnostic()?))
        }
        None => Ok(Arc::new(InMemoryStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_store(db_path: Option<PathBuf>) -> Result<StoreRef> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
        );
    }
    Ok(Arc::new(InMemoryStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = open_store(cli.db_path)?;
    let engine = PaymentEngine::new(store, Arc::new(RandomIdGenerator));

    let output = cli::execute(&engine, cli.command).await.into_diagnostic()?;
    println!("{output}");

    Ok(())
}
