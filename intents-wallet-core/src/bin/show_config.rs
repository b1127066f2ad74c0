use std::collections::BTreeMap;
use std::process::ExitCode;

use intents_wallet_core::infrastructure::HttpCatalogSource;
use intents_wallet_core::shared::constants::CATALOG_TIMEOUT_MS;
use intents_wallet_core::{IntentsConfig, TokenCatalog};

#[tokio::main]
async fn main() -> ExitCode {
    intents_wallet_core::init();

    let config = match IntentsConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Intents Wallet Core Configuration:\n");
    println!("  Account ID: {}", config.account_id);
    println!("  Shielded Address: {}", config.shielded_address);
    println!("  Token Catalog URL: {}", config.catalog_url);
    println!("  FT Indexer URL: {}", config.ft_indexer_url);
    println!("  Account Indexer URL: {}", config.account_indexer_url);
    println!(
        "  Token Snapshot: {}",
        config
            .tokens_snapshot
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "(bundled)".to_string())
    );
    println!("  HTTP Timeout: {} ms", config.http_timeout_ms);
    println!("  Reserve Buffer (raw): {}", config.buffers.reserve_raw);
    println!("  Shielded Fee Buffer: {}", config.buffers.shielded_fee);

    let live = std::env::args().any(|arg| arg == "--live");
    let catalog = match load_catalog(&config, live).await {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Failed to load token catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut chains_by_symbol: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for token in catalog.tokens() {
        chains_by_symbol
            .entry(token.display_symbol())
            .or_default()
            .push(token.blockchain.as_str());
    }

    println!("\nSupported Tokens ({} entries):\n", catalog.len());
    for (symbol, chains) in chains_by_symbol {
        println!("  {}: {}", symbol, chains.join(", "));
    }

    ExitCode::SUCCESS
}

async fn load_catalog(config: &IntentsConfig, live: bool) -> Result<TokenCatalog, intents_wallet_core::IntentsError> {
    let fallback = config.load_fallback_snapshot()?;
    if !live {
        return TokenCatalog::from_json(&fallback);
    }
    let source = HttpCatalogSource::new(
        config.catalog_url.clone(),
        std::time::Duration::from_millis(CATALOG_TIMEOUT_MS),
    )?;
    TokenCatalog::load(&source, &fallback).await
}
