//! Token catalog
//!
//! Immutable snapshot of the supported tokens. A snapshot is never edited after
//! it is built; refreshing the catalog means loading a new `TokenCatalog`.

use std::sync::Arc;

use crate::domain::entities::{RawTokenRecord, TokenMetadata};
use crate::domain::repositories::TokenCatalogSource;
use crate::shared::constants::{BUNDLED_TOKENS_JSON, SHIELDED_SYMBOL};
use crate::shared::error::IntentsError;
use crate::shared::types::{ChainSet, ChainTag};

/// Read-only, cheaply cloneable token snapshot
#[derive(Debug, Clone)]
pub struct TokenCatalog {
    tokens: Arc<[TokenMetadata]>,
}

impl TokenCatalog {
    /// Fetch the live catalog, falling back to `fallback_json` when the source
    /// fails or returns no usable items.
    pub async fn load(source: &dyn TokenCatalogSource, fallback_json: &str) -> Result<Self, IntentsError> {
        match source.fetch_token_catalog().await {
            Ok(Some(records)) if !records.is_empty() => {
                let catalog = Self::from_records(records);
                if !catalog.is_empty() {
                    log::info!("Loaded {} tokens from live catalog", catalog.len());
                    return Ok(catalog);
                }
                log::warn!("Live catalog has no supported tokens, using fallback snapshot");
            }
            Ok(_) => log::warn!("Live catalog returned no items, using fallback snapshot"),
            Err(e) => log::warn!("Token catalog fetch failed, using fallback snapshot: {:#}", e),
        }

        let catalog = Self::from_json(fallback_json)?;
        if catalog.is_empty() {
            return Err(IntentsError::catalog("Fallback token snapshot has no supported tokens"));
        }
        log::info!("Loaded {} tokens from fallback snapshot", catalog.len());
        Ok(catalog)
    }

    /// Build a snapshot, skipping malformed records and records on unsupported chains
    pub fn from_records(records: Vec<RawTokenRecord>) -> Self {
        let mut tokens = Vec::with_capacity(records.len());
        for record in records {
            let asset_id = record.defuse_asset_id.clone();
            let chain = record.blockchain.clone();
            match TokenMetadata::from_record(record) {
                Ok(Some(token)) => tokens.push(token),
                Ok(None) => log::warn!("Skipping token {} on unsupported chain {}", asset_id, chain),
                Err(e) => log::warn!("Skipping malformed token {}: {}", asset_id, e),
            }
        }
        Self { tokens: tokens.into() }
    }

    /// Parse a snapshot in the catalog API record format
    pub fn from_json(json: &str) -> Result<Self, IntentsError> {
        let records: Vec<RawTokenRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// The snapshot compiled into the crate
    pub fn bundled() -> Result<Self, IntentsError> {
        Self::from_json(BUNDLED_TOKENS_JSON)
    }

    pub fn tokens(&self) -> &[TokenMetadata] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn by_contract_address(&self, contract_address: &str) -> Option<&TokenMetadata> {
        self.tokens.iter().find(|token| {
            token
                .contract_address
                .as_deref()
                .is_some_and(|address| address.eq_ignore_ascii_case(contract_address))
        })
    }

    /// Entries for `symbol` whose chain is in `chains`, in catalog order
    pub fn by_symbol_and_chains(&self, symbol: &str, chains: &ChainSet) -> Vec<&TokenMetadata> {
        self.tokens
            .iter()
            .filter(|token| token.matches_symbol(symbol) && chains.contains(&token.blockchain))
            .collect()
    }

    pub fn by_symbol(&self, symbol: &str) -> Vec<&TokenMetadata> {
        self.tokens.iter().filter(|token| token.matches_symbol(symbol)).collect()
    }

    pub fn by_pool_asset_id(&self, asset_id: &str) -> Option<&TokenMetadata> {
        self.tokens.iter().find(|token| token.pool_asset_id == asset_id)
    }

    /// The shielded chain's native asset
    pub fn shielded_token(&self) -> Option<&TokenMetadata> {
        self.tokens
            .iter()
            .find(|token| token.symbol == SHIELDED_SYMBOL && token.blockchain == ChainTag::Zec)
    }

    /// Every pool asset id, aligned with `tokens()`
    pub fn pool_asset_ids(&self) -> Vec<String> {
        self.tokens.iter().map(|token| token.pool_asset_id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockTokenCatalogSource;

    fn live_records() -> Vec<RawTokenRecord> {
        let json = r#"[
            {"defuse_asset_id": "nep141:zec.omft.near", "decimals": 8, "blockchain": "zec",
             "symbol": "ZEC", "price": 40.0, "min_withdraw_amount": "100000"}
        ]"#;
        serde_json::from_str(json).expect("records")
    }

    #[test]
    fn test_bundled_catalog() {
        let catalog = TokenCatalog::bundled().expect("bundled catalog");

        assert!(!catalog.is_empty());
        // SOL is not a supported chain
        assert!(catalog.by_symbol("SOL").is_empty());
        assert_eq!(catalog.by_symbol("usdc").len(), 4);
        assert_eq!(catalog.pool_asset_ids().len(), catalog.len());
    }

    #[test]
    fn test_lookups() {
        let catalog = TokenCatalog::bundled().expect("bundled catalog");

        let wnear = catalog.by_contract_address("wrap.near").expect("wrap.near");
        assert_eq!(wnear.display_symbol(), "NEAR");
        assert!(catalog.by_contract_address("unknown.near").is_none());

        let chains: ChainSet = [ChainTag::Near].into_iter().collect();
        let matches = catalog.by_symbol_and_chains("USDC", &chains);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].blockchain, ChainTag::Near);

        let shielded = catalog.shielded_token().expect("zec");
        assert!(catalog.by_pool_asset_id(&shielded.pool_asset_id).is_some());
    }

    #[tokio::test]
    async fn test_load_prefers_live_catalog() {
        let mut source = MockTokenCatalogSource::new();
        source
            .expect_fetch_token_catalog()
            .times(1)
            .returning(|| Ok(Some(live_records())));

        let catalog = TokenCatalog::load(&source, BUNDLED_TOKENS_JSON).await.expect("catalog");

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.tokens()[0].symbol, "ZEC");
    }

    #[tokio::test]
    async fn test_load_skips_malformed_live_record() {
        let mut records = live_records();
        records.push(RawTokenRecord {
            defuse_asset_id: "nep141:x.near".to_string(),
            decimals: 24,
            blockchain: "near".to_string(),
            symbol: " ".to_string(),
            price: None,
            price_updated_at: None,
            contract_address: Some("x.near".to_string()),
            min_withdraw_amount: None,
        });
        let mut source = MockTokenCatalogSource::new();
        source.expect_fetch_token_catalog().returning(move || Ok(Some(records.clone())));

        let catalog = TokenCatalog::load(&source, BUNDLED_TOKENS_JSON).await.expect("catalog");

        assert_eq!(catalog.len(), 1);
        assert!(catalog.shielded_token().is_some());
        assert!(catalog.by_contract_address("x.near").is_none());
    }

    #[tokio::test]
    async fn test_load_falls_back_when_no_live_record_builds() {
        let mut source = MockTokenCatalogSource::new();
        source.expect_fetch_token_catalog().returning(|| {
            let mut records = live_records();
            records[0].decimals = 40;
            Ok(Some(records))
        });

        let catalog = TokenCatalog::load(&source, BUNDLED_TOKENS_JSON).await.expect("catalog");
        assert!(catalog.len() > 1);
    }

    #[tokio::test]
    async fn test_load_falls_back_on_failure() {
        let mut source = MockTokenCatalogSource::new();
        source
            .expect_fetch_token_catalog()
            .returning(|| Err(anyhow::anyhow!("connection refused")));

        let catalog = TokenCatalog::load(&source, BUNDLED_TOKENS_JSON).await.expect("catalog");
        assert!(catalog.len() > 1);
    }

    #[tokio::test]
    async fn test_load_falls_back_on_missing_items() {
        let mut source = MockTokenCatalogSource::new();
        source.expect_fetch_token_catalog().returning(|| Ok(None));

        let catalog = TokenCatalog::load(&source, BUNDLED_TOKENS_JSON).await.expect("catalog");
        assert!(catalog.shielded_token().is_some());
    }

    #[tokio::test]
    async fn test_load_fails_without_usable_snapshot() {
        let mut source = MockTokenCatalogSource::new();
        source.expect_fetch_token_catalog().returning(|| Ok(Some(Vec::new())));

        let result = TokenCatalog::load(&source, "[]").await;
        assert!(matches!(result, Err(IntentsError::Catalog(_))));
    }

    #[test]
    fn test_snapshot_is_shared_not_copied() {
        let catalog = TokenCatalog::bundled().expect("bundled catalog");
        let clone = catalog.clone();

        assert!(std::ptr::eq(catalog.tokens().as_ptr(), clone.tokens().as_ptr()));
    }
}
