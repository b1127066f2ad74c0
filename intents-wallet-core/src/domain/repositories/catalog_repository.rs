//! Token catalog source

use async_trait::async_trait;

use crate::domain::entities::RawTokenRecord;

/// Live token catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenCatalogSource: Send + Sync {
    /// Fetch the current catalog; `Ok(None)` when the source has no item list
    async fn fetch_token_catalog(&self) -> anyhow::Result<Option<Vec<RawTokenRecord>>>;
}
