//! Intents settlement pool
//!
//! Mutating calls may block for the pool's full confirmation latency.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::entities::TokenMetadata;
use crate::shared::types::RawAmount;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IntentsPool: Send + Sync {
    /// Raw balances aligned index-for-index with `asset_ids`
    async fn fetch_pool_batch_balances(
        &self,
        account_id: &str,
        asset_ids: &[String],
    ) -> anyhow::Result<Vec<RawAmount>>;

    async fn submit_deposit(&self, amount: Decimal, source_address: &str, token_symbol: &str) -> anyhow::Result<()>;

    /// Returns the amount of `token_out` received
    async fn submit_pool_swap(&self, token_in: &str, token_out: &str, amount_in: Decimal) -> anyhow::Result<Decimal>;

    async fn submit_pool_withdraw(
        &self,
        token_symbol: &str,
        amount: Decimal,
        receiver: &str,
        token: &TokenMetadata,
    ) -> anyhow::Result<()>;
}
