//! Wallet indexers
//!
//! Read-only account views served by chain indexers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::types::RawAmount;

/// One fungible-token holding as reported by the indexer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FungibleHolding {
    pub contract_id: String,
    pub balance: RawAmount,
}

/// Fungible-token holdings of a wallet
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletHoldingsIndexer: Send + Sync {
    async fn fetch_wallet_fungible_holdings(&self, account_id: &str) -> anyhow::Result<Vec<FungibleHolding>>;
}

/// Native reserve-currency balance of a wallet, in raw units
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReserveBalanceIndexer: Send + Sync {
    async fn fetch_reserve_currency_balance(&self, account_id: &str) -> anyhow::Result<RawAmount>;
}
