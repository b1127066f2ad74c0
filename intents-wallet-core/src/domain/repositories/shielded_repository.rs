//! Shielded chain capabilities
//!
//! Address validation is kept separate so the classifier can depend on it alone.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque account handle returned by the shielded node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShieldedAccount(pub String);

/// Balance split as the shielded node reports it, in whole coins
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ShieldedBalance {
    pub transparent: Decimal,
    pub shielded: Decimal,
}

impl ShieldedBalance {
    pub fn total(&self) -> Decimal {
        self.transparent + self.shielded
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShieldedAddressValidator: Send + Sync {
    async fn is_valid_shielded_address(&self, address: &str) -> anyhow::Result<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShieldedChain: Send + Sync {
    async fn shielded_account_for_address(&self, address: &str) -> anyhow::Result<ShieldedAccount>;

    async fn shielded_account_balance(&self, account: &ShieldedAccount) -> anyhow::Result<ShieldedBalance>;

    async fn submit_shielded_withdraw(&self, token_symbol: &str, amount: Decimal, receiver: &str) -> anyhow::Result<()>;
}
