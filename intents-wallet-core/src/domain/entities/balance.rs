//! Balance entities produced by the aggregator

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenMetadata;
use crate::shared::constants::{RESERVE_BUFFER_RAW, SHIELDED_FEE_BUFFER};
use crate::shared::types::{ChainTag, RawAmount};

/// One priced holding; produced fresh per query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceEntry {
    pub asset_id: String,
    pub symbol: String,
    pub blockchain: ChainTag,
    pub amount: Decimal,
    pub amount_usd: Decimal,
}

impl BalanceEntry {
    /// Price `amount` against the token's catalog price, using display names
    pub fn priced(token: &TokenMetadata, amount: Decimal) -> Self {
        Self {
            asset_id: token.display_asset_id().to_string(),
            symbol: token.display_symbol().to_string(),
            blockchain: token.blockchain,
            amount,
            amount_usd: amount * token.price_usd,
        }
    }
}

/// Wallet view; distinguishes "nothing held" from a failed fetch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum WalletBalances {
    Holdings(Vec<BalanceEntry>),
    NoHoldings,
}

impl WalletBalances {
    pub fn from_entries(entries: Vec<BalanceEntry>) -> Self {
        if entries.is_empty() {
            WalletBalances::NoHoldings
        } else {
            WalletBalances::Holdings(entries)
        }
    }

    pub fn entries(&self) -> &[BalanceEntry] {
        match self {
            WalletBalances::Holdings(entries) => entries,
            WalletBalances::NoHoldings => &[],
        }
    }

    pub fn total_usd(&self) -> Decimal {
        self.entries().iter().map(|entry| entry.amount_usd).sum()
    }
}

/// Pool holding summed across every chain variant of one display symbol
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PoolBalance {
    pub amount: Decimal,
    pub amount_usd: Decimal,
}

/// Pool holdings keyed by display symbol
pub type PoolBalances = BTreeMap<String, PoolBalance>;

/// Amounts held back from reported wallet balances
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BalanceBuffers {
    /// Storage floor on the reserve currency, raw units
    pub reserve_raw: RawAmount,
    /// Network fee on the shielded balance, whole coins
    pub shielded_fee: Decimal,
}

impl Default for BalanceBuffers {
    fn default() -> Self {
        Self {
            reserve_raw: RESERVE_BUFFER_RAW,
            shielded_fee: SHIELDED_FEE_BUFFER,
        }
    }
}
