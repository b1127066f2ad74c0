//! Token entity for the intents core

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::constants::{MAX_TOKEN_DECIMALS, RESERVE_SYMBOL, SHIELDED_SYMBOL, WRAPPED_RESERVE_SYMBOL};
use crate::shared::error::IntentsError;
use crate::shared::types::ChainTag;
use crate::shared::utils::{display_asset_id, shift_decimals};

/// Token record as served by the catalog API and the bundled snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTokenRecord {
    pub defuse_asset_id: String,
    pub decimals: u32,
    pub blockchain: String,
    pub symbol: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub price_updated_at: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    /// Raw units, as the chain counts them
    #[serde(default)]
    pub min_withdraw_amount: Option<Decimal>,
}

/// One supported (symbol, blockchain) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenMetadata {
    /// Upper-cased catalog symbol
    pub symbol: String,
    pub blockchain: ChainTag,
    pub decimals: u32,
    pub contract_address: Option<String>,
    pub pool_asset_id: String,
    pub price_usd: Decimal,
    /// Already divided by `10^decimals`
    pub min_withdraw_amount: Decimal,
}

impl TokenMetadata {
    /// Build metadata from a raw record.
    ///
    /// Returns `Ok(None)` when the record belongs to a chain this core does not route to.
    pub fn from_record(record: RawTokenRecord) -> Result<Option<Self>, IntentsError> {
        let blockchain = match record.blockchain.parse::<ChainTag>() {
            Ok(chain) => chain,
            Err(_) => return Ok(None),
        };

        if record.symbol.trim().is_empty() {
            return Err(IntentsError::catalog(format!(
                "Token {} has an empty symbol",
                record.defuse_asset_id
            )));
        }

        if record.decimals > MAX_TOKEN_DECIMALS {
            return Err(IntentsError::catalog(format!(
                "Token {} has {} decimals, more than the supported {}",
                record.defuse_asset_id, record.decimals, MAX_TOKEN_DECIMALS
            )));
        }

        let min_withdraw_amount = match record.min_withdraw_amount {
            Some(raw) => shift_decimals(raw, record.decimals)?,
            None => Decimal::ZERO,
        };

        Ok(Some(Self {
            symbol: record.symbol.trim().to_uppercase(),
            blockchain,
            decimals: record.decimals,
            contract_address: record
                .contract_address
                .filter(|address| !address.trim().is_empty()),
            pool_asset_id: record.defuse_asset_id,
            price_usd: record.price.unwrap_or(Decimal::ZERO),
            min_withdraw_amount,
        }))
    }

    /// Symbol shown to users; wrapped NEAR is shown as NEAR
    pub fn display_symbol(&self) -> &str {
        if self.is_wrapped_reserve() {
            RESERVE_SYMBOL
        } else {
            &self.symbol
        }
    }

    /// Pool asset id without its namespace prefix
    pub fn display_asset_id(&self) -> &str {
        display_asset_id(&self.pool_asset_id)
    }

    pub fn is_wrapped_reserve(&self) -> bool {
        self.symbol == WRAPPED_RESERVE_SYMBOL
    }

    pub fn is_shielded_asset(&self) -> bool {
        self.symbol == SHIELDED_SYMBOL
    }

    /// Case-insensitive match against the catalog symbol or its display form
    pub fn matches_symbol(&self, symbol: &str) -> bool {
        let symbol = symbol.trim();
        self.symbol.eq_ignore_ascii_case(symbol) || self.display_symbol().eq_ignore_ascii_case(symbol)
    }
}
