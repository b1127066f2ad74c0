//! Constants for the intents core
//!
//! This module contains all constants used throughout the intents core.

use rust_decimal::Decimal;

// Reserve currency constants
pub const RESERVE_SYMBOL: &str = "NEAR";
pub const WRAPPED_RESERVE_SYMBOL: &str = "WNEAR";
pub const WRAPPED_RESERVE_CONTRACT: &str = "wrap.near";

/// Storage floor every NEAR account keeps, in yoctoNEAR (0.025 NEAR)
pub const RESERVE_BUFFER_RAW: u128 = 25_000_000_000_000_000_000_000;

// Shielded chain constants
pub const SHIELDED_SYMBOL: &str = "ZEC";

/// Network fee held back from the shielded balance: 0.0004 ZEC
pub const SHIELDED_FEE_BUFFER: Decimal = Decimal::from_parts(4, 0, 0, false, 4);

// Pool constants
pub const POOL_ASSET_PREFIX: &str = "nep141:";

// Endpoint defaults
pub const DEFAULT_CATALOG_URL: &str = "https://api-mng-console.chaindefuser.com/api/tokens";
pub const DEFAULT_FT_INDEXER_URL: &str = "https://api.fastnear.com";
pub const DEFAULT_ACCOUNT_INDEXER_URL: &str = "https://api.nearblocks.io";

// Network timeouts
pub const CATALOG_TIMEOUT_MS: u64 = 2000; // 2 seconds
pub const INDEXER_TIMEOUT_MS: u64 = 10000; // 10 seconds

// Amount limits
pub const MAX_TOKEN_DECIMALS: u32 = 28;

/// Bundled catalog snapshot used when the live catalog is unavailable
pub const BUNDLED_TOKENS_JSON: &str = include_str!("../../data/tokens.json");

// Build information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
