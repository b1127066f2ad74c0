//! Environment configuration
//!
//! Keys: INTENTS_ACCOUNT_ID, INTENTS_SHIELDED_ADDRESS (both required),
//! INTENTS_CATALOG_URL, INTENTS_FT_INDEXER_URL, INTENTS_ACCOUNT_INDEXER_URL,
//! INTENTS_TOKENS_SNAPSHOT, INTENTS_HTTP_TIMEOUT_MS. A `.env` file is read if present.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use dotenv::dotenv;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{BalanceBuffers, WalletIdentity};
use crate::shared::constants::{
    BUNDLED_TOKENS_JSON, DEFAULT_ACCOUNT_INDEXER_URL, DEFAULT_CATALOG_URL, DEFAULT_FT_INDEXER_URL,
    INDEXER_TIMEOUT_MS,
};
use crate::shared::error::IntentsError;

pub const ACCOUNT_ID_VAR: &str = "INTENTS_ACCOUNT_ID";
pub const SHIELDED_ADDRESS_VAR: &str = "INTENTS_SHIELDED_ADDRESS";
pub const CATALOG_URL_VAR: &str = "INTENTS_CATALOG_URL";
pub const FT_INDEXER_URL_VAR: &str = "INTENTS_FT_INDEXER_URL";
pub const ACCOUNT_INDEXER_URL_VAR: &str = "INTENTS_ACCOUNT_INDEXER_URL";
pub const TOKENS_SNAPSHOT_VAR: &str = "INTENTS_TOKENS_SNAPSHOT";
pub const HTTP_TIMEOUT_VAR: &str = "INTENTS_HTTP_TIMEOUT_MS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentsConfig {
    pub account_id: String,
    pub shielded_address: String,
    pub catalog_url: String,
    pub ft_indexer_url: String,
    pub account_indexer_url: String,
    /// Fallback snapshot file; the bundled snapshot is used when unset
    pub tokens_snapshot: Option<PathBuf>,
    pub http_timeout_ms: u64,
    pub buffers: BalanceBuffers,
}

impl IntentsConfig {
    /// Load configuration from the process environment and `.env`
    pub fn from_env() -> Result<Self, IntentsError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IntentsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| {
            value(key).ok_or_else(|| IntentsError::config(format!("Required environment variable {} is not set", key)))
        };

        let http_timeout_ms = match value(HTTP_TIMEOUT_VAR) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| IntentsError::config(format!("Invalid {}: {}", HTTP_TIMEOUT_VAR, raw)))?,
            None => INDEXER_TIMEOUT_MS,
        };

        let config = Self {
            account_id: required(ACCOUNT_ID_VAR)?,
            shielded_address: required(SHIELDED_ADDRESS_VAR)?,
            catalog_url: value(CATALOG_URL_VAR).unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
            ft_indexer_url: value(FT_INDEXER_URL_VAR).unwrap_or_else(|| DEFAULT_FT_INDEXER_URL.to_string()),
            account_indexer_url: value(ACCOUNT_INDEXER_URL_VAR)
                .unwrap_or_else(|| DEFAULT_ACCOUNT_INDEXER_URL.to_string()),
            tokens_snapshot: value(TOKENS_SNAPSHOT_VAR).map(PathBuf::from),
            http_timeout_ms,
            buffers: BalanceBuffers::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), IntentsError> {
        for (key, url) in [
            (CATALOG_URL_VAR, &self.catalog_url),
            (FT_INDEXER_URL_VAR, &self.ft_indexer_url),
            (ACCOUNT_INDEXER_URL_VAR, &self.account_indexer_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(IntentsError::config(format!("{} must be an http(s) URL: {}", key, url)));
            }
        }
        if self.http_timeout_ms == 0 {
            return Err(IntentsError::config(format!("{} must be greater than zero", HTTP_TIMEOUT_VAR)));
        }
        Ok(())
    }

    pub fn identity(&self) -> WalletIdentity {
        WalletIdentity::new(self.account_id.clone(), self.shielded_address.clone())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    /// Fallback catalog JSON: the configured snapshot file, else the bundled one
    pub fn load_fallback_snapshot(&self) -> Result<String, IntentsError> {
        match &self.tokens_snapshot {
            Some(path) => {
                log::debug!("Reading token snapshot from {}", path.display());
                Ok(fs::read_to_string(path)?)
            }
            None => Ok(BUNDLED_TOKENS_JSON.to_string()),
        }
    }
}
