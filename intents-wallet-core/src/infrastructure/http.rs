//! HTTP collaborators
//!
//! `reqwest` clients for the token catalog API and the two account indexers.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::domain::entities::RawTokenRecord;
use crate::domain::repositories::{FungibleHolding, ReserveBalanceIndexer, TokenCatalogSource, WalletHoldingsIndexer};
use crate::shared::error::IntentsError;
use crate::shared::types::RawAmount;
use crate::shared::utils::parse_raw_amount;

fn build_client(timeout: Duration) -> Result<Client, IntentsError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| IntentsError::config(format!("Failed to build HTTP client: {}", e)))
}

fn parse_base_url(base_url: impl Into<String>) -> Result<Url, IntentsError> {
    let base_url: String = base_url.into();
    Url::parse(base_url.trim()).map_err(|e| IntentsError::config(format!("Invalid base URL {}: {}", base_url, e)))
}

/// Append path segments to `base`, percent-encoding each one
fn account_url(base: &Url, segments: &[&str]) -> anyhow::Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("{} cannot be used as a base URL", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn get_json<T: for<'de> Deserialize<'de>>(client: &Client, url: &str) -> anyhow::Result<T> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()
        .with_context(|| format!("GET {}", url))?;
    response
        .json::<T>()
        .await
        .with_context(|| format!("Invalid response from {}", url))
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    items: Option<Vec<RawTokenRecord>>,
}

/// Live token catalog API
pub struct HttpCatalogSource {
    client: Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, IntentsError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl TokenCatalogSource for HttpCatalogSource {
    async fn fetch_token_catalog(&self) -> anyhow::Result<Option<Vec<RawTokenRecord>>> {
        let response: CatalogResponse = get_json(&self.client, &self.url).await?;
        Ok(response.items)
    }
}

#[derive(Debug, Deserialize)]
struct FtResponse {
    #[serde(default)]
    tokens: Vec<FtToken>,
}

#[derive(Debug, Deserialize)]
struct FtToken {
    contract_id: String,
    #[serde(default)]
    balance: String,
}

impl FtResponse {
    fn into_holdings(self) -> anyhow::Result<Vec<FungibleHolding>> {
        self.tokens
            .into_iter()
            .map(|token| {
                let balance = if token.balance.trim().is_empty() {
                    0
                } else {
                    parse_raw_amount(&token.balance)
                        .with_context(|| format!("balance of {}", token.contract_id))?
                };
                Ok(FungibleHolding {
                    contract_id: token.contract_id,
                    balance,
                })
            })
            .collect()
    }
}

/// Fungible-token holdings from the FastNear API
pub struct FastNearIndexer {
    client: Client,
    base_url: Url,
}

impl FastNearIndexer {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, IntentsError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: parse_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl WalletHoldingsIndexer for FastNearIndexer {
    async fn fetch_wallet_fungible_holdings(&self, account_id: &str) -> anyhow::Result<Vec<FungibleHolding>> {
        let url = account_url(&self.base_url, &["v1", "account", account_id, "ft"])?;
        let response: FtResponse = get_json(&self.client, url.as_str()).await?;
        response.into_holdings()
    }
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    #[serde(default)]
    account: Vec<AccountView>,
}

#[derive(Debug, Deserialize)]
struct AccountView {
    #[serde(default)]
    amount: Option<String>,
}

impl AccountResponse {
    /// Missing account data reads as an empty balance
    fn native_balance(&self) -> anyhow::Result<RawAmount> {
        match self.account.first().and_then(|view| view.amount.as_deref()) {
            Some(amount) => Ok(parse_raw_amount(amount)?),
            None => Ok(0),
        }
    }
}

/// Native NEAR balance from the NearBlocks API
pub struct NearBlocksIndexer {
    client: Client,
    base_url: Url,
}

impl NearBlocksIndexer {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, IntentsError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: parse_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl ReserveBalanceIndexer for NearBlocksIndexer {
    async fn fetch_reserve_currency_balance(&self, account_id: &str) -> anyhow::Result<RawAmount> {
        let url = account_url(&self.base_url, &["v1", "account", account_id])?;
        let response: AccountResponse = get_json(&self.client, url.as_str()).await?;
        response.native_balance()
    }
}
