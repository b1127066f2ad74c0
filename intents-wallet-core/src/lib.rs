//! Intents Wallet Core
//!
//! Moves value between a personal wallet, the shared intents settlement pool
//! and external blockchains.
//!
//! ## Architecture
//!
//! - **Core**: token catalog, address classification, route resolution,
//!   balance aggregation, transfer orchestration
//! - **Domain**: entities and the collaborator traits the core consumes
//! - **Infrastructure**: environment config, HTTP indexers, terminal prompt
//! - **Shared**: common types, constants, errors and amount utilities
//!
//! ## Usage
//!
//! ```rust,ignore
//! use intents_wallet_core::{IntentsConfig, IntentsCore};
//!
//! intents_wallet_core::init();
//! let config = IntentsConfig::from_env()?;
//! let core = IntentsCore::load(&config, collaborators).await?;
//!
//! let balances = core.wallet_balances(None).await?;
//! let state = core.swap("ZEC", dec!(0.0623), "USDC", Some("alice.near"), None).await?;
//! ```

use std::sync::Arc;

use env_logger::Env;
use rust_decimal::Decimal;

use crate::core::classifier::is_near_account;

pub mod core;
pub mod domain;
pub mod shared;
pub mod infrastructure;

// Re-export specific components
pub use crate::core::{
    AddressClassifier, BalanceAggregator, RouteResolution, TokenCatalog, TokenRouteResolver, TransferOrchestrator,
};
pub use crate::infrastructure::IntentsConfig;

// Re-export domain entities and collaborator traits
pub use crate::domain::{
    BalanceBuffers, BalanceEntry, ChainChoicePrompt, IntentsPool, PipelineAbort, PipelineOperation, PipelineStage,
    PipelineState, PoolBalance, PoolBalances, ReserveBalanceIndexer, ShieldedAddressValidator, ShieldedChain,
    TokenCatalogSource, TokenMetadata, TransferRoute, WalletBalances, WalletHoldingsIndexer, WalletIdentity,
};

// Re-export shared types
pub use shared::error::{Dependency, IntentsError};
pub use shared::types::{ChainSet, ChainTag, RawAmount};

// Version information
pub use shared::constants::{NAME, VERSION};

/// Initialize logging; later calls are no-ops
pub fn init() {
    if env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .try_init()
        .is_err()
    {
        log::debug!("Logger already initialized");
    }
}

/// Every external capability the core needs
#[derive(Clone)]
pub struct Collaborators {
    pub catalog_source: Arc<dyn TokenCatalogSource>,
    pub holdings: Arc<dyn WalletHoldingsIndexer>,
    pub reserve: Arc<dyn ReserveBalanceIndexer>,
    pub shielded_validator: Arc<dyn ShieldedAddressValidator>,
    pub shielded: Arc<dyn ShieldedChain>,
    pub pool: Arc<dyn IntentsPool>,
    pub prompt: Arc<dyn ChainChoicePrompt>,
}

/// Main entry point bundling the balance and transfer operations
pub struct IntentsCore {
    catalog: TokenCatalog,
    collaborators: Collaborators,
    identity: WalletIdentity,
    buffers: BalanceBuffers,
    balances: BalanceAggregator,
    orchestrator: TransferOrchestrator,
}

impl IntentsCore {
    pub fn new(
        catalog: TokenCatalog,
        collaborators: Collaborators,
        identity: WalletIdentity,
        buffers: BalanceBuffers,
    ) -> Self {
        let balances = BalanceAggregator::new(
            catalog.clone(),
            collaborators.holdings.clone(),
            collaborators.reserve.clone(),
            collaborators.shielded.clone(),
            collaborators.pool.clone(),
            identity.shielded_address.clone(),
        )
        .with_buffers(buffers);
        let orchestrator = TransferOrchestrator::new(
            catalog.clone(),
            AddressClassifier::new(collaborators.shielded_validator.clone()),
            collaborators.pool.clone(),
            collaborators.shielded.clone(),
            collaborators.prompt.clone(),
            identity.clone(),
        );

        Self {
            catalog,
            collaborators,
            identity,
            buffers,
            balances,
            orchestrator,
        }
    }

    /// Load the token catalog (live, else the configured fallback) and wire the core
    pub async fn load(config: &IntentsConfig, collaborators: Collaborators) -> Result<Self, IntentsError> {
        let fallback = config.load_fallback_snapshot()?;
        let catalog = TokenCatalog::load(collaborators.catalog_source.as_ref(), &fallback).await?;
        Ok(Self::new(catalog, collaborators, config.identity(), config.buffers))
    }

    /// Swap in a freshly loaded catalog snapshot
    pub async fn refresh_catalog(&mut self, fallback_json: &str) -> Result<(), IntentsError> {
        let catalog = TokenCatalog::load(self.collaborators.catalog_source.as_ref(), fallback_json).await?;
        *self = Self::new(catalog, self.collaborators.clone(), self.identity.clone(), self.buffers);
        Ok(())
    }

    pub fn catalog(&self) -> &TokenCatalog {
        &self.catalog
    }

    pub fn identity(&self) -> &WalletIdentity {
        &self.identity
    }

    /// Chains `address` is valid on
    pub async fn classify_address(&self, address: &str) -> Result<ChainSet, IntentsError> {
        AddressClassifier::new(self.collaborators.shielded_validator.clone())
            .classify(address)
            .await
    }

    /// Wallet balances of `account_id`, defaulting to the configured account
    pub async fn wallet_balances(&self, account_id: Option<&str>) -> Result<WalletBalances, IntentsError> {
        self.balances.wallet_balances(self.account_or_default(account_id)?).await
    }

    /// Pool balances of `account_id`, defaulting to the configured account
    pub async fn pool_balances(&self, account_id: Option<&str>) -> Result<PoolBalances, IntentsError> {
        self.balances.pool_balances(self.account_or_default(account_id)?).await
    }

    pub async fn deposit(
        &self,
        token_symbol: &str,
        amount: Decimal,
        sender: Option<&str>,
    ) -> Result<PipelineState, PipelineAbort> {
        self.orchestrator.deposit(token_symbol, amount, sender).await
    }

    pub async fn swap_in_pool(
        &self,
        token_in: &str,
        amount_in: Decimal,
        token_out: &str,
    ) -> Result<PipelineState, PipelineAbort> {
        self.orchestrator.swap_in_pool(token_in, amount_in, token_out).await
    }

    pub async fn withdraw(
        &self,
        token_symbol: &str,
        amount: Decimal,
        receiver: Option<&str>,
    ) -> Result<PipelineState, PipelineAbort> {
        self.orchestrator.withdraw(token_symbol, amount, receiver).await
    }

    pub async fn swap(
        &self,
        token_in: &str,
        amount_in: Decimal,
        token_out: &str,
        receiver: Option<&str>,
        sender: Option<&str>,
    ) -> Result<PipelineState, PipelineAbort> {
        self.orchestrator
            .swap(token_in, amount_in, token_out, receiver, sender)
            .await
    }

    fn account_or_default<'a>(&'a self, account_id: Option<&'a str>) -> Result<&'a str, IntentsError> {
        match account_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) if is_near_account(id) => Ok(id),
            Some(id) => Err(IntentsError::validation(format!("{} is not a valid NEAR account id", id))),
            None => Ok(self.identity.account_id.as_str()),
        }
    }
}
