//! Error handling for the intents core
//!
//! This module defines the error types used throughout the intents core.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::PipelineStage;
use crate::shared::types::ChainTag;

/// External capability whose failure is being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    TokenCatalog,
    WalletHoldings,
    ReserveBalance,
    ShieldedValidation,
    ShieldedAccount,
    ShieldedBalance,
    PoolBalances,
    Deposit,
    PoolSwap,
    PoolWithdraw,
    ShieldedWithdraw,
    ChainPrompt,
}

impl Dependency {
    pub fn name(&self) -> &'static str {
        match self {
            Dependency::TokenCatalog => "token catalog",
            Dependency::WalletHoldings => "wallet token indexer",
            Dependency::ReserveBalance => "reserve balance indexer",
            Dependency::ShieldedValidation => "shielded address validation",
            Dependency::ShieldedAccount => "shielded account lookup",
            Dependency::ShieldedBalance => "shielded balance",
            Dependency::PoolBalances => "intents pool balances",
            Dependency::Deposit => "intents deposit",
            Dependency::PoolSwap => "intents swap",
            Dependency::PoolWithdraw => "intents withdraw",
            Dependency::ShieldedWithdraw => "shielded withdraw",
            Dependency::ChainPrompt => "chain prompt",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Intents core error type
#[derive(Error, Debug, Clone)]
pub enum IntentsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{address} is not a valid address for any supported chain")]
    UnsupportedDestination { address: String },

    #[error("Token {symbol} is not supported for withdrawing into {receiver} on chains [{}]", join_chains(.chains))]
    UnsupportedRoute {
        symbol: String,
        receiver: String,
        chains: Vec<ChainTag>,
    },

    #[error("Token {symbol} is not supported for withdrawing into {receiver} on chain {choice}")]
    DisambiguationExhausted {
        symbol: String,
        receiver: String,
        choice: String,
    },

    #[error("Withdraw amount {amount} {symbol} is below the minimum of {minimum}")]
    BelowMinimumWithdraw {
        symbol: String,
        amount: Decimal,
        minimum: Decimal,
    },

    #[error("{dependency} failed: {message}")]
    Dependency {
        dependency: Dependency,
        message: String,
    },

    #[error("Funds moved but final transfer failed while {failed_at} (completed: [{}]): {source}", join_stages(.completed))]
    PartialExposure {
        completed: Vec<PipelineStage>,
        failed_at: PipelineStage,
        amount_out: Option<Decimal>,
        #[source]
        source: Box<IntentsError>,
    },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_chains(chains: &[ChainTag]) -> String {
    chains.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
}

fn join_stages(stages: &[PipelineStage]) -> String {
    stages.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", ")
}

impl IntentsError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Wrap a collaborator failure with the capability that produced it
    pub fn dependency(dependency: Dependency, err: anyhow::Error) -> Self {
        Self::Dependency {
            dependency,
            message: format!("{err:#}"),
        }
    }

    /// True for failures detected before any external mutating call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::UnsupportedDestination { .. }
                | Self::UnsupportedRoute { .. }
                | Self::BelowMinimumWithdraw { .. }
                | Self::DisambiguationExhausted { .. }
        )
    }

    /// The failing dependency, looking through a partial-exposure wrapper
    pub fn failed_dependency(&self) -> Option<Dependency> {
        match self {
            Self::Dependency { dependency, .. } => Some(*dependency),
            Self::PartialExposure { source, .. } => source.failed_dependency(),
            _ => None,
        }
    }
}

/// Adapter for turning collaborator results into core results
pub trait DependencyContext<T> {
    fn dependency(self, dependency: Dependency) -> Result<T, IntentsError>;
}

impl<T> DependencyContext<T> for anyhow::Result<T> {
    fn dependency(self, dependency: Dependency) -> Result<T, IntentsError> {
        self.map_err(|e| IntentsError::dependency(dependency, e))
    }
}

// Standard library error conversions
impl From<std::io::Error> for IntentsError {
    fn from(err: std::io::Error) -> Self {
        Self::config(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for IntentsError {
    fn from(err: serde_json::Error) -> Self {
        Self::catalog(format!("JSON error: {}", err))
    }
}

impl From<rust_decimal::Error> for IntentsError {
    fn from(err: rust_decimal::Error) -> Self {
        Self::validation(format!("Decimal error: {}", err))
    }
}

impl From<tokio::task::JoinError> for IntentsError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Task join error: {}", err))
    }
}
