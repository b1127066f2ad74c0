//! Interactive chain disambiguation

use async_trait::async_trait;

use crate::shared::types::ChainTag;

/// Asks an external actor to pick one chain; no built-in timeout
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainChoicePrompt: Send + Sync {
    /// Returns the chain exactly as the actor typed it
    async fn prompt_chain_choice(&self, token_symbol: &str, candidates: &[ChainTag]) -> anyhow::Result<String>;
}
