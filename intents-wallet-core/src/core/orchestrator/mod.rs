//! Transfer orchestration
//!
//! Runs deposit, pool swap, withdraw and the combined deposit → swap → withdraw
//! pipeline. Stages run strictly in order and nothing is rolled back: when a
//! later stage fails after funds moved, the failure is reported as partial
//! exposure together with the stages that completed.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::core::catalog::TokenCatalog;
use crate::core::classifier::AddressClassifier;
use crate::core::routing::{RouteResolution, TokenRouteResolver};
use crate::domain::entities::{
    PipelineAbort, PipelineOperation, PipelineStage, PipelineState, TransferRoute, WalletIdentity,
};
use crate::domain::repositories::{ChainChoicePrompt, IntentsPool, ShieldedChain};
use crate::shared::error::{Dependency, DependencyContext, IntentsError};

pub struct TransferOrchestrator {
    catalog: TokenCatalog,
    classifier: AddressClassifier,
    resolver: TokenRouteResolver,
    pool: Arc<dyn IntentsPool>,
    shielded: Arc<dyn ShieldedChain>,
    prompt: Arc<dyn ChainChoicePrompt>,
    identity: WalletIdentity,
}

impl TransferOrchestrator {
    pub fn new(
        catalog: TokenCatalog,
        classifier: AddressClassifier,
        pool: Arc<dyn IntentsPool>,
        shielded: Arc<dyn ShieldedChain>,
        prompt: Arc<dyn ChainChoicePrompt>,
        identity: WalletIdentity,
    ) -> Self {
        Self {
            catalog,
            classifier,
            resolver: TokenRouteResolver::new(),
            pool,
            shielded,
            prompt,
            identity,
        }
    }

    pub fn identity(&self) -> &WalletIdentity {
        &self.identity
    }

    /// Move `amount` of `token_symbol` from the wallet into the pool
    pub async fn deposit(
        &self,
        token_symbol: &str,
        amount: Decimal,
        sender: Option<&str>,
    ) -> Result<PipelineState, PipelineAbort> {
        let mut state = PipelineState::new(PipelineOperation::Deposit, token_symbol.trim().to_uppercase(), amount);
        let result = self.run_deposit(&mut state, token_symbol, amount, sender).await;
        finish(state, result)
    }

    /// Swap inside the pool; nothing enters or leaves it
    pub async fn swap_in_pool(
        &self,
        token_in: &str,
        amount_in: Decimal,
        token_out: &str,
    ) -> Result<PipelineState, PipelineAbort> {
        let mut state = PipelineState::new(PipelineOperation::PoolSwap, token_in.trim().to_uppercase(), amount_in);
        let result = self.run_pool_swap(&mut state, token_in, amount_in, token_out).await;
        finish(state, result)
    }

    /// Send `amount` of `token_symbol` from the pool to `receiver`
    pub async fn withdraw(
        &self,
        token_symbol: &str,
        amount: Decimal,
        receiver: Option<&str>,
    ) -> Result<PipelineState, PipelineAbort> {
        let mut state = PipelineState::new(PipelineOperation::Withdraw, token_symbol.trim().to_uppercase(), amount);
        let result = self.run_withdraw(&mut state, token_symbol, amount, receiver).await;
        finish(state, result)
    }

    /// Deposit `token_in`, swap it to `token_out` in the pool, withdraw the output to `receiver`
    pub async fn swap(
        &self,
        token_in: &str,
        amount_in: Decimal,
        token_out: &str,
        receiver: Option<&str>,
        sender: Option<&str>,
    ) -> Result<PipelineState, PipelineAbort> {
        let mut state = PipelineState::new(PipelineOperation::CombinedSwap, token_in.trim().to_uppercase(), amount_in);
        let result = self
            .run_combined_swap(&mut state, token_in, amount_in, token_out, receiver, sender)
            .await;
        finish(state, result)
    }

    async fn run_deposit(
        &self,
        state: &mut PipelineState,
        token_symbol: &str,
        amount: Decimal,
        sender: Option<&str>,
    ) -> Result<(), IntentsError> {
        validate_symbol(token_symbol)?;
        validate_amount(amount)?;

        let sender = self.identity.deposit_source(token_symbol, sender);
        state.sender = Some(sender.clone());

        self.deposit_step(state, token_symbol, amount, &sender).await?;
        state.advance(PipelineStage::Complete)
    }

    async fn run_pool_swap(
        &self,
        state: &mut PipelineState,
        token_in: &str,
        amount_in: Decimal,
        token_out: &str,
    ) -> Result<(), IntentsError> {
        validate_symbol(token_in)?;
        validate_symbol(token_out)?;
        validate_amount(amount_in)?;
        state.token_out = Some(token_out.trim().to_uppercase());

        self.swap_step(state, token_in, token_out, amount_in).await?;
        state.advance(PipelineStage::Complete)
    }

    async fn run_withdraw(
        &self,
        state: &mut PipelineState,
        token_symbol: &str,
        amount: Decimal,
        receiver: Option<&str>,
    ) -> Result<(), IntentsError> {
        validate_symbol(token_symbol)?;
        validate_amount(amount)?;

        let receiver = self.identity.withdraw_receiver(token_symbol, receiver);
        state.receiver = Some(receiver.clone());
        state.token_out = Some(token_symbol.trim().to_uppercase());

        let route = self.resolve_route(token_symbol, &receiver).await?;
        check_minimum(&route, amount)?;
        state.route = Some(route.clone());

        self.withdraw_step(state, &route, amount).await?;
        state.advance(PipelineStage::Complete)
    }

    async fn run_combined_swap(
        &self,
        state: &mut PipelineState,
        token_in: &str,
        amount_in: Decimal,
        token_out: &str,
        receiver: Option<&str>,
        sender: Option<&str>,
    ) -> Result<(), IntentsError> {
        validate_symbol(token_in)?;
        validate_symbol(token_out)?;
        validate_amount(amount_in)?;

        let sender = self.identity.deposit_source(token_in, sender);
        let receiver = self.identity.withdraw_receiver(token_out, receiver);
        state.sender = Some(sender.clone());
        state.receiver = Some(receiver.clone());
        state.token_out = Some(token_out.trim().to_uppercase());

        // Routing problems must surface before anything is deposited
        let route = self.resolve_route(token_out, &receiver).await?;
        state.route = Some(route.clone());

        self.deposit_step(state, token_in, amount_in, &sender).await?;
        let amount_out = self.swap_step(state, token_in, token_out, amount_in).await?;
        self.withdraw_step(state, &route, amount_out).await?;
        state.advance(PipelineStage::Complete)
    }

    async fn deposit_step(
        &self,
        state: &mut PipelineState,
        token_symbol: &str,
        amount: Decimal,
        sender: &str,
    ) -> Result<(), IntentsError> {
        state.advance(PipelineStage::Depositing)?;
        log::info!("[{}] Depositing {} {} from {}", state.id, amount, token_symbol, sender);

        self.pool
            .submit_deposit(amount, sender, token_symbol)
            .await
            .dependency(Dependency::Deposit)
    }

    async fn swap_step(
        &self,
        state: &mut PipelineState,
        token_in: &str,
        token_out: &str,
        amount_in: Decimal,
    ) -> Result<Decimal, IntentsError> {
        state.advance(PipelineStage::Swapping)?;
        log::info!("[{}] Swapping {} {} to {}", state.id, amount_in, token_in, token_out);

        let amount_out = self
            .pool
            .submit_pool_swap(token_in, token_out, amount_in)
            .await
            .dependency(Dependency::PoolSwap)?;
        state.amount_out = Some(amount_out);
        log::info!("[{}] Received {} {}", state.id, amount_out, token_out);
        Ok(amount_out)
    }

    async fn withdraw_step(
        &self,
        state: &mut PipelineState,
        route: &TransferRoute,
        amount: Decimal,
    ) -> Result<(), IntentsError> {
        state.advance(PipelineStage::Withdrawing)?;
        check_minimum(route, amount)?;
        log::info!(
            "[{}] Withdrawing {} {} to {} on {}",
            state.id,
            amount,
            route.token_symbol,
            route.receiver,
            route.destination_chain
        );

        if route.token.is_shielded_asset() {
            self.shielded
                .submit_shielded_withdraw(&route.token_symbol, amount, &route.receiver)
                .await
                .dependency(Dependency::ShieldedWithdraw)
        } else {
            self.pool
                .submit_pool_withdraw(&route.token_symbol, amount, &route.receiver, &route.token)
                .await
                .dependency(Dependency::PoolWithdraw)
        }
    }

    /// Classify the receiver and narrow the token to one chain, prompting while ambiguous
    pub async fn resolve_route(&self, token_symbol: &str, receiver: &str) -> Result<TransferRoute, IntentsError> {
        let symbol = token_symbol.trim().to_uppercase();
        let chains = self.classifier.classify(receiver).await?;
        if chains.is_empty() {
            return Err(IntentsError::UnsupportedDestination {
                address: receiver.to_string(),
            });
        }

        let mut resolution = self.resolver.resolve(&symbol, &chains, &self.catalog);
        loop {
            resolution = match resolution {
                RouteResolution::Resolved(token) => {
                    log::debug!("Routing {} to {} on {}", symbol, receiver, token.blockchain);
                    return Ok(TransferRoute::new(symbol, token, receiver));
                }
                RouteResolution::Ambiguous(request) => {
                    let candidates = request.chains();
                    let choice = self
                        .prompt
                        .prompt_chain_choice(&request.symbol, &candidates)
                        .await
                        .dependency(Dependency::ChainPrompt)?;
                    self.resolver.narrow(request, &choice)
                }
                RouteResolution::NotFound(miss) => {
                    return Err(match miss.choice {
                        Some(choice) => IntentsError::DisambiguationExhausted {
                            symbol,
                            receiver: receiver.to_string(),
                            choice,
                        },
                        None => IntentsError::UnsupportedRoute {
                            symbol,
                            receiver: receiver.to_string(),
                            chains: miss.chains,
                        },
                    });
                }
            };
        }
    }
}

fn validate_symbol(token_symbol: &str) -> Result<(), IntentsError> {
    if token_symbol.trim().is_empty() {
        return Err(IntentsError::validation("Token symbol cannot be empty"));
    }
    Ok(())
}

fn validate_amount(amount: Decimal) -> Result<(), IntentsError> {
    if amount <= Decimal::ZERO {
        return Err(IntentsError::validation(format!("Amount must be positive: {}", amount)));
    }
    Ok(())
}

fn check_minimum(route: &TransferRoute, amount: Decimal) -> Result<(), IntentsError> {
    if amount < route.token.min_withdraw_amount {
        return Err(IntentsError::BelowMinimumWithdraw {
            symbol: route.token_symbol.clone(),
            amount,
            minimum: route.token.min_withdraw_amount,
        });
    }
    Ok(())
}

/// Close out a pipeline run, aborting on error
fn finish(mut state: PipelineState, result: Result<(), IntentsError>) -> Result<PipelineState, PipelineAbort> {
    let error = match result {
        Ok(()) => {
            log::info!("[{}] {} complete", state.id, state.operation);
            return Ok(state);
        }
        Err(error) => error,
    };

    let failed_at = state.stage;
    state.abort();

    let error = if state.has_moved_funds() {
        IntentsError::PartialExposure {
            completed: state.completed.clone(),
            failed_at,
            amount_out: state.amount_out,
            source: Box::new(error),
        }
    } else {
        error
    };

    log::error!("[{}] {} aborted at {}: {}", state.id, state.operation, failed_at, error);
    Err(PipelineAbort { state, error })
}
