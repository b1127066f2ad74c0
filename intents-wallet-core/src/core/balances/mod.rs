//! Balance aggregation
//!
//! Merges the wallet's token holdings, its native reserve balance and its
//! shielded balance into one priced view, and sums pool holdings per symbol.
//! A wallet view is all-or-nothing: if any source fails the whole call fails.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::core::catalog::TokenCatalog;
use crate::domain::entities::{BalanceBuffers, BalanceEntry, PoolBalances, TokenMetadata, WalletBalances};
use crate::domain::repositories::{IntentsPool, ReserveBalanceIndexer, ShieldedChain, WalletHoldingsIndexer};
use crate::shared::constants::WRAPPED_RESERVE_CONTRACT;
use crate::shared::error::{Dependency, DependencyContext, IntentsError};
use crate::shared::types::RawAmount;
use crate::shared::utils::{clamp_non_negative, normalize_raw};

pub struct BalanceAggregator {
    catalog: TokenCatalog,
    holdings: Arc<dyn WalletHoldingsIndexer>,
    reserve: Arc<dyn ReserveBalanceIndexer>,
    shielded: Arc<dyn ShieldedChain>,
    pool: Arc<dyn IntentsPool>,
    shielded_address: String,
    buffers: BalanceBuffers,
}

impl BalanceAggregator {
    pub fn new(
        catalog: TokenCatalog,
        holdings: Arc<dyn WalletHoldingsIndexer>,
        reserve: Arc<dyn ReserveBalanceIndexer>,
        shielded: Arc<dyn ShieldedChain>,
        pool: Arc<dyn IntentsPool>,
        shielded_address: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            holdings,
            reserve,
            shielded,
            pool,
            shielded_address: shielded_address.into(),
            buffers: BalanceBuffers::default(),
        }
    }

    pub fn with_buffers(mut self, buffers: BalanceBuffers) -> Self {
        self.buffers = buffers;
        self
    }

    pub fn catalog(&self) -> &TokenCatalog {
        &self.catalog
    }

    /// Priced wallet holdings of `account_id`, plus the configured shielded balance
    pub async fn wallet_balances(&self, account_id: &str) -> Result<WalletBalances, IntentsError> {
        log::info!("Fetching wallet balances for {}", account_id);

        let (holdings, native_raw, shielded_entry) = tokio::try_join!(
            async {
                self.holdings
                    .fetch_wallet_fungible_holdings(account_id)
                    .await
                    .dependency(Dependency::WalletHoldings)
            },
            async {
                self.reserve
                    .fetch_reserve_currency_balance(account_id)
                    .await
                    .dependency(Dependency::ReserveBalance)
            },
            self.shielded_entry(),
        )?;

        let mut entries = Vec::with_capacity(holdings.len() + 2);
        let mut reserve_counted = false;

        for holding in holdings {
            let Some(token) = self.catalog.by_contract_address(&holding.contract_id) else {
                log::debug!("Skipping {}: not in token catalog", holding.contract_id);
                continue;
            };

            let amount = if token.is_wrapped_reserve() && !reserve_counted {
                reserve_counted = true;
                self.reserve_amount(token, holding.balance, native_raw)?
            } else {
                normalize_raw(holding.balance, token.decimals)?
            };
            push_positive(&mut entries, token, amount);
        }

        // Native balance still counts when the wallet holds no wrapped tokens
        if !reserve_counted {
            match self.catalog.by_contract_address(WRAPPED_RESERVE_CONTRACT) {
                Some(token) => {
                    let amount = self.reserve_amount(token, 0, native_raw)?;
                    push_positive(&mut entries, token, amount);
                }
                None => log::warn!("Wrapped reserve token missing from catalog, native balance not reported"),
            }
        }

        if let Some(entry) = shielded_entry {
            entries.push(entry);
        }

        let balances = WalletBalances::from_entries(entries);
        log::info!(
            "Wallet {} holds {} priced entries worth {} USD",
            account_id,
            balances.entries().len(),
            balances.total_usd()
        );
        Ok(balances)
    }

    /// Pool holdings of `account_id`, summed per display symbol
    pub async fn pool_balances(&self, account_id: &str) -> Result<PoolBalances, IntentsError> {
        log::info!("Fetching intents pool balances for {}", account_id);

        let asset_ids = self.catalog.pool_asset_ids();
        let raw_balances = self
            .pool
            .fetch_pool_batch_balances(account_id, &asset_ids)
            .await
            .dependency(Dependency::PoolBalances)?;

        if raw_balances.len() != asset_ids.len() {
            return Err(IntentsError::Dependency {
                dependency: Dependency::PoolBalances,
                message: format!(
                    "returned {} balances for {} assets",
                    raw_balances.len(),
                    asset_ids.len()
                ),
            });
        }

        let mut totals = PoolBalances::new();
        for (token, raw) in self.catalog.tokens().iter().zip(raw_balances) {
            if raw == 0 {
                continue;
            }
            let amount = normalize_raw(raw, token.decimals)?;
            let total = totals.entry(token.display_symbol().to_string()).or_default();
            total.amount += amount;
            total.amount_usd += amount * token.price_usd;
        }

        Ok(totals)
    }

    /// Wrapped and native reserve share one balance; the storage floor is never spendable
    fn reserve_amount(
        &self,
        token: &TokenMetadata,
        wrapped_raw: RawAmount,
        native_raw: RawAmount,
    ) -> Result<Decimal, IntentsError> {
        let spendable = wrapped_raw
            .saturating_add(native_raw)
            .saturating_sub(self.buffers.reserve_raw);
        normalize_raw(spendable, token.decimals)
    }

    async fn shielded_entry(&self) -> Result<Option<BalanceEntry>, IntentsError> {
        let token = self
            .catalog
            .shielded_token()
            .ok_or_else(|| IntentsError::catalog("Shielded asset missing from token catalog"))?;

        let account = self
            .shielded
            .shielded_account_for_address(&self.shielded_address)
            .await
            .dependency(Dependency::ShieldedAccount)?;
        let balance = self
            .shielded
            .shielded_account_balance(&account)
            .await
            .dependency(Dependency::ShieldedBalance)?;

        let amount = clamp_non_negative(balance.total() - self.buffers.shielded_fee);
        log::debug!(
            "Shielded balance: transparent {} shielded {} reported {}",
            balance.transparent,
            balance.shielded,
            amount
        );

        Ok((amount > Decimal::ZERO).then(|| BalanceEntry::priced(token, amount)))
    }
}

fn push_positive(entries: &mut Vec<BalanceEntry>, token: &TokenMetadata, amount: Decimal) {
    let amount = clamp_non_negative(amount);
    if amount > Decimal::ZERO {
        entries.push(BalanceEntry::priced(token, amount));
    }
}
