//! Recording fakes for the external collaborators

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use intents_wallet_core::domain::entities::RawTokenRecord;
use intents_wallet_core::domain::repositories::{FungibleHolding, ShieldedAccount, ShieldedBalance};
use intents_wallet_core::{
    BalanceBuffers, ChainChoicePrompt, ChainTag, Collaborators, Dependency, IntentsCore, IntentsPool,
    ReserveBalanceIndexer, ShieldedAddressValidator, ShieldedChain, TokenCatalog, TokenCatalogSource, TokenMetadata,
    WalletHoldingsIndexer, WalletIdentity,
};

pub const ACCOUNT_ID: &str = "alice.near";
pub const SHIELDED_ADDRESS: &str = "t1Rv4exT7bqhZqi2j7xz8bUHDMxwosrjADU";
pub const EVM_RECEIVER: &str = "0x52908400098527886E0F7030069857D2E4169EE7";
pub const USDC_NEAR: &str = "17208628f84f5d6ad33f0da3bbbeb27ffcb398eac501a31bd6ad2011e36133a1";

/// A successful mutating call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Deposit {
        amount: Decimal,
        source: String,
        token: String,
    },
    PoolSwap {
        token_in: String,
        token_out: String,
        amount_in: Decimal,
    },
    PoolWithdraw {
        token: String,
        amount: Decimal,
        receiver: String,
        chain: ChainTag,
    },
    ShieldedWithdraw {
        token: String,
        amount: Decimal,
        receiver: String,
    },
}

/// Every chain-facing capability in one in-memory fake
#[derive(Default)]
pub struct FakeNetwork {
    pub holdings: Vec<FungibleHolding>,
    pub native_balance: u128,
    pub shielded_balance: ShieldedBalance,
    pub pool_balances: HashMap<String, u128>,
    pub swap_output: Decimal,
    pub fail: Option<Dependency>,
    calls: Mutex<Vec<Call>>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, dependency: Dependency) -> Self {
        self.fail = Some(dependency);
        self
    }

    pub fn with_swap_output(mut self, amount: Decimal) -> Self {
        self.swap_output = amount;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn check(&self, dependency: Dependency) -> anyhow::Result<()> {
        if self.fail == Some(dependency) {
            anyhow::bail!("simulated {} outage", dependency);
        }
        Ok(())
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl TokenCatalogSource for FakeNetwork {
    async fn fetch_token_catalog(&self) -> anyhow::Result<Option<Vec<RawTokenRecord>>> {
        self.check(Dependency::TokenCatalog)?;
        Ok(None)
    }
}

#[async_trait]
impl WalletHoldingsIndexer for FakeNetwork {
    async fn fetch_wallet_fungible_holdings(&self, _account_id: &str) -> anyhow::Result<Vec<FungibleHolding>> {
        self.check(Dependency::WalletHoldings)?;
        Ok(self.holdings.clone())
    }
}

#[async_trait]
impl ReserveBalanceIndexer for FakeNetwork {
    async fn fetch_reserve_currency_balance(&self, _account_id: &str) -> anyhow::Result<u128> {
        self.check(Dependency::ReserveBalance)?;
        Ok(self.native_balance)
    }
}

#[async_trait]
impl ShieldedAddressValidator for FakeNetwork {
    async fn is_valid_shielded_address(&self, address: &str) -> anyhow::Result<bool> {
        self.check(Dependency::ShieldedValidation)?;
        Ok(address == SHIELDED_ADDRESS)
    }
}

#[async_trait]
impl ShieldedChain for FakeNetwork {
    async fn shielded_account_for_address(&self, _address: &str) -> anyhow::Result<ShieldedAccount> {
        self.check(Dependency::ShieldedAccount)?;
        Ok(ShieldedAccount("0".to_string()))
    }

    async fn shielded_account_balance(&self, _account: &ShieldedAccount) -> anyhow::Result<ShieldedBalance> {
        self.check(Dependency::ShieldedBalance)?;
        Ok(self.shielded_balance)
    }

    async fn submit_shielded_withdraw(&self, token_symbol: &str, amount: Decimal, receiver: &str) -> anyhow::Result<()> {
        self.check(Dependency::ShieldedWithdraw)?;
        self.record(Call::ShieldedWithdraw {
            token: token_symbol.to_string(),
            amount,
            receiver: receiver.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl IntentsPool for FakeNetwork {
    async fn fetch_pool_batch_balances(&self, _account_id: &str, asset_ids: &[String]) -> anyhow::Result<Vec<u128>> {
        self.check(Dependency::PoolBalances)?;
        Ok(asset_ids
            .iter()
            .map(|id| self.pool_balances.get(id).copied().unwrap_or(0))
            .collect())
    }

    async fn submit_deposit(&self, amount: Decimal, source_address: &str, token_symbol: &str) -> anyhow::Result<()> {
        self.check(Dependency::Deposit)?;
        self.record(Call::Deposit {
            amount,
            source: source_address.to_string(),
            token: token_symbol.to_string(),
        });
        Ok(())
    }

    async fn submit_pool_swap(&self, token_in: &str, token_out: &str, amount_in: Decimal) -> anyhow::Result<Decimal> {
        self.check(Dependency::PoolSwap)?;
        self.record(Call::PoolSwap {
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            amount_in,
        });
        Ok(self.swap_output)
    }

    async fn submit_pool_withdraw(
        &self,
        token_symbol: &str,
        amount: Decimal,
        receiver: &str,
        token: &TokenMetadata,
    ) -> anyhow::Result<()> {
        self.check(Dependency::PoolWithdraw)?;
        self.record(Call::PoolWithdraw {
            token: token_symbol.to_string(),
            amount,
            receiver: receiver.to_string(),
            chain: token.blockchain,
        });
        Ok(())
    }
}

/// Answers chain prompts from a script and remembers what was asked
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<Vec<ChainTag>>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<Vec<ChainTag>> {
        self.asked.lock().expect("asked lock").clone()
    }
}

#[async_trait]
impl ChainChoicePrompt for ScriptedPrompt {
    async fn prompt_chain_choice(&self, _token_symbol: &str, candidates: &[ChainTag]) -> anyhow::Result<String> {
        self.asked.lock().expect("asked lock").push(candidates.to_vec());
        self.answers
            .lock()
            .expect("answers lock")
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted answer left"))
    }
}

pub fn core_with(network: Arc<FakeNetwork>, prompt: Arc<ScriptedPrompt>) -> IntentsCore {
    let collaborators = Collaborators {
        catalog_source: network.clone(),
        holdings: network.clone(),
        reserve: network.clone(),
        shielded_validator: network.clone(),
        shielded: network.clone(),
        pool: network,
        prompt,
    };

    IntentsCore::new(
        TokenCatalog::bundled().expect("bundled catalog"),
        collaborators,
        WalletIdentity::new(ACCOUNT_ID, SHIELDED_ADDRESS),
        BalanceBuffers::default(),
    )
}
