mod common;

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{core_with, Call, FakeNetwork, ScriptedPrompt, ACCOUNT_ID, EVM_RECEIVER, SHIELDED_ADDRESS, USDC_NEAR};
use intents_wallet_core::domain::repositories::{FungibleHolding, ShieldedBalance};
use intents_wallet_core::{ChainTag, Dependency, IntentsError, PipelineStage, WalletBalances};

#[tokio::test]
async fn test_zec_to_usdc_for_near_account() {
    let network = Arc::new(FakeNetwork::new().with_swap_output(dec!(2.16)));
    let prompt = Arc::new(ScriptedPrompt::default());
    let core = core_with(network.clone(), prompt.clone());

    let chains = tokio_test::assert_ok!(core.classify_address("alice.near").await);
    assert_eq!(chains.into_iter().collect::<Vec<_>>(), vec![ChainTag::Near]);

    let state = core
        .swap("ZEC", dec!(0.0623), "USDC", Some("alice.near"), None)
        .await
        .expect("swap");

    assert_eq!(state.stage, PipelineStage::Complete);
    assert_eq!(state.amount_out, Some(dec!(2.16)));
    assert_eq!(state.sender.as_deref(), Some(SHIELDED_ADDRESS));
    let route = state.route.expect("route");
    assert_eq!(route.token.blockchain, ChainTag::Near);
    assert_eq!(route.token.symbol, "USDC");

    assert_eq!(
        network.calls(),
        vec![
            Call::Deposit {
                amount: dec!(0.0623),
                source: SHIELDED_ADDRESS.to_string(),
                token: "ZEC".to_string(),
            },
            Call::PoolSwap {
                token_in: "ZEC".to_string(),
                token_out: "USDC".to_string(),
                amount_in: dec!(0.0623),
            },
            Call::PoolWithdraw {
                token: "USDC".to_string(),
                amount: dec!(2.16),
                receiver: "alice.near".to_string(),
                chain: ChainTag::Near,
            },
        ]
    );
    assert!(prompt.asked().is_empty());
}

#[tokio::test]
async fn test_withdraw_failure_after_swap_reports_partial_exposure() {
    let network = Arc::new(
        FakeNetwork::new()
            .with_swap_output(dec!(2.16))
            .failing(Dependency::PoolWithdraw),
    );
    let core = core_with(network.clone(), Arc::new(ScriptedPrompt::default()));

    let abort = core
        .swap("ZEC", dec!(0.0623), "USDC", Some("alice.near"), None)
        .await
        .expect_err("withdraw fails");

    assert_eq!(abort.state.stage, PipelineStage::Aborted);
    assert_eq!(abort.failed_stage(), PipelineStage::Withdrawing);
    assert_eq!(abort.state.completed, vec![PipelineStage::Depositing, PipelineStage::Swapping]);
    assert!(abort.is_partial_exposure());
    assert!(abort.to_string().contains("Funds moved but final transfer failed"));
    assert!(abort.to_string().contains("simulated intents withdraw outage"));
    // deposit and swap went through, nothing was rolled back
    assert_eq!(network.calls().len(), 2);
}

#[tokio::test]
async fn test_swap_to_evm_address_asks_for_chain() {
    let network = Arc::new(FakeNetwork::new().with_swap_output(dec!(30)));
    let prompt = Arc::new(ScriptedPrompt::answering(&["arb"]));
    let core = core_with(network.clone(), prompt.clone());

    let state = core
        .swap("ZEC", dec!(1), "USDC", Some(EVM_RECEIVER), None)
        .await
        .expect("swap");

    assert!(state.is_complete());
    assert_eq!(prompt.asked(), vec![vec![ChainTag::Eth, ChainTag::Base, ChainTag::Arb]]);
    assert!(matches!(
        network.calls().last(),
        Some(Call::PoolWithdraw { chain: ChainTag::Arb, .. })
    ));
}

#[tokio::test]
async fn test_unmatched_chain_choice_aborts_before_deposit() {
    let network = Arc::new(FakeNetwork::new().with_swap_output(dec!(30)));
    let core = core_with(network.clone(), Arc::new(ScriptedPrompt::answering(&["gnosis"])));

    let abort = core
        .swap("ZEC", dec!(1), "USDC", Some(EVM_RECEIVER), None)
        .await
        .expect_err("no USDC on gnosis");

    match &abort.error {
        IntentsError::DisambiguationExhausted { symbol, choice, .. } => {
            assert_eq!(symbol, "USDC");
            assert_eq!(choice, "gnosis");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(abort.failed_stage(), PipelineStage::Idle);
    assert!(network.calls().is_empty());
}

#[tokio::test]
async fn test_shielded_output_goes_to_shielded_address() {
    let network = Arc::new(FakeNetwork::new().with_swap_output(dec!(0.5)));
    let core = core_with(network.clone(), Arc::new(ScriptedPrompt::default()));

    let state = core.swap("USDC", dec!(20), "ZEC", None, None).await.expect("swap");

    assert_eq!(state.sender.as_deref(), Some(ACCOUNT_ID));
    assert_eq!(state.receiver.as_deref(), Some(SHIELDED_ADDRESS));
    assert_eq!(
        network.calls().last(),
        Some(&Call::ShieldedWithdraw {
            token: "ZEC".to_string(),
            amount: dec!(0.5),
            receiver: SHIELDED_ADDRESS.to_string(),
        })
    );
}

#[tokio::test]
async fn test_wallet_balances() {
    let mut network = FakeNetwork::new();
    network.holdings = vec![
        FungibleHolding {
            contract_id: "wrap.near".to_string(),
            balance: 0,
        },
        FungibleHolding {
            contract_id: USDC_NEAR.to_string(),
            balance: 12_500_000,
        },
    ];
    network.native_balance = 5 * 10u128.pow(24);
    network.shielded_balance = ShieldedBalance {
        transparent: dec!(0.1),
        shielded: dec!(0.2),
    };
    let core = core_with(Arc::new(network), Arc::new(ScriptedPrompt::default()));

    let balances = core.wallet_balances(None).await.expect("balances");
    let entries = balances.entries();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].symbol, "NEAR");
    assert_eq!(entries[0].amount, dec!(4.975));
    assert_eq!(entries[1].symbol, "USDC");
    assert_eq!(entries[1].amount, dec!(12.5));
    assert_eq!(entries[2].symbol, "ZEC");
    assert_eq!(entries[2].amount, dec!(0.2996));
}

#[tokio::test]
async fn test_empty_wallet_reports_no_holdings() {
    let core = core_with(Arc::new(FakeNetwork::new()), Arc::new(ScriptedPrompt::default()));

    let balances = core.wallet_balances(Some("empty.near")).await.expect("balances");

    assert_eq!(balances, WalletBalances::NoHoldings);
    assert_eq!(balances.total_usd(), Decimal::ZERO);
}

#[tokio::test]
async fn test_wallet_balance_failure_names_dependency() {
    let network = FakeNetwork::new().failing(Dependency::ReserveBalance);
    let core = core_with(Arc::new(network), Arc::new(ScriptedPrompt::default()));

    let error = tokio_test::assert_err!(core.wallet_balances(None).await);

    assert_eq!(error.failed_dependency(), Some(Dependency::ReserveBalance));
}

#[tokio::test]
async fn test_pool_balances() {
    let mut network = FakeNetwork::new();
    network
        .pool_balances
        .insert("nep141:zec.omft.near".to_string(), 6_230_000);
    network
        .pool_balances
        .insert("nep141:wrap.near".to_string(), 2 * 10u128.pow(24));
    let core = core_with(Arc::new(network), Arc::new(ScriptedPrompt::default()));

    let balances = core.pool_balances(None).await.expect("pool balances");

    assert_eq!(balances.len(), 2);
    assert_eq!(balances["ZEC"].amount, dec!(0.0623));
    assert_eq!(balances["NEAR"].amount, dec!(2));
    assert_eq!(balances["NEAR"].amount_usd, dec!(6.24));
}
