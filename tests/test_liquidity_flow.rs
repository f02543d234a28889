mod common;

use std::sync::Arc;
use std::time::Duration;

use amm_liquidity::models::{Amount, LiquidityBreakdown, PriceInputs, TokenDecimals, TransactionRecord};
use amm_liquidity::orchestrator::validation::ENTER_AMOUNT;
use amm_liquidity::orchestrator::{LiquidityInput, LiquidityMode, Submission, LIQUIDITY_ERROR};
use amm_liquidity::{AmmError, FlowState, LiquidityFlow, TransactionStore, TxStatus};
use common::{account, eth, market_key, MockGateway};
use ethers::types::TxHash;

fn flow_with(mock: &Arc<MockGateway>, store: &Arc<TransactionStore>) -> LiquidityFlow {
    LiquidityFlow::new(mock.clone(), store.clone(), TokenDecimals::default(), 1)
}

fn add_input(amount: &str) -> LiquidityInput {
    LiquidityInput {
        mode: LiquidityMode::Add,
        account: Some(account()),
        market: Some(market_key()),
        amount: amount.to_string(),
        prices: PriceInputs::new("0.5", "0.5"),
        max_amount: None,
        market_description: Some("Will it rain tomorrow?".into()),
    }
}

fn amount(s: &str) -> Amount {
    Amount::parse(s).unwrap()
}

#[tokio::test]
async fn test_add_liquidity_happy_path() {
    let mock = Arc::new(MockGateway::funded(eth(1000)));
    let store = Arc::new(TransactionStore::new());
    let flow = flow_with(&mock, &store);

    // 100 / 1100 of the pool
    let expected = LiquidityBreakdown::for_add(amount("50"), amount("25"), amount("100"))
        .with_pool_share(amount("9.09"));
    assert_eq!(flow.on_user_input(add_input("100")).await, FlowState::RateQuoted(expected.clone()));
    assert_eq!(flow.breakdown(), expected);

    assert_eq!(flow.confirm().unwrap(), FlowState::AwaitingConfirmation(expected));

    let Submission::Pending { hash, watcher } = flow.submit().await.unwrap() else {
        panic!("expected a pending submission");
    };
    assert_eq!(mock.calls("add_liquidity"), 1);

    let record = store.get(hash).unwrap();
    assert_eq!(record.message, "Add Liquidity");
    assert_eq!(record.from, account());
    assert_eq!(record.chain_id, 1);
    assert_eq!(record.market_description.as_deref(), Some("Will it rain tomorrow?"));

    assert_eq!(watcher.await.unwrap(), TxStatus::Confirmed);
    assert_eq!(store.get(hash).unwrap().status, TxStatus::Confirmed);
    assert_eq!(flow.state(), FlowState::Confirmed { hash });
}

#[tokio::test]
async fn test_confirmation_only_touches_its_record() {
    let mock = Arc::new(MockGateway::funded(eth(1000)));
    mock.gate_confirmations();
    let store = Arc::new(TransactionStore::new());

    let other = TxHash::from_low_u64_be(0xbeef);
    store.add(TransactionRecord::pending(other, account(), 1, "Remove Liquidity"));

    let flow = flow_with(&mock, &store);
    flow.on_user_input(add_input("100")).await;
    flow.confirm().unwrap();

    let Submission::Pending { hash, watcher } = flow.submit().await.unwrap() else {
        panic!("expected a pending submission");
    };
    assert_eq!(flow.state(), FlowState::Submitted { hash });
    assert_eq!(store.get(hash).unwrap().status, TxStatus::Pending);
    assert_eq!(store.pending().len(), 2);

    mock.release_confirmation();
    assert_eq!(watcher.await.unwrap(), TxStatus::Confirmed);

    assert_eq!(store.get(hash).unwrap().status, TxStatus::Confirmed);
    assert_eq!(store.get(other).unwrap().status, TxStatus::Pending);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_user_denied_is_cancelled_without_message() {
    let mock = Arc::new(MockGateway::funded(eth(1000)));
    mock.fail_writes("MetaMask Tx Signature: User denied transaction signature.");
    let store = Arc::new(TransactionStore::new());
    let flow = flow_with(&mock, &store);

    flow.on_user_input(add_input("100")).await;
    flow.confirm().unwrap();

    assert!(matches!(flow.submit().await.unwrap(), Submission::Cancelled));
    assert_eq!(flow.state(), FlowState::Failed { message: None });
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_rejected_write_shows_slippage_message() {
    let mock = Arc::new(MockGateway::funded(eth(1000)));
    mock.fail_writes("execution reverted: insufficient liquidity");
    let store = Arc::new(TransactionStore::new());
    let flow = flow_with(&mock, &store);

    flow.on_user_input(add_input("100")).await;
    flow.confirm().unwrap();

    match flow.submit().await.unwrap() {
        Submission::Rejected { message } => assert_eq!(message, LIQUIDITY_ERROR),
        other => panic!("unexpected submission {:?}", other),
    }
    assert_eq!(flow.state(), FlowState::Failed { message: Some(LIQUIDITY_ERROR.to_string()) });
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_failed_receipt_marks_record_failure() {
    let mock = Arc::new(MockGateway::funded(eth(1000)));
    mock.fail_confirmation("0x1 reverted");
    let store = Arc::new(TransactionStore::new());
    let flow = flow_with(&mock, &store);

    flow.on_user_input(add_input("100")).await;
    flow.confirm().unwrap();

    let Submission::Pending { hash, watcher } = flow.submit().await.unwrap() else {
        panic!("expected a pending submission");
    };
    assert_eq!(watcher.await.unwrap(), TxStatus::Failure);
    assert_eq!(store.get(hash).unwrap().status, TxStatus::Failure);
    assert!(matches!(flow.state(), FlowState::Failed { message: Some(_) }));
}

#[tokio::test(start_paused = true)]
async fn test_stale_quote_is_discarded() {
    let mock = Arc::new(MockGateway::funded(eth(1000)));
    mock.delay_quote(eth(100), Duration::from_millis(500));
    mock.delay_quote(eth(20), Duration::from_millis(10));
    let store = Arc::new(TransactionStore::new());
    let flow = flow_with(&mock, &store);

    // The slow quote for 100 resolves after the newer one for 20
    let (slow, fast) = tokio::join!(
        flow.on_user_input(add_input("100")),
        flow.on_user_input(add_input("20")),
    );

    let latest = LiquidityBreakdown::for_add(amount("10"), amount("5"), amount("20"))
        .with_pool_share(amount("1.96"));
    assert_eq!(fast, FlowState::RateQuoted(latest.clone()));
    assert_eq!(slow, FlowState::RateQuoted(latest.clone()));
    assert_eq!(flow.breakdown(), latest);
    assert_eq!(flow.input().amount, "20");
}

#[tokio::test]
async fn test_invalid_input_resets_to_zero_breakdown() {
    let mock = Arc::new(MockGateway::funded(eth(1000)));
    let store = Arc::new(TransactionStore::new());
    let flow = flow_with(&mock, &store);

    flow.on_user_input(add_input("100")).await;
    assert!(matches!(flow.state(), FlowState::RateQuoted(_)));

    assert_eq!(flow.on_user_input(add_input("0")).await, FlowState::Idle);
    assert_eq!(flow.breakdown(), LiquidityBreakdown::default());
    assert_eq!(flow.form_error(), Some(ENTER_AMOUNT));

    let mut remove = add_input("abc");
    remove.mode = LiquidityMode::Remove;
    assert_eq!(flow.on_user_input(remove).await, FlowState::Idle);
    assert_eq!(flow.breakdown(), LiquidityBreakdown::empty_remove());
}

#[tokio::test]
async fn test_confirm_requires_quote() {
    let mock = Arc::new(MockGateway::funded(eth(1000)));
    let store = Arc::new(TransactionStore::new());
    let flow = flow_with(&mock, &store);

    assert!(flow.confirm().is_err());
    assert!(flow.submit().await.is_err());
    assert_eq!(flow.state(), FlowState::Idle);
}

#[tokio::test]
async fn test_input_ignored_until_reset() {
    let mock = Arc::new(MockGateway::funded(eth(1000)));
    mock.gate_confirmations();
    let store = Arc::new(TransactionStore::new());
    let flow = flow_with(&mock, &store);

    flow.on_user_input(add_input("100")).await;
    flow.confirm().unwrap();
    let Submission::Pending { hash, watcher } = flow.submit().await.unwrap() else {
        panic!("expected a pending submission");
    };

    assert_eq!(flow.on_user_input(add_input("5")).await, FlowState::Submitted { hash });

    mock.release_confirmation();
    watcher.await.unwrap();
    assert_eq!(flow.on_user_input(add_input("5")).await, FlowState::Confirmed { hash });

    flow.reset();
    assert_eq!(flow.state(), FlowState::Idle);
    assert!(matches!(flow.on_user_input(add_input("5")).await, FlowState::RateQuoted(_)));
}

#[tokio::test]
async fn test_remove_liquidity_flow() {
    let mock = Arc::new(MockGateway::funded(eth(1000)));
    mock.set_lp_balance(eth(10));
    let store = Arc::new(TransactionStore::new());
    let flow = flow_with(&mock, &store);

    let mut input = add_input("10");
    input.mode = LiquidityMode::Remove;
    input.prices = PriceInputs::default();

    // Burning the whole position leaves no share
    let expected = LiquidityBreakdown::for_remove(amount("2.5"), amount("5"), amount("3.3333"))
        .with_pool_share(Amount::ZERO);
    assert_eq!(flow.on_user_input(input).await, FlowState::RateQuoted(expected));
    flow.confirm().unwrap();

    let Submission::Pending { hash, watcher } = flow.submit().await.unwrap() else {
        panic!("expected a pending submission");
    };
    assert_eq!(mock.calls("remove_liquidity"), 1);
    assert_eq!(store.get(hash).unwrap().message, "Remove Liquidity");
    assert_eq!(watcher.await.unwrap(), TxStatus::Confirmed);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_submit_sends_once() {
    let mock = Arc::new(MockGateway::funded(eth(1000)));
    mock.delay_writes(Duration::from_millis(50));
    let store = Arc::new(TransactionStore::new());
    let flow = flow_with(&mock, &store);

    flow.on_user_input(add_input("100")).await;
    flow.confirm().unwrap();

    let (first, second) = tokio::join!(flow.submit(), flow.submit());

    let (sent, refused) = match (first, second) {
        (Ok(sent), Err(refused)) | (Err(refused), Ok(sent)) => (sent, refused),
        other => panic!("expected exactly one submission, got {:?}", other),
    };
    assert!(matches!(refused, AmmError::Validation(_)));
    let Submission::Pending { hash, watcher } = sent else {
        panic!("expected a pending submission");
    };

    assert_eq!(mock.calls("add_liquidity"), 1);
    assert_eq!(store.len(), 1);
    assert_eq!(watcher.await.unwrap(), TxStatus::Confirmed);
    assert_eq!(flow.state(), FlowState::Confirmed { hash });
}

#[tokio::test(start_paused = true)]
async fn test_input_during_submit_is_ignored() {
    let mock = Arc::new(MockGateway::funded(eth(1000)));
    mock.delay_writes(Duration::from_millis(50));
    mock.delay_quote(eth(7), Duration::from_millis(100));
    let store = Arc::new(TransactionStore::new());
    let flow = flow_with(&mock, &store);

    flow.on_user_input(add_input("100")).await;
    flow.confirm().unwrap();

    let (submitted, during) = tokio::join!(flow.submit(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        flow.on_user_input(add_input("7")).await
    });

    assert_eq!(during, FlowState::Submitting);
    assert_eq!(flow.input().amount, "100");

    let Submission::Pending { hash, watcher } = submitted.unwrap() else {
        panic!("expected a pending submission");
    };
    assert_eq!(watcher.await.unwrap(), TxStatus::Confirmed);
    assert_eq!(flow.state(), FlowState::Confirmed { hash });
    assert_eq!(store.get(hash).unwrap().status, TxStatus::Confirmed);
    assert_eq!(mock.calls("rate_add_liquidity"), 1);
}
