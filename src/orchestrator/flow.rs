//! Add/remove liquidity flow
//!
//! ```text
//! Idle -> Validating -> RateQuoted -> AwaitingConfirmation -> Submitting -> Submitted -> Confirmed
//!   ^         |                                                     |            |
//!   +---------+ (no quote)                                          +------------+-> Failed
//! ```
//!
//! Every input change starts a new quote with a fresh request id. Only the
//! quote holding the latest id may update the flow, so a slow response can
//! never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use ethers::types::{Address, TxHash, U256};
use tokio::task::JoinHandle;
use crate::core::{AmmExchange, AmmGateway};
use crate::liquidity::{
    get_add_breakdown, get_remove_breakdown, AddBreakdownParams, RemoveBreakdownParams,
};
use crate::models::{
    Amount, LiquidityBreakdown, MarketKey, TokenDecimals, TransactionRecord, TxStatus,
};
use crate::utils::{AmmError, Result};
use super::transactions::TransactionStore;
use super::validation::{form_error, LiquidityInput, LiquidityMode, LIQUIDITY_ERROR};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Validating { request_id: u64 },
    RateQuoted(LiquidityBreakdown),
    /// The user moved on to the confirmation step
    AwaitingConfirmation(LiquidityBreakdown),
    /// Write sent to the signer, no hash yet
    Submitting,
    Submitted { hash: TxHash },
    Confirmed { hash: TxHash },
    /// `message` is `None` when the user cancelled
    Failed { message: Option<String> },
}

impl FlowState {
    /// Confirmed and Failed only leave through `reset`
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Confirmed { .. } | FlowState::Failed { .. })
    }

    fn accepts_input(&self) -> bool {
        !self.is_terminal() && !matches!(self, FlowState::Submitting | FlowState::Submitted { .. })
    }
}

/// Outcome of `LiquidityFlow::submit`
#[derive(Debug)]
pub enum Submission {
    /// Sent; the watcher resolves to the final record status
    Pending { hash: TxHash, watcher: JoinHandle<TxStatus> },
    /// The user refused to sign
    Cancelled,
    Rejected { message: String },
}

struct FlowInner {
    state: FlowState,
    input: LiquidityInput,
    breakdown: LiquidityBreakdown,
    form_error: Option<&'static str>,
}

#[derive(Clone)]
pub struct LiquidityFlow {
    gateway: Arc<dyn AmmGateway>,
    store: Arc<TransactionStore>,
    decimals: TokenDecimals,
    chain_id: u64,
    inner: Arc<Mutex<FlowInner>>,
    latest_request: Arc<AtomicU64>,
}

impl LiquidityFlow {
    pub fn new(
        gateway: Arc<dyn AmmGateway>,
        store: Arc<TransactionStore>,
        decimals: TokenDecimals,
        chain_id: u64,
    ) -> Self {
        Self {
            gateway,
            store,
            decimals,
            chain_id,
            inner: Arc::new(Mutex::new(FlowInner {
                state: FlowState::Idle,
                input: LiquidityInput::default(),
                breakdown: LiquidityBreakdown::default(),
                form_error: None,
            })),
            latest_request: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> FlowState {
        self.lock().state.clone()
    }

    /// Current breakdown, zero when nothing could be quoted
    pub fn breakdown(&self) -> LiquidityBreakdown {
        self.lock().breakdown.clone()
    }

    pub fn form_error(&self) -> Option<&'static str> {
        self.lock().form_error
    }

    pub fn input(&self) -> LiquidityInput {
        self.lock().input.clone()
    }

    pub fn store(&self) -> &Arc<TransactionStore> {
        &self.store
    }

    /// Record new input and re-quote
    pub async fn on_user_input(&self, input: LiquidityInput) -> FlowState {
        let request_id = {
            let mut inner = self.lock();
            if !inner.state.accepts_input() {
                tracing::debug!("Ignoring input in state {:?}", inner.state);
                return inner.state.clone();
            }

            let request_id = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
            inner.form_error = form_error(&input);
            inner.input = input.clone();
            inner.state = FlowState::Validating { request_id };
            request_id
        };

        let breakdown = self.quote(&input).await;

        let mut inner = self.lock();
        if self.latest_request.load(Ordering::SeqCst) != request_id {
            tracing::debug!("Discarding stale quote #{}", request_id);
            return inner.state.clone();
        }

        match breakdown {
            Some(breakdown) => {
                inner.breakdown = breakdown.clone();
                inner.state = FlowState::RateQuoted(breakdown);
            }
            None => {
                inner.breakdown = zero_breakdown(input.mode);
                inner.state = FlowState::Idle;
            }
        }
        inner.state.clone()
    }

    /// User accepted the quote
    pub fn confirm(&self) -> Result<FlowState> {
        let mut inner = self.lock();
        if let Some(error) = inner.form_error {
            return Err(AmmError::Validation(error.to_string()));
        }

        let next = match &inner.state {
            FlowState::RateQuoted(breakdown) => FlowState::AwaitingConfirmation(breakdown.clone()),
            other => {
                return Err(AmmError::Validation(format!("nothing to confirm in state {:?}", other)));
            }
        };
        inner.state = next.clone();
        Ok(next)
    }

    /// Send the confirmed transaction and start watching it
    pub async fn submit(&self) -> Result<Submission> {
        let (input, account, market) = {
            let mut inner = self.lock();
            if !matches!(inner.state, FlowState::AwaitingConfirmation(_)) {
                return Err(AmmError::Validation(format!(
                    "cannot submit in state {:?}", inner.state
                )));
            }
            let input = inner.input.clone();
            let account = input.account
                .ok_or_else(|| AmmError::Validation("no account connected".into()))?;
            let market = input.market
                .ok_or_else(|| AmmError::Validation("no market selected".into()))?;

            // Claimed before the first await: one write per confirmation
            inner.state = FlowState::Submitting;
            (input, account, market)
        };

        // Quotes still in flight must not land on top of the submission
        self.latest_request.fetch_add(1, Ordering::SeqCst);

        match self.send(&input, account, market).await {
            Ok(hash) => {
                let mut record = TransactionRecord::pending(
                    hash,
                    account,
                    self.chain_id,
                    input.mode.history_message(),
                );
                if let Some(description) = &input.market_description {
                    record = record.with_market_description(description.clone());
                }
                self.store.add(record);
                self.lock().state = FlowState::Submitted { hash };

                let watcher = tokio::spawn(self.clone().watch(hash));
                Ok(Submission::Pending { hash, watcher })
            }
            Err(e) if e.is_user_denied() => {
                tracing::info!("🚫 Transaction cancelled by user");
                self.lock().state = FlowState::Failed { message: None };
                Ok(Submission::Cancelled)
            }
            Err(e) => {
                tracing::warn!("❌ {} failed: {}", input.mode.history_message(), e);
                let message = LIQUIDITY_ERROR.to_string();
                self.lock().state = FlowState::Failed { message: Some(message.clone()) };
                Ok(Submission::Rejected { message })
            }
        }
    }

    /// Start a fresh cycle
    pub fn reset(&self) {
        self.latest_request.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.lock();
        inner.state = FlowState::Idle;
        inner.breakdown = zero_breakdown(inner.input.mode);
        inner.input = LiquidityInput::default();
        inner.form_error = None;
    }

    async fn quote(&self, input: &LiquidityInput) -> Option<LiquidityBreakdown> {
        match input.mode {
            LiquidityMode::Remove => {
                let params = RemoveBreakdownParams {
                    account: input.account,
                    market: input.market,
                    amount: input.amount.clone(),
                    decimals: self.decimals,
                };
                get_remove_breakdown(&self.gateway, &params).await
            }
            LiquidityMode::Create | LiquidityMode::Add => {
                let params = AddBreakdownParams {
                    account: input.account,
                    market: input.market,
                    amount: input.amount.clone(),
                    prices: input.prices.clone(),
                    decimals: self.decimals,
                };
                get_add_breakdown(&self.gateway, &params).await
            }
        }
    }

    async fn send(&self, input: &LiquidityInput, account: Address, market: MarketKey) -> Result<TxHash> {
        let exchange = AmmExchange::new(self.gateway.clone(), market);
        let amount = Amount::parse(&input.amount)?;

        match input.mode {
            LiquidityMode::Remove => {
                let lp_tokens = amount.to_raw(self.decimals.lp_tokens)?;
                exchange.remove_liquidity(lp_tokens, U256::zero()).await
            }
            LiquidityMode::Create | LiquidityMode::Add => {
                let prices = input.prices.resolve()?;
                let cash = amount.to_base_units(self.decimals.cash)?;
                let plan = exchange.plan_add_liquidity(&cash, &prices).await?;
                exchange.add_liquidity(&plan, account).await
            }
        }
    }

    async fn watch(self, hash: TxHash) -> TxStatus {
        let status = match self.gateway.wait_for_confirmations(hash).await {
            Ok(confirmations) if confirmations > 0 => TxStatus::Confirmed,
            Ok(_) => {
                tracing::warn!("Transaction {:?} finished without confirmations", hash);
                return TxStatus::Pending;
            }
            Err(e) => {
                tracing::warn!("Transaction {:?} failed: {}", hash, e);
                TxStatus::Failure
            }
        };

        self.store.update_by_hash(hash, status);
        tracing::info!("Transaction {:?} {:?}", hash, status);

        let mut inner = self.lock();
        if inner.state == (FlowState::Submitted { hash }) {
            inner.state = match status {
                TxStatus::Confirmed => FlowState::Confirmed { hash },
                _ => FlowState::Failed { message: Some(LIQUIDITY_ERROR.to_string()) },
            };
        }
        status
    }

    fn lock(&self) -> MutexGuard<'_, FlowInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn zero_breakdown(mode: LiquidityMode) -> LiquidityBreakdown {
    match mode {
        LiquidityMode::Remove => LiquidityBreakdown::empty_remove(),
        LiquidityMode::Create | LiquidityMode::Add => LiquidityBreakdown::default(),
    }
}
