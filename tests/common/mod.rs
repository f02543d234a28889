#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use amm_liquidity::core::AmmGateway;
use amm_liquidity::models::{
    AddLiquidityRate, CollateralKind, MarketKey, RemoveLiquidityRate, ShareBalances,
};
use amm_liquidity::{AmmError, Result};
use async_trait::async_trait;
use ethers::types::{Address, TxHash, U256};
use tokio::sync::Notify;

pub const AMM: u64 = 0xa3;

pub fn account() -> Address {
    Address::from_low_u64_be(0x1001)
}

pub fn market_key() -> MarketKey {
    MarketKey::new(
        Address::from_low_u64_be(0x0c01),
        Address::from_low_u64_be(0x0c02),
        U256::from(15),
    )
}

/// Arguments of one write, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteCall {
    pub name: &'static str,
    pub target: Address,
    pub amounts: Vec<U256>,
    pub flag: Option<bool>,
}

pub fn eth(units: u64) -> U256 {
    U256::from(units) * U256::exp10(18)
}

/// In-memory AMM with deterministic quotes.
///
/// Add quotes hand back `cash` LP tokens, `cash / 2` YES and `cash / 4` NO.
/// Remove quotes hand back `lp / 4` YES, `lp / 2` NO and `lp / 3` cash.
/// Every account holds the same LP balance, zero unless set.
pub struct MockGateway {
    deployed: AtomicBool,
    total_supply: Mutex<U256>,
    lp_balance: Mutex<U256>,
    fail_reads: AtomicBool,
    write_error: Mutex<Option<String>>,
    confirmation: Mutex<std::result::Result<u64, String>>,
    gated: AtomicBool,
    release: Notify,
    delays: Mutex<HashMap<U256, Duration>>,
    write_delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<&'static str>>,
    writes: Mutex<Vec<WriteCall>>,
    next_hash: AtomicU64,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            deployed: AtomicBool::new(false),
            total_supply: Mutex::new(U256::zero()),
            lp_balance: Mutex::new(U256::zero()),
            fail_reads: AtomicBool::new(false),
            write_error: Mutex::new(None),
            confirmation: Mutex::new(Ok(1)),
            gated: AtomicBool::new(false),
            release: Notify::new(),
            delays: Mutex::new(HashMap::new()),
            write_delay: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
            next_hash: AtomicU64::new(0x7000),
        }
    }

    /// Deployed exchange holding `supply` LP tokens
    pub fn funded(supply: U256) -> Self {
        let mock = Self::new();
        mock.deployed.store(true, Ordering::SeqCst);
        *mock.total_supply.lock().unwrap() = supply;
        mock
    }

    /// Deployed exchange with no liquidity
    pub fn empty_pool() -> Self {
        Self::funded(U256::zero())
    }

    pub fn amm() -> Address {
        Address::from_low_u64_be(AMM)
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, message: &str) {
        *self.write_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_confirmation(&self, message: &str) {
        *self.confirmation.lock().unwrap() = Err(message.to_string());
    }

    /// Hold `wait_for_confirmations` until `release_confirmation`
    pub fn gate_confirmations(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    pub fn release_confirmation(&self) {
        self.release.notify_one();
    }

    /// Delay add quotes for exactly `cash` base units
    pub fn delay_quote(&self, cash: U256, delay: Duration) {
        self.delays.lock().unwrap().insert(cash, delay);
    }

    /// LP tokens held by every account
    pub fn set_lp_balance(&self, balance: U256) {
        *self.lp_balance.lock().unwrap() = balance;
    }

    /// Every write yields for `delay` before the node accepts it
    pub fn delay_writes(&self, delay: Duration) {
        *self.write_delay.lock().unwrap() = Some(delay);
    }

    pub fn writes(&self) -> Vec<WriteCall> {
        self.writes.lock().unwrap().clone()
    }

    pub fn calls(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    pub fn last_hash(&self) -> TxHash {
        TxHash::from_low_u64_be(self.next_hash.load(Ordering::SeqCst))
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    fn read(&self, name: &'static str) -> Result<()> {
        self.record(name);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AmmError::ContractCallError(format!("{} failed: execution reverted", name)));
        }
        Ok(())
    }

    async fn write(
        &self,
        name: &'static str,
        target: Address,
        amounts: Vec<U256>,
        flag: Option<bool>,
    ) -> Result<TxHash> {
        self.record(name);
        self.writes.lock().unwrap().push(WriteCall { name, target, amounts, flag });

        let delay = *self.write_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.write_error.lock().unwrap().clone() {
            return Err(AmmError::TransactionError(format!("{} rejected: {}", name, message)));
        }
        let id = self.next_hash.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TxHash::from_low_u64_be(id))
    }

    async fn add_rate(&self, name: &'static str, cash: U256) -> Result<AddLiquidityRate> {
        self.read(name)?;
        let delay = self.delays.lock().unwrap().get(&cash).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(AddLiquidityRate {
            lp_tokens: cash,
            short_shares: cash / 4,
            long_shares: cash / 2,
        })
    }
}

#[async_trait]
impl AmmGateway for MockGateway {
    fn collateral(&self) -> CollateralKind {
        CollateralKind::Erc20
    }

    async fn calculate_amm_address(&self, _key: &MarketKey) -> Result<Address> {
        self.read("calculate_amm_address")?;
        Ok(Self::amm())
    }

    async fn exchanges(&self, _key: &MarketKey) -> Result<Address> {
        self.read("exchanges")?;
        if self.deployed.load(Ordering::SeqCst) {
            Ok(Self::amm())
        } else {
            Ok(Address::zero())
        }
    }

    async fn rate_add_amm_with_liquidity(
        &self,
        _key: &MarketKey,
        cash: U256,
        _ratio: U256,
        _keep_yes: bool,
        _recipient: Address,
    ) -> Result<AddLiquidityRate> {
        self.add_rate("rate_add_amm_with_liquidity", cash).await
    }

    async fn rate_add_initial_liquidity(
        &self,
        _key: &MarketKey,
        cash: U256,
        _ratio: U256,
        _keep_yes: bool,
        _recipient: Address,
    ) -> Result<AddLiquidityRate> {
        self.add_rate("rate_add_initial_liquidity", cash).await
    }

    async fn rate_add_liquidity(
        &self,
        _amm: Address,
        cash: U256,
        _recipient: Address,
    ) -> Result<AddLiquidityRate> {
        self.add_rate("rate_add_liquidity", cash).await
    }

    async fn rate_remove_liquidity(
        &self,
        _amm: Address,
        lp_tokens: U256,
        _min_sets_sold: U256,
    ) -> Result<RemoveLiquidityRate> {
        self.read("rate_remove_liquidity")?;
        Ok(RemoveLiquidityRate {
            short: lp_tokens / 2,
            long: lp_tokens / 4,
            cash: lp_tokens / 3,
            sets: lp_tokens / 4,
        })
    }

    async fn rate_exit_position(
        &self,
        _amm: Address,
        short_shares: U256,
        long_shares: U256,
    ) -> Result<U256> {
        self.read("rate_exit_position")?;
        // Weighted so a swapped argument order shows
        Ok(short_shares + long_shares * 2)
    }

    async fn balance_of(&self, _token: Address, _account: Address) -> Result<U256> {
        self.read("balance_of")?;
        Ok(*self.lp_balance.lock().unwrap())
    }

    async fn total_supply(&self, _token: Address) -> Result<U256> {
        self.read("total_supply")?;
        Ok(*self.total_supply.lock().unwrap())
    }

    async fn share_balances(&self, _amm: Address, _account: Address) -> Result<ShareBalances> {
        self.read("share_balances")?;
        Ok(ShareBalances::default())
    }

    async fn add_amm(&self, key: &MarketKey) -> Result<TxHash> {
        self.write("add_amm", key.market, vec![key.fee], None).await
    }

    async fn add_amm_with_liquidity(
        &self,
        key: &MarketKey,
        cash: U256,
        ratio: U256,
        keep_yes: bool,
        _recipient: Address,
    ) -> Result<TxHash> {
        self.write("add_amm_with_liquidity", key.market, vec![cash, ratio], Some(keep_yes)).await
    }

    async fn add_initial_liquidity(
        &self,
        key: &MarketKey,
        cash: U256,
        ratio: U256,
        keep_yes: bool,
        _recipient: Address,
    ) -> Result<TxHash> {
        self.write("add_initial_liquidity", key.market, vec![cash, ratio], Some(keep_yes)).await
    }

    async fn add_liquidity(&self, amm: Address, cash: U256, _recipient: Address) -> Result<TxHash> {
        self.write("add_liquidity", amm, vec![cash], None).await
    }

    async fn remove_liquidity(
        &self,
        amm: Address,
        lp_tokens: U256,
        min_sets_sold: U256,
    ) -> Result<TxHash> {
        self.write("remove_liquidity", amm, vec![lp_tokens, min_sets_sold], None).await
    }

    async fn swap(
        &self,
        amm: Address,
        input_shares: U256,
        input_long: bool,
        min_output_shares: U256,
    ) -> Result<TxHash> {
        self.write("swap", amm, vec![input_shares, min_output_shares], Some(input_long)).await
    }

    async fn enter_position(
        &self,
        amm: Address,
        cash: U256,
        buy_long: bool,
        min_shares: U256,
    ) -> Result<TxHash> {
        self.write("enter_position", amm, vec![cash, min_shares], Some(buy_long)).await
    }

    async fn exit_position(
        &self,
        amm: Address,
        short_shares: U256,
        long_shares: U256,
        min_cash: U256,
    ) -> Result<TxHash> {
        self.write("exit_position", amm, vec![short_shares, long_shares, min_cash], None).await
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        let spender = U256::from_big_endian(spender.as_bytes());
        self.write("approve", token, vec![spender, amount], None).await
    }

    async fn wait_for_confirmations(&self, _hash: TxHash) -> Result<u64> {
        if self.gated.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        self.confirmation
            .lock()
            .unwrap()
            .clone()
            .map_err(AmmError::TransactionError)
    }
}
