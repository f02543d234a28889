//! Client configuration
//!
//! Built from CLI flags, optionally on top of a JSON file. Every field has a
//! default so a partial file is enough.

use std::path::Path;
use std::sync::Arc;
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use crate::blockchain::{BlockchainClient, EthersGateway};
use crate::contracts::addresses;
use crate::core::AmmGateway;
use crate::models::{CollateralKind, TokenDecimals};
use crate::utils::{AmmError, Result};

pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub rpc_url: String,
    /// AMM factory contract
    pub factory: Address,
    pub collateral: CollateralKind,
    pub decimals: TokenDecimals,
    /// Blocks a receipt needs before it counts as confirmed
    pub confirmations: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            factory: Address::zero(),
            collateral: CollateralKind::default(),
            decimals: TokenDecimals::default(),
            confirmations: 1,
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if addresses::is_null(self.factory) {
            return Err(AmmError::InvalidAddress("factory address is not set".into()));
        }

        let d = &self.decimals;
        // rust_decimal keeps at most 28 fractional digits
        if [d.cash, d.shares, d.lp_tokens, d.display].iter().any(|&v| v > 28) {
            return Err(AmmError::Validation(format!("unsupported decimals {:?}", d)));
        }
        Ok(())
    }

    /// Connect to the node and build a gateway for the configured factory
    pub async fn connect(&self) -> Result<(BlockchainClient, Arc<dyn AmmGateway>)> {
        self.validate()?;

        let client = BlockchainClient::new(&self.rpc_url).await?;
        if !client.is_contract(self.factory).await? {
            return Err(AmmError::InvalidAddress(format!(
                "no contract deployed at factory {:?}", self.factory
            )));
        }

        let gateway: Arc<dyn AmmGateway> = Arc::new(
            EthersGateway::new(client.provider.clone(), self.factory, self.collateral)
                .with_confirmations(self.confirmations),
        );

        Ok((client, gateway))
    }
}
