use ethers::prelude::*;
use std::sync::Arc;
use crate::utils::{AmmError, Result};

/// HTTP connection to the node hosting the AMM factory
pub struct BlockchainClient {
    pub provider: Arc<Provider<Http>>,
    chain_id: u64,
}

impl BlockchainClient {
    /// Connect and learn which chain the node serves
    pub async fn new(rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url).map_err(|e| {
            AmmError::RpcError(ProviderError::CustomError(format!("Invalid RPC URL '{}': {}", rpc_url, e)))
        })?;
        let provider = Arc::new(provider);

        let chain_id = provider.get_chainid().await?.as_u64();
        tracing::info!("🔗 Connected to {} ({})", chain_name(chain_id), chain_id);

        Ok(Self { provider, chain_id })
    }

    /// Factories and exchanges must have code; an EOA here is a misconfiguration
    pub async fn is_contract(&self, address: Address) -> Result<bool> {
        tracing::debug!("Checking code at {:?}", address);
        let code = self.provider.get_code(address, None).await?;
        Ok(!code.is_empty())
    }

    /// Native asset balance, the collateral of native-backed markets
    pub async fn native_balance(&self, account: Address) -> Result<U256> {
        Ok(self.provider.get_balance(account, None).await?)
    }

    pub async fn block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?.as_u64())
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn chain_name(&self) -> &'static str {
        chain_name(self.chain_id)
    }
}

pub fn chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "Ethereum Mainnet",
        42 => "Kovan Testnet",
        137 => "Polygon",
        80001 => "Polygon Mumbai",
        1337 | 31337 => "Local Node",
        _ => "Unknown Chain",
    }
}
