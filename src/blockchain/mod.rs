pub mod client;
pub mod gateway;

pub use client::BlockchainClient;
pub use gateway::EthersGateway;
