pub mod balance_service;
pub mod blockchain_client;

pub use balance_service::BalanceService;
pub use blockchain_client::{ChainDataProvider, EthersChainClient};
