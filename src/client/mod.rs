//! 钱包连接客户端
//!
//! 钱包提供者 → 注册确认 → 余额查询 → 展示

pub mod api_client;
pub mod app;
pub mod balance_display;
pub mod connect;
pub mod error;
pub mod wallet_provider;

pub use api_client::{HttpWalletApi, WalletApi};
pub use app::WalletApp;
pub use balance_display::{BalanceDisplay, BalanceView};
pub use connect::{ConnectState, ConnectWallet, CONNECT_FAILED_MESSAGE, INSTALL_WALLET_MESSAGE};
pub use error::ClientError;
pub use wallet_provider::{
    ConfiguredWalletProbe, JsonRpcWalletProvider, WalletProbe, WalletProvider,
};
