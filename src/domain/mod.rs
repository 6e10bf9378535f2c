//! Domain 模块
//!
//! 钱包连接与余额查询的领域模型

pub mod balance;
pub mod network;
pub mod wallet;

// 重新导出常用类型
pub use balance::{format_ether, format_units, BalanceResult, ETHER_DECIMALS};
pub use network::Network;
pub use wallet::{AddressError, ConnectionRecord, WalletAddress, WALLET_CONNECTED_MESSAGE};
