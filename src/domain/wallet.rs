//! 钱包地址与连接记录
//!
//! 地址只要求非空，格式校验交给外部链数据提供者

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const WALLET_CONNECTED_MESSAGE: &str = "Wallet connected";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Address is required")]
    Missing,
}

/// 不透明的账户标识；原样保存，不做大小写或校验和规范化
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn parse(raw: impl Into<String>) -> Result<Self, AddressError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(AddressError::Missing);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 注册确认（仅存在于单次请求/响应）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConnectionRecord {
    #[schema(example = "Wallet connected")]
    pub message: String,
    #[schema(example = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e")]
    pub address: String,
}

impl ConnectionRecord {
    pub fn connected(address: WalletAddress) -> Self {
        Self {
            message: WALLET_CONNECTED_MESSAGE.to_string(),
            address: address.into_inner(),
        }
    }
}
