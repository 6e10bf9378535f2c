//! 钱包提供者能力
//!
//! 能力是否存在取决于运行环境，使用前必须先探测

use std::sync::Arc;

use async_trait::async_trait;
use ethers::providers::{Http, Provider};

use crate::client::error::ClientError;

/// 能请求用户授权并返回账户地址的钱包
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// `eth_requestAccounts`：返回已授权的地址列表
    async fn request_accounts(&self) -> Result<Vec<String>, ClientError>;
}

/// 探测钱包能力；`None` 表示环境中没有可用钱包
pub trait WalletProbe: Send + Sync {
    fn probe(&self) -> Option<Arc<dyn WalletProvider>>;
}

/// 通过 JSON-RPC 暴露 `eth_requestAccounts` 的钱包（本地节点或钱包桥）
pub struct JsonRpcWalletProvider {
    provider: Provider<Http>,
}

impl JsonRpcWalletProvider {
    pub fn new(url: &str) -> Result<Self, ClientError> {
        let provider = Provider::<Http>::try_from(url)
            .map_err(|e| ClientError::Wallet(format!("invalid wallet provider url {}: {}", url, e)))?;
        Ok(Self { provider })
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ClientError> {
        self.provider
            .request::<_, Vec<String>>("eth_requestAccounts", ())
            .await
            .map_err(|e| ClientError::Wallet(e.to_string()))
    }
}

/// 由配置决定钱包能力：未配置端点即视为未安装钱包
pub struct ConfiguredWalletProbe {
    url: Option<String>,
}

impl ConfiguredWalletProbe {
    pub fn new(url: Option<String>) -> Self {
        Self { url }
    }
}

impl WalletProbe for ConfiguredWalletProbe {
    fn probe(&self) -> Option<Arc<dyn WalletProvider>> {
        let url = self.url.as_deref()?;
        match JsonRpcWalletProvider::new(url) {
            Ok(provider) => Some(Arc::new(provider)),
            Err(e) => {
                tracing::warn!(error = %e, "Wallet provider unavailable");
                None
            }
        }
    }
}
