// 链数据客户端 - 只读余额查询
// 通过 ethers-rs 的 JSON-RPC Provider 访问单一固定网络

use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{Address, NameOrAddress, U256},
    utils::to_checksum,
};

use crate::{config::BlockchainConfig, domain::Network};

/// 外部链数据提供者：按地址返回最小单位（wei）余额
#[async_trait]
pub trait ChainDataProvider: Send + Sync {
    fn network(&self) -> Network;

    /// 地址原样交给提供者，格式错误由提供者拒绝
    async fn get_balance(&self, address: &str) -> Result<U256>;
}

pub struct EthersChainClient {
    provider: Provider<Http>,
    network: Network,
    rpc_url: String,
}

impl EthersChainClient {
    pub fn new(network: Network, rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .with_context(|| format!("Failed to create Ethereum provider for {}", rpc_url))?;

        Ok(Self {
            provider,
            network,
            rpc_url: rpc_url.to_string(),
        })
    }

    pub fn from_config(config: &BlockchainConfig) -> Result<Self> {
        let network = config.network()?;
        let rpc_url = config.resolved_rpc_url()?;
        Self::new(network, &rpc_url)
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

/// 十六进制账户直接查询；其余输入当作 ENS 名称交给提供者解析
///
/// 大小写混合的十六进制地址必须符合 EIP-55 校验和
fn balance_target(address: &str) -> Result<NameOrAddress> {
    let Ok(addr) = Address::from_str(address) else {
        return Ok(NameOrAddress::Name(address.to_string()));
    };

    let digits = address.trim_start_matches("0x");
    let mixed_case = digits.chars().any(|c| c.is_ascii_uppercase())
        && digits.chars().any(|c| c.is_ascii_lowercase());
    if mixed_case && to_checksum(&addr, None).trim_start_matches("0x") != digits {
        anyhow::bail!("bad address checksum: {}", address);
    }

    Ok(NameOrAddress::Address(addr))
}

#[async_trait]
impl ChainDataProvider for EthersChainClient {
    fn network(&self) -> Network {
        self.network
    }

    async fn get_balance(&self, address: &str) -> Result<U256> {
        let balance = self
            .provider
            .get_balance(balance_target(address)?, None)
            .await
            .with_context(|| format!("eth_getBalance failed for {}", address))?;

        tracing::debug!(
            address = %address,
            balance_wei = %balance,
            network = %self.network,
            rpc = %self.rpc_url,
            "Fetched native balance"
        );

        Ok(balance)
    }
}
