//! 链数据网络配置
//!
//! 每个进程只连接一个网络，由配置决定，请求无法选择

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Ethereum 主网（homestead）
    #[default]
    Mainnet,
    Sepolia,
    Holesky,
}

impl Network {
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Sepolia => "sepolia",
            Network::Holesky => "holesky",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => 1,
            Network::Sepolia => 11_155_111,
            Network::Holesky => 17_000,
        }
    }

    /// 公共只读RPC端点
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://ethereum-rpc.publicnode.com",
            Network::Sepolia => "https://ethereum-sepolia-rpc.publicnode.com",
            Network::Holesky => "https://ethereum-holesky-rpc.publicnode.com",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "homestead" | "ethereum" | "eth" | "1" => Ok(Network::Mainnet),
            "sepolia" | "11155111" => Ok(Network::Sepolia),
            "holesky" | "17000" => Ok(Network::Holesky),
            other => anyhow::bail!("Unknown network: {}", other),
        }
    }
}
