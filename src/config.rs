//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::Network;

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub blockchain: BlockchainConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

/// 区块链配置：单一网络，启动时确定，请求不可选择
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockchainConfig {
    pub network: String,
    /// 覆盖网络默认的公共RPC端点
    pub rpc_url: Option<String>,
}

/// 速率限制配置（固定窗口，按客户端IP计数）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    /// 0 表示关闭限流
    pub max_requests: u64,
    /// 位于反向代理之后时才信任 X-Forwarded-For / X-Real-IP
    #[serde(default)]
    pub trust_proxy: bool,
}

/// 客户端配置（wallet_client 使用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_url: String,
    /// 钱包提供者端点；未设置时视为钱包能力不存在
    pub wallet_provider_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
        }
    }
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            network: std::env::var("ETH_NETWORK").unwrap_or_else(|_| "mainnet".into()),
            rpc_url: std::env::var("ETH_RPC_URL").ok().filter(|s| !s.is_empty()),
        }
    }
}

impl BlockchainConfig {
    pub fn network(&self) -> Result<Network> {
        self.network
            .parse()
            .with_context(|| format!("Unsupported ETH_NETWORK: {}", self.network))
    }

    /// 实际使用的RPC端点：显式配置优先，否则使用网络默认端点
    pub fn resolved_rpc_url(&self) -> Result<String> {
        match &self.rpc_url {
            Some(url) => Ok(url.clone()),
            None => Ok(self.network()?.default_rpc_url().to_string()),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(15 * 60),
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            trust_proxy: std::env::var("RATE_LIMIT_TRUST_PROXY")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: std::env::var("WALLET_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000".into()),
            wallet_provider_url: std::env::var("WALLET_PROVIDER_URL")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            blockchain: BlockchainConfig::default(),
            rate_limit: RateLimitConfig::default(),
            client: ClientConfig::default(),
        })
    }

    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut config = Self::from_env()?;

        if let Some(path) = path {
            if path.as_ref().exists() {
                config = Self::from_file(path)?;
            }
        }

        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        self.blockchain.network()?;

        let rpc_url = self.blockchain.resolved_rpc_url()?;
        if !rpc_url.starts_with("http://") && !rpc_url.starts_with("https://") {
            anyhow::bail!("ETH_RPC_URL must start with http:// or https://");
        }

        if self.rate_limit.max_requests > 0 && self.rate_limit.window_secs == 0 {
            anyhow::bail!("RATE_LIMIT_WINDOW_SECS must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn sample_toml() -> &'static str {
        r#"
[server]
host = "127.0.0.1"
port = 9090

[logging]
level = "debug"
format = "json"

[blockchain]
network = "sepolia"

[rate_limit]
window_secs = 60
max_requests = 10
"#
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_toml()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.bind_addr(), "127.0.0.1:9090");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.blockchain.network().unwrap(), Network::Sepolia);
        assert_eq!(config.rate_limit.max_requests, 10);
        assert!(!config.rate_limit.trust_proxy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_overrides_env() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_toml()).unwrap();

        let config = Config::from_env_and_file(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_missing_config_file_falls_back_to_env() {
        let config = Config::from_env_and_file(Some("/nonexistent/ironconnect.toml"));
        assert!(config.is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::from_file_str(sample_toml());
        assert!(config.validate().is_ok());

        config.logging.format = "xml".into();
        assert!(config.validate().is_err());

        config.logging.format = "text".into();
        config.blockchain.network = "dogechain".into();
        assert!(config.validate().is_err());

        config.blockchain.network = "mainnet".into();
        config.blockchain.rpc_url = Some("ws://localhost:8546".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolved_rpc_url() {
        let mut blockchain = BlockchainConfig {
            network: "mainnet".into(),
            rpc_url: None,
        };
        assert_eq!(
            blockchain.resolved_rpc_url().unwrap(),
            Network::Mainnet.default_rpc_url()
        );

        blockchain.rpc_url = Some("http://127.0.0.1:8545".into());
        assert_eq!(blockchain.resolved_rpc_url().unwrap(), "http://127.0.0.1:8545");
    }

    impl Config {
        fn from_file_str(content: &str) -> Self {
            toml::from_str(content).unwrap()
        }
    }
}
