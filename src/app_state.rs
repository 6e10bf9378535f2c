use std::sync::Arc;

use crate::{
    config::Config,
    infrastructure::rate_limiter::FixedWindowLimiter,
    service::{BalanceService, ChainDataProvider, EthersChainClient},
};

/// 应用状态
/// 请求之间只读共享；限流表是唯一的可变部分
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub balance_service: Arc<BalanceService>,
    pub rate_limiter: Arc<FixedWindowLimiter>,
}

impl AppState {
    /// 使用配置中的网络创建 ethers Provider
    pub fn new(config: Arc<Config>) -> anyhow::Result<Self> {
        let client = EthersChainClient::from_config(&config.blockchain)?;
        tracing::info!(
            network = %client.network(),
            rpc = %client.rpc_url(),
            "✅ Chain data provider initialized"
        );
        Ok(Self::with_provider(config, Arc::new(client)))
    }

    /// 注入任意链数据提供者（测试使用桩实现）
    pub fn with_provider(config: Arc<Config>, provider: Arc<dyn ChainDataProvider>) -> Self {
        let rate_limiter = Arc::new(FixedWindowLimiter::from_config(&config.rate_limit));
        let balance_service = Arc::new(BalanceService::new(provider));

        Self {
            config,
            balance_service,
            rate_limiter,
        }
    }
}
