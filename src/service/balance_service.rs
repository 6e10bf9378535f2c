//! 余额查询服务
//!
//! 无内部状态：每次请求查询一次上游，不重试、不缓存

use std::{sync::Arc, time::Instant};

use anyhow::Result;

use crate::{
    domain::{BalanceResult, Network, WalletAddress},
    service::blockchain_client::ChainDataProvider,
};

pub struct BalanceService {
    provider: Arc<dyn ChainDataProvider>,
}

impl BalanceService {
    pub fn new(provider: Arc<dyn ChainDataProvider>) -> Self {
        Self { provider }
    }

    pub fn network(&self) -> Network {
        self.provider.network()
    }

    /// 查询地址余额并换算为 ether 字符串
    pub async fn fetch_balance(&self, address: &WalletAddress) -> Result<BalanceResult> {
        let started = Instant::now();
        let result = self.provider.get_balance(address.as_str()).await;
        let latency_ms = started.elapsed().as_millis();

        crate::metrics::observe_upstream_latency_ms(latency_ms, result.is_ok());

        let wei = result?;
        let balance = BalanceResult::from_wei(wei);
        tracing::info!(
            address = %address,
            balance = %balance,
            latency_ms = latency_ms as u64,
            "Balance fetched"
        );
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use ethers::types::U256;

    use super::*;

    struct FixedProvider(Option<U256>);

    #[async_trait]
    impl ChainDataProvider for FixedProvider {
        fn network(&self) -> Network {
            Network::Mainnet
        }

        async fn get_balance(&self, _address: &str) -> Result<U256> {
            self.0.ok_or_else(|| anyhow::anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_fetch_balance_formats_ether() {
        let wei = U256::exp10(18) * U256::from(3u64);
        let service = BalanceService::new(Arc::new(FixedProvider(Some(wei))));
        let address = WalletAddress::parse("0xabc").unwrap();
        let balance = service.fetch_balance(&address).await.unwrap();
        assert_eq!(balance.as_str(), "3.0");
        assert_eq!(service.network(), Network::Mainnet);
    }

    #[tokio::test]
    async fn test_fetch_balance_propagates_upstream_failure() {
        let service = BalanceService::new(Arc::new(FixedProvider(None)));
        let address = WalletAddress::parse("0xabc").unwrap();
        let err = service.fetch_balance(&address).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
