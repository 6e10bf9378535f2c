//! 钱包连接客户端（命令行）
//!
//! 探测钱包提供者 → 授权并注册地址 → 查询余额 → 打印视图

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use ironconnect::{
    client::{ConfiguredWalletProbe, ConnectState, HttpWalletApi, WalletApp},
    config::Config,
    infrastructure::logging,
};

/// 等待余额返回的上限
const BALANCE_WAIT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    if let Err(e) = logging::init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let api = Arc::new(HttpWalletApi::new(&config.client.api_url)?);
    let probe = Arc::new(ConfiguredWalletProbe::new(
        config.client.wallet_provider_url.clone(),
    ));
    let app = WalletApp::new(probe, api);

    println!("{}\n", app.render());

    let state = app.connect_wallet().connect().await;
    if let ConnectState::Connected { address } = &state {
        tracing::info!(address = %address, "✅ Wallet connected");

        let mut view_rx = app.balance_display().subscribe();
        let ready = tokio::time::timeout(BALANCE_WAIT, view_rx.wait_for(|v| v.is_current()))
            .await
            .map(|r| r.is_ok());
        match ready {
            Ok(true) => {}
            Ok(false) => tracing::warn!("Balance display stopped"),
            Err(_) => tracing::warn!("Timed out waiting for balance"),
        }
    }

    println!("{}", app.render());
    Ok(())
}
