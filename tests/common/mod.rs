//! 测试辅助模块
//! 提供桩链数据提供者、测试路由和进程内 JSON-RPC 节点

#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{routing::post, Json, Router};
use ethers::types::U256;
use ironconnect::{
    api,
    app_state::AppState,
    config::Config,
    domain::Network,
    service::ChainDataProvider,
};
use serde_json::{json, Value};

/// 1 ether 的十六进制 wei 表示
pub const ONE_ETHER_HEX: &str = "0xde0b6b3a7640000";

pub const TEST_ADDRESS: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

/// 桩链数据提供者：固定余额或固定失败，并记录调用次数
pub struct StubChain {
    balance: Option<U256>,
    pub calls: AtomicUsize,
}

impl StubChain {
    pub fn with_balance(wei: U256) -> Arc<Self> {
        Arc::new(Self {
            balance: Some(wei),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            balance: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainDataProvider for StubChain {
    fn network(&self) -> Network {
        Network::Sepolia
    }

    async fn get_balance(&self, address: &str) -> Result<U256> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.balance
            .ok_or_else(|| anyhow!("upstream unavailable for {}", address))
    }
}

pub fn test_config() -> Config {
    Config::from_env().expect("Failed to load test config")
}

/// 创建测试应用（路由 + 中间件，与生产一致）
pub fn test_app(provider: Arc<dyn ChainDataProvider>) -> Router {
    test_app_with_config(test_config(), provider)
}

pub fn test_app_with_config(config: Config, provider: Arc<dyn ChainDataProvider>) -> Router {
    let state = AppState::with_provider(Arc::new(config), provider);
    api::routes(Arc::new(state))
}

/// 在随机端口启动服务，返回基础 URL
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .ok();
    });

    format!("http://{}", addr)
}

/// 进程内 JSON-RPC 节点
///
/// `eth_getBalance` 返回 1 ether，`eth_requestAccounts` 返回 `accounts`，其他方法返回错误
pub async fn spawn_rpc_node(accounts: Vec<String>) -> String {
    let app = Router::new().route(
        "/",
        post(move |Json(req): Json<Value>| {
            let accounts = accounts.clone();
            async move {
                let id = req.get("id").cloned().unwrap_or(Value::Null);
                let reply = match req.get("method").and_then(Value::as_str) {
                    Some("eth_getBalance") => json!({"jsonrpc": "2.0", "id": id, "result": ONE_ETHER_HEX}),
                    Some("eth_requestAccounts") => json!({"jsonrpc": "2.0", "id": id, "result": accounts}),
                    _ => json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "error": {"code": -32601, "message": "method not found"}
                    }),
                };
                Json(reply)
            }
        }),
    );

    spawn_server(app).await
}

/// 一个当前没有监听者的本地端点
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}
