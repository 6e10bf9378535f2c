//! 客户端端到端测试：真实 HTTP 服务 + 进程内钱包节点

mod common;

use std::{sync::Arc, time::Duration};

use ethers::types::U256;
use ironconnect::client::{
    ClientError, ConfiguredWalletProbe, ConnectState, HttpWalletApi, WalletApi, WalletApp,
    WalletProbe, WalletProvider, CONNECT_FAILED_MESSAGE, INSTALL_WALLET_MESSAGE,
};

use common::{StubChain, TEST_ADDRESS};

struct NoWallet;

impl WalletProbe for NoWallet {
    fn probe(&self) -> Option<Arc<dyn WalletProvider>> {
        None
    }
}

async fn wait_for_balance(app: &WalletApp) -> String {
    let mut view_rx = app.balance_display().subscribe();
    let view = tokio::time::timeout(Duration::from_secs(5), view_rx.wait_for(|v| v.is_current()))
        .await
        .expect("timed out waiting for balance")
        .expect("balance display stopped")
        .clone();
    view.render()
}

#[tokio::test]
async fn test_http_api_round_trip() {
    let base = common::spawn_server(common::test_app(StubChain::with_balance(U256::exp10(18)))).await;
    let api = HttpWalletApi::new(&base).unwrap();

    let record = api.connect(TEST_ADDRESS).await.unwrap();
    assert_eq!(record.message, "Wallet connected");
    assert_eq!(record.address, TEST_ADDRESS);

    assert_eq!(api.balance(TEST_ADDRESS).await.unwrap(), "1.0");
}

#[tokio::test]
async fn test_http_api_surfaces_error_message() {
    let base = common::spawn_server(common::test_app(StubChain::failing())).await;
    let api = HttpWalletApi::new(&base).unwrap();

    match api.balance(TEST_ADDRESS).await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to fetch balance");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }

    match api.connect("").await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Address is required");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_full_flow_with_json_rpc_wallet() {
    let chain = StubChain::with_balance(U256::exp10(18) * U256::from(2u64));
    let base = common::spawn_server(common::test_app(chain.clone())).await;
    let wallet_url = common::spawn_rpc_node(vec![TEST_ADDRESS.to_string()]).await;

    let app = WalletApp::new(
        Arc::new(ConfiguredWalletProbe::new(Some(wallet_url))),
        Arc::new(HttpWalletApi::new(&base).unwrap()),
    );

    let state = app.connect_wallet().connect().await;
    assert_eq!(
        state,
        ConnectState::Connected {
            address: TEST_ADDRESS.to_string()
        }
    );
    assert_eq!(app.address(), TEST_ADDRESS);

    assert_eq!(wait_for_balance(&app).await, "2.0 ETH");
    assert!(app.render().contains("Wallet Balance\n2.0 ETH"));
    assert_eq!(chain.call_count(), 1);
}

#[tokio::test]
async fn test_missing_wallet_makes_no_backend_calls() {
    let chain = StubChain::with_balance(U256::exp10(18));
    let base = common::spawn_server(common::test_app(chain.clone())).await;

    let app = WalletApp::new(Arc::new(NoWallet), Arc::new(HttpWalletApi::new(&base).unwrap()));
    let state = app.connect_wallet().connect().await;

    assert_eq!(state.error_message(), Some(INSTALL_WALLET_MESSAGE));
    assert!(app.address().is_empty());
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(chain.call_count(), 0);
}

#[tokio::test]
async fn test_unreachable_backend_still_publishes_address() {
    let wallet_url = common::spawn_rpc_node(vec![TEST_ADDRESS.to_string()]).await;

    let app = WalletApp::new(
        Arc::new(ConfiguredWalletProbe::new(Some(wallet_url))),
        Arc::new(HttpWalletApi::new(&common::closed_port_url()).unwrap()),
    );
    let state = app.connect_wallet().connect().await;

    assert_eq!(state.error_message(), Some(CONNECT_FAILED_MESSAGE));
    assert_eq!(app.address(), TEST_ADDRESS);
    assert!(app.render().contains(CONNECT_FAILED_MESSAGE));
}
