//! 钱包连接状态机
//!
//! `Idle → Connecting → Connected` 或 `Idle → Connecting → Error`，
//! `Error` 不是终态，再次触发重新进入 `Connecting`

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::watch;

use crate::client::{
    api_client::WalletApi,
    error::ClientError,
    wallet_provider::{WalletProbe, WalletProvider},
};

pub const INSTALL_WALLET_MESSAGE: &str = "Please install MetaMask!";
pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect wallet. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectState {
    Idle,
    Connecting,
    Connected { address: String },
    Error { message: String },
}

impl ConnectState {
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ConnectState::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// 进行中标记；drop 时复位，尝试被取消也不会卡住
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ConnectWallet {
    probe: Arc<dyn WalletProbe>,
    api: Arc<dyn WalletApi>,
    /// 与余额展示共享的地址
    address_tx: watch::Sender<String>,
    state_tx: watch::Sender<ConnectState>,
    loading: AtomicBool,
}

impl ConnectWallet {
    pub fn new(
        probe: Arc<dyn WalletProbe>,
        api: Arc<dyn WalletApi>,
        address_tx: watch::Sender<String>,
    ) -> Self {
        let (state_tx, _) = watch::channel(ConnectState::Idle);
        Self {
            probe,
            api,
            address_tx,
            state_tx,
            loading: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> ConnectState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectState> {
        self.state_tx.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_loading() {
            "Connecting..."
        } else {
            "Connect Wallet"
        }
    }

    /// 用户触发连接；已有尝试在进行时直接返回当前状态
    pub async fn connect(&self) -> ConnectState {
        let Some(_in_flight) = InFlight::acquire(&self.loading) else {
            tracing::debug!("Wallet connection already in flight");
            return self.state();
        };

        self.state_tx.send_replace(ConnectState::Connecting);
        let next = self.attempt().await;
        self.state_tx.send_replace(next.clone());
        next
    }

    async fn attempt(&self) -> ConnectState {
        let Some(provider) = self.probe.probe() else {
            tracing::warn!("No wallet provider detected");
            return ConnectState::Error {
                message: INSTALL_WALLET_MESSAGE.to_string(),
            };
        };

        match self.authorize_and_register(provider.as_ref()).await {
            Ok(address) => ConnectState::Connected { address },
            Err(e) => {
                tracing::error!(error = %e, "Error connecting wallet");
                ConnectState::Error {
                    message: CONNECT_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }

    async fn authorize_and_register(
        &self,
        provider: &dyn WalletProvider,
    ) -> Result<String, ClientError> {
        let accounts = provider.request_accounts().await?;
        let address = accounts
            .into_iter()
            .next()
            .filter(|a| !a.is_empty())
            .ok_or(ClientError::NoAccounts)?;

        // 先公开地址，注册失败也不回滚
        self.address_tx.send_replace(address.clone());

        let record = self.api.connect(&address).await?;
        tracing::info!(address = %record.address, message = %record.message, "Wallet registered");

        Ok(address)
    }
}
