//! 客户端组合：连接按钮与余额展示共享同一个地址

use std::sync::Arc;

use tokio::sync::watch;

use crate::client::{
    api_client::WalletApi,
    balance_display::BalanceDisplay,
    connect::ConnectWallet,
    wallet_provider::WalletProbe,
};

pub const APP_TITLE: &str = "Web-Based Wallet";

pub struct WalletApp {
    connect: ConnectWallet,
    display: BalanceDisplay,
    address_rx: watch::Receiver<String>,
}

impl WalletApp {
    pub fn new(probe: Arc<dyn WalletProbe>, api: Arc<dyn WalletApi>) -> Self {
        let (address_tx, address_rx) = watch::channel(String::new());
        let connect = ConnectWallet::new(probe, api.clone(), address_tx);
        let display = BalanceDisplay::spawn(api, address_rx.clone());

        Self {
            connect,
            display,
            address_rx,
        }
    }

    pub fn connect_wallet(&self) -> &ConnectWallet {
        &self.connect
    }

    pub fn balance_display(&self) -> &BalanceDisplay {
        &self.display
    }

    pub fn address(&self) -> String {
        self.address_rx.borrow().clone()
    }

    /// 文本视图：地址为空时不显示余额区域
    pub fn render(&self) -> String {
        let mut lines = vec![
            APP_TITLE.to_string(),
            format!("[{}]", self.connect.button_label()),
        ];

        if let Some(message) = self.connect.state().error_message() {
            lines.push(message.to_string());
        }

        if !self.address().is_empty() {
            lines.push("Wallet Balance".to_string());
            lines.push(self.display.view().render());
        }

        lines.join("\n")
    }
}
