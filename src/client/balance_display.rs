//! 余额展示
//!
//! 订阅共享地址：每次变为非空地址时自动查询余额。
//! 地址变化时中止上一次查询，且结果只在仍属于当前地址时才写入。
//! 查询失败只记录日志，保留之前显示的余额。

use std::sync::{Arc, Mutex};

use tokio::{
    sync::watch,
    task::{AbortHandle, JoinHandle},
};

use crate::client::api_client::WalletApi;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceView {
    /// 当前关注的地址
    pub address: String,
    /// 最近一次成功查询到的余额（ether）
    pub balance: String,
    /// `balance` 对应的地址
    pub balance_address: Option<String>,
}

impl BalanceView {
    pub fn render(&self) -> String {
        format!("{} ETH", self.balance)
    }

    /// 当前地址的余额是否已就绪
    pub fn is_current(&self) -> bool {
        !self.address.is_empty() && self.balance_address.as_deref() == Some(self.address.as_str())
    }
}

/// 当前进行中的查询；展示销毁时一并中止
type InFlightQuery = Arc<Mutex<Option<AbortHandle>>>;

pub struct BalanceDisplay {
    view_rx: watch::Receiver<BalanceView>,
    task: JoinHandle<()>,
    query: InFlightQuery,
}

impl BalanceDisplay {
    pub fn spawn(api: Arc<dyn WalletApi>, address_rx: watch::Receiver<String>) -> Self {
        let (view_tx, view_rx) = watch::channel(BalanceView::default());
        let query = InFlightQuery::default();
        let task = tokio::spawn(watch_address(api, address_rx, view_tx, query.clone()));
        Self {
            view_rx,
            task,
            query,
        }
    }

    pub fn view(&self) -> BalanceView {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BalanceView> {
        self.view_rx.clone()
    }
}

impl Drop for BalanceDisplay {
    fn drop(&mut self) {
        self.task.abort();
        if let Some(handle) = lock(&self.query).take() {
            handle.abort();
        }
    }
}

fn lock(query: &InFlightQuery) -> std::sync::MutexGuard<'_, Option<AbortHandle>> {
    match query.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

async fn watch_address(
    api: Arc<dyn WalletApi>,
    mut address_rx: watch::Receiver<String>,
    view_tx: watch::Sender<BalanceView>,
    query: InFlightQuery,
) {
    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        let address = address_rx.borrow_and_update().clone();

        if let Some(handle) = in_flight.take() {
            handle.abort();
        }

        view_tx.send_if_modified(|view| {
            if view.address == address {
                return false;
            }
            view.address = address.clone();
            true
        });

        if !address.is_empty() {
            let handle = tokio::spawn(fetch_balance(api.clone(), address, view_tx.clone()));
            *lock(&query) = Some(handle.abort_handle());
            in_flight = Some(handle);
        }

        // 地址发送端关闭后不再有新地址
        if address_rx.changed().await.is_err() {
            break;
        }
    }

    if let Some(handle) = in_flight {
        let _ = handle.await;
    }
}

async fn fetch_balance(
    api: Arc<dyn WalletApi>,
    address: String,
    view_tx: watch::Sender<BalanceView>,
) {
    match api.balance(&address).await {
        Ok(balance) => {
            let applied = view_tx.send_if_modified(|view| {
                if view.address != address {
                    return false;
                }
                view.balance = balance.clone();
                view.balance_address = Some(address.clone());
                true
            });
            if !applied {
                tracing::debug!(address = %address, "Discarded balance for stale address");
            }
        }
        Err(e) => {
            tracing::error!(address = %address, error = %e, "Error fetching balance");
        }
    }
}
