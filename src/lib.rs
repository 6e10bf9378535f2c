//! IronConnect - 钱包连接与余额查询
//!
//! 后端：注册确认 + 余额查询两个接口；客户端：钱包连接状态机 + 余额展示

pub mod api;
pub mod app_state;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod error_body;
pub mod infrastructure;
pub mod metrics;
pub mod service;

// 重新导出常用类型
pub use app_state::AppState;
pub use error::{AppError, AppErrorCode};
