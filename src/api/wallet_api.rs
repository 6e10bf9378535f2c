//! 钱包 API：注册确认与余额查询

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    api::middleware::TraceId,
    app_state::AppState,
    domain::{ConnectionRecord, WalletAddress},
    error::AppError,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConnectRequest {
    #[schema(example = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e")]
    pub address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    /// ether 为单位的十进制字符串
    #[schema(example = "1.0")]
    pub balance: String,
}

fn trace_id_of(trace: &Option<Extension<TraceId>>) -> &str {
    trace
        .as_ref()
        .map(|Extension(TraceId(id))| id.as_str())
        .unwrap_or("-")
}

/// 注册钱包地址（不持久化，仅回显确认）
///
/// 请求体不是 JSON 或缺少 `address` 时一律视为缺少地址
#[utoipa::path(
    post,
    path = "/api/wallet/connect",
    tag = "wallet",
    request_body = ConnectRequest,
    responses(
        (status = 200, description = "Wallet connected", body = ConnectionRecord),
        (status = 400, description = "Address is required", body = crate::error_body::ErrorBodyDoc)
    )
)]
pub async fn connect_wallet(
    trace: Option<Extension<TraceId>>,
    payload: Result<Json<ConnectRequest>, JsonRejection>,
) -> Result<Json<ConnectionRecord>, AppError> {
    let address = payload
        .ok()
        .and_then(|Json(req)| req.address)
        .and_then(|raw| WalletAddress::parse(raw).ok());

    let Some(address) = address else {
        crate::metrics::count_err("POST /api/wallet/connect");
        return Err(AppError::address_required());
    };

    tracing::info!(
        trace_id = %trace_id_of(&trace),
        address = %address,
        "Wallet connected"
    );
    crate::metrics::count_ok("POST /api/wallet/connect");

    Ok(Json(ConnectionRecord::connected(address)))
}

/// 查询地址的原生币余额
#[utoipa::path(
    get,
    path = "/api/wallet/balance/{address}",
    tag = "wallet",
    params(("address" = String, Path, description = "Account address, passed to the provider as-is")),
    responses(
        (status = 200, description = "Balance in ether", body = BalanceResponse),
        (status = 500, description = "Failed to fetch balance", body = crate::error_body::ErrorBodyDoc)
    )
)]
pub async fn get_balance(
    State(st): State<Arc<AppState>>,
    trace: Option<Extension<TraceId>>,
    Path(address): Path<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let address = WalletAddress::parse(address).map_err(|_| AppError::address_required())?;

    match st.balance_service.fetch_balance(&address).await {
        Ok(balance) => {
            crate::metrics::count_ok("GET /api/wallet/balance");
            Ok(Json(BalanceResponse {
                balance: balance.into_inner(),
            }))
        }
        Err(e) => {
            // 具体原因只进日志，不返回给调用方
            tracing::warn!(
                trace_id = %trace_id_of(&trace),
                address = %address,
                error = ?e,
                "Failed to fetch balance"
            );
            crate::metrics::count_err("GET /api/wallet/balance");
            Err(AppError::balance_unavailable())
        }
    }
}
