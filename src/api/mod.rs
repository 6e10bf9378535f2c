use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{OpenApi, ToSchema};

use crate::{
    api::middleware::{rate_limit_middleware, trace_id_middleware},
    app_state::AppState,
    error::AppError,
};

pub mod middleware;
pub mod wallet_api;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "IronConnect API",
        version = "0.1.0",
        description = "Wallet connection and balance lookup"
    ),
    paths(wallet_api::connect_wallet, wallet_api::get_balance, health),
    components(schemas(
        wallet_api::ConnectRequest,
        wallet_api::BalanceResponse,
        crate::domain::ConnectionRecord,
        crate::error_body::ErrorBodyDoc,
        HealthResponse
    )),
    tags((name = "wallet", description = "Wallet registration and balance"))
)]
pub struct ApiDoc;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub network: String,
    pub chain_id: u64,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "OK", body = HealthResponse))
)]
pub async fn health(
    axum::extract::State(st): axum::extract::State<Arc<AppState>>,
) -> Json<HealthResponse> {
    crate::metrics::count_ok("GET /health");
    let network = st.balance_service.network();
    Json(HealthResponse {
        status: "ok".into(),
        network: network.to_string(),
        chain_id: network.chain_id(),
    })
}

async fn not_found() -> AppError {
    AppError::not_found("Not found")
}

pub fn routes(state: Arc<AppState>) -> Router {
    let wallet_routes = Router::new()
        .route("/connect", post(wallet_api::connect_wallet))
        .route("/balance/:address", get(wallet_api::get_balance));

    Router::new()
        .nest("/api/wallet", wallet_routes)
        .route("/health", get(health))
        .route(
            "/metrics",
            get(|| async { crate::metrics::render_prometheus() }),
        )
        .merge(utoipa_swagger_ui::SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), rate_limit_middleware))
        // 外层先执行：请求日志 -> CORS -> trace_id
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(from_fn(trace_id_middleware)),
        )
        .with_state(state)
}
