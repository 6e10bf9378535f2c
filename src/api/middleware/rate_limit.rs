//! 速率限制中间件
//! 按客户端IP的固定窗口计数，默认 15 分钟 100 次

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    app_state::AppState, error::AppError, infrastructure::rate_limiter::RateLimitDecision,
};

pub async fn rate_limit_middleware(
    State(st): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    if !st.rate_limiter.enabled() {
        return next.run(req).await;
    }

    let key = client_key(&req, st.config.rate_limit.trust_proxy);
    let decision = st.rate_limiter.hit(&key).await;

    let mut response = if decision.allowed() {
        next.run(req).await
    } else {
        crate::metrics::inc_rate_limited();
        tracing::warn!(key = %key, limit = decision.limit, "Rate limit exceeded");
        AppError::rate_limit_exceeded().into_response()
    };

    insert_rate_limit_headers(response.headers_mut(), &decision);
    response
}

/// 确定限流键
///
/// 默认只用连接地址；`trust_proxy` 开启时依次取 X-Forwarded-For、X-Real-IP
pub fn client_key(req: &Request, trust_proxy: bool) -> String {
    let forwarded = trust_proxy.then(|| forwarded_ip(req)).flatten();

    let ip = forwarded
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string());

    format!("rate_limit:ip:{}", ip)
}

fn forwarded_ip(req: &Request) -> Option<String> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
    };

    header("X-Forwarded-For")
        .and_then(|v| v.split(',').next().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .or_else(|| header("X-Real-IP").filter(|s| !s.is_empty()))
}

fn insert_rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert("X-RateLimit-Limit", HeaderValue::from(decision.limit));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(decision.remaining()));
    let reset_at = chrono::Utc::now().timestamp() + decision.reset_after.as_secs() as i64;
    headers.insert("X-RateLimit-Reset", HeaderValue::from(reset_at));
}
