//! 进程内计数器，以 Prometheus 文本格式暴露在 `/metrics`

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, OnceLock},
};

static METRICS: OnceLock<Mutex<MetricsState>> = OnceLock::new();

/// 上游时延分桶上界（毫秒），最后一个桶为 +Inf
const LATENCY_BOUNDS_MS: [u128; 5] = [50, 100, 250, 500, 1000];

#[derive(Default)]
struct MetricsState {
    total: u64,
    errors: u64,
    per_endpoint: BTreeMap<&'static str, u64>,
    per_endpoint_err: BTreeMap<&'static str, u64>,
    rate_limited: u64,
    // 上游成功/失败与时延统计（毫秒）
    upstream_ok: u64,
    upstream_err: u64,
    upstream_latency_sum_ms: u128,
    upstream_hist_buckets: [u64; 6],
}

fn state() -> MutexGuard<'static, MetricsState> {
    let lock = METRICS.get_or_init(|| Mutex::new(MetricsState::default()));
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(), // 避免因锁污染导致 panic
    }
}

pub fn count_ok(endpoint: &'static str) {
    let mut s = state();
    s.total += 1;
    *s.per_endpoint.entry(endpoint).or_insert(0) += 1;
}

pub fn count_err(endpoint: &'static str) {
    let mut s = state();
    s.total += 1;
    s.errors += 1;
    *s.per_endpoint.entry(endpoint).or_insert(0) += 1;
    *s.per_endpoint_err.entry(endpoint).or_insert(0) += 1;
}

pub fn inc_rate_limited() {
    state().rate_limited += 1;
}

pub fn observe_upstream_latency_ms(latency_ms: u128, ok: bool) {
    let mut s = state();
    if ok {
        s.upstream_ok += 1;
    } else {
        s.upstream_err += 1;
    }
    s.upstream_latency_sum_ms += latency_ms;
    let bucket = LATENCY_BOUNDS_MS
        .iter()
        .position(|bound| latency_ms < *bound)
        .unwrap_or(LATENCY_BOUNDS_MS.len());
    s.upstream_hist_buckets[bucket] += 1;
}

pub fn render_prometheus() -> String {
    let s = state();
    let mut out = String::new();
    out.push_str("# HELP ironconnect_requests_total Total requests\n");
    out.push_str("# TYPE ironconnect_requests_total counter\n");
    out.push_str(&format!("ironconnect_requests_total {}\n", s.total));

    out.push_str("# HELP ironconnect_errors_total Total error responses\n");
    out.push_str("# TYPE ironconnect_errors_total counter\n");
    out.push_str(&format!("ironconnect_errors_total {}\n", s.errors));

    out.push_str("# HELP ironconnect_endpoint_requests_total Requests per endpoint\n");
    out.push_str("# TYPE ironconnect_endpoint_requests_total counter\n");
    for (k, v) in s.per_endpoint.iter() {
        out.push_str(&format!(
            "ironconnect_endpoint_requests_total{{endpoint=\"{}\"}} {}\n",
            k, v
        ));
    }

    out.push_str("# HELP ironconnect_endpoint_errors_total Errors per endpoint\n");
    out.push_str("# TYPE ironconnect_endpoint_errors_total counter\n");
    for (k, v) in s.per_endpoint_err.iter() {
        out.push_str(&format!(
            "ironconnect_endpoint_errors_total{{endpoint=\"{}\"}} {}\n",
            k, v
        ));
    }

    out.push_str("# HELP ironconnect_rate_limited_total Requests rejected by rate limit\n");
    out.push_str("# TYPE ironconnect_rate_limited_total counter\n");
    out.push_str(&format!("ironconnect_rate_limited_total {}\n", s.rate_limited));

    // 上游统计
    out.push_str("# HELP ironconnect_upstream_requests_total Upstream requests\n");
    out.push_str("# TYPE ironconnect_upstream_requests_total counter\n");
    out.push_str(&format!(
        "ironconnect_upstream_requests_total{{result=\"ok\"}} {}\n",
        s.upstream_ok
    ));
    out.push_str(&format!(
        "ironconnect_upstream_requests_total{{result=\"err\"}} {}\n",
        s.upstream_err
    ));

    out.push_str("# HELP ironconnect_upstream_latency_ms_sum Sum of upstream latency in ms\n");
    out.push_str("# TYPE ironconnect_upstream_latency_ms_sum counter\n");
    out.push_str(&format!(
        "ironconnect_upstream_latency_ms_sum {}\n",
        s.upstream_latency_sum_ms
    ));

    out.push_str(
        "# HELP ironconnect_upstream_latency_ms_bucket Upstream latency histogram buckets\n",
    );
    out.push_str("# TYPE ironconnect_upstream_latency_ms_bucket histogram\n");
    let mut cumulative = 0;
    for (i, bound) in LATENCY_BOUNDS_MS.iter().enumerate() {
        cumulative += s.upstream_hist_buckets[i];
        out.push_str(&format!(
            "ironconnect_upstream_latency_ms_bucket{{le=\"{}\"}} {}\n",
            bound, cumulative
        ));
    }
    // +Inf 桶
    out.push_str(&format!(
        "ironconnect_upstream_latency_ms_bucket{{le=\"+Inf\"}} {}\n",
        s.upstream_hist_buckets.iter().sum::<u64>()
    ));

    out
}
