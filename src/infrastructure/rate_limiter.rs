//! 固定窗口限流计数器（进程内）
//!
//! 每个键一个窗口：窗口内首个请求开启计时，窗口到期后计数归零

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;

use crate::config::RateLimitConfig;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u64,
}

/// 单次计数结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub count: u64,
    pub limit: u64,
    /// 距离窗口重置的剩余时间
    pub reset_after: Duration,
}

impl RateLimitDecision {
    pub fn allowed(&self) -> bool {
        self.count <= self.limit
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.count)
    }
}

/// 超过该键数后才清理过期窗口
const PRUNE_THRESHOLD: usize = 10_000;

struct WindowTable {
    windows: HashMap<String, Window>,
    last_pruned: Instant,
}

pub struct FixedWindowLimiter {
    window: Duration,
    max_requests: u64,
    table: RwLock<WindowTable>,
}

impl FixedWindowLimiter {
    pub fn new(window: Duration, max_requests: u64) -> Self {
        Self {
            window,
            max_requests,
            table: RwLock::new(WindowTable {
                windows: HashMap::new(),
                last_pruned: Instant::now(),
            }),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(Duration::from_secs(config.window_secs), config.max_requests)
    }

    pub fn enabled(&self) -> bool {
        self.max_requests > 0
    }

    /// 计数 +1 并返回当前窗口状态
    pub async fn hit(&self, key: &str) -> RateLimitDecision {
        self.hit_at(key, Instant::now()).await
    }

    async fn hit_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut table = self.table.write().await;

        // 表过大时清理过期窗口，每个窗口周期最多扫描一次
        if table.windows.len() > PRUNE_THRESHOLD
            && now.saturating_duration_since(table.last_pruned) >= self.window
        {
            let window = self.window;
            table
                .windows
                .retain(|_, w| now.saturating_duration_since(w.started) < window);
            table.last_pruned = now;
        }

        let entry = table.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.saturating_duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count += 1;

        RateLimitDecision {
            count: entry.count,
            limit: self.max_requests,
            reset_after: self
                .window
                .saturating_sub(now.saturating_duration_since(entry.started)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_reached_within_window() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(60), 2);
        assert!(limiter.hit("ip:1").await.allowed());
        let second = limiter.hit("ip:1").await;
        assert!(second.allowed());
        assert_eq!(second.remaining(), 0);
        assert!(!limiter.hit("ip:1").await.allowed());

        // 其他键互不影响
        assert!(limiter.hit("ip:2").await.allowed());
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(10), 1);
        let start = Instant::now();
        assert!(limiter.hit_at("k", start).await.allowed());
        assert!(!limiter.hit_at("k", start + Duration::from_secs(5)).await.allowed());

        let after = limiter.hit_at("k", start + Duration::from_secs(10)).await;
        assert!(after.allowed());
        assert_eq!(after.count, 1);
        assert_eq!(after.reset_after, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_expired_windows_pruned_once_per_window() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(10), 5);
        let start = Instant::now();
        for i in 0..=PRUNE_THRESHOLD {
            limiter.hit_at(&format!("k{}", i), start).await;
        }

        // 窗口内不清理
        limiter.hit_at("fresh-1", start + Duration::from_secs(2)).await;
        assert_eq!(limiter.table.read().await.windows.len(), PRUNE_THRESHOLD + 2);

        // 窗口过后一次性清理掉过期键
        limiter.hit_at("fresh-2", start + Duration::from_secs(11)).await;
        let table = limiter.table.read().await;
        assert_eq!(table.windows.len(), 2);
        assert!(table.windows.contains_key("fresh-1"));
    }

    #[test]
    fn test_zero_limit_disables() {
        let limiter = FixedWindowLimiter::from_config(&RateLimitConfig {
            window_secs: 900,
            max_requests: 0,
            trust_proxy: false,
        });
        assert!(!limiter.enabled());
    }
}
