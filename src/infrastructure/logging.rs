//! 日志系统配置模块
//! 支持结构化日志（json）与文本日志

use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::config::LoggingConfig;

/// 过滤器：RUST_LOG 优先，否则使用配置的级别
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ironconnect={level},wallet_client={level},tower_http={level}",
            level = config.level
        ))
    })
}

/// 初始化日志系统
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = build_filter(config);

    if config.format == "json" {
        Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_timer(ChronoUtc::rfc_3339()))
            .try_init()?;
    } else {
        Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(true),
            )
            .try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_uses_configured_level() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
        };
        if std::env::var("RUST_LOG").is_err() {
            let filter = build_filter(&config).to_string();
            assert!(filter.contains("ironconnect=debug"));
        }
    }

    #[test]
    fn test_second_init_reports_error() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: "text".to_string(),
        };
        // 全局 subscriber 只能设置一次
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}
