//! Structured logging setup

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Initialize the global JSON tracing subscriber
///
/// `service.log_level` is used as an `EnvFilter` directive, so values like
/// `info,sqlx=warn` work. An invalid directive falls back to `info`.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = build_filter(&config.service.log_level);

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| {
            crate::error::Error::Internal(format!("Failed to install tracing subscriber: {}", e))
        })?;

    tracing::info!(
        service = %config.service.name,
        environment = %config.service.environment,
        "Tracing initialized"
    );

    Ok(())
}

fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_invalid_directive_falls_back() {
        let filter = build_filter("catalog=notalevel");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_directive_is_kept() {
        let filter = build_filter("debug,sqlx=warn");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
