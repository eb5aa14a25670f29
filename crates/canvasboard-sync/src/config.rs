use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable naming the shapes API base URL.
pub const API_BASE_ENV: &str = "SHAPES_API_BASE";

const DEFAULT_FALLBACK_DELAY_MS: u64 = 300;

/// Where shapes are synced to. No base URL means fallback mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub api_base: Option<String>,
    /// Simulated latency of the built-in fallback, in milliseconds.
    pub fallback_delay_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            fallback_delay_ms: DEFAULT_FALLBACK_DELAY_MS,
        }
    }
}

impl SyncConfig {
    pub fn with_api_base(api_base: &str) -> Self {
        Self {
            api_base: normalize_base(Some(api_base)),
            ..Default::default()
        }
    }

    /// Read `SHAPES_API_BASE`; unset or blank selects fallback mode.
    pub fn from_env() -> Self {
        let api_base = std::env::var(API_BASE_ENV).ok();
        Self {
            api_base: normalize_base(api_base.as_deref()),
            ..Default::default()
        }
    }

    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }

    pub fn is_fallback(&self) -> bool {
        self.api_base.is_none()
    }
}

fn normalize_base(raw: Option<&str>) -> Option<String> {
    raw.map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fallback() {
        let config = SyncConfig::default();
        assert!(config.is_fallback());
        assert_eq!(config.fallback_delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_base_is_normalized() {
        let config = SyncConfig::with_api_base(" http://localhost:4000/ ");
        assert_eq!(config.api_base.as_deref(), Some("http://localhost:4000"));
        assert!(SyncConfig::with_api_base("   ").is_fallback());
    }
}
