//! Analytics bootstrap
//!
//! One-time, guarded initialization of the analytics client. The client is
//! only the initialized handle (project key plus the fixed host/defaults
//! configuration); event capture belongs to the analytics vendor and is
//! out of scope here. A failed or skipped bootstrap never blocks request
//! serving.

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::config::AppConfig;

const API_HOST: &str = "https://us.i.posthog.com";
const DEFAULTS_VERSION: &str = "2026-01-30";

/// Initialized analytics handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsClient {
    pub project_key: String,
    pub api_host: &'static str,
    pub defaults_version: &'static str,
}

static ANALYTICS: OnceCell<AnalyticsClient> = OnceCell::new();

/// Initialize analytics at most once per process.
///
/// Skipped in development mode and when no project key is configured.
/// Later calls return the handle from the first successful init.
pub fn init(config: &AppConfig) -> Option<&'static AnalyticsClient> {
    if config.dev_mode {
        info!("development mode, analytics disabled");
        return None;
    }

    let Some(key) = config.posthog_key.clone() else {
        warn!("POSTHOG_KEY not set, analytics disabled");
        return None;
    };

    Some(ANALYTICS.get_or_init(|| {
        info!("analytics initialized (host: {API_HOST}, defaults: {DEFAULTS_VERSION})");
        AnalyticsClient {
            project_key: key,
            api_host: API_HOST,
            defaults_version: DEFAULTS_VERSION,
        }
    }))
}

/// The process-wide handle, if the bootstrap has run
pub fn client() -> Option<&'static AnalyticsClient> {
    ANALYTICS.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn config(posthog_key: Option<&str>, dev_mode: bool) -> AppConfig {
        AppConfig::new(
            "https://api.example.com".to_string(),
            posthog_key.map(str::to_string),
            dev_mode,
        )
        .unwrap()
    }

    #[test]
    fn development_mode_skips_init() {
        assert!(init(&config(Some("phc_test"), true)).is_none());
    }

    #[test]
    fn missing_key_skips_init() {
        assert!(init(&config(None, false)).is_none());
    }

    #[test]
    fn init_runs_at_most_once() {
        let first = init(&config(Some("phc_first"), false)).unwrap();
        let second = init(&config(Some("phc_second"), false)).unwrap();

        // Same process-wide handle both times; the second key is ignored
        assert_eq!(first, second);
        assert_eq!(first.api_host, "https://us.i.posthog.com");
        assert_eq!(first.defaults_version, "2026-01-30");
        assert_eq!(client(), Some(first));
    }
}
