//! Uploader configuration.

use std::time::Duration;

use vclip_landing_client::ApiClientConfig;

/// Status poller timing.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Delay between status checks
    pub interval: Duration,
    /// Hard limit after which polling stops for good
    pub timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(600), // 10 minutes
        }
    }
}

/// Simulated processing progress timing.
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Time to go from 0% to 100%
    pub window: Duration,
    /// Update period
    pub tick: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(180), // 3 minutes
            tick: Duration::from_secs(1),
        }
    }
}

/// Widget behavior settings.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub poller: PollerConfig,
    pub progress: ProgressConfig,
    /// Upper bound on waiting for the lead webhook before starting processing
    pub lead_webhook_timeout: Duration,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            poller: PollerConfig::default(),
            progress: ProgressConfig::default(),
            lead_webhook_timeout: Duration::from_secs(10),
        }
    }
}

/// Complete uploader configuration.
#[derive(Debug, Clone, Default)]
pub struct LandingConfig {
    pub api: ApiClientConfig,
    pub widget: WidgetConfig,
}

impl LandingConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiClientConfig::from_env(),
            widget: WidgetConfig {
                poller: PollerConfig {
                    interval: env_secs("LANDING_POLL_INTERVAL_SECS", 2),
                    timeout: env_secs("LANDING_POLL_TIMEOUT_SECS", 600),
                },
                progress: ProgressConfig {
                    window: env_secs("LANDING_PROGRESS_WINDOW_SECS", 180),
                    tick: env_secs("LANDING_PROGRESS_TICK_SECS", 1),
                },
                lead_webhook_timeout: env_secs("LANDING_WEBHOOK_TIMEOUT_SECS", 10),
            },
        }
    }
}

/// Read a positive number of seconds, falling back on missing or zero values.
fn env_secs(key: &str, default: u64) -> Duration {
    let secs = std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(default);
    Duration::from_secs(secs)
}
