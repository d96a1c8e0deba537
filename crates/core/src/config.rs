use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub lookup: LookupConfig,
    pub overlay: OverlayConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Backend analyze endpoint.
    pub endpoint: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    /// Optional bearer token for the backend.
    pub api_key: Option<Secret<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LookupConfig {
    /// Cache entry time-to-live in seconds.
    pub ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OverlayConfig {
    /// Auto-dismiss interval for a shown overlay.
    pub auto_dismiss_secs: u64,
    /// Whether the overlay is gated on the dialer being foreground.
    pub foreground_gating: bool,
    /// Poll interval of the foreground-gating loop.
    pub poll_interval_ms: u64,
    /// Consecutive matching polls required before the overlay is shown.
    pub foreground_streak_threshold: u32,
    /// Package names recognized as dialer applications.
    pub dialer_packages: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    /// History file location. Without one, history lives in memory only.
    pub path: Option<String>,
    /// Maximum retained entries.
    pub max_entries: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("CALLERINSIGHT_ENV").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Map APP__CLIENT__ENDPOINT=... to app.client.endpoint
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig {
                endpoint: "https://callerinsight.example.com/api/analyze".into(),
                connect_timeout_ms: 15_000,
                read_timeout_ms: 40_000,
                api_key: None,
            },
            lookup: LookupConfig {
                ttl_secs: 7 * 24 * 60 * 60,
            },
            overlay: OverlayConfig {
                auto_dismiss_secs: 60,
                foreground_gating: false,
                poll_interval_ms: 350,
                foreground_streak_threshold: 3,
                dialer_packages: vec![
                    "com.android.dialer".into(),
                    "com.google.android.dialer".into(),
                    "com.android.incallui".into(),
                    "com.samsung.android.incallui".into(),
                ],
            },
            history: HistoryConfig {
                path: Some("history.json".into()),
                max_entries: 20,
            },
        }
    }
}
