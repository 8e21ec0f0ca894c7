//! Configuration management for the Lost-and-Found client

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Built front-end bundle served with an `index.html` fallback
    #[serde(default)]
    pub static_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub proxy_prefixes: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub ttl_ms: u64,
    pub failure_ttl_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaginationConfig {
    pub item_page_size: u32,
    pub activity_page_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub refresh_delay_ms: u64,
    pub processing_release_ms: u64,
    pub submit_close_delay_ms: u64,
    pub overlay_debounce_ms: u64,
    pub analytics_poll_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables with prefix LOSTFOUND_, e.g. LOSTFOUND_SERVER_PORT
            .add_source(
                Environment::with_prefix("LOSTFOUND")
                    .separator("_")
                    .try_parsing(true),
            )
            .set_override_option("backend.base_url", env::var("BACKEND_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    pub fn failure_ttl(&self) -> Duration {
        Duration::from_millis(self.failure_ttl_ms)
    }
}

impl TimingConfig {
    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    pub fn processing_release(&self) -> Duration {
        Duration::from_millis(self.processing_release_ms)
    }

    pub fn submit_close_delay(&self) -> Duration {
        Duration::from_millis(self.submit_close_delay_ms)
    }

    pub fn overlay_debounce(&self) -> Duration {
        Duration::from_millis(self.overlay_debounce_ms)
    }

    pub fn analytics_poll(&self) -> Duration {
        Duration::from_secs(self.analytics_poll_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: None,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            // 5000 collides with AirPlay on macOS
            base_url: "http://localhost:5001".to_string(),
            proxy_prefixes: vec!["/api".to_string(), "/auth".to_string()],
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 5000,
            failure_ttl_ms: 2000,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            item_page_size: 12,
            activity_page_size: 50,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            refresh_delay_ms: 300,
            processing_release_ms: 100,
            submit_close_delay_ms: 1500,
            overlay_debounce_ms: 200,
            analytics_poll_secs: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
