use config::Config;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    core: Core,
    backend: Backend,
}

impl AppConfig {
    pub fn load() -> Self {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::default())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }
}

#[derive(Debug, Deserialize)]
pub struct Core {
    store_buffer_size: usize,
}

impl Core {
    pub fn store_buffer_size(&self) -> usize {
        self.store_buffer_size
    }
}

#[derive(Debug, Deserialize)]
pub struct Backend {
    url: String,
    events_url: String,
    username: String,
    password: String,
    retry_ms: u64,
    retry_max_delay_ms: u64,
    stale_connection_timeout_ms: u64,
    request_timeout_ms: u64,
}

impl Backend {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn events_url(&self) -> &str {
        &self.events_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn retry_ms(&self) -> u64 {
        self.retry_ms
    }

    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }

    pub fn stale_connection_timeout(&self) -> Duration {
        Duration::from_millis(self.stale_connection_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                core: Core { store_buffer_size: 16 },
                backend: Backend {
                    url: "https://backend.url".to_string(),
                    events_url: "wss://backend.url/api/events".to_string(),
                    username: "demo".to_string(),
                    password: "demo".to_string(),
                    retry_ms: 100,
                    retry_max_delay_ms: 200,
                    stale_connection_timeout_ms: 30_000,
                    request_timeout_ms: 1_000,
                },
            },
        }
    }

    pub fn backend_url(mut self, url: String) -> Self {
        self.config.backend.url = url;
        self
    }

    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.backend.request_timeout_ms = ms;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
