use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_env: String,
    pub log_level: String,
    pub api_base_url: String,
    pub api_timeout_ms: u64,
    pub hub_reconnect_interval_ms: u64,
    pub notification_capacity: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let cfg = config::Config::builder()
            .set_default("app_env", "development")?
            .set_default("log_level", "info")?
            .set_default("api_base_url", "http://127.0.0.1:5000")?
            .set_default("api_timeout_ms", 10000)?
            .set_default("hub_reconnect_interval_ms", 5000)?
            .set_default("notification_capacity", 64)?
            .add_source(config::Environment::default().separator("__"))
            .build()?;
        cfg.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}
