use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::AppConfig;

/// Tracing setup for the embedding shell. The configured level applies to
/// the skema crates only; third-party internals (reqwest, the runtime)
/// stay at `warn` unless the level string carries its own directives.
pub fn init_tracing(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_new(directives(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new(directives("info")));

    if config.is_production() {
        fmt()
            .with_env_filter(filter)
            .json()
            .with_target(false)
            .init();
    } else {
        // Targets stay on in development: with one process hosting the
        // dispatcher and the bridge, the emitting module is the fastest
        // way to tell a command failure from a push-channel hiccup.
        fmt().with_env_filter(filter).compact().init();
    }

    Ok(())
}

fn directives(level: &str) -> String {
    if level.contains(['=', ',']) {
        // Already a full directive string; pass it through untouched.
        return level.to_string();
    }
    format!("warn,skema_domain={level},skema_infra={level},skema_app={level}")
}
