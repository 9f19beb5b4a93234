use std::sync::Arc;

use skema_domain::ports::confirm::StaticConfirm;
use skema_infra::config::AppConfig;
use skema_infra::logging::init_tracing;
use skema_infra::push::ChannelPushTransport;
use skema_infra::state::EditorState;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config)?;

    // Headless shell: real UI surfaces embed EditorState and bring their
    // own hub transport and confirmation dialogs.
    let transport = Arc::new(ChannelPushTransport::new());
    let state = EditorState::new(config, transport, Arc::new(StaticConfirm(true)));
    let bridge_task = state.bridge.start();

    info!(api = %state.config.api_base_url, "editor core ready");
    let _ = tokio::signal::ctrl_c().await;
    info!("editor core shutdown");
    bridge_task.abort();

    Ok(())
}
