use std::sync::Arc;

use skema_domain::ports::confirm::StaticConfirm;
use skema_infra::config::AppConfig;
use skema_infra::push::ChannelPushTransport;
use skema_infra::state::EditorState;

fn test_config() -> AppConfig {
    AppConfig {
        app_env: "test".to_string(),
        log_level: "debug".to_string(),
        api_base_url: "http://127.0.0.1:5000".to_string(),
        api_timeout_ms: 1_000,
        hub_reconnect_interval_ms: 10,
        notification_capacity: 8,
    }
}

#[tokio::test]
async fn editor_state_wires_one_shared_session() {
    let state = EditorState::new(
        test_config(),
        Arc::new(ChannelPushTransport::new()),
        Arc::new(StaticConfirm(true)),
    );

    assert!(state.stores.projects.is_empty().await);
    assert!(state.pending.is_idle().await);
    assert!(!state.config.is_production());

    // Dispatchers and bridge share the same stores instance.
    state
        .fields
        .store()
        .upsert(skema_domain::field::Field {
            id: "f-1".to_string(),
            name: "amount".to_string(),
            description: String::new(),
            field_type: skema_domain::field::FieldType::String,
            default_value: None,
            is_required: false,
            message_id: Some("m-1".to_string()),
            parent_field_id: None,
            created_date: None,
            last_modified_date: None,
        })
        .await;
    assert_eq!(state.stores.fields.len().await, 1);
}
