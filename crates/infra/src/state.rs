use std::sync::Arc;
use std::time::Duration;

use skema_domain::commands::{EntityCommands, Notifier, PendingRegistry};
use skema_domain::enum_value::EnumValue;
use skema_domain::export::ExportService;
use skema_domain::field::Field;
use skema_domain::message::Message;
use skema_domain::ports::confirm::ConfirmGate;
use skema_domain::ports::gateway::{EntityGateway, ExportGateway};
use skema_domain::ports::push::PushTransport;
use skema_domain::project::Project;
use skema_domain::root::Root;
use skema_domain::store::StoreSet;

use crate::bridge::RealtimeBridge;
use crate::config::AppConfig;
use crate::gateway::RestGateway;

/// Composition root: the stores, per-kind dispatchers, export service,
/// notifier, and realtime bridge of one editor session. Created once at
/// application start and handed around by clone.
#[derive(Clone)]
pub struct EditorState {
    pub config: AppConfig,
    pub stores: StoreSet,
    pub projects: EntityCommands<Project>,
    pub roots: EntityCommands<Root>,
    pub messages: EntityCommands<Message>,
    pub fields: EntityCommands<Field>,
    pub enum_values: EntityCommands<EnumValue>,
    pub exports: ExportService,
    pub notifier: Notifier,
    pub pending: PendingRegistry,
    pub bridge: RealtimeBridge,
}

impl EditorState {
    /// Wires the REST gateways from config. The push transport and the
    /// delete-confirmation gate stay injected: both are owned by the
    /// embedding shell (hub adapter, dialog surface).
    pub fn new(
        config: AppConfig,
        transport: Arc<dyn PushTransport>,
        confirm: Arc<dyn ConfirmGate>,
    ) -> Self {
        let rest = RestGateway::from_config(&config);
        Self::with_gateways(
            config,
            Arc::new(rest.entity::<Project>()),
            Arc::new(rest.entity::<Root>()),
            Arc::new(rest.entity::<Message>()),
            Arc::new(rest.entity::<Field>()),
            Arc::new(rest.entity::<EnumValue>()),
            Arc::new(rest),
            transport,
            confirm,
        )
    }

    /// Full-injection constructor used by tests to substitute in-memory
    /// gateways.
    #[allow(clippy::too_many_arguments)]
    pub fn with_gateways(
        config: AppConfig,
        projects_gateway: Arc<dyn EntityGateway<Project>>,
        roots_gateway: Arc<dyn EntityGateway<Root>>,
        messages_gateway: Arc<dyn EntityGateway<Message>>,
        fields_gateway: Arc<dyn EntityGateway<Field>>,
        enum_values_gateway: Arc<dyn EntityGateway<EnumValue>>,
        export_gateway: Arc<dyn ExportGateway>,
        transport: Arc<dyn PushTransport>,
        confirm: Arc<dyn ConfirmGate>,
    ) -> Self {
        let stores = StoreSet::new();
        let notifier = Notifier::new(config.notification_capacity);
        let pending = PendingRegistry::new();
        let bridge = RealtimeBridge::new(
            transport,
            stores.clone(),
            Duration::from_millis(config.hub_reconnect_interval_ms.max(1)),
        );

        let projects = EntityCommands::new(
            projects_gateway,
            stores.projects.clone(),
            notifier.clone(),
            pending.clone(),
            confirm.clone(),
        );
        let roots = EntityCommands::new(
            roots_gateway,
            stores.roots.clone(),
            notifier.clone(),
            pending.clone(),
            confirm.clone(),
        );
        let messages = EntityCommands::new(
            messages_gateway,
            stores.messages.clone(),
            notifier.clone(),
            pending.clone(),
            confirm.clone(),
        );
        let fields = EntityCommands::new(
            fields_gateway,
            stores.fields.clone(),
            notifier.clone(),
            pending.clone(),
            confirm.clone(),
        );
        let enum_values = EntityCommands::new(
            enum_values_gateway,
            stores.enum_values.clone(),
            notifier.clone(),
            pending.clone(),
            confirm,
        );
        let exports = ExportService::new(export_gateway, notifier.clone(), pending.clone());

        Self {
            config,
            stores,
            projects,
            roots,
            messages,
            fields,
            enum_values,
            exports,
            notifier,
            pending,
            bridge,
        }
    }
}
