use std::sync::Arc;

use netbot_channels::{DeliveryError, MessageSender, ResponseRenderer, SparkClient};
use netbot_core::{
    config::AppConfig,
    ActionRegistry, ActionServices, DashboardGateway, DirectoryError, EntityDirectory,
    GatewayError, HostResolver,
};
use netbot_dashboard::{DashboardClient, SystemResolver};
use thiserror::Error;
use tracing::info;

use crate::webhook::WebhookState;

pub struct Application {
    pub config: AppConfig,
    pub directory: Arc<EntityDirectory>,
    pub webhook: WebhookState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("dashboard client could not be built: {0}")]
    Gateway(#[source] GatewayError),
    #[error("spark client could not be built: {0}")]
    Delivery(#[source] DeliveryError),
    #[error("entity directory warm-up failed: {0}")]
    Directory(#[source] DirectoryError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let gateway = DashboardClient::from_config(&config.dashboard).map_err(BootstrapError::Gateway)?;
    let sender = SparkClient::from_config(&config.spark).map_err(BootstrapError::Delivery)?;

    bootstrap_with(config, Arc::new(gateway), Arc::new(SystemResolver), Arc::new(sender)).await
}

/// Warms the entity directory, then wires handlers and renderer around it.
/// No webhook can be served before this returns.
pub async fn bootstrap_with(
    config: AppConfig,
    gateway: Arc<dyn DashboardGateway>,
    resolver: Arc<dyn HostResolver>,
    sender: Arc<dyn MessageSender>,
) -> Result<Application, BootstrapError> {
    let directory = Arc::new(EntityDirectory::new());
    let stats = directory
        .warm(gateway.as_ref(), config.directory.excluded_organization.as_deref())
        .await
        .map_err(BootstrapError::Directory)?;
    info!(
        event_name = "system.bootstrap.directory_warmed",
        correlation_id = "bootstrap",
        organizations = stats.organizations,
        networks = stats.networks,
        "entity directory ready"
    );

    let services = ActionServices::new(directory.clone(), gateway, resolver).configured(&config);
    let registry = ActionRegistry::with_default_handlers();
    info!(
        event_name = "system.bootstrap.handlers_registered",
        correlation_id = "bootstrap",
        intents = ?registry.intents(),
        "action handlers registered"
    );

    let webhook = WebhookState::new(
        services,
        registry,
        ResponseRenderer::new(sender),
        &config.channels.allowed,
    );

    Ok(Application { config, directory, webhook })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use netbot_channels::{DeliveryError, MessageSender, SparkMessage};
    use netbot_core::{
        config::AppConfig,
        domain::entity::{Network, Organization},
        fixtures::{GatewayCall, InMemoryGateway, ScriptedResolver},
        GatewayError,
    };

    use crate::bootstrap::{bootstrap_with, BootstrapError};

    struct NoopSender;

    #[async_trait]
    impl MessageSender for NoopSender {
        async fn send(&self, _message: &SparkMessage) -> Result<(), DeliveryError> {
            Ok(())
        }
    }

    fn gateway() -> InMemoryGateway {
        InMemoryGateway::default()
            .with_organization(
                Organization::new("O1", "Acme Corp"),
                vec![Network::new("N1", "Headquarters", "Acme Corp")],
            )
            .with_organization(
                Organization::new("O9", "Meraki Launchpad"),
                vec![Network::new("N9", "Launchpad Lab", "Meraki Launchpad")],
            )
    }

    #[tokio::test]
    async fn directory_is_warm_before_application_is_returned() {
        let mut config = AppConfig::default();
        config.directory.excluded_organization = Some("Meraki Launchpad".to_string());
        let gateway = Arc::new(gateway());

        let app = bootstrap_with(
            config,
            gateway.clone(),
            Arc::new(ScriptedResolver::default()),
            Arc::new(NoopSender),
        )
        .await
        .expect("bootstrap");

        assert!(app.directory.is_warm());
        assert_eq!(app.directory.stats().organizations, 1);
        assert_eq!(app.directory.stats().networks, 1);
        assert_eq!(
            gateway.calls(),
            vec![GatewayCall::ListOrganizations, GatewayCall::ListNetworks("O1".to_string())]
        );
    }

    #[tokio::test]
    async fn unreachable_dashboard_aborts_startup() {
        let gateway = Arc::new(
            gateway().failing_with(GatewayError::Transport("connection refused".to_string())),
        );

        let result = bootstrap_with(
            AppConfig::default(),
            gateway,
            Arc::new(ScriptedResolver::default()),
            Arc::new(NoopSender),
        )
        .await;

        assert!(matches!(result, Err(BootstrapError::Directory(_))));
    }
}
