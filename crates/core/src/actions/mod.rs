//! Intent handlers and the flat registry that dispatches to them.
//!
//! Handlers resolve their slots, resolve entities against the directory,
//! validate, call the gateway and shape an [`ActionResult`]. Input problems
//! are raised as [`UserInputError`] and turned into conversational replies by
//! [`ActionRegistry::dispatch`]; gateway failures propagate unchanged.

mod block;
mod devices;
mod help;
mod organizations;
mod traffic;
mod usage;

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

pub use block::BlockSite;
pub use devices::ListDevices;
pub use help::Help;
pub use organizations::{ListAdmins, ListNetworks, ListOrganizations};
pub use traffic::TopTraffic;
pub use usage::DataUsage;

use crate::chart::ChartBuilder;
use crate::config::{AppConfig, LookupMode};
use crate::directory::EntityDirectory;
use crate::domain::entity::{Network, Organization};
use crate::domain::request::ActionRequest;
use crate::domain::result::ActionResult;
use crate::errors::{ActionError, UserInputError};
use crate::fuzzy::FuzzyMatcher;
use crate::gateway::{DashboardGateway, HostResolver};
use crate::params::{self, Slot};
use crate::window::TimeWindow;

/// Listings show at most this many entries before summarising the rest.
pub const LISTING_CAP: usize = 10;

pub const UNKNOWN_INTENT_REPLY: &str =
    "I can't help with that yet. Say \"help\" to hear what I can do.";

#[async_trait]
pub trait ActionHandler: Send + Sync {
    fn intent(&self) -> &'static str;

    async fn handle(
        &self,
        request: &ActionRequest,
        services: &ActionServices,
    ) -> Result<ActionResult, ActionError>;
}

/// Collaborators shared by every handler.
#[derive(Clone)]
pub struct ActionServices {
    pub directory: Arc<EntityDirectory>,
    pub gateway: Arc<dyn DashboardGateway>,
    pub resolver: Arc<dyn HostResolver>,
    pub matcher: FuzzyMatcher,
    pub charts: ChartBuilder,
    pub lookups: LookupMode,
}

impl ActionServices {
    pub fn new(
        directory: Arc<EntityDirectory>,
        gateway: Arc<dyn DashboardGateway>,
        resolver: Arc<dyn HostResolver>,
    ) -> Self {
        Self {
            directory,
            gateway,
            resolver,
            matcher: FuzzyMatcher::default(),
            charts: ChartBuilder::default(),
            lookups: LookupMode::default(),
        }
    }

    pub fn configured(mut self, config: &AppConfig) -> Self {
        self.matcher = FuzzyMatcher::from(&config.matching);
        self.charts = ChartBuilder::from(&config.charts);
        self.lookups = config.actions.dns_lookups;
        self
    }

    pub(crate) fn organization(&self, request: &ActionRequest) -> Result<&Organization, UserInputError> {
        let name = params::resolve(request, Slot::Organization).ok_or(UserInputError::OrganizationNotFound)?;
        self.matcher.find(self.directory.organizations(), &name).ok_or(UserInputError::OrganizationNotFound)
    }

    pub(crate) fn network(&self, request: &ActionRequest) -> Result<&Network, UserInputError> {
        let name = params::resolve(request, Slot::Network).ok_or(UserInputError::NetworkNotFound)?;
        self.matcher.find(self.directory.all_networks(), &name).ok_or(UserInputError::NetworkNotFound)
    }
}

pub(crate) fn time_window(request: &ActionRequest) -> Result<TimeWindow, UserInputError> {
    let amount = params::resolve(request, Slot::TimeAmount).unwrap_or_default();
    let unit = params::resolve(request, Slot::TimeType).unwrap_or_default();
    TimeWindow::parse(&amount, &unit).ok_or(UserInputError::UnknownTimePeriod)
}

/// `1. first\n2. second`
pub(crate) fn numbered<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| format!("{}. {item}", index + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<&'static str, Box<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// Registry with every built-in intent.
    pub fn with_default_handlers() -> Self {
        let mut registry = Self::default();
        registry.register(ListOrganizations);
        registry.register(ListNetworks);
        registry.register(ListDevices);
        registry.register(ListAdmins);
        registry.register(TopTraffic);
        registry.register(DataUsage);
        registry.register(BlockSite);
        registry.register(Help);
        registry
    }

    pub fn register<T>(&mut self, handler: T)
    where
        T: ActionHandler + 'static,
    {
        self.handlers.insert(handler.intent(), Box::new(handler));
    }

    pub fn intents(&self) -> Vec<&'static str> {
        let mut intents: Vec<_> = self.handlers.keys().copied().collect();
        intents.sort_unstable();
        intents
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs the handler registered for `request.action`.
    ///
    /// Unknown intents and user input errors come back as `Ok` replies; only
    /// remote failures are returned as errors.
    pub async fn dispatch(
        &self,
        request: &ActionRequest,
        services: &ActionServices,
    ) -> Result<ActionResult, ActionError> {
        let Some(handler) = self.handlers.get(request.action.as_str()) else {
            warn!(
                event_name = "action.unknown_intent",
                action = %request.action,
                channel = %request.channel,
                "no handler registered for intent"
            );
            return Ok(ActionResult::notice(UNKNOWN_INTENT_REPLY));
        };

        match handler.handle(request, services).await {
            Err(ActionError::Input(error)) => {
                warn!(
                    event_name = "action.input_rejected",
                    action = %request.action,
                    channel = %request.channel,
                    reason = ?error,
                    "replying with input guidance"
                );
                Ok(ActionResult::notice(error.to_string()))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use super::{numbered, ActionHandler, ActionRegistry, ActionServices, UNKNOWN_INTENT_REPLY};
    use crate::domain::request::{ActionRequest, Channel};
    use crate::domain::result::ActionResult;
    use crate::errors::{ActionError, GatewayError, UserInputError};
    use crate::fixtures::{sample_directory, InMemoryGateway, ScriptedResolver};

    struct Rejecting;

    #[async_trait]
    impl ActionHandler for Rejecting {
        fn intent(&self) -> &'static str {
            "rejecting"
        }

        async fn handle(
            &self,
            _request: &ActionRequest,
            _services: &ActionServices,
        ) -> Result<ActionResult, ActionError> {
            Err(UserInputError::NetworkNotFound.into())
        }
    }

    struct Broken;

    #[async_trait]
    impl ActionHandler for Broken {
        fn intent(&self) -> &'static str {
            "broken"
        }

        async fn handle(
            &self,
            _request: &ActionRequest,
            _services: &ActionServices,
        ) -> Result<ActionResult, ActionError> {
            Err(GatewayError::Status { status: 500, message: "boom".to_owned() }.into())
        }
    }

    fn services() -> ActionServices {
        ActionServices::new(
            Arc::new(sample_directory()),
            Arc::new(InMemoryGateway::default()),
            Arc::new(ScriptedResolver::default()),
        )
    }

    #[test]
    fn default_registry_covers_every_intent() {
        let registry = ActionRegistry::with_default_handlers();
        assert_eq!(
            registry.intents(),
            vec![
                "blockSite",
                "dataUsage",
                "helpMe",
                "listAdmins",
                "listDevices",
                "listNetworks",
                "listOrganizations",
                "topTraffic",
            ]
        );
    }

    #[tokio::test]
    async fn unknown_intent_gets_fallback_reply() {
        let registry = ActionRegistry::with_default_handlers();
        let request = ActionRequest::new("orderPizza", Channel::Slack);

        let result = registry.dispatch(&request, &services()).await.expect("fallback");

        assert_eq!(result.display_text, UNKNOWN_INTENT_REPLY);
        assert_eq!(result.spoken_text, UNKNOWN_INTENT_REPLY);
    }

    #[tokio::test]
    async fn input_errors_become_replies_and_gateway_errors_propagate() {
        let mut registry = ActionRegistry::default();
        registry.register(Rejecting);
        registry.register(Broken);

        let rejected = registry
            .dispatch(&ActionRequest::new("rejecting", Channel::Google), &services())
            .await
            .expect("reply");
        assert_eq!(rejected.display_text, "The specified network could not be found!");

        let broken = registry.dispatch(&ActionRequest::new("broken", Channel::Google), &services()).await;
        assert!(matches!(broken, Err(ActionError::Gateway(GatewayError::Status { status: 500, .. }))));
    }

    #[tokio::test]
    async fn fuzzy_resolution_uses_context_when_parameter_missing() {
        let services = services();
        let request = ActionRequest::new("listDevices", Channel::Slack)
            .context("network", json!({"network": "sandbx 3"}).as_object().cloned().unwrap_or_default());

        let network = services.network(&request).expect("resolved");
        assert_eq!(network.name, "Sandbox 3");
    }

    #[test]
    fn numbered_lists_start_at_one() {
        assert_eq!(numbered(["a", "b"]), "1. a\n2. b");
        assert_eq!(numbered(Vec::<String>::new()), "");
    }
}
