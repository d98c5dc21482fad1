use async_trait::async_trait;
use tracing::info;

use super::{numbered, ActionHandler, ActionServices, LISTING_CAP};
use crate::domain::request::ActionRequest;
use crate::domain::result::{ActionResult, ContextOut, BOLD_MARKER};
use crate::errors::ActionError;

pub struct ListOrganizations;

#[async_trait]
impl ActionHandler for ListOrganizations {
    fn intent(&self) -> &'static str {
        "listOrganizations"
    }

    async fn handle(
        &self,
        request: &ActionRequest,
        services: &ActionServices,
    ) -> Result<ActionResult, ActionError> {
        let names: Vec<&str> =
            services.directory.organizations().iter().map(|organization| organization.name.as_str()).collect();

        let display = format!(
            "You are in the following {BOLD_MARKER}organizations{BOLD_MARKER}:\n{}",
            numbered(&names).trim()
        );
        let spoken = format!("You are in the following organizations: {}", names.join(", ").trim());

        info!(
            event_name = "action.list_organizations.completed",
            action = self.intent(),
            channel = %request.channel,
            organizations = names.len(),
            "listed organizations"
        );
        Ok(ActionResult::new(display, spoken))
    }
}

pub struct ListNetworks;

#[async_trait]
impl ActionHandler for ListNetworks {
    fn intent(&self) -> &'static str {
        "listNetworks"
    }

    async fn handle(
        &self,
        request: &ActionRequest,
        services: &ActionServices,
    ) -> Result<ActionResult, ActionError> {
        let organization = services.organization(request)?;
        let name = organization.directory_key();
        let networks: Vec<&str> =
            services.directory.networks_of(name).iter().map(|network| network.name.as_str()).collect();

        let display = format!(
            "Your organization, {BOLD_MARKER}{name}{BOLD_MARKER}, has the following networks:\n{}",
            numbered(&networks).trim()
        );
        let spoken =
            format!("Your organization, {name}, has the following networks: {}", networks.join(", ").trim());

        info!(
            event_name = "action.list_networks.completed",
            action = self.intent(),
            channel = %request.channel,
            organization = %name,
            networks = networks.len(),
            "listed networks"
        );
        Ok(ActionResult::new(display, spoken).with_context(ContextOut::organization(name)))
    }
}

pub struct ListAdmins;

#[async_trait]
impl ActionHandler for ListAdmins {
    fn intent(&self) -> &'static str {
        "listAdmins"
    }

    async fn handle(
        &self,
        request: &ActionRequest,
        services: &ActionServices,
    ) -> Result<ActionResult, ActionError> {
        let organization = services.organization(request)?;
        let name = organization.directory_key();
        let admins = services.gateway.list_admins(&organization.id).await?;

        let shown = &admins[..admins.len().min(LISTING_CAP)];
        let mut display = format!(
            "Your organization, {BOLD_MARKER}{name}{BOLD_MARKER}, has the following administrators:\n{}",
            numbered(shown.iter().map(|admin| format!("{} - {}", admin.name, admin.email))).trim()
        );
        let names: Vec<&str> = shown.iter().map(|admin| admin.name.as_str()).collect();
        let mut spoken =
            format!("Your organization, {name}, has the following administrators: {}", names.join(", ").trim());

        if admins.len() > LISTING_CAP {
            let remaining = admins.len() - LISTING_CAP;
            display.push_str(&format!("\n+ {remaining} other administrators."));
            spoken.push_str(&format!(" and {remaining} other administrators."));
        }

        info!(
            event_name = "action.list_admins.completed",
            action = self.intent(),
            channel = %request.channel,
            organization = %name,
            admins = admins.len(),
            "listed administrators"
        );
        Ok(ActionResult::new(display, spoken).with_context(ContextOut::organization(name)))
    }
}
