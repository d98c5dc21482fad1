use async_trait::async_trait;
use tracing::{info, warn};

use super::{ActionHandler, ActionServices};
use crate::domain::dashboard::{FirewallRule, FirewallRuleSet};
use crate::domain::request::ActionRequest;
use crate::domain::result::{ActionResult, ContextOut};
use crate::errors::{ActionError, UserInputError};
use crate::params::{self, Slot};
use crate::workflow::{run_batch, summarize};

pub struct BlockSite;

#[async_trait]
impl ActionHandler for BlockSite {
    fn intent(&self) -> &'static str {
        "blockSite"
    }

    /// Resolves every requested host independently, then applies one deny
    /// rule per resolved host to each enabled wireless network.
    ///
    /// Hosts that fail to resolve are reported, not fatal. Firewall updates
    /// already applied stay applied if a later one fails.
    async fn handle(
        &self,
        request: &ActionRequest,
        services: &ActionServices,
    ) -> Result<ActionResult, ActionError> {
        let network = services.network(request)?;
        let hosts = params::resolve_list(request, Slot::Urls);
        if hosts.is_empty() {
            return Err(UserInputError::NoSitesRequested.into());
        }
        let name = network.name.trim();

        let lookups =
            run_batch(&hosts, services.lookups, |host| services.resolver.resolve(host)).await;
        for (host, error) in &lookups.failed {
            warn!(
                event_name = "action.block_site.lookup_failed",
                action = self.intent(),
                host = %host,
                error = %error,
                "hostname did not resolve"
            );
        }

        let rules = FirewallRuleSet {
            rules: lookups
                .succeeded
                .iter()
                .map(|(host, address)| FirewallRule::deny_host(host, *address))
                .collect(),
        };

        let mut applied_to = Vec::new();
        if !rules.rules.is_empty() {
            let wireless = services.gateway.list_wireless_networks(&network.id).await?;
            for slot in wireless.iter().filter(|wireless| wireless.enabled) {
                services.gateway.update_firewall_rules(&network.id, slot.number, &rules).await?;
                applied_to.push(slot.number);
            }
        }

        info!(
            event_name = "action.block_site.completed",
            action = self.intent(),
            channel = %request.channel,
            network = %name,
            blocked = lookups.succeeded.len(),
            failed = lookups.failed.len(),
            wireless_networks = ?applied_to,
            "applied block rules"
        );
        let message = summarize(&lookups, "Successfully blocked", "Failed to block");
        Ok(ActionResult::notice(message).with_context(ContextOut::network(name)))
    }
}
