//! In-memory collaborators for tests across the workspace.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::directory::EntityDirectory;
use crate::domain::dashboard::{Admin, Client, Device, FirewallRuleSet, TrafficEntry, WirelessNetwork};
use crate::domain::entity::{Network, NetworkId, Organization, OrganizationId};
use crate::errors::{GatewayError, ResolveError};
use crate::gateway::{DashboardGateway, HostResolver, Timespan};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayCall {
    ListOrganizations,
    ListNetworks(String),
    ListDevices(String),
    ListAdmins(String),
    Traffic { network: String, seconds: u64 },
    ListClients { serial: String, seconds: u64 },
    ListWirelessNetworks(String),
    UpdateFirewallRules { network: String, wireless_number: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirewallUpdate {
    pub network: String,
    pub wireless_number: u32,
    pub rules: FirewallRuleSet,
}

/// Scripted management API. Every call is recorded; `failing_with` makes
/// every call fail with the same error.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    organizations: Vec<(Organization, Vec<Network>)>,
    devices: HashMap<String, Vec<Device>>,
    admins: HashMap<String, Vec<Admin>>,
    traffic: HashMap<String, Vec<TrafficEntry>>,
    clients: HashMap<String, Vec<Client>>,
    wireless: HashMap<String, Vec<WirelessNetwork>>,
    failure: Option<GatewayError>,
    calls: Mutex<Vec<GatewayCall>>,
    firewall_updates: Mutex<Vec<FirewallUpdate>>,
}

impl InMemoryGateway {
    pub fn with_organization(mut self, organization: Organization, networks: Vec<Network>) -> Self {
        self.organizations.push((organization, networks));
        self
    }

    pub fn with_devices(mut self, network_id: &str, devices: Vec<Device>) -> Self {
        self.devices.insert(network_id.to_owned(), devices);
        self
    }

    pub fn with_admins(mut self, organization_id: &str, admins: Vec<Admin>) -> Self {
        self.admins.insert(organization_id.to_owned(), admins);
        self
    }

    pub fn with_traffic(mut self, network_id: &str, entries: Vec<TrafficEntry>) -> Self {
        self.traffic.insert(network_id.to_owned(), entries);
        self
    }

    pub fn with_clients(mut self, serial: &str, clients: Vec<Client>) -> Self {
        self.clients.insert(serial.to_owned(), clients);
        self
    }

    pub fn with_wireless(mut self, network_id: &str, wireless: Vec<WirelessNetwork>) -> Self {
        self.wireless.insert(network_id.to_owned(), wireless);
        self
    }

    pub fn failing_with(mut self, error: GatewayError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn firewall_updates(&self) -> Vec<FirewallUpdate> {
        self.firewall_updates.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn record(&self, call: GatewayCall) -> Result<(), GatewayError> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DashboardGateway for InMemoryGateway {
    async fn list_organizations(&self) -> Result<Vec<Organization>, GatewayError> {
        self.record(GatewayCall::ListOrganizations)?;
        Ok(self.organizations.iter().map(|(organization, _)| organization.clone()).collect())
    }

    async fn list_networks(&self, organization: &OrganizationId) -> Result<Vec<Network>, GatewayError> {
        self.record(GatewayCall::ListNetworks(organization.0.clone()))?;
        Ok(self
            .organizations
            .iter()
            .find(|(candidate, _)| candidate.id == *organization)
            .map(|(_, networks)| networks.clone())
            .unwrap_or_default())
    }

    async fn list_devices(&self, network: &NetworkId) -> Result<Vec<Device>, GatewayError> {
        self.record(GatewayCall::ListDevices(network.0.clone()))?;
        Ok(self.devices.get(&network.0).cloned().unwrap_or_default())
    }

    async fn list_admins(&self, organization: &OrganizationId) -> Result<Vec<Admin>, GatewayError> {
        self.record(GatewayCall::ListAdmins(organization.0.clone()))?;
        Ok(self.admins.get(&organization.0).cloned().unwrap_or_default())
    }

    async fn traffic(
        &self,
        network: &NetworkId,
        timespan: Timespan,
    ) -> Result<Vec<TrafficEntry>, GatewayError> {
        self.record(GatewayCall::Traffic { network: network.0.clone(), seconds: timespan.seconds })?;
        Ok(self.traffic.get(&network.0).cloned().unwrap_or_default())
    }

    async fn list_clients(&self, serial: &str, timespan: Timespan) -> Result<Vec<Client>, GatewayError> {
        self.record(GatewayCall::ListClients { serial: serial.to_owned(), seconds: timespan.seconds })?;
        Ok(self.clients.get(serial).cloned().unwrap_or_default())
    }

    async fn list_wireless_networks(
        &self,
        network: &NetworkId,
    ) -> Result<Vec<WirelessNetwork>, GatewayError> {
        self.record(GatewayCall::ListWirelessNetworks(network.0.clone()))?;
        Ok(self.wireless.get(&network.0).cloned().unwrap_or_default())
    }

    async fn update_firewall_rules(
        &self,
        network: &NetworkId,
        wireless_number: u32,
        rules: &FirewallRuleSet,
    ) -> Result<(), GatewayError> {
        self.record(GatewayCall::UpdateFirewallRules { network: network.0.clone(), wireless_number })?;
        self.firewall_updates.lock().unwrap_or_else(PoisonError::into_inner).push(FirewallUpdate {
            network: network.0.clone(),
            wireless_number,
            rules: rules.clone(),
        });
        Ok(())
    }
}

/// Resolves only the hostnames it was given; everything else fails.
#[derive(Debug, Default)]
pub struct ScriptedResolver {
    addresses: HashMap<String, Ipv4Addr>,
    lookups: Mutex<Vec<String>>,
}

impl ScriptedResolver {
    pub fn with_host(mut self, hostname: &str, address: Ipv4Addr) -> Self {
        self.addresses.insert(hostname.to_owned(), address);
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl HostResolver for ScriptedResolver {
    async fn resolve(&self, hostname: &str) -> Result<Ipv4Addr, ResolveError> {
        self.lookups.lock().unwrap_or_else(PoisonError::into_inner).push(hostname.to_owned());
        self.addresses.get(hostname).copied().ok_or_else(|| ResolveError::NoAddress(hostname.to_owned()))
    }
}

/// Two organizations with two networks each.
///
/// | organization | id | networks |
/// |---|---|---|
/// | Acme Corp | `O1` | Headquarters (`N1`), Warehouse (`N2`) |
/// | Read Write Sandbox | `O2` | Sandbox 3 (`N3`), Branch Lab (`N4`) |
pub fn sample_directory() -> EntityDirectory {
    EntityDirectory::seeded(
        vec![Organization::new("O1", "Acme Corp"), Organization::new("O2", "Read Write Sandbox")],
        vec![
            (
                "Acme Corp".to_owned(),
                vec![
                    Network::new("N1", "Headquarters", "Acme Corp"),
                    Network::new("N2", "Warehouse", "Acme Corp"),
                ],
            ),
            (
                "Read Write Sandbox".to_owned(),
                vec![
                    Network::new("N3", "Sandbox 3", "Read Write Sandbox"),
                    Network::new("N4", "Branch Lab", "Read Write Sandbox"),
                ],
            ),
        ],
    )
}
