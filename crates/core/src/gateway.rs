use std::net::Ipv4Addr;

use async_trait::async_trait;

use crate::domain::dashboard::{Admin, Client, Device, FirewallRuleSet, TrafficEntry, WirelessNetwork};
use crate::domain::entity::{Network, NetworkId, Organization, OrganizationId};
use crate::errors::{GatewayError, ResolveError};

/// Window over which usage and traffic statistics are aggregated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timespan {
    pub seconds: u64,
}

/// Operations the actions consume from the network-management platform.
///
/// Implementations never retry; a failed call surfaces as a `GatewayError`.
#[async_trait]
pub trait DashboardGateway: Send + Sync {
    async fn list_organizations(&self) -> Result<Vec<Organization>, GatewayError>;

    async fn list_networks(&self, organization: &OrganizationId) -> Result<Vec<Network>, GatewayError>;

    async fn list_devices(&self, network: &NetworkId) -> Result<Vec<Device>, GatewayError>;

    async fn list_admins(&self, organization: &OrganizationId) -> Result<Vec<Admin>, GatewayError>;

    async fn traffic(
        &self,
        network: &NetworkId,
        timespan: Timespan,
    ) -> Result<Vec<TrafficEntry>, GatewayError>;

    async fn list_clients(&self, serial: &str, timespan: Timespan) -> Result<Vec<Client>, GatewayError>;

    async fn list_wireless_networks(
        &self,
        network: &NetworkId,
    ) -> Result<Vec<WirelessNetwork>, GatewayError>;

    async fn update_firewall_rules(
        &self,
        network: &NetworkId,
        wireless_number: u32,
        rules: &FirewallRuleSet,
    ) -> Result<(), GatewayError>;
}

/// Hostname to a single IPv4 address. Block rules are written as `/32`
/// networks, so hosts without an IPv4 answer fail to resolve.
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolve(&self, hostname: &str) -> Result<Ipv4Addr, ResolveError>;
}
