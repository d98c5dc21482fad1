//! Process-wide directory of organizations and their networks.
//!
//! The directory is filled exactly once by [`EntityDirectory::warm`] and is
//! read-only afterwards. Reads before warm-up see an empty directory, so every
//! name lookup resolves to "not found".

use std::sync::OnceLock;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::entity::{Network, Organization};
use crate::errors::GatewayError;
use crate::gateway::DashboardGateway;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("entity directory has already been warmed")]
    AlreadyWarmed,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectoryStats {
    pub organizations: usize,
    pub networks: usize,
}

#[derive(Debug, Default)]
struct Snapshot {
    organizations: Vec<Organization>,
    networks_by_organization: Vec<(String, Vec<Network>)>,
    all_networks: Vec<Network>,
}

impl Snapshot {
    fn new(organizations: Vec<Organization>, networks_by_organization: Vec<(String, Vec<Network>)>) -> Self {
        let all_networks = networks_by_organization
            .iter()
            .flat_map(|(_, networks)| networks.iter().cloned())
            .collect();
        Self { organizations, networks_by_organization, all_networks }
    }
}

#[derive(Debug, Default)]
pub struct EntityDirectory {
    snapshot: OnceLock<Snapshot>,
}

impl EntityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an already-warm directory from known data.
    pub fn seeded(
        organizations: Vec<Organization>,
        networks_by_organization: Vec<(String, Vec<Network>)>,
    ) -> Self {
        let directory = Self::new();
        let networks_by_organization = networks_by_organization
            .into_iter()
            .map(|(name, networks)| (name.trim().to_owned(), networks))
            .collect();
        let _ = directory.snapshot.set(Snapshot::new(organizations, networks_by_organization));
        directory
    }

    /// Fetches every organization (minus `excluded`) and each one's networks.
    ///
    /// Fails with [`DirectoryError::AlreadyWarmed`] on a second call; the
    /// directory is left untouched if any gateway call fails.
    pub async fn warm(
        &self,
        gateway: &dyn DashboardGateway,
        excluded: Option<&str>,
    ) -> Result<DirectoryStats, DirectoryError> {
        if self.is_warm() {
            return Err(DirectoryError::AlreadyWarmed);
        }

        let excluded = excluded.map(str::trim).filter(|name| !name.is_empty());
        let organizations: Vec<Organization> = gateway
            .list_organizations()
            .await?
            .into_iter()
            .filter(|organization| Some(organization.directory_key()) != excluded)
            .collect();

        let mut networks_by_organization = Vec::with_capacity(organizations.len());
        for organization in &organizations {
            let key = organization.directory_key().to_owned();
            let networks: Vec<Network> = gateway
                .list_networks(&organization.id)
                .await?
                .into_iter()
                .map(|network| Network { organization_name: key.clone(), ..network })
                .collect();
            debug!(
                event_name = "system.directory.organization_loaded",
                organization = %key,
                networks = networks.len(),
                "loaded organization networks"
            );
            networks_by_organization.push((key, networks));
        }

        let snapshot = Snapshot::new(organizations, networks_by_organization);
        let stats = DirectoryStats {
            organizations: snapshot.organizations.len(),
            networks: snapshot.all_networks.len(),
        };
        self.snapshot.set(snapshot).map_err(|_| DirectoryError::AlreadyWarmed)?;

        info!(
            event_name = "system.directory.warmed",
            correlation_id = "bootstrap",
            organizations = stats.organizations,
            networks = stats.networks,
            "entity directory warmed"
        );
        Ok(stats)
    }

    pub fn is_warm(&self) -> bool {
        self.snapshot.get().is_some()
    }

    pub fn stats(&self) -> DirectoryStats {
        DirectoryStats { organizations: self.organizations().len(), networks: self.all_networks().len() }
    }

    pub fn organizations(&self) -> &[Organization] {
        self.snapshot.get().map(|snapshot| snapshot.organizations.as_slice()).unwrap_or_default()
    }

    pub fn networks_of(&self, organization_name: &str) -> &[Network] {
        let key = organization_name.trim();
        self.snapshot
            .get()
            .and_then(|snapshot| {
                snapshot
                    .networks_by_organization
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, networks)| networks.as_slice())
            })
            .unwrap_or_default()
    }

    /// Every network, in organization order then per-organization order.
    pub fn all_networks(&self) -> &[Network] {
        self.snapshot.get().map(|snapshot| snapshot.all_networks.as_slice()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{DirectoryError, EntityDirectory};
    use crate::domain::entity::{Network, Organization};
    use crate::errors::GatewayError;
    use crate::fixtures::InMemoryGateway;

    fn gateway() -> InMemoryGateway {
        InMemoryGateway::default()
            .with_organization(Organization::new("1", "Acme Corp "), vec![
                Network::new("N1", "Headquarters", ""),
                Network::new("N2", "Warehouse", ""),
            ])
            .with_organization(Organization::new("2", "Internal Lab"), vec![Network::new("N3", "Bench", "")])
            .with_organization(Organization::new("3", "Globex"), vec![Network::new("N4", "Campus", "")])
    }

    #[tokio::test]
    async fn warm_excludes_sentinel_and_keys_networks_by_trimmed_name() {
        let directory = EntityDirectory::new();
        assert!(directory.organizations().is_empty());

        let stats = directory.warm(&gateway(), Some("Internal Lab")).await.expect("warm");

        assert_eq!(stats.organizations, 2);
        assert_eq!(stats.networks, 3);
        let names: Vec<_> = directory.organizations().iter().map(|org| org.name.as_str()).collect();
        assert_eq!(names, vec!["Acme Corp ", "Globex"]);
        assert_eq!(directory.networks_of("Acme Corp").len(), 2);
        assert_eq!(directory.networks_of(" Acme Corp ")[0].organization_name, "Acme Corp");
        assert!(directory.networks_of("Internal Lab").is_empty());
    }

    #[tokio::test]
    async fn all_networks_flattens_in_organization_order() {
        let directory = EntityDirectory::new();
        directory.warm(&gateway(), None).await.expect("warm");

        let names: Vec<_> = directory.all_networks().iter().map(|network| network.name.as_str()).collect();
        assert_eq!(names, vec!["Headquarters", "Warehouse", "Bench", "Campus"]);
    }

    #[tokio::test]
    async fn second_warm_is_rejected() {
        let directory = EntityDirectory::new();
        directory.warm(&gateway(), None).await.expect("first warm");

        let second = directory.warm(&gateway(), None).await;
        assert_eq!(second, Err(DirectoryError::AlreadyWarmed));
    }

    #[tokio::test]
    async fn gateway_failure_leaves_directory_cold() {
        let failing = gateway().failing_with(GatewayError::Transport("connection refused".to_owned()));
        let directory = EntityDirectory::new();

        let result = directory.warm(&failing, None).await;

        assert!(matches!(result, Err(DirectoryError::Gateway(_))));
        assert!(!directory.is_warm());
        assert!(directory.all_networks().is_empty());
    }
}
