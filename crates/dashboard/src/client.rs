use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use netbot_core::config::DashboardConfig;
use netbot_core::domain::dashboard::{
    Admin, Client as NetworkClient, Device, FirewallRuleSet, TrafficEntry, WirelessNetwork,
};
use netbot_core::{DashboardGateway, GatewayError, Network, NetworkId, Organization, OrganizationId, Timespan};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

pub const API_KEY_HEADER: &str = "X-Cisco-Meraki-API-Key";

/// Error bodies are echoed into `GatewayError::Status` up to this length.
const MAX_ERROR_BODY: usize = 256;

#[derive(Clone)]
pub struct DashboardClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
}

impl fmt::Debug for DashboardClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl DashboardClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("netbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| GatewayError::Transport(format!("building http client: {error}")))?;
        Ok(Self { http, base_url: base_url.into().trim_end_matches('/').to_owned(), api_key })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, GatewayError> {
        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, GatewayError> {
        debug!(event_name = "gateway.request", method = "GET", path, "calling management api");
        let mut request =
            self.http.get(self.url(path)).header(API_KEY_HEADER, self.api_key.expose_secret());
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await.map_err(transport_error)?;
        let response = ensure_success(response).await?;
        response.json().await.map_err(|error| GatewayError::Decode(error.to_string()))
    }

    async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), GatewayError> {
        debug!(event_name = "gateway.request", method = "PUT", path, "calling management api");
        let response = self
            .http
            .put(self.url(path))
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await?;
        Ok(())
    }
}

fn transport_error(error: reqwest::Error) -> GatewayError {
    GatewayError::Transport(error.to_string())
}

async fn ensure_success(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let mut message = response.text().await.unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        message.truncate(end);
    }
    Err(GatewayError::Status { status: status.as_u16(), message })
}

#[async_trait]
impl DashboardGateway for DashboardClient {
    async fn list_organizations(&self) -> Result<Vec<Organization>, GatewayError> {
        self.get("organizations", &[]).await
    }

    async fn list_networks(&self, organization: &OrganizationId) -> Result<Vec<Network>, GatewayError> {
        self.get(&format!("organizations/{}/networks", organization.0), &[]).await
    }

    async fn list_devices(&self, network: &NetworkId) -> Result<Vec<Device>, GatewayError> {
        self.get(&format!("networks/{}/devices", network.0), &[]).await
    }

    async fn list_admins(&self, organization: &OrganizationId) -> Result<Vec<Admin>, GatewayError> {
        self.get(&format!("organizations/{}/admins", organization.0), &[]).await
    }

    async fn traffic(
        &self,
        network: &NetworkId,
        timespan: Timespan,
    ) -> Result<Vec<TrafficEntry>, GatewayError> {
        self.get(&format!("networks/{}/traffic", network.0), &[("timespan", timespan.seconds.to_string())])
            .await
    }

    async fn list_clients(&self, serial: &str, timespan: Timespan) -> Result<Vec<NetworkClient>, GatewayError> {
        self.get(&format!("devices/{serial}/clients"), &[("timespan", timespan.seconds.to_string())]).await
    }

    async fn list_wireless_networks(
        &self,
        network: &NetworkId,
    ) -> Result<Vec<WirelessNetwork>, GatewayError> {
        self.get(&format!("networks/{}/ssids", network.0), &[]).await
    }

    async fn update_firewall_rules(
        &self,
        network: &NetworkId,
        wireless_number: u32,
        rules: &FirewallRuleSet,
    ) -> Result<(), GatewayError> {
        self.put(&format!("networks/{}/ssids/{wireless_number}/l3FirewallRules", network.0), rules).await
    }
}
