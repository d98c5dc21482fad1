//! Records returned by (or sent to) the management API.
//!
//! Only the fields the actions read are modelled; everything else in the
//! API responses is ignored on deserialization.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: String,
    pub serial: String,
}

impl Device {
    /// Name when the device has one, otherwise its hardware model.
    pub fn label(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => &self.model,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficEntry {
    pub application: String,
    #[serde(default)]
    pub destination: Option<String>,
    pub active_time: f64,
    #[serde(default)]
    pub num_clients: u64,
}

impl TrafficEntry {
    /// `application@destination`, or the bare application when no destination
    /// was recorded.
    pub fn label(&self) -> String {
        match self.destination.as_deref().filter(|destination| !destination.is_empty()) {
            Some(destination) => format!("{}@{destination}", self.application),
            None => self.application.clone(),
        }
    }

    pub fn spoken_label(&self) -> String {
        match self.destination.as_deref().filter(|destination| !destination.is_empty()) {
            Some(destination) => format!("{} from {destination}", self.application),
            None => self.application.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientUsage {
    pub sent: f64,
    pub recv: f64,
}

impl ClientUsage {
    pub fn total(&self) -> f64 {
        self.sent + self.recv
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub usage: ClientUsage,
}

impl Client {
    pub fn label(&self) -> &str {
        let present = |label: &&str| !label.trim().is_empty();
        self.description
            .as_deref()
            .filter(present)
            .or_else(|| self.mac.as_deref().filter(present))
            .unwrap_or("unknown client")
    }
}

/// A wireless network (SSID slot) configured on a network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirelessNetwork {
    pub number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRule {
    pub comment: String,
    pub policy: String,
    pub protocol: String,
    pub dest_port: String,
    pub dest_cidr: String,
}

impl FirewallRule {
    /// Deny every protocol and port towards a single resolved host.
    pub fn deny_host(hostname: &str, address: Ipv4Addr) -> Self {
        Self {
            comment: format!("Rule for blocking {hostname}"),
            policy: "deny".to_owned(),
            protocol: "any".to_owned(),
            dest_port: "Any".to_owned(),
            dest_cidr: format!("{address}/32"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRuleSet {
    pub rules: Vec<FirewallRule>,
}
