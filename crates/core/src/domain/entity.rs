use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationId(#[serde(deserialize_with = "id_from_string_or_number")] pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkId(#[serde(deserialize_with = "id_from_string_or_number")] pub String);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
}

impl Organization {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: OrganizationId(id.into()), name: name.into() }
    }

    /// Key under which the directory files this organization's networks.
    pub fn directory_key(&self) -> &str {
        self.name.trim()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: NetworkId,
    pub name: String,
    #[serde(default, skip_deserializing)]
    pub organization_name: String,
}

impl Network {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        organization_name: impl Into<String>,
    ) -> Self {
        Self { id: NetworkId(id.into()), name: name.into(), organization_name: organization_name.into() }
    }
}

/// The management API has returned organization ids both as JSON strings and
/// as bare integers depending on API version.
pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
