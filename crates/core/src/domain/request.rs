use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Messaging surface a request originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Google,
    Facebook,
    Slack,
    SlackTestbot,
    Spark,
}

impl Channel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "google" => Some(Self::Google),
            "facebook" => Some(Self::Facebook),
            "slack" => Some(Self::Slack),
            "slack_testbot" => Some(Self::SlackTestbot),
            "spark" => Some(Self::Spark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Facebook => "facebook",
            Self::Slack => "slack",
            Self::SlackTestbot => "slack_testbot",
            Self::Spark => "spark",
        }
    }

    /// Channels that receive their reply out of band instead of in the
    /// webhook response body.
    pub fn delivers_directly(&self) -> bool {
        matches!(self, Self::Spark)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Parameters = Map<String, Value>;

/// Conversation contexts keyed by context name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConversationContext {
    contexts: HashMap<String, Parameters>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, parameters: Parameters) {
        self.contexts.insert(name.into(), parameters);
    }

    pub fn with(mut self, name: impl Into<String>, parameters: Parameters) -> Self {
        self.insert(name, parameters);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Parameters> {
        self.contexts.get(name)
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl FromIterator<(String, Parameters)> for ConversationContext {
    fn from_iter<I: IntoIterator<Item = (String, Parameters)>>(iter: I) -> Self {
        Self { contexts: iter.into_iter().collect() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionRequest {
    pub action: String,
    pub parameters: Parameters,
    pub contexts: ConversationContext,
    pub channel: Channel,
    pub raw_platform_request: Value,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>, channel: Channel) -> Self {
        Self {
            action: action.into(),
            parameters: Parameters::new(),
            contexts: ConversationContext::new(),
            channel,
            raw_platform_request: Value::Null,
        }
    }

    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn context(mut self, name: impl Into<String>, parameters: Parameters) -> Self {
        self.contexts.insert(name, parameters);
        self
    }

    pub fn raw_platform_request(mut self, raw: Value) -> Self {
        self.raw_platform_request = raw;
        self
    }
}
