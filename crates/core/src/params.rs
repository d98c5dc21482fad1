//! Effective slot values for an action request.
//!
//! Precedence is fixed for every slot and every action: an explicit,
//! non-empty request parameter, then the same key inside the slot's carried
//! context, then the slot default. Text values are trimmed.

use serde_json::Value;

use crate::domain::request::ActionRequest;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Organization,
    Network,
    TimeAmount,
    TimeType,
    Urls,
}

impl Slot {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Organization => "org",
            Self::Network => "network",
            Self::TimeAmount => "time-amount",
            Self::TimeType => "time-type",
            Self::Urls => "urls",
        }
    }

    /// Name of the conversation context that carries this slot between turns.
    pub fn context_name(&self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Network | Self::TimeAmount | Self::TimeType | Self::Urls => "network",
        }
    }

    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            Self::TimeAmount => Some("1"),
            _ => None,
        }
    }
}

pub fn resolve(request: &ActionRequest, slot: Slot) -> Option<String> {
    let explicit = request.parameters.get(slot.key()).and_then(text_value);
    explicit
        .or_else(|| {
            request
                .contexts
                .get(slot.context_name())
                .and_then(|parameters| parameters.get(slot.key()))
                .and_then(text_value)
        })
        .or_else(|| slot.default_value().map(str::to_owned))
}

/// List-valued slot; a single string is treated as a one-element list.
pub fn resolve_list(request: &ActionRequest, slot: Slot) -> Vec<String> {
    let explicit = request.parameters.get(slot.key()).map(list_value).filter(|values| !values.is_empty());
    explicit
        .or_else(|| {
            request
                .contexts
                .get(slot.context_name())
                .and_then(|parameters| parameters.get(slot.key()))
                .map(list_value)
                .filter(|values| !values.is_empty())
        })
        .unwrap_or_default()
}

fn text_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_owned(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn list_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(text_value).collect(),
        other => text_value(other).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use super::{resolve, resolve_list, Slot};
    use crate::domain::request::{ActionRequest, Channel};

    fn context(entries: Value) -> Map<String, Value> {
        entries.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn explicit_parameter_wins_over_context_and_default() {
        let request = ActionRequest::new("topTraffic", Channel::Slack)
            .parameter("network", "  Sandbox 3 ")
            .parameter("time-amount", 3)
            .context("network", context(json!({"network": "Warehouse", "time-amount": "7"})));

        assert_eq!(resolve(&request, Slot::Network).as_deref(), Some("Sandbox 3"));
        assert_eq!(resolve(&request, Slot::TimeAmount).as_deref(), Some("3"));
    }

    #[test]
    fn empty_parameter_falls_back_to_context() {
        let request = ActionRequest::new("listNetworks", Channel::Google)
            .parameter("org", "   ")
            .context("organization", context(json!({"org": "Acme Corp"})));

        assert_eq!(resolve(&request, Slot::Organization).as_deref(), Some("Acme Corp"));
    }

    #[test]
    fn default_applies_only_when_parameter_and_context_are_absent() {
        let bare = ActionRequest::new("dataUsage", Channel::Google);
        assert_eq!(resolve(&bare, Slot::TimeAmount).as_deref(), Some("1"));
        assert_eq!(resolve(&bare, Slot::Network), None);
        assert_eq!(resolve(&bare, Slot::TimeType), None);

        let carried = ActionRequest::new("dataUsage", Channel::Google)
            .context("network", context(json!({"time-amount": 12, "time-type": "hour"})));
        assert_eq!(resolve(&carried, Slot::TimeAmount).as_deref(), Some("12"));
        assert_eq!(resolve(&carried, Slot::TimeType).as_deref(), Some("hour"));
    }

    #[test]
    fn context_for_another_slot_is_not_consulted() {
        let request = ActionRequest::new("listAdmins", Channel::Slack)
            .context("network", context(json!({"org": "Wrong Place"})));

        assert_eq!(resolve(&request, Slot::Organization), None);
    }

    #[test]
    fn url_list_accepts_arrays_and_single_strings() {
        let many = ActionRequest::new("blockSite", Channel::Slack)
            .parameter("urls", json!([" facebook.com ", "", "reddit.com"]));
        assert_eq!(resolve_list(&many, Slot::Urls), vec!["facebook.com", "reddit.com"]);

        let single = ActionRequest::new("blockSite", Channel::Slack).parameter("urls", "example.com");
        assert_eq!(resolve_list(&single, Slot::Urls), vec!["example.com"]);

        let none = ActionRequest::new("blockSite", Channel::Slack);
        assert!(resolve_list(&none, Slot::Urls).is_empty());
    }
}
