use serde::Serialize;
use serde_json::Value;

use super::request::Parameters;

/// Marks emphasised spans in `display_text`; each channel swaps it for its
/// own emphasis syntax.
pub const BOLD_MARKER: &str = "<bold>";

/// Turns a carried context stays alive on the front-end.
pub const CONTEXT_LIFESPAN: u32 = 5;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContextOut {
    pub name: String,
    pub lifespan: u32,
    pub parameters: Parameters,
}

impl ContextOut {
    pub fn new(name: impl Into<String>, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut parameters = Parameters::new();
        parameters.insert(key.into(), value.into());
        Self { name: name.into(), lifespan: CONTEXT_LIFESPAN, parameters }
    }

    pub fn organization(name: &str) -> Self {
        Self::new("organization", "org", name)
    }

    pub fn network(name: &str) -> Self {
        Self::new("network", "network", name)
    }
}

/// Channel-neutral outcome of an action.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ActionResult {
    pub spoken_text: String,
    pub display_text: String,
    pub image_url: Option<String>,
    pub context_out: Vec<ContextOut>,
}

impl ActionResult {
    pub fn new(display_text: impl Into<String>, spoken_text: impl Into<String>) -> Self {
        Self {
            spoken_text: spoken_text.into(),
            display_text: display_text.into(),
            image_url: None,
            context_out: Vec::new(),
        }
    }

    /// Same wording on every surface.
    pub fn notice(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(message.clone(), message)
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_context(mut self, context: ContextOut) -> Self {
        self.context_out.push(context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ActionResult, ContextOut, CONTEXT_LIFESPAN};

    #[test]
    fn network_context_carries_name_with_default_lifespan() {
        let context = ContextOut::network("Sandbox 3");

        assert_eq!(context.name, "network");
        assert_eq!(context.lifespan, CONTEXT_LIFESPAN);
        assert_eq!(context.parameters["network"], "Sandbox 3");
    }

    #[test]
    fn notice_uses_same_text_for_voice_and_display() {
        let result = ActionResult::notice("The specified network could not be found!");
        assert_eq!(result.spoken_text, result.display_text);
        assert!(result.image_url.is_none());
        assert!(result.context_out.is_empty());
    }
}
