//! Reply bodies returned to the conversation front-end.

use netbot_core::ContextOut;
use serde::Serialize;

pub const CHART_ACCESSIBILITY_TEXT: &str = "random chart";

/// Multi-channel reply returned directly as the webhook response.
///
/// `speech` and `displayText` are what text-only consoles show; the `data`
/// block carries the rich variant for each integration. `channel` names the
/// integration the request came from and `source` repeats it for front-ends
/// that read the older field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InlineReply {
    pub speech: String,
    #[serde(rename = "displayText")]
    pub display_text: String,
    pub channel: String,
    pub source: String,
    pub data: PlatformData,
    #[serde(rename = "contextOut", skip_serializing_if = "Vec::is_empty")]
    pub context_out: Vec<ContextOut>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PlatformData {
    pub google: GooglePayload,
    pub facebook: FacebookPayload,
    pub slack: SlackPayload,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GooglePayload {
    #[serde(rename = "richResponse")]
    pub rich_response: RichResponse,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RichResponse {
    pub items: Vec<RichItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum RichItem {
    #[serde(rename = "simpleResponse")]
    SimpleResponse {
        #[serde(rename = "textToSpeech")]
        text_to_speech: String,
    },
    #[serde(rename = "basicCard")]
    BasicCard(BasicCard),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BasicCard {
    #[serde(rename = "formattedText", skip_serializing_if = "Option::is_none")]
    pub formatted_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<CardImage>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardImage {
    pub url: String,
    #[serde(rename = "accessibilityText")]
    pub accessibility_text: String,
}

impl CardImage {
    pub fn chart(url: impl Into<String>) -> Self {
        Self { url: url.into(), accessibility_text: CHART_ACCESSIBILITY_TEXT.to_owned() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FacebookPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SlackPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<SlackAttachment>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SlackAttachment {
    pub text: String,
    pub image_url: String,
}

/// Body returned after the reply was delivered out of band.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeliveryAck {
    pub success: bool,
    pub speech: String,
    #[serde(rename = "contextOut", skip_serializing_if = "Vec::is_empty")]
    pub context_out: Vec<ContextOut>,
}

impl DeliveryAck {
    pub fn delivered(context_out: Vec<ContextOut>) -> Self {
        Self { success: true, speech: String::new(), context_out }
    }
}
