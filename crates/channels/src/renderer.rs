use std::sync::Arc;

use netbot_core::{ActionRequest, ActionResult, Channel};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::markup::{emphasize, Emphasis};
use crate::payload::{
    BasicCard, CardImage, DeliveryAck, FacebookPayload, GooglePayload, InlineReply, PlatformData,
    RichItem, RichResponse, SlackAttachment, SlackPayload,
};
use crate::spark::{DeliveryError, MessageSender, SparkMessage};

/// How a channel receives its reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelAdapter {
    /// The shaped payload is the webhook response body.
    Inline,
    /// The reply is posted through the channel's own API and the webhook only
    /// acknowledges.
    Direct,
}

impl ChannelAdapter {
    pub fn for_channel(channel: Channel) -> Self {
        if channel.delivers_directly() {
            Self::Direct
        } else {
            Self::Inline
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WebhookReply {
    Inline(InlineReply),
    Delivered(DeliveryAck),
}

pub struct ResponseRenderer {
    sender: Arc<dyn MessageSender>,
}

impl ResponseRenderer {
    pub fn new(sender: Arc<dyn MessageSender>) -> Self {
        Self { sender }
    }

    pub async fn render(
        &self,
        result: ActionResult,
        request: &ActionRequest,
    ) -> Result<WebhookReply, DeliveryError> {
        match ChannelAdapter::for_channel(request.channel) {
            ChannelAdapter::Inline => Ok(WebhookReply::Inline(inline_reply(result, request.channel))),
            ChannelAdapter::Direct => {
                let message = direct_message(&result, &request.raw_platform_request)?;
                self.sender.send(&message).await?;
                info!(
                    event_name = "delivery.direct.sent",
                    channel = %request.channel,
                    room_id = %message.room_id,
                    "reply delivered out of band"
                );
                Ok(WebhookReply::Delivered(DeliveryAck::delivered(result.context_out)))
            }
        }
    }
}

pub fn inline_reply(result: ActionResult, channel: Channel) -> InlineReply {
    let display = non_empty(&result.display_text);
    let mut items = vec![RichItem::SimpleResponse { text_to_speech: result.spoken_text.clone() }];
    items.push(RichItem::BasicCard(BasicCard {
        formatted_text: display.map(|text| emphasize(text, Emphasis::Double)),
        image: result.image_url.clone().map(CardImage::chart),
    }));

    let single = display.map(|text| emphasize(text, Emphasis::Single));
    let data = PlatformData {
        google: GooglePayload { rich_response: RichResponse { items } },
        facebook: FacebookPayload { text: single.clone() },
        slack: SlackPayload {
            text: single.clone(),
            attachments: result
                .image_url
                .iter()
                .map(|url| SlackAttachment { text: String::new(), image_url: url.clone() })
                .collect(),
        },
    };

    InlineReply {
        speech: result.spoken_text,
        display_text: single.unwrap_or_default(),
        channel: channel.as_str().to_owned(),
        source: channel.as_str().to_owned(),
        data,
        context_out: result.context_out,
    }
}

/// Room id comes from the front-end's copy of the original platform event,
/// at `data.data.roomId`.
pub fn direct_message(result: &ActionResult, raw_platform_request: &Value) -> Result<SparkMessage, DeliveryError> {
    let room_id = raw_platform_request
        .pointer("/data/data/roomId")
        .and_then(Value::as_str)
        .filter(|room| !room.is_empty())
        .ok_or(DeliveryError::MissingRoom)?;

    Ok(SparkMessage {
        room_id: room_id.to_owned(),
        markdown: non_empty(&result.display_text).map(|text| emphasize(text, Emphasis::Double)),
        files: result.image_url.iter().cloned().collect(),
    })
}

fn non_empty(text: &str) -> Option<&str> {
    (!text.is_empty()).then_some(text)
}
