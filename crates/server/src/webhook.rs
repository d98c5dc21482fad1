//! Fulfillment webhook: `POST /chatbot`.
//!
//! The conversation front-end posts the classified intent, its parameters,
//! the active contexts and its copy of the original platform event. The
//! matching action runs and its result is either returned in the response
//! body or delivered through the channel's own API.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use netbot_channels::{ResponseRenderer, WebhookReply};
use netbot_core::{
    ActionRegistry, ActionRequest, ActionServices, ApplicationError, Channel, InterfaceError,
    Parameters,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

#[derive(Clone)]
pub struct WebhookState {
    services: ActionServices,
    registry: Arc<ActionRegistry>,
    renderer: Arc<ResponseRenderer>,
    allowed: Arc<[Channel]>,
}

impl WebhookState {
    pub fn new(
        services: ActionServices,
        registry: ActionRegistry,
        renderer: ResponseRenderer,
        allowed_channels: &[String],
    ) -> Self {
        let allowed = allowed_channels.iter().filter_map(|name| Channel::parse(name)).collect();
        Self { services, registry: Arc::new(registry), renderer: Arc::new(renderer), allowed }
    }

    fn action_request(&self, payload: FulfillmentRequest) -> Result<ActionRequest, ApplicationError> {
        let raw = payload.original_request.unwrap_or(Value::Null);
        let source = raw.get("source").and_then(Value::as_str).map(str::trim).unwrap_or_default();
        if source.is_empty() {
            return Err(ApplicationError::MalformedRequest(
                "originalRequest.source is required".to_owned(),
            ));
        }

        let channel = Channel::parse(source)
            .filter(|channel| self.allowed.contains(channel))
            .ok_or_else(|| ApplicationError::UnsupportedChannel(source.to_owned()))?;

        Ok(ActionRequest {
            action: payload.result.action,
            parameters: payload.result.parameters,
            contexts: payload
                .result
                .contexts
                .into_iter()
                .map(|context| (context.name, context.parameters))
                .collect(),
            channel,
            raw_platform_request: raw,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct FulfillmentRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub result: FulfillmentResult,
    #[serde(rename = "originalRequest", default)]
    pub original_request: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct FulfillmentResult {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub contexts: Vec<IncomingContext>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingContext {
    pub name: String,
    #[serde(default)]
    pub parameters: Parameters,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub correlation_id: String,
}

pub fn router(state: WebhookState) -> Router {
    Router::new().route("/chatbot", post(chatbot)).with_state(state)
}

pub async fn chatbot(
    State(state): State<WebhookState>,
    payload: Result<Json<FulfillmentRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            let error = ApplicationError::MalformedRequest(rejection.body_text());
            return error_response(error.into_interface(Uuid::new_v4().to_string()));
        }
    };

    let correlation_id = payload
        .id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let span = info_span!("webhook", correlation_id = %correlation_id);

    match fulfil(&state, payload).instrument(span).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(error) => error_response(error.into_interface(correlation_id)),
    }
}

async fn fulfil(state: &WebhookState, payload: FulfillmentRequest) -> Result<WebhookReply, ApplicationError> {
    let request = state.action_request(payload)?;
    info!(
        event_name = "ingress.webhook.received",
        action = %request.action,
        channel = %request.channel,
        "fulfillment request received"
    );

    let result = state.registry.dispatch(&request, &state.services).await?;
    let reply = state
        .renderer
        .render(result, &request)
        .await
        .map_err(|error| ApplicationError::Delivery(error.to_string()))?;

    info!(
        event_name = "ingress.webhook.replied",
        action = %request.action,
        channel = %request.channel,
        "fulfillment reply sent"
    );
    Ok(reply)
}

fn error_response(error: InterfaceError) -> Response {
    let correlation_id = error.correlation_id().to_owned();
    let (status, detail) = match &error {
        InterfaceError::BadRequest { message, .. } => {
            warn!(
                event_name = "ingress.webhook.rejected",
                correlation_id = %correlation_id,
                reason = %message,
                "fulfillment request rejected"
            );
            (StatusCode::BAD_REQUEST, Some(message.clone()))
        }
        InterfaceError::Internal { message, .. } => {
            error!(
                event_name = "ingress.webhook.failed",
                correlation_id = %correlation_id,
                error = %message,
                "fulfillment request failed"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, None)
        }
    };

    (status, Json(ErrorBody { error: error.user_message(), detail, correlation_id })).into_response()
}
