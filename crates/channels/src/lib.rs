//! Channel Rendering - turns action results into what each chat surface expects
//!
//! This crate provides the reply side of the webhook:
//! - **Markup** (`markup`) - bold placeholder to per-channel emphasis
//! - **Payloads** (`payload`) - inline multi-channel reply and delivery acknowledgement
//! - **Spark** (`spark`) - out-of-band message delivery for Webex Teams rooms
//! - **Renderer** (`renderer`) - picks the adapter for a channel and produces the reply
//!
//! # Architecture
//!
//! ```text
//! ActionResult → ResponseRenderer → Inline adapter → multi-channel payload (webhook body)
//!                       ↓
//!                 Direct adapter → MessageSender (Spark) → acknowledgement (webhook body)
//! ```
//!
//! # Key Types
//!
//! - `ResponseRenderer` - entry point used by the webhook route
//! - `WebhookReply` - the body returned to the conversation front-end
//! - `MessageSender` - trait for out-of-band delivery, implemented by `SparkClient`

pub mod markup;
pub mod payload;
pub mod renderer;
pub mod spark;

pub use renderer::{ChannelAdapter, ResponseRenderer, WebhookReply};
pub use spark::{DeliveryError, MessageSender, SparkClient, SparkMessage};
