//! Remote collaborators backing the action handlers.
//!
//! - [`DashboardClient`]: the management REST API over HTTPS, authenticated
//!   with an API key header
//! - [`SystemResolver`]: hostname lookups through the system resolver

mod client;
mod resolver;

pub use client::{DashboardClient, API_KEY_HEADER};
pub use resolver::SystemResolver;
