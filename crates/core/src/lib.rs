pub mod actions;
pub mod chart;
pub mod config;
pub mod directory;
pub mod domain;
pub mod errors;
pub mod fixtures;
pub mod format;
pub mod fuzzy;
pub mod gateway;
pub mod params;
pub mod window;
pub mod workflow;

pub use actions::{ActionHandler, ActionRegistry, ActionServices};
pub use chart::{ChartBuilder, ChartSlice};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, LookupMode};
pub use directory::{DirectoryError, DirectoryStats, EntityDirectory};
pub use domain::entity::{Network, NetworkId, Organization, OrganizationId};
pub use domain::request::{ActionRequest, Channel, ConversationContext, Parameters};
pub use domain::result::{ActionResult, ContextOut, BOLD_MARKER};
pub use errors::{ActionError, ApplicationError, GatewayError, InterfaceError, ResolveError, UserInputError};
pub use fuzzy::FuzzyMatcher;
pub use gateway::{DashboardGateway, HostResolver, Timespan};
