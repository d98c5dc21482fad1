use thiserror::Error;

/// Failure talking to the remote management API.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("management api request failed: {0}")]
    Transport(String),
    #[error("management api returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("management api response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("hostname `{0}` did not resolve to any address")]
    NoAddress(String),
    #[error("lookup for `{host}` failed: {message}")]
    Lookup { host: String, message: String },
}

/// Recoverable problems with what the user asked for. Each renders as an
/// ordinary conversational reply on every channel.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum UserInputError {
    #[error("The specified organization could not be found!")]
    OrganizationNotFound,
    #[error("The specified network could not be found!")]
    NetworkNotFound,
    #[error("Sorry, I didn't understand that time period. Try something like 3 hours or 2 days.")]
    UnknownTimePeriod,
    #[error("Sorry, but you can only get traffic data from 2 hours to 1 month.")]
    TrafficWindowOutOfRange,
    #[error("Which sites would you like me to block?")]
    NoSitesRequested,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error(transparent)]
    Input(#[from] UserInputError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("unsupported channel `{0}`")]
    UnsupportedChannel(String),
    #[error("malformed webhook payload: {0}")]
    MalformedRequest(String),
    #[error("message delivery failure: {0}")]
    Delivery(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Internal { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::UnsupportedChannel(channel) => Self::BadRequest {
                message: format!("source {channel} is not supported"),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::MalformedRequest(message) => {
                Self::BadRequest { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Action(ActionError::Input(error)) => {
                Self::BadRequest { message: error.to_string(), correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Action(error) => {
                Self::Internal { message: error.to_string(), correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Delivery(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ActionError, ApplicationError, GatewayError, InterfaceError, UserInputError};

    #[test]
    fn unsupported_channel_maps_to_bad_request() {
        let interface =
            ApplicationError::UnsupportedChannel("telegram".to_owned()).into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest { ref message, ref correlation_id }
                if correlation_id == "req-1" && message.contains("telegram")
        ));
        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn gateway_failure_maps_to_internal_error() {
        let interface = ApplicationError::from(ActionError::from(GatewayError::Status {
            status: 401,
            message: "invalid api key".to_owned(),
        }))
        .into_interface("req-2");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.correlation_id(), "req-2");
        assert_eq!(interface.user_message(), "An unexpected internal error occurred.");
    }

    #[test]
    fn delivery_failure_maps_to_internal_error() {
        let interface =
            ApplicationError::Delivery("spark returned 502".to_owned()).into_interface("req-3");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
    }

    #[test]
    fn input_errors_read_as_conversational_sentences() {
        assert_eq!(
            UserInputError::TrafficWindowOutOfRange.to_string(),
            "Sorry, but you can only get traffic data from 2 hours to 1 month."
        );
        let interface = ApplicationError::from(ActionError::from(UserInputError::NetworkNotFound))
            .into_interface("req-4");
        assert!(matches!(interface, InterfaceError::BadRequest { .. }));
    }
}
