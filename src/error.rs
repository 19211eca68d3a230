use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A required parameter or setting does not exist or has no value.
    #[error("missing required configuration: {0}")]
    ConfigurationMissing(String),

    #[error("parameter store request for '{name}' failed: {message}")]
    ParameterStore { name: String, message: String },

    #[error("invalid request type: {0}")]
    InvalidRequestType(String),

    #[error("missing resource property: {0}")]
    MissingProperty(&'static str),

    #[error("no existing integration found for role arn: {role_arn}")]
    IntegrationNotFound { role_arn: String },

    /// Transport, authentication or server failure from the Lacework API.
    #[error("lacework api request failed{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    RemoteApi { status: Option<u16>, message: String },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::RemoteApi {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
