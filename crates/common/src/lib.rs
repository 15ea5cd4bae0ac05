/// Common types and utilities for the indexer configuration layer

/// Error type for configuration resolution and assembly
///
/// Every variant is fatal at startup: a failure here must keep the indexing
/// runtime from starting with incomplete contract or network information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A deployment record lacks the transaction or receipt data we read
    #[error("Missing deployment data: {field}")]
    MissingDeploymentData { field: String },

    /// A contract address is not a well-formed 20-byte hex address
    #[error("Invalid address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },

    /// A block number is not a valid hexadecimal quantity
    #[error("Malformed block height '{value}'")]
    MalformedHeight { value: String },

    /// The assembled configuration is structurally inconsistent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Reading an input file failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Decoding or encoding a document failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a new missing deployment data error
    pub fn missing_deployment_data<S: Into<String>>(field: S) -> Self {
        Error::MissingDeploymentData { field: field.into() }
    }

    /// Create a new invalid address error
    pub fn invalid_address<V: Into<String>, R: Into<String>>(value: V, reason: R) -> Self {
        Error::InvalidAddress {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a new malformed height error
    pub fn malformed_height<S: Into<String>>(value: S) -> Self {
        Error::MalformedHeight { value: value.into() }
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(msg: S) -> Self {
        Error::Io(msg.into())
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Error::Serialization(msg.into())
    }

    /// Short name of the error kind, stable across message changes
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingDeploymentData { .. } => "MissingDeploymentData",
            Error::InvalidAddress { .. } => "InvalidAddress",
            Error::MalformedHeight { .. } => "MalformedHeight",
            Error::Configuration(_) => "ConfigurationError",
            Error::Io(_) => "Io",
            Error::Serialization(_) => "Serialization",
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON serialization error: {}", err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
