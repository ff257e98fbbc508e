use thiserror::Error;

/// Failure of a single request. Caught by the batch runner and recorded,
/// never propagated past it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("could not encode method call: {0}")]
    Encoding(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Transport(String),
}

impl RpcError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RpcError::Timeout(_))
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RpcError::Timeout(err.to_string())
        } else if err.is_connect() {
            RpcError::Connect(err.to_string())
        } else {
            RpcError::Transport(err.to_string())
        }
    }
}

/// Errors that stop the whole process before or after the batch.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Could not read input file '{path}': {source}")]
    InputError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    ClientError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl BatchError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            BatchError::InputError { path, .. } => {
                format!("Cannot read input file '{}'", path)
            }
            BatchError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            BatchError::ConfigError { message } => format!("Configuration problem: {}", message),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BatchError::InputError { .. } | BatchError::IoError(_) => {
                "Check that the file exists and is readable"
            }
            BatchError::CsvError(_) => "Parameter lines must look like: path,value",
            BatchError::ConfigError { .. } | BatchError::InvalidConfigValueError { .. } => {
                "Fix the settings file or command line flags, use --help for usage"
            }
            BatchError::SerializationError(_) => "Check the report path is writable",
            BatchError::ClientError(_) => "Check the client settings, such as the timeout",
        }
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;
