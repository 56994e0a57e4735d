use std::fmt;

/// Errors raised while consulting a collaborator
#[derive(Debug)]
pub enum ConnectorError {
    /// Lookup failed inside the backend
    Internal(String),
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ConnectorError {}

impl From<String> for ConnectorError {
    fn from(msg: String) -> Self {
        Self::Internal(msg)
    }
}
