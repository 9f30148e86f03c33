use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaxctlError {
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    NotFound(String),
    /// Rejection reported by the cluster. The message is kept exactly as sent.
    #[error("{message}")]
    Semantic { code: String, message: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl MaxctlError {
    pub fn semantic(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Semantic {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TransportError",
            Self::Auth(_) => "AuthError",
            Self::NotFound(_) => "NotFoundError",
            Self::Semantic { .. } => "SemanticError",
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::Config(_) => "InvalidConfig",
            Self::Io(_) => "IoError",
            Self::Json(_) => "JsonError",
        }
    }
}

pub type Result<T> = std::result::Result<T, MaxctlError>;

#[cfg(test)]
mod tests {
    use super::MaxctlError;

    #[test]
    fn semantic_message_is_passed_through() {
        let err = MaxctlError::semantic("XMinioDecommissionNotAllowed", "pool not draining");
        assert_eq!(err.to_string(), "pool not draining");
        assert_eq!(err.error_code(), "SemanticError");
    }

    #[test]
    fn transport_and_not_found_codes() {
        assert_eq!(
            MaxctlError::Transport("connection refused".to_string()).error_code(),
            "TransportError"
        );
        assert_eq!(
            MaxctlError::NotFound("alias not found".to_string()).error_code(),
            "NotFoundError"
        );
    }
}
