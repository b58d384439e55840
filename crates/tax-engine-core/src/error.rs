use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxEngineError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl TaxEngineError {
    /// Shorthand for the validation failures every calculation can raise.
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        TaxEngineError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for TaxEngineError {
    fn from(e: serde_json::Error) -> Self {
        TaxEngineError::SerializationError(e.to_string())
    }
}

impl From<serde_yaml::Error> for TaxEngineError {
    fn from(e: serde_yaml::Error) -> Self {
        TaxEngineError::SerializationError(e.to_string())
    }
}
