use serde::{Deserialize, Serialize};

/// Error body returned alongside a non-success status
#[derive(Debug, Serialize, Deserialize)]
pub struct Result {
    pub message: String,
    pub success: bool,
}

impl Result {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}
