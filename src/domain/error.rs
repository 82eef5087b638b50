// Failure taxonomy for a render cycle
use crate::domain::tide::Product;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum TideError {
    /// A retrieval request failed, timed out, or the provider reported an error.
    #[error("network error fetching {product}: {message}")]
    Network { product: Product, message: String },

    /// A timestamp, numeric value or extremum tag could not be parsed.
    #[error("parse error in field {field}: {message}")]
    Parse { field: &'static str, message: String },

    #[error("insufficient data: {0}")]
    InsufficientData(&'static str),
}

impl TideError {
    pub fn network(product: Product, message: impl Into<String>) -> Self {
        TideError::Network {
            product,
            message: message.into(),
        }
    }

    /// Stable identifier used by the HTTP surface.
    pub fn kind(&self) -> &'static str {
        match self {
            TideError::Network { .. } => "network",
            TideError::Parse { .. } => "parse",
            TideError::InsufficientData(_) => "insufficient_data",
        }
    }
}
