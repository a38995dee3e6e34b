use thiserror::Error;

/// Errors produced while validating model input.
#[derive(Debug, Error, PartialEq)]
pub enum TypeError {
    #[error("invalid {field}: expected a JSON array of 3 numbers, got {input:?}")]
    InvalidTriple { field: &'static str, input: String },

    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("empty model payload")]
    EmptyPayload,
}
