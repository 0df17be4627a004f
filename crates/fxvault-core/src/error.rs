use thiserror::Error;

/// Input validation errors exposed by `fxvault-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid base currency '{value}', expected one of USD, CAD, JPY, GBP")]
    InvalidBaseCurrency { value: String },

    #[error("invalid calendar date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
}
