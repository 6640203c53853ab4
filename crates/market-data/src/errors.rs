//! Error types for the market data crate.
//!
//! Transport failures (network errors, non-success HTTP statuses) are not
//! represented here: they are collapsed into the absence value (`None`) by
//! [`crate::transport::ApiClient::get`], so callers always check for absence
//! explicitly. Everything that must propagate as a hard failure lives in
//! [`MarketDataError`].

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// A required credential variable is not set.
    /// Fatal at startup for any component that needs the provider.
    #[error("Missing API credential: {var} is not set")]
    MissingCredential {
        /// The environment variable that was expected to hold the key
        var: String,
    },

    /// A declared field is absent from a payload or cached record.
    /// Never silently defaulted; the missing field is named.
    #[error("Field not found: {field}")]
    FieldNotFound {
        /// The field that was requested but absent
        field: String,
    },

    /// The payload does not match the declared shape.
    /// Distinct from a transport failure: the provider answered, but with
    /// something we cannot interpret.
    #[error("Unexpected payload shape: {message}")]
    UnexpectedShape {
        /// Description of the shape mismatch
        message: String,
    },

    /// The requested resampling granularity is not in the fixed enumeration.
    /// Rejected before any network call is made.
    #[error("Unsupported granularity: {requested}")]
    UnsupportedGranularity {
        /// The label that failed to parse
        requested: String,
    },

    /// Writing a series to a spreadsheet file failed.
    #[error("Export failed: {message}")]
    Export {
        /// Description of the export failure
        message: String,
    },
}

impl MarketDataError {
    /// Shorthand for an [`UnexpectedShape`](Self::UnexpectedShape) error.
    pub(crate) fn shape(message: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            message: message.into(),
        }
    }
}
