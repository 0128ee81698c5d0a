//! Errors for relationship resolution.
//!
//! Configuration and resolution failures surface at relationship-load
//! time, never deferred to the first query.

use thiserror::Error;

/// A type for relationship errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The relationship options are malformed.
    #[error("relationship '{name}' on '{native}' is misconfigured: {reason}")]
    Configuration {
        native: String,
        name: String,
        reason: String,
    },

    /// No resolution strategy found the foreign model class.
    #[error("cannot resolve foreign model '{class}' for relationship '{name}' on '{native}'")]
    UnresolvedRelation {
        native: String,
        name: String,
        class: String,
    },

    /// `new_select` was given neither a usable record nor valid parameters.
    #[error("invalid spec for relationship '{name}': no value for native column '{col}'")]
    InvalidSpec { name: String, col: String },
}
