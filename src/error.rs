//! Error types shared across the crate.
//!
//! Every failure mode here is recoverable by the caller; none is fatal to
//! the process. Vector-space edge cases (zero vectors, out-of-vocabulary
//! terms, empty catalogs) are defined behaviors and deliberately absent.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Biometric input was non-positive, non-finite, or unparseable.
    #[error("invalid biometrics: {0}")]
    InvalidBiometrics(String),

    /// Goal string outside the fixed enumeration (lose/maintain/gain).
    #[error("unknown goal '{0}' (expected lose, maintain, or gain)")]
    InvalidGoal(String),

    /// Activity-level string outside the fixed enumeration.
    #[error("unknown activity level '{0}'")]
    InvalidActivityLevel(String),

    /// Requested recommendation count of zero.
    #[error("recommendation count must be at least 1")]
    InvalidK,

    /// Hard constraints left no candidate meals. The caller decides how
    /// to degrade (relax soft preferences, never allergens).
    #[error("no meals satisfy the user's hard constraints")]
    NoAdmissibleMeals,

    /// A catalog record is missing required fields or carries negative
    /// nutrient values.
    #[error("malformed meal record '{id}': {reason}")]
    MalformedRecord { id: String, reason: String },
}

impl Error {
    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedRecord {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience Result type using the crate Error.
pub type Result<T> = std::result::Result<T, Error>;
