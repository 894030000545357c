//! Error types for the route planner.

use thiserror::Error;

/// Result type for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Errors that can occur when building planner inputs or configuration.
///
/// Planning itself degrades rather than fails: an infeasible or partially
/// feasible target set produces a [`crate::api::PlanOutcome`] on the plan,
/// not an error. These variants cover malformed inputs and I/O.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Target fields out of range (RA, Dec, or duration)
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Site coordinates out of range
    #[error("Invalid site: {0}")]
    InvalidSite(String),

    /// Obstacle profile rejected
    #[error("Invalid obstacle profile: {0}")]
    InvalidProfile(String),

    /// Timestamp outside the representable range
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// Configuration file missing, unreadable, or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
