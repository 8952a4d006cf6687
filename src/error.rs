//! Crate-wide error type.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised by the planning engine.
///
/// Infeasibility is not an error: unreachable tasks and time-infeasible
/// sequences are reported through empty results with infinite cost.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// A time-of-day string is not of the form `HH:MM`.
    #[error("malformed time string {0:?}: expected HH:MM")]
    MalformedTime(String),

    /// A time window closes before it opens.
    #[error("time window {start}-{end} closes before it opens")]
    InvertedTimeWindow {
        /// Window start as given.
        start: String,
        /// Window end as given.
        end: String,
    },

    /// An operation was called with an argument it cannot accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The problem instance failed structural validation.
    #[error("invalid instance: {}", summarize(.0))]
    InvalidInstance(Vec<ValidationError>),
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RoutingError>;
