//! Structural validation of a planning instance.
//!
//! Checks shape, not plausibility, before a graph is built. Detects:
//! - Duplicate agent, task, or zone IDs
//! - Non-positive or non-finite agent speeds
//! - Negative or non-finite payload limits and package weights
//! - Non-finite coordinates
//! - Priorities outside the supported range
//! - Zones with fewer than three vertices

use std::collections::HashSet;

use crate::models::{Agent, RestrictedZone, Task, MAX_PRIORITY, MIN_PRIORITY};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// An agent cannot move.
    NonPositiveSpeed,
    /// A payload limit or package weight is negative or not finite.
    InvalidWeight,
    /// A coordinate is NaN or infinite.
    NonFiniteCoordinate,
    /// A priority lies outside `MIN_PRIORITY..=MAX_PRIORITY`.
    PriorityOutOfRange,
    /// A zone polygon has fewer than three vertices.
    DegenerateZone,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a planning instance.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every detected issue.
///
/// # Examples
///
/// ```
/// use u_delivery::models::Agent;
/// use u_delivery::geometry::Point;
/// use u_delivery::validation::validate_instance;
///
/// let agents = vec![
///     Agent::new(1, 5.0, 10.0, Point::new(0.0, 0.0)),
///     Agent::new(1, 5.0, 0.0, Point::new(0.0, 0.0)),
/// ];
/// let errors = validate_instance(&agents, &[], &[]).unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
pub fn validate_instance(
    agents: &[Agent],
    tasks: &[Task],
    zones: &[RestrictedZone],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut agent_ids = HashSet::new();
    for a in agents {
        if !agent_ids.insert(a.id()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate agent id {}", a.id()),
            ));
        }
        if !(a.speed().is_finite() && a.speed() > 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveSpeed,
                format!("agent {} has speed {}", a.id(), a.speed()),
            ));
        }
        if !(a.max_weight().is_finite() && a.max_weight() >= 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWeight,
                format!("agent {} has payload limit {}", a.id(), a.max_weight()),
            ));
        }
        if !a.start_pos().is_finite() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonFiniteCoordinate,
                format!("agent {} start position is not finite", a.id()),
            ));
        }
    }

    let mut task_ids = HashSet::new();
    for t in tasks {
        if !task_ids.insert(t.id()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate task id {}", t.id()),
            ));
        }
        if !(t.weight().is_finite() && t.weight() >= 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWeight,
                format!("task {} has weight {}", t.id(), t.weight()),
            ));
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&t.priority()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::PriorityOutOfRange,
                format!(
                    "task {} priority {} outside {MIN_PRIORITY}..={MAX_PRIORITY}",
                    t.id(),
                    t.priority()
                ),
            ));
        }
        if !t.pos().is_finite() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonFiniteCoordinate,
                format!("task {} position is not finite", t.id()),
            ));
        }
    }

    let mut zone_ids = HashSet::new();
    for z in zones {
        if !zone_ids.insert(z.id()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate zone id {}", z.id()),
            ));
        }
        if z.vertices().len() < 3 {
            errors.push(ValidationError::new(
                ValidationErrorKind::DegenerateZone,
                format!("zone {} has {} vertices", z.id(), z.vertices().len()),
            ));
        }
        if z.vertices().iter().any(|p| !p.is_finite()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonFiniteCoordinate,
                format!("zone {} has a non-finite vertex", z.id()),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
