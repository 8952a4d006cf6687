//! Delivery task with weight, priority and time window.

use serde::{Deserialize, Serialize};

use super::TimeWindow;
use crate::error::Result;
use crate::geometry::Point;

/// Identifier of a [`Task`].
pub type TaskId = u32;

/// Lowest allowed priority.
pub const MIN_PRIORITY: u8 = 1;
/// Highest allowed priority (most urgent).
pub const MAX_PRIORITY: u8 = 5;

/// A package to deliver at a position within an acceptance window.
///
/// # Examples
///
/// ```
/// use u_delivery::models::Task;
/// use u_delivery::geometry::Point;
///
/// let t = Task::new(1, Point::new(100.0, 0.0), 1.5, 4, "09:00", "10:00").unwrap();
/// assert_eq!(t.priority(), 4);
/// assert_eq!(t.time_window().start(), 540.0);
/// assert!(Task::new(2, Point::new(0.0, 0.0), 1.0, 1, "9am", "10:00").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    pos: Point,
    weight: f64,
    priority: u8,
    time_window: TimeWindow,
}

impl Task {
    /// Creates a task, parsing the `"HH:MM"` window bounds.
    pub fn new(
        id: TaskId,
        pos: Point,
        weight: f64,
        priority: u8,
        window_start: &str,
        window_end: &str,
    ) -> Result<Self> {
        Ok(Self::with_window(
            id,
            pos,
            weight,
            priority,
            TimeWindow::parse(window_start, window_end)?,
        ))
    }

    /// Creates a task from an already parsed window.
    pub fn with_window(
        id: TaskId,
        pos: Point,
        weight: f64,
        priority: u8,
        time_window: TimeWindow,
    ) -> Self {
        Self {
            id,
            pos,
            weight,
            priority,
            time_window,
        }
    }

    /// Task ID.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Delivery position.
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Package weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Priority level; higher is more urgent.
    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// Acceptance window.
    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }
}
