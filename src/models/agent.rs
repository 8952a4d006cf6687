//! Delivery agent with payload and speed limits.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Identifier of an [`Agent`].
pub type AgentId = u32;

/// A mobile unit that carries packages from its start position to tasks.
///
/// Speed is measured in distance units per minute. The battery capacity is
/// informational and not consumed by the solvers.
///
/// # Examples
///
/// ```
/// use u_delivery::models::Agent;
/// use u_delivery::geometry::Point;
///
/// let a = Agent::new(1, 5.0, 10.0, Point::new(0.0, 0.0)).with_battery(4000.0);
/// assert_eq!(a.id(), 1);
/// assert!(a.can_carry(4.5));
/// assert!(!a.can_carry(5.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    max_weight: f64,
    #[serde(default)]
    battery: f64,
    speed: f64,
    start_pos: Point,
}

impl Agent {
    /// Creates an agent with the given payload limit, speed and start position.
    pub fn new(id: AgentId, max_weight: f64, speed: f64, start_pos: Point) -> Self {
        Self {
            id,
            max_weight,
            battery: 0.0,
            speed,
            start_pos,
        }
    }

    /// Sets the battery capacity.
    pub fn with_battery(mut self, battery: f64) -> Self {
        self.battery = battery;
        self
    }

    /// Agent ID.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Maximum payload weight.
    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    /// Battery capacity.
    pub fn battery(&self) -> f64 {
        self.battery
    }

    /// Cruising speed (distance per minute).
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Fixed start position.
    pub fn start_pos(&self) -> Point {
        self.start_pos
    }

    /// Returns `true` if a package of `weight` fits the payload limit.
    pub fn can_carry(&self, weight: f64) -> bool {
        weight <= self.max_weight
    }

    /// Minutes needed to cover `distance` at cruising speed.
    pub fn travel_time(&self, distance: f64) -> f64 {
        distance / self.speed
    }
}
