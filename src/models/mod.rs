//! Domain model types for fleet delivery planning.
//!
//! Agents with payload and speed limits, time-windowed tasks, restricted
//! zones, and the two solution shapes: route sets (ordered tasks per agent)
//! and assignments (agent per task).

mod agent;
mod clock;
mod route_set;
mod task;
mod zone;

pub use agent::{Agent, AgentId};
pub use clock::{ClockTime, TimeWindow};
pub use route_set::{Assignment, RouteSet};
pub use task::{Task, TaskId, MAX_PRIORITY, MIN_PRIORITY};
pub use zone::{RestrictedZone, ZoneId};
