//! Route simulation and route-set scoring.
//!
//! - [`RouteSimulator`]: forward-time walk shared by scoring and GA fitness
//! - [`evaluate`]: delivered count, payload energy, violations, average wait

mod evaluator;
mod simulator;

pub use evaluator::{evaluate, Evaluation};
pub use simulator::{Leg, RouteOutcome, RouteSimulator};
