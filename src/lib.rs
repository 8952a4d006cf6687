//! # u-delivery
//!
//! Fleet delivery planning: payload- and speed-limited agents serving
//! time-windowed tasks around restricted zones, with a greedy baseline
//! allocator and a genetic route-set optimizer.
//!
//! ## Modules
//!
//! - [`models`]: Domain model types (Agent, Task, RestrictedZone, TimeWindow, RouteSet, Assignment)
//! - [`geometry`]: Points, polygon containment, segment intersection
//! - [`distance`]: Dense distance matrix
//! - [`validation`]: Structural checks on an instance
//! - [`graph`]: Task graph, time-window A*, exact TSPTW sequencing
//! - [`energy`]: Flight energy model
//! - [`evaluation`]: Route simulation and route-set scoring
//! - [`constructive`]: Greedy one-task-per-agent assignment
//! - [`local_search`]: 2-opt on open routes
//! - [`ga`]: Genetic algorithm over route sets
//! - [`session`]: Planning requests and incremental sessions
//! - [`error`]: Crate error type

pub mod constructive;
pub mod distance;
pub mod energy;
pub mod error;
pub mod evaluation;
pub mod ga;
pub mod geometry;
pub mod graph;
pub mod local_search;
pub mod models;
pub mod session;
pub mod validation;

pub use error::{Result, RoutingError};
