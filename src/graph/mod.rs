//! Task graph and the searches that run on it.
//!
//! - [`TaskGraph`]: arena of agent and task nodes with weighted edges
//! - [`TaskGraph::find_path`]: time-window-aware A* from an agent to a task
//! - [`TaskGraph::solve_task_sequence_for_agent`]: exact TSPTW over a small task subset

mod astar;
mod sequencing;
mod task_graph;

pub use astar::PathResult;
pub use sequencing::{SequencePlan, MAX_EXACT_TASKS};
pub use task_graph::{Edge, Node, NodeKey, TaskGraph, ZONE_PENALTY};
