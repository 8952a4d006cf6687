//! Constructive heuristics for building an initial plan.
//!
//! - [`AssignmentSolver`]: Greedy priority-first allocation, one task per agent, O(nm) A* searches

mod assignment;

pub use assignment::AssignmentSolver;
