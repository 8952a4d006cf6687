//! Greedy priority-first task assignment, one task per agent.
//!
//! Tasks are taken in descending priority (ties keep input order). For each
//! task, agents are scanned in input order; agents already holding a task or
//! unable to carry the package are skipped, and the first remaining agent
//! with a window-feasible A* path to the task receives it. Tasks no agent can
//! reach stay unassigned.
//!
//! # Complexity
//!
//! O(n · m) path searches for n tasks and m agents.

use std::collections::HashSet;

use log::{debug, info};

use crate::error::Result;
use crate::graph::{NodeKey, TaskGraph};
use crate::models::{Assignment, Task};

/// Baseline allocator producing at most one task per agent.
///
/// # Examples
///
/// ```
/// use u_delivery::constructive::AssignmentSolver;
/// use u_delivery::graph::TaskGraph;
/// use u_delivery::models::{Agent, Task};
/// use u_delivery::geometry::Point;
///
/// let agents = vec![
///     Agent::new(1, 1.0, 10.0, Point::new(0.0, 0.0)),
///     Agent::new(2, 5.0, 10.0, Point::new(0.0, 0.0)),
/// ];
/// let tasks = vec![
///     Task::new(1, Point::new(10.0, 0.0), 1.0, 2, "09:00", "10:00").unwrap(),
///     Task::new(2, Point::new(20.0, 0.0), 3.0, 5, "09:00", "10:00").unwrap(),
/// ];
/// let graph = TaskGraph::build(agents, tasks, vec![]).unwrap();
///
/// let assignment = AssignmentSolver::solve(&graph).unwrap();
/// // the heavy priority-5 task claims the only agent able to lift it
/// assert_eq!(assignment.agent_for(2), Some(2));
/// assert_eq!(assignment.agent_for(1), Some(1));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentSolver;

impl AssignmentSolver {
    /// Assigns tasks to agents on `graph`.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`TaskGraph::find_path`], which do not occur
    /// for ids taken from the graph itself.
    pub fn solve(graph: &TaskGraph) -> Result<Assignment> {
        let mut order: Vec<&Task> = graph.tasks().iter().collect();
        order.sort_by(|a, b| b.priority().cmp(&a.priority()));

        let mut used = HashSet::new();
        let mut assignment = Assignment::new();
        for task in order {
            for agent in graph.agents() {
                if used.contains(&agent.id()) || !agent.can_carry(task.weight()) {
                    continue;
                }
                let path = graph.find_path(NodeKey::Agent(agent.id()), NodeKey::Task(task.id()))?;
                if path.is_found() {
                    debug!(
                        "task {} -> agent {} (cost {:.1})",
                        task.id(),
                        agent.id(),
                        path.cost
                    );
                    assignment.insert(task.id(), agent.id());
                    used.insert(agent.id());
                    break;
                }
            }
        }

        info!(
            "assignment: {} of {} tasks placed on {} agents",
            assignment.len(),
            graph.tasks().len(),
            graph.agents().len()
        );
        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::models::Agent;
    use proptest::prelude::*;

    fn task(id: u32, x: f64, weight: f64, priority: u8, end: &str) -> Task {
        Task::new(id, Point::new(x, 0.0), weight, priority, "09:00", end).expect("valid")
    }

    #[test]
    fn test_empty_inputs() {
        let g = TaskGraph::build(vec![], vec![], vec![]).expect("valid");
        assert!(AssignmentSolver::solve(&g).expect("solve").is_empty());

        let g = TaskGraph::build(vec![], vec![task(1, 10.0, 1.0, 3, "10:00")], vec![])
            .expect("valid");
        assert!(AssignmentSolver::solve(&g).expect("solve").is_empty());
    }

    #[test]
    fn test_one_task_per_agent() {
        let agents = vec![Agent::new(1, 5.0, 10.0, Point::default())];
        let tasks = vec![
            task(1, 10.0, 1.0, 3, "10:00"),
            task(2, 20.0, 1.0, 4, "10:00"),
        ];
        let g = TaskGraph::build(agents, tasks, vec![]).expect("valid");
        let a = AssignmentSolver::solve(&g).expect("solve");
        assert_eq!(a.len(), 1);
        assert_eq!(a.agent_for(2), Some(1));
        assert_eq!(a.agent_for(1), None);
    }

    #[test]
    fn test_priority_ties_keep_input_order() {
        let agents = vec![Agent::new(1, 5.0, 10.0, Point::default())];
        let tasks = vec![
            task(7, 20.0, 1.0, 3, "10:00"),
            task(3, 10.0, 1.0, 3, "10:00"),
        ];
        let g = TaskGraph::build(agents, tasks, vec![]).expect("valid");
        let a = AssignmentSolver::solve(&g).expect("solve");
        assert_eq!(a.agent_for(7), Some(1));
    }

    #[test]
    fn test_unreachable_task_falls_to_next_agent() {
        // agent 1 is too slow for the window, agent 2 makes it
        let agents = vec![
            Agent::new(1, 5.0, 1.0, Point::default()),
            Agent::new(2, 5.0, 100.0, Point::default()),
        ];
        let tasks = vec![task(1, 100.0, 1.0, 3, "09:05")];
        let g = TaskGraph::build(agents, tasks, vec![]).expect("valid");
        let a = AssignmentSolver::solve(&g).expect("solve");
        assert_eq!(a.agent_for(1), Some(2));
    }

    #[test]
    fn test_too_heavy_left_unassigned() {
        let agents = vec![Agent::new(1, 1.0, 10.0, Point::default())];
        let tasks = vec![task(1, 10.0, 2.0, 3, "10:00")];
        let g = TaskGraph::build(agents, tasks, vec![]).expect("valid");
        assert!(AssignmentSolver::solve(&g).expect("solve").is_empty());
    }

    proptest! {
        #[test]
        fn prop_exclusive_and_capacity_respecting(
            caps in proptest::collection::vec(0.5..5.0f64, 0..5),
            specs in proptest::collection::vec((0.0..500.0f64, 0.1..5.0f64, 1u8..=5), 0..8),
        ) {
            let agents: Vec<Agent> = caps
                .iter()
                .enumerate()
                .map(|(i, &c)| Agent::new(i as u32, c, 10.0, Point::default()))
                .collect();
            let tasks: Vec<Task> = specs
                .iter()
                .enumerate()
                .map(|(i, &(x, w, p))| task(i as u32, x, w, p, "10:00"))
                .collect();
            let g = TaskGraph::build(agents, tasks, vec![]).expect("valid");
            let a = AssignmentSolver::solve(&g).expect("solve");

            let mut seen = HashSet::new();
            for (task_id, agent_id) in a.iter() {
                prop_assert!(seen.insert(agent_id), "agent {} used twice", agent_id);
                let agent = g.agent(agent_id).expect("agent");
                let task = g.task(task_id).expect("task");
                prop_assert!(task.weight() <= agent.max_weight());
            }
        }
    }
}
