//! Exact single-agent task sequencing with time windows (TSPTW).
//!
//! # Algorithm
//!
//! Held-Karp style dynamic programming over subsets. State
//! `(mask, last)` holds the earliest feasible arrival at task `last` having
//! visited exactly the tasks in `mask`. A transition appends one unvisited
//! task if its arrival (clamped forward to the window start) does not exceed
//! the window end; infeasible transitions are pruned. The full-mask state
//! with the smallest arrival gives the optimal completion time and the order
//! is recovered through stored predecessors.
//!
//! # Complexity
//!
//! O(2ⁿ · n²) time, O(2ⁿ · n) memory. Intended for small per-agent task
//! sets; subsets larger than [`MAX_EXACT_TASKS`] are rejected.
//!
//! # Reference
//!
//! Held, M., Karp, R.M. (1962). "A Dynamic Programming Approach to
//! Sequencing Problems", *Journal of the SIAM* 10(1), 196-210.
//!
//! Dumas, Y., Desrosiers, J., Gelinas, E., Solomon, M.M. (1995). "An Optimal
//! Algorithm for the Traveling Salesman Problem with Time Windows",
//! *Operations Research* 43(2), 367-371.

use std::collections::HashSet;

use log::debug;

use super::TaskGraph;
use crate::error::{Result, RoutingError};
use crate::models::{AgentId, TaskId, TimeWindow};

/// Largest task subset the exact solver accepts.
pub const MAX_EXACT_TASKS: usize = 20;

const NO_PARENT: u8 = u8::MAX;

/// An optimal visiting order for one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencePlan {
    /// Task IDs in visiting order; empty if infeasible.
    pub sequence: Vec<TaskId>,
    /// Total travel time in minutes; infinite if infeasible.
    pub travel_time: f64,
    /// Total waiting time in minutes; infinite if infeasible.
    pub wait_time: f64,
    /// Arrival (service start) at the last task, in minutes past midnight.
    ///
    /// Zero for an empty subset, infinite if infeasible.
    pub completion_time: f64,
}

impl SequencePlan {
    fn empty() -> Self {
        Self {
            sequence: Vec::new(),
            travel_time: 0.0,
            wait_time: 0.0,
            completion_time: 0.0,
        }
    }

    /// The result when no order covers every task within its window.
    pub fn infeasible() -> Self {
        Self {
            sequence: Vec::new(),
            travel_time: f64::INFINITY,
            wait_time: f64::INFINITY,
            completion_time: f64::INFINITY,
        }
    }

    /// Returns `true` unless this is the infeasible result.
    pub fn is_feasible(&self) -> bool {
        self.travel_time.is_finite()
    }
}

impl TaskGraph {
    /// Computes the minimum-completion-time order for `agent` to visit every
    /// task in `task_ids` within its window.
    ///
    /// Timing starts at the earliest window start among the given tasks,
    /// from the agent's start position. Returns
    /// [`SequencePlan::infeasible`] if no order covers all tasks.
    ///
    /// # Errors
    ///
    /// [`RoutingError::InvalidArgument`] for an unknown agent or task, a
    /// repeated task, or more than [`MAX_EXACT_TASKS`] tasks.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_delivery::graph::TaskGraph;
    /// use u_delivery::models::{Agent, Task};
    /// use u_delivery::geometry::Point;
    ///
    /// let agents = vec![Agent::new(1, 5.0, 10.0, Point::new(0.0, 0.0))];
    /// let tasks = vec![
    ///     Task::new(1, Point::new(0.0, 100.0), 1.0, 3, "09:00", "10:00").unwrap(),
    ///     Task::new(2, Point::new(200.0, 0.0), 1.0, 3, "09:00", "09:22").unwrap(),
    /// ];
    /// let graph = TaskGraph::build(agents, tasks, vec![]).unwrap();
    ///
    /// // Visiting 1 first reaches 2 after its window closes.
    /// let plan = graph.solve_task_sequence_for_agent(1, &[1, 2]).unwrap();
    /// assert_eq!(plan.sequence, vec![2, 1]);
    /// ```
    pub fn solve_task_sequence_for_agent(
        &self,
        agent_id: AgentId,
        task_ids: &[TaskId],
    ) -> Result<SequencePlan> {
        let agent_idx = self
            .agent_node(agent_id)
            .ok_or_else(|| RoutingError::InvalidArgument(format!("unknown agent {agent_id}")))?;
        let n = task_ids.len();
        if n == 0 {
            return Ok(SequencePlan::empty());
        }
        if n > MAX_EXACT_TASKS {
            return Err(RoutingError::InvalidArgument(format!(
                "{n} tasks exceed the exact sequencing limit of {MAX_EXACT_TASKS}"
            )));
        }

        let mut seen = HashSet::with_capacity(n);
        let mut locations = Vec::with_capacity(n + 1);
        locations.push(agent_idx);
        for &id in task_ids {
            if !seen.insert(id) {
                return Err(RoutingError::InvalidArgument(format!(
                    "task {id} listed more than once"
                )));
            }
            let idx = self
                .task_node(id)
                .ok_or_else(|| RoutingError::InvalidArgument(format!("unknown task {id}")))?;
            locations.push(idx);
        }

        let speed = self.agents()[agent_idx].speed();
        let windows: Vec<&TimeWindow> = locations[1..]
            .iter()
            .map(|&idx| self.task_at(idx).time_window())
            .collect();
        let start_time = windows
            .iter()
            .map(|w| w.start())
            .fold(f64::INFINITY, f64::min);
        // Location 0 is the agent; task j sits at location j + 1.
        let travel = |u: usize, v: usize| self.distances().get(locations[u], locations[v]) / speed;

        let full = 1usize << n;
        let mut arrival = vec![f64::INFINITY; full * n];
        let mut parent = vec![NO_PARENT; full * n];

        for j in 0..n {
            if let Some(t) = windows[j].service_start(start_time + travel(0, j + 1)) {
                arrival[(1 << j) * n + j] = t;
            }
        }

        let mut states = 0usize;
        for mask in 1..full {
            for j in 0..n {
                if mask & (1 << j) == 0 {
                    continue;
                }
                let t = arrival[mask * n + j];
                if !t.is_finite() {
                    continue;
                }
                states += 1;
                for k in 0..n {
                    if mask & (1 << k) != 0 {
                        continue;
                    }
                    let Some(next) = windows[k].service_start(t + travel(j + 1, k + 1)) else {
                        continue;
                    };
                    let slot = (mask | (1 << k)) * n + k;
                    if next < arrival[slot] {
                        arrival[slot] = next;
                        parent[slot] = j as u8;
                    }
                }
            }
        }

        let full_mask = full - 1;
        let mut best: Option<(usize, f64)> = None;
        for j in 0..n {
            let t = arrival[full_mask * n + j];
            if t.is_finite() && best.map_or(true, |(_, b)| t < b) {
                best = Some((j, t));
            }
        }
        debug!("TSPTW agent {agent_id}: {n} tasks, {states} feasible states");

        let Some((last, completion_time)) = best else {
            return Ok(SequencePlan::infeasible());
        };

        let mut order = Vec::with_capacity(n);
        let mut mask = full_mask;
        let mut j = last;
        loop {
            order.push(j);
            let p = parent[mask * n + j];
            mask ^= 1 << j;
            if p == NO_PARENT {
                break;
            }
            j = usize::from(p);
        }
        order.reverse();

        let mut current = start_time;
        let mut travel_time = 0.0;
        let mut wait_time = 0.0;
        let mut prev = 0;
        for &j in &order {
            let leg = travel(prev, j + 1);
            let arrive = current + leg;
            wait_time += windows[j].waiting_time(arrive);
            travel_time += leg;
            current = arrive.max(windows[j].start());
            prev = j + 1;
        }

        Ok(SequencePlan {
            sequence: order.into_iter().map(|j| task_ids[j]).collect(),
            travel_time,
            wait_time,
            completion_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::models::{Agent, Task};
    use proptest::prelude::*;

    fn graph(agent_speed: f64, tasks: Vec<Task>) -> TaskGraph {
        let agents = vec![Agent::new(1, 5.0, agent_speed, Point::new(0.0, 0.0))];
        TaskGraph::build(agents, tasks, vec![]).expect("valid")
    }

    fn task(id: u32, x: f64, y: f64, start: &str, end: &str) -> Task {
        Task::new(id, Point::new(x, y), 1.0, 3, start, end).expect("valid")
    }

    /// Forward simulation of a fixed order; `None` if a window is missed.
    fn completion_of(g: &TaskGraph, order: &[TaskId]) -> Option<f64> {
        let agent = g.agent(1).expect("agent");
        let mut t = order
            .iter()
            .map(|&id| g.task(id).expect("task").time_window().start())
            .fold(f64::INFINITY, f64::min);
        let mut pos = agent.start_pos();
        for &id in order {
            let task = g.task(id).expect("task");
            t = task
                .time_window()
                .service_start(t + agent.travel_time(pos.distance_to(&task.pos())))?;
            pos = task.pos();
        }
        Some(t)
    }

    fn permutations(items: &[TaskId]) -> Vec<Vec<TaskId>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    #[test]
    fn test_empty_subset() {
        let g = graph(10.0, vec![task(1, 10.0, 0.0, "09:00", "10:00")]);
        let plan = g.solve_task_sequence_for_agent(1, &[]).expect("valid");
        assert!(plan.sequence.is_empty());
        assert_eq!(plan.travel_time, 0.0);
        assert_eq!(plan.wait_time, 0.0);
        assert!(plan.is_feasible());
    }

    #[test]
    fn test_unknown_agent() {
        let g = graph(10.0, vec![task(1, 10.0, 0.0, "09:00", "10:00")]);
        let err = g.solve_task_sequence_for_agent(7, &[1]).expect_err("unknown");
        assert!(matches!(err, RoutingError::InvalidArgument(_)));
    }

    #[test]
    fn test_unknown_and_duplicate_tasks() {
        let g = graph(10.0, vec![task(1, 10.0, 0.0, "09:00", "10:00")]);
        assert!(g.solve_task_sequence_for_agent(1, &[2]).is_err());
        assert!(g.solve_task_sequence_for_agent(1, &[1, 1]).is_err());
    }

    #[test]
    fn test_oversized_subset() {
        let tasks: Vec<Task> = (0..=MAX_EXACT_TASKS as u32)
            .map(|i| task(i, f64::from(i), 0.0, "09:00", "17:00"))
            .collect();
        let ids: Vec<TaskId> = tasks.iter().map(Task::id).collect();
        let g = graph(10.0, tasks);
        let err = g.solve_task_sequence_for_agent(1, &ids).expect_err("too many");
        assert!(matches!(err, RoutingError::InvalidArgument(_)));
    }

    #[test]
    fn test_tight_window_unreachable_in_any_order() {
        // Speed 10: B alone takes 20 minutes, its window closes after 5.
        let g = graph(
            10.0,
            vec![
                task(1, 100.0, 0.0, "09:00", "10:00"),
                task(2, 200.0, 0.0, "09:00", "09:05"),
            ],
        );
        let plan = g.solve_task_sequence_for_agent(1, &[1, 2]).expect("valid");
        assert!(!plan.is_feasible());
        assert!(plan.sequence.is_empty());
        assert_eq!(plan.travel_time, f64::INFINITY);
        assert_eq!(plan.wait_time, f64::INFINITY);
    }

    #[test]
    fn test_tight_window_forces_order() {
        let g = graph(
            10.0,
            vec![
                task(1, 0.0, 100.0, "09:00", "10:00"),
                task(2, 200.0, 0.0, "09:00", "09:22"),
            ],
        );
        let plan = g.solve_task_sequence_for_agent(1, &[1, 2]).expect("valid");
        assert_eq!(plan.sequence, vec![2, 1]);
        let expected_travel = 20.0 + (200.0f64.powi(2) + 100.0f64.powi(2)).sqrt() / 10.0;
        assert!((plan.travel_time - expected_travel).abs() < 1e-9);
        assert_eq!(plan.wait_time, 0.0);
        assert!((plan.completion_time - (540.0 + expected_travel)).abs() < 1e-9);
    }

    #[test]
    fn test_waiting_accumulates() {
        // second window opens at 10:00; arrival there at 09:02 waits 58 minutes
        let g = graph(
            10.0,
            vec![
                task(1, 10.0, 0.0, "09:00", "09:30"),
                task(2, 20.0, 0.0, "10:00", "11:00"),
            ],
        );
        let plan = g.solve_task_sequence_for_agent(1, &[2, 1]).expect("valid");
        assert_eq!(plan.sequence, vec![1, 2]);
        assert!((plan.travel_time - 2.0).abs() < 1e-9);
        assert!((plan.wait_time - 58.0).abs() < 1e-9);
        assert!((plan.completion_time - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_start_time_from_subset() {
        // the 08:00 task outside the subset does not move the start
        let g = graph(
            10.0,
            vec![
                task(1, 100.0, 0.0, "08:00", "08:05"),
                task(2, 100.0, 0.0, "09:00", "09:30"),
            ],
        );
        let plan = g.solve_task_sequence_for_agent(1, &[2]).expect("valid");
        assert_eq!(plan.sequence, vec![2]);
        assert!((plan.completion_time - 550.0).abs() < 1e-9);
    }

    #[test]
    fn test_matches_brute_force_on_line() {
        let tasks = vec![
            task(1, 300.0, 0.0, "09:00", "12:00"),
            task(2, 100.0, 0.0, "09:00", "12:00"),
            task(3, 200.0, 0.0, "09:00", "12:00"),
        ];
        let g = graph(10.0, tasks);
        let plan = g.solve_task_sequence_for_agent(1, &[1, 2, 3]).expect("valid");
        assert_eq!(plan.sequence, vec![2, 3, 1]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_exact_against_permutations(
            specs in proptest::collection::vec(
                (0.0..300.0f64, 0.0..300.0f64, 0u16..90, 5u16..60),
                1..=6,
            )
        ) {
            let tasks: Vec<Task> = specs
                .iter()
                .enumerate()
                .map(|(i, &(x, y, open, len))| {
                    let start = crate::models::ClockTime::from_minutes(540 + open).expect("in day");
                    let end = crate::models::ClockTime::from_minutes(540 + open + len).expect("in day");
                    Task::with_window(
                        i as u32,
                        Point::new(x, y),
                        1.0,
                        3,
                        TimeWindow::new(start, end).expect("ordered"),
                    )
                })
                .collect();
            let ids: Vec<TaskId> = tasks.iter().map(Task::id).collect();
            let g = graph(10.0, tasks);
            let plan = g.solve_task_sequence_for_agent(1, &ids).expect("valid");

            let best = permutations(&ids)
                .iter()
                .filter_map(|p| completion_of(&g, p))
                .fold(f64::INFINITY, f64::min);

            if plan.is_feasible() {
                prop_assert!(best.is_finite());
                prop_assert!(plan.completion_time <= best + 1e-9);
                let replay = completion_of(&g, &plan.sequence).expect("returned order is feasible");
                prop_assert!((replay - plan.completion_time).abs() < 1e-9);
            } else {
                prop_assert!(best.is_infinite());
            }
        }
    }
}
