//! Time-window-aware A* search from an agent to a task.
//!
//! # Algorithm
//!
//! Standard A* over the task graph, keyed on accumulated edge cost plus the
//! zone-penalized heuristic. Alongside the cost label each node carries an
//! arrival time, seeded at the earliest window start of the instance.
//! Relaxing an edge into a task:
//!
//! 1. arrival = predecessor arrival + distance / speed of the searching agent
//! 2. arrival > window end → edge rejected
//! 3. arrival < window start → arrival clamped to window start (wait)
//!
//! Time only gates feasibility; the priority key is cost. Ties in the open
//! set pop in insertion order.
//!
//! A node can hold several labels: a cheaper label that arrives later does
//! not replace an earlier-arriving one, since only the earlier arrival may
//! still meet a downstream window. A new label is dropped when an existing
//! label at the same node is no worse in both cost and arrival, and it
//! retires every label it beats in both.
//!
//! # Reference
//!
//! Hart, P.E., Nilsson, N.J., Raphael, B. (1968). "A Formal Basis for the
//! Heuristic Determination of Minimum Cost Paths", *IEEE Transactions on
//! Systems Science and Cybernetics* 4(2), 100-107.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::debug;
use ordered_float::OrderedFloat;

use super::{NodeKey, TaskGraph};
use crate::error::{Result, RoutingError};

/// Result of a path search.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Node keys from the start agent to the goal task; empty if unreachable.
    pub path: Vec<NodeKey>,
    /// Total edge cost; infinite if unreachable.
    pub cost: f64,
}

impl PathResult {
    /// The result for an unreachable or time-infeasible goal.
    pub fn unreachable() -> Self {
        Self {
            path: Vec::new(),
            cost: f64::INFINITY,
        }
    }

    /// Returns `true` if a path was found.
    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }
}

impl TaskGraph {
    /// Finds a minimum-cost, window-respecting path from an agent to a task.
    ///
    /// Travel times use the starting agent's speed for the whole search.
    /// Returns [`PathResult::unreachable`] if no feasible path exists.
    ///
    /// # Errors
    ///
    /// [`RoutingError::InvalidArgument`] if `start` is not an agent node or
    /// either node is unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_delivery::graph::{NodeKey, TaskGraph};
    /// use u_delivery::models::{Agent, Task};
    /// use u_delivery::geometry::Point;
    ///
    /// let agents = vec![Agent::new(1, 5.0, 10.0, Point::new(0.0, 0.0))];
    /// let tasks = vec![
    ///     Task::new(1, Point::new(100.0, 0.0), 1.0, 5, "09:00", "10:00").unwrap(),
    ///     Task::new(2, Point::new(5000.0, 0.0), 1.0, 5, "09:00", "09:10").unwrap(),
    /// ];
    /// let graph = TaskGraph::build(agents, tasks, vec![]).unwrap();
    ///
    /// let found = graph.find_path(NodeKey::Agent(1), NodeKey::Task(1)).unwrap();
    /// assert_eq!(found.path, vec![NodeKey::Agent(1), NodeKey::Task(1)]);
    ///
    /// // 500 minutes away, window closes after 10
    /// let late = graph.find_path(NodeKey::Agent(1), NodeKey::Task(2)).unwrap();
    /// assert!(!late.is_found());
    /// assert_eq!(late.cost, f64::INFINITY);
    /// ```
    pub fn find_path(&self, start: NodeKey, goal: NodeKey) -> Result<PathResult> {
        let NodeKey::Agent(agent_id) = start else {
            return Err(RoutingError::InvalidArgument(format!(
                "path search must start at an agent node, got {start}"
            )));
        };
        let start_idx = self
            .agent_node(agent_id)
            .ok_or_else(|| RoutingError::InvalidArgument(format!("unknown agent {agent_id}")))?;
        let goal_idx = self
            .node_index(goal)
            .ok_or_else(|| RoutingError::InvalidArgument(format!("unknown node {goal}")))?;
        let speed = self.agents()[start_idx].speed();

        let mut labels = vec![Label {
            node: start_idx,
            cost: 0.0,
            time: self.earliest_start(),
            parent: None,
            dominated: false,
        }];
        // live labels per node
        let mut frontier: Vec<Vec<usize>> = vec![Vec::new(); self.num_nodes()];
        frontier[start_idx].push(0);

        let mut open = BinaryHeap::new();
        open.push(Reverse((
            OrderedFloat(self.heuristic_between(start_idx, goal_idx)),
            0usize,
        )));

        let mut expanded = 0usize;
        while let Some(Reverse((_, current))) = open.pop() {
            let Label {
                node,
                cost,
                time,
                dominated,
                ..
            } = labels[current];
            if dominated {
                continue;
            }
            if node == goal_idx {
                let path = reconstruct(&labels, current)
                    .into_iter()
                    .map(|idx| self.node(idx).key())
                    .collect();
                debug!(
                    "A* {start} -> {goal}: cost {cost:.2}, {expanded} labels expanded, {} created",
                    labels.len()
                );
                return Ok(PathResult { path, cost });
            }
            expanded += 1;

            for edge in self.edges(node) {
                let tentative = cost + edge.cost;
                let travel = self.distances().get(node, edge.to) / speed;
                let window = self.task_at(edge.to).time_window();
                let Some(arrival) = window.service_start(time + travel) else {
                    continue;
                };
                let live = &mut frontier[edge.to];
                if live
                    .iter()
                    .any(|&l| labels[l].cost <= tentative && labels[l].time <= arrival)
                {
                    continue;
                }
                live.retain(|&l| {
                    let beaten = labels[l].cost >= tentative && labels[l].time >= arrival;
                    if beaten {
                        labels[l].dominated = true;
                    }
                    !beaten
                });

                let id = labels.len();
                labels.push(Label {
                    node: edge.to,
                    cost: tentative,
                    time: arrival,
                    parent: Some(current),
                    dominated: false,
                });
                live.push(id);
                let f = tentative + self.heuristic_between(edge.to, goal_idx);
                open.push(Reverse((OrderedFloat(f), id)));
            }
        }

        debug!("A* {start} -> {goal}: unreachable after {expanded} expansions");
        Ok(PathResult::unreachable())
    }
}

/// A (cost, arrival) pair reached at a node along one partial path.
#[derive(Debug, Clone, Copy)]
struct Label {
    node: usize,
    cost: f64,
    time: f64,
    parent: Option<usize>,
    dominated: bool,
}

/// Walks parent labels back from `end`, returning node indices start-first.
fn reconstruct(labels: &[Label], end: usize) -> Vec<usize> {
    let mut path = vec![labels[end].node];
    let mut label = end;
    while let Some(prev) = labels[label].parent {
        path.push(labels[prev].node);
        label = prev;
    }
    path.reverse();
    path
}
