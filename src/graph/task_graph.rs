//! Weighted task graph over agents and tasks.
//!
//! # Structure
//!
//! Nodes live in an arena: agents occupy indices `0..num_agents`, tasks
//! follow. Edges only point *into* task nodes; agent nodes are sources.
//! An agent→task edge exists only if the agent can carry the package.
//! Task→task edges carry no payload check (the previous package has been
//! delivered).
//!
//! Edge cost rewards short, heavy, high-priority pickups:
//!
//! ```text
//! cost(src, dst) = distance(src, dst) · dst.weight + (max_priority − dst.priority) · 100
//! ```
//!
//! The edge set is rebuilt in full whenever tasks or zones change.

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::{Result, RoutingError};
use crate::geometry::Point;
use crate::models::{Agent, AgentId, RestrictedZone, Task, TaskId, MAX_PRIORITY};
use crate::validation::validate_instance;

/// Heuristic penalty added once per restricted zone a straight leg crosses.
pub const ZONE_PENALTY: f64 = 10_000.0;

/// Priority weight in the edge cost.
const PRIORITY_COST: f64 = 100.0;

/// Stable key of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKey {
    /// An agent's start position.
    Agent(AgentId),
    /// A task's delivery position.
    Task(TaskId),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Agent(id) => write!(f, "agent_{id}"),
            NodeKey::Task(id) => write!(f, "task_{id}"),
        }
    }
}

/// A graph node: either an agent or a task.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// Agent node, positioned at the agent's start.
    Agent(&'a Agent),
    /// Task node, positioned at the delivery point.
    Task(&'a Task),
}

impl Node<'_> {
    /// Position of this node.
    pub fn position(&self) -> Point {
        match self {
            Node::Agent(a) => a.start_pos(),
            Node::Task(t) => t.pos(),
        }
    }

    /// Key of this node.
    pub fn key(&self) -> NodeKey {
        match self {
            Node::Agent(a) => NodeKey::Agent(a.id()),
            Node::Task(t) => NodeKey::Task(t.id()),
        }
    }
}

/// A directed edge into a task node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Arena index of the target task node.
    pub to: usize,
    /// Edge cost.
    pub cost: f64,
}

/// Directed weighted graph over one planning instance.
///
/// Built once per instance and shared by the solvers. Mutating operations
/// take `&mut self`, so no reader can observe a graph mid-rebuild.
///
/// # Examples
///
/// ```
/// use u_delivery::graph::{NodeKey, TaskGraph};
/// use u_delivery::models::{Agent, Task};
/// use u_delivery::geometry::Point;
///
/// let agents = vec![Agent::new(1, 2.0, 10.0, Point::new(0.0, 0.0))];
/// let tasks = vec![
///     Task::new(1, Point::new(30.0, 40.0), 1.0, 5, "09:00", "10:00").unwrap(),
///     Task::new(2, Point::new(60.0, 80.0), 3.0, 3, "09:00", "10:00").unwrap(),
/// ];
/// let graph = TaskGraph::build(agents, tasks, vec![]).unwrap();
///
/// // 50 · 1.0 + (5 − 5) · 100
/// let c = graph.edge_cost(NodeKey::Agent(1), NodeKey::Task(1)).unwrap();
/// assert!((c - 50.0).abs() < 1e-9);
/// // too heavy for the agent
/// assert_eq!(graph.edge_cost(NodeKey::Agent(1), NodeKey::Task(2)), None);
/// // task → task: 50 · 3.0 + (5 − 3) · 100
/// let c = graph.edge_cost(NodeKey::Task(1), NodeKey::Task(2)).unwrap();
/// assert!((c - 350.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct TaskGraph {
    agents: Vec<Agent>,
    tasks: Vec<Task>,
    zones: Vec<RestrictedZone>,
    index: HashMap<NodeKey, usize>,
    adjacency: Vec<Vec<Edge>>,
    distances: DistanceMatrix,
    earliest_start: f64,
    max_priority: u8,
}

impl TaskGraph {
    /// Validates the instance and builds the graph.
    ///
    /// Fails with [`RoutingError::InvalidInstance`] if the instance is
    /// structurally invalid.
    pub fn build(
        agents: Vec<Agent>,
        tasks: Vec<Task>,
        zones: Vec<RestrictedZone>,
    ) -> Result<Self> {
        validate_instance(&agents, &tasks, &zones).map_err(RoutingError::InvalidInstance)?;
        let mut graph = Self {
            agents,
            tasks,
            zones,
            index: HashMap::new(),
            adjacency: Vec::new(),
            distances: DistanceMatrix::from_points(&[]),
            earliest_start: 0.0,
            max_priority: MAX_PRIORITY,
        };
        graph.rebuild();
        Ok(graph)
    }

    /// Replaces every restricted zone and rebuilds the graph.
    pub fn replace_zones(&mut self, zones: Vec<RestrictedZone>) -> Result<()> {
        validate_instance(&self.agents, &self.tasks, &zones).map_err(RoutingError::InvalidInstance)?;
        self.zones = zones;
        self.rebuild();
        Ok(())
    }

    /// Appends a task and rebuilds the graph.
    pub fn add_task(&mut self, task: Task) -> Result<()> {
        let mut tasks = self.tasks.clone();
        tasks.push(task);
        validate_instance(&self.agents, &tasks, &self.zones).map_err(RoutingError::InvalidInstance)?;
        self.tasks = tasks;
        self.rebuild();
        Ok(())
    }

    /// Recomputes the node index, distances, and the full edge set.
    fn rebuild(&mut self) {
        let mut index = HashMap::with_capacity(self.agents.len() + self.tasks.len());
        let mut positions = Vec::with_capacity(self.agents.len() + self.tasks.len());
        for a in &self.agents {
            index.insert(NodeKey::Agent(a.id()), positions.len());
            positions.push(a.start_pos());
        }
        for t in &self.tasks {
            index.insert(NodeKey::Task(t.id()), positions.len());
            positions.push(t.pos());
        }
        self.index = index;
        self.distances = DistanceMatrix::from_points(&positions);
        self.earliest_start = self
            .tasks
            .iter()
            .map(|t| t.time_window().start())
            .reduce(f64::min)
            .unwrap_or(0.0);
        self.max_priority = self
            .tasks
            .iter()
            .map(Task::priority)
            .max()
            .unwrap_or(MAX_PRIORITY);

        let n = positions.len();
        let first_task = self.agents.len();
        let mut adjacency = vec![Vec::new(); n];
        for (src, edges) in adjacency.iter_mut().enumerate() {
            for dst in first_task..n {
                if src == dst {
                    continue;
                }
                let task = &self.tasks[dst - first_task];
                if src < first_task && !self.agents[src].can_carry(task.weight()) {
                    continue;
                }
                let cost = self.distances.get(src, dst) * task.weight()
                    + f64::from(self.max_priority - task.priority()) * PRIORITY_COST;
                edges.push(Edge { to: dst, cost });
            }
        }
        self.adjacency = adjacency;
        debug!(
            "task graph rebuilt: {} agents, {} tasks, {} zones, {} edges",
            self.agents.len(),
            self.tasks.len(),
            self.zones.len(),
            self.num_edges()
        );
    }

    /// All agents, in arena order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// All tasks, in arena order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// All restricted zones.
    pub fn zones(&self) -> &[RestrictedZone] {
        &self.zones
    }

    /// Looks up an agent by ID.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agent_node(id).map(|i| &self.agents[i])
    }

    /// Looks up a task by ID.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.task_node(id).map(|i| self.task_at(i))
    }

    /// Arena index of a node.
    pub fn node_index(&self, key: NodeKey) -> Option<usize> {
        self.index.get(&key).copied()
    }

    /// Arena index of an agent's node.
    pub fn agent_node(&self, id: AgentId) -> Option<usize> {
        self.node_index(NodeKey::Agent(id))
    }

    /// Arena index of a task's node.
    pub fn task_node(&self, id: TaskId) -> Option<usize> {
        self.node_index(NodeKey::Task(id))
    }

    /// The node at an arena index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    pub fn node(&self, idx: usize) -> Node<'_> {
        if idx < self.agents.len() {
            Node::Agent(&self.agents[idx])
        } else {
            Node::Task(self.task_at(idx))
        }
    }

    /// The task behind a task node index.
    pub(crate) fn task_at(&self, idx: usize) -> &Task {
        &self.tasks[idx - self.agents.len()]
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.agents.len() + self.tasks.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Outgoing edges of the node at `idx`.
    pub fn edges(&self, idx: usize) -> &[Edge] {
        &self.adjacency[idx]
    }

    /// Cost of the edge `from → to`, if it exists.
    pub fn edge_cost(&self, from: NodeKey, to: NodeKey) -> Option<f64> {
        let from = self.node_index(from)?;
        let to = self.node_index(to)?;
        self.adjacency[from]
            .iter()
            .find(|e| e.to == to)
            .map(|e| e.cost)
    }

    /// Euclidean distances between arena nodes.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Earliest window start across all tasks (0 when there are none).
    pub fn earliest_start(&self) -> f64 {
        self.earliest_start
    }

    /// Highest task priority ([`MAX_PRIORITY`] when there are no tasks).
    pub fn max_priority(&self) -> u8 {
        self.max_priority
    }

    /// A* heuristic between two nodes.
    ///
    /// Straight-line distance plus [`ZONE_PENALTY`] for every zone the
    /// straight leg crosses. The penalty makes the estimate inadmissible
    /// whenever it exceeds the true remaining cost; the search accepts this
    /// in exchange for a strong bias away from restricted zones.
    pub fn heuristic(&self, from: NodeKey, to: NodeKey) -> Result<f64> {
        let from = self
            .node_index(from)
            .ok_or_else(|| RoutingError::InvalidArgument(format!("unknown node {from}")))?;
        let to = self
            .node_index(to)
            .ok_or_else(|| RoutingError::InvalidArgument(format!("unknown node {to}")))?;
        Ok(self.heuristic_between(from, to))
    }

    pub(crate) fn heuristic_between(&self, from: usize, to: usize) -> f64 {
        let a = self.node(from).position();
        let b = self.node(to).position();
        let crossings = self.zones.iter().filter(|z| z.blocks(a, b)).count();
        self.distances.get(from, to) + ZONE_PENALTY * crossings as f64
    }
}
