//! Route sets and task assignments.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{Agent, AgentId, TaskId};

/// The full solution artifact: an ordered task sequence per agent.
///
/// Agents are kept in ascending id order; each sequence is in visiting
/// order. A well-formed route set mentions each task at most once (see
/// [`RouteSet::is_exclusive`]).
///
/// # Examples
///
/// ```
/// use u_delivery::models::RouteSet;
///
/// let mut routes = RouteSet::for_agents([1, 2]);
/// routes.push(1, 10);
/// routes.push(1, 11);
/// assert_eq!(routes.route(1), &[10, 11]);
/// assert_eq!(routes.route(2), &[] as &[u32]);
/// assert_eq!(routes.num_served(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteSet {
    routes: BTreeMap<AgentId, Vec<TaskId>>,
}

impl RouteSet {
    /// Creates an empty route set with no agents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a route set with an empty route for each agent.
    pub fn for_agents(agents: impl IntoIterator<Item = AgentId>) -> Self {
        Self {
            routes: agents.into_iter().map(|id| (id, Vec::new())).collect(),
        }
    }

    /// The route of `agent`, empty if the agent has none.
    pub fn route(&self, agent: AgentId) -> &[TaskId] {
        self.routes.get(&agent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable access to the route of `agent`, if present.
    pub fn route_mut(&mut self, agent: AgentId) -> Option<&mut Vec<TaskId>> {
        self.routes.get_mut(&agent)
    }

    /// Replaces the route of `agent`.
    pub fn set_route(&mut self, agent: AgentId, route: Vec<TaskId>) {
        self.routes.insert(agent, route);
    }

    /// Appends `task` to the end of `agent`'s route.
    pub fn push(&mut self, agent: AgentId, task: TaskId) {
        self.routes.entry(agent).or_default().push(task);
    }

    /// Iterates `(agent, route)` pairs in agent id order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &[TaskId])> {
        self.routes.iter().map(|(&a, r)| (a, r.as_slice()))
    }

    /// Iterates mutable routes in agent id order.
    pub fn routes_mut(&mut self) -> impl Iterator<Item = (AgentId, &mut Vec<TaskId>)> {
        self.routes.iter_mut().map(|(&a, r)| (a, r))
    }

    /// Agent ids in order.
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.routes.keys().copied().collect()
    }

    /// Number of agents (including those with empty routes).
    pub fn num_agents(&self) -> usize {
        self.routes.len()
    }

    /// Total number of task visits across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    /// All `(agent, task)` pairs, in agent then visiting order.
    pub fn assigned_pairs(&self) -> Vec<(AgentId, TaskId)> {
        self.routes
            .iter()
            .flat_map(|(&a, r)| r.iter().map(move |&t| (a, t)))
            .collect()
    }

    /// Returns `true` if no task appears more than once.
    pub fn is_exclusive(&self) -> bool {
        let mut seen = HashSet::new();
        self.routes.values().flatten().all(|t| seen.insert(*t))
    }
}

/// The baseline solver's output: which agent serves each task.
///
/// # Examples
///
/// ```
/// use u_delivery::models::{Agent, Assignment};
/// use u_delivery::geometry::Point;
///
/// let agents = vec![
///     Agent::new(1, 5.0, 10.0, Point::new(0.0, 0.0)),
///     Agent::new(2, 5.0, 10.0, Point::new(0.0, 0.0)),
/// ];
/// let mut a = Assignment::new();
/// a.insert(7, 2);
/// let routes = a.to_route_set(&agents);
/// assert_eq!(routes.route(2), &[7]);
/// assert!(routes.route(1).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    tasks: BTreeMap<TaskId, AgentId>,
}

impl Assignment {
    /// Creates an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `task` to `agent`.
    pub fn insert(&mut self, task: TaskId, agent: AgentId) {
        self.tasks.insert(task, agent);
    }

    /// The agent serving `task`, if any.
    pub fn agent_for(&self, task: TaskId) -> Option<AgentId> {
        self.tasks.get(&task).copied()
    }

    /// Number of assigned tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if nothing is assigned.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates `(task, agent)` pairs in task id order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, AgentId)> + '_ {
        self.tasks.iter().map(|(&t, &a)| (t, a))
    }

    /// Converts to a route set holding a route (possibly empty) for every agent.
    pub fn to_route_set(&self, agents: &[Agent]) -> RouteSet {
        let mut routes = RouteSet::for_agents(agents.iter().map(Agent::id));
        for (task, agent) in self.iter() {
            routes.push(agent, task);
        }
        routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn test_route_set_empty() {
        let r = RouteSet::new();
        assert_eq!(r.num_agents(), 0);
        assert_eq!(r.num_served(), 0);
        assert!(r.route(1).is_empty());
        assert!(r.is_exclusive());
    }

    #[test]
    fn test_route_set_pairs_in_order() {
        let mut r = RouteSet::for_agents([2, 1]);
        r.set_route(2, vec![5, 3]);
        r.push(1, 9);
        assert_eq!(r.agent_ids(), vec![1, 2]);
        assert_eq!(r.assigned_pairs(), vec![(1, 9), (2, 5), (2, 3)]);
    }

    #[test]
    fn test_route_set_exclusive() {
        let mut r = RouteSet::for_agents([1, 2]);
        r.set_route(1, vec![1, 2]);
        r.set_route(2, vec![3]);
        assert!(r.is_exclusive());
        r.push(2, 1);
        assert!(!r.is_exclusive());
    }

    #[test]
    fn test_route_set_json_map() {
        let mut r = RouteSet::for_agents([1]);
        r.set_route(1, vec![4, 2]);
        let json = serde_json::to_string(&r).expect("serialize");
        assert_eq!(json, r#"{"1":[4,2]}"#);
        let back: RouteSet = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, r);
    }

    #[test]
    fn test_assignment_to_route_set() {
        let agents = vec![
            Agent::new(1, 5.0, 10.0, Point::default()),
            Agent::new(2, 5.0, 10.0, Point::default()),
            Agent::new(3, 5.0, 10.0, Point::default()),
        ];
        let mut a = Assignment::new();
        a.insert(10, 3);
        a.insert(11, 1);
        let r = a.to_route_set(&agents);
        assert_eq!(r.num_agents(), 3);
        assert_eq!(r.route(1), &[11]);
        assert!(r.route(2).is_empty());
        assert_eq!(r.route(3), &[10]);
        assert_eq!(a.agent_for(10), Some(3));
        assert_eq!(a.agent_for(12), None);
    }
}
