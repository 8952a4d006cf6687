//! Forward-time simulation of one agent's route.

use log::warn;

use crate::graph::TaskGraph;
use crate::models::{AgentId, Task, TaskId};

/// One delivered leg of a simulated route.
#[derive(Debug, Clone, Copy)]
pub struct Leg<'g> {
    /// The task served at the end of the leg.
    pub task: &'g Task,
    /// Straight-line distance flown.
    pub distance: f64,
    /// Arrival time before any waiting, in minutes past midnight.
    pub arrival: f64,
    /// Minutes spent waiting for the window to open.
    pub wait: f64,
}

/// Totals of a simulated route.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RouteOutcome {
    /// Tasks served before the route ended.
    pub delivered: usize,
    /// Whether the route stopped at a task whose window had closed.
    pub violated: bool,
    /// Distance over the delivered legs.
    pub distance: f64,
    /// Waiting time over the delivered legs.
    pub wait: f64,
}

/// Walks routes forward in time over a [`TaskGraph`].
///
/// Every agent departs from its start position at the graph's earliest
/// window start. Each task is reached at `time + distance / speed`; early
/// arrivals wait for the window to open, and the first arrival after a
/// window end counts as a violation and ends that route. Capacity is not
/// checked here.
///
/// # Examples
///
/// ```
/// use u_delivery::evaluation::RouteSimulator;
/// use u_delivery::graph::TaskGraph;
/// use u_delivery::models::{Agent, Task};
/// use u_delivery::geometry::Point;
///
/// let agents = vec![Agent::new(1, 5.0, 10.0, Point::new(0.0, 0.0))];
/// let tasks = vec![
///     Task::new(1, Point::new(100.0, 0.0), 2.0, 3, "09:00", "10:00").unwrap(),
///     Task::new(2, Point::new(100.0, 50.0), 1.0, 3, "09:00", "09:05").unwrap(),
/// ];
/// let graph = TaskGraph::build(agents, tasks, vec![]).unwrap();
///
/// let sim = RouteSimulator::new(&graph);
/// let outcome = sim.simulate(1, &[1, 2], |_| {});
/// assert_eq!(outcome.delivered, 1);
/// assert!(outcome.violated);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteSimulator<'g> {
    graph: &'g TaskGraph,
    start_time: f64,
}

impl<'g> RouteSimulator<'g> {
    /// Creates a simulator starting every agent at the graph's earliest window start.
    pub fn new(graph: &'g TaskGraph) -> Self {
        Self {
            graph,
            start_time: graph.earliest_start(),
        }
    }

    /// Departure time shared by all agents.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Simulates `route` for `agent`, calling `on_leg` for each delivered task.
    ///
    /// Unknown agents yield an empty outcome; unknown tasks are skipped.
    pub fn simulate<F>(&self, agent: AgentId, route: &[TaskId], mut on_leg: F) -> RouteOutcome
    where
        F: FnMut(&Leg<'g>),
    {
        let mut outcome = RouteOutcome::default();
        let (Some(agent_idx), Some(profile)) = (self.graph.agent_node(agent), self.graph.agent(agent))
        else {
            if !route.is_empty() {
                warn!("route for unknown agent {agent} ignored");
            }
            return outcome;
        };

        let distances = self.graph.distances();
        let mut time = self.start_time;
        let mut prev = agent_idx;
        for &id in route {
            let (Some(idx), Some(task)) = (self.graph.task_node(id), self.graph.task(id)) else {
                warn!("unknown task {id} in route of agent {agent} skipped");
                continue;
            };
            let distance = distances.get(prev, idx);
            let arrival = time + profile.travel_time(distance);
            let window = task.time_window();
            let Some(service) = window.service_start(arrival) else {
                outcome.violated = true;
                break;
            };
            let leg = Leg {
                task,
                distance,
                arrival,
                wait: service - arrival,
            };
            on_leg(&leg);
            outcome.delivered += 1;
            outcome.distance += distance;
            outcome.wait += leg.wait;
            time = service;
            prev = idx;
        }
        outcome
    }
}
