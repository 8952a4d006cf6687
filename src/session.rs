//! Planning requests and long-lived planning sessions.
//!
//! [`plan`] answers a one-shot [`PlanRequest`]. [`PlanningSession`] keeps a
//! graph alive across [`SessionCommand`]s so zones and tasks can change
//! between replans. Both shapes are serde types, so a transport layer can
//! map JSON messages onto them directly:
//!
//! ```text
//! {"action": "init",         "payload": {"agents": [...], "tasks": [...], "zones": [...]}}
//! {"action": "update_zones", "payload": [...]}
//! {"action": "new_task",     "payload": {...}}
//! {"action": "replan",       "payload": {"use_optimizer": true, "optimizer": {...}}}
//! ```

use log::info;
use serde::{Deserialize, Serialize};

use crate::constructive::AssignmentSolver;
use crate::error::{Result, RoutingError};
use crate::ga::{GeneticOptimizer, OptimizerConfig};
use crate::graph::TaskGraph;
use crate::models::{Agent, Assignment, RestrictedZone, RouteSet, Task};

/// A one-shot planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// The fleet.
    pub agents: Vec<Agent>,
    /// Deliveries to plan.
    pub tasks: Vec<Task>,
    /// Restricted zones.
    #[serde(default)]
    pub zones: Vec<RestrictedZone>,
    /// Run the greedy assignment solver.
    #[serde(default = "default_true")]
    pub use_assignment: bool,
    /// Run the genetic optimizer.
    #[serde(default)]
    pub use_optimizer: bool,
    /// Optimizer parameters; missing fields take their defaults.
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

fn default_true() -> bool {
    true
}

/// Output of a plan; absent parts were not requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Task → agent mapping from the assignment solver.
    pub assignment: Option<Assignment>,
    /// Route set from the genetic optimizer.
    pub routes: Option<RouteSet>,
    /// Fitness of `routes`.
    pub fitness: Option<f64>,
}

/// Builds a graph for `request` and runs the requested solvers.
///
/// # Errors
///
/// [`RoutingError::InvalidInstance`] for structurally invalid input and
/// [`RoutingError::InvalidArgument`] for an invalid optimizer configuration.
///
/// # Examples
///
/// ```
/// use u_delivery::session::{plan, PlanRequest};
///
/// let request: PlanRequest = serde_json::from_str(r#"{
///     "agents": [{"id": 1, "max_weight": 5.0, "speed": 10.0, "start_pos": [0, 0]}],
///     "tasks": [{"id": 7, "pos": [30, 40], "weight": 1.0, "priority": 3,
///                "time_window": ["09:00", "10:00"]}]
/// }"#).unwrap();
///
/// let response = plan(request).unwrap();
/// assert_eq!(response.assignment.unwrap().agent_for(7), Some(1));
/// assert!(response.routes.is_none());
/// ```
pub fn plan(request: PlanRequest) -> Result<PlanResponse> {
    let graph = TaskGraph::build(request.agents, request.tasks, request.zones)?;
    solve(
        &graph,
        request.use_assignment,
        request.use_optimizer.then_some(&request.optimizer),
    )
}

fn solve(
    graph: &TaskGraph,
    use_assignment: bool,
    optimizer: Option<&OptimizerConfig>,
) -> Result<PlanResponse> {
    let mut response = PlanResponse::default();
    if use_assignment {
        response.assignment = Some(AssignmentSolver::solve(graph)?);
    }
    if let Some(config) = optimizer {
        let result = GeneticOptimizer::run(graph, config)?;
        response.routes = Some(result.routes);
        response.fitness = Some(result.fitness);
    }
    Ok(response)
}

/// A command to a [`PlanningSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum SessionCommand {
    /// Replaces the whole instance.
    Init {
        /// Fleet to plan for.
        agents: Vec<Agent>,
        /// Deliveries to plan.
        tasks: Vec<Task>,
        /// Restricted zones; none when omitted.
        #[serde(default)]
        zones: Vec<RestrictedZone>,
    },
    /// Replaces every restricted zone.
    UpdateZones(Vec<RestrictedZone>),
    /// Adds one task.
    NewTask(Task),
    /// Runs the assignment solver and, if asked, the optimizer.
    Replan {
        /// Also run the genetic optimizer.
        #[serde(default)]
        use_optimizer: bool,
        /// Optimizer parameters; defaults for any omitted field.
        #[serde(default)]
        optimizer: OptimizerConfig,
    },
}

/// Acknowledgement of a [`SessionCommand`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionReply {
    /// The instance was loaded and the graph built.
    Initialized,
    /// The zone set was replaced.
    ZonesUpdated,
    /// The task was appended.
    TaskAdded,
    /// Result of a replan.
    Plan(PlanResponse),
}

/// Mutable planning state for one instance.
///
/// Commands take `&mut self`, so a rebuild can never overlap a solve on the
/// same session. Services sharing a session across threads wrap it in a
/// `Mutex`.
///
/// # Examples
///
/// ```
/// use u_delivery::session::{PlanningSession, SessionCommand, SessionReply};
/// use u_delivery::models::{Agent, Task};
/// use u_delivery::geometry::Point;
///
/// let mut session = PlanningSession::new();
/// session.handle(SessionCommand::Init {
///     agents: vec![Agent::new(1, 5.0, 10.0, Point::new(0.0, 0.0))],
///     tasks: vec![],
///     zones: vec![],
/// }).unwrap();
///
/// let task = Task::new(3, Point::new(10.0, 0.0), 1.0, 4, "09:00", "10:00").unwrap();
/// assert_eq!(session.handle(SessionCommand::NewTask(task)).unwrap(), SessionReply::TaskAdded);
///
/// let reply = session.handle(SessionCommand::Replan {
///     use_optimizer: false,
///     optimizer: Default::default(),
/// }).unwrap();
/// let SessionReply::Plan(response) = reply else { panic!("expected a plan") };
/// assert_eq!(response.assignment.unwrap().agent_for(3), Some(1));
/// ```
#[derive(Debug, Default)]
pub struct PlanningSession {
    graph: Option<TaskGraph>,
}

impl PlanningSession {
    /// Creates an uninitialised session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current graph, once initialised.
    pub fn graph(&self) -> Option<&TaskGraph> {
        self.graph.as_ref()
    }

    /// Applies one command.
    ///
    /// # Errors
    ///
    /// [`RoutingError::InvalidArgument`] for any command other than `Init`
    /// before initialisation; otherwise the errors of the underlying
    /// operation. A failed command leaves the session unchanged.
    pub fn handle(&mut self, command: SessionCommand) -> Result<SessionReply> {
        match command {
            SessionCommand::Init { agents, tasks, zones } => {
                let graph = TaskGraph::build(agents, tasks, zones)?;
                info!(
                    "session initialised: {} agents, {} tasks, {} zones",
                    graph.agents().len(),
                    graph.tasks().len(),
                    graph.zones().len()
                );
                self.graph = Some(graph);
                Ok(SessionReply::Initialized)
            }
            SessionCommand::UpdateZones(zones) => {
                let graph = self.graph_mut()?;
                graph.replace_zones(zones)?;
                info!("session zones replaced: {}", graph.zones().len());
                Ok(SessionReply::ZonesUpdated)
            }
            SessionCommand::NewTask(task) => {
                let id = task.id();
                self.graph_mut()?.add_task(task)?;
                info!("session task {id} added");
                Ok(SessionReply::TaskAdded)
            }
            SessionCommand::Replan { use_optimizer, optimizer } => {
                let graph = self.graph.as_ref().ok_or_else(not_initialised)?;
                let response = solve(graph, true, use_optimizer.then_some(&optimizer))?;
                Ok(SessionReply::Plan(response))
            }
        }
    }

    fn graph_mut(&mut self) -> Result<&mut TaskGraph> {
        self.graph.as_mut().ok_or_else(not_initialised)
    }
}

fn not_initialised() -> RoutingError {
    RoutingError::InvalidArgument("session is not initialised".to_string())
}
