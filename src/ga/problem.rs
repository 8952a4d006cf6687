//! GA problem definition for fleet delivery.
//!
//! Implements the [`GaProblem`](u_metaheur::ga::GaProblem) trait over
//! [`RouteChromosome`]s.
//!
//! # Operators
//!
//! - **Initialization**: each task goes to a random capacity-eligible agent
//!   or stays unassigned (uniform), then every route is shuffled
//! - **Crossover**: per-agent uniform exchange of whole routes, then a repair
//!   pass keeping only the first occurrence of each task
//! - **Mutation**: one assigned task moves to a random agent (capacity
//!   ignored) or is dropped
//! - **Evaluation**: forward simulation, `α·delivered − β·energy − γ·violations`
//! - **Local search**: 2-opt on every route longer than two tasks

use std::collections::HashSet;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use u_metaheur::ga::{GaProblem, Individual};

use super::chromosome::RouteChromosome;
use super::config::OptimizerConfig;
use crate::energy::EnergyModel;
use crate::evaluation::RouteSimulator;
use crate::graph::TaskGraph;
use crate::local_search::two_opt_improve;
use crate::models::{Agent, AgentId, RouteSet, TaskId};

/// GA problem over route sets of one task graph.
///
/// # Examples
///
/// ```
/// use u_delivery::ga::{DeliveryGaProblem, OptimizerConfig};
/// use u_delivery::graph::TaskGraph;
/// use u_delivery::models::{Agent, RouteSet, Task};
/// use u_delivery::geometry::Point;
///
/// let agents = vec![Agent::new(1, 5.0, 600.0, Point::new(0.0, 0.0))];
/// let tasks = vec![Task::new(1, Point::new(600.0, 0.0), 1.0, 3, "09:00", "10:00").unwrap()];
/// let graph = TaskGraph::build(agents, tasks, vec![]).unwrap();
/// let problem = DeliveryGaProblem::new(&graph, &OptimizerConfig::default());
///
/// let mut routes = RouteSet::for_agents([1]);
/// routes.push(1, 1);
/// // one delivery (+10) minus one minute of flight at 220 W
/// let expected = 10.0 - 220.0 / 60.0;
/// assert!((problem.fitness(&routes) - expected).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct DeliveryGaProblem<'g> {
    graph: &'g TaskGraph,
    energy: EnergyModel,
    alpha: f64,
    beta: f64,
    gamma: f64,
    wind_speed: f64,
    apply_local_search: bool,
}

impl<'g> DeliveryGaProblem<'g> {
    /// Creates the problem with the weights and wind speed of `config`.
    pub fn new(graph: &'g TaskGraph, config: &OptimizerConfig) -> Self {
        Self {
            graph,
            energy: EnergyModel::default(),
            alpha: config.alpha,
            beta: config.beta,
            gamma: config.gamma,
            wind_speed: config.wind_speed,
            apply_local_search: true,
        }
    }

    /// Replaces the energy model constants.
    pub fn with_energy_model(mut self, energy: EnergyModel) -> Self {
        self.energy = energy;
        self
    }

    /// Disables 2-opt in [`improve`](Self::improve).
    pub fn without_local_search(mut self) -> Self {
        self.apply_local_search = false;
        self
    }

    /// The graph this problem plans over.
    pub fn graph(&self) -> &'g TaskGraph {
        self.graph
    }

    /// A route set with an empty route for every agent.
    pub fn empty_routes(&self) -> RouteSet {
        RouteSet::for_agents(self.graph.agents().iter().map(Agent::id))
    }

    /// Delivery fitness of a route set (higher is better).
    ///
    /// Each route is simulated from the earliest window start; the first
    /// missed window counts as a violation and ends the route. Capacity is
    /// not re-checked.
    pub fn fitness(&self, routes: &RouteSet) -> f64 {
        let sim = RouteSimulator::new(self.graph);
        let mut delivered = 0usize;
        let mut violations = 0usize;
        let mut consumed = 0.0;

        for (agent_id, route) in routes.iter() {
            let Some(agent) = self.graph.agent(agent_id) else {
                continue;
            };
            let outcome = sim.simulate(agent_id, route, |leg| {
                consumed += self.energy.energy(
                    leg.distance,
                    leg.task.weight(),
                    agent.speed(),
                    self.wind_speed,
                    0.0,
                );
            });
            delivered += outcome.delivered;
            violations += usize::from(outcome.violated);
        }

        self.alpha * delivered as f64 - self.beta * consumed - self.gamma * violations as f64
    }

    /// Applies 2-opt to every route longer than two tasks.
    pub fn improve(&self, routes: &mut RouteSet) {
        if !self.apply_local_search {
            return;
        }
        for (agent_id, route) in routes.routes_mut() {
            if route.len() <= 2 {
                continue;
            }
            let Some(origin) = self.graph.agent_node(agent_id) else {
                continue;
            };
            let Some(nodes) = route
                .iter()
                .map(|&id| self.graph.task_node(id))
                .collect::<Option<Vec<usize>>>()
            else {
                continue;
            };
            let (improved, _) = two_opt_improve(&nodes, origin, self.graph.distances());
            *route = improved
                .into_iter()
                .map(|idx| self.graph.task_at(idx).id())
                .collect();
        }
    }

    fn agent_ids(&self) -> Vec<AgentId> {
        self.graph.agents().iter().map(Agent::id).collect()
    }
}

/// Drops every task already seen in an earlier route, scanning agents in id order.
fn repair(routes: &mut RouteSet) {
    let mut seen: HashSet<TaskId> = HashSet::new();
    for (_, route) in routes.routes_mut() {
        route.retain(|&task| seen.insert(task));
    }
}

impl GaProblem for DeliveryGaProblem<'_> {
    type Individual = RouteChromosome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> RouteChromosome {
        let mut routes = self.empty_routes();
        for task in self.graph.tasks() {
            let eligible: Vec<AgentId> = self
                .graph
                .agents()
                .iter()
                .filter(|a| a.can_carry(task.weight()))
                .map(Agent::id)
                .collect();
            // index == eligible.len() leaves the task unassigned
            let pick = rng.random_range(0..=eligible.len());
            if let Some(&agent) = eligible.get(pick) {
                routes.push(agent, task.id());
            }
        }
        for (_, route) in routes.routes_mut() {
            route.shuffle(rng);
        }
        RouteChromosome::new(routes)
    }

    fn evaluate(&self, individual: &RouteChromosome) -> f64 {
        -self.fitness(individual.routes())
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &RouteChromosome,
        parent2: &RouteChromosome,
        rng: &mut R,
    ) -> Vec<RouteChromosome> {
        let mut child1 = self.empty_routes();
        let mut child2 = self.empty_routes();
        for agent in self.agent_ids() {
            let a = parent1.routes().route(agent).to_vec();
            let b = parent2.routes().route(agent).to_vec();
            if rng.random_bool(0.5) {
                child1.set_route(agent, a);
                child2.set_route(agent, b);
            } else {
                child1.set_route(agent, b);
                child2.set_route(agent, a);
            }
        }
        repair(&mut child1);
        repair(&mut child2);
        vec![RouteChromosome::new(child1), RouteChromosome::new(child2)]
    }

    fn mutate<R: Rng>(&self, individual: &mut RouteChromosome, rng: &mut R) {
        let pairs = individual.routes().assigned_pairs();
        if pairs.is_empty() {
            return;
        }
        let (from, task) = pairs[rng.random_range(0..pairs.len())];
        if let Some(route) = individual.routes_mut().route_mut(from) {
            route.retain(|&t| t != task);
        }
        let agents = self.agent_ids();
        // index == agents.len() leaves the task unassigned
        let pick = rng.random_range(0..=agents.len());
        if let Some(&to) = agents.get(pick) {
            individual.routes_mut().push(to, task);
        }
        individual.set_fitness(f64::INFINITY);
    }

    fn on_generation(&self, generation: usize, best_fitness: f64) {
        debug!("generation {generation}: best fitness {:.3}", -best_fitness);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::models::Task;

    fn setup() -> TaskGraph {
        let agents = vec![
            Agent::new(1, 2.0, 10.0, Point::new(0.0, 0.0)),
            Agent::new(2, 5.0, 10.0, Point::new(0.0, 0.0)),
        ];
        let tasks = vec![
            Task::new(1, Point::new(10.0, 0.0), 1.0, 3, "09:00", "12:00").expect("valid"),
            Task::new(2, Point::new(20.0, 0.0), 4.0, 3, "09:00", "12:00").expect("valid"),
            Task::new(3, Point::new(30.0, 0.0), 1.0, 3, "09:00", "12:00").expect("valid"),
            Task::new(4, Point::new(40.0, 0.0), 1.0, 3, "09:00", "12:00").expect("valid"),
        ];
        TaskGraph::build(agents, tasks, vec![]).expect("valid")
    }

    #[test]
    fn test_create_individual_respects_capacity() {
        let g = setup();
        let problem = DeliveryGaProblem::new(&g, &OptimizerConfig::default());
        let mut rng = u_numflow::random::create_rng(42);
        for _ in 0..50 {
            let ind = problem.create_individual(&mut rng);
            assert!(ind.routes().is_exclusive());
            assert_eq!(ind.routes().agent_ids(), vec![1, 2]);
            // task 2 weighs 4, only agent 2 can lift it
            assert!(!ind.routes().route(1).contains(&2));
        }
    }

    #[test]
    fn test_fitness_of_empty_routes_is_zero() {
        let g = setup();
        let problem = DeliveryGaProblem::new(&g, &OptimizerConfig::default());
        assert_eq!(problem.fitness(&problem.empty_routes()), 0.0);
    }

    #[test]
    fn test_fitness_penalizes_violation() {
        let agents = vec![Agent::new(1, 5.0, 1.0, Point::new(0.0, 0.0))];
        let tasks = vec![
            Task::new(1, Point::new(100.0, 0.0), 1.0, 3, "09:00", "09:30").expect("valid"),
        ];
        let g = TaskGraph::build(agents, tasks, vec![]).expect("valid");
        let problem = DeliveryGaProblem::new(&g, &OptimizerConfig::default());
        let mut routes = problem.empty_routes();
        routes.push(1, 1);
        assert_eq!(problem.fitness(&routes), -100.0);
    }

    #[test]
    fn test_wind_lowers_fitness() {
        let g = setup();
        let calm = DeliveryGaProblem::new(&g, &OptimizerConfig::default());
        let windy = DeliveryGaProblem::new(&g, &OptimizerConfig::default().with_wind_speed(5.0));
        let mut routes = calm.empty_routes();
        routes.set_route(2, vec![1, 2]);
        assert!(windy.fitness(&routes) < calm.fitness(&routes));
    }

    #[test]
    fn test_evaluate_is_negated_fitness() {
        let g = setup();
        let problem = DeliveryGaProblem::new(&g, &OptimizerConfig::default());
        let mut routes = problem.empty_routes();
        routes.set_route(2, vec![1]);
        let ind = RouteChromosome::new(routes.clone());
        assert_eq!(problem.evaluate(&ind), -problem.fitness(&routes));
    }

    #[test]
    fn test_crossover_children_are_exclusive() {
        let g = setup();
        let problem = DeliveryGaProblem::new(&g, &OptimizerConfig::default());
        let mut a = problem.empty_routes();
        a.set_route(1, vec![1, 3]);
        a.set_route(2, vec![2, 4]);
        let mut b = problem.empty_routes();
        b.set_route(1, vec![4]);
        b.set_route(2, vec![3, 1, 2]);
        let p1 = RouteChromosome::new(a);
        let p2 = RouteChromosome::new(b);

        let mut rng = u_numflow::random::create_rng(7);
        for _ in 0..30 {
            let children = problem.crossover(&p1, &p2, &mut rng);
            assert_eq!(children.len(), 2);
            for child in &children {
                assert!(child.routes().is_exclusive());
                assert_eq!(child.routes().num_agents(), 2);
            }
        }
    }

    #[test]
    fn test_repair_keeps_first_occurrence() {
        let mut routes = RouteSet::for_agents([1, 2]);
        routes.set_route(1, vec![3, 1]);
        routes.set_route(2, vec![1, 2, 3]);
        repair(&mut routes);
        assert_eq!(routes.route(1), &[3, 1]);
        assert_eq!(routes.route(2), &[2]);
    }

    #[test]
    fn test_mutate_moves_at_most_one_task() {
        let g = setup();
        let problem = DeliveryGaProblem::new(&g, &OptimizerConfig::default());
        let mut rng = u_numflow::random::create_rng(3);
        let mut routes = problem.empty_routes();
        routes.set_route(1, vec![1, 3]);
        routes.set_route(2, vec![2, 4]);
        for _ in 0..30 {
            let mut ind = RouteChromosome::new(routes.clone());
            problem.mutate(&mut ind, &mut rng);
            assert!(ind.routes().is_exclusive());
            let served = ind.routes().num_served();
            assert!(served == 3 || served == 4);
        }
    }

    #[test]
    fn test_mutate_empty_is_noop() {
        let g = setup();
        let problem = DeliveryGaProblem::new(&g, &OptimizerConfig::default());
        let mut rng = u_numflow::random::create_rng(3);
        let mut ind = RouteChromosome::new(problem.empty_routes());
        problem.mutate(&mut ind, &mut rng);
        assert_eq!(ind.routes().num_served(), 0);
    }

    #[test]
    fn test_improve_orders_line() {
        let g = setup();
        let problem = DeliveryGaProblem::new(&g, &OptimizerConfig::default());
        let mut routes = problem.empty_routes();
        routes.set_route(2, vec![4, 1, 3, 2]);
        routes.set_route(1, vec![3, 1]);
        problem.improve(&mut routes);
        assert_eq!(routes.route(2), &[1, 2, 3, 4]);
        // two-task routes are left alone
        assert_eq!(routes.route(1), &[3, 1]);
    }

    #[test]
    fn test_without_local_search() {
        let g = setup();
        let problem = DeliveryGaProblem::new(&g, &OptimizerConfig::default()).without_local_search();
        let mut routes = problem.empty_routes();
        routes.set_route(2, vec![4, 1, 3]);
        problem.improve(&mut routes);
        assert_eq!(routes.route(2), &[4, 1, 3]);
    }
}
