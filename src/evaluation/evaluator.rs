//! Route-set scoring: deliveries, payload energy, window violations, waiting.

use serde::{Deserialize, Serialize};

use super::RouteSimulator;
use crate::graph::TaskGraph;
use crate::models::RouteSet;

/// Summary metrics of a route set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Tasks served within their windows.
    pub delivered: usize,
    /// Sum of `distance × weight` over delivered legs.
    pub total_energy: f64,
    /// Routes cut short by a missed window.
    pub violations: usize,
    /// Mean waiting time per delivered task, 0 when nothing was delivered.
    pub average_wait: f64,
}

/// Scores a route set against a graph.
///
/// Every route is simulated with [`RouteSimulator`]; a route stops at its
/// first missed window, so each route contributes at most one violation.
/// Entries naming unknown agents or tasks are skipped.
///
/// # Examples
///
/// ```
/// use u_delivery::evaluation::evaluate;
/// use u_delivery::graph::TaskGraph;
/// use u_delivery::models::{Agent, RouteSet, Task};
/// use u_delivery::geometry::Point;
///
/// let agents = vec![Agent::new(1, 5.0, 10.0, Point::new(0.0, 0.0))];
/// let tasks = vec![Task::new(1, Point::new(30.0, 40.0), 2.0, 3, "09:00", "10:00").unwrap()];
/// let graph = TaskGraph::build(agents, tasks, vec![]).unwrap();
///
/// let mut routes = RouteSet::for_agents([1]);
/// routes.push(1, 1);
/// let report = evaluate(&routes, &graph);
/// assert_eq!(report.delivered, 1);
/// assert_eq!(report.violations, 0);
/// assert!((report.total_energy - 100.0).abs() < 1e-9);
/// ```
pub fn evaluate(routes: &RouteSet, graph: &TaskGraph) -> Evaluation {
    let sim = RouteSimulator::new(graph);
    let mut report = Evaluation::default();
    let mut total_wait = 0.0;

    for (agent, route) in routes.iter() {
        let mut energy = 0.0;
        let outcome = sim.simulate(agent, route, |leg| {
            energy += leg.distance * leg.task.weight();
        });
        report.delivered += outcome.delivered;
        report.violations += usize::from(outcome.violated);
        report.total_energy += energy;
        total_wait += outcome.wait;
    }

    if report.delivered > 0 {
        report.average_wait = total_wait / report.delivered as f64;
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::models::{Agent, Task};
    use proptest::prelude::*;

    fn setup() -> TaskGraph {
        let agents = vec![
            Agent::new(1, 5.0, 10.0, Point::new(0.0, 0.0)),
            Agent::new(2, 5.0, 10.0, Point::new(0.0, 0.0)),
        ];
        let tasks = vec![
            Task::new(1, Point::new(100.0, 0.0), 1.0, 3, "09:00", "10:00").expect("valid"),
            Task::new(2, Point::new(0.0, 100.0), 2.0, 3, "09:20", "10:00").expect("valid"),
            Task::new(3, Point::new(0.0, 500.0), 1.0, 3, "09:00", "09:10").expect("valid"),
        ];
        TaskGraph::build(agents, tasks, vec![]).expect("valid")
    }

    #[test]
    fn test_empty_route_set() {
        let g = setup();
        assert_eq!(evaluate(&RouteSet::new(), &g), Evaluation::default());
        assert_eq!(evaluate(&RouteSet::for_agents([1, 2]), &g), Evaluation::default());
    }

    #[test]
    fn test_two_agents() {
        let g = setup();
        let mut routes = RouteSet::for_agents([1, 2]);
        routes.push(1, 1);
        routes.push(2, 2);
        let report = evaluate(&routes, &g);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.violations, 0);
        // 100·1 + 100·2
        assert!((report.total_energy - 300.0).abs() < 1e-9);
        // agent 2 arrives 09:10, waits 10 minutes
        assert!((report.average_wait - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_violation_counts_once_per_route() {
        let g = setup();
        let mut routes = RouteSet::for_agents([1, 2]);
        routes.set_route(1, vec![3, 1, 2]);
        routes.set_route(2, vec![2]);
        let report = evaluate(&routes, &g);
        assert_eq!(report.violations, 1);
        assert_eq!(report.delivered, 1);
    }

    #[test]
    fn test_unknown_agent_skipped() {
        let g = setup();
        let mut routes = RouteSet::for_agents([7]);
        routes.push(7, 1);
        assert_eq!(evaluate(&routes, &g), Evaluation::default());
    }

    proptest! {
        #[test]
        fn prop_no_violation_iff_all_windows_met(
            order in Just(vec![1u32, 2, 3]).prop_shuffle(),
            split in 0usize..=3,
        ) {
            let g = setup();
            let mut routes = RouteSet::for_agents([1, 2]);
            routes.set_route(1, order[..split].to_vec());
            routes.set_route(2, order[split..].to_vec());

            let report = evaluate(&routes, &g);
            let mut all_met = true;
            for (agent, route) in routes.iter() {
                let a = g.agent(agent).expect("agent");
                let mut t = g.earliest_start();
                let mut pos = a.start_pos();
                for &id in route {
                    let task = g.task(id).expect("task");
                    let arrival = t + a.travel_time(pos.distance_to(&task.pos()));
                    if arrival > task.time_window().end() {
                        all_met = false;
                        break;
                    }
                    t = arrival.max(task.time_window().start());
                    pos = task.pos();
                }
            }
            prop_assert_eq!(report.violations == 0, all_met);
            prop_assert!(report.delivered <= 3);
        }
    }
}
