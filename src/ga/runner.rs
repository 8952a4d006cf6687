//! Generational loop of the delivery optimizer.
//!
//! [`GeneticOptimizer`] drives a [`DeliveryGaProblem`]:
//! initialization → evaluation → tournament selection → crossover →
//! mutation → 2-opt → replace, for a fixed number of generations. There is
//! no survival of elites; the best route set seen in any generation is
//! tracked on the side and returned.

use log::{debug, info};
use rand::Rng;
use u_metaheur::ga::{GaProblem, Individual};
use u_numflow::random::create_rng;

use super::chromosome::RouteChromosome;
use super::config::OptimizerConfig;
use super::problem::DeliveryGaProblem;
use crate::error::Result;
use crate::graph::TaskGraph;
use crate::models::RouteSet;

/// Result of an optimizer run.
#[derive(Debug, Clone)]
pub struct OptimizerResult {
    /// The best route set found during the entire run.
    pub routes: RouteSet,

    /// Its delivery fitness (higher is better).
    pub fitness: f64,

    /// Number of generations bred.
    pub generations: usize,

    /// Best fitness so far after the initial population and after each generation.
    pub fitness_history: Vec<f64>,
}

/// Genetic optimizer over full route sets.
///
/// # Examples
///
/// ```
/// use u_delivery::ga::{GeneticOptimizer, OptimizerConfig};
/// use u_delivery::graph::TaskGraph;
/// use u_delivery::models::{Agent, Task};
/// use u_delivery::geometry::Point;
///
/// let agents = vec![Agent::new(1, 5.0, 100.0, Point::new(0.0, 0.0))];
/// let tasks = vec![
///     Task::new(1, Point::new(100.0, 0.0), 1.0, 3, "09:00", "10:00").unwrap(),
///     Task::new(2, Point::new(200.0, 0.0), 1.0, 3, "09:00", "10:00").unwrap(),
/// ];
/// let graph = TaskGraph::build(agents, tasks, vec![]).unwrap();
///
/// let config = OptimizerConfig::default()
///     .with_population_size(20)
///     .with_generations(20)
///     .with_seed(42);
/// let result = GeneticOptimizer::run(&graph, &config).unwrap();
/// assert!(result.routes.is_exclusive());
/// assert!(result.fitness > 0.0);
/// ```
pub struct GeneticOptimizer;

impl GeneticOptimizer {
    /// Runs the optimizer on `graph`.
    ///
    /// # Errors
    ///
    /// [`RoutingError::InvalidArgument`](crate::error::RoutingError::InvalidArgument)
    /// if `config` fails [`OptimizerConfig::validate`].
    pub fn run(graph: &TaskGraph, config: &OptimizerConfig) -> Result<OptimizerResult> {
        config.validate()?;
        let problem = DeliveryGaProblem::new(graph, config);

        if config.generations == 0 || graph.tasks().is_empty() {
            let routes = problem.empty_routes();
            let fitness = problem.fitness(&routes);
            return Ok(OptimizerResult {
                routes,
                fitness,
                generations: 0,
                fitness_history: vec![fitness],
            });
        }

        let mut rng = create_rng(config.seed.unwrap_or_else(rand::random));

        // 1. Initialize and evaluate
        let mut population: Vec<RouteChromosome> = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();
        evaluate_population(&problem, &mut population);

        // 2. Track best
        let mut best = find_best(&population).clone();
        let mut fitness_history = Vec::with_capacity(config.generations + 1);
        fitness_history.push(best.score());

        // 3. Evolutionary loop
        for gen in 0..config.generations {
            let mut next_gen: Vec<RouteChromosome> = Vec::with_capacity(config.population_size + 1);
            while next_gen.len() < config.population_size {
                let p1 = tournament(&population, config.tournament_size, &mut rng);
                let p2 = tournament(&population, config.tournament_size, &mut rng);

                let children = if rng.random_range(0.0..1.0) < config.crossover_rate {
                    problem.crossover(&population[p1], &population[p2], &mut rng)
                } else {
                    vec![population[p1].clone(), population[p2].clone()]
                };

                for mut child in children {
                    if rng.random_range(0.0..1.0) < config.mutation_rate {
                        problem.mutate(&mut child, &mut rng);
                    }
                    problem.improve(child.routes_mut());
                    next_gen.push(child);
                }
            }
            next_gen.truncate(config.population_size);

            population = next_gen;
            evaluate_population(&problem, &mut population);

            let gen_best = find_best(&population);
            if gen_best.fitness() < best.fitness() {
                best = gen_best.clone();
            }
            fitness_history.push(best.score());
            problem.on_generation(gen + 1, best.fitness());
        }

        let fitness = best.score();
        let routes = best.into_routes();
        info!(
            "optimizer: {} generations, best fitness {:.3}, {} of {} tasks routed",
            config.generations,
            fitness,
            routes.num_served(),
            graph.tasks().len()
        );
        Ok(OptimizerResult {
            routes,
            fitness,
            generations: config.generations,
            fitness_history,
        })
    }
}

/// Draws `min(k, n)` distinct individuals and returns the index of the best.
///
/// Ties go to the earliest drawn.
fn tournament<R: Rng>(population: &[RouteChromosome], k: usize, rng: &mut R) -> usize {
    let n = population.len();
    let k = k.clamp(1, n);
    let mut drawn = rand::seq::index::sample(rng, n, k).into_iter();
    let mut best_idx = drawn.next().unwrap_or(0);
    for idx in drawn {
        if population[idx].fitness() < population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}

fn evaluate_population(problem: &DeliveryGaProblem<'_>, population: &mut [RouteChromosome]) {
    for ind in population.iter_mut() {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    }
    debug!("evaluated {} route sets", population.len());
}

/// The individual with the lowest cost; the first one on ties.
fn find_best(population: &[RouteChromosome]) -> &RouteChromosome {
    population
        .iter()
        .skip(1)
        .fold(&population[0], |best, ind| {
            if ind.fitness() < best.fitness() {
                ind
            } else {
                best
            }
        })
}
