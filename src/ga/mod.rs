//! Genetic algorithm over full route sets.
//!
//! - [`RouteChromosome`]: Route-set individual
//! - [`DeliveryGaProblem`]: [`GaProblem`](u_metaheur::ga::GaProblem) implementation
//! - [`OptimizerConfig`]: Population, operator rates, fitness weights
//! - [`GeneticOptimizer`]: Generational loop with tournament selection and 2-opt

mod chromosome;
mod config;
mod problem;
mod runner;

pub use chromosome::RouteChromosome;
pub use config::OptimizerConfig;
pub use problem::DeliveryGaProblem;
pub use runner::{GeneticOptimizer, OptimizerResult};
