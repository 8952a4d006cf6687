//! Optimizer configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// Parameters of the genetic optimizer.
///
/// Deserializes from partial maps: missing fields take their defaults.
///
/// # Defaults
///
/// ```
/// use u_delivery::ga::OptimizerConfig;
///
/// let config = OptimizerConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.generations, 100);
/// assert_eq!(config.tournament_size, 3);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_delivery::ga::OptimizerConfig;
///
/// let config = OptimizerConfig::default()
///     .with_population_size(20)
///     .with_generations(30)
///     .with_weights(10.0, 0.5, 200.0)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Number of route sets per generation.
    pub population_size: usize,

    /// Number of generations to breed.
    pub generations: usize,

    /// Probability of recombining a selected pair (0.0–1.0).
    ///
    /// When crossover is not applied, the children are copies of the parents.
    pub crossover_rate: f64,

    /// Probability of mutating each child (0.0–1.0).
    pub mutation_rate: f64,

    /// Reward per delivered task.
    pub alpha: f64,

    /// Penalty per watt-hour consumed.
    pub beta: f64,

    /// Penalty per route cut short by a missed window.
    pub gamma: f64,

    /// Wind speed fed to the energy model.
    pub wind_speed: f64,

    /// Individuals drawn per tournament.
    pub tournament_size: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            crossover_rate: 0.8,
            mutation_rate: 0.2,
            alpha: 10.0,
            beta: 1.0,
            gamma: 100.0,
            wind_speed: 0.0,
            tournament_size: 3,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the fitness weights for deliveries, energy, and violations.
    pub fn with_weights(mut self, alpha: f64, beta: f64, gamma: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self.gamma = gamma;
        self
    }

    /// Sets the wind speed.
    pub fn with_wind_speed(mut self, wind_speed: f64) -> Self {
        self.wind_speed = wind_speed;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`RoutingError::InvalidArgument`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(invalid("population_size must be at least 1"));
        }
        if self.tournament_size == 0 {
            return Err(invalid("tournament_size must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(invalid("crossover_rate must lie in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(invalid("mutation_rate must lie in [0, 1]"));
        }
        let weights = [self.alpha, self.beta, self.gamma, self.wind_speed];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(invalid("alpha, beta, gamma and wind_speed must be finite"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> RoutingError {
    RoutingError::InvalidArgument(message.to_string())
}
