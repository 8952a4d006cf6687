//! Route-set chromosome.
//!
//! An individual is a complete [`RouteSet`]: one ordered task list per
//! agent, with each task in at most one list. Tasks absent from every list
//! are unassigned.

use u_metaheur::ga::Individual;

use crate::models::RouteSet;

/// A route set carrying its GA cost.
///
/// The GA framework minimizes, so the stored value is the negated delivery
/// fitness; [`score`](RouteChromosome::score) returns the fitness itself.
///
/// # Examples
///
/// ```
/// use u_delivery::ga::RouteChromosome;
/// use u_delivery::models::RouteSet;
/// use u_metaheur::ga::Individual;
///
/// let mut ind = RouteChromosome::new(RouteSet::for_agents([1, 2]));
/// assert_eq!(ind.fitness(), f64::INFINITY);
/// ind.set_fitness(-30.0);
/// assert_eq!(ind.score(), 30.0);
/// ```
#[derive(Debug, Clone)]
pub struct RouteChromosome {
    routes: RouteSet,
    cost: f64,
}

impl RouteChromosome {
    /// Wraps a route set, not yet evaluated.
    pub fn new(routes: RouteSet) -> Self {
        Self {
            routes,
            cost: f64::INFINITY,
        }
    }

    /// The encoded route set.
    pub fn routes(&self) -> &RouteSet {
        &self.routes
    }

    /// Mutable access to the encoded route set.
    pub fn routes_mut(&mut self) -> &mut RouteSet {
        &mut self.routes
    }

    /// Consumes the chromosome, returning its route set.
    pub fn into_routes(self) -> RouteSet {
        self.routes
    }

    /// Delivery fitness (higher is better).
    pub fn score(&self) -> f64 {
        -self.cost
    }
}

impl Individual for RouteChromosome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.cost
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.cost = fitness;
    }
}
