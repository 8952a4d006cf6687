//! Energy consumption model.
//!
//! # Model
//!
//! ```text
//! P_move  = P_hover + k_payload · weight + k_wind · |wind|     [W]
//! t       = distance / speed                                    [min] → hours
//! P_climb = g · weight · climb_rate / 3600
//! E       = P_move · t_h + P_climb · (elevation_gain / climb_rate)   [Wh]
//! ```
//!
//! Agent speed is in distance units per minute, matching the rest of the
//! crate. Only the wind speed and the climb rate are in m/s; they never
//! enter the travel-time term.

use serde::{Deserialize, Serialize};

/// Constants of the energy model.
///
/// # Examples
///
/// ```
/// use u_delivery::energy::EnergyModel;
///
/// let model = EnergyModel::default();
/// // 600 m at 600 m/min = 1 minute of flight with an empty hold
/// let e = model.energy(600.0, 0.0, 600.0, 0.0, 0.0);
/// assert!((e - 200.0 / 60.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyModel {
    /// Power drawn to stay airborne (W).
    pub hover_power: f64,
    /// Additional power per unit payload weight (W per kg).
    pub payload_coefficient: f64,
    /// Additional power per unit wind speed (W per m/s of wind, not agent speed).
    pub wind_coefficient: f64,
    /// Gravitational acceleration used for the climb term.
    pub gravity: f64,
    /// Vertical climb rate (m/s), used only by the climb term.
    pub climb_rate: f64,
}

impl Default for EnergyModel {
    fn default() -> Self {
        Self {
            hover_power: 200.0,
            payload_coefficient: 20.0,
            wind_coefficient: 50.0,
            gravity: 9.81,
            climb_rate: 1.0,
        }
    }
}

impl EnergyModel {
    /// Energy (Wh) to carry `weight` over `distance` at `speed`.
    ///
    /// `speed` is distance per minute; `wind_speed` is m/s and
    /// `elevation_gain` is metres.
    ///
    /// Returns infinity for a non-positive speed.
    pub fn energy(
        &self,
        distance: f64,
        weight: f64,
        speed: f64,
        wind_speed: f64,
        elevation_gain: f64,
    ) -> f64 {
        if speed <= 0.0 {
            return f64::INFINITY;
        }
        let move_power =
            self.hover_power + self.payload_coefficient * weight + self.wind_coefficient * wind_speed.abs();
        let hours = distance / speed / 60.0;
        let climb_power = self.gravity * weight * self.climb_rate / 3600.0;
        move_power * hours + climb_power * (elevation_gain / self.climb_rate)
    }
}

/// Energy (Wh) with the default model constants.
///
/// # Examples
///
/// ```
/// use u_delivery::energy::compute_energy;
///
/// let calm = compute_energy(1000.0, 2.0, 10.0, 0.0, 0.0);
/// let windy = compute_energy(1000.0, 2.0, 10.0, 5.0, 0.0);
/// assert!(windy > calm);
/// ```
pub fn compute_energy(
    distance: f64,
    weight: f64,
    speed: f64,
    wind_speed: f64,
    elevation_gain: f64,
) -> f64 {
    EnergyModel::default().energy(distance, weight, speed, wind_speed, elevation_gain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance_zero_energy() {
        assert_eq!(compute_energy(0.0, 3.0, 10.0, 4.0, 0.0), 0.0);
    }

    #[test]
    fn test_hover_only() {
        // 60 minutes of flight at hover power only = 200 Wh
        let e = compute_energy(600.0, 0.0, 10.0, 0.0, 0.0);
        assert!((e - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_payload_and_wind_terms() {
        // 1 hour, payload 2 → +40 W, wind -3 → +150 W
        let e = compute_energy(600.0, 2.0, 10.0, -3.0, 0.0);
        assert!((e - 390.0).abs() < 1e-9);
    }

    #[test]
    fn test_climb_term() {
        let flat = compute_energy(100.0, 2.0, 10.0, 0.0, 0.0);
        let climb = compute_energy(100.0, 2.0, 10.0, 0.0, 50.0);
        let expected = 9.81 * 2.0 / 3600.0 * 50.0;
        assert!((climb - flat - expected).abs() < 1e-12);
    }

    #[test]
    fn test_heavier_costs_more() {
        assert!(compute_energy(500.0, 3.0, 10.0, 0.0, 0.0) > compute_energy(500.0, 1.0, 10.0, 0.0, 0.0));
    }

    #[test]
    fn test_speed_is_per_minute_and_wind_per_second() {
        // 10 units at 10 units/min is one minute, whatever the wind
        let model = EnergyModel::default();
        let calm = model.energy(10.0, 0.0, 10.0, 0.0, 0.0);
        assert!((calm - 200.0 / 60.0).abs() < 1e-12);
        // 2 m/s of wind adds 100 W for that same minute
        let windy = model.energy(10.0, 0.0, 10.0, 2.0, 0.0);
        assert!((windy - calm - 100.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_speed() {
        assert_eq!(compute_energy(10.0, 1.0, 0.0, 0.0, 0.0), f64::INFINITY);
    }

    #[test]
    fn test_custom_constants() {
        let model = EnergyModel {
            hover_power: 100.0,
            ..EnergyModel::default()
        };
        let e = model.energy(600.0, 0.0, 10.0, 0.0, 0.0);
        assert!((e - 100.0).abs() < 1e-9);
    }
}
