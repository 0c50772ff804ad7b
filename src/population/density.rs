// src/population/density.rs

//! Densities and the relay-count equation used to shape populations.

use crate::error::{HysteresisError, Result};
use statrs::distribution::{Continuous, Gamma};

const BISECTION_STEPS: usize = 100;
const GRID_EPSILON: f64 = 1e-9;

/// A gamma density parameterised by shape and scale.
#[derive(Debug, Clone)]
pub struct GammaDensity {
    inner: Gamma,
}

impl GammaDensity {
    pub fn new(shape: f64, scale: f64) -> Result<Self> {
        let inner = Gamma::new(shape, 1.0 / scale).map_err(|e| {
            HysteresisError::InvalidConfig(format!("gamma(shape {shape}, scale {scale}): {e}"))
        })?;
        Ok(Self { inner })
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if x <= 0.0 { 0.0 } else { self.inner.pdf(x) }
    }
}

/// Evenly spaced points from `start` to `end`, both included when the step lands on `end`.
pub fn grid(start: f64, end: f64, step: f64) -> Vec<f64> {
    let count = ((end - start) / step + GRID_EPSILON).floor() as usize;
    (0..=count).map(|i| start + i as f64 * step).collect()
}

/// Fraction of a layer's saturation reached by `relays` relay pairs when each
/// further pair contributes `e^{-decay}` times the previous one.
pub fn saturation_reached(decay: f64, relays: f64) -> f64 {
    1.0 - (-decay * relays).exp()
}

/// Relay pairs a layer needs to reach `saturation`.
///
/// Solves `saturation_reached(decay, n) = saturation` by bisection and rounds
/// up; the answer is clamped to `1..=max_relays`.
pub fn relay_count(decay: f64, saturation: f64, max_relays: usize) -> usize {
    let target = |n: f64| saturation_reached(decay, n) - saturation;
    let ceiling = max_relays as f64;
    if target(ceiling) < 0.0 {
        return max_relays;
    }

    let (mut low, mut high) = (0.0_f64, ceiling);
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (low + high);
        if target(mid) < 0.0 {
            low = mid;
        } else {
            high = mid;
        }
        if high - low < GRID_EPSILON {
            break;
        }
    }

    (high.ceil() as usize).clamp(1, max_relays)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_includes_both_ends() {
        assert_eq!(grid(1.0, 3.0, 1.0), vec![1.0, 2.0, 3.0]);
        assert_eq!(grid(0.0, 1.0, 0.4), vec![0.0, 0.4, 0.8]);
        assert_eq!(grid(0.0, 2.0, 0.1).len(), 21);
    }

    #[test]
    fn test_gamma_density_matches_closed_form() {
        // shape 2, scale 2: x e^{-x/2} / 4
        let density = GammaDensity::new(2.0, 2.0).unwrap();
        for x in [0.5_f64, 1.0, 4.0, 10.0] {
            assert_relative_eq!(density.pdf(x), x * (-x / 2.0).exp() / 4.0, epsilon = 1e-12);
        }
        assert_eq!(density.pdf(0.0), 0.0);
        assert_eq!(density.pdf(-1.0), 0.0);
    }

    #[test]
    fn test_gamma_density_rejects_bad_parameters() {
        assert!(GammaDensity::new(0.0, 1.0).is_err());
        assert!(GammaDensity::new(1.0, -1.0).is_err());
    }

    #[test]
    fn test_relay_count_matches_closed_form() {
        for (decay, saturation) in [(0.5, 0.95), (1.0, 0.5), (0.1, 0.9), (2.0, 0.99)] {
            let exact: f64 = -(1.0_f64 - saturation).ln() / decay;
            assert_eq!(relay_count(decay, saturation, 1_000), exact.ceil() as usize);
        }
    }

    #[test]
    fn test_relay_count_is_clamped() {
        assert_eq!(relay_count(1e-4, 0.95, 16), 16);
        assert_eq!(relay_count(50.0, 0.5, 16), 1);
    }

    #[test]
    fn test_relay_count_reaches_saturation() {
        let decay = 0.37;
        let n = relay_count(decay, 0.9, 1_000);
        assert!(saturation_reached(decay, n as f64) >= 0.9);
        assert!(saturation_reached(decay, (n - 1) as f64) < 0.9);
    }
}
