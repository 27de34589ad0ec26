use twine_solvers::equation::bisection;
use uom::si::{f64::Velocity, velocity::meter_per_second};

/// Solver configuration for the pressure-loss-limited velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VelocitySolverConfig {
    /// Starting velocity used to narrow the search bracket during a catalog sweep.
    pub initial_guess: Velocity,

    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on the velocity search variable.
    pub velocity_tol: Velocity,

    /// Absolute tolerance on the velocity residual.
    pub residual_tol: Velocity,
}

impl Default for VelocitySolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: Velocity::new::<meter_per_second>(0.5),
            max_iters: 100,
            velocity_tol: Velocity::new::<meter_per_second>(1e-12),
            residual_tol: Velocity::new::<meter_per_second>(1e-12),
        }
    }
}

impl VelocitySolverConfig {
    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.velocity_tol.get::<meter_per_second>(),
            x_rel_tol: 0.0,
            residual_tol: self.residual_tol.get::<meter_per_second>(),
        }
    }
}
