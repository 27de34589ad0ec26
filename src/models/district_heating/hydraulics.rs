//! Pipe hydraulics: friction and the pressure-loss-limited flow velocity.
//!
//! Pipes are sized against a specific pressure loss budget (Pa per metre).
//! The Darcy–Weisbach equation gives the pressure gradient of a turbulent
//! flow,
//!
//! ```text
//! Δp/L = f · ρ · v² / (2 · d)
//! ```
//!
//! with the friction factor `f` from the explicit Haaland approximation of
//! the Colebrook equation. Because `f` depends on the velocity through the
//! Reynolds number, the velocity that uses up the budget exactly is found
//! iteratively.

mod config;
mod problem;

pub use config::VelocitySolverConfig;

use twine_core::Model;
use twine_solvers::equation::bisection;
use uom::si::{
    f64::{Length, Velocity},
    ratio::ratio,
    velocity::meter_per_second,
};

use crate::support::{constraint::StrictlyPositive, units::SpecificPressureLoss};

use super::{ConvergenceError, DomainError, FluidProperties, PrecalcError};

use problem::{MaxVelocityProblem, PipeFlowModel};

/// Reynolds number below which pipe flow is not treated as turbulent.
pub const TURBULENT_REYNOLDS: f64 = 2300.0;

/// Returns the Reynolds number `ρ·v·d/μ`.
#[must_use]
pub fn reynolds_number(fluid: &FluidProperties, velocity: Velocity, diameter: Length) -> f64 {
    (fluid.density() * velocity * diameter / fluid.dynamic_viscosity()).get::<ratio>()
}

/// Returns the Darcy friction factor from the Haaland equation.
///
/// `relative_roughness` is the absolute roughness divided by the inner diameter.
/// The approximation is only meaningful for turbulent flow.
#[must_use]
pub fn haaland_friction_factor(reynolds: f64, relative_roughness: f64) -> f64 {
    let argument = (relative_roughness / 3.7).powf(1.11) + 6.9 / reynolds;
    (-1.8 * argument.log10()).powi(-2)
}

/// Returns the Darcy–Weisbach pressure gradient at the given velocity.
#[must_use]
pub fn specific_pressure_loss(
    fluid: &FluidProperties,
    diameter: Length,
    roughness: Length,
    velocity: Velocity,
) -> SpecificPressureLoss {
    let reynolds = reynolds_number(fluid, velocity, diameter);
    let friction_factor = haaland_friction_factor(reynolds, (roughness / diameter).get::<ratio>());
    fluid.density() * velocity * velocity / diameter * (0.5 * friction_factor)
}

/// Returns the velocity at which turbulent flow produces exactly
/// `max_pressure_loss`.
///
/// The root is bracketed between the turbulent onset velocity
/// ([`TURBULENT_REYNOLDS`]) and the velocity the fully rough friction factor
/// would allow, which bounds the root from above. `initial_guess` narrows
/// that bracket when it falls inside it. No retry with other guesses is made.
///
/// # Errors
///
/// Returns [`DomainError`] if the guess, diameter, roughness, or pressure
/// loss is not strictly positive, and [`ConvergenceError`] if the target is
/// unreachable in turbulent flow or the solver does not converge within
/// `config`.
pub fn max_flow_velocity(
    initial_guess: Velocity,
    diameter: Length,
    roughness: Length,
    max_pressure_loss: SpecificPressureLoss,
    fluid: &FluidProperties,
    config: &VelocitySolverConfig,
) -> Result<Velocity, PrecalcError> {
    let initial_guess = StrictlyPositive::new(initial_guess)
        .map_err(DomainError::invalid("initial velocity guess"))?
        .into_inner();
    let diameter = StrictlyPositive::new(diameter)
        .map_err(DomainError::invalid("diameter"))?
        .into_inner();
    let roughness = StrictlyPositive::new(roughness)
        .map_err(DomainError::invalid("roughness"))?
        .into_inner();
    let max_pressure_loss = StrictlyPositive::new(max_pressure_loss)
        .map_err(DomainError::invalid("max pressure loss"))?
        .into_inner();

    let model = PipeFlowModel::new(fluid, diameter, roughness, max_pressure_loss);
    let bracket = bracket(&model, fluid, diameter, initial_guess)?;

    let [lower, upper] = match bracket {
        Bracket::Root(velocity) => return Ok(velocity),
        Bracket::Interval(interval) => interval,
    };

    #[cfg(feature = "logging")]
    log::trace!(
        "velocity bracket for d={} m: [{lower:.6}, {upper:.6}] m/s",
        diameter.value
    );

    let solution = bisection::solve(
        &model,
        &MaxVelocityProblem,
        [lower, upper],
        &config.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            // A non-physical friction factor only occurs far below the
            // turbulent range, where the velocity is always too low.
            if event.result().is_err() {
                return Some(bisection::Action::assume_negative());
            }
            None
        },
    )
    .map_err(ConvergenceError::from)?;

    if solution.status != bisection::Status::Converged {
        return Err(ConvergenceError::MaxIters {
            residual: Velocity::new::<meter_per_second>(solution.residual),
            iters: solution.iters,
        }
        .into());
    }

    let point = solution.snapshot.output;

    #[cfg(feature = "logging")]
    log::trace!(
        "converged in {} iterations: Re={:.0}, f={:.5}",
        solution.iters,
        point.reynolds,
        point.friction_factor
    );

    Ok(point.velocity)
}

enum Bracket {
    /// The initial guess is already an exact root.
    Root(Velocity),
    /// Velocities in m/s with a negative residual at the lower end and a
    /// positive residual at the upper end.
    Interval([f64; 2]),
}

fn bracket(
    model: &PipeFlowModel<'_>,
    fluid: &FluidProperties,
    diameter: Length,
    initial_guess: Velocity,
) -> Result<Bracket, ConvergenceError> {
    let no_solution = || ConvergenceError::NoTurbulentSolution { diameter };

    // Fully rough limit of the Haaland equation (Re → ∞).
    let rough_term = (model.relative_roughness() / 3.7).powf(1.11);
    if rough_term + 6.9 / TURBULENT_REYNOLDS >= 1.0 {
        return Err(no_solution());
    }
    let rough_friction = (-1.8 * rough_term.log10()).powi(-2);

    let lower = fluid.dynamic_viscosity() * TURBULENT_REYNOLDS / (fluid.density() * diameter);
    let upper = model.allowed_velocity(rough_friction);

    let residual = |velocity: Velocity| {
        model
            .call(&velocity)
            .map(|point| (point.velocity - point.allowed_velocity).get::<meter_per_second>())
            .ok()
    };

    match (residual(lower), residual(upper)) {
        (Some(lower_residual), Some(upper_residual))
            if lower_residual < 0.0 && upper_residual > 0.0 => {}
        _ => return Err(no_solution()),
    }

    let mut interval = [
        lower.get::<meter_per_second>(),
        upper.get::<meter_per_second>(),
    ];

    if initial_guess > lower && initial_guess < upper {
        match residual(initial_guess) {
            Some(r) if r < 0.0 => interval[0] = initial_guess.get::<meter_per_second>(),
            Some(r) if r > 0.0 => interval[1] = initial_guess.get::<meter_per_second>(),
            Some(0.0) => return Ok(Bracket::Root(initial_guess)),
            _ => {}
        }
    }

    Ok(Bracket::Interval(interval))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::length::{meter, millimeter};

    use crate::support::units::pascal_per_meter;

    fn solve(diameter_m: f64, roughness_mm: f64, pressure_loss: f64) -> Velocity {
        max_flow_velocity(
            Velocity::new::<meter_per_second>(0.5),
            Length::new::<meter>(diameter_m),
            Length::new::<millimeter>(roughness_mm),
            pascal_per_meter(pressure_loss),
            &FluidProperties::water(),
            &VelocitySolverConfig::default(),
        )
        .expect("velocity solve should succeed")
    }

    #[test]
    fn haaland_matches_moody_chart() {
        // Smooth-ish commercial steel at Re = 1e5, ε/d = 1e-3: f ≈ 0.022.
        assert_relative_eq!(haaland_friction_factor(1e5, 1e-3), 0.0222, epsilon = 5e-4);

        // Friction decreases with Reynolds number at fixed roughness.
        assert!(haaland_friction_factor(1e6, 1e-3) < haaland_friction_factor(1e4, 1e-3));
    }

    #[test]
    fn reynolds_of_water_flow() {
        let reynolds = reynolds_number(
            &FluidProperties::water(),
            Velocity::new::<meter_per_second>(1.0),
            Length::new::<meter>(0.1),
        );
        assert_relative_eq!(reynolds, 971.8 * 0.1 / 3.55e-4, epsilon = 1e-6);
    }

    #[test]
    fn velocity_reproduces_pressure_loss_target() {
        let fluid = FluidProperties::water();

        for (diameter, roughness, target) in [
            (0.05, 1.0, 150.0),
            (0.10, 1.0, 150.0),
            (0.0216, 0.05, 250.0),
            (0.3938, 0.05, 250.0),
        ] {
            let velocity = solve(diameter, roughness, target);
            let achieved = specific_pressure_loss(
                &fluid,
                Length::new::<meter>(diameter),
                Length::new::<millimeter>(roughness),
                velocity,
            );
            assert_relative_eq!(achieved.value, target, max_relative = 1e-6);
        }
    }

    #[test]
    fn larger_pipes_allow_faster_flow() {
        let small = solve(0.05, 1.0, 150.0);
        let medium = solve(0.10, 1.0, 150.0);
        let large = solve(0.15, 1.0, 150.0);

        assert!(small < medium && medium < large);
        assert_relative_eq!(small.get::<meter_per_second>(), 0.56, epsilon = 0.01);
    }

    #[test]
    fn result_does_not_depend_on_guess() {
        let config = VelocitySolverConfig::default();
        let fluid = FluidProperties::water();

        let velocities: Vec<f64> = [0.05, 0.5, 3.0, 50.0]
            .into_iter()
            .map(|guess| {
                max_flow_velocity(
                    Velocity::new::<meter_per_second>(guess),
                    Length::new::<meter>(0.1),
                    Length::new::<millimeter>(1.0),
                    pascal_per_meter(150.0),
                    &fluid,
                    &config,
                )
                .unwrap()
                .get::<meter_per_second>()
            })
            .collect();

        for velocity in &velocities[1..] {
            assert_relative_eq!(*velocity, velocities[0], epsilon = 1e-9);
        }
    }

    #[test]
    fn guess_at_the_root_returns_the_root() {
        let root = solve(0.1, 1.0, 150.0);

        let again = max_flow_velocity(
            root,
            Length::new::<meter>(0.1),
            Length::new::<millimeter>(1.0),
            pascal_per_meter(150.0),
            &FluidProperties::water(),
            &VelocitySolverConfig::default(),
        )
        .unwrap();

        assert_relative_eq!(
            again.get::<meter_per_second>(),
            root.get::<meter_per_second>(),
            epsilon = 1e-11
        );
    }

    #[test]
    fn rejects_non_positive_inputs() {
        let fluid = FluidProperties::water();
        let config = VelocitySolverConfig::default();
        let guess = Velocity::new::<meter_per_second>(0.5);

        let result = max_flow_velocity(
            guess,
            Length::new::<meter>(0.0),
            Length::new::<millimeter>(1.0),
            pascal_per_meter(150.0),
            &fluid,
            &config,
        );
        assert!(matches!(
            result,
            Err(PrecalcError::Domain(DomainError::Invalid {
                name: "diameter",
                ..
            }))
        ));

        let result = max_flow_velocity(
            guess,
            Length::new::<meter>(0.1),
            Length::new::<millimeter>(-1.0),
            pascal_per_meter(150.0),
            &fluid,
            &config,
        );
        assert!(matches!(result, Err(PrecalcError::Domain(_))));

        let result = max_flow_velocity(
            guess,
            Length::new::<meter>(0.1),
            Length::new::<millimeter>(1.0),
            pascal_per_meter(0.0),
            &fluid,
            &config,
        );
        assert!(matches!(result, Err(PrecalcError::Domain(_))));
    }

    #[test]
    fn unrealistic_roughness_has_no_turbulent_solution() {
        // Roughness larger than the pipe itself.
        let result = max_flow_velocity(
            Velocity::new::<meter_per_second>(0.5),
            Length::new::<meter>(0.01),
            Length::new::<meter>(0.05),
            pascal_per_meter(150.0),
            &FluidProperties::water(),
            &VelocitySolverConfig::default(),
        );

        assert!(matches!(
            result,
            Err(PrecalcError::Convergence(
                ConvergenceError::NoTurbulentSolution { .. }
            ))
        ));
    }

    #[test]
    fn tiny_pressure_budget_stays_laminar() {
        let result = max_flow_velocity(
            Velocity::new::<meter_per_second>(0.5),
            Length::new::<meter>(0.02),
            Length::new::<millimeter>(0.05),
            pascal_per_meter(1e-4),
            &FluidProperties::water(),
            &VelocitySolverConfig::default(),
        );

        assert!(matches!(
            result,
            Err(PrecalcError::Convergence(
                ConvergenceError::NoTurbulentSolution { .. }
            ))
        ));
    }

    #[test]
    fn iteration_budget_is_enforced() {
        let config = VelocitySolverConfig {
            max_iters: 3,
            ..VelocitySolverConfig::default()
        };

        let result = max_flow_velocity(
            Velocity::new::<meter_per_second>(0.5),
            Length::new::<meter>(0.1),
            Length::new::<millimeter>(1.0),
            pascal_per_meter(150.0),
            &FluidProperties::water(),
            &config,
        );

        assert!(matches!(
            result,
            Err(PrecalcError::Convergence(ConvergenceError::MaxIters { iters: 3, .. }))
        ));
    }
}
