//! Problem formulation for the pressure-loss-limited velocity.

use std::convert::Infallible;

use thiserror::Error;
use twine_core::{EquationProblem, Model};
use uom::si::{
    f64::{Length, Velocity},
    velocity::meter_per_second,
};

use crate::{
    models::district_heating::FluidProperties, support::units::SpecificPressureLoss,
};

use super::{haaland_friction_factor, reynolds_number};

/// Flow state at a trial velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct FlowPoint {
    pub velocity: Velocity,
    pub reynolds: f64,
    pub friction_factor: f64,

    /// Velocity at which the pressure loss budget is used up, given this
    /// point's friction factor.
    pub allowed_velocity: Velocity,
}

/// The friction factor is not a finite positive number.
///
/// Happens when the Haaland log argument reaches one, far outside turbulent flow.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("non-physical friction factor {friction_factor} at Re={reynolds}")]
pub(super) struct NonPhysicalFriction {
    reynolds: f64,
    friction_factor: f64,
}

/// Darcy–Weisbach flow through one pipe, evaluated at a trial velocity.
pub(super) struct PipeFlowModel<'a> {
    fluid: &'a FluidProperties,
    diameter: Length,
    roughness: Length,
    max_pressure_loss: SpecificPressureLoss,
}

impl<'a> PipeFlowModel<'a> {
    pub(super) fn new(
        fluid: &'a FluidProperties,
        diameter: Length,
        roughness: Length,
        max_pressure_loss: SpecificPressureLoss,
    ) -> Self {
        Self {
            fluid,
            diameter,
            roughness,
            max_pressure_loss,
        }
    }

    /// Velocity allowed by a given friction factor, `sqrt(2·Δp·d / (f·ρ))`.
    pub(super) fn allowed_velocity(&self, friction_factor: f64) -> Velocity {
        let numerator = 2.0 * self.max_pressure_loss.value * self.diameter.value;
        let denominator = friction_factor * self.fluid.density().value;
        Velocity::new::<meter_per_second>((numerator / denominator).sqrt())
    }

    /// Roughness relative to the inner diameter.
    pub(super) fn relative_roughness(&self) -> f64 {
        self.roughness.value / self.diameter.value
    }
}

impl Model for PipeFlowModel<'_> {
    type Input = Velocity;
    type Output = FlowPoint;
    type Error = NonPhysicalFriction;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let reynolds = reynolds_number(self.fluid, *input, self.diameter);
        let friction_factor = haaland_friction_factor(reynolds, self.relative_roughness());

        if !friction_factor.is_finite() || friction_factor <= 0.0 {
            return Err(NonPhysicalFriction {
                reynolds,
                friction_factor,
            });
        }

        Ok(FlowPoint {
            velocity: *input,
            reynolds,
            friction_factor,
            allowed_velocity: self.allowed_velocity(friction_factor),
        })
    }
}

/// Equation problem for the pressure-loss-limited velocity.
///
/// Computes the residual as `velocity - allowed_velocity` in m/s.
pub(super) struct MaxVelocityProblem;

impl EquationProblem<1> for MaxVelocityProblem {
    type Input = Velocity;
    type Output = FlowPoint;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(Velocity::new::<meter_per_second>(x[0]))
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([(output.velocity - output.allowed_velocity).get::<meter_per_second>()])
    }
}
