//! Hydraulic and thermal precalculation for district heating networks.
//!
//! A network optimizer chooses among a discrete catalog of pre-insulated
//! pipes but works with linear cost and loss terms. This module sizes every
//! catalog entry at its pressure loss limit for a design temperature point
//! and fits the linear surrogates the optimizer consumes:
//!
//! 1. [`hydraulics::max_flow_velocity`] finds the velocity that meets the
//!    specific pressure loss budget of each diameter.
//! 2. [`flow`] converts that velocity to mass flow and thermal capacity.
//! 3. [`thermal`] evaluates the buried-pipe resistance and the heat lost
//!    along a representative pipe length.
//! 4. [`regression`] fits installed cost and heat loss against capacity.
//!
//! [`Precalculation`] holds the properties and settings shared by one
//! optimization run and exposes the whole chain as a [`Model`] of the
//! [`DesignPoint`].
//!
//! # Example
//!
//! ```
//! use twine_core::Model;
//! use twine_district_heating::models::district_heating::{
//!     DesignPoint, PipingCatalog, Precalculation,
//! };
//! use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::degree_celsius};
//!
//! let celsius = |t: f64| ThermodynamicTemperature::new::<degree_celsius>(t);
//! let design = DesignPoint::new(celsius(90.0), celsius(55.0), celsius(-20.0)).unwrap();
//!
//! let precalc = Precalculation::new(PipingCatalog::reference());
//! let results = precalc.call(&design).unwrap();
//!
//! assert!(results.capacity.fit.slope > 0.0);
//! assert_eq!(results.heat_loss.heat_loss.len(), 15);
//! ```

mod catalog;
mod control_curve;
mod error;
mod properties;

pub mod flow;
pub mod hydraulics;
pub mod regression;
pub mod thermal;

#[cfg(test)]
mod test_support;

pub use catalog::{PipeSpec, PipingCatalog};
pub use control_curve::{ControlCurve, DesignPoint, TemperatureRegime};
pub use error::{ConvergenceError, DomainError, PrecalcError};
pub use hydraulics::VelocitySolverConfig;
pub use properties::{FluidProperties, GroundProperties, InsulationProperties};
pub use regression::{
    HeatLossRegression, HeatLossSettings, PrecalcResults, ThermalCapacityRegression,
    regression_heat_losses, regression_thermal_capacity,
};

use twine_core::Model;

/// Everything held fixed while the optimizer explores design points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Precalculation {
    pub fluid: FluidProperties,
    pub ground: GroundProperties,
    pub insulation: InsulationProperties,
    pub catalog: PipingCatalog,
    pub solver: VelocitySolverConfig,
    pub heat_loss: HeatLossSettings,
}

impl Precalculation {
    /// Creates a precalculation for `catalog` with water, default ground and
    /// insulation properties, and default solver and heat loss settings.
    #[must_use]
    pub fn new(catalog: PipingCatalog) -> Self {
        Self {
            fluid: FluidProperties::default(),
            ground: GroundProperties::default(),
            insulation: InsulationProperties::default(),
            catalog,
            solver: VelocitySolverConfig::default(),
            heat_loss: HeatLossSettings::default(),
        }
    }

    #[must_use]
    pub fn with_fluid(self, fluid: FluidProperties) -> Self {
        Self { fluid, ..self }
    }

    #[must_use]
    pub fn with_ground(self, ground: GroundProperties) -> Self {
        Self { ground, ..self }
    }

    #[must_use]
    pub fn with_insulation(self, insulation: InsulationProperties) -> Self {
        Self { insulation, ..self }
    }

    #[must_use]
    pub fn with_solver(self, solver: VelocitySolverConfig) -> Self {
        Self { solver, ..self }
    }

    #[must_use]
    pub fn with_heat_loss(self, heat_loss: HeatLossSettings) -> Self {
        Self { heat_loss, ..self }
    }

    /// Fits installed cost against thermal capacity at `design`.
    ///
    /// # Errors
    ///
    /// See [`regression_thermal_capacity`].
    pub fn thermal_capacity_regression(
        &self,
        design: &DesignPoint,
    ) -> Result<ThermalCapacityRegression, PrecalcError> {
        regression_thermal_capacity(&self.catalog, &self.fluid, design, &self.solver)
    }

    /// Fits heat loss against thermal capacity at `design`.
    ///
    /// # Errors
    ///
    /// See [`regression_heat_losses`].
    pub fn heat_loss_regression(
        &self,
        design: &DesignPoint,
        capacity: &ThermalCapacityRegression,
    ) -> Result<HeatLossRegression, PrecalcError> {
        regression_heat_losses(
            &self.catalog,
            &self.fluid,
            &self.ground,
            &self.insulation,
            design,
            capacity,
            &self.heat_loss,
        )
    }

    /// Runs both regressions at `design`.
    ///
    /// # Errors
    ///
    /// Returns the first error from either regression.
    pub fn run(&self, design: &DesignPoint) -> Result<PrecalcResults, PrecalcError> {
        let capacity = self.thermal_capacity_regression(design)?;
        let heat_loss = self.heat_loss_regression(design, &capacity)?;

        Ok(PrecalcResults {
            design: *design,
            capacity,
            heat_loss,
        })
    }
}

impl Model for Precalculation {
    type Input = DesignPoint;
    type Output = PrecalcResults;
    type Error = PrecalcError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.run(input)
    }
}
