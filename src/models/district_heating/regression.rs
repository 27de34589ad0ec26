//! Catalog sweeps and the linear surrogate models fitted to them.
//!
//! Every catalog entry is evaluated at the design point and the resulting
//! per-diameter capacities are regressed against installed cost and heat
//! loss. A failing entry aborts the sweep, since dropping it would change the
//! regression sample.

use uom::si::{
    f64::{Length, MassRate, Power, Velocity},
    length::meter,
    power::kilowatt,
};

use crate::support::{
    regression::{LinearFit, round_to},
    units::{LinearHeatFlow, LinearThermalResistance},
};

use super::{
    DesignPoint, DomainError, FluidProperties, GroundProperties, InsulationProperties,
    PipingCatalog, PrecalcError, VelocitySolverConfig, flow, hydraulics, thermal,
};

/// Decimal places of the cost regression slope (€/m per kW).
const CAPACITY_SLOPE_DECIMALS: i32 = 6;

/// Decimal places of the cost regression intercept (€/m).
const CAPACITY_INTERCEPT_DECIMALS: i32 = 3;

/// Heat loss slopes are of order 1e-7 kW/m per kW and need more places.
const HEAT_LOSS_SLOPE_DECIMALS: i32 = 10;

const HEAT_LOSS_INTERCEPT_DECIMALS: i32 = 6;

/// Regressions with a worse fit than this are logged as suspicious.
#[cfg(feature = "logging")]
const POOR_FIT_R_SQUARED: f64 = 0.5;

/// Geometry assumed when evaluating heat losses.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeatLossSettings {
    /// Depth from the ground surface to the pipe axis.
    pub burial_depth: Length,

    /// Pipe length over which the supply temperature decays.
    pub pipe_length: Length,
}

impl Default for HeatLossSettings {
    fn default() -> Self {
        Self {
            burial_depth: Length::new::<meter>(1.0),
            pipe_length: Length::new::<meter>(100.0),
        }
    }
}

/// Cost-vs-capacity regression with the per-diameter samples behind it.
///
/// The fit relates thermal capacity in kW to installed cost per metre.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThermalCapacityRegression {
    pub fit: LinearFit,
    pub max_velocity: Vec<Velocity>,
    pub max_mass_flow: Vec<MassRate>,
    pub max_capacity: Vec<Power>,

    /// Fraction of the maximum capacity available at part load.
    ///
    /// Always `1.0`. It is a placeholder, not derived from any physics.
    pub part_load_factor: f64,
}

impl ThermalCapacityRegression {
    /// Returns the maximum capacities in kW, rounded to 3 decimal places.
    #[must_use]
    pub fn max_capacity_kw(&self) -> Vec<f64> {
        self.max_capacity
            .iter()
            .map(|capacity| round_to(capacity.get::<kilowatt>(), 3))
            .collect()
    }
}

/// Heat-loss-vs-capacity regression with the per-diameter samples behind it.
///
/// The fit relates thermal capacity in kW to heat loss in kW/m.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeatLossRegression {
    pub fit: LinearFit,
    pub thermal_resistance: Vec<LinearThermalResistance>,
    pub heat_loss: Vec<LinearHeatFlow>,
}

impl HeatLossRegression {
    /// Returns the heat losses in kW/m.
    #[must_use]
    pub fn heat_loss_kw_per_m(&self) -> Vec<f64> {
        self.heat_loss.iter().map(|q| q.value / 1000.0).collect()
    }
}

/// Both regressions for one design point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrecalcResults {
    pub design: DesignPoint,
    pub capacity: ThermalCapacityRegression,
    pub heat_loss: HeatLossRegression,
}

/// Sizes every catalog entry at its pressure loss limit and fits installed
/// cost against the resulting thermal capacity.
///
/// Each entry's velocity solve starts from `config.initial_guess`.
///
/// # Errors
///
/// Returns [`PrecalcError::Diameter`] wrapping the first entry that fails,
/// or a [`DomainError`] if the design temperatures are equal or the samples
/// cannot be fitted.
pub fn regression_thermal_capacity(
    catalog: &PipingCatalog,
    fluid: &FluidProperties,
    design: &DesignPoint,
    config: &VelocitySolverConfig,
) -> Result<ThermalCapacityRegression, PrecalcError> {
    let mut max_velocity = Vec::with_capacity(catalog.len());
    let mut max_mass_flow = Vec::with_capacity(catalog.len());
    let mut max_capacity = Vec::with_capacity(catalog.len());

    for (index, pipe) in catalog.pipes().iter().enumerate() {
        let diameter = pipe.inner_diameter();

        let sample = || -> Result<_, PrecalcError> {
            let velocity = hydraulics::max_flow_velocity(
                config.initial_guess,
                diameter,
                pipe.roughness(),
                pipe.max_pressure_loss(),
                fluid,
                config,
            )?;
            let mass_flow = flow::mass_flow(fluid, velocity, diameter);
            let capacity =
                flow::pipe_capacity(fluid, mass_flow, design.supply, design.return_temperature)?;
            Ok((velocity, mass_flow, capacity))
        };
        let (velocity, mass_flow, capacity) =
            sample().map_err(PrecalcError::at_diameter(index, diameter))?;

        #[cfg(feature = "logging")]
        log::debug!(
            "d={:.4} m: v_max={:.4} m/s, m_dot={:.4} kg/s, capacity={:.3} kW",
            diameter.value,
            velocity.value,
            mass_flow.value,
            capacity.get::<kilowatt>()
        );

        max_velocity.push(velocity);
        max_mass_flow.push(mass_flow);
        max_capacity.push(capacity);
    }

    let capacity_kw: Vec<f64> = max_capacity.iter().map(|p| p.get::<kilowatt>()).collect();
    let fit = LinearFit::fit(&capacity_kw, &catalog.costs())
        .map_err(DomainError::from)?
        .rounded(CAPACITY_SLOPE_DECIMALS, CAPACITY_INTERCEPT_DECIMALS);

    log_fit("cost vs capacity", &fit);

    Ok(ThermalCapacityRegression {
        fit,
        max_velocity,
        max_mass_flow,
        max_capacity,
        part_load_factor: 1.0,
    })
}

/// Evaluates the heat loss of every catalog entry at its maximum mass flow
/// and fits it against thermal capacity.
///
/// The fluid enters at the design supply temperature and the ground surface
/// is at the design ambient temperature. `capacity` must come from
/// [`regression_thermal_capacity`] on the same catalog.
///
/// # Errors
///
/// Returns [`DomainError::ColumnLengthMismatch`] if `capacity` does not have
/// one sample per catalog entry, [`PrecalcError::Diameter`] wrapping the
/// first entry that fails, or a [`DomainError`] if the samples cannot be
/// fitted.
pub fn regression_heat_losses(
    catalog: &PipingCatalog,
    fluid: &FluidProperties,
    ground: &GroundProperties,
    insulation: &InsulationProperties,
    design: &DesignPoint,
    capacity: &ThermalCapacityRegression,
    settings: &HeatLossSettings,
) -> Result<HeatLossRegression, PrecalcError> {
    let expected = catalog.len();
    for (column, actual) in [
        ("max_mass_flow", capacity.max_mass_flow.len()),
        ("max_capacity", capacity.max_capacity.len()),
    ] {
        if actual != expected {
            return Err(DomainError::ColumnLengthMismatch {
                column,
                expected,
                actual,
            }
            .into());
        }
    }

    let mut thermal_resistance = Vec::with_capacity(expected);
    let mut heat_loss = Vec::with_capacity(expected);

    for (index, (pipe, &mass_flow)) in catalog
        .pipes()
        .iter()
        .zip(&capacity.max_mass_flow)
        .enumerate()
    {
        let diameter = pipe.inner_diameter();

        let sample = || -> Result<_, DomainError> {
            let resistance = thermal::thermal_resistance(
                diameter,
                pipe.diameter_ratio(),
                settings.burial_depth,
                ground,
                insulation,
            )?;
            let q = thermal::heat_loss(
                fluid,
                mass_flow,
                settings.pipe_length,
                design.supply,
                resistance,
                design.ambient,
            )?;
            Ok((resistance, q))
        };
        let (resistance, q) = sample()
            .map_err(PrecalcError::from)
            .map_err(PrecalcError::at_diameter(index, diameter))?;

        #[cfg(feature = "logging")]
        log::debug!(
            "d={:.4} m: R={:.4} m·K/W, heat loss={:.3} W/m",
            diameter.value,
            resistance.value,
            q.value
        );

        thermal_resistance.push(resistance);
        heat_loss.push(q);
    }

    let capacity_kw: Vec<f64> = capacity
        .max_capacity
        .iter()
        .map(|p| p.get::<kilowatt>())
        .collect();
    let heat_loss_kw: Vec<f64> = heat_loss.iter().map(|q| q.value / 1000.0).collect();

    let fit = LinearFit::fit(&capacity_kw, &heat_loss_kw)
        .map_err(DomainError::from)?
        .rounded(HEAT_LOSS_SLOPE_DECIMALS, HEAT_LOSS_INTERCEPT_DECIMALS);

    log_fit("heat loss vs capacity", &fit);

    Ok(HeatLossRegression {
        fit,
        thermal_resistance,
        heat_loss,
    })
}

#[cfg_attr(not(feature = "logging"), allow(unused_variables))]
fn log_fit(name: &str, fit: &LinearFit) {
    #[cfg(feature = "logging")]
    {
        log::debug!(
            "{name}: slope={}, intercept={}, r²={:.4}",
            fit.slope,
            fit.intercept,
            fit.r_squared
        );
        if fit.r_squared < POOR_FIT_R_SQUARED {
            log::warn!("{name} regression fits poorly: r²={:.4}", fit.r_squared);
        }
    }
}
