//! Thermal resistance and steady-state heat loss of a buried insulated pipe.
//!
//! The resistance of a single pipe in semi-infinite ground is the sum of the
//! insulation layer and the ground between the jacket and the surface:
//!
//! ```text
//! R = ln(4·H / D_o) / (2π·k_ground) + ln(D_o / D_i) / (2π·k_insulation)
//! ```
//!
//! along with the image-source approximation for the ground term, valid when
//! the burial depth `H` is large compared with the jacket diameter `D_o`.
//!
//! Along a pipe of length `L` the fluid-to-ambient temperature difference
//! decays exponentially with the length constant `ṁ·cp·R`.

use std::f64::consts::PI;

use uom::si::{
    f64::{Length, MassRate, Ratio, ThermodynamicTemperature},
    ratio::ratio,
};

use crate::support::{
    constraint::{AtLeastOne, StrictlyPositive},
    units::{LinearHeatFlow, LinearThermalResistance, TemperatureDifference},
};

use super::{DomainError, FluidProperties, GroundProperties, InsulationProperties};

/// Returns the thermal resistance per unit length of a buried insulated pipe.
///
/// # Errors
///
/// Returns [`DomainError::Invalid`] if the diameter or depth is not strictly
/// positive or the ratio is below one, and [`DomainError::ShallowBurial`] if
/// `4·depth` does not exceed the outer diameter.
pub fn thermal_resistance(
    diameter: Length,
    diameter_ratio: Ratio,
    depth: Length,
    ground: &GroundProperties,
    insulation: &InsulationProperties,
) -> Result<LinearThermalResistance, DomainError> {
    let diameter = StrictlyPositive::new(diameter)
        .map_err(DomainError::invalid("diameter"))?
        .into_inner();
    let diameter_ratio = AtLeastOne::new(diameter_ratio.get::<ratio>())
        .map_err(DomainError::invalid("diameter ratio"))?
        .into_inner();
    let depth = StrictlyPositive::new(depth)
        .map_err(DomainError::invalid("burial depth"))?
        .into_inner();

    let outer_diameter = diameter * diameter_ratio;
    if depth * 4.0 <= outer_diameter {
        return Err(DomainError::ShallowBurial {
            depth,
            outer_diameter,
        });
    }

    let ground_term = (depth * 4.0 / outer_diameter).get::<ratio>().ln() / (2.0 * PI);
    let insulation_term = diameter_ratio.ln() / (2.0 * PI);

    Ok(ground.thermal_conductivity().recip() * ground_term
        + insulation.thermal_conductivity().recip() * insulation_term)
}

/// Returns the average heat loss per unit length over a pipe of `length`.
///
/// The fluid enters at `inlet` and cools toward `ambient` as
/// `ΔT_out = ΔT_in · exp(−L / (ṁ·cp·R))`; the loss is the enthalpy drop
/// `ṁ·cp·(T_in − T_out)` spread over the length. The result is negative
/// if the ambient is warmer than the fluid.
///
/// # Errors
///
/// Returns [`DomainError::Invalid`] if the mass flow, length, or resistance
/// is not strictly positive.
pub fn heat_loss(
    fluid: &FluidProperties,
    mass_flow: MassRate,
    length: Length,
    inlet: ThermodynamicTemperature,
    resistance: LinearThermalResistance,
    ambient: ThermodynamicTemperature,
) -> Result<LinearHeatFlow, DomainError> {
    let mass_flow = StrictlyPositive::new(mass_flow)
        .map_err(DomainError::invalid("mass flow"))?
        .into_inner();
    let length = StrictlyPositive::new(length)
        .map_err(DomainError::invalid("pipe length"))?
        .into_inner();
    let resistance = StrictlyPositive::new(resistance)
        .map_err(DomainError::invalid("thermal resistance"))?
        .into_inner();

    let capacitance = mass_flow * fluid.specific_heat();
    let decay_length: Length = capacitance * resistance;
    let decay = (-(length / decay_length).get::<ratio>()).exp();

    let delta_in = inlet.minus(ambient);
    let outlet = ambient + delta_in * decay;

    Ok(capacitance * inlet.minus(outlet) / length)
}
