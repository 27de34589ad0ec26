//! Conversions between velocity, mass flow, and thermal capacity.

use std::f64::consts::PI;

use uom::si::f64::{Length, MassRate, Power, TemperatureInterval, ThermodynamicTemperature, Velocity};

use crate::support::units::TemperatureDifference;

use super::{DomainError, FluidProperties, control_curve::finite};

/// Returns the mass flow `ρ·v·π/4·d²` through a full circular pipe.
#[must_use]
pub fn mass_flow(fluid: &FluidProperties, velocity: Velocity, diameter: Length) -> MassRate {
    fluid.density() * velocity * diameter * diameter * (PI / 4.0)
}

/// Returns the heat a mass flow carries between supply and return temperature,
/// `ṁ·cp·(T_supply − T_return)`.
///
/// # Errors
///
/// Returns [`DomainError::ZeroTemperatureDifference`] if the temperatures are
/// equal, and [`DomainError::NonFiniteTemperature`] if either is not finite.
pub fn pipe_capacity(
    fluid: &FluidProperties,
    mass_flow: MassRate,
    supply: ThermodynamicTemperature,
    return_temperature: ThermodynamicTemperature,
) -> Result<Power, DomainError> {
    let delta_t = temperature_spread(supply, return_temperature)?;
    Ok(mass_flow * fluid.specific_heat() * delta_t)
}

/// Returns the mass flow needed to carry `capacity` between supply and return
/// temperature. This is the inverse of [`pipe_capacity`].
///
/// # Errors
///
/// Returns [`DomainError::ZeroTemperatureDifference`] if the temperatures are
/// equal, and [`DomainError::NonFiniteTemperature`] if either is not finite.
pub fn capacity_to_mass_flow(
    fluid: &FluidProperties,
    capacity: Power,
    supply: ThermodynamicTemperature,
    return_temperature: ThermodynamicTemperature,
) -> Result<MassRate, DomainError> {
    let delta_t = temperature_spread(supply, return_temperature)?;
    Ok(capacity / (fluid.specific_heat() * delta_t))
}

fn temperature_spread(
    supply: ThermodynamicTemperature,
    return_temperature: ThermodynamicTemperature,
) -> Result<TemperatureInterval, DomainError> {
    let supply = finite("supply temperature", supply)?;
    let return_temperature = finite("return temperature", return_temperature)?;

    let delta_t = supply.minus(return_temperature);
    if delta_t.value == 0.0 {
        return Err(DomainError::ZeroTemperatureDifference);
    }
    Ok(delta_t)
}
