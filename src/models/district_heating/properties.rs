//! Fluid, ground, and insulation property records.
//!
//! These are constant for a design run and are built once before any
//! calculation.

use uom::si::{
    f64::{DynamicViscosity, MassDensity, SpecificHeatCapacity, ThermalConductivity},
    dynamic_viscosity::pascal_second,
    mass_density::kilogram_per_cubic_meter,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
};

use crate::support::constraint::{Constrained, StrictlyPositive};

use super::DomainError;

/// Working fluid properties, taken as constant over the design temperature range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FluidProperties {
    density: Constrained<MassDensity, StrictlyPositive>,
    dynamic_viscosity: Constrained<DynamicViscosity, StrictlyPositive>,
    specific_heat: Constrained<SpecificHeatCapacity, StrictlyPositive>,
}

impl FluidProperties {
    /// Creates fluid properties.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Invalid`] if any property is not strictly positive.
    pub fn new(
        density: MassDensity,
        dynamic_viscosity: DynamicViscosity,
        specific_heat: SpecificHeatCapacity,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            density: StrictlyPositive::new(density).map_err(DomainError::invalid("density"))?,
            dynamic_viscosity: StrictlyPositive::new(dynamic_viscosity)
                .map_err(DomainError::invalid("dynamic viscosity"))?,
            specific_heat: StrictlyPositive::new(specific_heat)
                .map_err(DomainError::invalid("specific heat"))?,
        })
    }

    /// Hot water at typical district heating supply conditions (about 80 °C).
    #[must_use]
    pub fn water() -> Self {
        Self {
            density: Constrained::new_unchecked(
                MassDensity::new::<kilogram_per_cubic_meter>(971.8),
            ),
            dynamic_viscosity: Constrained::new_unchecked(
                DynamicViscosity::new::<pascal_second>(3.55e-4),
            ),
            specific_heat: Constrained::new_unchecked(
                SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(4190.0),
            ),
        }
    }

    #[must_use]
    pub fn density(&self) -> MassDensity {
        self.density.get()
    }

    #[must_use]
    pub fn dynamic_viscosity(&self) -> DynamicViscosity {
        self.dynamic_viscosity.get()
    }

    #[must_use]
    pub fn specific_heat(&self) -> SpecificHeatCapacity {
        self.specific_heat.get()
    }
}

impl Default for FluidProperties {
    fn default() -> Self {
        Self::water()
    }
}

/// Thermal conductivity of the soil surrounding a buried pipe.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundProperties {
    thermal_conductivity: Constrained<ThermalConductivity, StrictlyPositive>,
}

impl GroundProperties {
    /// # Errors
    ///
    /// Returns [`DomainError::Invalid`] if the conductivity is not strictly positive.
    pub fn new(thermal_conductivity: ThermalConductivity) -> Result<Self, DomainError> {
        Ok(Self {
            thermal_conductivity: StrictlyPositive::new(thermal_conductivity)
                .map_err(DomainError::invalid("ground thermal conductivity"))?,
        })
    }

    #[must_use]
    pub fn thermal_conductivity(&self) -> ThermalConductivity {
        self.thermal_conductivity.get()
    }
}

/// Moist soil, 2.4 W/m·K.
impl Default for GroundProperties {
    fn default() -> Self {
        Self {
            thermal_conductivity: Constrained::new_unchecked(
                ThermalConductivity::new::<watt_per_meter_kelvin>(2.4),
            ),
        }
    }
}

/// Thermal conductivity of the pipe insulation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsulationProperties {
    thermal_conductivity: Constrained<ThermalConductivity, StrictlyPositive>,
}

impl InsulationProperties {
    /// # Errors
    ///
    /// Returns [`DomainError::Invalid`] if the conductivity is not strictly positive.
    pub fn new(thermal_conductivity: ThermalConductivity) -> Result<Self, DomainError> {
        Ok(Self {
            thermal_conductivity: StrictlyPositive::new(thermal_conductivity)
                .map_err(DomainError::invalid("insulation thermal conductivity"))?,
        })
    }

    #[must_use]
    pub fn thermal_conductivity(&self) -> ThermalConductivity {
        self.thermal_conductivity.get()
    }
}

/// Polyurethane foam, 0.024 W/m·K.
impl Default for InsulationProperties {
    fn default() -> Self {
        Self {
            thermal_conductivity: Constrained::new_unchecked(
                ThermalConductivity::new::<watt_per_meter_kelvin>(0.024),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::constraint::ConstraintError;

    #[test]
    fn water_defaults() {
        let water = FluidProperties::default();
        assert_relative_eq!(water.density().get::<kilogram_per_cubic_meter>(), 971.8);
        assert_relative_eq!(water.dynamic_viscosity().get::<pascal_second>(), 3.55e-4);
        assert_relative_eq!(
            water.specific_heat().get::<joule_per_kilogram_kelvin>(),
            4190.0
        );
    }

    #[test]
    fn rejects_non_positive_properties() {
        let error = FluidProperties::new(
            MassDensity::new::<kilogram_per_cubic_meter>(1000.0),
            DynamicViscosity::new::<pascal_second>(0.0),
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(4180.0),
        )
        .unwrap_err();

        assert_eq!(
            error,
            DomainError::Invalid {
                name: "dynamic viscosity",
                source: ConstraintError::Zero,
            }
        );

        assert!(
            GroundProperties::new(ThermalConductivity::new::<watt_per_meter_kelvin>(-1.0))
                .is_err()
        );
        assert!(
            InsulationProperties::new(ThermalConductivity::new::<watt_per_meter_kelvin>(
                f64::NAN
            ))
            .is_err()
        );
    }
}
