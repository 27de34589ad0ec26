//! Extensions to [`uom`].
//!
//! All physical values in this crate are [`uom`] quantities. Pipe sizing needs a
//! few per-unit-length quantities that [`uom`] does not define; they are
//! declared here as dimension aliases and are built through arithmetic on
//! regular quantities:
//!
//! ```
//! use twine_district_heating::support::units::SpecificPressureLoss;
//! use uom::si::{f64::{Length, Pressure}, length::meter, pressure::pascal};
//!
//! let dp: SpecificPressureLoss = Pressure::new::<pascal>(150.0) / Length::new::<meter>(1.0);
//! assert_eq!(dp.value, 150.0);
//! ```
//!
//! Values of these aliases are read through the public `value` field, which
//! holds the SI base value (Pa/m, m·K/W, W/m).
//!
//! ## Temperature differences
//!
//! [`TemperatureDifference::minus`] subtracts two absolute temperatures and
//! returns a [`TemperatureInterval`], which [`uom`] does not do on its own
//! (see [#380](https://github.com/iliekturtles/uom/issues/380)).

use uom::{
    si::{
        ISQ, Quantity, SI,
        f64::{Length, Pressure, TemperatureInterval, ThermodynamicTemperature},
        length::meter,
        pressure::pascal,
        temperature_interval::kelvin as delta_kelvin,
        thermodynamic_temperature::kelvin as abs_kelvin,
    },
    typenum::{N1, N2, N3, P1, P3, Z0},
};

/// Pressure drop per unit pipe length, Pa/m in SI.
pub type SpecificPressureLoss = Quantity<ISQ<N2, P1, N2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Thermal resistance of a unit pipe length, m·K/W in SI.
pub type LinearThermalResistance = Quantity<ISQ<N1, N1, P3, Z0, P1, Z0, Z0>, SI<f64>, f64>;

/// Heat flow per unit pipe length, W/m in SI.
pub type LinearHeatFlow = Quantity<ISQ<P1, P1, N3, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Creates a [`SpecificPressureLoss`] from a value in Pa/m.
#[must_use]
pub fn pascal_per_meter(value: f64) -> SpecificPressureLoss {
    Pressure::new::<pascal>(value) / Length::new::<meter>(1.0)
}

/// Extension trait for computing temperature differences.
pub trait TemperatureDifference {
    /// Returns the temperature difference `self - other`.
    fn minus(self, other: Self) -> TemperatureInterval;
}

impl TemperatureDifference for ThermodynamicTemperature {
    fn minus(self, other: Self) -> TemperatureInterval {
        TemperatureInterval::new::<delta_kelvin>(
            self.get::<abs_kelvin>() - other.get::<abs_kelvin>(),
        )
    }
}
