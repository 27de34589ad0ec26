//! Supply temperature control curve and design temperature points.
//!
//! A district heating plant lowers its supply temperature as the weather gets
//! warmer. The curve is flat at `supply_high` below the high-demand turning
//! point, flat at `supply_low` above the low-demand turning point, and linear
//! in between:
//!
//! ```text
//!  T_supply
//!     │ ─────╮
//!     │       ╲
//!     │        ╲
//!     │         ╰─────
//!     └──────┬───┬──────  T_ambient
//!          tp_high tp_low
//! ```

use std::convert::Infallible;

use twine_core::Model;
use uom::si::{f64::ThermodynamicTemperature, ratio::ratio};

use crate::support::units::TemperatureDifference;

use super::DomainError;

/// Piecewise-linear map from ambient temperature to required supply temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ControlCurve {
    supply_high: ThermodynamicTemperature,
    supply_low: ThermodynamicTemperature,
    turning_point_high: ThermodynamicTemperature,
    turning_point_low: ThermodynamicTemperature,
}

impl ControlCurve {
    /// Creates a control curve.
    ///
    /// `turning_point_high` is the ambient temperature below which the plant
    /// supplies `supply_high`; `turning_point_low` is the ambient temperature
    /// above which it supplies `supply_low`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFiniteTemperature`] if any temperature is NaN
    /// or infinite, [`DomainError::InvertedTurningPoints`] if
    /// `turning_point_high > turning_point_low`, and
    /// [`DomainError::InvertedSupplyTemperatures`] if
    /// `supply_high < supply_low`. Either inversion would make the supply
    /// temperature rise with ambient temperature.
    pub fn new(
        supply_high: ThermodynamicTemperature,
        supply_low: ThermodynamicTemperature,
        turning_point_high: ThermodynamicTemperature,
        turning_point_low: ThermodynamicTemperature,
    ) -> Result<Self, DomainError> {
        let supply_high = finite("supply high", supply_high)?;
        let supply_low = finite("supply low", supply_low)?;
        let turning_point_high = finite("turning point high", turning_point_high)?;
        let turning_point_low = finite("turning point low", turning_point_low)?;

        if turning_point_high > turning_point_low {
            return Err(DomainError::InvertedTurningPoints {
                turning_point_high,
                turning_point_low,
            });
        }
        if supply_high < supply_low {
            return Err(DomainError::InvertedSupplyTemperatures {
                supply_high,
                supply_low,
            });
        }

        Ok(Self {
            supply_high,
            supply_low,
            turning_point_high,
            turning_point_low,
        })
    }

    /// Returns the required supply temperature at the given ambient temperature.
    ///
    /// Both turning points belong to the ramp, where the boundary values are
    /// exactly `supply_high` and `supply_low`.
    #[must_use]
    pub fn supply_temperature(&self, ambient: ThermodynamicTemperature) -> ThermodynamicTemperature {
        if ambient <= self.turning_point_high {
            return self.supply_high;
        }
        if ambient >= self.turning_point_low {
            return self.supply_low;
        }

        let position = (ambient.minus(self.turning_point_high)
            / self.turning_point_low.minus(self.turning_point_high))
        .get::<ratio>();

        self.supply_high - self.supply_high.minus(self.supply_low) * position
    }

    #[must_use]
    pub fn supply_high(&self) -> ThermodynamicTemperature {
        self.supply_high
    }

    #[must_use]
    pub fn supply_low(&self) -> ThermodynamicTemperature {
        self.supply_low
    }

    #[must_use]
    pub fn turning_point_high(&self) -> ThermodynamicTemperature {
        self.turning_point_high
    }

    #[must_use]
    pub fn turning_point_low(&self) -> ThermodynamicTemperature {
        self.turning_point_low
    }
}

/// Evaluates the curve as a [`Model`] of ambient temperature.
impl Model for ControlCurve {
    type Input = ThermodynamicTemperature;
    type Output = ThermodynamicTemperature;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok(self.supply_temperature(*input))
    }
}

/// Checks finiteness and ordering after deserializing.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ControlCurve {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            supply_high: ThermodynamicTemperature,
            supply_low: ThermodynamicTemperature,
            turning_point_high: ThermodynamicTemperature,
            turning_point_low: ThermodynamicTemperature,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(
            raw.supply_high,
            raw.supply_low,
            raw.turning_point_high,
            raw.turning_point_low,
        )
        .map_err(serde::de::Error::custom)
    }
}

/// The temperatures a catalog is sized at.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DesignPoint {
    pub supply: ThermodynamicTemperature,
    pub return_temperature: ThermodynamicTemperature,
    pub ambient: ThermodynamicTemperature,
}

impl DesignPoint {
    /// Creates a design point.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonFiniteTemperature`] if any temperature is NaN
    /// or infinite, and [`DomainError::ZeroTemperatureDifference`] if supply
    /// and return temperatures are equal.
    pub fn new(
        supply: ThermodynamicTemperature,
        return_temperature: ThermodynamicTemperature,
        ambient: ThermodynamicTemperature,
    ) -> Result<Self, DomainError> {
        let supply = finite("supply temperature", supply)?;
        let return_temperature = finite("return temperature", return_temperature)?;
        let ambient = finite("ambient temperature", ambient)?;

        if supply == return_temperature {
            return Err(DomainError::ZeroTemperatureDifference);
        }

        Ok(Self {
            supply,
            return_temperature,
            ambient,
        })
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DesignPoint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            supply: ThermodynamicTemperature,
            return_temperature: ThermodynamicTemperature,
            ambient: ThermodynamicTemperature,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.supply, raw.return_temperature, raw.ambient)
            .map_err(serde::de::Error::custom)
    }
}

/// Rejects NaN and infinite temperatures, naming the offending input.
pub(super) fn finite(
    name: &'static str,
    value: ThermodynamicTemperature,
) -> Result<ThermodynamicTemperature, DomainError> {
    if value.value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::NonFiniteTemperature { name, value })
    }
}

/// A control curve together with the design ambient and return temperatures.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemperatureRegime {
    pub curve: ControlCurve,
    pub ambient: ThermodynamicTemperature,
    pub return_temperature: ThermodynamicTemperature,
}

impl TemperatureRegime {
    /// Evaluates the curve at the design ambient temperature.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ZeroTemperatureDifference`] if the resulting
    /// supply temperature equals the return temperature, and
    /// [`DomainError::NonFiniteTemperature`] if the design ambient or return
    /// temperature is not finite.
    pub fn design_point(&self) -> Result<DesignPoint, DomainError> {
        DesignPoint::new(
            self.curve.supply_temperature(self.ambient),
            self.return_temperature,
            self.ambient,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::thermodynamic_temperature::degree_celsius;

    fn celsius(value: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<degree_celsius>(value)
    }

    fn curve() -> ControlCurve {
        ControlCurve::new(celsius(90.0), celsius(70.0), celsius(-14.0), celsius(6.0)).unwrap()
    }

    #[test]
    fn plateaus_are_exact() {
        let curve = curve();

        for ambient in [-30.0, -20.0, -14.0] {
            assert_eq!(curve.supply_temperature(celsius(ambient)), celsius(90.0));
        }
        for ambient in [6.0, 10.0, 25.0] {
            assert_eq!(curve.supply_temperature(celsius(ambient)), celsius(70.0));
        }
    }

    #[test]
    fn ramp_interpolates_linearly() {
        let curve = curve();

        assert_relative_eq!(
            curve.supply_temperature(celsius(-4.0)).get::<degree_celsius>(),
            80.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            curve.supply_temperature(celsius(1.0)).get::<degree_celsius>(),
            75.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn monotonic_non_increasing() {
        let curve = curve();

        let supply: Vec<_> = (-40..=30)
            .map(|t| curve.supply_temperature(celsius(f64::from(t) * 0.5)))
            .collect();

        assert!(supply.windows(2).all(|pair| pair[1] <= pair[0]));
    }

    #[test]
    fn degenerate_ramp_is_a_step() {
        let curve =
            ControlCurve::new(celsius(90.0), celsius(70.0), celsius(0.0), celsius(0.0)).unwrap();

        assert_eq!(curve.supply_temperature(celsius(0.0)), celsius(90.0));
        assert_eq!(curve.supply_temperature(celsius(0.1)), celsius(70.0));
    }

    #[test]
    fn inverted_turning_points_are_rejected() {
        let error =
            ControlCurve::new(celsius(90.0), celsius(70.0), celsius(6.0), celsius(-14.0))
                .unwrap_err();

        assert!(matches!(error, DomainError::InvertedTurningPoints { .. }));
    }

    #[test]
    fn swapped_supply_temperatures_are_rejected() {
        let error =
            ControlCurve::new(celsius(70.0), celsius(90.0), celsius(-14.0), celsius(6.0))
                .unwrap_err();

        assert_eq!(
            error,
            DomainError::InvertedSupplyTemperatures {
                supply_high: celsius(70.0),
                supply_low: celsius(90.0),
            }
        );
    }

    #[test]
    fn flat_curve_is_allowed() {
        let curve =
            ControlCurve::new(celsius(80.0), celsius(80.0), celsius(-14.0), celsius(6.0)).unwrap();
        assert_eq!(curve.supply_temperature(celsius(-4.0)), celsius(80.0));
    }

    #[test]
    fn non_finite_curve_temperatures_are_rejected() {
        let error = ControlCurve::new(celsius(90.0), celsius(f64::NAN), celsius(-14.0), celsius(6.0))
            .unwrap_err();
        assert!(matches!(
            error,
            DomainError::NonFiniteTemperature {
                name: "supply low",
                ..
            }
        ));
    }

    #[test]
    fn model_adapter() {
        let curve = curve();
        let supply = curve.call(&celsius(-4.0)).unwrap();
        assert_relative_eq!(supply.get::<degree_celsius>(), 80.0, epsilon = 1e-9);
    }

    #[test]
    fn regime_design_point() {
        let regime = TemperatureRegime {
            curve: curve(),
            ambient: celsius(-20.0),
            return_temperature: celsius(55.0),
        };

        let design = regime.design_point().unwrap();
        assert_eq!(design.supply, celsius(90.0));
        assert_eq!(design.return_temperature, celsius(55.0));
        assert_eq!(design.ambient, celsius(-20.0));
    }

    #[test]
    fn equal_supply_and_return_is_rejected() {
        assert_eq!(
            DesignPoint::new(celsius(60.0), celsius(60.0), celsius(0.0)),
            Err(DomainError::ZeroTemperatureDifference)
        );
    }

    #[test]
    fn non_finite_design_temperatures_are_rejected() {
        assert!(matches!(
            DesignPoint::new(celsius(f64::NAN), celsius(55.0), celsius(-20.0)),
            Err(DomainError::NonFiniteTemperature {
                name: "supply temperature",
                ..
            })
        ));
        assert!(matches!(
            DesignPoint::new(celsius(90.0), celsius(55.0), celsius(f64::INFINITY)),
            Err(DomainError::NonFiniteTemperature {
                name: "ambient temperature",
                ..
            })
        ));
    }
}
