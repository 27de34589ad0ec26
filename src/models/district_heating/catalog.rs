//! Discrete pipe diameter catalog.

use uom::si::{
    f64::{Length, Ratio},
    length::millimeter,
    ratio::ratio,
};

use crate::support::{
    constraint::{AtLeastOne, Constrained, StrictlyPositive},
    units::{SpecificPressureLoss, pascal_per_meter},
};

use super::DomainError;

/// One catalog entry: a pre-insulated pipe of a single nominal size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipeSpec {
    inner_diameter: Constrained<Length, StrictlyPositive>,
    diameter_ratio: Constrained<f64, AtLeastOne>,
    roughness: Constrained<Length, StrictlyPositive>,
    max_pressure_loss: Constrained<SpecificPressureLoss, StrictlyPositive>,
    cost: Constrained<f64, StrictlyPositive>,
}

impl PipeSpec {
    /// Creates a catalog entry.
    ///
    /// `diameter_ratio` is the outer (jacket) diameter divided by the inner
    /// diameter. `cost` is the installed cost per metre of trench in the
    /// currency the optimizer works in.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Invalid`] if the diameter, roughness, pressure
    /// loss, or cost is not strictly positive, or the ratio is below one.
    pub fn new(
        inner_diameter: Length,
        diameter_ratio: Ratio,
        roughness: Length,
        max_pressure_loss: SpecificPressureLoss,
        cost: f64,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            inner_diameter: StrictlyPositive::new(inner_diameter)
                .map_err(DomainError::invalid("inner diameter"))?,
            diameter_ratio: AtLeastOne::new(diameter_ratio.get::<ratio>())
                .map_err(DomainError::invalid("diameter ratio"))?,
            roughness: StrictlyPositive::new(roughness)
                .map_err(DomainError::invalid("roughness"))?,
            max_pressure_loss: StrictlyPositive::new(max_pressure_loss)
                .map_err(DomainError::invalid("max pressure loss"))?,
            cost: StrictlyPositive::new(cost).map_err(DomainError::invalid("cost"))?,
        })
    }

    #[must_use]
    pub fn inner_diameter(&self) -> Length {
        self.inner_diameter.get()
    }

    #[must_use]
    pub fn diameter_ratio(&self) -> Ratio {
        Ratio::new::<ratio>(self.diameter_ratio.get())
    }

    #[must_use]
    pub fn roughness(&self) -> Length {
        self.roughness.get()
    }

    #[must_use]
    pub fn max_pressure_loss(&self) -> SpecificPressureLoss {
        self.max_pressure_loss.get()
    }

    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost.get()
    }
}

/// An ordered catalog of pipe sizes.
///
/// Inner diameters are strictly increasing and there are at least two
/// entries, so a regression over the catalog is always well posed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PipingCatalog {
    pipes: Vec<PipeSpec>,
}

impl PipingCatalog {
    /// Creates a catalog from its entries.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::TooFewDiameters`] for fewer than two entries or
    /// [`DomainError::DiametersNotIncreasing`] if the order is wrong.
    pub fn new(pipes: Vec<PipeSpec>) -> Result<Self, DomainError> {
        if pipes.len() < 2 {
            return Err(DomainError::TooFewDiameters { count: pipes.len() });
        }

        if let Some(index) = pipes
            .windows(2)
            .position(|pair| pair[1].inner_diameter() <= pair[0].inner_diameter())
        {
            return Err(DomainError::DiametersNotIncreasing { index: index + 1 });
        }

        Ok(Self { pipes })
    }

    /// Creates a catalog from per-column data sharing one roughness and one
    /// pressure loss budget, the way manufacturer tables are usually given.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ColumnLengthMismatch`] if `ratios` or `costs`
    /// does not have one entry per diameter, plus any error from
    /// [`PipeSpec::new`] or [`PipingCatalog::new`].
    pub fn from_columns(
        diameters: &[Length],
        ratios: &[Ratio],
        costs: &[f64],
        roughness: Length,
        max_pressure_loss: SpecificPressureLoss,
    ) -> Result<Self, DomainError> {
        let expected = diameters.len();
        for (column, actual) in [("ratios", ratios.len()), ("costs", costs.len())] {
            if actual != expected {
                return Err(DomainError::ColumnLengthMismatch {
                    column,
                    expected,
                    actual,
                });
            }
        }

        let pipes = diameters
            .iter()
            .zip(ratios)
            .zip(costs)
            .map(|((&diameter, &diameter_ratio), &cost)| {
                PipeSpec::new(diameter, diameter_ratio, roughness, max_pressure_loss, cost)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(pipes)
    }

    /// A reference catalog of pre-insulated steel pipes, DN20 to DN400.
    ///
    /// Inner diameters and jacket diameters follow standard series-1
    /// insulation, costs are installed €/m of trench, roughness is 0.05 mm,
    /// and the pressure loss budget is 250 Pa/m.
    #[must_use]
    pub fn reference() -> Self {
        const INNER_MM: [f64; 15] = [
            21.6, 28.5, 37.2, 43.1, 54.5, 70.3, 82.5, 107.1, 132.5, 160.3, 210.1, 263.0, 312.7,
            344.4, 393.8,
        ];
        const OUTER_MM: [f64; 15] = [
            90.0, 90.0, 110.0, 110.0, 125.0, 140.0, 160.0, 200.0, 225.0, 250.0, 315.0, 400.0,
            450.0, 500.0, 560.0,
        ];
        const COST: [f64; 15] = [
            390.0, 400.0, 430.0, 464.0, 498.0, 537.0, 602.0, 670.0, 754.0, 886.0, 1171.0, 1184.0,
            1197.0, 1401.0, 1755.0,
        ];

        let roughness = Constrained::new_unchecked(Length::new::<millimeter>(0.05));
        let max_pressure_loss = Constrained::new_unchecked(pascal_per_meter(250.0));

        let pipes = INNER_MM
            .iter()
            .zip(OUTER_MM)
            .zip(COST)
            .map(|((&inner, outer), cost)| PipeSpec {
                inner_diameter: Constrained::new_unchecked(Length::new::<millimeter>(inner)),
                diameter_ratio: Constrained::new_unchecked(outer / inner),
                roughness,
                max_pressure_loss,
                cost: Constrained::new_unchecked(cost),
            })
            .collect();

        Self { pipes }
    }

    /// Returns the catalog entries in increasing diameter order.
    #[must_use]
    pub fn pipes(&self) -> &[PipeSpec] {
        &self.pipes
    }

    /// Number of diameters in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    /// Always `false`; a catalog holds at least two entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Installed costs per metre.
    #[must_use]
    pub fn costs(&self) -> Vec<f64> {
        self.pipes.iter().map(PipeSpec::cost).collect()
    }
}

/// Deserializes the entries and then checks the catalog invariants.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PipingCatalog {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            pipes: Vec<PipeSpec>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.pipes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::constraint::ConstraintError;

    fn mm(values: &[f64]) -> Vec<Length> {
        values.iter().map(|&v| Length::new::<millimeter>(v)).collect()
    }

    fn ratios(values: &[f64]) -> Vec<Ratio> {
        values.iter().map(|&v| Ratio::new::<ratio>(v)).collect()
    }

    #[test]
    fn from_columns() {
        let catalog = PipingCatalog::from_columns(
            &mm(&[50.0, 100.0, 150.0]),
            &ratios(&[1.5, 1.5, 1.5]),
            &[50.0, 80.0, 120.0],
            Length::new::<millimeter>(1.0),
            pascal_per_meter(150.0),
        )
        .unwrap();

        assert_eq!(catalog.len(), 3);
        assert_relative_eq!(
            catalog.pipes()[1].inner_diameter().get::<millimeter>(),
            100.0,
            epsilon = 1e-9
        );
        assert_eq!(catalog.costs(), vec![50.0, 80.0, 120.0]);
        assert_relative_eq!(catalog.pipes()[2].diameter_ratio().get::<ratio>(), 1.5);
    }

    #[test]
    fn column_length_mismatch() {
        let error = PipingCatalog::from_columns(
            &mm(&[50.0, 100.0, 150.0]),
            &ratios(&[1.5, 1.5, 1.5]),
            &[50.0, 80.0],
            Length::new::<millimeter>(1.0),
            pascal_per_meter(150.0),
        )
        .unwrap_err();

        assert_eq!(
            error,
            DomainError::ColumnLengthMismatch {
                column: "costs",
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn diameters_must_increase() {
        let error = PipingCatalog::from_columns(
            &mm(&[50.0, 150.0, 100.0]),
            &ratios(&[1.5, 1.5, 1.5]),
            &[50.0, 80.0, 120.0],
            Length::new::<millimeter>(1.0),
            pascal_per_meter(150.0),
        )
        .unwrap_err();

        assert_eq!(error, DomainError::DiametersNotIncreasing { index: 2 });
    }

    #[test]
    fn single_entry_is_rejected() {
        let pipe = PipeSpec::new(
            Length::new::<millimeter>(50.0),
            Ratio::new::<ratio>(1.5),
            Length::new::<millimeter>(1.0),
            pascal_per_meter(150.0),
            50.0,
        )
        .unwrap();

        assert_eq!(
            PipingCatalog::new(vec![pipe]),
            Err(DomainError::TooFewDiameters { count: 1 })
        );
    }

    #[test]
    fn invalid_entries() {
        let error = PipeSpec::new(
            Length::new::<millimeter>(50.0),
            Ratio::new::<ratio>(1.5),
            Length::new::<millimeter>(1.0),
            pascal_per_meter(150.0),
            0.0,
        )
        .unwrap_err();
        assert_eq!(
            error,
            DomainError::Invalid {
                name: "cost",
                source: ConstraintError::Zero,
            }
        );

        let error = PipeSpec::new(
            Length::new::<millimeter>(50.0),
            Ratio::new::<ratio>(0.8),
            Length::new::<millimeter>(1.0),
            pascal_per_meter(150.0),
            50.0,
        )
        .unwrap_err();
        assert_eq!(
            error,
            DomainError::Invalid {
                name: "diameter ratio",
                source: ConstraintError::BelowMinimum,
            }
        );
    }

    #[test]
    fn reference_catalog_is_valid() {
        let reference = PipingCatalog::reference();
        let rebuilt = PipingCatalog::new(reference.pipes().to_vec()).unwrap();

        assert_eq!(rebuilt.len(), 15);
        assert!(
            rebuilt
                .pipes()
                .iter()
                .all(|pipe| pipe.diameter_ratio().get::<ratio>() > 1.0)
        );
        let first = &rebuilt.pipes()[0];
        assert_relative_eq!(
            (first.inner_diameter() * first.diameter_ratio()).get::<millimeter>(),
            90.0,
            epsilon = 1e-9
        );
    }
}
