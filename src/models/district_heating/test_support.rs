use uom::si::{
    f64::{Length, Ratio, ThermodynamicTemperature},
    length::{meter, millimeter},
    ratio::ratio,
    thermodynamic_temperature::degree_celsius,
};

use crate::support::units::pascal_per_meter;

use super::{DesignPoint, PipingCatalog};

pub(super) fn celsius(value: f64) -> ThermodynamicTemperature {
    ThermodynamicTemperature::new::<degree_celsius>(value)
}

/// Three pipes of 50, 100, and 150 mm with a 1 mm roughness and 150 Pa/m budget.
pub(super) fn small_catalog() -> PipingCatalog {
    PipingCatalog::from_columns(
        &[0.05, 0.10, 0.15].map(Length::new::<meter>),
        &[Ratio::new::<ratio>(1.5); 3],
        &[50.0, 80.0, 120.0],
        Length::new::<millimeter>(1.0),
        pascal_per_meter(150.0),
    )
    .expect("fixture catalog is valid")
}

/// Supply 80 °C, return 50 °C, ambient −10 °C.
pub(super) fn design_point() -> DesignPoint {
    DesignPoint::new(celsius(80.0), celsius(50.0), celsius(-10.0))
        .expect("fixture design point is valid")
}
