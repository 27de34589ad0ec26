//! Error types for the district heating precalculation.

use thiserror::Error;
use twine_solvers::equation::bisection;
use uom::si::f64::{Length, ThermodynamicTemperature, Velocity};

use crate::support::{constraint::ConstraintError, regression::FitError};

/// A precondition on a physical input is violated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// A named input failed its numeric constraint (e.g. a non-positive diameter).
    #[error("invalid {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: ConstraintError,
    },

    /// Supply and return temperatures are equal, so no heat can be transported.
    #[error("supply and return temperatures must differ")]
    ZeroTemperatureDifference,

    /// The control curve turning points are out of order.
    #[error(
        "turning point high ({turning_point_high:?}) must not exceed turning point low ({turning_point_low:?})"
    )]
    InvertedTurningPoints {
        turning_point_high: ThermodynamicTemperature,
        turning_point_low: ThermodynamicTemperature,
    },

    /// The control curve would raise the supply temperature as it gets warmer.
    #[error("supply high ({supply_high:?}) must not be below supply low ({supply_low:?})")]
    InvertedSupplyTemperatures {
        supply_high: ThermodynamicTemperature,
        supply_low: ThermodynamicTemperature,
    },

    /// A temperature input is NaN or infinite.
    #[error("{name} is not finite: {value:?}")]
    NonFiniteTemperature {
        name: &'static str,
        value: ThermodynamicTemperature,
    },

    /// The pipe is buried too shallow for the buried-cylinder resistance formula.
    #[error("burial depth {depth:?} too shallow for outer diameter {outer_diameter:?}")]
    ShallowBurial {
        depth: Length,
        outer_diameter: Length,
    },

    /// Catalog columns have different lengths.
    #[error("catalog column `{column}` has {actual} entries, expected {expected}")]
    ColumnLengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Catalog diameters are not strictly increasing.
    #[error("catalog diameter at index {index} is not larger than its predecessor")]
    DiametersNotIncreasing { index: usize },

    /// The catalog has too few entries to fit a regression.
    #[error("catalog needs at least two diameters, got {count}")]
    TooFewDiameters { count: usize },

    /// A computed per-diameter sample could not be fitted.
    #[error("regression failed")]
    Fit(#[from] FitError),
}

impl DomainError {
    /// Wraps a constraint violation with the name of the offending input.
    pub(crate) fn invalid(name: &'static str) -> impl FnOnce(ConstraintError) -> Self {
        move |source| Self::Invalid { name, source }
    }
}

/// The velocity solver could not find the pressure-loss-limited velocity.
#[derive(Debug, Error)]
pub enum ConvergenceError {
    /// The residual does not change sign over the turbulent velocity range.
    ///
    /// The pressure loss budget cannot be met by turbulent flow in this pipe,
    /// usually because of an unrealistic roughness or pressure loss value.
    #[error("no turbulent velocity meets the pressure loss target in a {diameter:?} pipe")]
    NoTurbulentSolution { diameter: Length },

    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// The solver reached the iteration limit without converging.
    #[error("solver hit iteration limit: residual={residual:?}")]
    MaxIters {
        /// Best velocity residual achieved.
        residual: Velocity,

        /// Iteration count performed by the solver.
        iters: usize,
    },
}

/// Errors returned by the precalculation operations.
#[derive(Debug, Error)]
pub enum PrecalcError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Convergence(#[from] ConvergenceError),

    /// A catalog entry failed, which aborts the whole catalog sweep.
    #[error("catalog entry {index} (inner diameter {diameter:?}) failed")]
    Diameter {
        index: usize,
        diameter: Length,
        #[source]
        source: Box<PrecalcError>,
    },
}

impl PrecalcError {
    /// Attaches catalog position context to an error.
    pub(crate) fn at_diameter(index: usize, diameter: Length) -> impl FnOnce(Self) -> Self {
        move |source| Self::Diameter {
            index,
            diameter,
            source: Box::new(source),
        }
    }
}
