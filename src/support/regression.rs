//! Simple linear regression.
//!
//! [`LinearFit`] is an ordinary least-squares fit of `y = slope * x + intercept`
//! reporting the coefficient of determination alongside the coefficients.
//! The `[x, 1]` design matrix is solved through its SVD, and r² is computed
//! from the residuals as `1 - SS_res / SS_tot`. For a line with an intercept
//! this equals the squared correlation coefficient `linregress` reports.
//!
//! # Example
//!
//! ```
//! use twine_district_heating::support::regression::LinearFit;
//!
//! let fit = LinearFit::fit(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
//! assert!((fit.slope - 2.0).abs() < 1e-12);
//! assert!(fit.intercept.abs() < 1e-12);
//! assert!((fit.r_squared - 1.0).abs() < 1e-12);
//! ```

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// Singular values below this fraction of the largest one are treated as zero.
const SINGULAR_VALUE_TOL: f64 = 1e-12;

/// Slope, intercept, and coefficient of determination of a linear model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Errors that can occur while fitting a [`LinearFit`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FitError {
    #[error("at least two samples are required, got {count}")]
    TooFewSamples { count: usize },

    #[error("sample lengths differ: {x} x values, {y} y values")]
    MismatchedSamples { x: usize, y: usize },

    #[error("sample {index} is not finite")]
    NonFiniteSample { index: usize },

    #[error("all x values are identical")]
    ZeroVariance,

    #[error("least squares system is too ill-conditioned to solve")]
    IllConditioned,
}

impl LinearFit {
    /// Fits `y` against `x` by ordinary least squares.
    ///
    /// When every `y` is identical the fit is a horizontal line and
    /// `r_squared` is reported as zero.
    ///
    /// # Errors
    ///
    /// Returns a [`FitError`] if fewer than two samples are given, the slices
    /// differ in length, a sample is not finite, all `x` values coincide, or
    /// the SVD solve fails.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self, FitError> {
        if x.len() != y.len() {
            return Err(FitError::MismatchedSamples {
                x: x.len(),
                y: y.len(),
            });
        }
        if x.len() < 2 {
            return Err(FitError::TooFewSamples { count: x.len() });
        }
        if let Some(index) = x
            .iter()
            .zip(y)
            .position(|(xi, yi)| !xi.is_finite() || !yi.is_finite())
        {
            return Err(FitError::NonFiniteSample { index });
        }

        if x.iter().all(|&xi| xi == x[0]) {
            return Err(FitError::ZeroVariance);
        }

        let design = DMatrix::from_fn(x.len(), 2, |row, col| if col == 0 { x[row] } else { 1.0 });
        let response = DVector::from_column_slice(y);

        let svd = design.svd(true, true);
        let tolerance = svd.singular_values.max() * SINGULAR_VALUE_TOL;
        let beta = svd
            .solve(&response, tolerance)
            .map_err(|_| FitError::IllConditioned)?;
        if beta.iter().any(|b| !b.is_finite()) {
            return Err(FitError::IllConditioned);
        }

        let fit = Self {
            slope: beta[0],
            intercept: beta[1],
            r_squared: 0.0,
        };

        let y_mean = response.mean();
        let ss_tot = response.iter().map(|yi| (yi - y_mean).powi(2)).sum::<f64>();
        if ss_tot == 0.0 {
            return Ok(fit);
        }
        let ss_res = x
            .iter()
            .zip(y)
            .map(|(&xi, yi)| (yi - fit.predict(xi)).powi(2))
            .sum::<f64>();

        Ok(Self {
            r_squared: (1.0 - ss_res / ss_tot).clamp(0.0, 1.0),
            ..fit
        })
    }

    /// Returns the model prediction at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Returns a copy with slope and intercept rounded to fixed decimal places.
    ///
    /// The coefficient of determination is left unrounded.
    #[must_use]
    pub fn rounded(self, slope_decimals: i32, intercept_decimals: i32) -> Self {
        Self {
            slope: round_to(self.slope, slope_decimals),
            intercept: round_to(self.intercept, intercept_decimals),
            r_squared: self.r_squared,
        }
    }
}

/// Rounds `value` to `decimals` places after the decimal point.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}
