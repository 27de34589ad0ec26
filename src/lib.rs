//! # Twine District Heating
//!
//! Hydraulic and thermal pipe precalculation for district heating network
//! design, built on [Twine](https://github.com/isentropic-dev/twine).
//!
//! Given a catalog of pre-insulated pipe diameters and a design temperature
//! point, the crate sizes every diameter at its pressure loss limit and fits
//! the linear cost and heat loss coefficients a network optimizer consumes.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain models and their [`twine_core::Model`] adapters.
//! - [`support`]: Supporting utilities used by models.
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! ## Features
//!
//! - `logging` (default): emits [`log`](https://docs.rs/log) records for
//!   solved diameters, fits, and solver brackets. No logger is installed.
//! - `serde`: derives `Serialize` and `Deserialize` for configuration and
//!   result types. Deserializing validates the same invariants as the
//!   constructors.

pub mod models;
pub mod support;
