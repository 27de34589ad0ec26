//! Supporting utilities used by the district heating models.
//!
//! These modules are public because callers building configuration records
//! need them, but their APIs are not stable.

pub mod constraint;
pub mod regression;
pub mod units;
