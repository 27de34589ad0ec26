//! Public Twine models.
//!
//! Models are the primary public interface of this crate. Each domain module
//! exposes its computations as plain functions and wraps the complete chain
//! in a [`twine_core::Model`] implementation that is a thin adapter over them.

pub mod district_heating;
