//! Core types and utilities

pub mod quantity;
pub mod scalar;

pub use quantity::Quantity;
pub use scalar::Real;
