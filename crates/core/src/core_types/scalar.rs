//! Scalar element type shared by every formula and field operation
//!
//! Formulas are generic over [`Real`] so that a field of `f32` temperatures
//! produces `f32` results and a field of `f64` temperatures produces `f64`
//! results. The trait sits on top of `nalgebra::RealField`, which already
//! provides the transcendental functions (`exp`, `ln`, `powf`, `atan`,
//! `sqrt`) the thermodynamic fits need.
//!
//! # Usage
//! ```
//! use esm_thermo_core::core_types::Real;
//!
//! fn double<T: Real>(x: T) -> T {
//!     x * T::lit(2.0)
//! }
//!
//! assert_eq!(double(1.5_f32), 3.0_f32);
//! assert!(f64::nan().is_nan());
//! ```

use nalgebra::RealField;

/// Floating-point element type for gridded thermodynamic fields
///
/// Implemented for `f32` and `f64`.
pub trait Real: RealField + Copy {
    /// Quiet NaN, used for quantities a stage plan never produced
    fn nan() -> Self;

    /// Convert an `f64` literal (fit coefficient, physical constant) into `Self`
    fn lit(value: f64) -> Self;

    /// Widen to `f64` for diagnostics and reporting
    fn to_f64(self) -> f64;
}

impl Real for f32 {
    #[inline(always)]
    fn nan() -> Self {
        f32::NAN
    }

    #[inline(always)]
    fn lit(value: f64) -> Self {
        value as f32
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Real for f64 {
    #[inline(always)]
    fn nan() -> Self {
        f64::NAN
    }

    #[inline(always)]
    fn lit(value: f64) -> Self {
        value
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        self
    }
}
