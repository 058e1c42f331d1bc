//! Saturation vapor pressure and saturation mixing ratio
//!
//! # Scientific References
//! - Goff, J.A. & Gratch, S. (1946). "Low-pressure properties of water from -160 to 212 °F"
//! - Davies-Jones, R. (2008). "An efficient and accurate method for computing the wet-bulb
//!   temperature along pseudoadiabats." Monthly Weather Review, 136(7), 2764-2785

use crate::core_types::Real;

/// Ratio of the molar masses of water vapor and dry air, scaled to g/kg
pub const EPSILON_G_PER_KG: f64 = 621.97;

/// Calculate saturation vapor pressure over liquid water
///
/// Polynomial-plus-logarithm fit in the exponent (Goff-Gratch form):
/// ```text
/// esat = exp(-2991.2729/T² - 6017.0128/T + 18.87643854 - 0.028354721·T
///            + 1.7838301e-5·T² - 8.4150417e-10·T³ + 4.4412542e-13·T⁴
///            + 2.858487·ln T) / 100
/// ```
///
/// Valid for roughly 200-320 K. No bounds checking is done: outside that
/// band the result is finite but meaningless. `T == 0` gives 0 and `T < 0`
/// gives NaN.
///
/// # Arguments
/// * `tref` - Absolute temperature (K)
///
/// # Returns
/// Saturation vapor pressure (mbar)
#[inline]
pub fn saturation_vapor_pressure<T: Real>(tref: T) -> T {
    let t2 = tref * tref;
    let t3 = t2 * tref;
    let t4 = t3 * tref;

    let exponent = T::lit(-2991.2729) / t2 - T::lit(6017.0128) / tref + T::lit(18.87643854)
        - T::lit(0.028354721) * tref
        + T::lit(1.7838301e-5) * t2
        - T::lit(8.4150417e-10) * t3
        + T::lit(4.4412542e-13) * t4
        + T::lit(2.858487) * tref.ln();

    // Pa -> mbar
    exponent.exp() / T::lit(100.0)
}

/// Calculate saturation mixing ratio from saturation vapor pressure and pressure
///
/// ```text
/// wsat = 621.97 · esat / (p - esat)
/// ```
///
/// Singular at `p == esat`; diverges as `p` approaches `esat` from above and
/// turns negative below it. Callers must ensure `p > esat`.
///
/// # Arguments
/// * `esat` - Saturation vapor pressure (mbar)
/// * `p` - Air pressure (mbar)
///
/// # Returns
/// Saturation mixing ratio (g/kg)
#[inline]
pub fn saturation_mixing_ratio<T: Real>(esat: T, p: T) -> T {
    T::lit(EPSILON_G_PER_KG) * esat / (p - esat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_esat_at_freezing() {
        // ~6.11 mbar at 0°C
        let esat = saturation_vapor_pressure(273.15_f64);
        assert_relative_eq!(esat, 6.112, epsilon = 0.01);
    }

    #[test]
    fn test_esat_at_room_temperature() {
        // ~23.4 mbar at 20°C
        let esat = saturation_vapor_pressure(293.15_f64);
        assert_relative_eq!(esat, 23.385, epsilon = 0.01);
    }

    #[test]
    fn test_esat_increases_with_temperature() {
        let mut prev = saturation_vapor_pressure(250.0_f64);
        for k in 251..=320 {
            let esat = saturation_vapor_pressure(f64::from(k));
            assert!(esat > prev, "esat not increasing at {k} K");
            prev = esat;
        }
    }

    #[test]
    fn test_esat_f32_matches_f64() {
        let e32 = saturation_vapor_pressure(300.0_f32);
        let e64 = saturation_vapor_pressure(300.0_f64);
        assert_relative_eq!(f64::from(e32), e64, max_relative = 1e-4);
    }

    #[test]
    fn test_esat_non_positive_temperature() {
        assert_eq!(saturation_vapor_pressure(0.0_f64), 0.0);
        assert!(saturation_vapor_pressure(-10.0_f64).is_nan());
    }

    #[test]
    fn test_wsat_known_value() {
        let wsat = saturation_mixing_ratio(23.385_f64, 1013.25);
        assert_relative_eq!(wsat, 621.97 * 23.385 / (1013.25 - 23.385), epsilon = 1e-12);
    }

    #[test]
    fn test_wsat_singular_at_equal_pressure() {
        let wsat = saturation_mixing_ratio(50.0_f64, 50.0);
        assert!(wsat.is_infinite());
        assert!(saturation_mixing_ratio(60.0_f64, 50.0) < 0.0);
    }
}
