//! Lifting condensation, equivalent potential temperature and wet-bulb temperature
//!
//! Two routes to the wet-bulb temperature are provided:
//! - **Davies-Jones (2008)**: lifting condensation temperature (Bolton 1980),
//!   then the potential temperature equivalent, then a closed-form fit back
//!   to wet-bulb temperature.
//! - **Stull (2011)**: a single empirical regression in temperature and
//!   relative humidity.
//!
//! # Scientific References
//! - Bolton, D. (1980). "The computation of equivalent potential temperature."
//!   Monthly Weather Review, 108(7), 1046-1053
//! - Davies-Jones, R. (2008). Monthly Weather Review, 136(7), 2764-2785
//! - Stull, R. (2011). "Wet-bulb temperature from relative humidity and air temperature."
//!   Journal of Applied Meteorology and Climatology, 50(11), 2267-2269

use crate::core_types::Real;

/// 0°C in Kelvin
pub const CELSIUS_KELVIN_OFFSET: f64 = 273.15;

/// Convert an absolute temperature (K) to degrees Celsius
#[inline(always)]
pub fn kelvin_to_celsius<T: Real>(tref: T) -> T {
    tref - T::lit(CELSIUS_KELVIN_OFFSET)
}

/// Calculate the lifting condensation temperature
///
/// Bolton (1980), eq. 22:
/// ```text
/// tl = 1 / (1/(tref - 55) - ln(rh/100)/2840) + 55
/// ```
///
/// Singular at `tref == 55` K and where the denominator vanishes.
/// `rh <= 0` is outside the log domain and yields NaN or infinity.
///
/// # Arguments
/// * `tref` - Absolute temperature (K)
/// * `rh` - Relative humidity (%)
///
/// # Returns
/// Lifting condensation temperature (K)
#[inline]
pub fn lifting_condensation_temperature<T: Real>(tref: T, rh: T) -> T {
    let offset = T::lit(55.0);
    let one = T::lit(1.0);
    one / (one / (tref - offset) - (rh / T::lit(100.0)).ln() / T::lit(2840.0)) + offset
}

/// Calculate the potential temperature equivalent of the lifting condensation temperature
///
/// The temperature a parcel reaches if lifted adiabatically until all its
/// water has condensed, then lowered dry-adiabatically to 1000 mbar.
///
/// ```text
/// theta = tref · (1000/p)^(0.2854·(1 - 0.28e-3·w))
///              · exp((3.376/tl - 0.00254) · w · (1 + 0.81e-3·w))
/// ```
///
/// # Arguments
/// * `w` - Mixing ratio (g/kg)
/// * `tref` - Absolute temperature (K)
/// * `tl` - Lifting condensation temperature (K)
/// * `p` - Air pressure (mbar), must be positive
///
/// # Returns
/// Equivalent potential temperature (K)
#[inline]
pub fn equivalent_potential_temperature<T: Real>(w: T, tref: T, tl: T, p: T) -> T {
    let one = T::lit(1.0);
    let exponent = T::lit(0.2854) * (one - T::lit(0.28e-3) * w);
    let dry = tref * (T::lit(1000.0) / p).powf(exponent);
    let moist = ((T::lit(3.376) / tl - T::lit(0.00254)) * w * (one + T::lit(0.81e-3) * w)).exp();
    dry * moist
}

/// Calculate wet-bulb temperature from the equivalent potential temperature
///
/// Davies-Jones (2008) closed-form fit:
/// ```text
/// wbt = 45.114 - 51.489 · (theta / 273.15)^-3.504
/// ```
///
/// Singular at `theta == 0`.
///
/// # Arguments
/// * `theta` - Equivalent potential temperature (K)
///
/// # Returns
/// Wet-bulb temperature (°C)
#[inline]
pub fn wet_bulb_from_theta<T: Real>(theta: T) -> T {
    T::lit(45.114)
        - T::lit(51.489) * (theta / T::lit(CELSIUS_KELVIN_OFFSET)).powf(T::lit(-3.504))
}

/// Calculate wet-bulb temperature with the Stull (2011) regression
///
/// ```text
/// Tw = T·atan(0.151977·√(rh + 8.313659)) + atan(T + rh) - atan(rh - 1.676331)
///      + 0.00391838·rh^1.5·atan(0.023101·rh) - 4.686035
/// ```
/// with `T` in °C. Fitted for rh in 5-99 % and T in -20-50 °C at sea level;
/// values outside that band are returned unchecked.
///
/// # Arguments
/// * `tref` - Absolute temperature (K), converted to °C internally
/// * `rh` - Relative humidity (%)
///
/// # Returns
/// Wet-bulb temperature (°C)
#[inline]
pub fn wet_bulb_stull<T: Real>(tref: T, rh: T) -> T {
    let t = kelvin_to_celsius(tref);

    let term1 = t * (T::lit(0.151977) * (rh + T::lit(8.313659)).sqrt()).atan();
    let term2 = (t + rh).atan();
    let term3 = (rh - T::lit(1.676331)).atan();
    let term4 = T::lit(0.00391838) * rh.powf(T::lit(1.5)) * (T::lit(0.023101) * rh).atan();
    let term5 = T::lit(4.686035);

    term1 + term2 - term3 + term4 - term5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kelvin_to_celsius() {
        assert_relative_eq!(kelvin_to_celsius(300.0_f64), 26.85, epsilon = 1e-12);
    }

    #[test]
    fn test_lcl_equals_temperature_at_saturation() {
        // ln(1) = 0, so a saturated parcel condenses immediately
        let tl = lifting_condensation_temperature(290.0_f64, 100.0);
        assert_relative_eq!(tl, 290.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lcl_below_temperature_when_subsaturated() {
        let tl = lifting_condensation_temperature(300.0_f64, 44.909);
        assert!(tl < 300.0);
        assert_relative_eq!(tl, 284.173, epsilon = 1e-2);
    }

    #[test]
    fn test_lcl_zero_humidity_collapses_to_offset() {
        // ln(0) = -inf drives the denominator to +inf, tl collapses to 55 K
        let tl = lifting_condensation_temperature(300.0_f64, 0.0);
        assert_relative_eq!(tl, 55.0, epsilon = 1e-12);
        assert!(lifting_condensation_temperature(300.0_f64, -5.0).is_nan());
    }

    #[test]
    fn test_theta_dry_air_at_1000_mbar_is_temperature() {
        let theta = equivalent_potential_temperature(0.0_f64, 290.0, 290.0, 1000.0);
        assert_relative_eq!(theta, 290.0, epsilon = 1e-12);
    }

    #[test]
    fn test_theta_moisture_raises_temperature() {
        let dry = equivalent_potential_temperature(0.0_f64, 300.0, 284.17, 1013.0);
        let moist = equivalent_potential_temperature(10.1_f64, 300.0, 284.17, 1013.0);
        assert!(moist > dry + 20.0, "latent heating should add >20 K, got {dry} -> {moist}");
    }

    #[test]
    fn test_wbt_from_theta_reference() {
        assert_relative_eq!(wet_bulb_from_theta(328.725372841567_f64), 18.206047, epsilon = 1e-5);
    }

    #[test]
    fn test_wbt_from_theta_singular_at_zero() {
        assert!(wet_bulb_from_theta(0.0_f64).is_infinite());
    }

    #[test]
    fn test_stull_published_reference() {
        // Stull (2011): T = 20°C, RH = 50% gives Tw ≈ 13.7°C
        let tw = wet_bulb_stull(293.15_f64, 50.0);
        assert_relative_eq!(tw, 13.7, epsilon = 0.05);
    }

    #[test]
    fn test_stull_wet_bulb_below_dry_bulb() {
        for rh in [10.0_f64, 30.0, 50.0, 70.0, 90.0] {
            let tw = wet_bulb_stull(303.15_f64, rh);
            assert!(tw < 30.0, "Tw {tw} should be below 30°C at rh {rh}");
        }
    }
}
