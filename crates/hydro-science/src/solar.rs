//! FAO-56 solar geometry (Allen et al., 1998, eqs. 21-25).

use std::f64::consts::PI;

/// Solar constant, MJ m⁻² min⁻¹.
pub const SOLAR_CONSTANT: f64 = 0.0820;

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

fn annual_angle(day_of_year: u32) -> f64 {
    2.0 * PI * f64::from(day_of_year) / 365.0
}

/// Inverse relative Earth-Sun distance.
pub fn inverse_relative_distance(day_of_year: u32) -> f64 {
    1.0 + 0.033 * annual_angle(day_of_year).cos()
}

/// Solar declination, radians.
pub fn solar_declination(day_of_year: u32) -> f64 {
    0.409 * (annual_angle(day_of_year) - 1.39).sin()
}

/// Sunset hour angle, radians.
///
/// The acos argument is clamped to [-1, 1]: polar day/night and rounding at
/// marginal latitudes would otherwise produce NaN.
pub fn sunset_hour_angle(lat_rad: f64, declination: f64) -> f64 {
    (-lat_rad.tan() * declination.tan()).clamp(-1.0, 1.0).acos()
}

/// Daily extraterrestrial radiation, MJ m⁻² day⁻¹.
pub fn extraterrestrial_radiation(lat_rad: f64, day_of_year: u32) -> f64 {
    let dr = inverse_relative_distance(day_of_year);
    let declination = solar_declination(day_of_year);
    let ws = sunset_hour_angle(lat_rad, declination);

    (MINUTES_PER_DAY / PI)
        * SOLAR_CONSTANT
        * dr
        * (ws * lat_rad.sin() * declination.sin()
            + lat_rad.cos() * declination.cos() * ws.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f64, expected: f64, tol: f64) -> bool {
        (actual - expected).abs() <= tol
    }

    #[test]
    fn earth_sun_distance_peaks_in_january() {
        assert!(inverse_relative_distance(1) > 1.03);
        assert!(inverse_relative_distance(182) < 0.968);
    }

    #[test]
    fn declination_near_solstices() {
        // June solstice ≈ +23.4°, December ≈ -23.4°
        assert!(approx(solar_declination(172), 0.409, 0.005));
        assert!(approx(solar_declination(355), -0.409, 0.005));
    }

    #[test]
    fn fao56_example_8_radiation() {
        // FAO-56 Example 8: 20°S on 3 September (doy 246), Ra = 32.2 MJ m-2 day-1
        let ra = extraterrestrial_radiation((-20.0f64).to_radians(), 246);
        assert!(approx(ra, 32.2, 0.1), "Ra = {ra}");
    }

    #[test]
    fn clamp_handles_polar_night_and_day() {
        let pole = 89.9f64.to_radians();
        let winter = sunset_hour_angle(pole, solar_declination(355));
        let summer = sunset_hour_angle(pole, solar_declination(172));
        assert_eq!(winter, 0.0);
        assert!(approx(summer, PI, 1e-12));
        assert!(extraterrestrial_radiation(pole, 355).is_finite());
        assert!(extraterrestrial_radiation(pole, 172).is_finite());
    }

    #[test]
    fn equator_has_twelve_hour_day() {
        assert!(approx(sunset_hour_angle(0.0, solar_declination(100)), PI / 2.0, 1e-12));
    }
}
