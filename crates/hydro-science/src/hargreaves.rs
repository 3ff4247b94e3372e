use chrono::Datelike;
use hydro_models::{ClimateRecord, EToResult, EtoMethod};
use tracing::debug;

use crate::error::ScienceError;
use crate::solar::extraterrestrial_radiation;

/// Empirical Hargreaves coefficient.
const HARGREAVES_COEFFICIENT: f64 = 0.0023;
/// Temperature offset, °C.
const HARGREAVES_OFFSET: f64 = 17.8;

/// Reference evapotranspiration via FAO-56 Hargreaves-Samani:
///
/// `ETo = 0.0023 · (Tmean + 17.8) · √(Tmax − Tmin) · Ra`
///
/// Pure and deterministic. Fails only when the record breaks its own
/// invariants (`tmax < tmin`, non-finite inputs).
pub fn compute_eto(record: &ClimateRecord) -> Result<EToResult, ScienceError> {
    record.validate()?;

    let day_of_year = record.date.ordinal();
    let ra = extraterrestrial_radiation(record.latitude.to_radians(), day_of_year);
    let delta_t = record.temperature_range();
    let eto = HARGREAVES_COEFFICIENT * (record.tmean + HARGREAVES_OFFSET) * delta_t.sqrt() * ra;

    debug!(date = %record.date, day_of_year, ra, eto, "Computed Hargreaves ETo");

    Ok(EToResult {
        date: record.date,
        eto_mm_per_day: eto,
        method: EtoMethod::HargreavesSamani,
        source_record: record.clone(),
    })
}
