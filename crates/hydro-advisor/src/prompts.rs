use hydro_models::EToResult;

pub fn system_instruction() -> String {
    "You are an agronomist advising smallholder farmers on irrigation. Interpret the daily \
     water balance you are given and respond with a single JSON object containing exactly \
     the keys `summary`, `advice` and `risk_level`. `risk_level` must be one of Low, Medium \
     or High. Do not wrap the object in markdown and do not add any other text."
        .to_string()
}

/// User prompt for one ETo result. Values are rounded for readability; the
/// exact ETo travels separately on the insight.
pub fn build_prompt(eto: &EToResult) -> String {
    let record = &eto.source_record;
    format!(
        "Daily climate data for {date}:\n\
         - Mean temperature: {tmean:.1} °C\n\
         - Precipitation: {precip:.1} mm\n\
         - Relative humidity: {rh:.1} %\n\
         - Reference evapotranspiration (ETo, {method}): {value:.2} mm/day\n\n\
         Compare precipitation against ETo to judge the water balance, classify the \
         irrigation risk as Low, Medium or High, summarize the situation in at most three \
         sentences and give one concrete irrigation recommendation.",
        date = eto.date.format("%Y-%m-%d"),
        tmean = record.tmean,
        precip = record.precipitation,
        rh = record.relative_humidity,
        method = eto.method.as_str(),
        value = eto.eto_mm_per_day,
    )
}
