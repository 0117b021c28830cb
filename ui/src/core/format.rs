//! Formatting helpers for presenting results and aggregates.

/// Fraction in [0,1] rendered as a percentage with one decimal ("93.2%").
pub fn format_percent(fraction: f64) -> String {
    if fraction.is_finite() {
        format!("{:.1}%", fraction * 100.0)
    } else {
        "—".to_string()
    }
}

/// Percentage value (already scaled to 0–100) with one decimal.
pub fn format_pct_value(pct: f64) -> String {
    if pct.is_finite() {
        format!("{pct:.1}%")
    } else {
        "—".to_string()
    }
}

pub fn format_number(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}")
    } else {
        "—".to_string()
    }
}

/// Calibration deviation in backend units.
pub fn format_deviation(value: f64) -> String {
    format!("{value:.2} units")
}

/// Round to one decimal place, the precision used by every histogram
/// percentage on the statistics page.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
