//! Percentages shown on dashboard stat cards

/// `part / whole * 100`, rounded to one decimal place; 0 when `whole` is 0
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 * 1000.0 / whole as f64).round() / 10.0
    }
}
