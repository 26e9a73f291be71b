/// Percentage change from `previous` to `current`, rounded to two decimals.
///
/// Growth from zero is reported as a flat `100.0`; two zero periods report `0.0`.
pub fn percent_increase(current: i64, previous: i64) -> f64 {
    if previous > 0 {
        round2((current - previous) as f64 / previous as f64 * 100.0)
    } else if current > 0 {
        100.0
    } else {
        0.0
    }
}

/// Half-cent ties go to the even cent.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
