//! Capacity value helpers shared by the ledger and the HTTP surface.

/// Render a capacity pair as the wire format `"current/max"`.
pub fn capacity_display(current: i64, max: i64) -> String {
    format!("{current}/{max}")
}

/// Percentage of capacity in use, rounded to two decimals.
///
/// `max = 0` is rejected at stock-entry creation, but the guard stays so a
/// degenerate record can never panic the read path.
pub fn percentage_of_capacity(current: i64, max: i64) -> f64 {
    if max == 0 {
        return 0.0;
    }
    let percent = 100.0 * current as f64 / max as f64;
    (percent * 100.0).round() / 100.0
}
