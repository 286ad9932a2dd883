//! Formatting helpers for the run report.

/// Format a byte count with binary units.
///
/// Bytes are printed without decimals, larger units with two.
///
/// # Examples
/// ```
/// use squeeze_originals::utils::format_file_size;
///
/// assert_eq!(format_file_size(512), "512 B");
/// assert_eq!(format_file_size(1536), "1.50 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    const THRESHOLD: f64 = 1024.0;

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Signed change from `before` to `after`, in percent of `before`.
///
/// Negative means the file shrank. Returns 0.0 when `before` is 0.
pub fn percent_delta(before: u64, after: u64) -> f64 {
    if before == 0 {
        return 0.0;
    }
    (after as f64 - before as f64) / before as f64 * 100.0
}

/// `+12.50%` for growth, `-40.00%` for savings, `0.00%` for no change.
pub fn format_percent_delta(delta: f64) -> String {
    if delta > 0.0 {
        format!("+{:.2}%", delta)
    } else {
        format!("{:.2}%", delta)
    }
}
