/// Format seconds as "H:MM:SS" (e.g., "0:00:05", "1:30:45", "125:00:00")
///
/// Fractional seconds are truncated, never rounded. Hours are not padded and
/// may exceed 24.
pub fn format_hms(seconds: f64) -> String {
    format_hms_blink(seconds, true)
}

/// Same as [`format_hms`] but the minutes/seconds separator is a space when
/// `show_seconds_colon` is false (blinking colon while a task runs)
pub fn format_hms_blink(seconds: f64, show_seconds_colon: bool) -> String {
    let total = whole_seconds(seconds);
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    let sep = if show_seconds_colon { ':' } else { ' ' };
    format!("{}:{:02}{}{:02}", h, m, sep, s)
}

fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    }
}
