//! Duration suffix parsing and formatting.
//!
//! Durations are stored in hours but serialized in two forms: `N.Nh` for
//! durations of an hour or more, and rounded whole minutes (`Nm`) below
//! that, so "0.5h" round-trips through the text as "30m".

/// Default task duration in hours when a suffix is absent or unparsable.
pub const DEFAULT_HOURS: f64 = 1.0;

/// Format a duration in hours for a checkbox suffix.
///
/// `>= 1.0` → `N.Nh`; `< 1.0` → rounded whole minutes `Nm`.
pub fn format_duration(hours: f64) -> String {
    if hours >= 1.0 {
        format!("{:.1}h", hours)
    } else {
        format!("{}m", (hours * 60.0).round() as i64)
    }
}

/// Parse a duration token such as `30m`, `2.5h`, or a bare `2`.
///
/// The unit defaults to hours when absent. Returns `None` for anything
/// that does not parse as a number (callers fall back to
/// [`DEFAULT_HOURS`]).
pub fn parse_duration(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let (number, minutes) = match token.as_bytes()[token.len() - 1] {
        b'm' | b'M' => (&token[..token.len() - 1], true),
        b'h' | b'H' => (&token[..token.len() - 1], false),
        _ => (token, false),
    };

    let value: f64 = number.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(if minutes { value / 60.0 } else { value })
}
