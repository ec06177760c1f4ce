//! ISO 8601 duration parsing for upstream video records

use tracing::warn;

/// Parse an ISO 8601 duration such as `PT1M5S` into whole seconds.
///
/// Only the time designators (`H`, `M`, `S`) are understood, which covers every
/// duration a short-form upload can carry. Malformed input yields 0.
pub fn parse_iso8601_duration(duration: &str) -> u32 {
    match try_parse(duration.trim()) {
        Some(seconds) => seconds,
        None => {
            warn!("Could not parse duration '{}', defaulting to 0s", duration);
            0
        }
    }
}

fn try_parse(duration: &str) -> Option<u32> {
    let body = duration.strip_prefix("PT")?;
    if body.is_empty() {
        return None;
    }

    let mut total: u32 = 0;
    let mut digits = String::new();

    for c in body.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let value: u32 = digits.parse().ok()?;
        digits.clear();

        let multiplier = match c {
            'H' => 3600,
            'M' => 60,
            'S' => 1,
            _ => return None,
        };
        total = total.checked_add(value.checked_mul(multiplier)?)?;
    }

    // Trailing digits without a designator
    if !digits.is_empty() {
        return None;
    }

    Some(total)
}
