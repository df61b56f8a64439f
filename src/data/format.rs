use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime};

/// Naive layouts tried after the zoned ones, most specific first.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Format `value` with exactly `digits` decimals, rounding half away from zero.
///
/// Rounding works on the shortest decimal form of the value, so `1.005`
/// becomes `1.01` even though its binary value sits just below.
pub fn format_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let repr = value.abs().to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .map(|b| b - b'0')
        .collect();

    if frac_part.as_bytes().get(digits).is_some_and(|&b| b >= b'5') {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, 1);
        }
    }

    let int_len = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(kept[..int_len].iter().map(|d| char::from(b'0' + d)));
    if digits > 0 {
        out.push('.');
        out.extend(kept[int_len..].iter().map(|d| char::from(b'0' + d)));
    }
    out
}

/// Render a backend timestamp as `HH:MM`.
///
/// Zoned timestamps are shown in local time; naive ones as written.
/// Anything unparseable is returned unchanged.
pub fn format_hour_minute(datetime: &str) -> String {
    let s = datetime.trim();

    let zoned = DateTime::parse_from_rfc3339(s).or_else(|_| DateTime::parse_from_rfc2822(s));
    if let Ok(dt) = zoned {
        return dt.with_timezone(&Local).format("%H:%M").to_string();
    }

    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| datetime.to_string())
}

/// Format a count for compact display (e.g., 1234 -> "1.2K").
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Format an elapsed time for the status bar.
pub fn format_age(d: Duration) -> String {
    if d < Duration::from_secs(60) {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m{}s", d.as_secs() / 60, d.as_secs() % 60)
    }
}
