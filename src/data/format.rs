//! Text formatting for dashboard readouts.

/// Seconds per unit, largest first.
const UNITS: &[(&str, u64)] = &[("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)];

/// Format an uptime in seconds.
///
/// Shows the three most significant units starting from the largest
/// non-zero one, e.g. "1d 1h 0m", "1h 1m 1s", "1m 0s", "59s".
pub fn format_uptime(seconds: u64) -> String {
    let parts: Vec<(u64, &str)> = {
        let mut rest = seconds;
        UNITS
            .iter()
            .map(|(suffix, size)| {
                let n = rest / size;
                rest %= size;
                (n, *suffix)
            })
            .collect()
    };

    let start = parts.iter().position(|(n, _)| *n > 0).unwrap_or(parts.len() - 1);
    parts[start..]
        .iter()
        .take(3)
        .map(|(n, suffix)| format!("{}{}", n, suffix))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format an integer with comma thousands separators (1234567 -> "1,234,567").
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Requests per second with one decimal place.
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}", rate)
}

/// Latency in microseconds with unit, e.g. "1,200μs".
pub fn format_micros(micros: u64) -> String {
    format!("{}μs", group_thousands(micros))
}

/// Wall-clock label for a series point.
pub fn time_label() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_seconds_only() {
        assert_eq!(format_uptime(0), "0s");
        assert_eq!(format_uptime(59), "59s");
    }

    #[test]
    fn uptime_minutes() {
        assert_eq!(format_uptime(60), "1m 0s");
        assert_eq!(format_uptime(3599), "59m 59s");
    }

    #[test]
    fn uptime_hours() {
        assert_eq!(format_uptime(3661), "1h 1m 1s");
        assert_eq!(format_uptime(3600), "1h 0m 0s");
    }

    #[test]
    fn uptime_days_drop_seconds() {
        assert_eq!(format_uptime(90000), "1d 1h 0m");
        assert_eq!(format_uptime(86_400 + 59), "1d 0h 0m");
    }

    #[test]
    fn grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(100_000), "100,000");
    }

    #[test]
    fn rate_has_one_decimal() {
        assert_eq!(format_rate(12.0), "12.0");
        assert_eq!(format_rate(3.14159), "3.1");
    }

    #[test]
    fn micros_carry_unit() {
        assert_eq!(format_micros(15000), "15,000μs");
    }

    #[test]
    fn time_label_is_clock_shaped() {
        let label = time_label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
    }
}
