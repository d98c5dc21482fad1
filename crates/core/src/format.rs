const BYTE_UNITS: &[(&str, f64)] = &[
    ("PB", 1_125_899_906_842_624.0),
    ("TB", 1_099_511_627_776.0),
    ("GB", 1_073_741_824.0),
    ("MB", 1_048_576.0),
    ("KB", 1_024.0),
];

/// Byte count with a 1024-based unit suffix, e.g. `1.5 KB`, `10 MB`, `512 B`.
pub fn format_bytes(bytes: f64) -> String {
    let magnitude = bytes.abs();
    let (unit, scale) =
        BYTE_UNITS.iter().copied().find(|(_, scale)| magnitude >= *scale).unwrap_or(("B", 1.0));
    format!("{} {unit}", trim_decimals(&format!("{:.2}", bytes / scale)))
}

/// Duration in the largest non-zero unit with one decimal, e.g. `1.5 hours`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let secs = total % 60;

    if days > 0 {
        format!("{} days", round_tenths(days as f64 + hours as f64 / 24.0))
    } else if hours > 0 {
        format!("{} hours", round_tenths(hours as f64 + minutes as f64 / 60.0))
    } else if minutes > 0 {
        format!("{} minutes", round_tenths(minutes as f64 + secs as f64 / 60.0))
    } else {
        format!("{secs} seconds")
    }
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn trim_decimals(fixed: &str) -> &str {
    if !fixed.contains('.') {
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.')
}

#[cfg(test)]
mod tests {
    use super::{format_bytes, format_duration};

    #[test]
    fn bytes_pick_largest_unit_and_trim_zeros() {
        assert_eq!(format_bytes(512.0), "512 B");
        assert_eq!(format_bytes(1536.0), "1.5 KB");
        assert_eq!(format_bytes(10.0 * 1_048_576.0), "10 MB");
        assert_eq!(format_bytes(1_288_490_189.0), "1.2 GB");
        assert_eq!(format_bytes(0.0), "0 B");
        assert_eq!(format_bytes(1_234.0), "1.21 KB");
    }

    #[test]
    fn duration_uses_largest_non_zero_component() {
        assert_eq!(format_duration(45.0), "45 seconds");
        assert_eq!(format_duration(90.0), "1.5 minutes");
        assert_eq!(format_duration(5_400.0), "1.5 hours");
        assert_eq!(format_duration(172_800.0), "2 days");
        assert_eq!(format_duration(129_600.0), "1.5 days");
    }
}
