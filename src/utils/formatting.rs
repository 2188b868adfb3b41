/// Format bytes in human-readable format (B, KB, MB, GB, TB)
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Format a span or delay in seconds, dropping to ms/µs for short values
pub fn format_seconds(seconds: f64) -> String {
    let magnitude = seconds.abs();
    if magnitude == 0.0 {
        "0 s".to_string()
    } else if magnitude < 1e-3 {
        format!("{:.1} µs", seconds * 1e6)
    } else if magnitude < 1.0 {
        format!("{:.2} ms", seconds * 1e3)
    } else if magnitude < 60.0 {
        format!("{:.3} s", seconds)
    } else {
        let whole = magnitude as u64;
        let sign = if seconds < 0.0 { "-" } else { "" };
        if whole < 3600 {
            format!("{}{}m {}s", sign, whole / 60, whole % 60)
        } else {
            format!("{}{}h {}m", sign, whole / 3600, (whole % 3600) / 60)
        }
    }
}

/// Format an exponential rate as events per second
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.3} /s", rate),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1048576), "1.00 MB");
        assert_eq!(format_bytes(1073741824), "1.00 GB");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.0), "0 s");
        assert_eq!(format_seconds(0.0005), "500.0 µs");
        assert_eq!(format_seconds(0.25), "250.00 ms");
        assert_eq!(format_seconds(1.5), "1.500 s");
        assert_eq!(format_seconds(90.0), "1m 30s");
        assert_eq!(format_seconds(3661.0), "1h 1m");
        assert_eq!(format_seconds(-0.25), "-250.00 ms");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(Some(2.0)), "2.000 /s");
        assert_eq!(format_rate(None), "n/a");
    }
}
