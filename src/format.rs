// Display formatting helpers

use chrono::{DateTime, Local, Utc};

/// Render a timestamp with a `YYYY-MM-DD HH:mm:ss`-style pattern
pub fn format_time(time: &DateTime<Utc>, pattern: &str) -> String {
    let local = time.with_timezone(&Local);
    pattern
        .replace("YYYY", &local.format("%Y").to_string())
        .replace("MM", &local.format("%m").to_string())
        .replace("DD", &local.format("%d").to_string())
        .replace("HH", &local.format("%H").to_string())
        .replace("mm", &local.format("%M").to_string())
        .replace("ss", &local.format("%S").to_string())
}

/// "just now", "5 minutes ago", "2 days ago" ...
pub fn format_relative_time(time: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(*time);
    let minutes = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if hours < 1 {
        format!("{} minutes ago", minutes)
    } else if days < 1 {
        format!("{} hours ago", hours)
    } else if days < 30 {
        format!("{} days ago", days)
    } else if days < 365 {
        format!("{} months ago", days / 30)
    } else {
        format!("{} years ago", days / 365)
    }
}

/// Thousands separators: 1234567 -> "1,234,567"
pub fn format_number(num: i64) -> String {
    let digits = num.abs().to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if num < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Compact counts: 1500 -> "1.5K", 2300000 -> "2.3M"
pub fn format_large_number(num: u64) -> String {
    if num < 1_000 {
        num.to_string()
    } else if num < 1_000_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else if num < 1_000_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else {
        format!("{:.1}B", num as f64 / 1_000_000_000.0)
    }
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let exp = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    format!("{:.2} {}", bytes as f64 / 1024_f64.powi(exp as i32), UNITS[exp])
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head)
}

/// Cooking time in minutes -> "45 min" / "1 h 30 min"
pub fn format_cooking_time(minutes: u32) -> String {
    if minutes == 0 {
        return "unknown".to_string();
    }
    if minutes < 60 {
        return format!("{} min", minutes);
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest > 0 {
        format!("{} h {} min", hours, rest)
    } else {
        format!("{} h", hours)
    }
}

/// Server difficulty keys -> display labels
pub fn format_difficulty(difficulty: &str) -> &'static str {
    match difficulty {
        "easy" => "easy",
        "medium" => "medium",
        "hard" => "hard",
        _ => "unknown",
    }
}

pub fn format_price(price: f64) -> String {
    format!("¥{:.2}", price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_time_pattern() {
        let time = Utc.with_ymd_and_hms(2025, 3, 7, 0, 0, 0).unwrap();
        let date_only = format_time(&time, "YYYY-MM-DD");
        assert_eq!(date_only.len(), 10);
        assert!(date_only.starts_with("2025-"));
    }

    #[test]
    fn test_format_relative_time() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

        let cases = [
            (Duration::seconds(30), "just now"),
            (Duration::minutes(5), "5 minutes ago"),
            (Duration::hours(3), "3 hours ago"),
            (Duration::days(3), "3 days ago"),
            (Duration::days(90), "3 months ago"),
            (Duration::days(800), "2 years ago"),
        ];
        for (ago, expected) in cases {
            assert_eq!(format_relative_time(&(now - ago), &now), expected);
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(-9876), "-9,876");
    }

    #[test]
    fn test_format_large_number() {
        assert_eq!(format_large_number(999), "999");
        assert_eq!(format_large_number(1_500), "1.5K");
        assert_eq!(format_large_number(2_300_000), "2.3M");
        assert_eq!(format_large_number(1_200_000_000), "1.2B");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512.00 B");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a longer line", 6), "a long...");
        assert_eq!(truncate_text("", 4), "");
    }

    #[test]
    fn test_format_cooking_time() {
        assert_eq!(format_cooking_time(0), "unknown");
        assert_eq!(format_cooking_time(45), "45 min");
        assert_eq!(format_cooking_time(60), "1 h");
        assert_eq!(format_cooking_time(90), "1 h 30 min");
    }

    #[test]
    fn test_format_difficulty_and_price() {
        assert_eq!(format_difficulty("easy"), "easy");
        assert_eq!(format_difficulty("fiendish"), "unknown");
        assert_eq!(format_price(12.5), "¥12.50");
    }
}
