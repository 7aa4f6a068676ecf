use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates to at most `max_width` terminal columns, ending with "..." when cut.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width < 3 {
        return ".".repeat(max_width);
    }

    let budget = max_width - 3;
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push_str("...");
    out
}

/// Human description of when a card is due relative to `now`, in local time.
pub fn format_due(due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    format_due_in(due, now, &Local)
}

fn format_due_in<Tz>(due: Option<DateTime<Utc>>, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(due) = due else {
        return "due now".to_string();
    };
    if due <= now {
        return "due now".to_string();
    }

    let due = due.with_timezone(tz);
    let days = (due.date_naive() - now.with_timezone(tz).date_naive()).num_days();
    match days {
        0 => format!("due at {}", due.format("%H:%M")),
        1 => "due tomorrow".to_string(),
        n => format!("due in {} days", n),
    }
}

pub fn format_interval(days: u64) -> String {
    match days {
        0 => "again today".to_string(),
        1 => "1 day".to_string(),
        n => format!("{} days", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    #[test]
    fn test_truncate_string_no_truncation() {
        assert_eq!(truncate_string("Short string", 20), "Short string");
    }

    #[test]
    fn test_truncate_string_with_truncation() {
        let result = truncate_string("This is a very long string that should be truncated", 20);
        assert_eq!(result, "This is a very lo...");
        assert_eq!(result.width(), 20);
    }

    #[test]
    fn test_truncate_string_exact_length() {
        assert_eq!(truncate_string("Exactly twenty!!", 16), "Exactly twenty!!");
    }

    #[test]
    fn test_truncate_string_wide_chars() {
        // Each CJK char takes two columns.
        let result = truncate_string("日本語のテキスト", 9);
        assert_eq!(result, "日本語...");
        assert!(result.width() <= 9);
    }

    #[test]
    fn test_truncate_string_tiny_width() {
        assert_eq!(truncate_string("abcdef", 2), "..");
        assert_eq!(truncate_string("", 0), "");
    }

    #[test]
    fn test_format_due() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(format_due_in(None, now, &Utc), "due now");
        assert_eq!(format_due_in(Some(now - Duration::days(3)), now, &Utc), "due now");
        assert_eq!(format_due_in(Some(now), now, &Utc), "due now");
        assert_eq!(format_due_in(Some(now + Duration::hours(2)), now, &Utc), "due at 12:00");
        assert_eq!(format_due_in(Some(now + Duration::days(1)), now, &Utc), "due tomorrow");
        assert_eq!(format_due_in(Some(now + Duration::days(7)), now, &Utc), "due in 7 days");
    }

    #[test]
    fn test_format_due_uses_display_time_zone() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();

        assert_eq!(format_due_in(Some(now + Duration::hours(2)), now, &tokyo), "due at 21:00");
        // 10:00 UTC + 5h is still Jan 1 in UTC but already Jan 2 in Tokyo.
        assert_eq!(format_due_in(Some(now + Duration::hours(5)), now, &tokyo), "due tomorrow");
        assert_eq!(format_due_in(Some(now + Duration::hours(5)), now, &Utc), "due at 15:00");
    }

    #[test]
    fn test_format_due_local_matches_local_clock() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let due = now + Duration::minutes(30);
        let local = due.with_timezone(&Local);
        let expected = if local.date_naive() == now.with_timezone(&Local).date_naive() {
            format!("due at {}", local.format("%H:%M"))
        } else {
            "due tomorrow".to_string()
        };
        assert_eq!(format_due(Some(due), now), expected);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "again today");
        assert_eq!(format_interval(1), "1 day");
        assert_eq!(format_interval(30), "30 days");
    }
}
