use crate::db::session::SessionSummary;
use chrono::{DateTime, Local, TimeZone};

const DATE_FORMAT_TODAY: &str = "Today %H:%M";
const DATE_FORMAT_YESTERDAY: &str = "Yesterday %H:%M";
const DATE_FORMAT_OTHER: &str = "%Y-%m-%d";

pub fn format_session_date(timestamp: i64, today: DateTime<Local>) -> String {
    let Some(datetime) = Local.timestamp_opt(timestamp, 0).single() else {
        return "unknown date".to_string();
    };

    let session_date = datetime.date_naive();
    if session_date == today.date_naive() {
        datetime.format(DATE_FORMAT_TODAY).to_string()
    } else if session_date == today.date_naive() - chrono::Duration::days(1) {
        datetime.format(DATE_FORMAT_YESTERDAY).to_string()
    } else {
        datetime.format(DATE_FORMAT_OTHER).to_string()
    }
}

pub fn format_session_item(session: &SessionSummary, today: DateTime<Local>) -> String {
    let date = format_session_date(session.started_at, today);
    let status = if session.completed_at.is_some() {
        format!("{}/{} correct", session.cards_correct, session.cards_answered)
    } else {
        format!("{}/{} answered", session.cards_answered, session.cards_total)
    };
    format!("{} - {} ({})", date, session.deck_name, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn summary(started_at: i64, completed: bool) -> SessionSummary {
        SessionSummary {
            id: 1,
            deck_name: "capitals".to_string(),
            started_at,
            completed_at: completed.then_some(started_at + 60),
            cards_total: 10,
            cards_answered: 4,
            cards_correct: 3,
        }
    }

    #[test]
    fn test_format_session_date() {
        let today = Local.with_ymd_and_hms(2024, 3, 15, 18, 0, 0).unwrap();
        let this_morning = Local.with_ymd_and_hms(2024, 3, 15, 9, 5, 0).unwrap();
        let yesterday = this_morning - Duration::days(1);
        let last_week = this_morning - Duration::days(7);

        assert_eq!(format_session_date(this_morning.timestamp(), today), "Today 09:05");
        assert_eq!(format_session_date(yesterday.timestamp(), today), "Yesterday 09:05");
        assert_eq!(format_session_date(last_week.timestamp(), today), "2024-03-08");
    }

    #[test]
    fn test_format_session_item() {
        let today = Local.with_ymd_and_hms(2024, 3, 15, 18, 0, 0).unwrap();
        let started = Local.with_ymd_and_hms(2024, 3, 15, 9, 5, 0).unwrap().timestamp();

        assert_eq!(
            format_session_item(&summary(started, false), today),
            "Today 09:05 - capitals (4/10 answered)"
        );
        assert_eq!(
            format_session_item(&summary(started, true), today),
            "Today 09:05 - capitals (3/4 correct)"
        );
    }
}
