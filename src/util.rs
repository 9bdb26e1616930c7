use crate::error::{ArtError, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

/// Parse an anchor date given on the command line.
///
/// Accepts RFC3339 (keeping its offset), `YYYY-MM-DD` (midnight UTC) and
/// relative forms like `3 days ago` or `2 weeks ago`, measured from `now`.
pub fn parse_anchor(input: &str, now: DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>> {
    // RFC3339
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt);
    }

    // YYYY-MM-DD
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&datetime).fixed_offset());
        }
    }

    if let Some(duration) = parse_relative(input) {
        return now
            .checked_sub_signed(duration)
            .ok_or_else(|| ArtError::InvalidDate(format!("Duration overflow for '{input}'")));
    }

    Err(ArtError::InvalidDate(format!(
        "'{input}' is not RFC3339, YYYY-MM-DD, or 'N days/weeks ago'"
    )))
}

fn parse_relative(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();

    if let Some(days) = input.strip_suffix(" days ago").or_else(|| input.strip_suffix(" day ago")) {
        return days.trim().parse::<i64>().ok().and_then(Duration::try_days);
    }

    if let Some(weeks) = input.strip_suffix(" weeks ago").or_else(|| input.strip_suffix(" week ago")) {
        return weeks.trim().parse::<i64>().ok().and_then(Duration::try_weeks);
    }

    None
}

pub fn plural(count: u64) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-14T15:00:00+02:00").unwrap()
    }

    #[test]
    fn keeps_rfc3339_offset() {
        let parsed = parse_anchor("2026-03-01T08:30:00-05:00", now()).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(parsed.to_rfc3339(), "2026-03-01T08:30:00-05:00");
    }

    #[test]
    fn plain_date_is_midnight_utc() {
        let parsed = parse_anchor("2026-03-01", now()).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-03-01T00:00:00+00:00");
    }

    #[test]
    fn relative_dates_count_back_from_now() {
        assert_eq!(parse_anchor("3 days ago", now()).unwrap(), now() - Duration::days(3));
        assert_eq!(parse_anchor("1 week ago", now()).unwrap(), now() - Duration::days(7));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_anchor("yesterday-ish", now()), Err(ArtError::InvalidDate(_))));
    }
}
