//! Human-readable distances between two instants.
//!
//! Distances are bucketed on a coarse scale ("about 1 hour", "3 days",
//! "over 2 years") rather than reported exactly. The scale is symmetric: the
//! same words describe a gap whichever instant comes first.

use chrono::{DateTime, Datelike, Utc};

const MINUTES_IN_HOUR: i64 = 60;
const MINUTES_IN_DAY: i64 = 1_440;
const MINUTES_IN_ALMOST_TWO_DAYS: i64 = 2_520;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;

/// Describes the distance between two instants, without a direction.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use liftoff::domain::distance::distance_in_words;
///
/// let a = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// let b = Utc.with_ymd_and_hms(2025, 1, 3, 0, 0, 0).unwrap();
/// assert_eq!(distance_in_words(a, b), "2 days");
/// assert_eq!(distance_in_words(b, a), "2 days");
/// ```
#[must_use]
pub fn distance_in_words(a: DateTime<Utc>, b: DateTime<Utc>) -> String {
    let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
    let seconds = (later - earlier).num_seconds();
    let minutes = round_div(seconds, 60);

    if minutes == 0 {
        return "less than a minute".to_string();
    }
    if minutes < 2 {
        return "1 minute".to_string();
    }
    if minutes < 45 {
        return format!("{minutes} minutes");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        let hours = round_div(minutes, MINUTES_IN_HOUR);
        return format!("about {}", plural(hours, "hour"));
    }
    if minutes < MINUTES_IN_ALMOST_TWO_DAYS {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        let days = round_div(minutes, MINUTES_IN_DAY);
        return plural(days, "day");
    }
    if minutes < MINUTES_IN_TWO_MONTHS {
        let months = round_div(minutes, MINUTES_IN_MONTH);
        return format!("about {}", plural(months, "month"));
    }

    let months = calendar_months_between(earlier, later);
    if months < 12 {
        let nearest = round_div(minutes, MINUTES_IN_MONTH);
        return plural(nearest, "month");
    }

    let years = months / 12;
    match months % 12 {
        0..=2 => format!("about {}", plural(years, "year")),
        3..=8 => format!("over {}", plural(years, "year")),
        _ => format!("almost {}", plural(years + 1, "year")),
    }
}

/// Describes how far `target` is from `now`, with a direction.
///
/// Future instants read "in 3 days", past ones "3 days ago".
#[must_use]
pub fn distance_with_suffix(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let words = distance_in_words(target, now);
    if target > now {
        format!("in {words}")
    } else {
        format!("{words} ago")
    }
}

/// Whole calendar months from `earlier` to `later`.
///
/// A month only counts once `later` has reached the same day and time of
/// month that `earlier` started from.
fn calendar_months_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month())
        - i64::from(earlier.month());
    if months > 0 && (later.day(), later.time()) < (earlier.day(), earlier.time()) {
        months -= 1;
    }
    months
}

/// Integer division rounding halves up, for non-negative numerators.
const fn round_div(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator / 2) / denominator
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn words_after(offset: Duration) -> String {
        distance_in_words(base(), base() + offset)
    }

    #[test]
    fn sub_minute_and_minutes() {
        assert_eq!(words_after(Duration::seconds(10)), "less than a minute");
        assert_eq!(words_after(Duration::seconds(50)), "1 minute");
        assert_eq!(words_after(Duration::minutes(5)), "5 minutes");
        assert_eq!(words_after(Duration::minutes(44)), "44 minutes");
    }

    #[test]
    fn hours() {
        assert_eq!(words_after(Duration::minutes(45)), "about 1 hour");
        assert_eq!(words_after(Duration::minutes(89)), "about 1 hour");
        assert_eq!(words_after(Duration::minutes(90)), "about 2 hours");
        assert_eq!(words_after(Duration::hours(23)), "about 23 hours");
    }

    #[test]
    fn days() {
        assert_eq!(words_after(Duration::hours(24)), "1 day");
        assert_eq!(words_after(Duration::hours(41)), "1 day");
        assert_eq!(words_after(Duration::hours(42)), "2 days");
        assert_eq!(words_after(Duration::days(3)), "3 days");
        assert_eq!(words_after(Duration::days(29)), "29 days");
    }

    #[test]
    fn months_and_years() {
        assert_eq!(words_after(Duration::days(30)), "about 1 month");
        assert_eq!(words_after(Duration::days(50)), "about 2 months");
        assert_eq!(words_after(Duration::days(100)), "3 months");
        assert_eq!(words_after(Duration::days(366)), "about 1 year");
        assert_eq!(words_after(Duration::days(365 + 180)), "over 1 year");
        assert_eq!(words_after(Duration::days(365 + 330)), "almost 2 years");
    }

    #[test]
    fn direction_is_ignored_without_suffix() {
        let later = base() + Duration::days(3);
        assert_eq!(distance_in_words(later, base()), "3 days");
    }

    #[test]
    fn suffix_reflects_direction() {
        let later = base() + Duration::days(3);
        assert_eq!(distance_with_suffix(later, base()), "in 3 days");
        assert_eq!(distance_with_suffix(base(), later), "3 days ago");
    }
}
