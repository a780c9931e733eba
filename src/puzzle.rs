//! Puzzle-date bucketing, time validation, and time rendering.
//!
//! Every date rule in the bot is evaluated in the New York timezone: the
//! daily mini flips over at 10 PM on weekdays and 6 PM on weekends, so a
//! submission made after the cutoff counts towards tomorrow's puzzle.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use thiserror::Error;

/// Fixed timezone the puzzle publishes in.
pub const PUZZLE_TZ: Tz = chrono_tz::America::New_York;

/// Largest accepted solve time, in seconds.
pub const MAX_SCORE_SECONDS: u32 = 1000;

const WEEKDAY_CUTOFF_HOUR: u32 = 22;
const WEEKEND_CUTOFF_HOUR: u32 = 18;

/// The two independently averaged score populations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Any puzzle whose date is not a Saturday.
    Weekday,
    /// The (larger) Saturday puzzle.
    Saturday,
}

impl Bucket {
    /// Bucket a stored puzzle-date by its day of week.
    pub fn of(date: NaiveDate) -> Self {
        if date.weekday() == Weekday::Sat {
            Bucket::Saturday
        } else {
            Bucket::Weekday
        }
    }

    /// Maximum age, in days, of a user's most recent qualifying score before
    /// they drop off this bucket's leaderboard.
    pub fn staleness_days(self) -> i64 {
        match self {
            Bucket::Weekday => 10,
            Bucket::Saturday => 30,
        }
    }

    /// Label used in user-facing average lines.
    pub fn label(self) -> &'static str {
        match self {
            Bucket::Weekday => "Regular",
            Bucket::Saturday => "Saturday",
        }
    }
}

/// Current moment in the puzzle timezone.
pub fn now_in_puzzle_tz() -> DateTime<Tz> {
    Utc::now().with_timezone(&PUZZLE_TZ)
}

/// Puzzle date a submission made at `now` is attributed to.
///
/// The cutoff is evaluated on the current day-of-week, not the bucketed one:
/// a Sunday 6 PM submission already belongs to Monday's puzzle.
pub fn puzzle_date(now: DateTime<Tz>) -> NaiveDate {
    let weekend = matches!(now.weekday(), Weekday::Sat | Weekday::Sun);
    let rolled_over =
        (weekend && now.hour() >= WEEKEND_CUTOFF_HOUR) || now.hour() >= WEEKDAY_CUTOFF_HOUR;

    let date = now.date_naive();
    if rolled_over {
        date + Duration::days(1)
    } else {
        date
    }
}

/// Rejection for any unusable time submission. Deliberately carries no
/// detail; every bad input gets the same refusal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid time")]
pub struct InvalidScore;

/// Parse a raw submission into validated seconds in `1..=MAX_SCORE_SECONDS`.
///
/// Accepted forms are a bare base-10 integer and a `M:SS` clock string with
/// both parts in `0..=59`.
pub fn parse_score(input: &str) -> Result<u32, InvalidScore> {
    let input = input.trim();
    let seconds = match input.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u32 = minutes.parse().map_err(|_| InvalidScore)?;
            let seconds: u32 = seconds.parse().map_err(|_| InvalidScore)?;
            if minutes > 59 || seconds > 59 {
                return Err(InvalidScore);
            }
            minutes * 60 + seconds
        }
        None => input.parse().map_err(|_| InvalidScore)?,
    };

    if (1..=MAX_SCORE_SECONDS).contains(&seconds) {
        Ok(seconds)
    } else {
        Err(InvalidScore)
    }
}

/// Render seconds as `m:ss` above 59 seconds, bare seconds otherwise.
pub fn format_time(seconds: i64) -> String {
    if seconds > 59 {
        format!("{}:{:02}", seconds / 60, seconds % 60)
    } else {
        seconds.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Tz> {
        PUZZLE_TZ.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekday_before_cutoff_is_today() {
        // 2021-03-03 was a Wednesday.
        assert_eq!(puzzle_date(at(2021, 3, 3, 21)), date(2021, 3, 3));
        assert_eq!(puzzle_date(at(2021, 3, 3, 0)), date(2021, 3, 3));
    }

    #[test]
    fn weekday_after_cutoff_is_tomorrow() {
        assert_eq!(puzzle_date(at(2021, 3, 3, 22)), date(2021, 3, 4));
        assert_eq!(puzzle_date(at(2021, 3, 3, 23)), date(2021, 3, 4));
    }

    #[test]
    fn weekend_cutoff_is_six_pm() {
        // 2021-03-06 Saturday, 2021-03-07 Sunday.
        assert_eq!(puzzle_date(at(2021, 3, 6, 17)), date(2021, 3, 6));
        assert_eq!(puzzle_date(at(2021, 3, 6, 18)), date(2021, 3, 7));
        assert_eq!(puzzle_date(at(2021, 3, 7, 17)), date(2021, 3, 7));
        assert_eq!(puzzle_date(at(2021, 3, 7, 18)), date(2021, 3, 8));
    }

    #[test]
    fn weekend_evening_stays_weekend_rule() {
        // Friday 6 PM is still before the weekday cutoff.
        assert_eq!(puzzle_date(at(2021, 3, 5, 18)), date(2021, 3, 5));
    }

    #[test]
    fn rollover_crosses_month_boundary() {
        // 2021-03-31 was a Wednesday.
        assert_eq!(puzzle_date(at(2021, 3, 31, 23)), date(2021, 4, 1));
    }

    #[test]
    fn bucket_splits_on_saturday() {
        assert_eq!(Bucket::of(date(2021, 3, 6)), Bucket::Saturday);
        assert_eq!(Bucket::of(date(2021, 3, 7)), Bucket::Weekday);
        assert_eq!(Bucket::of(date(2021, 3, 3)), Bucket::Weekday);
    }

    #[test]
    fn parses_bare_seconds() {
        assert_eq!(parse_score("75"), Ok(75));
        assert_eq!(parse_score(" 75 "), Ok(75));
        assert_eq!(parse_score("1"), Ok(1));
        assert_eq!(parse_score("1000"), Ok(1000));
    }

    #[test]
    fn parses_clock_form() {
        assert_eq!(parse_score("1:15"), Ok(75));
        assert_eq!(parse_score("0:45"), Ok(45));
        assert_eq!(parse_score("16:40"), Ok(1000));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(parse_score("0"), Err(InvalidScore));
        assert_eq!(parse_score("1001"), Err(InvalidScore));
        assert_eq!(parse_score("0:00"), Err(InvalidScore));
        assert_eq!(parse_score("16:41"), Err(InvalidScore));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_score("abc"), Err(InvalidScore));
        assert_eq!(parse_score(""), Err(InvalidScore));
        assert_eq!(parse_score("61:00"), Err(InvalidScore));
        assert_eq!(parse_score("1:60"), Err(InvalidScore));
        assert_eq!(parse_score("1:2:3"), Err(InvalidScore));
        assert_eq!(parse_score("-30"), Err(InvalidScore));
    }

    #[test]
    fn formats_times() {
        assert_eq!(format_time(59), "59");
        assert_eq!(format_time(60), "1:00");
        assert_eq!(format_time(75), "1:15");
        assert_eq!(format_time(125), "2:05");
        assert_eq!(format_time(1), "1");
    }
}
