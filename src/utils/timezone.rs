use chrono::offset::Offset;
use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use std::str::FromStr;

use crate::error::AppError;

/// Timezone used for day grouping, quick-range boundaries, and display.
///
/// The dashboard groups records by *local* calendar day; this makes the
/// notion of "local" explicit and overridable instead of ambient.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Timezone {
    Local,
    Named(Tz),
}

impl Timezone {
    pub(crate) fn parse(value: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = value else {
            return Ok(Timezone::Local);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("local") {
            return Ok(Timezone::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            return Ok(Timezone::Named(chrono_tz::UTC));
        }
        Tz::from_str(trimmed)
            .map(Timezone::Named)
            .map_err(|_| AppError::InvalidTimezone {
                input: trimmed.to_string(),
            })
    }

    /// Shift a UTC instant into this timezone, erased to a fixed offset.
    pub(crate) fn to_fixed_offset(self, utc: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Timezone::Local => {
                let local = utc.with_timezone(&Local);
                let offset = local.offset().fix();
                local.with_timezone(&offset)
            }
            Timezone::Named(tz) => {
                let local = utc.with_timezone(&tz);
                let offset = local.offset().fix();
                local.with_timezone(&offset)
            }
        }
    }

    /// Calendar date of a UTC instant in this timezone.
    pub(crate) fn local_date(self, utc: DateTime<Utc>) -> NaiveDate {
        self.to_fixed_offset(utc).date_naive()
    }

    /// "YYYY-MM-DD" day key used for rollups and quick ranges.
    pub(crate) fn day_key(self, utc: DateTime<Utc>) -> String {
        self.local_date(utc).format("%Y-%m-%d").to_string()
    }

    /// "YYYY-MM" month key used for quick ranges.
    pub(crate) fn month_key(self, utc: DateTime<Utc>) -> String {
        self.local_date(utc).format("%Y-%m").to_string()
    }

    /// Resolve a naive wall-clock time in this timezone to a UTC instant.
    ///
    /// DST ambiguity picks the earlier instant; a nonexistent wall time
    /// falls back to reading the naive value as UTC.
    pub(crate) fn resolve_local(self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self {
            Timezone::Local => resolve_in(&Local, naive),
            Timezone::Named(tz) => resolve_in(&tz, naive),
        }
    }
}

fn resolve_in<T: TimeZone>(tz: &T, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn parse_none_returns_local() {
        assert!(matches!(Timezone::parse(None).unwrap(), Timezone::Local));
    }

    #[test]
    fn parse_empty_and_local_strings() {
        assert!(matches!(
            Timezone::parse(Some("")).unwrap(),
            Timezone::Local
        ));
        assert!(matches!(
            Timezone::parse(Some("LOCAL")).unwrap(),
            Timezone::Local
        ));
    }

    #[test]
    fn parse_utc_variants() {
        assert!(matches!(
            Timezone::parse(Some("utc")).unwrap(),
            Timezone::Named(chrono_tz::UTC)
        ));
        assert!(matches!(
            Timezone::parse(Some("Z")).unwrap(),
            Timezone::Named(chrono_tz::UTC)
        ));
    }

    #[test]
    fn parse_named_timezone() {
        let tz = Timezone::parse(Some("Asia/Shanghai")).unwrap();
        assert!(matches!(tz, Timezone::Named(chrono_tz::Asia::Shanghai)));
    }

    #[test]
    fn parse_invalid_timezone_returns_error() {
        let err = Timezone::parse(Some("Mars/Olympus")).unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn day_key_shifts_with_timezone() {
        let utc = "2024-01-01T23:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let shanghai = Timezone::parse(Some("Asia/Shanghai")).unwrap();
        assert_eq!(shanghai.day_key(utc), "2024-01-02");
        let utc_tz = Timezone::Named(chrono_tz::UTC);
        assert_eq!(utc_tz.day_key(utc), "2024-01-01");
    }

    #[test]
    fn month_key_from_utc() {
        let utc = "2024-03-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(Timezone::Named(chrono_tz::UTC).month_key(utc), "2024-03");
    }

    #[test]
    fn resolve_local_round_trips_in_utc() {
        let naive = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_time(NaiveTime::MIN);
        let resolved = Timezone::Named(chrono_tz::UTC).resolve_local(naive);
        assert_eq!(resolved.to_rfc3339(), "2024-06-01T00:00:00+00:00");
    }

    #[test]
    fn resolve_local_applies_offset() {
        let naive = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_time(NaiveTime::MIN);
        let tz = Timezone::parse(Some("America/New_York")).unwrap();
        // EDT midnight is 04:00 UTC
        assert_eq!(tz.resolve_local(naive).to_rfc3339(), "2024-06-01T04:00:00+00:00");
    }
}
