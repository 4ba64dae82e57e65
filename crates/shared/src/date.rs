use time::{Date, OffsetDateTime};
use time_tz::{OffsetDateTimeExt, timezones};

/// Current instant expressed in the given IANA timezone.
///
/// Unknown timezone names fall back to UTC.
pub fn now(tz: impl Into<String>) -> OffsetDateTime {
    let tz = tz.into();
    let mut now = OffsetDateTime::now_utc();

    if let Some(tz) = timezones::get_by_name(&tz) {
        now = now.to_timezone(tz);
    }

    now
}

/// Calendar date of `now` in the given timezone.
pub fn today(tz: impl Into<String>) -> Date {
    now(tz).date()
}

pub fn is_known_timezone(tz: &str) -> bool {
    tz.eq_ignore_ascii_case("utc") || timezones::get_by_name(tz).is_some()
}
