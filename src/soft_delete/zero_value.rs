use crate::{Field, TAG_ZERO_VALUE};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%H:%M:%S %b %d, %Y",
];

const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%m/%d/%Y"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M%p"];

/// Resolve the "not deleted" sentinel of a soft delete field.
///
/// Returns the `ZEROVALUE` tag verbatim when it parses as a point in time, and `None`
/// (compare against `NULL`) when the tag is absent or malformed.
pub fn parse_zero_value_tag(field: &Field) -> Option<String> {
    let value = field.tag_setting(TAG_ZERO_VALUE)?;
    match parse_time(value) {
        Some(_) => Some(value.to_owned()),
        None => {
            tracing::debug!(
                field = field.name.as_str(),
                value,
                "ignoring unparseable zero value, falling back to NULL"
            );
            None
        }
    }
}

/// Parse a date/time literal permissively.
///
/// Accepts RFC 3339 and RFC 2822, `YYYY-M-D H:M:S[.f]` with optional `T` separator or
/// offset, a trailing zone name (`2006-01-02 15:04:05 -0700 MST`), `YYYY/M/D`, `YYYY.M.D`,
/// `M/D/YYYY`, `YYYYMMDD`, a bare `YYYY-M-D H`, `YYYY-M`, `YYYY`, month-day `M-D` (this
/// year) and time-only `H[:M[:S]]` or `H:MPM` (today).
pub fn parse_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    parse_layouts(value).or_else(|| strip_zone_name(value).and_then(parse_layouts))
}

fn parse_layouts(value: &str) -> Option<NaiveDateTime> {
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.naive_utc());
    }
    if let Ok(t) = DateTime::parse_from_rfc2822(value) {
        return Some(t.naive_utc());
    }
    for format in ZONED_FORMATS {
        if let Ok(t) = DateTime::parse_from_str(value, format) {
            return Some(t.naive_utc());
        }
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(value, format) {
            return Some(t);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    for format in TIME_FORMATS {
        if let Ok(t) = NaiveTime::parse_from_str(value, format) {
            return Some(today().and_time(t));
        }
    }

    // `YYYY-M-D H`
    if let Some((date, hour)) = value.split_once(' ') {
        if is_digits(hour, 1, 2) {
            return NaiveDateTime::parse_from_str(&format!("{date} {hour}:0"), "%Y-%m-%d %H:%M")
                .ok();
        }
    }
    if let Some((first, second)) = value.split_once('-') {
        // `YYYY-M`
        if is_digits(first, 4, 4) && is_digits(second, 1, 2) {
            return NaiveDate::parse_from_str(&format!("{first}-{second}-1"), "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0));
        }
        // `M-D`
        if is_digits(first, 1, 2) && is_digits(second, 1, 2) {
            let (month, day) = (first.parse().ok()?, second.parse().ok()?);
            return NaiveDate::from_ymd_opt(today().year(), month, day)
                .and_then(|d| d.and_hms_opt(0, 0, 0));
        }
    }
    // `YYYYMMDD`
    if is_digits(value, 8, 8) {
        let (year, month, day) = (
            value[..4].parse().ok()?,
            value[4..6].parse().ok()?,
            value[6..].parse().ok()?,
        );
        return NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0));
    }
    // `YYYY`
    if is_digits(value, 4, 4) {
        return value
            .parse()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
            .and_then(|d| d.and_hms_opt(0, 0, 0));
    }
    // `H`
    if is_digits(value, 1, 2) {
        return value
            .parse()
            .ok()
            .and_then(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
            .map(|t| today().and_time(t));
    }

    None
}

/// Drop a trailing zone abbreviation such as `MST` or `UTC`
fn strip_zone_name(value: &str) -> Option<&str> {
    let (rest, zone) = value.rsplit_once(' ')?;
    (zone.len() >= 3 && zone.bytes().all(|b| b.is_ascii_uppercase())).then(|| rest.trim_end())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn is_digits(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}
