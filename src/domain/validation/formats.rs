//! String format checks used by the validator.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;
use uuid::Uuid;

use super::schema::StringFormat;
use crate::domain::foundation::{Currency, LocaleTag};

static DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2})T(\d{2}:\d{2}(?::\d{2}(?:\.\d{1,9})?)?)(Z|[+-]\d{2}:?\d{2})?$",
    )
    .expect("date-time pattern is valid")
});

static UTC_OFFSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:Z|UTC|[+-](?:[01]\d|2[0-3]):?[0-5]\d)$").expect("offset pattern is valid"));

/// Pass/fail per time zone name; a name is resolved at most once.
static TIME_ZONE_CACHE: Lazy<Mutex<HashMap<String, bool>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Returns true if `value` satisfies `format`.
pub(crate) fn matches(format: &StringFormat, value: &str) -> bool {
    match format {
        StringFormat::Uuid => Uuid::parse_str(value).is_ok(),
        StringFormat::DateTime { require_timezone } => is_date_time(value, *require_timezone),
        StringFormat::TimeZone => is_time_zone(value),
        StringFormat::FilePath { extension } => is_absolute_path(value, *extension),
        StringFormat::Website => is_website(value),
        StringFormat::LocaleTag => LocaleTag::is_valid(value),
        StringFormat::Currency => Currency::is_valid(value),
    }
}

fn is_date_time(value: &str, require_timezone: bool) -> bool {
    let Some(captures) = DATE_TIME.captures(value) else {
        return false;
    };
    if require_timezone && captures.get(3).is_none() {
        return false;
    }

    let date_ok = NaiveDate::parse_from_str(&captures[1], "%Y-%m-%d").is_ok();
    let time = &captures[2];
    let time_ok = NaiveTime::parse_from_str(time, "%H:%M:%S%.f").is_ok()
        || NaiveTime::parse_from_str(time, "%H:%M").is_ok();

    date_ok && time_ok
}

fn is_time_zone(value: &str) -> bool {
    if UTC_OFFSET.is_match(value) {
        return true;
    }

    if let Ok(cache) = TIME_ZONE_CACHE.lock() {
        if let Some(known) = cache.get(value) {
            return *known;
        }
    }

    let valid = value.parse::<Tz>().is_ok();
    if let Ok(mut cache) = TIME_ZONE_CACHE.lock() {
        cache.insert(value.to_string(), valid);
    }
    valid
}

fn is_absolute_path(value: &str, extension: Option<&str>) -> bool {
    let path = Path::new(value);
    if !path.is_absolute() {
        return false;
    }
    match extension {
        Some(required) => path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(required))
            .unwrap_or(false),
        None => true,
    }
}

/// A website must spell out its scheme; bare hosts are rejected.
pub(crate) fn is_website(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return false;
    }
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
pub(crate) fn cached_time_zone(name: &str) -> Option<bool> {
    TIME_ZONE_CACHE
        .lock()
        .ok()
        .and_then(|cache| cache.get(name).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_time_with_and_without_timezone() {
        let tz = StringFormat::DateTime {
            require_timezone: true,
        };
        let any = StringFormat::DateTime {
            require_timezone: false,
        };

        assert!(matches(&tz, "2024-05-01T10:30:00Z"));
        assert!(matches(&tz, "2024-05-01T10:30:00.123+05:30"));
        assert!(!matches(&tz, "2024-05-01T10:30:00"));
        assert!(matches(&any, "2024-05-01T10:30:00"));
        assert!(matches(&any, "2024-05-01T10:30"));
    }

    #[test]
    fn date_time_rejects_impossible_dates() {
        let any = StringFormat::DateTime {
            require_timezone: false,
        };
        assert!(!matches(&any, "2024-02-30T10:30:00"));
        assert!(!matches(&any, "2024-05-01T25:00:00"));
        assert!(!matches(&any, "yesterday"));
    }

    #[test]
    fn time_zone_accepts_offsets_and_iana_names() {
        assert!(matches(&StringFormat::TimeZone, "+05:30"));
        assert!(matches(&StringFormat::TimeZone, "-0800"));
        assert!(matches(&StringFormat::TimeZone, "UTC"));
        assert!(matches(&StringFormat::TimeZone, "America/Chicago"));
        assert!(!matches(&StringFormat::TimeZone, "Mars/Olympus_Mons"));
    }

    #[test]
    fn time_zone_results_are_cached() {
        assert!(matches(&StringFormat::TimeZone, "Europe/Lisbon"));
        assert_eq!(cached_time_zone("Europe/Lisbon"), Some(true));

        assert!(!matches(&StringFormat::TimeZone, "Nowhere/Special"));
        assert_eq!(cached_time_zone("Nowhere/Special"), Some(false));
    }

    #[test]
    fn file_path_must_be_absolute_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let svg = dir.path().join("logo.svg");
        let png = dir.path().join("logo.png");
        let format = StringFormat::FilePath {
            extension: Some("svg"),
        };

        assert!(matches(&format, svg.to_str().unwrap()));
        assert!(!matches(&format, png.to_str().unwrap()));
        assert!(!matches(&format, "logo.svg"));
        assert!(matches(
            &StringFormat::FilePath { extension: None },
            png.to_str().unwrap()
        ));
    }

    #[test]
    fn website_requires_explicit_scheme() {
        assert!(is_website("https://example.com"));
        assert!(is_website("http://example.com/path?q=1"));
        assert!(!is_website("example.com"));
        assert!(!is_website("ftp://example.com"));
        assert!(!is_website("https://"));
    }
}
