use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a timestamp as `2025-01-31T10:00:00.000Z`
///
/// Fixed width, so string order matches time order in the document store.
pub fn format_iso(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts full RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC) and a
/// bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Deserialize `null` as the type's default
///
/// Stored documents sometimes carry explicit nulls where the model wants an
/// empty string or zero.
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serde adapter storing `DateTime<Utc>` as a millisecond ISO string
///
/// ```
/// use chrono::{DateTime, Utc};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Stamp {
///     #[serde(with = "shared::util::iso_millis")]
///     at: DateTime<Utc>,
/// }
/// ```
pub mod iso_millis {
    use super::{format_iso, parse_iso};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_iso(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_iso(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    /// Same as the parent module, but `null`, empty and unreadable values
    /// read as the current time instead of failing.
    ///
    /// Pair with `default = "Utc::now"` so a missing field behaves the same.
    pub mod or_now {
        use super::super::parse_iso;
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer};

        pub use super::serialize;

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            Ok(raw.as_deref().and_then(parse_iso).unwrap_or_else(Utc::now))
        }
    }

    /// Same as the parent module for `Option<DateTime<Utc>>`.
    ///
    /// `null`, missing and empty strings all read as `None`.
    pub mod option {
        use super::super::{format_iso, parse_iso};
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => serializer.serialize_str(&format_iso(dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(s) => parse_iso(s)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}"))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Stamp {
        #[serde(with = "iso_millis")]
        at: DateTime<Utc>,
        #[serde(default, with = "iso_millis::option")]
        until: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_format_is_fixed_width() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 31, 10, 0, 0).unwrap();
        assert_eq!(format_iso(&dt), "2025-01-31T10:00:00.000Z");
    }

    #[test]
    fn test_parse_variants() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_iso("2025-03-01"), Some(expected));
        assert_eq!(parse_iso("2025-03-01T00:00:00"), Some(expected));
        assert_eq!(parse_iso("2025-03-01T05:30:00+05:30"), Some(expected));
        assert_eq!(parse_iso("not a date"), None);
    }

    #[test]
    fn test_serde_round_trip_and_optional() {
        let stamp: Stamp = serde_json::from_str(r#"{"at":"2025-01-31T10:00:00Z","until":""}"#).unwrap();
        assert!(stamp.until.is_none());
        let json = serde_json::to_string(&stamp).unwrap();
        assert_eq!(json, r#"{"at":"2025-01-31T10:00:00.000Z","until":null}"#);

        let stamp: Stamp = serde_json::from_str(r#"{"at":"2025-01-31"}"#).unwrap();
        assert!(stamp.until.is_none());
    }

    #[derive(Debug, Deserialize)]
    struct Lenient {
        #[serde(default = "Utc::now", with = "iso_millis::or_now")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_or_now_tolerates_null_and_garbage() {
        let before = Utc::now();
        for json in [r#"{"at":null}"#, r#"{}"#, r#"{"at":""}"#, r#"{"at":"soon"}"#] {
            let lenient: Lenient = serde_json::from_str(json).unwrap();
            assert!(lenient.at >= before, "{json}");
        }

        let lenient: Lenient = serde_json::from_str(r#"{"at":"2025-01-31T10:00:00.000Z"}"#).unwrap();
        assert_eq!(lenient.at, Utc.with_ymd_and_hms(2025, 1, 31, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_lexicographic_order_matches_time() {
        let a = format_iso(&Utc.with_ymd_and_hms(2025, 1, 9, 23, 0, 0).unwrap());
        let b = format_iso(&Utc.with_ymd_and_hms(2025, 1, 10, 1, 0, 0).unwrap());
        assert!(a < b);
    }
}
