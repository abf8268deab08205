use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Naive layouts the backend emits when it stamps records with local
/// `isoformat()` output instead of RFC 3339.
const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a backend timestamp. Values without an offset are local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
}

/// Current time in the same shape the browser client sent (`toISOString`).
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Short local clock time for list rows, e.g. `14:22`.
pub fn format_clock(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.with_timezone(&Local).format("%H:%M").to_string(),
        None => raw.to_string(),
    }
}

/// Local date and time for detail views and the history table.
pub fn format_datetime(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => raw.to_string(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

/// Accept post identifiers sent either as JSON strings or numbers.
pub fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Signed(n) => n.to_string(),
        RawId::Unsigned(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    })
}

/// Treat an explicit JSON `null` like a missing field.
pub fn de_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339_zulu() {
        let ts = parse_timestamp("2025-05-17T10:12:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 5, 17, 10, 12, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2025-05-17T12:12:00+02:00").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn test_parse_naive_isoformat_as_local() {
        let ts = parse_timestamp("2025-05-18T09:15:30.123456").unwrap();
        let local = ts.with_timezone(&Local);
        assert_eq!(local.day(), 18);
        assert_eq!(local.hour(), 9);
        assert_eq!(local.minute(), 15);
        assert_eq!(local.second(), 30);

        let expected = Local
            .with_ymd_and_hms(2025, 5, 18, 9, 15, 30)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(ts.timestamp(), expected.timestamp());
    }

    #[test]
    fn test_naive_and_zulu_compare_in_real_time() {
        let naive = parse_timestamp("2025-05-17T10:00:00").unwrap();
        let zulu_text = Local
            .with_ymd_and_hms(2025, 5, 17, 10, 5, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let zulu = parse_timestamp(&zulu_text).unwrap();
        assert_eq!((zulu - naive).num_minutes(), 5);
    }

    #[test]
    fn test_parse_space_separated() {
        assert!(parse_timestamp("2025-05-18 09:15:00").is_some());
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_now_timestamp_parses_back() {
        let now = now_timestamp();
        assert!(now.ends_with('Z'));
        assert!(parse_timestamp(&now).is_some());
    }

    #[test]
    fn test_format_falls_back_to_raw() {
        assert_eq!(format_clock("not a time"), "not a time");
        assert_eq!(format_datetime(""), "");
    }

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "de_id")]
        id: String,
        #[serde(default, deserialize_with = "de_null_default")]
        tags: Vec<String>,
    }

    #[test]
    fn test_de_id_accepts_numbers_and_strings() {
        let h: Holder = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(h.id, "1");
        let h: Holder = serde_json::from_str(r#"{"id": "001"}"#).unwrap();
        assert_eq!(h.id, "001");
    }

    #[test]
    fn test_de_null_default() {
        let h: Holder = serde_json::from_str(r#"{"id": "a", "tags": null}"#).unwrap();
        assert!(h.tags.is_empty());
        let h: Holder = serde_json::from_str(r#"{"id": "a"}"#).unwrap();
        assert!(h.tags.is_empty());
    }
}
