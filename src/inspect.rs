use chrono::DateTime;
use serde::Serialize;

use crate::{Error, Scru160Id};

/// Human-readable breakdown of a single identifier, as printed by
/// `scru160-inspect`.
///
/// Integer fields are rendered as decimal strings because `random80` does
/// not fit in a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inspection {
    pub input: String,
    pub canonical: String,
    pub timestamputc: String,
    pub timestamp: String,
    pub counter: String,
    pub random16: String,
    pub random80: String,
    pub hexfields: [String; 4],
}

impl Inspection {
    /// Build the report for an already decoded identifier.
    pub fn new(input: &str, id: &Scru160Id) -> Self {
        let fields = id.fields();
        let hex = id.to_hex_string();
        Self {
            input: input.to_owned(),
            canonical: id.to_sortable_string(),
            timestamputc: format_utc(fields.timestamp),
            timestamp: fields.timestamp.to_string(),
            counter: fields.counter.to_string(),
            random16: fields.random16.to_string(),
            random80: fields.random80.to_string(),
            hexfields: [
                hex[..12].to_owned(),
                hex[12..16].to_owned(),
                hex[16..20].to_owned(),
                hex[20..].to_owned(),
            ],
        }
    }

    /// Render as a pretty-printed JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Decode `text` and describe its fields.
///
/// # Errors
/// [`Error::InvalidFormat`] if `text` is not a valid encoding.
///
/// # Example
/// ```
/// let report = scru160::inspect("017f2b5e9a0c1234abcdef0123456789abcdef01").unwrap();
/// assert_eq!(report.canonical, "05VIMNKQ1G939AUDTS0I6HB7H6LSRRO1");
/// assert_eq!(report.timestamputc, "2022-02-24 10:54:54.476+00:00");
/// ```
pub fn inspect(text: &str) -> Result<Inspection, Error> {
    let id: Scru160Id = text.parse()?;
    Ok(Inspection::new(text, &id))
}

/// ISO-8601 UTC with millisecond precision and a space separator.
///
/// Years past 9999 carry a leading `+`. Every 48-bit timestamp is in chrono's
/// range, so the empty fallback is never produced for a decoded identifier.
fn format_utc(timestamp: u64) -> String {
    DateTime::from_timestamp_millis(timestamp as i64)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.3f+00:00").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_hex_input() {
        let report = inspect("017f2b5e9a0c1234abcdef0123456789abcdef01").unwrap();
        assert_eq!(
            report,
            Inspection {
                input: "017f2b5e9a0c1234abcdef0123456789abcdef01".into(),
                canonical: "05VIMNKQ1G939AUDTS0I6HB7H6LSRRO1".into(),
                timestamputc: "2022-02-24 10:54:54.476+00:00".into(),
                timestamp: "1645700094476".into(),
                counter: "4660".into(),
                random16: "43981".into(),
                random80: "1128666577701324626718465".into(),
                hexfields: [
                    "017f2b5e9a0c".into(),
                    "1234".into(),
                    "abcd".into(),
                    "ef0123456789abcdef01".into(),
                ],
            }
        );
    }

    #[test]
    fn keeps_original_input_and_canonicalizes() {
        let report = inspect("05vimnkq1g939audts0i6hb7h6lsrro1").unwrap();
        assert_eq!(report.input, "05vimnkq1g939audts0i6hb7h6lsrro1");
        assert_eq!(report.canonical, "05VIMNKQ1G939AUDTS0I6HB7H6LSRRO1");
        assert_eq!(report.counter, "4660");
    }

    #[test]
    fn formats_epoch_and_far_future() {
        assert_eq!(format_utc(0), "1970-01-01 00:00:00.000+00:00");
        assert_eq!(
            format_utc(253_402_300_799_999),
            "9999-12-31 23:59:59.999+00:00"
        );
    }

    /// The largest 48-bit timestamp lands in year 10889 and gets a sign
    #[test]
    fn formats_max_timestamp_with_signed_year() {
        let max = (1u64 << 48) - 1;
        assert_eq!(format_utc(max), "+10889-08-02 05:31:50.655+00:00");

        let report = inspect(&"f".repeat(40)).unwrap();
        assert_eq!(report.timestamp, max.to_string());
        assert_eq!(report.timestamputc, "+10889-08-02 05:31:50.655+00:00");
    }

    #[test]
    fn renders_json_object() {
        let report = inspect("05VIMNKQ1G939AUDTS0I6HB7H6LSRRO1").unwrap();
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["timestamp"], "1645700094476");
        assert_eq!(value["hexfields"][3], "ef0123456789abcdef01");
        assert!(json.starts_with("{\n"));
    }

    #[test]
    fn rejects_invalid_line() {
        assert!(matches!(
            inspect("not an identifier"),
            Err(Error::InvalidFormat(_))
        ));
    }
}
