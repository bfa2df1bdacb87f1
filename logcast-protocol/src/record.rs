/*
Wire format of a log record (one WebSocket text message per record):

hash: <unique id>, number: <RFC 3339 timestamp>
*/
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use uuid::Uuid;

use crate::errors::ProtocolError;

/// An immutable, formatted log line.
///
/// Clones share the same buffer, so fanning one record out to many
/// consumers never copies the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogRecord {
    text: Arc<str>,
}

/// Fields of a record in the default `hash: .., number: ..` layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields<'a> {
    pub hash: &'a str,
    pub number: DateTime<FixedOffset>,
}

impl LogRecord {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self { text: text.into() }
    }

    /// Builds a record in the default layout from a unique id and a tick time.
    pub fn stamped(id: Uuid, at: DateTime<Utc>) -> Self {
        Self::new(format!(
            "hash: {}, number: {}",
            id,
            at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ))
    }

    pub fn from_utf8(payload: Bytes) -> Result<Self, ProtocolError> {
        let text = std::str::from_utf8(&payload).map_err(|_| ProtocolError::InvalidUtf8)?;
        Ok(Self::new(text))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Parses the `hash` and `number` fields. Whitespace around keys and
    /// values is ignored, so `hash:X, number:T` parses as well.
    pub fn fields(&self) -> Result<RecordFields<'_>, ProtocolError> {
        let mut hash = None;
        let mut number = None;

        for part in self.text.split(',') {
            let Some((key, value)) = part.split_once(':') else {
                continue;
            };
            match key.trim() {
                "hash" => hash = Some(value.trim()),
                "number" => number = Some(value.trim()),
                _ => {}
            }
        }

        let hash = hash
            .filter(|h| !h.is_empty())
            .ok_or(ProtocolError::MissingField("hash"))?;
        let number = number.ok_or(ProtocolError::MissingField("number"))?;

        Ok(RecordFields {
            hash,
            number: DateTime::parse_from_rfc3339(number)?,
        })
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<String> for LogRecord {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for LogRecord {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stamped_record_uses_default_layout() {
        let id = Uuid::parse_str("01890a5d-ac96-774b-bcce-b302099a8057").unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let record = LogRecord::stamped(id, at);

        assert_eq!(
            record.as_str(),
            "hash: 01890a5d-ac96-774b-bcce-b302099a8057, number: 2024-01-01T00:00:00Z"
        );
    }

    #[test]
    fn test_fields_parse_compact_layout() {
        let record = LogRecord::from("hash:01HABCDEF, number:2024-01-01T00:00:00Z");

        let fields = record.fields().expect("fields should parse");

        assert_eq!(fields.hash, "01HABCDEF");
        assert_eq!(
            fields.number,
            DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap()
        );
    }

    #[test]
    fn test_fields_report_missing_hash() {
        let record = LogRecord::from("number: 2024-01-01T00:00:00Z");

        assert!(matches!(
            record.fields(),
            Err(ProtocolError::MissingField("hash"))
        ));
    }

    #[test]
    fn test_fields_reject_bad_timestamp() {
        let record = LogRecord::from("hash: abc, number: yesterday");

        assert!(matches!(
            record.fields(),
            Err(ProtocolError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_from_utf8_rejects_invalid_bytes() {
        let payload = Bytes::from_static(&[0x68, 0xff, 0xfe]);

        assert!(matches!(
            LogRecord::from_utf8(payload),
            Err(ProtocolError::InvalidUtf8)
        ));
    }

    #[test]
    fn test_clones_share_the_same_text() {
        let record = LogRecord::from("hash: a, number: 2024-01-01T00:00:00Z");
        let copy = record.clone();

        assert!(std::ptr::eq(record.as_str(), copy.as_str()));
    }
}
