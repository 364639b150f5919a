//! Partial updates from untyped JSON bodies
//!
//! A PATCH body is a loose JSON object. A key that is missing leaves the
//! field alone, while a key that is present (even with `null`) is applied
//! according to that field's rule. [`Field`] keeps those two cases apart,
//! which a plain `Option` cannot do because serde maps `null` to `None`.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{Inspection, InspectionStatus};

/// A patch field: either absent from the body or present with a value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Field<T> {
    /// Key not in the body
    #[default]
    Absent,
    /// Key in the body; the value may still be JSON `null`
    Present(T),
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent => None,
        }
    }
}

// Only reached when the key exists; missing keys fall back to `Default`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Field::Present)
    }
}

/// Body of `PATCH /api/inspections/{id}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionPatch {
    #[serde(default)]
    pub status: Field<Value>,
    #[serde(default)]
    pub notes: Field<Value>,
    #[serde(default)]
    pub starred: Field<Value>,
    #[serde(default)]
    pub inspected_at: Field<Value>,
    #[serde(default)]
    pub maintenance_date: Field<Value>,
}

impl InspectionPatch {
    /// Apply every present key to `inspection`.
    ///
    /// Never fails: malformed values are either skipped or coerced,
    /// depending on the field.
    pub fn apply(&self, inspection: &mut Inspection) {
        if let Some(value) = self.status.as_present() {
            if let Some(status) = parse_status(value) {
                inspection.status = status;
            }
        }

        if let Some(value) = self.notes.as_present() {
            inspection.notes = if value.is_null() {
                None
            } else {
                Some(string_form(value))
            };
        }

        // Always assigns; anything but a "true" literal is false
        if let Some(value) = self.starred.as_present() {
            inspection.starred = string_form(value).eq_ignore_ascii_case("true");
        }

        if let Some(value) = self.inspected_at.as_present() {
            if let Some(ts) = parse_instant(value) {
                inspection.inspected_at = ts;
            }
        }

        if let Some(value) = self.maintenance_date.as_present() {
            if value.is_null() || is_blank(&string_form(value)) {
                inspection.maintenance_at = None;
            } else if let Some(ts) = parse_instant(value) {
                inspection.maintenance_at = Some(ts);
            }
        }
    }

    /// Names of the keys present in the body, for logging
    pub fn present_keys(&self) -> Vec<&'static str> {
        [
            ("status", self.status.is_present()),
            ("notes", self.notes.is_present()),
            ("starred", self.starred.is_present()),
            ("inspectedAt", self.inspected_at.is_present()),
            ("maintenanceDate", self.maintenance_date.is_present()),
        ]
        .into_iter()
        .filter_map(|(key, present)| present.then_some(key))
        .collect()
    }
}

/// Textual form of a JSON value: strings verbatim, everything else as JSON text
pub fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a strict ISO-8601 instant. Null, blank or malformed input yields `None`.
pub fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    if value.is_null() {
        return None;
    }
    parse_iso_instant(&string_form(value))
}

/// `YYYY-MM-DDTHH:MM:SS[.f]` followed by `Z` or a `±hh:mm` offset.
///
/// chrono's RFC 3339 parser also takes a space separator and lowercase
/// `t`/`z`; both are rejected here.
pub fn parse_iso_instant(text: &str) -> Option<DateTime<Utc>> {
    let text = trim_control(text);
    if text.as_bytes().get(10) != Some(&b'T') || text.bytes().any(|b| b.is_ascii_lowercase()) {
        return None;
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a status name, ignoring case and surrounding whitespace
pub fn parse_status(value: &Value) -> Option<InspectionStatus> {
    if value.is_null() {
        return None;
    }
    InspectionStatus::from_db_str(&trim_control(&string_form(value)).to_uppercase())
}

/// Strip leading and trailing spaces and ASCII control characters
fn trim_control(text: &str) -> &str {
    text.trim_matches(|c: char| c <= ' ')
}

/// Whitespace-only check. No-break spaces count as content.
fn is_blank(text: &str) -> bool {
    text.chars().all(|c| {
        matches!(c, '\t'..='\r' | '\u{1c}'..='\u{1f}')
            || (c.is_whitespace() && !matches!(c, '\u{85}' | '\u{a0}' | '\u{2007}' | '\u{202f}'))
    })
}

/// serde adapter for optional instants in request bodies, using the same
/// strict format as [`parse_iso_instant`]
pub(crate) fn deserialize_opt_instant<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) => parse_iso_instant(&text)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 instant: {text}"))),
    }
}
