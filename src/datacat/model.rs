use chrono::{Datelike, NaiveDateTime, Timelike};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Attribute name to raw string value, in declaration order.
///
/// Conventions produce and consume these: parse results carry exactly the names the
/// convention declares, while filters passed to `format` may carry any subset (or superset).
pub type AttributeMap = IndexMap<String, String>;

/// Builds an [`AttributeMap`] from borrowed or owned pairs.
///
/// ```
/// let attrs = datacat::model::attribute_map([("model", "REMO2015"), ("domain", "EUR-11")]);
/// assert_eq!(attrs["domain"], "EUR-11");
/// ```
pub fn attribute_map<I, K, V>(pairs: I) -> AttributeMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// How much of a calendar date a decoded string actually specified.
///
/// Ordered from coarsest to finest, so `precision >= DatePrecision::Day` reads naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DatePrecision {
    Year,
    Month,
    Day,
    Hour,
    Minute,
}

/// A decoded date column value.
///
/// `value` is always a complete timestamp (unspecified parts are filled with their
/// minimum), but the accessors below only report the parts covered by `precision`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateValue {
    pub raw: String,
    pub precision: DatePrecision,
    pub value: NaiveDateTime,
}

impl DateValue {
    pub fn year(&self) -> i32 {
        self.value.year()
    }

    pub fn month(&self) -> Option<u32> {
        self.covers(DatePrecision::Month).then(|| self.value.month())
    }

    pub fn day(&self) -> Option<u32> {
        self.covers(DatePrecision::Day).then(|| self.value.day())
    }

    pub fn hour(&self) -> Option<u32> {
        self.covers(DatePrecision::Hour).then(|| self.value.hour())
    }

    pub fn minute(&self) -> Option<u32> {
        self.covers(DatePrecision::Minute).then(|| self.value.minute())
    }

    fn covers(&self, level: DatePrecision) -> bool {
        self.precision >= level
    }
}

/// Runtime value of one selection cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Value exactly as it appeared in the path or filename
    Text(String),
    /// Value decoded by `Selection::to_dates`
    Date(DateValue),
}

impl AttrValue {
    /// The textual form. Decoded dates keep the string they were decoded from,
    /// so equality filters behave the same before and after decoding.
    pub fn as_text(&self) -> &str {
        match self {
            AttrValue::Text(s) => s,
            AttrValue::Date(d) => &d.raw,
        }
    }

    pub fn as_date(&self) -> Option<&DateValue> {
        match self {
            AttrValue::Date(d) => Some(d),
            AttrValue::Text(_) => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Date(d) => write!(f, "{}", d.value),
        }
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

/// One discovered file: its path plus every attribute parsed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub attributes: IndexMap<String, AttrValue>,
}

impl FileRecord {
    pub fn new(path: PathBuf, attributes: AttributeMap) -> Self {
        Self {
            path,
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k, AttrValue::Text(v)))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Textual value of an attribute, if present.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(AttrValue::as_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(precision: DatePrecision) -> DateValue {
        DateValue {
            raw: "x".into(),
            precision,
            value: NaiveDate::from_ymd_opt(2015, 3, 7)
                .unwrap()
                .and_hms_opt(6, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_month_precision_hides_finer_parts() {
        let d = date(DatePrecision::Month);
        assert_eq!(d.year(), 2015);
        assert_eq!(d.month(), Some(3));
        assert_eq!(d.day(), None);
        assert_eq!(d.hour(), None);
    }

    #[test]
    fn test_minute_precision_reports_everything() {
        let d = date(DatePrecision::Minute);
        assert_eq!(d.day(), Some(7));
        assert_eq!(d.hour(), Some(6));
        assert_eq!(d.minute(), Some(30));
    }

    #[test]
    fn test_record_text_falls_back_to_raw_date() {
        let mut record = FileRecord::new(
            PathBuf::from("/a/b.nc"),
            attribute_map([("startdate", "20150307")]),
        );
        let mut d = date(DatePrecision::Day);
        d.raw = "20150307".into();
        record
            .attributes
            .insert("startdate".into(), AttrValue::Date(d));
        assert_eq!(record.text("startdate"), Some("20150307"));
        assert!(record.get("startdate").unwrap().as_date().is_some());
    }
}
