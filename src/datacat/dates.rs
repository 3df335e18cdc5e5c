//! Fixed-width date strings, as found in filename time ranges.
//!
//! Archive filenames encode the time range at the resolution of the data frequency:
//! `200601-201012` for monthly data, `19500102-19501231` for daily data,
//! `200101010600-200101311800` for 6-hourly data. The resolution is recognised
//! purely by the length of the string, so a field whose width changes for another
//! reason is decoded at the wrong resolution. Keep that in mind before adding
//! entries to [`DateFormats`].

use crate::error::{CatalogError, Result};
use crate::model::{DatePrecision, DateValue};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    /// chrono strftime format covering exactly `precision`
    pub format: String,
    pub precision: DatePrecision,
}

impl DateFormat {
    pub fn new(format: impl Into<String>, precision: DatePrecision) -> Self {
        Self {
            format: format.into(),
            precision,
        }
    }
}

/// String length to date format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormats {
    by_length: BTreeMap<usize, DateFormat>,
}

impl Default for DateFormats {
    fn default() -> Self {
        Self::empty()
            .with(4, DateFormat::new("%Y", DatePrecision::Year))
            .with(6, DateFormat::new("%Y%m", DatePrecision::Month))
            .with(8, DateFormat::new("%Y%m%d", DatePrecision::Day))
            .with(10, DateFormat::new("%Y%m%d%H", DatePrecision::Hour))
            .with(12, DateFormat::new("%Y%m%d%H%M", DatePrecision::Minute))
    }
}

impl DateFormats {
    pub fn empty() -> Self {
        Self {
            by_length: BTreeMap::new(),
        }
    }

    pub fn with(mut self, length: usize, format: DateFormat) -> Self {
        self.by_length.insert(length, format);
        self
    }

    pub fn get(&self, length: usize) -> Option<&DateFormat> {
        self.by_length.get(&length)
    }

    /// Decodes `raw` with the format registered for its length.
    pub fn decode(&self, raw: &str) -> Result<DateValue> {
        let format = self
            .by_length
            .get(&raw.chars().count())
            .ok_or_else(|| CatalogError::DateFormat {
                value: raw.to_string(),
                reason: format!(
                    "no date format for strings of length {} (known lengths: {:?})",
                    raw.chars().count(),
                    self.by_length.keys().collect::<Vec<_>>()
                ),
            })?;

        // chrono only builds a NaiveDateTime from a complete date and time, so
        // pad the input with the minimum of every unspecified part.
        let (pad, pad_format) = match format.precision {
            DatePrecision::Year => ("0101 0000", "%m%d %H%M"),
            DatePrecision::Month => ("01 0000", "%d %H%M"),
            DatePrecision::Day => (" 0000", " %H%M"),
            DatePrecision::Hour => ("00", "%M"),
            DatePrecision::Minute => ("", ""),
        };
        let value = NaiveDateTime::parse_from_str(
            &format!("{raw}{pad}"),
            &format!("{}{pad_format}", format.format),
        )
        .map_err(|e| CatalogError::DateFormat {
            value: raw.to_string(),
            reason: format!("expected {}: {}", format.format, e),
        })?;

        Ok(DateValue {
            raw: raw.to_string(),
            precision: format.precision,
            value,
        })
    }
}

/// Decodes with the default length table.
pub fn decode(raw: &str) -> Result<DateValue> {
    DateFormats::default().decode(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_six_characters_is_a_month() {
        let d = decode("201501").unwrap();
        assert_eq!(d.precision, DatePrecision::Month);
        assert_eq!(d.year(), 2015);
        assert_eq!(d.month(), Some(1));
        assert_eq!(d.day(), None);
        assert_eq!(d.hour(), None);
        assert_eq!(d.value, at(2015, 1, 1, 0, 0));
    }

    #[test]
    fn test_eight_characters_is_a_day() {
        let d = decode("20150101").unwrap();
        assert_eq!(d.precision, DatePrecision::Day);
        assert_eq!(d.day(), Some(1));
        assert_eq!(d.hour(), None);
    }

    #[test]
    fn test_twelve_characters_is_a_minute() {
        let d = decode("201501010600").unwrap();
        assert_eq!(d.precision, DatePrecision::Minute);
        assert_eq!(d.hour(), Some(6));
        assert_eq!(d.minute(), Some(0));
        assert_eq!(d.value, at(2015, 1, 1, 6, 0));
    }

    #[test]
    fn test_year_and_hour_lengths() {
        assert_eq!(decode("1950").unwrap().value, at(1950, 1, 1, 0, 0));
        let d = decode("1950010218").unwrap();
        assert_eq!(d.precision, DatePrecision::Hour);
        assert_eq!(d.value, at(1950, 1, 2, 18, 0));
    }

    #[test]
    fn test_unknown_length_fails() {
        let err = decode("2015010").unwrap_err();
        assert!(matches!(err, CatalogError::DateFormat { .. }));
    }

    #[test]
    fn test_invalid_digits_fail() {
        assert!(decode("20151301").is_err());
        assert!(decode("2015ab").is_err());
    }

    #[test]
    fn test_custom_table() {
        let formats =
            DateFormats::empty().with(10, DateFormat::new("%Y-%m-%d", DatePrecision::Day));
        let d = formats.decode("2015-03-07").unwrap();
        assert_eq!(d.value, at(2015, 3, 7, 0, 0));
        assert!(formats.decode("20150307").is_err());
    }
}
