//! # Selections
//!
//! A [`Selection`] is the table produced by discovery: one row per file, keyed by
//! path, with one column per attribute name seen in any row.
//!
//! Selections are values. Every filter returns a new selection and leaves the
//! original untouched, so a broad search can be narrowed several ways:
//!
//! ```ignore
//! let pr = selection.subset([("variable", "pr")]);
//! let nineties = pr.to_datetime()?.select_time_range(start, end)?;
//! ```

use crate::dates::DateFormats;
use crate::error::Result;
use crate::model::{AttrValue, FileRecord};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthStr;

pub const PATH_COLUMN: &str = "path";
const DEFAULT_START_FIELD: &str = "startdate";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    records: IndexMap<PathBuf, FileRecord>,
    date_fields: Vec<String>,
    unique_fields: Vec<String>,
}

/// Plain two-dimensional view of a selection, ready for a CSV writer.
///
/// The first column is always [`PATH_COLUMN`]; cells for attributes a row does
/// not have are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Selection {
    /// Rows keep the order given; a later record for the same path replaces an earlier one.
    pub fn new<I: IntoIterator<Item = FileRecord>>(records: I) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.path.clone(), record))
                .collect(),
            date_fields: Vec::new(),
            unique_fields: Vec::new(),
        }
    }

    /// Columns decoded by [`to_datetime`](Self::to_datetime). The first one is the
    /// start date used by [`select_time_range`](Self::select_time_range).
    pub fn with_date_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Columns checked by [`is_coherent`](Self::is_coherent).
    pub fn with_unique_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&FileRecord> {
        self.records.get(path)
    }

    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.records.keys().map(PathBuf::as_path)
    }

    pub fn date_fields(&self) -> &[String] {
        &self.date_fields
    }

    /// Union of attribute names over all rows, in first-seen order.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for record in self.records.values() {
            for name in record.attributes.keys() {
                if !columns.contains(&name.as_str()) {
                    columns.push(name);
                }
            }
        }
        columns
    }

    /// Rows where every `(column, value)` pair matches exactly.
    ///
    /// Rows without one of the columns never match. Decoded dates compare by the
    /// text they were decoded from.
    pub fn subset<I, K, V>(&self, filters: I) -> Selection
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let filters: Vec<(K, V)> = filters.into_iter().collect();
        self.retain(|record| {
            filters
                .iter()
                .all(|(k, v)| record.text(k.as_ref()) == Some(v.as_ref()))
        })
    }

    /// Decodes the given columns into dates, picking the format by string length.
    ///
    /// Rows lacking a column are left alone. A value whose length has no format, or
    /// that does not parse, fails the whole call.
    pub fn to_dates<I, S>(&self, fields: I, formats: &DateFormats) -> Result<Selection>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<S> = fields.into_iter().collect();
        let mut records = IndexMap::with_capacity(self.records.len());
        for (path, record) in &self.records {
            let mut record = record.clone();
            for field in &fields {
                let decoded = match record.get(field.as_ref()) {
                    Some(AttrValue::Text(raw)) => formats.decode(raw)?,
                    _ => continue,
                };
                record
                    .attributes
                    .insert(field.as_ref().to_string(), AttrValue::Date(decoded));
            }
            records.insert(path.clone(), record);
        }
        Ok(self.with_records(records))
    }

    /// [`to_dates`](Self::to_dates) over the convention's date fields with the
    /// default length table.
    pub fn to_datetime(&self) -> Result<Selection> {
        self.to_dates(&self.date_fields, &DateFormats::default())
    }

    /// Rows whose start date lies in `[start, end)`.
    ///
    /// Start dates still in text form are decoded with the default table on the fly.
    /// Rows with no start date are dropped.
    pub fn select_time_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Selection> {
        let field = self
            .date_fields
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_START_FIELD);
        let formats = DateFormats::default();

        let mut records = IndexMap::new();
        for (path, record) in &self.records {
            let begins = match record.get(field) {
                Some(AttrValue::Date(date)) => date.value,
                Some(AttrValue::Text(raw)) => formats.decode(raw)?.value,
                None => continue,
            };
            if start <= begins && begins < end {
                records.insert(path.clone(), record.clone());
            }
        }
        Ok(self.with_records(records))
    }

    /// Distinct textual values of `column`, in first-seen order.
    pub fn distinct(&self, column: &str) -> Vec<&str> {
        let mut values: Vec<&str> = Vec::new();
        for value in self.records.values().filter_map(|r| r.text(column)) {
            if !values.contains(&value) {
                values.push(value);
            }
        }
        values
    }

    /// True when every row has each column and each column holds a single value
    /// across the whole selection. An empty selection is never unique.
    pub fn unique_check<I, S>(&self, columns: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.is_empty() {
            return false;
        }
        columns.into_iter().all(|column| {
            let column = column.as_ref();
            self.records.values().all(|r| r.get(column).is_some())
                && self.distinct(column).len() == 1
        })
    }

    /// [`unique_check`](Self::unique_check) over the convention's unique fields.
    pub fn is_coherent(&self) -> bool {
        self.unique_check(&self.unique_fields)
    }

    pub fn to_table(&self) -> Table {
        let attributes = self.columns();
        let mut columns = vec![PATH_COLUMN.to_string()];
        columns.extend(attributes.iter().map(|c| c.to_string()));

        let rows = self
            .records
            .values()
            .map(|record| {
                let mut row = vec![record.path.display().to_string()];
                row.extend(
                    attributes
                        .iter()
                        .map(|c| record.get(c).map(|v| v.to_string()).unwrap_or_default()),
                );
                row
            })
            .collect();

        Table { columns, rows }
    }

    fn retain<F: Fn(&FileRecord) -> bool>(&self, keep: F) -> Selection {
        self.with_records(
            self.records
                .iter()
                .filter(|(_, record)| keep(record))
                .map(|(path, record)| (path.clone(), record.clone()))
                .collect(),
        )
    }

    fn with_records(&self, records: IndexMap<PathBuf, FileRecord>) -> Selection {
        Selection {
            records,
            date_fields: self.date_fields.clone(),
            unique_fields: self.unique_fields.clone(),
        }
    }
}

impl Serialize for Selection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.records.values())
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "Empty selection");
        }

        let table = self.to_table();
        let mut widths: Vec<usize> = table.columns.iter().map(|c| c.width()).collect();
        for row in &table.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.width());
            }
        }

        let write_row = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{}{}", cell, " ".repeat(width - cell.width())))
                .collect();
            writeln!(f, "{}", line.join("  ").trim_end())
        };

        write_row(f, &table.columns)?;
        for row in &table.rows {
            write_row(f, row)?;
        }
        writeln!(f, "[{} files x {} columns]", self.len(), table.columns.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::model::{attribute_map, DatePrecision};
    use chrono::NaiveDate;

    fn record(variable: &str, startdate: &str) -> FileRecord {
        FileRecord::new(
            PathBuf::from(format!("/data/{variable}_{startdate}.nc")),
            attribute_map([
                ("institute_id", "GERICS"),
                ("variable", variable),
                ("startdate", startdate),
            ]),
        )
    }

    fn five_rows() -> Selection {
        Selection::new([
            record("pr", "19900101"),
            record("tas", "19900101"),
            record("pr", "20000101"),
            record("tasmax", "19950101"),
            record("tasmin", "19850101"),
        ])
        .with_date_fields(["startdate", "enddate"])
        .with_unique_fields(["institute_id"])
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_subset_keeps_matching_rows_untouched() {
        let selection = five_rows();
        let pr = selection.subset([("variable", "pr")]);
        assert_eq!(pr.len(), 2);
        for record in pr.records() {
            assert_eq!(selection.get(&record.path), Some(record));
        }
        assert_eq!(selection.len(), 5);
    }

    #[test]
    fn test_subset_requires_all_filters() {
        let selection = five_rows();
        assert_eq!(
            selection
                .subset([("variable", "pr"), ("startdate", "20000101")])
                .len(),
            1
        );
        assert!(selection.subset([("realm", "atmos")]).is_empty());
        assert_eq!(selection.subset(Vec::<(&str, &str)>::new()).len(), 5);
    }

    #[test]
    fn test_subset_matches_decoded_dates_by_text() {
        let decoded = five_rows().to_datetime().unwrap();
        assert_eq!(decoded.subset([("startdate", "19900101")]).len(), 2);
    }

    #[test]
    fn test_to_dates_decodes_by_length() {
        let selection = Selection::new([
            record("pr", "201501"),
            record("tas", "201501010600"),
        ]);
        let decoded = selection
            .to_dates(["startdate"], &DateFormats::default())
            .unwrap();
        let precisions: Vec<DatePrecision> = decoded
            .records()
            .map(|r| r.get("startdate").unwrap().as_date().unwrap().precision)
            .collect();
        assert_eq!(precisions, [DatePrecision::Month, DatePrecision::Minute]);
        // original selection is unchanged
        assert!(selection
            .records()
            .all(|r| matches!(r.get("startdate"), Some(AttrValue::Text(_)))));
    }

    #[test]
    fn test_to_dates_fails_on_unknown_width() {
        let selection = Selection::new([record("pr", "2015010")]);
        let err = selection
            .to_dates(["startdate"], &DateFormats::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::DateFormat { .. }));
    }

    #[test]
    fn test_time_range_is_half_open() {
        let selection = five_rows().to_datetime().unwrap();
        let picked = selection
            .select_time_range(day(1990, 1, 1), day(2000, 1, 1))
            .unwrap();
        let mut starts = picked.distinct("startdate");
        starts.sort();
        assert_eq!(starts, ["19900101", "19950101"]);
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn test_time_range_decodes_text_on_the_fly() {
        let picked = five_rows()
            .select_time_range(day(1980, 1, 1), day(1990, 1, 1))
            .unwrap();
        assert_eq!(picked.distinct("variable"), ["tasmin"]);
    }

    #[test]
    fn test_unique_check() {
        let selection = five_rows();
        assert!(selection.unique_check(["institute_id"]));
        assert!(selection.is_coherent());
        assert!(!selection.unique_check(["institute_id", "variable"]));
        assert!(!selection.unique_check(["missing"]));
        assert!(!Selection::default().unique_check(["institute_id"]));
    }

    #[test]
    fn test_columns_are_a_union() {
        let mut extra = record("pr", "19700101");
        extra.path = PathBuf::from("/data/extra.nc");
        extra.attributes.insert("realm".into(), "atmos".into());
        let selection = Selection::new([record("pr", "19900101"), extra]);
        assert_eq!(
            selection.columns(),
            ["institute_id", "variable", "startdate", "realm"]
        );

        let table = selection.to_table();
        assert_eq!(table.columns[0], PATH_COLUMN);
        assert_eq!(table.rows[0].len(), 5);
        assert_eq!(table.rows[0][4], "");
        assert_eq!(table.rows[1][4], "atmos");
    }

    #[test]
    fn test_renders_aligned_table() {
        let text = Selection::new([record("pr", "19900101")]).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("path"));
        assert!(lines[1].starts_with("/data/pr_19900101.nc"));
        assert_eq!(lines[2], "[1 files x 3 columns]");
    }

    #[test]
    fn test_serializes_as_row_list() {
        let value = serde_json::to_value(Selection::new([record("pr", "19900101")])).unwrap();
        assert_eq!(value[0]["path"], "/data/pr_19900101.nc");
        assert_eq!(value[0]["attributes"]["variable"], "pr");
    }
}
