//! # Column Design Schedule
//!
//! Extracts per-column design records from the rows of a concrete column
//! design report (CSV export of the analysis program) and arranges them into
//! a schedule table keyed by (story, grid location).
//!
//! ## Row Markers
//!
//! A row is tagged by any field that, trimmed, equals one of:
//!
//! | Marker                  | Value(s) taken                                    |
//! |-------------------------|---------------------------------------------------|
//! | `Level.`                | field 1; starts a new record                      |
//! | `Grid Location:.`       | last field                                        |
//! | `Size:.`                | field 1, text before the first double space       |
//! | `Longitudinal:.`        | field 1, first space-delimited token              |
//! | `f'c (ksi):.`           | field 1                                           |
//! | `Unbraced Length (ft).` | fields 1 and 2 (x, y)                             |
//! | `K.`                    | fields 1 and 2 (x, y)                             |
//! | `Axial`                 | last field (Pu)                                   |
//! | `Moment` + `Top`        | last field is Mu_x; the next row's last field is Mu_y |
//! | `Moment` + `Bottom`     | same pairing for the bottom end                   |
//!
//! The y moment row is consumed before its own markers are read, so a
//! `Moment Bottom` row can directly follow a `Moment Top` row. A `Level.` row
//! or any other value row in the y position is rejected.
//!
//! ## Example
//!
//! ```rust
//! use column_core::schedule::{extract_schedule, parse_rows_from_csv};
//!
//! let csv = "Level.,1st Floor\nGrid Location:.,A-1\nSize:.,14x24   \n\
//!            Longitudinal:.,12-#8\nf'c (ksi):.,   10\n\
//!            Unbraced Length (ft).,10,10\nK.,1.0,1.0\n\
//!            Axial,,,900\nMoment,Top,-100\nMoment,Bottom,-200\n,,-300\n";
//!
//! let rows = parse_rows_from_csv(csv).unwrap();
//! let records = extract_schedule(&rows).unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].mu_y_top, "-200");
//! assert_eq!(records[0].mu_y_bot, "-300");
//! ```

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::calculations::section::BendingAxis;
use crate::errors::{CalcError, CalcResult};
use crate::materials::RebarCallout;
use crate::settings::write_atomic;
use crate::units::{Feet, KipFt, Kips};

/// Schedule columns in export order (lexical)
pub const SCHEDULE_COLUMNS: [&str; 8] = [
    "fpc", "mu_x_bot", "mu_x_top", "mu_y_bot", "mu_y_top", "pu", "rebar", "size",
];

/// Design data for one column at one level, as read from the report.
///
/// Values are kept as the trimmed report text; the typed accessors parse
/// them on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDesignRecord {
    pub level: String,
    pub grid_location: String,
    /// Section size "bxh" (in)
    pub size: String,
    /// Longitudinal callout "n-#s"
    pub rebar: String,
    /// f'c (ksi)
    pub fpc: String,
    /// Unbraced length about x (ft)
    pub lux: String,
    /// Unbraced length about y (ft)
    pub luy: String,
    pub kx: String,
    pub ky: String,
    /// Factored axial load (kips)
    pub pu: String,
    /// Factored moments (kip-ft)
    pub mu_x_top: String,
    pub mu_y_top: String,
    pub mu_x_bot: String,
    pub mu_y_bot: String,
}

/// Factored demand on one column, governing end per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignDemand {
    pub pu: Kips,
    pub mu_x: KipFt,
    pub mu_y: KipFt,
}

impl DesignDemand {
    /// Governing moment about `axis`
    pub fn moment(&self, axis: BendingAxis) -> KipFt {
        match axis {
            BendingAxis::X => self.mu_x,
            BendingAxis::Y => self.mu_y,
        }
    }
}

fn parse_number(field: &str, value: &str) -> CalcResult<f64> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| CalcError::invalid_input(field, value, "Expected a number"))?;
    if !parsed.is_finite() {
        return Err(CalcError::invalid_input(field, value, "Expected a finite number"));
    }
    Ok(parsed)
}

impl ColumnDesignRecord {
    /// Section dimensions (b, h) in inches from "bxh"
    pub fn dimensions(&self) -> CalcResult<(f64, f64)> {
        let (b, h) = self
            .size
            .split_once(['x', 'X'])
            .ok_or_else(|| {
                CalcError::invalid_input("size", &self.size, "Expected a size of the form 'bxh'")
            })?;
        let b = parse_number("size", b)?;
        let h = parse_number("size", h)?;
        if b <= 0.0 || h <= 0.0 {
            return Err(CalcError::invalid_input("size", &self.size, "Dimensions must be positive"));
        }
        Ok((b, h))
    }

    pub fn rebar_callout(&self) -> CalcResult<RebarCallout> {
        self.rebar.parse()
    }

    /// f'c (ksi)
    pub fn fpc_ksi(&self) -> CalcResult<f64> {
        parse_number("fpc", &self.fpc)
    }

    pub fn axial_load(&self) -> CalcResult<Kips> {
        parse_number("pu", &self.pu).map(Kips)
    }

    /// Unbraced lengths (x, y)
    pub fn unbraced_lengths(&self) -> CalcResult<(Feet, Feet)> {
        Ok((Feet(parse_number("lux", &self.lux)?), Feet(parse_number("luy", &self.luy)?)))
    }

    /// Effective length factors (x, y)
    pub fn k_factors(&self) -> CalcResult<(f64, f64)> {
        Ok((parse_number("kx", &self.kx)?, parse_number("ky", &self.ky)?))
    }

    /// Larger end moment magnitude about `axis`
    pub fn governing_moment(&self, axis: BendingAxis) -> CalcResult<KipFt> {
        let (top, bot) = match axis {
            BendingAxis::X => (("mu_x_top", &self.mu_x_top), ("mu_x_bot", &self.mu_x_bot)),
            BendingAxis::Y => (("mu_y_top", &self.mu_y_top), ("mu_y_bot", &self.mu_y_bot)),
        };
        let top = parse_number(top.0, top.1)?;
        let bot = parse_number(bot.0, bot.1)?;
        Ok(KipFt(top.abs().max(bot.abs())))
    }

    pub fn demand(&self) -> CalcResult<DesignDemand> {
        Ok(DesignDemand {
            pu: self.axial_load()?,
            mu_x: self.governing_moment(BendingAxis::X)?,
            mu_y: self.governing_moment(BendingAxis::Y)?,
        })
    }

    /// Schedule cell by column name (see [`SCHEDULE_COLUMNS`])
    pub fn column_value(&self, column: &str) -> Option<&str> {
        let value = match column {
            "size" => &self.size,
            "rebar" => &self.rebar,
            "fpc" => &self.fpc,
            "pu" => &self.pu,
            "mu_x_top" => &self.mu_x_top,
            "mu_x_bot" => &self.mu_x_bot,
            "mu_y_top" => &self.mu_y_top,
            "mu_y_bot" => &self.mu_y_bot,
            _ => return None,
        };
        Some(value.as_str())
    }
}

// ============================================================================
// Row extraction
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberEnd {
    Top,
    Bottom,
}

/// Paired moment rows: the x value is on the tagged row, y on the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MomentState {
    AwaitingX,
    AwaitingY { end: MemberEnd, row: usize },
}

#[derive(Debug, Default)]
struct RecordBuilder {
    start_row: usize,
    level: String,
    fields: HashMap<&'static str, String>,
}

impl RecordBuilder {
    fn set(&mut self, name: &'static str, value: &str, row: usize) -> CalcResult<()> {
        if self.fields.contains_key(name) {
            return Err(CalcError::malformed_row(
                row,
                format!("'{}' given twice for level '{}'", name, self.level),
            ));
        }
        self.fields.insert(name, value.trim().to_string());
        Ok(())
    }

    fn take(&mut self, name: &str) -> CalcResult<String> {
        self.fields.remove(name).ok_or_else(|| {
            CalcError::missing_field(format!(
                "{} (record starting at row {}, level '{}')",
                name, self.start_row, self.level
            ))
        })
    }

    fn finish(mut self) -> CalcResult<ColumnDesignRecord> {
        Ok(ColumnDesignRecord {
            grid_location: self.take("grid_location")?,
            size: self.take("size")?,
            rebar: self.take("rebar")?,
            fpc: self.take("fpc")?,
            lux: self.take("lux")?,
            luy: self.take("luy")?,
            kx: self.take("kx")?,
            ky: self.take("ky")?,
            pu: self.take("pu")?,
            mu_x_top: self.take("mu_x_top")?,
            mu_y_top: self.take("mu_y_top")?,
            mu_x_bot: self.take("mu_x_bot")?,
            mu_y_bot: self.take("mu_y_bot")?,
            level: self.level,
        })
    }
}

/// Markers of rows that carry a value for the current record
const VALUE_MARKERS: [&str; 8] = [
    "Grid Location:.",
    "Size:.",
    "Longitudinal:.",
    "f'c (ksi):.",
    "Unbraced Length (ft).",
    "K.",
    "Axial",
    "Moment",
];

fn has_marker(row: &[String], marker: &str) -> bool {
    row.iter().any(|f| f.trim() == marker)
}

fn field(row: &[String], index: usize, row_no: usize, marker: &str) -> CalcResult<String> {
    row.get(index).map(|f| f.trim().to_string()).ok_or_else(|| {
        CalcError::malformed_row(row_no, format!("'{}' row has no field {}", marker, index))
    })
}

fn last_field(row: &[String], row_no: usize, marker: &str) -> CalcResult<String> {
    row.last()
        .map(|f| f.trim().to_string())
        .ok_or_else(|| CalcError::malformed_row(row_no, format!("'{}' row is empty", marker)))
}

/// Extract design records from report rows.
///
/// Row numbers in errors are 1-based.
///
/// # Errors
///
/// - [`CalcError::MalformedScheduleRow`] when a tagged row lacks the field
///   it needs, a moment row has no paired y row (end of input, or a
///   `Level.` or value row in its place), a value is given twice in
///   one record, or a value appears before the first `Level.` row
/// - [`CalcError::MissingField`] when a record ends without one of its values
pub fn extract_schedule(rows: &[Vec<String>]) -> CalcResult<Vec<ColumnDesignRecord>> {
    let mut records = Vec::new();
    let mut current: Option<RecordBuilder> = None;
    let mut state = MomentState::AwaitingX;

    for (idx, row) in rows.iter().enumerate() {
        let row_no = idx + 1;

        if let MomentState::AwaitingY { end, row: moment_row } = state {
            let interrupting = std::iter::once("Level.")
                .chain(VALUE_MARKERS.iter().copied().filter(|m| *m != "Moment"))
                .find(|m| has_marker(row, m));
            if let Some(marker) = interrupting {
                return Err(CalcError::malformed_row(
                    row_no,
                    format!(
                        "'{}' row where the y moment paired with row {} was expected",
                        marker, moment_row
                    ),
                ));
            }
            let value = last_field(row, row_no, "Moment")?;
            let name = match end {
                MemberEnd::Top => "mu_y_top",
                MemberEnd::Bottom => "mu_y_bot",
            };
            if let Some(builder) = current.as_mut() {
                builder.set(name, &value, row_no)?;
            }
            state = MomentState::AwaitingX;
        }

        if has_marker(row, "Level.") {
            let level = field(row, 1, row_no, "Level.")?;
            if let Some(done) = current.take() {
                records.push(done.finish()?);
            }
            debug!("Row {}: level '{}'", row_no, level);
            current = Some(RecordBuilder {
                start_row: row_no,
                level,
                fields: HashMap::new(),
            });
        }

        let tagged = VALUE_MARKERS.iter().copied().find(|m| has_marker(row, m));

        let Some(marker) = tagged else { continue };
        let builder = current.as_mut().ok_or_else(|| {
            CalcError::malformed_row(
                row_no,
                format!("'{}' appears before any 'Level.' row", marker),
            )
        })?;

        if has_marker(row, "Grid Location:.") {
            builder.set("grid_location", &last_field(row, row_no, "Grid Location:.")?, row_no)?;
        }
        if has_marker(row, "Size:.") {
            let raw = field(row, 1, row_no, "Size:.")?;
            let size = raw.split("  ").next().unwrap_or_default();
            builder.set("size", size, row_no)?;
        }
        if has_marker(row, "Longitudinal:.") {
            let raw = field(row, 1, row_no, "Longitudinal:.")?;
            let callout = raw.split(' ').next().unwrap_or_default();
            builder.set("rebar", callout, row_no)?;
        }
        if has_marker(row, "f'c (ksi):.") {
            builder.set("fpc", &field(row, 1, row_no, "f'c (ksi):.")?, row_no)?;
        }
        if has_marker(row, "Unbraced Length (ft).") {
            builder.set("lux", &field(row, 1, row_no, "Unbraced Length (ft).")?, row_no)?;
            builder.set("luy", &field(row, 2, row_no, "Unbraced Length (ft).")?, row_no)?;
        }
        if has_marker(row, "K.") {
            builder.set("kx", &field(row, 1, row_no, "K.")?, row_no)?;
            builder.set("ky", &field(row, 2, row_no, "K.")?, row_no)?;
        }
        if has_marker(row, "Axial") {
            builder.set("pu", &last_field(row, row_no, "Axial")?, row_no)?;
        }
        if has_marker(row, "Moment") {
            let end = if has_marker(row, "Top") {
                Some(MemberEnd::Top)
            } else if has_marker(row, "Bottom") {
                Some(MemberEnd::Bottom)
            } else {
                None
            };
            if let Some(end) = end {
                let name = match end {
                    MemberEnd::Top => "mu_x_top",
                    MemberEnd::Bottom => "mu_x_bot",
                };
                builder.set(name, &last_field(row, row_no, "Moment")?, row_no)?;
                state = MomentState::AwaitingY { end, row: row_no };
            }
        }
    }

    if let MomentState::AwaitingY { row, .. } = state {
        return Err(CalcError::malformed_row(row, "Moment row has no following y moment row"));
    }
    if let Some(done) = current.take() {
        records.push(done.finish()?);
    }

    info!("Extracted {} column design records from {} rows", records.len(), rows.len());
    Ok(records)
}

/// Split CSV text into rows of string fields.
///
/// Rows may have different lengths; fields are kept untrimmed.
pub fn parse_rows_from_csv(text: &str) -> CalcResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .enumerate()
        .map(|(idx, record)| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| CalcError::malformed_row(idx + 1, e.to_string()))
        })
        .collect()
}

/// Read a report CSV file and extract its records
pub fn read_schedule_file(path: &Path) -> CalcResult<Vec<ColumnDesignRecord>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    extract_schedule(&parse_rows_from_csv(&text)?)
}

// ============================================================================
// Schedule table
// ============================================================================

/// Design records indexed by (story, grid location).
///
/// Stories keep the order in which they first appear in the report; within
/// a story, designs keep report order.
#[derive(Debug, Clone, Default)]
pub struct ScheduleTable {
    stories: Vec<String>,
    records: Vec<ColumnDesignRecord>,
    index: HashMap<(String, String), usize>,
}

/// One exported schedule row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub story: String,
    pub design: String,
    pub cells: std::collections::BTreeMap<String, String>,
}

/// JSON export envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleExport {
    pub generated_at: DateTime<Utc>,
    pub stories: Vec<String>,
    pub entries: Vec<ScheduleEntry>,
}

impl ScheduleTable {
    /// Build the table; a repeated (story, grid location) pair is rejected.
    pub fn from_records(records: Vec<ColumnDesignRecord>) -> CalcResult<Self> {
        let mut stories: Vec<String> = Vec::new();
        for r in &records {
            if !stories.contains(&r.level) {
                stories.push(r.level.clone());
            }
        }

        let mut ordered = Vec::with_capacity(records.len());
        for story in &stories {
            ordered.extend(records.iter().filter(|r| &r.level == story).cloned());
        }

        let mut index = HashMap::new();
        for (i, r) in ordered.iter().enumerate() {
            let key = (r.level.clone(), r.grid_location.clone());
            if index.insert(key, i).is_some() {
                return Err(CalcError::invalid_input(
                    "grid_location",
                    &r.grid_location,
                    format!("Grid location appears twice on level '{}'", r.level),
                ));
            }
        }

        Ok(ScheduleTable {
            stories,
            records: ordered,
            index,
        })
    }

    pub fn stories(&self) -> &[String] {
        &self.stories
    }

    pub fn records(&self) -> &[ColumnDesignRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for a story and grid location
    pub fn get(&self, story: &str, design: &str) -> Option<&ColumnDesignRecord> {
        self.index
            .get(&(story.to_string(), design.to_string()))
            .map(|&i| &self.records[i])
    }

    /// Single schedule cell
    pub fn cell(&self, story: &str, design: &str, column: &str) -> Option<&str> {
        self.get(story, design).and_then(|r| r.column_value(column))
    }

    /// Header row: "story", "designs", then [`SCHEDULE_COLUMNS`]
    pub fn header() -> Vec<&'static str> {
        let mut header = vec!["story", "designs"];
        header.extend(SCHEDULE_COLUMNS);
        header
    }

    pub fn entries(&self) -> Vec<ScheduleEntry> {
        self.records
            .iter()
            .map(|r| ScheduleEntry {
                story: r.level.clone(),
                design: r.grid_location.clone(),
                cells: SCHEDULE_COLUMNS
                    .iter()
                    .filter_map(|c| r.column_value(c).map(|v| (c.to_string(), v.to_string())))
                    .collect(),
            })
            .collect()
    }

    /// Render the table as CSV text
    pub fn to_csv_string(&self) -> CalcResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let ser_err = |e: csv::Error| CalcError::SerializationError { reason: e.to_string() };

        writer.write_record(Self::header()).map_err(ser_err)?;
        for r in &self.records {
            let mut row = vec![r.level.as_str(), r.grid_location.as_str()];
            row.extend(SCHEDULE_COLUMNS.iter().filter_map(|c| r.column_value(c)));
            writer.write_record(&row).map_err(ser_err)?;
        }

        let bytes = writer.into_inner().map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })?;
        String::from_utf8(bytes).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })
    }

    /// Export as CSV (opens in any spreadsheet program)
    pub fn write_csv(&self, path: &Path) -> CalcResult<()> {
        let text = self.to_csv_string()?;
        write_atomic(path, text.as_bytes())?;
        info!("Wrote schedule with {} rows to {}", self.len(), path.display());
        Ok(())
    }

    /// Export as pretty JSON with a generation timestamp
    pub fn write_json(&self, path: &Path) -> CalcResult<()> {
        let export = ScheduleExport {
            generated_at: Utc::now(),
            stories: self.stories.clone(),
            entries: self.entries(),
        };
        let json = serde_json::to_string_pretty(&export).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })?;
        write_atomic(path, json.as_bytes())?;
        info!("Wrote schedule JSON to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|r| r.iter().map(|f| f.to_string()).collect())
            .collect()
    }

    pub(crate) fn fixture_rows() -> Vec<Vec<String>> {
        rows(&[
            &["Level.", "1st Floor"],
            &["Grid Location:.", "A-1"],
            &["Size:.", "14x24   "],
            &["Longitudinal:.", "12-#8"],
            &["f'c (ksi):.", "   10"],
            &["Unbraced Length (ft).", "10", "10"],
            &["K.", "1.0", "1.0"],
            &["Axial", "nothing", "nothing", "900"],
            &["Moment", "Top", "-100"],
            &["Moment", "Bottom", "-200"],
            &["test", "Bottom", "-300"],
        ])
    }

    pub(crate) fn sample_record() -> ColumnDesignRecord {
        extract_schedule(&fixture_rows()).unwrap().remove(0)
    }

    fn second_story_rows(level: &str, grid: &str) -> Vec<Vec<String>> {
        rows(&[
            &["Level.", level],
            &["Grid Location:.", grid],
            &["Size:.", "18x18  (in)"],
            &["Longitudinal:.", " 8-#9 bars"],
            &["f'c (ksi):.", "6"],
            &["Unbraced Length (ft).", "12", "11"],
            &["K.", " 1.0", "0.9 "],
            &["Axial", "450"],
            &["Moment", "Top", "50"],
            &["", "", "-20"],
            &["Moment", "Bottom", "-75"],
            &["", "", "10"],
        ])
    }

    #[test]
    fn test_extract_fixture() {
        let records = extract_schedule(&fixture_rows()).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.level, "1st Floor");
        assert_eq!(r.grid_location, "A-1");
        assert_eq!(r.size, "14x24");
        assert_eq!(r.rebar, "12-#8");
        assert_eq!(r.fpc, "10");
        assert_eq!((r.lux.as_str(), r.luy.as_str()), ("10", "10"));
        assert_eq!((r.kx.as_str(), r.ky.as_str()), ("1.0", "1.0"));
        assert_eq!(r.pu, "900");
        assert_eq!(r.mu_x_top, "-100");
        assert_eq!(r.mu_y_top, "-200");
        assert_eq!(r.mu_x_bot, "-200");
        assert_eq!(r.mu_y_bot, "-300");
    }

    #[test]
    fn test_typed_accessors() {
        let r = sample_record();
        assert_eq!(r.dimensions().unwrap(), (14.0, 24.0));
        assert_eq!(r.rebar_callout().unwrap().count, 12);
        assert_eq!(r.fpc_ksi().unwrap(), 10.0);
        assert_eq!(r.unbraced_lengths().unwrap(), (Feet(10.0), Feet(10.0)));
        assert_eq!(r.k_factors().unwrap(), (1.0, 1.0));

        let demand = r.demand().unwrap();
        assert_eq!(demand.pu, Kips(900.0));
        assert_eq!(demand.mu_x, KipFt(200.0));
        assert_eq!(demand.mu_y, KipFt(300.0));
        assert_eq!(demand.moment(BendingAxis::Y), KipFt(300.0));
    }

    #[test]
    fn test_bad_size_is_invalid_input() {
        let mut r = sample_record();
        r.size = "14 by 24".into();
        assert_eq!(r.dimensions().unwrap_err().error_code(), "INVALID_INPUT");
        r.size = "0x24".into();
        assert!(r.dimensions().is_err());
    }

    #[test]
    fn test_multiple_records_and_trimming() {
        let mut all = fixture_rows();
        all.extend(second_story_rows("2nd Floor", "B-2"));
        let records = extract_schedule(&all).unwrap();
        assert_eq!(records.len(), 2);

        let r = &records[1];
        assert_eq!(r.size, "18x18");
        assert_eq!(r.rebar, "8-#9");
        assert_eq!(r.ky, "0.9");
        assert_eq!(r.pu, "450");
        assert_eq!(r.mu_y_top, "-20");
        assert_eq!(r.mu_y_bot, "10");
    }

    #[test]
    fn test_missing_pair_at_end_of_input() {
        let mut raw = fixture_rows();
        raw.truncate(10); // drop the row pairing with "Moment Bottom"
        let err = extract_schedule(&raw).unwrap_err();
        assert_eq!(err, CalcError::malformed_row(10, "Moment row has no following y moment row"));
    }

    #[test]
    fn test_missing_pair_before_next_level() {
        let mut raw = fixture_rows();
        raw.truncate(10);
        raw.extend(second_story_rows("2nd Floor", "A-1"));
        let err = extract_schedule(&raw).unwrap_err();
        assert!(matches!(err, CalcError::MalformedScheduleRow { row: 11, .. }));
        assert!(err.to_string().contains("Level."));
    }

    #[test]
    fn test_value_row_cannot_pair_as_y_moment() {
        let mut raw = fixture_rows();
        raw.truncate(9); // ends at "Moment Top"
        raw.extend(rows(&[
            &["Axial", "10"],
            &["Moment", "Bottom", "-200"],
            &["", "", "-300"],
        ]));
        assert!(matches!(
            extract_schedule(&raw).unwrap_err(),
            CalcError::MalformedScheduleRow { row: 10, .. }
        ));
    }

    #[test]
    fn test_missing_field_index() {
        let raw = rows(&[&["Level."]]);
        let err = extract_schedule(&raw).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_SCHEDULE_ROW");

        let raw = rows(&[&["Level.", "L1"], &["K.", "1.0"]]);
        assert!(matches!(
            extract_schedule(&raw).unwrap_err(),
            CalcError::MalformedScheduleRow { row: 2, .. }
        ));
    }

    #[test]
    fn test_value_before_level() {
        let raw = rows(&[&["Grid Location:.", "A-1"]]);
        assert!(matches!(
            extract_schedule(&raw).unwrap_err(),
            CalcError::MalformedScheduleRow { row: 1, .. }
        ));
    }

    #[test]
    fn test_incomplete_record() {
        let mut raw = fixture_rows();
        raw.remove(7); // Axial
        let err = extract_schedule(&raw).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_schedule(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rows_from_csv() {
        let text = "Level.,1st Floor\nAxial,a,b,900\n\"Size:.\",\"14x24  in\"\n";
        let parsed = parse_rows_from_csv(text).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[1], vec!["Axial", "a", "b", "900"]);
        assert_eq!(parsed[2][1], "14x24  in");
    }

    #[test]
    fn test_schedule_table() {
        let mut all = fixture_rows();
        all.extend(second_story_rows("2nd Floor", "B-2"));
        all.extend(second_story_rows("1st Floor", "C-3"));
        let table = ScheduleTable::from_records(extract_schedule(&all).unwrap()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.stories(), ["1st Floor", "2nd Floor"]);
        // grouped by story in first-appearance order
        let designs: Vec<_> = table.records().iter().map(|r| r.grid_location.as_str()).collect();
        assert_eq!(designs, ["A-1", "C-3", "B-2"]);

        assert_eq!(table.cell("1st Floor", "A-1", "size"), Some("14x24"));
        assert_eq!(table.cell("1st Floor", "A-1", "rebar"), Some("12-#8"));
        assert_eq!(table.cell("1st Floor", "A-1", "fpc"), Some("10"));
        assert_eq!(table.cell("1st Floor", "A-1", "pu"), Some("900"));
        assert_eq!(table.cell("1st Floor", "A-1", "mu_x_top"), Some("-100"));
        assert_eq!(table.cell("1st Floor", "A-1", "mu_x_bot"), Some("-200"));
        assert_eq!(table.cell("1st Floor", "A-1", "mu_y_top"), Some("-200"));
        assert_eq!(table.cell("1st Floor", "A-1", "mu_y_bot"), Some("-300"));
        assert_eq!(table.cell("1st Floor", "A-1", "lux"), None);
        assert!(table.get("2nd Floor", "A-1").is_none());
    }

    #[test]
    fn test_duplicate_design_rejected() {
        let mut all = fixture_rows();
        all.extend(fixture_rows());
        let records = extract_schedule(&all).unwrap();
        assert!(ScheduleTable::from_records(records).is_err());
    }

    #[test]
    fn test_header_story_first_then_sorted() {
        let header = ScheduleTable::header();
        assert_eq!(header[0], "story");
        assert_eq!(header[1], "designs");
        let mut sorted = header[2..].to_vec();
        sorted.sort();
        assert_eq!(sorted, header[2..].to_vec());
    }

    #[test]
    fn test_write_csv_and_json() {
        let dir = TempDir::new().unwrap();
        let table = ScheduleTable::from_records(vec![sample_record()]).unwrap();

        let csv_path = dir.path().join("schedule.csv");
        table.write_csv(&csv_path).unwrap();
        let text = std::fs::read_to_string(&csv_path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("story,designs,fpc,mu_x_bot,mu_x_top,mu_y_bot,mu_y_top,pu,rebar,size")
        );
        assert_eq!(lines.next(), Some("1st Floor,A-1,10,-200,-100,-300,-200,900,12-#8,14x24"));

        let json_path = dir.path().join("schedule.json");
        table.write_json(&json_path).unwrap();
        let export: ScheduleExport =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(export.stories, vec!["1st Floor"]);
        assert_eq!(export.entries[0].cells["size"], "14x24");
        assert!(!dir.path().join("schedule.json.tmp").exists());
    }
}
