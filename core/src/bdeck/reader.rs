use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;

use super::BdeckResult;

/// Standard ATCF b-deck column names, in file order.
pub const COLUMNS: [&str; 37] = [
    "BASIN",
    "CY",
    "YYYYMMDDHH",
    "TECHNUM/MIN",
    "TECH",
    "TAU",
    "LATN/S",
    "LONE/W",
    "VMAX",
    "MSLP",
    "TY",
    "RAD",
    "WINDCODE",
    "RAD1",
    "RAD2",
    "RAD3",
    "RAD4",
    "POUTER",
    "ROUTER",
    "RMW",
    "GUSTS",
    "EYE",
    "SUBREGION",
    "MAXSEAS",
    "INITIALS",
    "DIR",
    "SPEED",
    "STORMNAME",
    "DEPTH",
    "SEAS",
    "SEASCODE",
    "SEAS1",
    "SEAS2",
    "SEAS3",
    "SEAS4",
    "USERDEFINED",
    "USERDATA",
];

/// Leading rows dropped by default; the reference Maria deck opens with two
/// rows that belong to the precursor disturbance.
pub const DEFAULT_SKIP_ROWS: usize = 2;

pub fn column_index(name: &str) -> Option<usize> {
    COLUMNS.iter().position(|&column| column == name)
}

/// One raw b-deck row, fields trimmed, empty fields absent.
#[derive(Debug, Clone, PartialEq)]
pub struct BdeckRecord {
    /// 1-based line number in the source file.
    pub line: usize,
    fields: Vec<String>,
}

impl BdeckRecord {
    pub fn new(line: usize, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// Value of a named column, `None` when the row is short or the field blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        column_index(column)
            .and_then(|index| self.fields.get(index))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parses comma-separated b-deck rows after dropping `skip_rows` leading rows.
pub fn parse_bdeck<R: Read>(reader: R, skip_rows: usize) -> BdeckResult<Vec<BdeckRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.records().skip(skip_rows) {
        let row = result?;
        let line = row
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or(records.len() + skip_rows + 1);
        let fields = row
            .iter()
            .take(COLUMNS.len())
            .map(str::to_string)
            .collect();
        records.push(BdeckRecord::new(line, fields));
    }
    Ok(records)
}

pub fn load_bdeck_file<P: AsRef<Path>>(path: P, skip_rows: usize) -> BdeckResult<Vec<BdeckRecord>> {
    let path = path.as_ref();
    info!("Loading b-deck data from {}", path.display());
    let file = File::open(path)?;
    let records = parse_bdeck(file, skip_rows)?;
    info!("Read {} b-deck rows", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
AL, 15, 2017091212,   , BEST,   0, 123N,  412W,  20, 1010, LO,
AL, 15, 2017091218,   , BEST,   0, 125N,  425W,  25, 1009, LO,
AL, 15, 2017092006,   , BEST,   0, 180N,  655W, 135,  920, HU,  34, NEQ,  130,  120,   80,  100, 1006,  200,  10, 165,  15,   L,   0,    ,   0,   0,      MARIA,
AL, 15, 2017092012,   , BEST,   0, 183N,  662W, 125,  934, HU,  34, NEQ,  140,  120,   80,  100, 1006,  210,  20,
";

    #[test]
    fn skips_leading_rows_and_trims_fields() {
        let records = parse_bdeck(SAMPLE.as_bytes(), DEFAULT_SKIP_ROWS).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("YYYYMMDDHH"), Some("2017092006"));
        assert_eq!(records[0].get("LATN/S"), Some("180N"));
        assert_eq!(records[0].get("RMW"), Some("10"));
        assert_eq!(records[0].get("STORMNAME"), Some("MARIA"));
        assert_eq!(records[0].line, 3);
    }

    #[test]
    fn short_rows_leave_trailing_columns_absent() {
        let records = parse_bdeck(SAMPLE.as_bytes(), 0).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].get("RMW"), None);
        assert_eq!(records[0].get("TECHNUM/MIN"), None);
        assert_eq!(records[3].get("RMW"), Some("20"));
        assert_eq!(records[3].get("GUSTS"), None);
    }

    #[test]
    fn loads_from_disk() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(SAMPLE.as_bytes()).unwrap();
        let records = load_bdeck_file(temp.path(), 3).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("VMAX"), Some("125"));
    }

    #[test]
    fn unknown_column_is_none() {
        let records = parse_bdeck(SAMPLE.as_bytes(), 2).unwrap();
        assert_eq!(records[0].get("NOT_A_COLUMN"), None);
    }
}
