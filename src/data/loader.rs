//! Excel Data Loader Module
//! Reads the first worksheet of an `.xlsx`/`.xls` file into a Polars DataFrame.

use calamine::{open_workbook_auto, CellErrorType, Data, Range, Reader};
use chrono::{NaiveDate, TimeDelta, Timelike};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// File extensions accepted by the uploader.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("unsupported file type '{0}', expected .xlsx or .xls")]
    UnsupportedFormat(String),
    #[error("{0}")]
    Workbook(#[from] calamine::Error),
    #[error("the workbook contains no worksheet")]
    NoWorksheet,
    #[error("Failed to build table: {0}")]
    PolarsError(#[from] PolarsError),
}

/// How a spreadsheet column is typed once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Text,
}

/// Loads participant spreadsheets.
pub struct DataLoader;

impl DataLoader {
    /// Check the file extension against the accepted spreadsheet formats.
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|supported| ext.eq_ignore_ascii_case(supported))
            })
            .unwrap_or(false)
    }

    /// Load the first worksheet of an Excel file, first row as headers.
    pub fn load_excel(path: &Path) -> Result<DataFrame, LoaderError> {
        if !Self::is_supported(path) {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            return Err(LoaderError::UnsupportedFormat(name));
        }

        let mut workbook = open_workbook_auto(path)?;
        let sheet_name = workbook.sheet_names().first().cloned().unwrap_or_default();
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(LoaderError::NoWorksheet)??;

        let df = Self::frame_from_range(&range)?;
        info!(
            path = %path.display(),
            sheet = %sheet_name,
            rows = df.height(),
            columns = df.width(),
            "Loaded spreadsheet"
        );
        Ok(df)
    }

    /// Build a DataFrame from a worksheet range. The first row holds the headers.
    ///
    /// The range starts at the first used cell, so blank leading sheet
    /// columns are put back as empty columns.
    pub fn frame_from_range(range: &Range<Data>) -> Result<DataFrame, LoaderError> {
        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(DataFrame::empty());
        };
        let body: Vec<&[Data]> = rows.collect();

        let leading = range.start().map(|(_, col)| col as usize).unwrap_or(0);
        let header: Vec<Data> = std::iter::repeat(Data::Empty)
            .take(leading)
            .chain(header.iter().cloned())
            .collect();

        let columns: Vec<Column> = Self::header_names(&header)
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells: Vec<Option<&Data>> = body
                    .iter()
                    .map(|row| idx.checked_sub(leading).and_then(|col| row.get(col)))
                    .collect();
                Self::build_column(&name, &cells)
            })
            .collect();

        Ok(DataFrame::new(columns)?)
    }

    /// Turn the header row into unique column names.
    ///
    /// Blank headers become `Unnamed: <index>` and repeated headers get a
    /// `.<n>` suffix.
    fn header_names(header: &[Data]) -> Vec<String> {
        let mut used: HashSet<String> = HashSet::new();
        let mut repeats: HashMap<String, usize> = HashMap::new();

        header
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let base = Self::cell_text(cell).unwrap_or_else(|| format!("Unnamed: {}", idx));
                let mut name = base.clone();
                while used.contains(&name) {
                    let n = repeats.entry(base.clone()).or_insert(0);
                    *n += 1;
                    name = format!("{}.{}", base, n);
                }
                used.insert(name.clone());
                name
            })
            .collect()
    }

    fn infer_kind(cells: &[Option<&Data>]) -> ColumnKind {
        let mut saw_number = false;
        let mut all_integral = true;

        for cell in cells.iter().flatten() {
            match cell {
                Data::Empty => {}
                Data::String(s) if s.is_empty() => {}
                Data::Int(_) => saw_number = true,
                Data::Float(f) => {
                    saw_number = true;
                    if !Self::is_integral(*f) {
                        all_integral = false;
                    }
                }
                _ => return ColumnKind::Text,
            }
        }

        // All-empty columns stay numeric so they behave like a column of NaN.
        if saw_number && all_integral {
            ColumnKind::Integer
        } else {
            ColumnKind::Float
        }
    }

    fn build_column(name: &str, cells: &[Option<&Data>]) -> Column {
        let kind = Self::infer_kind(cells);
        debug!(column = name, ?kind, "Inferred column type");

        match kind {
            ColumnKind::Integer => {
                let values: Vec<Option<i64>> = cells
                    .iter()
                    .map(|cell| match cell {
                        Some(Data::Int(i)) => Some(*i),
                        Some(Data::Float(f)) => Some(*f as i64),
                        _ => None,
                    })
                    .collect();
                Column::new(name.into(), values)
            }
            ColumnKind::Float => {
                let values: Vec<Option<f64>> = cells
                    .iter()
                    .map(|cell| match cell {
                        Some(Data::Int(i)) => Some(*i as f64),
                        Some(Data::Float(f)) => Some(*f),
                        _ => None,
                    })
                    .collect();
                Column::new(name.into(), values)
            }
            ColumnKind::Text => {
                let values: Vec<Option<String>> = cells
                    .iter()
                    .map(|cell| cell.and_then(Self::cell_text))
                    .collect();
                Column::new(name.into(), values)
            }
        }
    }

    /// Text rendering of a cell; `None` for missing values.
    fn cell_text(cell: &Data) -> Option<String> {
        match cell {
            Data::Empty => None,
            Data::String(s) if s.is_empty() => None,
            Data::String(s) => Some(s.clone()),
            Data::Int(i) => Some(i.to_string()),
            Data::Float(f) if Self::is_integral(*f) => Some(format!("{}", *f as i64)),
            Data::Float(f) => Some(f.to_string()),
            Data::Bool(b) => Some(b.to_string()),
            Data::DateTime(dt) => Self::serial_to_text(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
            Data::Error(e) => Some(Self::error_code(e).to_string()),
        }
    }

    fn error_code(err: &CellErrorType) -> &'static str {
        match err {
            CellErrorType::Div0 => "#DIV/0!",
            CellErrorType::NA => "#N/A",
            CellErrorType::Name => "#NAME?",
            CellErrorType::Null => "#NULL!",
            CellErrorType::Num => "#NUM!",
            CellErrorType::Ref => "#REF!",
            CellErrorType::Value => "#VALUE!",
            CellErrorType::GettingData => "#DATA!",
        }
    }

    fn is_integral(value: f64) -> bool {
        value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15
    }

    /// Convert an Excel serial date (days since 1899-12-30) to text.
    fn serial_to_text(serial: f64) -> Option<String> {
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
        let millis = (serial * 86_400_000.0).round() as i64;
        let datetime = epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)?;

        if datetime.num_seconds_from_midnight() == 0 {
            Some(datetime.format("%Y-%m-%d").to_string())
        } else {
            Some(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::{Notice, NoticeLevel};
    use std::io::Write;
    use std::path::PathBuf;

    fn range_from_rows(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), value);
            }
        }
        range
    }

    fn s(value: &str) -> Data {
        Data::String(value.to_string())
    }

    #[test]
    fn first_row_becomes_headers() {
        let range = range_from_rows(vec![
            vec![s("Nome"), s("Seniority")],
            vec![s("Anna"), s("Junior")],
            vec![s("Luca"), s("Senior")],
        ]);

        let df = DataLoader::frame_from_range(&range).unwrap();
        assert_eq!(df.get_column_names(), &["Nome", "Seniority"]);
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Seniority").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn numeric_columns_are_typed() {
        let range = range_from_rows(vec![
            vec![s("Età"), s("Punteggio"), s("Vuota")],
            vec![Data::Float(20.0), Data::Float(7.5), Data::Empty],
            vec![Data::Int(25), Data::Empty, Data::Empty],
            vec![Data::Empty, Data::Float(9.0), Data::Empty],
        ]);

        let df = DataLoader::frame_from_range(&range).unwrap();
        let eta = df.column("Età").unwrap();
        assert_eq!(eta.dtype(), &DataType::Int64);
        assert_eq!(eta.null_count(), 1);
        assert_eq!(eta.as_materialized_series().i64().unwrap().get(0), Some(20));

        assert_eq!(df.column("Punteggio").unwrap().dtype(), &DataType::Float64);

        let empty = df.column("Vuota").unwrap();
        assert_eq!(empty.dtype(), &DataType::Float64);
        assert_eq!(empty.null_count(), 3);
    }

    #[test]
    fn mixed_columns_fall_back_to_text() {
        let range = range_from_rows(vec![
            vec![s("Codice")],
            vec![Data::Int(12)],
            vec![s("A7")],
            vec![Data::Bool(true)],
            vec![s("")],
        ]);

        let df = DataLoader::frame_from_range(&range).unwrap();
        let codes = df.column("Codice").unwrap();
        assert_eq!(codes.dtype(), &DataType::String);

        let values: Vec<Option<&str>> = codes.as_materialized_series().str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("12"), Some("A7"), Some("true"), None]);
    }

    #[test]
    fn blank_and_repeated_headers_are_made_unique() {
        let range = range_from_rows(vec![
            vec![s("Nome"), Data::Empty, s("Nome"), Data::Float(2024.0), s("Nome")],
            vec![s("a"), s("b"), s("c"), s("d"), s("e")],
        ]);

        let df = DataLoader::frame_from_range(&range).unwrap();
        assert_eq!(
            df.get_column_names(),
            &["Nome", "Unnamed: 1", "Nome.1", "2024", "Nome.2"]
        );
    }

    #[test]
    fn blank_leading_sheet_columns_are_kept() {
        // Column A is blank, so the used range starts at B1
        let mut range = Range::new((0, 1), (2, 2));
        range.set_value((0, 1), s("Seniority"));
        range.set_value((0, 2), s("Età"));
        range.set_value((1, 1), s("Junior"));
        range.set_value((1, 2), Data::Int(25));
        range.set_value((2, 1), s("Senior"));
        range.set_value((2, 2), Data::Int(40));

        let df = DataLoader::frame_from_range(&range).unwrap();
        assert_eq!(df.get_column_names(), &["Unnamed: 0", "Seniority", "Età"]);
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Unnamed: 0").unwrap().null_count(), 2);
        assert_eq!(df.column("Età").unwrap().dtype(), &DataType::Int64);

        let seniority: Vec<Option<&str>> = df
            .column("Seniority")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(seniority, vec![Some("Junior"), Some("Senior")]);
    }

    #[test]
    fn header_only_sheet_has_no_rows() {
        let range = range_from_rows(vec![vec![s("Occupazione"), s("Seniority")]]);

        let df = DataLoader::frame_from_range(&range).unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(df.height(), 0);
    }

    #[test]
    fn empty_sheet_gives_empty_table() {
        let range: Range<Data> = Range::empty();

        let df = DataLoader::frame_from_range(&range).unwrap();
        assert_eq!(df.width(), 0);
        assert_eq!(df.height(), 0);
    }

    #[test]
    fn serial_dates_render_as_iso_text() {
        assert_eq!(DataLoader::serial_to_text(45292.0).as_deref(), Some("2024-01-01"));
        assert_eq!(
            DataLoader::serial_to_text(45292.5).as_deref(),
            Some("2024-01-01 12:00:00")
        );
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(DataLoader::is_supported(Path::new("partecipanti.xlsx")));
        assert!(DataLoader::is_supported(Path::new("PARTECIPANTI.XLS")));
        assert!(!DataLoader::is_supported(Path::new("partecipanti.csv")));
        assert!(!DataLoader::is_supported(Path::new("partecipanti")));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = DataLoader::load_excel(Path::new("partecipanti.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedFormat(ref name) if name == "partecipanti.csv"));
    }

    #[test]
    fn unreadable_file_is_a_workbook_error() {
        let err = DataLoader::load_excel(Path::new("tests/fixtures/does_not_exist.xlsx")).unwrap_err();
        assert!(matches!(err, LoaderError::Workbook(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn malformed_workbook_is_a_workbook_error() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"Nome;Eta\nAnna;20\n").unwrap();

        let err = DataLoader::load_excel(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Workbook(_)), "got {:?}", err);

        let cause = err.to_string();
        assert!(!cause.is_empty());
        let banner = Notice::parse_failed(&cause);
        assert_eq!(banner.level, NoticeLevel::Error);
        assert_eq!(
            banner.message,
            format!(
                "Errore nella lettura del file: {}. Assicurati che sia un file Excel valido.",
                cause
            )
        );
    }

    #[test]
    fn loads_fixture_workbook() {
        let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", "partecipanti.xlsx"]
            .iter()
            .collect();

        let df = DataLoader::load_excel(&path).unwrap();
        assert_eq!(
            df.get_column_names(),
            &["Nome", "Età", "Occupazione", "Seniority", "Organizzazione presso cui lavori o studi"]
        );
        assert_eq!(df.height(), 4);
        assert_eq!(df.column("Età").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("Seniority").unwrap().null_count(), 1);
    }
}
