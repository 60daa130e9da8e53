//! Banco Credicoop statement spreadsheet importer.
//!
//! The bank hands out transaction listings in two container formats over the
//! years: a modern zip-based XLSX workbook and a legacy binary XLS workbook.
//! Both share the same fixed column layout (date, concept, debit, credit,
//! code in columns A, B, D, E, G); only the date literal differs. This crate
//! turns the raw bytes of either into normalized [`Statement`]s and, through
//! [`reconcile`], into ledger-ready statement/origin records.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xls, XlsOptions, Xlsx};
use tracing::debug;

pub mod cells;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod schema;
pub mod statement;

pub use error::{ImportError, Result};
pub use model::{Move, Statement};
pub use statement::StatementBuilder;

pub const PARSER_NAME: &str = "banco_credicoop";

/// Codepage for strings in legacy XLS files (windows-1252).
pub const DEFAULT_CODEPAGE: u16 = 1252;

/// Container variant of an upload. The caller declares it up front; the
/// parser never sniffs the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Modern zip-based workbook, dates as `YYYYMMDD` literals.
    Xlsx,
    /// Legacy binary workbook, dates as `DD/MM/YYYY` literals.
    Xls,
}

impl std::str::FromStr for FileFormat {
    type Err = ImportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" => Ok(FileFormat::Xlsx),
            "xls" => Ok(FileFormat::Xls),
            other => Err(ImportError::Format(format!("unknown file format '{other}'"))),
        }
    }
}

pub struct CredicoopParser {
    pub codepage: u16,
}

impl CredicoopParser {
    pub fn new() -> Self {
        Self {
            codepage: DEFAULT_CODEPAGE,
        }
    }

    pub fn with_codepage(mut self, codepage: u16) -> Self {
        self.codepage = codepage;
        self
    }

    /// Parses one uploaded file into one statement per worksheet.
    ///
    /// Any malformed cell or container aborts the whole import; statements
    /// are never returned partially.
    pub fn parse_bytes(&self, data: &[u8], format: FileFormat) -> Result<Vec<Statement>> {
        match format {
            FileFormat::Xlsx => self.parse_xlsx(data),
            FileFormat::Xls => self.parse_xls(data),
        }
    }

    /// The modern export holds everything in its active worksheet. calamine
    /// does not expose the workbook's active-tab index, so the first sheet
    /// stands in for it; the bank's single-sheet exports make the two
    /// coincide.
    fn parse_xlsx(&self, data: &[u8]) -> Result<Vec<Statement>> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))
            .map_err(|e| ImportError::Format(format!("not a valid XLSX workbook: {e}")))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::Format("workbook has no worksheets".into()))?
            .map_err(|e| ImportError::Format(format!("cannot read worksheet: {e}")))?;
        Ok(vec![read_sheet(&range, FileFormat::Xlsx)?])
    }

    /// Legacy exports may spread moves over several worksheets; each one
    /// becomes its own statement, in workbook order.
    fn parse_xls(&self, data: &[u8]) -> Result<Vec<Statement>> {
        let mut options = XlsOptions::default();
        options.force_codepage = Some(self.codepage);
        let mut workbook = Xls::new_with_options(Cursor::new(data), options)
            .map_err(|e| ImportError::Format(format!("not a valid XLS workbook: {e}")))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let mut statements = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let range = workbook.worksheet_range(&name).map_err(|e| {
                ImportError::Format(format!("cannot read worksheet '{name}': {e}"))
            })?;
            debug!(worksheet = %name, "reading legacy worksheet");
            statements.push(read_sheet(&range, FileFormat::Xls)?);
        }
        Ok(statements)
    }
}

impl Default for CredicoopParser {
    fn default() -> Self {
        Self::new()
    }
}

/// The first physical row is the header; every row after it must be a move.
fn read_sheet(range: &Range<Data>, format: FileFormat) -> Result<Statement> {
    let mut builder = StatementBuilder::new(format);
    for row in range.rows().skip(1) {
        builder.push_row(row)?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_selector_from_str() {
        assert_eq!("xlsx".parse::<FileFormat>().unwrap(), FileFormat::Xlsx);
        assert_eq!("XLS".parse::<FileFormat>().unwrap(), FileFormat::Xls);
        assert!("ods".parse::<FileFormat>().is_err());
    }

    #[test]
    fn test_default_codepage_is_windows_1252() {
        assert_eq!(CredicoopParser::new().codepage, 1252);
        assert_eq!(CredicoopParser::new().with_codepage(850).codepage, 850);
    }

    #[test]
    fn test_garbage_bytes_are_a_format_error() {
        let parser = CredicoopParser::new();
        let garbage = b"definitely not a workbook";
        for format in [FileFormat::Xlsx, FileFormat::Xls] {
            let err = parser.parse_bytes(garbage, format).unwrap_err();
            assert!(matches!(err, ImportError::Format(_)));
        }
    }
}
