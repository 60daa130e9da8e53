use calamine::Data;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::cells;
use crate::error::Result;
use crate::FileFormat;

/// 0-based columns of the fixed Credicoop layout (letters A, B, D, E, G).
/// Columns C and F exist in the exports but are never read.
pub const COL_DATE: usize = 0;
pub const COL_CONCEPT: usize = 1;
pub const COL_DEBIT: usize = 3;
pub const COL_CREDIT: usize = 4;
pub const COL_CODE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Concept,
    Debit,
    Credit,
    Code,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Date(NaiveDate),
    Text(String),
    Amount(Decimal),
}

pub type CellParser = fn(&Data) -> Result<CellValue>;

pub type MoveSchema = [(Field, usize, CellParser); 5];

/// Dispatch table for one file format. Only the date literal differs
/// between the two variants; the column layout is identical.
pub fn move_schema(format: FileFormat) -> MoveSchema {
    let date: CellParser = match format {
        FileFormat::Xlsx => date_ymd,
        FileFormat::Xls => date_dmy,
    };
    [
        (Field::Date, COL_DATE, date),
        (Field::Concept, COL_CONCEPT, text),
        (Field::Debit, COL_DEBIT, amount),
        (Field::Credit, COL_CREDIT, amount),
        (Field::Code, COL_CODE, code),
    ]
}

fn date_ymd(cell: &Data) -> Result<CellValue> {
    cells::parse_date_ymd(cell).map(CellValue::Date)
}

fn date_dmy(cell: &Data) -> Result<CellValue> {
    cells::parse_date_dmy(cell).map(CellValue::Date)
}

fn text(cell: &Data) -> Result<CellValue> {
    Ok(CellValue::Text(cells::parse_string(cell)))
}

fn amount(cell: &Data) -> Result<CellValue> {
    cells::parse_amount(cell).map(CellValue::Amount)
}

fn code(cell: &Data) -> Result<CellValue> {
    Ok(CellValue::Text(cells::parse_code(cell)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_covers_the_fixed_columns_in_order() {
        for format in [FileFormat::Xlsx, FileFormat::Xls] {
            let fields: Vec<_> = move_schema(format).iter().map(|(f, c, _)| (*f, *c)).collect();
            assert_eq!(
                fields,
                vec![
                    (Field::Date, 0),
                    (Field::Concept, 1),
                    (Field::Debit, 3),
                    (Field::Credit, 4),
                    (Field::Code, 6),
                ]
            );
        }
    }

    #[test]
    fn test_date_parser_swaps_per_variant() {
        let cell = Data::String("20230105".into());
        let (_, _, modern_date) = move_schema(FileFormat::Xlsx)[0];
        let (_, _, legacy_date) = move_schema(FileFormat::Xls)[0];
        assert!(modern_date(&cell).is_ok());
        assert!(legacy_date(&cell).is_err());
    }
}
