use calamine::Data;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{ImportError, Result};
use crate::model::{Move, Statement};
use crate::schema::{move_schema, CellValue, Field, MoveSchema};
use crate::FileFormat;

/// Accumulates the data rows of one worksheet into a [`Statement`].
pub struct StatementBuilder {
    schema: MoveSchema,
    statement: Statement,
}

impl StatementBuilder {
    pub fn new(format: FileFormat) -> Self {
        Self {
            schema: move_schema(format),
            statement: Statement::default(),
        }
    }

    /// Parses one data row. The first pushed row seeds `date_from`; every
    /// row advances `date_to`.
    pub fn push_row(&mut self, row: &[Data]) -> Result<()> {
        let op_number = self.statement.moves.len() as u32 + 1;
        let mv = build_move(row, &self.schema, op_number)?;
        if self.statement.date_from.is_none() {
            self.statement.date_from = Some(mv.date);
        }
        self.statement.date_to = Some(mv.date);
        self.statement.moves.push(mv);
        Ok(())
    }

    pub fn finish(self) -> Statement {
        debug!(moves = self.statement.moves.len(), "worksheet finished");
        self.statement
    }
}

fn build_move(row: &[Data], schema: &MoveSchema, op_number: u32) -> Result<Move> {
    let empty = Data::Empty;
    let mut date = None;
    let mut concept = String::new();
    let mut debit = Decimal::ZERO;
    let mut credit = Decimal::ZERO;
    let mut code = String::new();

    for (field, column, parse) in schema.iter() {
        // Rows can be shorter than column G when trailing cells are blank.
        let cell = row.get(*column).unwrap_or(&empty);
        match (field, parse(cell)?) {
            (Field::Date, CellValue::Date(d)) => date = Some(d),
            (Field::Concept, CellValue::Text(s)) => concept = s,
            (Field::Debit, CellValue::Amount(a)) => debit = a,
            (Field::Credit, CellValue::Amount(a)) => credit = a,
            (Field::Code, CellValue::Text(s)) => code = s,
            (field, value) => {
                return Err(ImportError::Format(format!(
                    "schema mismatch for {field:?}: {value:?}"
                )))
            }
        }
    }

    let date = date.ok_or_else(|| ImportError::Format("row without a date".into()))?;
    Ok(Move {
        date,
        concept,
        debit,
        credit,
        code,
        op_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(date: &str, concept: &str, debit: &str, credit: &str, code: &str) -> Vec<Data> {
        vec![
            Data::String(date.into()),
            Data::String(concept.into()),
            Data::Empty,
            Data::String(debit.into()),
            Data::String(credit.into()),
            Data::Empty,
            Data::String(code.into()),
        ]
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_moves_keep_row_order_and_numbering() {
        let mut builder = StatementBuilder::new(FileFormat::Xlsx);
        builder.push_row(&row("20230105", "acreditación", "", "1500,50", "43")).unwrap();
        builder.push_row(&row("20230110", "pago", "250.00", "", "")).unwrap();
        builder.push_row(&row("20230112", "comisión", "12,00", "", "101")).unwrap();
        let statement = builder.finish();

        assert_eq!(statement.moves.len(), 3);
        let numbers: Vec<u32> = statement.moves.iter().map(|m| m.op_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(statement.date_from, Some(ymd(2023, 1, 5)));
        assert_eq!(statement.date_to, Some(ymd(2023, 1, 12)));
    }

    #[test]
    fn test_debit_and_credit_default_to_zero() {
        let mut builder = StatementBuilder::new(FileFormat::Xlsx);
        builder.push_row(&row("20230105", "sin importes", "", "", "")).unwrap();
        let statement = builder.finish();

        let mv = &statement.moves[0];
        assert_eq!(mv.debit, Decimal::ZERO);
        assert_eq!(mv.credit, Decimal::ZERO);
        assert_eq!(mv.amount(), Decimal::ZERO);
        assert_eq!(mv.code, "");
    }

    #[test]
    fn test_short_row_reads_missing_cells_as_blank() {
        let mut builder = StatementBuilder::new(FileFormat::Xlsx);
        let short = vec![
            Data::String("20230105".into()),
            Data::String("solo fecha y concepto".into()),
        ];
        builder.push_row(&short).unwrap();
        let statement = builder.finish();

        assert_eq!(statement.moves[0].debit, Decimal::ZERO);
        assert_eq!(statement.moves[0].code, "");
    }

    #[test]
    fn test_legacy_date_literal() {
        let mut builder = StatementBuilder::new(FileFormat::Xls);
        builder.push_row(&row("05/01/2023", "pago", "100", "", "")).unwrap();
        let statement = builder.finish();
        assert_eq!(statement.date_from, Some(ymd(2023, 1, 5)));
    }

    #[test]
    fn test_bad_cell_aborts_the_row() {
        let mut builder = StatementBuilder::new(FileFormat::Xlsx);
        let err = builder
            .push_row(&row("20230105", "texto en importe", "no-number", "", ""))
            .unwrap_err();
        assert!(matches!(err, ImportError::Format(_)));
    }

    #[test]
    fn test_empty_worksheet_has_no_dates() {
        let statement = StatementBuilder::new(FileFormat::Xlsx).finish();
        assert!(statement.moves.is_empty());
        assert_eq!(statement.date_from, None);
        assert_eq!(statement.date_to, None);
    }

    #[test]
    fn test_separate_builders_track_dates_independently() {
        let mut first = StatementBuilder::new(FileFormat::Xls);
        let mut second = StatementBuilder::new(FileFormat::Xls);
        first.push_row(&row("05/01/2023", "a", "", "10", "")).unwrap();
        second.push_row(&row("20/02/2023", "b", "5", "", "")).unwrap();

        assert_eq!(first.finish().date_from, Some(ymd(2023, 1, 5)));
        assert_eq!(second.finish().date_from, Some(ymd(2023, 2, 20)));
    }
}
