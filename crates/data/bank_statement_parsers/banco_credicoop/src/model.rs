use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// One transaction row of a worksheet.
///
/// A well-formed row has exactly one of `debit`/`credit` non-zero, but the
/// bank's files are taken as given: the parser does not enforce it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Move {
    pub date: NaiveDate,
    pub concept: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub code: String,
    /// 1-based position among the data rows of the worksheet. Doubles as
    /// the operation identifier on the ledger side.
    pub op_number: u32,
}

impl Move {
    /// Signed amount: positive for credits, negative for debits.
    pub fn amount(&self) -> Decimal {
        self.credit - self.debit
    }
}

/// All moves of one worksheet, with the date span of its rows.
///
/// Both dates are `None` only for a worksheet with no data rows. Rows are
/// kept in worksheet order; `date_to` tracks the last row seen, which equals
/// the maximum date only when the export is chronologically sorted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Statement {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub moves: Vec<Move>,
}
