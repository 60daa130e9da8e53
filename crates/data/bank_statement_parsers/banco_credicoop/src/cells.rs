use calamine::Data;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{ImportError, Result};

/// Raw text of a cell, regardless of how the container typed it.
pub fn cell_str(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Date literal of the modern XLSX export: `20230105`.
pub fn parse_date_ymd(cell: &Data) -> Result<NaiveDate> {
    parse_date(cell, "%Y%m%d")
}

/// Date literal of the legacy XLS export: `05/01/2023`.
pub fn parse_date_dmy(cell: &Data) -> Result<NaiveDate> {
    parse_date(cell, "%d/%m/%Y")
}

fn parse_date(cell: &Data, pattern: &str) -> Result<NaiveDate> {
    let raw = cell_str(cell);
    let s = raw.trim();
    NaiveDate::parse_from_str(s, pattern)
        .map_err(|_| ImportError::Format(format!("invalid date '{s}'")))
}

pub fn parse_string(cell: &Data) -> String {
    cell_str(cell).trim().to_string()
}

/// Empty cells are an exact zero. Everything else must be numeric text,
/// with either `.` or `,` as the decimal separator. Float-typed cells go
/// through their decimal string form, never through float arithmetic.
pub fn parse_amount(cell: &Data) -> Result<Decimal> {
    let raw = cell_str(cell);
    let s = raw.trim();
    if s.is_empty() {
        return Ok(Decimal::ZERO);
    }
    s.replace(',', ".")
        .parse::<Decimal>()
        .map_err(|_| ImportError::Format(format!("invalid amount '{s}'")))
}

/// Transaction-type codes come out of numeric cells as `150.0`; integer-like
/// values normalize to their plain decimal string, anything else stays as
/// trimmed text. Only digits with an all-zero fraction count as integer-like;
/// scientific notation is ordinary text.
pub fn parse_code(cell: &Data) -> String {
    let raw = cell_str(cell);
    let s = raw.trim();
    if let Ok(n) = s.parse::<i64>() {
        return n.to_string();
    }
    if let Some((int_part, frac)) = s.split_once('.') {
        if !frac.is_empty() && frac.bytes().all(|b| b == b'0') {
            if let Ok(n) = int_part.parse::<i64>() {
                return n.to_string();
            }
        }
    }
    s.to_string()
}
