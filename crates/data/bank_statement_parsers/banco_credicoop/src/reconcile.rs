use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::{ImportError, Result};
use crate::model::{Move, Statement};

/// Keys in an origin's information map are namespaced with this prefix.
pub const INFORMATION_PREFIX: &str = "banco_credicoop_";

/// Statement journal configured on the ledger side for a bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Journal {
    pub name: String,
}

/// Seam to the host ledger: journals live there, keyed by company and bank
/// account. The import never creates one.
pub trait JournalResolver {
    fn find_journal(&self, company: &str, bank_account: &str) -> Option<Journal>;
}

/// Ledger-ready rendition of one parsed move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginRecord {
    pub number: u32,
    pub date: NaiveDate,
    /// Signed: `credit - debit`.
    pub amount: Decimal,
    pub description: String,
    pub information: BTreeMap<String, String>,
}

/// Ledger-ready rendition of one parsed statement.
#[derive(Debug, Clone, Serialize)]
pub struct StatementRecord {
    pub name: String,
    pub journal: Journal,
    pub start_balance: Decimal,
    pub end_balance: Decimal,
    pub total_amount: Decimal,
    pub number_of_lines: u32,
    pub origins: Vec<OriginRecord>,
}

/// Maps parsed statements to ledger records. Runs only after the whole file
/// parsed successfully; a missing journal is a configuration problem for the
/// user, not a parsing failure.
pub fn reconcile_statements(
    statements: &[Statement],
    resolver: &dyn JournalResolver,
    company: &str,
    bank_account: &str,
) -> Result<Vec<StatementRecord>> {
    let journal = resolver.find_journal(company, bank_account).ok_or_else(|| {
        ImportError::Configuration(format!(
            "to import statements, create a journal for account \"{bank_account}\""
        ))
    })?;

    Ok(statements
        .iter()
        .map(|statement| reconcile_statement(statement, journal.clone(), bank_account))
        .collect())
}

fn reconcile_statement(
    statement: &Statement,
    journal: Journal,
    bank_account: &str,
) -> StatementRecord {
    let origins: Vec<OriginRecord> = statement.moves.iter().map(origin_from_move).collect();
    let total_amount: Decimal = statement.moves.iter().map(Move::amount).sum();
    debug!(lines = origins.len(), %total_amount, "statement reconciled");

    StatementRecord {
        name: statement_name(bank_account, statement),
        journal,
        start_balance: Decimal::ZERO,
        end_balance: total_amount,
        total_amount,
        number_of_lines: origins.len() as u32,
        origins,
    }
}

/// Exactly one origin per move. The information map carries the transaction
/// code only when the bank supplied one.
pub fn origin_from_move(mv: &Move) -> OriginRecord {
    let mut information = BTreeMap::new();
    if !mv.code.is_empty() {
        information.insert(format!("{INFORMATION_PREFIX}code"), mv.code.clone());
    }
    OriginRecord {
        number: mv.op_number,
        date: mv.date,
        amount: mv.amount(),
        description: mv.concept.clone(),
        information,
    }
}

/// `<account>@( <from> <to> )`, account label capped at 24 characters.
fn statement_name(bank_account: &str, statement: &Statement) -> String {
    let label: String = bank_account.chars().take(24).collect();
    match (statement.date_from, statement.date_to) {
        (Some(from), Some(to)) => format!("{label}@( {from} {to} )"),
        _ => label,
    }
}
