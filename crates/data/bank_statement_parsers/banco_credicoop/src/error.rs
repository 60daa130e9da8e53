use thiserror::Error;

/// Errors surfaced by the statement import.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The bytes are not a valid workbook of the declared container type, or
    /// a cell does not match the fixed Credicoop layout. Always fatal to the
    /// whole import; no row is ever skipped or returned partially.
    #[error("format error: {0}")]
    Format(String),

    /// The file parsed fine but the ledger side is not set up to receive it
    /// (no statement journal for the bank account).
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;
