/// Errors raised by the ledger itself.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("import error: {0}")]
    Import(String),
    #[error("export error: {0}")]
    Export(String),
}

/// Errors raised by the command-line host around the ledger.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("missing input csv path. usage: finance-tracker <transactions.csv> [--months N] [--json | --statement]")]
    MissingArg,
    #[error("invalid argument: {0}")]
    InvalidArg(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
