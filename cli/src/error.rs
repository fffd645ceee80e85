use chembalance::{BalanceError, FormulaError, StoichiometryError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Balance(#[from] BalanceError),

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error(transparent)]
    Stoichiometry(#[from] StoichiometryError),

    #[error("{failed} of {total} equations could not be balanced")]
    Unbalanced { failed: usize, total: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),
}
