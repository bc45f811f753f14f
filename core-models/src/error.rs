use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Formula must begin with '=': {0}")]
    InvalidFormula(String),

    #[error("A sheet can have at most one primary column, found {count}")]
    MultiplePrimaryColumns { count: usize },

    #[error("No cell for column '{0}'")]
    UnknownColumn(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
