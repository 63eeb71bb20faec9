use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("parse error: {0}")]
    NomError(String),
    #[error("unconsumed input: {0}")]
    UnconsumedInput(String),
    #[error("empty input")]
    Empty,
}
