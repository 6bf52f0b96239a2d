use thiserror::Error;

pub type WlResult<T> = Result<T, WlError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WlError {
    #[error("Invalid month key: {key}")]
    InvalidMonth { key: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
