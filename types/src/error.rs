//! Errors raised while constructing fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("address must not be empty")]
    EmptyAddress,

    #[error("principal id must not be empty")]
    EmptyPrincipal,

    #[error("invalid engine parameters: {0}")]
    InvalidParams(String),
}
