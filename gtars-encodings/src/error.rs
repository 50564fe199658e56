use thiserror::Error;

use super::config::KmerConfigError;

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),
    #[error(
        "Can only convert data that is base encoded or already in the target encoding. Source encoding is {from}, target encoding is {to}"
    )]
    Conversion { from: String, to: String },
    #[error("Not able to decode {data} with {encoding}")]
    UnsupportedType { data: String, encoding: String },
    #[error("Invalid encoding configuration: {0}")]
    Configuration(String),
    #[error("Symbol {symbol} is not part of {encoding}")]
    InvalidSymbol { symbol: u64, encoding: String },
    #[error("Code {code} is outside the domain of {encoding}")]
    InvalidCode { code: u64, encoding: String },
    #[error("Expected a k-mer of length {expected}, found {found}")]
    InvalidKmerLength { expected: usize, found: usize },
    #[error("Row lengths sum to {expected} but the flat buffer holds {found} codes")]
    ShapeMismatch { expected: usize, found: usize },
    #[error(transparent)]
    Config(#[from] KmerConfigError),
}

pub type Result<T> = std::result::Result<T, EncodingError>;
