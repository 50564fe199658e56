use std::ffi::OsStr;
use std::fs::read_to_string;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::alphabet::AlphabetType;
use super::encoding::AlphabetEncoding;
use super::error::{EncodingError, Result};
use super::kmers::KmerEncoding;

///
/// Parameters of a k-mer encoding, usually read from a TOML file:
///
/// ```toml
/// k = 5
/// alphabet = "dna"
/// ```
///
#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct KmerConfig {
    pub k: i64,
    pub alphabet: AlphabetType,
}

#[derive(Error, Debug)]
pub enum KmerConfigError {
    #[error("Missing or invalid file extension in k-mer config file. It must be `toml`")]
    InvalidFileType,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl KmerConfig {
    ///
    /// Build the k-mer encoding described by this config.
    ///
    /// Fails with a configuration error when `k` is not positive or the
    /// k-mers of the alphabet do not fit in 64 bits.
    ///
    pub fn build(&self) -> Result<KmerEncoding> {
        let k = usize::try_from(self.k)
            .ok()
            .filter(|&k| k > 0)
            .ok_or_else(|| {
                EncodingError::Configuration(format!("k-mer size must be positive, got {}", self.k))
            })?;
        KmerEncoding::new(k, AlphabetEncoding::new(self.alphabet))
    }
}

impl FromStr for KmerConfig {
    type Err = KmerConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl TryFrom<&Path> for KmerConfig {
    type Error = KmerConfigError;

    fn try_from(path: &Path) -> std::result::Result<Self, Self::Error> {
        match path.extension().and_then(OsStr::to_str) {
            Some("toml") => {}
            _ => return Err(KmerConfigError::InvalidFileType),
        }
        let toml_str = read_to_string(path)?;
        toml_str.parse()
    }
}
