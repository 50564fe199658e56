//!
//! Encodings map the ordinal values of sequence symbols (the base encoding) to
//! integer codes and back. Every concrete encoding implements [Encoding], which
//! only works on flat code buffers. Shape handling and the rules for which
//! encodings may be converted into each other live in [crate::dispatch].
//!
use std::fmt::{self, Debug, Display};

use super::alphabet::{Alphabet, AlphabetType, lookup_alphabet};
use super::error::{EncodingError, Result};

///
/// Capability interface shared by all encodings.
///
/// `encode_codes` takes base-encoded codes (character ordinals) and returns
/// codes in this encoding, `decode_codes` goes the other way.
///
pub trait Encoding: Debug + Display + Send + Sync {
    fn encode_codes(&self, codes: &[u64]) -> Result<Vec<u64>>;

    fn decode_codes(&self, codes: &[u64]) -> Result<Vec<u64>>;

    fn is_base_encoding(&self) -> bool {
        false
    }

    fn is_one_to_one_encoding(&self) -> bool {
        false
    }

    /// Numeric encodings hand back raw code buffers instead of arrays tagged
    /// with the encoding.
    fn is_numeric(&self) -> bool {
        false
    }

    /// Number of distinct codes, if the domain is finite.
    fn alphabet_size(&self) -> Option<u64> {
        None
    }
}

/// The canonical identity encoding: a code is the ordinal of its character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BaseEncoding;

impl Display for BaseEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BaseEncoding")
    }
}

impl Encoding for BaseEncoding {
    fn encode_codes(&self, codes: &[u64]) -> Result<Vec<u64>> {
        Ok(codes.to_vec())
    }

    fn decode_codes(&self, codes: &[u64]) -> Result<Vec<u64>> {
        Ok(codes.to_vec())
    }

    fn is_base_encoding(&self) -> bool {
        true
    }

    fn is_one_to_one_encoding(&self) -> bool {
        true
    }
}

/// Encodes symbols of a fixed alphabet as their index in the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlphabetEncoding {
    alphabet_type: AlphabetType,
}

impl AlphabetEncoding {
    pub const fn new(alphabet_type: AlphabetType) -> Self {
        AlphabetEncoding { alphabet_type }
    }

    pub fn alphabet_type(&self) -> AlphabetType {
        self.alphabet_type
    }

    pub fn alphabet(&self) -> &'static Alphabet {
        lookup_alphabet(&self.alphabet_type)
    }
}

impl Display for AlphabetEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AlphabetEncoding({})", self.alphabet_type)
    }
}

impl Encoding for AlphabetEncoding {
    fn encode_codes(&self, codes: &[u64]) -> Result<Vec<u64>> {
        let alphabet = self.alphabet();
        codes
            .iter()
            .map(|&code| {
                u8::try_from(code)
                    .ok()
                    .and_then(|byte| alphabet.index_of(byte))
                    .map(u64::from)
                    .ok_or_else(|| EncodingError::InvalidSymbol {
                        symbol: code,
                        encoding: self.to_string(),
                    })
            })
            .collect()
    }

    fn decode_codes(&self, codes: &[u64]) -> Result<Vec<u64>> {
        let alphabet = self.alphabet();
        codes
            .iter()
            .map(|&code| {
                usize::try_from(code)
                    .ok()
                    .and_then(|index| alphabet.symbol(index))
                    .map(u64::from)
                    .ok_or_else(|| EncodingError::InvalidCode {
                        code,
                        encoding: self.to_string(),
                    })
            })
            .collect()
    }

    fn is_one_to_one_encoding(&self) -> bool {
        true
    }

    fn alphabet_size(&self) -> Option<u64> {
        Some(self.alphabet().size() as u64)
    }
}

// highest printable ASCII character usable as a quality symbol
const MAX_QUALITY_SYMBOL: u64 = b'~' as u64;

///
/// Phred quality scores stored as printable ASCII characters. Scores are
/// numeric, so the encoded output stays a raw buffer.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualityEncoding {
    offset: u8,
}

impl QualityEncoding {
    pub const PHRED33: QualityEncoding = QualityEncoding { offset: 33 };
    pub const PHRED64: QualityEncoding = QualityEncoding { offset: 64 };

    pub fn offset(&self) -> u8 {
        self.offset
    }

    fn max_score(&self) -> u64 {
        MAX_QUALITY_SYMBOL - u64::from(self.offset)
    }
}

impl Display for QualityEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QualityEncoding(phred+{})", self.offset)
    }
}

impl Encoding for QualityEncoding {
    fn encode_codes(&self, codes: &[u64]) -> Result<Vec<u64>> {
        codes
            .iter()
            .map(|&code| {
                code.checked_sub(u64::from(self.offset))
                    .filter(|&score| score <= self.max_score())
                    .ok_or_else(|| EncodingError::InvalidSymbol {
                        symbol: code,
                        encoding: self.to_string(),
                    })
            })
            .collect()
    }

    fn decode_codes(&self, codes: &[u64]) -> Result<Vec<u64>> {
        codes
            .iter()
            .map(|&score| {
                if score > self.max_score() {
                    return Err(EncodingError::InvalidCode {
                        code: score,
                        encoding: self.to_string(),
                    });
                }
                Ok(score + u64::from(self.offset))
            })
            .collect()
    }

    fn is_one_to_one_encoding(&self) -> bool {
        true
    }

    fn is_numeric(&self) -> bool {
        true
    }

    fn alphabet_size(&self) -> Option<u64> {
        Some(self.max_score() + 1)
    }
}

///
/// The encoding attached to every encoded array. Equality and hashing are
/// structural, so two encodings built from the same parameters compare equal.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceEncoding {
    Base,
    Alphabet(AlphabetEncoding),
    Quality(QualityEncoding),
}

pub const BASE_ENCODING: SequenceEncoding = SequenceEncoding::Base;
pub const DNA_ENCODING: SequenceEncoding =
    SequenceEncoding::Alphabet(AlphabetEncoding::new(AlphabetType::Dna));
pub const RNA_ENCODING: SequenceEncoding =
    SequenceEncoding::Alphabet(AlphabetEncoding::new(AlphabetType::Rna));
pub const DNA_N_ENCODING: SequenceEncoding =
    SequenceEncoding::Alphabet(AlphabetEncoding::new(AlphabetType::DnaN));
pub const PROTEIN_ENCODING: SequenceEncoding =
    SequenceEncoding::Alphabet(AlphabetEncoding::new(AlphabetType::Protein));

impl SequenceEncoding {
    fn inner(&self) -> &dyn Encoding {
        match self {
            SequenceEncoding::Base => &BaseEncoding,
            SequenceEncoding::Alphabet(encoding) => encoding,
            SequenceEncoding::Quality(encoding) => encoding,
        }
    }
}

impl Display for SequenceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self.inner(), f)
    }
}

impl Encoding for SequenceEncoding {
    fn encode_codes(&self, codes: &[u64]) -> Result<Vec<u64>> {
        self.inner().encode_codes(codes)
    }

    fn decode_codes(&self, codes: &[u64]) -> Result<Vec<u64>> {
        self.inner().decode_codes(codes)
    }

    fn is_base_encoding(&self) -> bool {
        self.inner().is_base_encoding()
    }

    fn is_one_to_one_encoding(&self) -> bool {
        self.inner().is_one_to_one_encoding()
    }

    fn is_numeric(&self) -> bool {
        self.inner().is_numeric()
    }

    fn alphabet_size(&self) -> Option<u64> {
        self.inner().alphabet_size()
    }
}

impl From<BaseEncoding> for SequenceEncoding {
    fn from(_: BaseEncoding) -> Self {
        SequenceEncoding::Base
    }
}

impl From<AlphabetEncoding> for SequenceEncoding {
    fn from(encoding: AlphabetEncoding) -> Self {
        SequenceEncoding::Alphabet(encoding)
    }
}

impl From<AlphabetType> for SequenceEncoding {
    fn from(alphabet_type: AlphabetType) -> Self {
        SequenceEncoding::Alphabet(AlphabetEncoding::new(alphabet_type))
    }
}

impl From<QualityEncoding> for SequenceEncoding {
    fn from(encoding: QualityEncoding) -> Self {
        SequenceEncoding::Quality(encoding)
    }
}
