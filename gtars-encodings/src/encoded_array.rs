use std::fmt::{self, Display};

use super::encoding::{BASE_ENCODING, Encoding, SequenceEncoding};
use super::error::{EncodingError, Result};
use super::ragged::{RaggedArray, RaggedShape, check_shape};

///
/// A flat buffer of codes together with the encoding they are valid under.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArray {
    data: Vec<u64>,
    encoding: SequenceEncoding,
}

impl EncodedArray {
    pub fn new(data: Vec<u64>, encoding: SequenceEncoding) -> Self {
        EncodedArray { data, encoding }
    }

    /// Base-encoded array holding the ordinal of every character in `text`.
    pub fn from_text(text: &str) -> Self {
        EncodedArray::new(text.chars().map(|c| c as u64).collect(), BASE_ENCODING)
    }

    pub fn encoding(&self) -> &SequenceEncoding {
        &self.encoding
    }

    pub fn raw(&self) -> &[u64] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u64> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Display for EncodedArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.encoding.decode_codes(&self.data) {
            Ok(ordinals) => {
                for ordinal in ordinals {
                    let c = u32::try_from(ordinal)
                        .ok()
                        .and_then(char::from_u32)
                        .unwrap_or(char::REPLACEMENT_CHARACTER);
                    write!(f, "{c}")?;
                }
                Ok(())
            }
            Err(_) => write!(f, "{:?}", self.data),
        }
    }
}

///
/// Variable-length encoded rows sharing one flat [EncodedArray].
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRaggedArray {
    data: EncodedArray,
    shape: RaggedShape,
}

impl EncodedRaggedArray {
    pub fn new(data: EncodedArray, shape: impl Into<RaggedShape>) -> Result<Self> {
        let shape = shape.into();
        check_shape(&shape, data.len())?;
        Ok(EncodedRaggedArray { data, shape })
    }

    /// Wrap the rows of a raw ragged array with `encoding`.
    pub fn from_ragged(ragged: RaggedArray, encoding: SequenceEncoding) -> Self {
        let shape = ragged.shape().clone();
        EncodedRaggedArray {
            data: EncodedArray::new(ragged.into_raveled(), encoding),
            shape,
        }
    }

    ///
    /// Concatenate encoded arrays into one ragged array, one row per array.
    ///
    /// All rows must share one encoding. The list may not be empty, since the
    /// encoding of the result is taken from its rows.
    ///
    pub fn from_rows(rows: &[EncodedArray]) -> Result<Self> {
        let encoding = *rows
            .first()
            .ok_or_else(|| {
                EncodingError::PreconditionViolation(
                    "cannot infer the encoding of an empty list of encoded arrays".to_string(),
                )
            })?
            .encoding();

        if let Some(other) = rows.iter().find(|row| *row.encoding() != encoding) {
            return Err(EncodingError::PreconditionViolation(format!(
                "encoded rows must share one encoding, found {} and {}",
                encoding,
                other.encoding()
            )));
        }

        let lengths = rows.iter().map(EncodedArray::len).collect::<Vec<_>>();
        let data = rows.iter().flat_map(|row| row.raw()).copied().collect();

        Ok(EncodedRaggedArray {
            data: EncodedArray::new(data, encoding),
            shape: RaggedShape::new(lengths),
        })
    }

    /// Base-encoded ragged array with one row per string.
    pub fn from_text_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let mut lengths = Vec::with_capacity(rows.len());
        let mut data = Vec::new();
        for row in rows {
            let before = data.len();
            data.extend(row.as_ref().chars().map(|c| c as u64));
            lengths.push(data.len() - before);
        }

        EncodedRaggedArray {
            data: EncodedArray::new(data, BASE_ENCODING),
            shape: RaggedShape::new(lengths),
        }
    }

    pub fn encoding(&self) -> &SequenceEncoding {
        self.data.encoding()
    }

    /// The flat encoded buffer backing all rows.
    pub fn ravel(&self) -> &EncodedArray {
        &self.data
    }

    pub fn shape(&self) -> &RaggedShape {
        &self.shape
    }

    /// Drop the encoding and keep the raw codes with their shape.
    pub fn raw(&self) -> RaggedArray {
        RaggedArray::from_rows(&self.rows().collect::<Vec<_>>())
    }

    pub fn row(&self, row: usize) -> Option<EncodedArray> {
        self.shape
            .row_range(row)
            .map(|range| EncodedArray::new(self.data.raw()[range].to_vec(), *self.encoding()))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u64]> + '_ {
        self.shape.row_ranges().map(|range| &self.data.raw()[range])
    }

    pub fn len(&self) -> usize {
        self.shape.n_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.shape.n_rows() == 0
    }
}
