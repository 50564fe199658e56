//!
//! Conversion of arbitrary sequence data into (and out of) a one-to-one encoding.
//!
//! Inputs come in many shapes: plain text, lists of strings, lists of encoded
//! arrays, ragged containers, flat code buffers and single codes. They are
//! modelled by [SequenceData] and routed by [OneToOneEncoding::encode] and
//! [OneToOneEncoding::decode].
//!
//! Conversions between two different non-base encodings are never done
//! directly: data has to be decoded back to the base encoding first.
//!
use tracing::{debug, trace};

use super::encoded_array::{EncodedArray, EncodedRaggedArray};
use super::encoding::{
    AlphabetEncoding, BASE_ENCODING, BaseEncoding, Encoding, QualityEncoding, SequenceEncoding,
};
use super::error::{EncodingError, Result};
use super::ragged::{RaggedArray, RaggedShape};

///
/// Every shape of data the encoders know how to handle.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceData {
    /// A single sequence as text.
    Text(String),
    /// Several sequences as text.
    TextRows(Vec<String>),
    /// Several sequences that are already encoded.
    EncodedRows(Vec<EncodedArray>),
    /// Raw codes of several sequences.
    Ragged(RaggedArray),
    EncodedRagged(EncodedRaggedArray),
    /// Raw codes of a single sequence.
    Flat(Vec<u64>),
    Encoded(EncodedArray),
    Scalar(u64),
}

impl SequenceData {
    /// Short name of the data shape, used in log and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SequenceData::Text(_) => "text",
            SequenceData::TextRows(_) => "list of text",
            SequenceData::EncodedRows(_) => "list of encoded arrays",
            SequenceData::Ragged(_) => "ragged array",
            SequenceData::EncodedRagged(_) => "encoded ragged array",
            SequenceData::Flat(_) => "flat buffer",
            SequenceData::Encoded(_) => "encoded array",
            SequenceData::Scalar(_) => "scalar",
        }
    }

    /// Encoding carried by already-encoded data.
    pub fn encoding(&self) -> Option<&SequenceEncoding> {
        match self {
            SequenceData::Encoded(array) => Some(array.encoding()),
            SequenceData::EncodedRagged(ragged) => Some(ragged.encoding()),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            SequenceData::Text(text) => format!("text of length {}", text.chars().count()),
            SequenceData::TextRows(rows) => format!("list of {} strings", rows.len()),
            SequenceData::EncodedRows(rows) => format!("list of {} encoded arrays", rows.len()),
            SequenceData::Ragged(ragged) => format!("ragged array with {} rows", ragged.len()),
            SequenceData::EncodedRagged(ragged) => format!(
                "ragged array with {} rows encoded with {}",
                ragged.len(),
                ragged.encoding()
            ),
            SequenceData::Flat(codes) => format!("flat buffer of {} codes", codes.len()),
            SequenceData::Encoded(array) => format!(
                "array of {} codes encoded with {}",
                array.len(),
                array.encoding()
            ),
            SequenceData::Scalar(code) => format!("scalar {code}"),
        }
    }

    pub fn into_encoded(self) -> Option<EncodedArray> {
        match self {
            SequenceData::Encoded(array) => Some(array),
            _ => None,
        }
    }

    pub fn into_encoded_ragged(self) -> Option<EncodedRaggedArray> {
        match self {
            SequenceData::EncodedRagged(ragged) => Some(ragged),
            _ => None,
        }
    }

    pub fn into_flat(self) -> Option<Vec<u64>> {
        match self {
            SequenceData::Flat(codes) => Some(codes),
            _ => None,
        }
    }

    pub fn into_ragged(self) -> Option<RaggedArray> {
        match self {
            SequenceData::Ragged(ragged) => Some(ragged),
            _ => None,
        }
    }
}

impl From<&str> for SequenceData {
    fn from(text: &str) -> Self {
        SequenceData::Text(text.to_string())
    }
}

impl From<String> for SequenceData {
    fn from(text: String) -> Self {
        SequenceData::Text(text)
    }
}

impl From<Vec<&str>> for SequenceData {
    fn from(rows: Vec<&str>) -> Self {
        SequenceData::TextRows(rows.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for SequenceData {
    fn from(rows: Vec<String>) -> Self {
        SequenceData::TextRows(rows)
    }
}

impl From<Vec<EncodedArray>> for SequenceData {
    fn from(rows: Vec<EncodedArray>) -> Self {
        SequenceData::EncodedRows(rows)
    }
}

impl From<RaggedArray> for SequenceData {
    fn from(ragged: RaggedArray) -> Self {
        SequenceData::Ragged(ragged)
    }
}

impl From<EncodedRaggedArray> for SequenceData {
    fn from(ragged: EncodedRaggedArray) -> Self {
        SequenceData::EncodedRagged(ragged)
    }
}

impl From<Vec<u64>> for SequenceData {
    fn from(codes: Vec<u64>) -> Self {
        SequenceData::Flat(codes)
    }
}

impl From<EncodedArray> for SequenceData {
    fn from(array: EncodedArray) -> Self {
        SequenceData::Encoded(array)
    }
}

impl From<u64> for SequenceData {
    fn from(code: u64) -> Self {
        SequenceData::Scalar(code)
    }
}

///
/// An encoding with an invertible symbol-level mapping. Provides the shape
/// dispatch on top of the flat [Encoding] primitives.
///
pub trait OneToOneEncoding: Encoding {
    /// The tag attached to arrays produced by this encoding.
    fn sequence_encoding(&self) -> SequenceEncoding;

    ///
    /// Encode sequence data of any supported shape.
    ///
    /// Data that is already encoded can only be re-encoded if it is base encoded.
    ///
    /// # Arguments:
    /// - `data`: the data to encode
    /// # Returns:
    /// - encoded data; raw codes for numeric encodings, encoded arrays otherwise
    ///
    fn encode(&self, data: SequenceData) -> Result<SequenceData> {
        if let Some(encoding) = data.encoding() {
            if !encoding.is_base_encoding() {
                return Err(EncodingError::PreconditionViolation(format!(
                    "data is already encoded with {encoding}; can only re-encode base-encoded data"
                )));
            }
        }

        trace!(kind = data.kind(), encoding = %self, "encoding sequence data");

        match data {
            SequenceData::Text(text) => encode_base_encoded(self, EncodedArray::from_text(&text)),
            SequenceData::EncodedRows(rows) if !rows.is_empty() => encode_encoded_rows(self, &rows),
            SequenceData::EncodedRows(_) => encode_text_rows::<_, String>(self, &[]),
            SequenceData::TextRows(rows) => encode_text_rows(self, &rows),
            SequenceData::Ragged(ragged) => encode_ragged(self, ragged.ravel(), ragged.shape()),
            SequenceData::EncodedRagged(ragged) => {
                encode_ragged(self, ragged.ravel().raw(), ragged.shape())
            }
            SequenceData::Flat(codes) => Ok(wrap(self, self.encode_codes(&codes)?)),
            SequenceData::Encoded(array) => self.convert(array),
            scalar @ SequenceData::Scalar(_) => Err(EncodingError::UnsupportedType {
                data: scalar.describe(),
                encoding: self.to_string(),
            }),
        }
    }

    ///
    /// Decode data produced by this encoding back to the base encoding.
    ///
    /// A scalar code decodes to a length-1 array. Raw code buffers can only be
    /// decoded by numeric encodings. Encoded arrays must carry this encoding;
    /// base-encoded arrays are returned as they are.
    ///
    fn decode(&self, data: SequenceData) -> Result<SequenceData> {
        trace!(kind = data.kind(), encoding = %self, "decoding sequence data");

        if let Some(encoding) = data.encoding() {
            let target = self.sequence_encoding();
            if *encoding != target {
                if encoding.is_base_encoding() {
                    return Ok(data);
                }
                return Err(EncodingError::Conversion {
                    from: encoding.to_string(),
                    to: target.to_string(),
                });
            }
        }

        match data {
            SequenceData::Scalar(code) => Ok(SequenceData::Encoded(EncodedArray::new(
                self.decode_codes(&[code])?,
                BASE_ENCODING,
            ))),
            SequenceData::Flat(codes) if self.is_numeric() => Ok(SequenceData::Encoded(
                EncodedArray::new(self.decode_codes(&codes)?, BASE_ENCODING),
            )),
            SequenceData::Ragged(ragged) if self.is_numeric() => {
                decode_ragged(self, ragged.ravel(), ragged.shape())
            }
            SequenceData::EncodedRagged(ragged) => {
                decode_ragged(self, ragged.ravel().raw(), ragged.shape())
            }
            SequenceData::Encoded(array) => Ok(SequenceData::Encoded(EncodedArray::new(
                self.decode_codes(array.raw())?,
                BASE_ENCODING,
            ))),
            other => Err(EncodingError::UnsupportedType {
                data: other.describe(),
                encoding: self.to_string(),
            }),
        }
    }

    ///
    /// Convert an encoded array into this encoding.
    ///
    /// The array must be base encoded, already in this encoding, or this
    /// encoding must be the base encoding. Anything else has to be decoded
    /// to base first.
    ///
    fn convert(&self, array: EncodedArray) -> Result<SequenceData> {
        let target = self.sequence_encoding();
        if *array.encoding() == target {
            return Ok(SequenceData::Encoded(array));
        }

        if array.encoding().is_base_encoding() {
            return encode_base_encoded(self, array);
        }

        if self.is_base_encoding() {
            debug!(from = %array.encoding(), "decoding encoded array back to base");
            let decoded = array.encoding().decode_codes(array.raw())?;
            return Ok(SequenceData::Encoded(EncodedArray::new(decoded, BASE_ENCODING)));
        }

        Err(EncodingError::Conversion {
            from: array.encoding().to_string(),
            to: target.to_string(),
        })
    }
}

impl OneToOneEncoding for SequenceEncoding {
    fn sequence_encoding(&self) -> SequenceEncoding {
        *self
    }
}

impl OneToOneEncoding for BaseEncoding {
    fn sequence_encoding(&self) -> SequenceEncoding {
        BASE_ENCODING
    }
}

impl OneToOneEncoding for AlphabetEncoding {
    fn sequence_encoding(&self) -> SequenceEncoding {
        SequenceEncoding::Alphabet(*self)
    }
}

impl OneToOneEncoding for QualityEncoding {
    fn sequence_encoding(&self) -> SequenceEncoding {
        SequenceEncoding::Quality(*self)
    }
}

///
/// Bring `data` into `target`. Encoded arrays go through
/// [OneToOneEncoding::convert], so an array in another non-base encoding is
/// reported as a conversion error rather than a precondition violation.
///
pub fn as_encoded_array<E: OneToOneEncoding + ?Sized>(
    data: impl Into<SequenceData>,
    target: &E,
) -> Result<SequenceData> {
    match data.into() {
        SequenceData::Encoded(array) => target.convert(array),
        other => target.encode(other),
    }
}

fn wrap<E: OneToOneEncoding + ?Sized>(encoding: &E, codes: Vec<u64>) -> SequenceData {
    if encoding.is_numeric() {
        SequenceData::Flat(codes)
    } else {
        SequenceData::Encoded(EncodedArray::new(codes, encoding.sequence_encoding()))
    }
}

fn encode_base_encoded<E: OneToOneEncoding + ?Sized>(
    encoding: &E,
    array: EncodedArray,
) -> Result<SequenceData> {
    if !array.encoding().is_base_encoding() {
        return Err(EncodingError::PreconditionViolation(format!(
            "expected base-encoded data, found data encoded with {}",
            array.encoding()
        )));
    }
    Ok(wrap(encoding, encoding.encode_codes(array.raw())?))
}

fn encode_ragged<E: OneToOneEncoding + ?Sized>(
    encoding: &E,
    codes: &[u64],
    shape: &RaggedShape,
) -> Result<SequenceData> {
    let encoded = encoding.encode_codes(codes)?;
    if encoding.is_numeric() {
        return Ok(SequenceData::Ragged(RaggedArray::new(encoded, shape.clone())?));
    }

    let array = EncodedArray::new(encoded, encoding.sequence_encoding());
    Ok(SequenceData::EncodedRagged(EncodedRaggedArray::new(
        array,
        shape.clone(),
    )?))
}

fn encode_text_rows<E: OneToOneEncoding + ?Sized, S: AsRef<str>>(
    encoding: &E,
    rows: &[S],
) -> Result<SequenceData> {
    let ragged = EncodedRaggedArray::from_text_rows(rows);
    encode_ragged(encoding, ragged.ravel().raw(), ragged.shape())
}

fn encode_encoded_rows<E: OneToOneEncoding + ?Sized>(
    encoding: &E,
    rows: &[EncodedArray],
) -> Result<SequenceData> {
    let ragged = EncodedRaggedArray::from_rows(rows)?;
    let target = encoding.sequence_encoding();

    if *ragged.encoding() == target {
        if encoding.is_numeric() {
            return Ok(SequenceData::Ragged(ragged.raw()));
        }
        return Ok(SequenceData::EncodedRagged(ragged));
    }
    if ragged.encoding().is_base_encoding() {
        return encode_ragged(encoding, ragged.ravel().raw(), ragged.shape());
    }

    Err(EncodingError::Conversion {
        from: ragged.encoding().to_string(),
        to: target.to_string(),
    })
}

fn decode_ragged<E: OneToOneEncoding + ?Sized>(
    encoding: &E,
    codes: &[u64],
    shape: &RaggedShape,
) -> Result<SequenceData> {
    let decoded = EncodedArray::new(encoding.decode_codes(codes)?, BASE_ENCODING);
    Ok(SequenceData::EncodedRagged(EncodedRaggedArray::new(
        decoded,
        shape.clone(),
    )?))
}
