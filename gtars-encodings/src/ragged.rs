//!
//! Minimal ragged containers: rows of different lengths stored back to back
//! in one flat buffer, plus a [RaggedShape] describing where each row starts.
//!
use std::ops::Range;

use super::error::{EncodingError, Result};

///
/// Row lengths of a ragged container, with precomputed row offsets.
///
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RaggedShape {
    lengths: Vec<usize>,
    starts: Vec<usize>,
    size: usize,
}

impl RaggedShape {
    pub fn new(lengths: Vec<usize>) -> Self {
        let mut starts = Vec::with_capacity(lengths.len());
        let mut size = 0;
        for &length in &lengths {
            starts.push(size);
            size += length;
        }

        RaggedShape {
            lengths,
            starts,
            size,
        }
    }

    /// A shape of `n_rows` rows that all have the same length.
    pub fn uniform(n_rows: usize, length: usize) -> Self {
        RaggedShape::new(vec![length; n_rows])
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    pub fn ends(&self) -> Vec<usize> {
        self.starts
            .iter()
            .zip(&self.lengths)
            .map(|(start, length)| start + length)
            .collect()
    }

    pub fn n_rows(&self) -> usize {
        self.lengths.len()
    }

    /// Total number of elements over all rows.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn row_range(&self, row: usize) -> Option<Range<usize>> {
        let start = *self.starts.get(row)?;
        Some(start..start + self.lengths[row])
    }

    pub fn row_ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.starts
            .iter()
            .zip(&self.lengths)
            .map(|(&start, &length)| start..start + length)
    }
}

impl From<Vec<usize>> for RaggedShape {
    fn from(lengths: Vec<usize>) -> Self {
        RaggedShape::new(lengths)
    }
}

///
/// A ragged collection of raw numeric codes.
///
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RaggedArray {
    data: Vec<u64>,
    shape: RaggedShape,
}

impl RaggedArray {
    ///
    /// Create a ragged array from a flat buffer and a shape.
    ///
    /// # Arguments:
    /// - `data`: all rows concatenated
    /// - `shape`: the row lengths; they must sum to `data.len()`
    ///
    pub fn new(data: Vec<u64>, shape: impl Into<RaggedShape>) -> Result<Self> {
        let shape = shape.into();
        check_shape(&shape, data.len())?;
        Ok(RaggedArray { data, shape })
    }

    pub fn from_rows<R: AsRef<[u64]>>(rows: &[R]) -> Self {
        let lengths = rows.iter().map(|row| row.as_ref().len()).collect();
        let data = rows.iter().flat_map(|row| row.as_ref()).copied().collect();
        RaggedArray {
            data,
            shape: RaggedShape::new(lengths),
        }
    }

    /// The flat buffer backing all rows.
    pub fn ravel(&self) -> &[u64] {
        &self.data
    }

    pub fn into_raveled(self) -> Vec<u64> {
        self.data
    }

    pub fn shape(&self) -> &RaggedShape {
        &self.shape
    }

    pub fn row(&self, row: usize) -> Option<&[u64]> {
        self.shape.row_range(row).map(|range| &self.data[range])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u64]> + '_ {
        self.shape.row_ranges().map(|range| &self.data[range])
    }

    pub fn len(&self) -> usize {
        self.shape.n_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.shape.n_rows() == 0
    }
}

pub(crate) fn check_shape(shape: &RaggedShape, data_len: usize) -> Result<()> {
    if shape.size() != data_len {
        return Err(EncodingError::ShapeMismatch {
            expected: shape.size(),
            found: data_len,
        });
    }
    Ok(())
}
