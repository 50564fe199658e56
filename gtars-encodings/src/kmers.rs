//!
//! K-mer encoding: every window of `k` symbols is mapped to one integer,
//! `code = s[0]·B^(k-1) + s[1]·B^(k-2) + ... + s[k-1]`, where `B` is the size of
//! the base alphabet. Codes are dense in `[0, B^k)` and can be inverted exactly.
//!
use std::borrow::Cow;
use std::fmt::{self, Display};

use rand::Rng;
use tracing::debug;

use super::encoded_array::{EncodedArray, EncodedRaggedArray};
use super::encoding::{Encoding, SequenceEncoding};
use super::error::{EncodingError, Result};
use super::ragged::{RaggedArray, RaggedShape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KmerEncoding {
    k: usize,
    alphabet: SequenceEncoding,
    alphabet_size: u64,
    modulus: u64, // alphabet_size^k
}

impl KmerEncoding {
    ///
    /// Create a k-mer encoding over a finite alphabet.
    ///
    /// # Arguments:
    /// - `k`: window size, must be positive
    /// - `alphabet`: encoding of the symbols; must have a finite alphabet size
    ///   and `alphabet_size^k` must fit in 64 bits
    ///
    pub fn new(k: usize, alphabet: impl Into<SequenceEncoding>) -> Result<Self> {
        let alphabet = alphabet.into();
        if k == 0 {
            return Err(EncodingError::Configuration(
                "k-mer size must be positive".to_string(),
            ));
        }

        let alphabet_size = alphabet.alphabet_size().ok_or_else(|| {
            EncodingError::Configuration(format!(
                "{alphabet} has no finite alphabet size and cannot be used for k-mers"
            ))
        })?;
        if alphabet_size == 0 {
            return Err(EncodingError::Configuration(format!(
                "{alphabet} has an empty alphabet"
            )));
        }

        let modulus = u32::try_from(k)
            .ok()
            .and_then(|exp| alphabet_size.checked_pow(exp))
            .ok_or_else(|| {
                EncodingError::Configuration(format!(
                    "{alphabet_size}^{k} k-mers do not fit in 64-bit codes"
                ))
            })?;

        debug!(k, %alphabet, modulus, "created k-mer encoding");

        Ok(KmerEncoding {
            k,
            alphabet,
            alphabet_size,
            modulus,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn alphabet(&self) -> &SequenceEncoding {
        &self.alphabet
    }

    /// Number of distinct k-mers, `alphabet_size^k`.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    ///
    /// Draw `n` random k-mers from the alphabet, one k-mer per row.
    ///
    pub fn sample_domain(&self, n: usize) -> EncodedRaggedArray {
        self.sample_domain_with_rng(n, &mut rand::rng())
    }

    pub fn sample_domain_with_rng<R: Rng>(&self, n: usize, rng: &mut R) -> EncodedRaggedArray {
        let kmers: Vec<Vec<u64>> = (0..n)
            .map(|_| {
                (0..self.k)
                    .map(|_| rng.random_range(0..self.alphabet_size))
                    .collect()
            })
            .collect();
        EncodedRaggedArray::from_ragged(RaggedArray::from_rows(&kmers), self.alphabet)
    }

    ///
    /// Encode a single k-mer given as alphabet codes.
    ///
    pub fn encode(&self, kmer: &[u64]) -> Result<u64> {
        if kmer.len() != self.k {
            return Err(EncodingError::InvalidKmerLength {
                expected: self.k,
                found: kmer.len(),
            });
        }

        kmer.iter().try_fold(0u64, |code, &symbol| {
            Ok(code * self.alphabet_size + self.check_symbol(symbol)?)
        })
    }

    ///
    /// Encode every row of a ragged array. Every row must hold exactly `k`
    /// symbols.
    ///
    pub fn encode_kmers(&self, kmers: &EncodedRaggedArray) -> Result<Vec<u64>> {
        let symbols = self.alphabet_codes(kmers)?;
        kmers
            .shape()
            .row_ranges()
            .map(|range| self.encode(&symbols[range]))
            .collect()
    }

    ///
    /// Reconstruct the `k` alphabet codes of a k-mer code.
    ///
    pub fn inverse(&self, code: u64) -> Result<EncodedArray> {
        let mut symbols = vec![0; self.k];
        self.inverse_into(code, &mut symbols)?;
        Ok(EncodedArray::new(symbols, self.alphabet))
    }

    /// Inverse of many codes at once, one row of `k` symbols per code.
    pub fn inverse_many(&self, codes: &[u64]) -> Result<EncodedRaggedArray> {
        let symbols = self.decode_codes(codes)?;
        EncodedRaggedArray::new(
            EncodedArray::new(symbols, self.alphabet),
            RaggedShape::uniform(codes.len(), self.k),
        )
    }

    ///
    /// Code of every k-mer in every row of `sequences`.
    ///
    /// Windows never span two rows. A row of length `L` yields
    /// `max(L - k + 1, 0)` codes, so rows shorter than `k` yield none.
    /// Sequences may be in the alphabet encoding or base encoded.
    ///
    pub fn rolling_window(&self, sequences: &EncodedRaggedArray) -> Result<RaggedArray> {
        let symbols = self.alphabet_codes(sequences)?;
        let shape = RaggedShape::new(
            sequences
                .shape()
                .lengths()
                .iter()
                .map(|&length| length.saturating_sub(self.k - 1))
                .collect(),
        );

        debug!(
            rows = shape.n_rows(),
            kmers = shape.size(),
            k = self.k,
            "computing rolling k-mer codes"
        );

        let mut codes = Vec::with_capacity(shape.size());
        for range in sequences.shape().row_ranges() {
            self.roll_row(&symbols[range], &mut codes)?;
        }

        RaggedArray::new(codes, shape)
    }

    fn roll_row(&self, row: &[u64], codes: &mut Vec<u64>) -> Result<()> {
        if row.len() < self.k {
            return Ok(());
        }

        // weight of the symbol leaving the window
        let leading = self.modulus / self.alphabet_size;
        let mut code = self.encode(&row[..self.k])?;
        codes.push(code);
        for &symbol in &row[self.k..] {
            code = (code % leading) * self.alphabet_size + self.check_symbol(symbol)?;
            codes.push(code);
        }
        Ok(())
    }

    fn inverse_into(&self, mut code: u64, symbols: &mut [u64]) -> Result<()> {
        if code >= self.modulus {
            return Err(EncodingError::InvalidCode {
                code,
                encoding: self.to_string(),
            });
        }

        for symbol in symbols.iter_mut().rev() {
            *symbol = code % self.alphabet_size;
            code /= self.alphabet_size;
        }
        Ok(())
    }

    fn check_symbol(&self, symbol: u64) -> Result<u64> {
        if symbol >= self.alphabet_size {
            return Err(EncodingError::InvalidCode {
                code: symbol,
                encoding: self.alphabet.to_string(),
            });
        }
        Ok(symbol)
    }

    /// Row data in alphabet codes; base-encoded rows are encoded first.
    fn alphabet_codes<'a>(&self, sequences: &'a EncodedRaggedArray) -> Result<Cow<'a, [u64]>> {
        let encoding = sequences.encoding();
        if *encoding == self.alphabet {
            Ok(Cow::Borrowed(sequences.ravel().raw()))
        } else if encoding.is_base_encoding() {
            Ok(Cow::Owned(
                self.alphabet.encode_codes(sequences.ravel().raw())?,
            ))
        } else {
            Err(EncodingError::Conversion {
                from: encoding.to_string(),
                to: self.alphabet.to_string(),
            })
        }
    }
}

impl Display for KmerEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KmerEncoding({}, {})", self.k, self.alphabet)
    }
}

impl Encoding for KmerEncoding {
    /// Consecutive groups of `k` alphabet codes become one k-mer code.
    fn encode_codes(&self, codes: &[u64]) -> Result<Vec<u64>> {
        let chunks = codes.chunks_exact(self.k);
        if !chunks.remainder().is_empty() {
            return Err(EncodingError::InvalidKmerLength {
                expected: self.k,
                found: chunks.remainder().len(),
            });
        }
        chunks.map(|kmer| self.encode(kmer)).collect()
    }

    fn decode_codes(&self, codes: &[u64]) -> Result<Vec<u64>> {
        let mut symbols = vec![0; codes.len() * self.k];
        for (&code, kmer) in codes.iter().zip(symbols.chunks_exact_mut(self.k)) {
            self.inverse_into(code, kmer)?;
        }
        Ok(symbols)
    }

    fn is_numeric(&self) -> bool {
        true
    }

    fn alphabet_size(&self) -> Option<u64> {
        Some(self.modulus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::AlphabetType;
    use crate::encoding::{
        BASE_ENCODING, DNA_ENCODING, DNA_N_ENCODING, PROTEIN_ENCODING, RNA_ENCODING,
    };

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dna_3mers() -> KmerEncoding {
        KmerEncoding::new(3, DNA_ENCODING).unwrap()
    }

    /// Encode every window independently, without rolling.
    fn naive_windows(encoding: &KmerEncoding, row: &[u64]) -> Vec<u64> {
        if row.len() < encoding.k() {
            return vec![];
        }
        row.windows(encoding.k())
            .map(|window| encoding.encode(window).unwrap())
            .collect()
    }

    #[rstest]
    fn test_encode_weighted_sum(dna_3mers: KmerEncoding) {
        assert_eq!(dna_3mers.encode(&[2, 1, 0]).unwrap(), 2 * 16 + 4);
        assert_eq!(dna_3mers.encode(&[0, 0, 0]).unwrap(), 0);
        assert_eq!(dna_3mers.encode(&[3, 3, 3]).unwrap(), 63);
        assert_eq!(dna_3mers.modulus(), 64);
    }

    #[rstest]
    fn test_inverse(dna_3mers: KmerEncoding) {
        let kmer = dna_3mers.inverse(36).unwrap();
        assert_eq!(kmer.raw(), &[2, 1, 0]);
        assert_eq!(*kmer.encoding(), DNA_ENCODING);
        assert_eq!(kmer.to_string(), "GCA");
    }

    #[rstest]
    fn test_inverse_rejects_out_of_range(dna_3mers: KmerEncoding) {
        let result = dna_3mers.inverse(64);
        assert!(matches!(result, Err(EncodingError::InvalidCode { code: 64, .. })));
    }

    #[rstest]
    fn test_encode_rejects_wrong_length_and_symbols(dna_3mers: KmerEncoding) {
        assert!(matches!(
            dna_3mers.encode(&[0, 1]),
            Err(EncodingError::InvalidKmerLength {
                expected: 3,
                found: 2
            })
        ));
        assert!(matches!(
            dna_3mers.encode(&[0, 1, 4]),
            Err(EncodingError::InvalidCode { code: 4, .. })
        ));
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(7)]
    #[case(31)]
    fn test_sampled_kmers_round_trip(#[case] k: usize) {
        let encoding = KmerEncoding::new(k, DNA_ENCODING).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let kmers = encoding.sample_domain_with_rng(100, &mut rng);
        assert_eq!(kmers.len(), 100);
        assert!(kmers.rows().all(|row| row.len() == k));

        let codes = encoding.encode_kmers(&kmers).unwrap();
        let decoded = encoding.inverse_many(&codes).unwrap();
        assert_eq!(decoded, kmers);
    }

    #[rstest]
    fn test_sample_domain_stays_in_alphabet() {
        let encoding = KmerEncoding::new(5, PROTEIN_ENCODING).unwrap();
        let kmers = encoding.sample_domain(50);
        assert_eq!(*kmers.encoding(), PROTEIN_ENCODING);
        assert!(kmers.ravel().raw().iter().all(|&symbol| symbol < 20));
    }

    #[rstest]
    fn test_rolling_window_shape(dna_3mers: KmerEncoding) {
        let lengths: Vec<usize> = (3..10).collect();
        let total: usize = lengths.iter().sum();
        let data = (0..total as u64).map(|i| i % 4).collect();
        let sequences = EncodedRaggedArray::new(EncodedArray::new(data, DNA_ENCODING), lengths)
            .unwrap();

        let codes = dna_3mers.rolling_window(&sequences).unwrap();
        assert_eq!(codes.shape().lengths(), &[1, 2, 3, 4, 5, 6, 7]);
    }

    #[rstest]
    fn test_rolling_window_short_rows_yield_nothing(dna_3mers: KmerEncoding) {
        let sequences = EncodedRaggedArray::new(
            EncodedArray::new(vec![0, 1, 2, 3, 0, 1], DNA_ENCODING),
            vec![0, 1, 2, 3],
        )
        .unwrap();

        let codes = dna_3mers.rolling_window(&sequences).unwrap();
        assert_eq!(codes.shape().lengths(), &[0, 0, 0, 1]);
        assert_eq!(codes.ravel(), &[dna_3mers.encode(&[3, 0, 1]).unwrap()]);
    }

    #[rstest]
    #[case(DNA_ENCODING, 3)]
    #[case(PROTEIN_ENCODING, 5)]
    #[case(DNA_N_ENCODING, 1)]
    #[case(DNA_N_ENCODING, 4)]
    #[case(DNA_ENCODING, 31)]
    fn test_rolling_window_matches_independent_windows(
        #[case] alphabet: SequenceEncoding,
        #[case] k: usize,
    ) {
        let encoding = KmerEncoding::new(k, alphabet).unwrap();
        let size = alphabet.alphabet_size().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let rows: Vec<Vec<u64>> = (0..40)
            .map(|length| (0..length).map(|_| rng.random_range(0..size)).collect())
            .collect();
        let sequences = EncodedRaggedArray::from_ragged(RaggedArray::from_rows(&rows), alphabet);

        let codes = encoding.rolling_window(&sequences).unwrap();
        assert_eq!(codes.shape().size(), codes.ravel().len());
        for (row, rolled) in rows.iter().zip(codes.rows()) {
            assert_eq!(rolled, naive_windows(&encoding, row).as_slice());
        }
    }

    #[rstest]
    fn test_rolling_window_accepts_base_encoded_rows(dna_3mers: KmerEncoding) {
        let sequences = EncodedRaggedArray::from_text_rows(&["GCAT", "ac"]);
        let codes = dna_3mers.rolling_window(&sequences).unwrap();
        assert_eq!(codes.shape().lengths(), &[2, 0]);
        assert_eq!(codes.ravel(), &[36, dna_3mers.encode(&[1, 0, 3]).unwrap()]);
    }

    #[rstest]
    fn test_rolling_window_rejects_other_encodings(dna_3mers: KmerEncoding) {
        let sequences =
            EncodedRaggedArray::new(EncodedArray::new(vec![0, 1, 2], RNA_ENCODING), vec![3])
                .unwrap();
        let result = dna_3mers.rolling_window(&sequences);
        assert!(matches!(result, Err(EncodingError::Conversion { .. })));
    }

    #[rstest]
    fn test_invalid_configurations() {
        assert!(matches!(
            KmerEncoding::new(0, DNA_ENCODING),
            Err(EncodingError::Configuration(_))
        ));
        assert!(matches!(
            KmerEncoding::new(3, BASE_ENCODING),
            Err(EncodingError::Configuration(_))
        ));
        // 4^32 overflows 64 bits
        assert!(matches!(
            KmerEncoding::new(32, DNA_ENCODING),
            Err(EncodingError::Configuration(_))
        ));
        assert!(KmerEncoding::new(31, AlphabetType::Dna).is_ok());
    }

    #[rstest]
    fn test_flat_encoding_primitives(dna_3mers: KmerEncoding) {
        let codes = dna_3mers.encode_codes(&[2, 1, 0, 3, 3, 3]).unwrap();
        assert_eq!(codes, vec![36, 63]);
        assert_eq!(
            dna_3mers.decode_codes(&codes).unwrap(),
            vec![2, 1, 0, 3, 3, 3]
        );
        assert!(matches!(
            dna_3mers.encode_codes(&[0, 1, 2, 3]),
            Err(EncodingError::InvalidKmerLength {
                expected: 3,
                found: 1
            })
        ));
        assert!(dna_3mers.is_numeric());
        assert!(!dna_3mers.is_one_to_one_encoding());
        assert_eq!(dna_3mers.alphabet_size(), Some(64));
    }

    #[rstest]
    fn test_structural_equality() {
        assert_eq!(
            KmerEncoding::new(4, DNA_ENCODING).unwrap(),
            KmerEncoding::new(4, AlphabetType::Dna).unwrap()
        );
        assert_ne!(
            KmerEncoding::new(4, DNA_ENCODING).unwrap(),
            KmerEncoding::new(5, DNA_ENCODING).unwrap()
        );
    }
}
