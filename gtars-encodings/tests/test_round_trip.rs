//! Integration tests for the encode → decode and k-mer workflows through the
//! public API.
//!
//! Edge cases of the individual encodings are covered by the unit tests next
//! to each module.

use gtars_encodings::{
    BASE_ENCODING, DNA_ENCODING, DNA_N_ENCODING, EncodedArray, EncodedRaggedArray, EncodingError,
    KmerConfig, KmerEncoding, OneToOneEncoding, PROTEIN_ENCODING, QualityEncoding, RNA_ENCODING,
    SequenceData, SequenceEncoding, as_encoded_array,
};

use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(DNA_ENCODING, "ACGTTGCA")]
#[case(RNA_ENCODING, "ACGUUGCA")]
#[case(DNA_N_ENCODING, "ACGTNNNA")]
#[case(PROTEIN_ENCODING, "MKTAYIAKQR")]
#[case(BASE_ENCODING, "any text at all")]
#[case(SequenceEncoding::from(QualityEncoding::PHRED33), "II?5+!")]
fn test_text_round_trip(#[case] encoding: SequenceEncoding, #[case] text: &str) {
    let encoded = encoding.encode(text.into()).unwrap();
    let decoded = encoding.decode(encoded).unwrap();
    assert_eq!(decoded, SequenceData::Encoded(EncodedArray::from_text(text)));
}

#[rstest]
#[case(DNA_ENCODING, vec!["ACGT", "", "GGGTTTAAACCC"])]
#[case(PROTEIN_ENCODING, vec!["MK", "TAYIAKQR"])]
#[case(SequenceEncoding::from(QualityEncoding::PHRED64), vec!["hhh", "@", "J"])]
fn test_text_rows_round_trip(#[case] encoding: SequenceEncoding, #[case] rows: Vec<&str>) {
    let encoded = encoding.encode(rows.clone().into()).unwrap();
    let decoded = encoding.decode(encoded).unwrap();
    assert_eq!(
        decoded,
        SequenceData::EncodedRagged(EncodedRaggedArray::from_text_rows(&rows))
    );
}

#[test]
fn test_quality_scores_stay_numeric() {
    // Phred+33: '5' = 20, 'I' = 40
    let encoded = QualityEncoding::PHRED33
        .encode(vec!["55I", "I"].into())
        .unwrap()
        .into_ragged()
        .expect("numeric encodings return raw ragged arrays");
    assert_eq!(encoded.ravel(), &[20, 20, 40, 40]);
    assert_eq!(encoded.shape().lengths(), &[3, 1]);
}

#[test]
fn test_decode_back_to_base_then_re_encode() {
    // data in one alphabet can reach another alphabet only through base
    let dna = as_encoded_array("ACGA", &DNA_ENCODING)
        .unwrap()
        .into_encoded()
        .unwrap();

    let direct = as_encoded_array(dna.clone(), &RNA_ENCODING);
    assert!(matches!(direct, Err(EncodingError::Conversion { .. })));

    let base = as_encoded_array(dna, &BASE_ENCODING).unwrap();
    let rna = as_encoded_array(base, &RNA_ENCODING)
        .unwrap()
        .into_encoded()
        .unwrap();
    assert_eq!(rna.raw(), &[0, 1, 2, 0]);
    assert_eq!(rna.to_string(), "ACGA");
}

#[test]
fn test_encoding_twice_is_rejected() {
    let once = DNA_ENCODING.encode("ACGT".into()).unwrap();
    let twice = DNA_ENCODING.encode(once);
    assert!(matches!(twice, Err(EncodingError::PreconditionViolation(_))));
}

#[test]
fn test_kmer_workflow_from_text() {
    let sequences = DNA_ENCODING
        .encode(vec!["ACG", "ACGT", "ACGTA", "AC"].into())
        .unwrap()
        .into_encoded_ragged()
        .unwrap();

    let kmers = KmerEncoding::new(3, DNA_ENCODING).unwrap();
    let codes = kmers.rolling_window(&sequences).unwrap();
    assert_eq!(codes.shape().lengths(), &[1, 2, 3, 0]);

    // every rolled code decodes to the window it came from
    for (row, row_codes) in sequences.rows().zip(codes.rows()) {
        for (offset, &code) in row_codes.iter().enumerate() {
            let kmer = kmers.inverse(code).unwrap();
            assert_eq!(kmer.raw(), &row[offset..offset + 3]);
        }
    }
}

#[test]
fn test_kmer_scenario_from_configuration() {
    let config: KmerConfig = "k = 3\nalphabet = \"dna\"".parse().unwrap();
    let kmers = config.build().unwrap();

    assert_eq!(kmers.encode(&[2, 1, 0]).unwrap(), 36);
    assert_eq!(kmers.inverse(36).unwrap().raw(), &[2, 1, 0]);

    let lengths: Vec<usize> = (3..10).collect();
    let total: usize = lengths.iter().sum();
    let data = (0..total as u64).map(|i| i % 4).collect();
    let sequences =
        EncodedRaggedArray::new(EncodedArray::new(data, DNA_ENCODING), lengths.clone()).unwrap();

    let codes = kmers.rolling_window(&sequences).unwrap();
    let expected: Vec<usize> = lengths.iter().map(|length| length - 3 + 1).collect();
    assert_eq!(codes.shape().lengths(), expected.as_slice());
}

#[test]
fn test_sampled_protein_kmers_round_trip() {
    let kmers = KmerEncoding::new(4, PROTEIN_ENCODING).unwrap();
    let sample = kmers.sample_domain(200);
    let codes = kmers.encode_kmers(&sample).unwrap();
    assert!(codes.iter().all(|&code| code < kmers.modulus()));
    assert_eq!(kmers.inverse_many(&codes).unwrap(), sample);
}
