use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Marks an ASCII byte that is not a symbol of the alphabet.
pub const INVALID_SYMBOL: u8 = 0xFF;

/// Represents an alphabet with its ordered symbols and lookup table.
pub struct Alphabet {
    pub alphabet_type: AlphabetType,
    // symbol at index i is encoded as i
    pub symbols: &'static [u8],
    pub encoding_array: &'static [u8; 256],
}

impl Alphabet {
    /// Number of distinct symbol codes in the alphabet.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Index of an ASCII byte in the alphabet, case insensitive.
    pub fn index_of(&self, byte: u8) -> Option<u8> {
        match self.encoding_array[byte as usize] {
            INVALID_SYMBOL => None,
            index => Some(index),
        }
    }

    /// Uppercase ASCII symbol stored at `index`.
    pub fn symbol(&self, index: usize) -> Option<u8> {
        self.symbols.get(index).copied()
    }
}

/// Represents the type of alphabet used for symbol encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphabetType {
    /// DNA bases A, C, G, T
    Dna,
    /// RNA bases A, C, G, U
    Rna,
    /// DNA bases plus N
    #[serde(rename = "dna_n")]
    DnaN,
    /// The 20 standard amino acids
    Protein,
}

impl Display for AlphabetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlphabetType::Dna => write!(f, "dna"),
            AlphabetType::Rna => write!(f, "rna"),
            AlphabetType::DnaN => write!(f, "dna_n"),
            AlphabetType::Protein => write!(f, "protein"),
        }
    }
}

impl FromStr for AlphabetType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dna" => Ok(AlphabetType::Dna),
            "rna" => Ok(AlphabetType::Rna),
            "dna_n" => Ok(AlphabetType::DnaN),
            "protein" => Ok(AlphabetType::Protein),
            _ => Err(()),
        }
    }
}

/// Builds an ASCII lookup table mapping every symbol (and its lowercase
/// counterpart) to its position in `symbols`. Everything else maps to
/// [INVALID_SYMBOL].
const fn build_encoding_array(symbols: &[u8]) -> [u8; 256] {
    let mut arr = [INVALID_SYMBOL; 256];
    let mut i = 0;
    while i < symbols.len() {
        arr[symbols[i] as usize] = i as u8;
        arr[symbols[i].to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    arr
}

const DNA_SYMBOLS: &[u8] = b"ACGT";
const RNA_SYMBOLS: &[u8] = b"ACGU";
const DNA_N_SYMBOLS: &[u8] = b"ACGTN";
const PROTEIN_SYMBOLS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

const DNA_ENCODING_ARRAY: [u8; 256] = build_encoding_array(DNA_SYMBOLS);
const RNA_ENCODING_ARRAY: [u8; 256] = build_encoding_array(RNA_SYMBOLS);
const DNA_N_ENCODING_ARRAY: [u8; 256] = build_encoding_array(DNA_N_SYMBOLS);
const PROTEIN_ENCODING_ARRAY: [u8; 256] = build_encoding_array(PROTEIN_SYMBOLS);

pub const DNA_ALPHABET: Alphabet = Alphabet {
    alphabet_type: AlphabetType::Dna,
    symbols: DNA_SYMBOLS,
    encoding_array: &DNA_ENCODING_ARRAY,
};

pub const RNA_ALPHABET: Alphabet = Alphabet {
    alphabet_type: AlphabetType::Rna,
    symbols: RNA_SYMBOLS,
    encoding_array: &RNA_ENCODING_ARRAY,
};

pub const DNA_N_ALPHABET: Alphabet = Alphabet {
    alphabet_type: AlphabetType::DnaN,
    symbols: DNA_N_SYMBOLS,
    encoding_array: &DNA_N_ENCODING_ARRAY,
};

pub const PROTEIN_ALPHABET: Alphabet = Alphabet {
    alphabet_type: AlphabetType::Protein,
    symbols: PROTEIN_SYMBOLS,
    encoding_array: &PROTEIN_ENCODING_ARRAY,
};

/// Look up the alphabet for a given alphabet type.
pub fn lookup_alphabet(alphabet_type: &AlphabetType) -> &'static Alphabet {
    match alphabet_type {
        AlphabetType::Dna => &DNA_ALPHABET,
        AlphabetType::Rna => &RNA_ALPHABET,
        AlphabetType::DnaN => &DNA_N_ALPHABET,
        AlphabetType::Protein => &PROTEIN_ALPHABET,
    }
}
