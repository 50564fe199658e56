//! # gtars-encodings
//!
//! Integer encodings for fixed-alphabet sequence data and rolling k-mer hashing.
//!
//! ## Purpose
//!
//! Sequences reach the encoders in many shapes: plain text, lists of strings,
//! ragged collections, flat code buffers or arrays that are already encoded.
//! This crate brings all of them into one canonical form, an [EncodedArray] or
//! [EncodedRaggedArray] tagged with its [SequenceEncoding], and refuses to
//! encode data twice unless one side is the base encoding.
//!
//! On top of that, [KmerEncoding] assigns every window of `k` symbols a dense
//! integer code with a rolling hash, and inverts those codes exactly.
//!
//! ## Main Components
//!
//! - **`Encoding`**: flat-buffer encode/decode primitives and capability flags
//! - **`OneToOneEncoding`**: shape dispatch over [SequenceData]
//! - **`KmerEncoding`**: rolling k-mer codes over a finite alphabet
//! - **`KmerConfig`**: k-mer encodings from TOML files
//!
//! ## Example
//!
//! ```rust
//! use gtars_encodings::{DNA_ENCODING, KmerEncoding, OneToOneEncoding};
//!
//! let sequences = DNA_ENCODING
//!     .encode(vec!["GCAT", "ACGTAC"].into())
//!     .unwrap()
//!     .into_encoded_ragged()
//!     .unwrap();
//!
//! let kmers = KmerEncoding::new(3, DNA_ENCODING).unwrap();
//! let codes = kmers.rolling_window(&sequences).unwrap();
//! assert_eq!(codes.shape().lengths(), &[2, 4]);
//! assert_eq!(kmers.inverse(codes.ravel()[0]).unwrap().to_string(), "GCA");
//! ```
//!
pub mod alphabet;
pub mod config;
pub mod dispatch;
pub mod encoded_array;
pub mod encoding;
pub mod error;
pub mod kmers;
pub mod ragged;

// re-export things
pub use alphabet::{Alphabet, AlphabetType, lookup_alphabet};
pub use config::*;
pub use dispatch::*;
pub use encoded_array::*;
pub use encoding::*;
pub use error::*;
pub use kmers::*;
pub use ragged::*;
