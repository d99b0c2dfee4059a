//! Balanced ordered index with binary persistence.
//!
//! This crate provides:
//! - [`BalancedIndex`], a generic AVL-balanced string-keyed map used as the
//!   storage structure for every inverted index
//! - the [`format`] module, an endianness-fixed binary encoding for
//!   posting-map indices with magic bytes, a format version, and a CRC32
//!   integrity check

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod avl;
pub mod format;

pub use avl::BalancedIndex;
pub use format::{
    decode_index, encode_index, read_index, write_index, FormatError, INDEX_FORMAT_VERSION,
    INDEX_MAGIC,
};
