//! On-disk byte format for posting-map indices.
//!
//! Persisted files hold the key/posting-map contents of a tree, not its
//! shape; loading re-inserts every entry through the normal `insert` path so
//! the balance invariant holds regardless of on-disk order.
//!
//! # File Structure
//!
//! ```text
//! +------------------+
//! | Magic: "NDIX"    | 4 bytes
//! | Format Version   | 4 bytes (u32 LE)
//! | Entry Count      | 8 bytes (u64 LE)
//! | Entries          | variable
//! | CRC32            | 4 bytes (u32 LE)
//! +------------------+
//! ```
//!
//! Each entry: key length (u32 LE) + key bytes, posting count (u32 LE),
//! then per posting: doc-id length (u32 LE) + doc-id bytes + occurrence
//! count (u64 LE). All integers are fixed-width little-endian so files are
//! portable across hosts.

use crate::avl::BalancedIndex;
use newsdex_core::PostingMap;
use std::path::Path;
use thiserror::Error;

/// Index file magic bytes: "NDIX"
pub const INDEX_MAGIC: [u8; 4] = *b"NDIX";

/// Current index format version
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Errors produced while decoding a persisted index file.
///
/// Any of these means the file is unusable; callers treat that as "index
/// absent" and fall back to rebuilding. A partial tree is never returned.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Underlying file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File does not start with the index magic
    #[error("invalid magic bytes: expected {expected:?}, got {actual:?}")]
    InvalidMagic {
        /// Expected magic bytes
        expected: [u8; 4],
        /// Actual bytes found
        actual: [u8; 4],
    },

    /// File was written by a newer format version
    #[error("unsupported index format version {version}, max supported is {max_supported}")]
    UnsupportedVersion {
        /// Version found in the file
        version: u32,
        /// Maximum version this build understands
        max_supported: u32,
    },

    /// Stored CRC32 does not match the file contents
    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// CRC stored in the file
        stored: u32,
        /// CRC computed over the file contents
        computed: u32,
    },

    /// File ends before the declared contents do
    #[error("truncated index file: {0} bytes missing")]
    Truncated(usize),

    /// A key or document id is not valid UTF-8
    #[error("index entry is not valid UTF-8")]
    InvalidUtf8,
}

/// Serialize an index to bytes.
///
/// Entries are written in ascending key order and postings in ascending
/// doc-id order, so equal indices encode to identical bytes.
pub fn encode_index(index: &BalancedIndex<PostingMap>) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&INDEX_MAGIC);
    bytes.extend_from_slice(&INDEX_FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&(index.len() as u64).to_le_bytes());

    index.for_each(|key, postings| {
        bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
        bytes.extend_from_slice(key.as_bytes());

        bytes.extend_from_slice(&(postings.len() as u32).to_le_bytes());
        let mut docs: Vec<(&String, &u64)> = postings.iter().collect();
        docs.sort_by_key(|(doc_id, _)| doc_id.as_str());
        for (doc_id, count) in docs {
            bytes.extend_from_slice(&(doc_id.len() as u32).to_le_bytes());
            bytes.extend_from_slice(doc_id.as_bytes());
            bytes.extend_from_slice(&count.to_le_bytes());
        }
    });

    let crc = crc32fast::hash(&bytes);
    bytes.extend_from_slice(&crc.to_le_bytes());
    bytes
}

/// Decode an index from bytes, re-inserting every entry.
pub fn decode_index(bytes: &[u8]) -> Result<BalancedIndex<PostingMap>, FormatError> {
    // magic(4) + version(4) + count(8) + crc(4)
    if bytes.len() < 20 {
        return Err(FormatError::Truncated(20 - bytes.len()));
    }

    let magic: [u8; 4] = bytes[0..4].try_into().unwrap_or([0; 4]);
    if magic != INDEX_MAGIC {
        return Err(FormatError::InvalidMagic {
            expected: INDEX_MAGIC,
            actual: magic,
        });
    }

    let data = &bytes[..bytes.len() - 4];
    let stored = u32::from_le_bytes(bytes[bytes.len() - 4..].try_into().unwrap_or([0; 4]));
    let computed = crc32fast::hash(data);
    if stored != computed {
        return Err(FormatError::ChecksumMismatch { stored, computed });
    }

    let mut reader = ByteReader::new(&data[4..]);
    let version = reader.read_u32()?;
    if version > INDEX_FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion {
            version,
            max_supported: INDEX_FORMAT_VERSION,
        });
    }

    let entry_count = reader.read_u64()?;
    let mut index = BalancedIndex::new();
    for _ in 0..entry_count {
        let key = reader.read_string()?;
        let posting_count = reader.read_u32()?;
        let mut postings = PostingMap::new();
        for _ in 0..posting_count {
            let doc_id = reader.read_string()?;
            let count = reader.read_u64()?;
            postings.insert(doc_id, count);
        }
        index.insert(key, postings);
    }

    Ok(index)
}

/// Write an index file.
pub fn write_index(path: &Path, index: &BalancedIndex<PostingMap>) -> Result<(), FormatError> {
    std::fs::write(path, encode_index(index))?;
    Ok(())
}

/// Read an index file.
///
/// A missing, malformed, or truncated file is an error; the caller decides
/// whether that means "rebuild" or "fail the load".
pub fn read_index(path: &Path) -> Result<BalancedIndex<PostingMap>, FormatError> {
    let bytes = std::fs::read(path)?;
    decode_index(&bytes)
}

/// Bounds-checked cursor over the file body (between header magic and CRC).
struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        ByteReader { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        let end = self
            .pos
            .checked_add(n)
            .ok_or(FormatError::Truncated(usize::MAX))?;
        if end > self.bytes.len() {
            return Err(FormatError::Truncated(end - self.bytes.len()));
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, FormatError> {
        let raw = self.take(4)?;
        Ok(u32::from_le_bytes(raw.try_into().unwrap_or([0; 4])))
    }

    fn read_u64(&mut self) -> Result<u64, FormatError> {
        let raw = self.take(8)?;
        Ok(u64::from_le_bytes(raw.try_into().unwrap_or([0; 8])))
    }

    fn read_string(&mut self) -> Result<String, FormatError> {
        let len = self.read_u32()? as usize;
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec()).map_err(|_| FormatError::InvalidUtf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> BalancedIndex<PostingMap> {
        let mut index = BalancedIndex::new();
        for (term, docs) in [
            ("profit", vec![("news/a.json", 3u64), ("news/b.json", 1)]),
            ("loss", vec![("news/b.json", 1)]),
            ("merger", vec![("news/c.json", 7)]),
        ] {
            let mut postings = PostingMap::new();
            for (doc, count) in docs {
                postings.insert(doc.to_string(), count);
            }
            index.insert(term, postings);
        }
        index
    }

    #[test]
    fn test_round_trip_preserves_every_entry() {
        let index = sample_index();
        let decoded = decode_index(&encode_index(&index)).unwrap();

        assert_eq!(decoded.len(), index.len());
        index.for_each(|key, postings| {
            assert_eq!(decoded.get(key), Some(postings));
        });
        assert!(decoded.is_balanced());
    }

    #[test]
    fn test_encoding_is_deterministic() {
        assert_eq!(encode_index(&sample_index()), encode_index(&sample_index()));
    }

    #[test]
    fn test_empty_index_round_trips() {
        let index = BalancedIndex::new();
        let decoded = decode_index(&encode_index(&index)).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_bad_magic_is_rejected() {
        let mut bytes = encode_index(&sample_index());
        bytes[0] = b'X';
        assert!(matches!(
            decode_index(&bytes),
            Err(FormatError::InvalidMagic { .. })
        ));
    }

    #[test]
    fn test_corrupt_body_fails_checksum() {
        let mut bytes = encode_index(&sample_index());
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;
        assert!(matches!(
            decode_index(&bytes),
            Err(FormatError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_truncated_file_is_rejected() {
        let bytes = encode_index(&sample_index());
        // Any prefix shorter than the full file must fail: either the CRC no
        // longer matches or the header itself is incomplete.
        for cut in [0, 1, 10, bytes.len() - 5] {
            assert!(decode_index(&bytes[..cut]).is_err(), "cut at {cut}");
        }
    }

    #[test]
    fn test_future_version_is_rejected() {
        let index = BalancedIndex::new();
        let mut bytes = encode_index(&index);
        // Patch the version field and re-seal the CRC.
        bytes[4..8].copy_from_slice(&(INDEX_FORMAT_VERSION + 1).to_le_bytes());
        let body_len = bytes.len() - 4;
        let crc = crc32fast::hash(&bytes[..body_len]);
        bytes[body_len..].copy_from_slice(&crc.to_le_bytes());

        assert!(matches!(
            decode_index(&bytes),
            Err(FormatError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.idx");

        let index = sample_index();
        write_index(&path, &index).unwrap();
        let loaded = read_index(&path).unwrap();

        assert_eq!(loaded.len(), index.len());
        assert_eq!(
            loaded.get("profit").and_then(|m| m.get("news/a.json")),
            Some(&3)
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_index(&dir.path().join("absent.idx")),
            Err(FormatError::Io(_))
        ));
    }
}
