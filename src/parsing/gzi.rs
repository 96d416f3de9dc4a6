//! Parser for BGZF block indexes (.gzi files, as written by `bgzip -i`) using
//! noodles.
//!
//! The file is a little-endian `u64` entry count followed by that many
//! `(compressed_offset, uncompressed_offset)` pairs of `u64`. The first block,
//! at `(0, 0)`, is implicit; noodles adds it when reading.

use std::io;
use std::path::Path;

use noodles::bgzf::gzi;

use crate::error::ReaderError;

const COUNT_LEN: usize = 8;
const ENTRY_LEN: usize = 16;

/// Start of a BGZF block in compressed and uncompressed coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOffset {
    pub compressed: u64,
    pub uncompressed: u64,
}

/// Sorted table of BGZF block starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GziIndex {
    index: gzi::Index,
}

impl GziIndex {
    /// Load a `.gzi` file
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::Io` if the file cannot be read and
    /// `ReaderError::MalformedIndex` if the table is truncated or unsorted.
    pub fn from_path(path: &Path) -> Result<Self, ReaderError> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes, &path.display().to_string())
    }

    /// Parse `.gzi` bytes
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::MalformedIndex` if the table is truncated or unsorted.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReaderError> {
        Self::parse(bytes, "<bytes>")
    }

    fn parse(bytes: &[u8], source_name: &str) -> Result<Self, ReaderError> {
        // The entry count must agree with the size before noodles reserves
        // space for that many entries
        let declared = bytes
            .get(..COUNT_LEN)
            .and_then(|b| <[u8; COUNT_LEN]>::try_from(b).ok())
            .map(u64::from_le_bytes)
            .ok_or_else(|| ReaderError::malformed_index(source_name, "missing entry count"))?;
        let stored = (bytes.len() - COUNT_LEN) / ENTRY_LEN;
        if (bytes.len() - COUNT_LEN) % ENTRY_LEN != 0 || declared != stored as u64 {
            return Err(ReaderError::malformed_index(
                source_name,
                format!(
                    "declares {declared} entries but holds {} bytes of entries",
                    bytes.len() - COUNT_LEN
                ),
            ));
        }

        let index = gzi::Reader::new(bytes).read_index().map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
                ReaderError::malformed_index(source_name, format!("Failed to parse GZI file: {e}"))
            }
            _ => ReaderError::Io(e),
        })?;

        if let Some(i) = index
            .windows(2)
            .position(|pair| pair[1].0 <= pair[0].0 || pair[1].1 < pair[0].1)
        {
            return Err(ReaderError::malformed_index(
                source_name,
                format!("block offsets are not increasing at entry {}", i + 1),
            ));
        }

        Ok(Self { index })
    }

    /// The block containing `uncompressed_offset`: the last block whose
    /// uncompressed start is at or before it
    #[must_use]
    pub fn block_for(&self, uncompressed_offset: u64) -> BlockOffset {
        let i = self
            .index
            .partition_point(|&(_, uncompressed)| uncompressed <= uncompressed_offset);
        // noodles always stores (0, 0) first, so i is at least 1
        let (compressed, uncompressed) = self.index[i.saturating_sub(1)];
        BlockOffset {
            compressed,
            uncompressed,
        }
    }

    /// Number of blocks, including the implicit first one
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
