//! Parser for FASTA index (.fai) files using noodles.
//!
//! Format: `name\tlength\toffset\tline_bases\tline_width`, one row per contig,
//! in the order the contigs appear in the FASTA file. `line_width` counts the
//! line terminator, so it is `line_bases + 1` for `\n` files and
//! `line_bases + 2` for `\r\n` files.
//!
//! noodles parses the rows; the line geometry and name uniqueness are checked
//! here so that every offset computed from an entry fits in a `u64`.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use noodles::fasta::fai;
use tracing::debug;

use crate::core::contig::Contig;
use crate::core::header::Header;
use crate::error::ReaderError;

/// One row of a FASTA index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    /// Declared sequence length in bases
    pub total_length: u64,
    /// Byte offset of the first base in the (decompressed) FASTA file
    pub file_offset: u64,
    pub bases_per_line: u64,
    /// Bytes per full line, including the terminator
    pub bytes_per_line: u64,
}

impl IndexEntry {
    /// Byte offset of base `pos` (0-based), accounting for line wrapping.
    ///
    /// Entries loaded through [`FaiIndex`] are checked so that this cannot
    /// overflow for any `pos <= total_length`.
    #[must_use]
    pub fn offset_of(&self, pos: u64) -> u64 {
        if self.bases_per_line == 0 {
            return self.file_offset;
        }
        self.file_offset
            + (pos / self.bases_per_line) * self.bytes_per_line
            + pos % self.bases_per_line
    }

    fn checked_offset_of(&self, pos: u64) -> Option<u64> {
        if self.bases_per_line == 0 {
            return Some(self.file_offset);
        }
        (pos / self.bases_per_line)
            .checked_mul(self.bytes_per_line)?
            .checked_add(pos % self.bases_per_line)?
            .checked_add(self.file_offset)
    }

    /// Byte span `[first, last)` holding bases `[start, end)`, including any
    /// embedded line terminators. An empty base range yields an empty span.
    #[must_use]
    pub fn byte_span(&self, start: u64, end: u64) -> (u64, u64) {
        let first = self.offset_of(start);
        if end <= start {
            return (first, first);
        }
        (first, self.offset_of(end - 1) + 1)
    }

    /// One past the byte offset of the last base of this contig
    #[must_use]
    pub fn end_offset(&self) -> u64 {
        self.byte_span(0, self.total_length).1
    }
}

/// A parsed FASTA index: entries in file order plus a name lookup
#[derive(Debug, Clone, Default)]
pub struct FaiIndex {
    entries: Vec<IndexEntry>,
    name_to_index: HashMap<String, usize>,
}

impl FaiIndex {
    /// Load a FASTA index file
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::Io` if the file cannot be read and
    /// `ReaderError::MalformedIndex` if any row is invalid.
    pub fn from_path(path: &Path) -> Result<Self, ReaderError> {
        let text = std::fs::read_to_string(path)?;
        let index = Self::parse(&text, &path.display().to_string())?;
        debug!(
            "Loaded {} index entries from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }

    /// Parse FASTA index text
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::MalformedIndex` if any row is invalid.
    pub fn from_text(text: &str) -> Result<Self, ReaderError> {
        Self::parse(text, "<text>")
    }

    fn parse(text: &str, source_name: &str) -> Result<Self, ReaderError> {
        // The noodles reader drops the last byte of every line, newline or not
        let mut text = text.to_string();
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }

        let records = fai::io::Reader::new(text.as_bytes())
            .read_index()
            .map_err(|e| match e.kind() {
                io::ErrorKind::InvalidData => {
                    ReaderError::malformed_index(source_name, format!("Failed to parse FAI file: {e}"))
                }
                _ => ReaderError::Io(e),
            })?;

        let mut index = Self::default();
        for (row, record) in records.as_ref().iter().enumerate() {
            let entry = to_entry(record).map_err(|reason| {
                ReaderError::malformed_index(source_name, format!("row {}: {reason}", row + 1))
            })?;

            if index.name_to_index.contains_key(&entry.name) {
                return Err(ReaderError::malformed_index(
                    source_name,
                    format!("row {}: duplicate contig '{}'", row + 1, entry.name),
                ));
            }
            index
                .name_to_index
                .insert(entry.name.clone(), index.entries.len());
            index.entries.push(entry);
        }

        Ok(index)
    }

    /// Look up the entry for a contig
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::UnknownContig` if the index has no such contig.
    pub fn lookup(&self, name: &str) -> Result<&IndexEntry, ReaderError> {
        self.name_to_index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| ReaderError::UnknownContig(name.to_string()))
    }

    /// Position of a contig in file order
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a header with one contig per row, in file order
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::DuplicateContig` if two rows share a name.
    pub fn to_header(&self) -> Result<Header, ReaderError> {
        let contigs = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, e)| Contig::new(&e.name, e.total_length, pos))
            .collect();
        Header::new(contigs)
    }
}

/// Convert a noodles record, checking its line geometry
fn to_entry(record: &fai::Record) -> Result<IndexEntry, String> {
    let entry = IndexEntry {
        name: String::from_utf8_lossy(record.name()).to_string(),
        total_length: record.length(),
        file_offset: record.offset(),
        bases_per_line: record.line_bases(),
        bytes_per_line: record.line_width(),
    };

    if entry.name.is_empty() {
        return Err("empty contig name".to_string());
    }
    if entry.bytes_per_line < entry.bases_per_line {
        return Err(format!(
            "line_width {} is smaller than line_bases {}",
            entry.bytes_per_line, entry.bases_per_line
        ));
    }
    if entry.bases_per_line == 0 && entry.total_length > 0 {
        return Err(format!(
            "line_bases is 0 for non-empty contig '{}'",
            entry.name
        ));
    }
    // offset_of is monotonic, so this bounds every offset of the contig
    if entry.checked_offset_of(entry.total_length).is_none() {
        return Err(format!(
            "offsets of contig '{}' overflow a 64-bit file position",
            entry.name
        ));
    }

    Ok(entry)
}
