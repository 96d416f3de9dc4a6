use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::header::Header;
use crate::core::range::Range;
use crate::error::ReaderError;
use crate::parsing::fai::{FaiIndex, IndexEntry};
use crate::reader::cache::{BlockCache, BlockKey, CacheStats, CACHE_BLOCK_SIZE};
use crate::reader::codec::BlockCodec;
use crate::reader::{ReaderOptions, Records, SequenceReader};

/// Random-access reader over an indexed FASTA file, plain or BGZF-compressed.
///
/// The file handle is owned by the reader and released when it is dropped or
/// [`close`](IndexedReader::close)d. Reads go through an LRU cache of decoded
/// blocks sized by [`ReaderOptions::cache_size`].
pub struct IndexedReader {
    path: PathBuf,
    index: FaiIndex,
    header: Header,
    codec: BlockCodec,
    cache: BlockCache,
    uppercase: bool,
}

impl IndexedReader {
    /// Open `path` with its sibling `.fai` (and `.gzi` when compressed)
    ///
    /// # Errors
    ///
    /// See [`IndexedReader::open_with`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReaderError> {
        Self::open_with(path, &ReaderOptions::default())
    }

    /// Open `path` with explicit options
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::Io` if a file cannot be read,
    /// `ReaderError::MalformedIndex` if the `.fai` or `.gzi` is invalid, and
    /// `ReaderError::UnsupportedCompression` if the FASTA is compressed without
    /// a block index.
    pub fn open_with(path: impl AsRef<Path>, options: &ReaderOptions) -> Result<Self, ReaderError> {
        let path = path.as_ref();
        let index = FaiIndex::from_path(&options.index_path_for(path))?;
        let codec = BlockCodec::open(path, &options.gzi_path_for(path))?;
        let header = index.to_header()?;

        if index.is_empty() {
            warn!("Index for {} lists no contigs", path.display());
        }
        debug!(
            "Opened {} ({} contigs, {}, cache of {} blocks)",
            path.display(),
            header.len(),
            if codec.is_compressed() { "bgzf" } else { "plain" },
            options.cache_size
        );

        Ok(Self {
            path: path.to_path_buf(),
            index,
            header,
            codec,
            cache: BlockCache::new(options.cache_size),
            uppercase: options.uppercase,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[must_use]
    pub fn index(&self) -> &FaiIndex {
        &self.index
    }

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.codec.is_compressed()
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Release the backing file handle
    pub fn close(self) {
        self.codec.close();
    }

    /// The bases in `range`
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::UnknownContig` for names missing from the index,
    /// `ReaderError::InvalidRange` for out-of-bounds ranges, `ReaderError::Io`
    /// if the file cannot be read, and `ReaderError::CorruptData` if the file
    /// holds fewer bases than the index promises.
    pub fn query(&mut self, range: &Range) -> Result<String, ReaderError> {
        let contig_id = self
            .index
            .position(&range.contig)
            .ok_or_else(|| ReaderError::UnknownContig(range.contig.clone()))?;
        let entry = &self.index.entries()[contig_id];
        let (start, end) = range.checked_bounds(entry.total_length)?;
        let (first, last) = entry.byte_span(start, end);

        let bytes = if self.cache.capacity() == 0 {
            self.codec.read_at(first, last - first)?
        } else {
            read_through_cache(&mut self.codec, &mut self.cache, contig_id, entry, first, last)?
        };

        into_bases(bytes, end - start, self.uppercase, &range.to_string())
    }

    /// A fresh pass over every contig in file order
    pub fn iterate(&mut self) -> IndexedRecords<'_> {
        IndexedRecords {
            reader: self,
            next: 0,
        }
    }

    /// Read one whole contig, bypassing the cache so a full scan does not
    /// evict blocks held for random access
    fn read_contig(&mut self, contig_id: usize) -> Result<(String, String), ReaderError> {
        let entry = &self.index.entries()[contig_id];
        let (first, last) = entry.byte_span(0, entry.total_length);
        let bytes = self.codec.read_at(first, last - first)?;
        let bases = into_bases(bytes, entry.total_length, self.uppercase, &entry.name)?;
        Ok((entry.name.clone(), bases))
    }
}

/// Gather `[first, last)` from fixed-size cache blocks aligned on the
/// contig's first base
fn read_through_cache(
    codec: &mut BlockCodec,
    cache: &mut BlockCache,
    contig_id: usize,
    entry: &IndexEntry,
    first: u64,
    last: u64,
) -> Result<Vec<u8>, ReaderError> {
    let mut out = Vec::new();
    if first == last {
        return Ok(out);
    }

    let contig_end = entry.end_offset();
    let first_block = (first - entry.file_offset) / CACHE_BLOCK_SIZE;
    let last_block = (last - 1 - entry.file_offset) / CACHE_BLOCK_SIZE;

    for block_id in first_block..=last_block {
        let block_start = entry.file_offset + block_id * CACHE_BLOCK_SIZE;
        let block_end = (block_start + CACHE_BLOCK_SIZE).min(contig_end);
        let key = BlockKey {
            contig_id,
            block_id,
        };
        let block = cache.get_or_decode(key, || {
            codec.read_at(block_start, block_end - block_start)
        })?;

        let available = block_start + block.len() as u64;
        let from = first.max(block_start);
        let to = last.min(available);
        if from < to {
            out.extend_from_slice(&block[as_index(from - block_start)..as_index(to - block_start)]);
        }
        if available < block_end {
            // The file ended inside this block
            break;
        }
    }

    Ok(out)
}

#[allow(clippy::cast_possible_truncation)] // Bounded by an in-memory block length
fn as_index(offset: u64) -> usize {
    offset as usize
}

/// Strip line terminators and check that exactly `expected` bases remain
fn into_bases(
    mut bytes: Vec<u8>,
    expected: u64,
    uppercase: bool,
    what: &str,
) -> Result<String, ReaderError> {
    bytes.retain(|&b| b != b'\n' && b != b'\r');
    if !bytes.is_ascii() {
        return Err(ReaderError::CorruptData(format!("Non-ASCII bases in {what}")));
    }
    if bytes.len() as u64 != expected {
        return Err(ReaderError::CorruptData(format!(
            "Expected {expected} bases for {what} but recovered {}; \
             the file may be truncated or the index stale",
            bytes.len()
        )));
    }
    if uppercase {
        bytes.make_ascii_uppercase();
    }
    String::from_utf8(bytes)
        .map_err(|_| ReaderError::CorruptData(format!("Non-ASCII bases in {what}")))
}

/// Lazy iterator over every contig of an [`IndexedReader`]
pub struct IndexedRecords<'r> {
    reader: &'r mut IndexedReader,
    next: usize,
}

impl Iterator for IndexedRecords<'_> {
    type Item = Result<(String, String), ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.reader.index.len() {
            return None;
        }
        let contig_id = self.next;
        self.next += 1;
        Some(self.reader.read_contig(contig_id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.reader.index.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl SequenceReader for IndexedReader {
    fn header(&self) -> Result<&Header, ReaderError> {
        Ok(&self.header)
    }

    fn query(&mut self, range: &Range) -> Result<String, ReaderError> {
        IndexedReader::query(self, range)
    }

    fn iterate(&mut self) -> Result<Records<'_>, ReaderError> {
        Ok(Box::new(IndexedReader::iterate(self)))
    }
}

impl std::fmt::Display for IndexedReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IndexedReader({}, {} contigs, {})",
            self.path.display(),
            self.header.len(),
            if self.is_compressed() { "bgzf" } else { "plain" }
        )
    }
}

impl std::fmt::Debug for IndexedReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedReader")
            .field("path", &self.path)
            .field("contigs", &self.header.len())
            .field("compressed", &self.is_compressed())
            .field("cache", &self.cache)
            .finish()
    }
}
