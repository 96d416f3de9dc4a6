//! Positioned reads over plain or BGZF-compressed files.
//!
//! A BGZF file is a series of gzip members ("blocks") of at most 64 KiB of
//! uncompressed data each. Random access uses the `.gzi` table to jump straight
//! to the block holding a decompressed offset; noodles then inflates blocks
//! from there, so only the blocks overlapping a request are decoded.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use noodles::bgzf;
use tracing::trace;

use crate::error::ReaderError;
use crate::parsing::fasta::is_gzipped;
use crate::parsing::gzi::GziIndex;

enum Source {
    Plain(BufReader<File>),
    Bgzf { file: File, index: GziIndex },
}

/// Owned handle on a backing file, plain or BGZF-compressed
pub struct BlockCodec {
    path: PathBuf,
    source: Source,
}

impl BlockCodec {
    /// Open `path`, loading `gzi_path` if the file is gzip-compressed.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::Io` if a file cannot be read,
    /// `ReaderError::UnsupportedCompression` if the file is compressed and no
    /// block index exists at `gzi_path`, and `ReaderError::MalformedIndex` if
    /// the block index is invalid.
    pub fn open(path: &Path, gzi_path: &Path) -> Result<Self, ReaderError> {
        let source = if is_gzipped(path)? {
            if !gzi_path.exists() {
                return Err(ReaderError::UnsupportedCompression(format!(
                    "{} is gzip-compressed but has no block index at {}; \
                     recompress with `bgzip -i` to enable random access",
                    path.display(),
                    gzi_path.display()
                )));
            }
            Source::Bgzf {
                index: GziIndex::from_path(gzi_path)?,
                file: File::open(path)?,
            }
        } else {
            Source::Plain(BufReader::new(File::open(path)?))
        };

        Ok(Self {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        matches!(self.source, Source::Bgzf { .. })
    }

    /// Read up to `length` bytes starting at decompressed offset `offset`.
    ///
    /// Fewer bytes are returned only when the data ends first; callers decide
    /// whether a short read is an error.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::Io` on I/O failure or a corrupt compressed block.
    pub fn read_at(&mut self, offset: u64, length: u64) -> Result<Vec<u8>, ReaderError> {
        let mut out = Vec::with_capacity(capacity_hint(length));
        if length == 0 {
            return Ok(out);
        }
        match &mut self.source {
            Source::Plain(file) => {
                file.seek(SeekFrom::Start(offset))?;
                file.take(length).read_to_end(&mut out)?;
            }
            Source::Bgzf { file, index } => {
                let block = index.block_for(offset);
                file.seek(SeekFrom::Start(block.compressed))?;

                // A fresh reader starts with no buffered block, so nothing
                // from an earlier position can leak into this read
                let mut reader = bgzf::Reader::new(&mut *file);
                let skip = offset - block.uncompressed;
                let skipped = io::copy(&mut (&mut reader).take(skip), &mut io::sink())?;
                if skipped == skip {
                    reader.take(length).read_to_end(&mut out)?;
                }

                trace!(
                    "Read {} bytes at offset {} starting from block at {}",
                    out.len(),
                    offset,
                    block.compressed
                );
            }
        }
        Ok(out)
    }

    /// Release the file handle
    pub fn close(self) {
        trace!("Closing {}", self.path.display());
    }
}

fn capacity_hint(length: u64) -> usize {
    usize::try_from(length).unwrap_or(0).min(1 << 20)
}
