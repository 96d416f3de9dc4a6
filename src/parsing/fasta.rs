//! Sequential FASTA record parsing using noodles.
//!
//! Supports both uncompressed and gzip/bgzip compressed files. Compression is
//! detected from the gzip magic bytes rather than the file extension, so a
//! bgzipped `.fa` or an uncompressed `.fa.gz` are both read correctly.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;

use crate::error::ReaderError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Check whether a file starts with the gzip magic bytes
///
/// # Errors
///
/// Returns `ReaderError::Io` if the file cannot be opened or read.
pub fn is_gzipped(path: &Path) -> Result<bool, ReaderError> {
    let mut magic = [0u8; 2];
    let mut file = File::open(path)?;
    let mut filled = 0;
    while filled < magic.len() {
        match file.read(&mut magic[filled..])? {
            0 => return Ok(false),
            n => filled += n,
        }
    }
    Ok(magic == GZIP_MAGIC)
}

/// Open a FASTA file for sequential reading, decompressing if needed.
///
/// `MultiGzDecoder` is required for bgzip input: every BGZF block is a
/// separate gzip member.
///
/// # Errors
///
/// Returns `ReaderError::Io` if the file cannot be opened.
pub fn open_fasta(path: &Path) -> Result<Box<dyn BufRead>, ReaderError> {
    let file = File::open(path)?;
    if is_gzipped(path)? {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Extract the contig name from a definition line: the first word after `>`
#[must_use]
pub fn definition_name(definition: &str) -> Option<&str> {
    definition
        .strip_prefix('>')
        .and_then(|rest| rest.split_ascii_whitespace().next())
}

/// Lazy iterator over `(name, sequence)` pairs of a FASTA stream
pub struct FastaRecords<R> {
    reader: fasta::io::Reader<R>,
    definition: String,
    uppercase: bool,
    done: bool,
}

impl<R: BufRead> FastaRecords<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: fasta::io::Reader::new(inner),
            definition: String::new(),
            uppercase: false,
            done: false,
        }
    }

    /// Convert every base to upper case as it is read
    #[must_use]
    pub fn with_uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    fn read_record(&mut self) -> Result<Option<(String, String)>, ReaderError> {
        self.definition.clear();
        if self.reader.read_definition(&mut self.definition)? == 0 {
            return Ok(None);
        }

        let name = definition_name(self.definition.trim_end())
            .ok_or_else(|| {
                ReaderError::CorruptData(format!(
                    "Expected a '>' definition line, found '{}'",
                    self.definition.trim_end()
                ))
            })?
            .to_string();

        let mut sequence = Vec::new();
        self.reader.read_sequence(&mut sequence)?;
        sequence.retain(|&b| b != b'\r');
        if self.uppercase {
            sequence.make_ascii_uppercase();
        }

        let sequence = String::from_utf8(sequence).map_err(|_| {
            ReaderError::CorruptData(format!("Non-ASCII bases in contig '{name}'"))
        })?;

        Ok(Some((name, sequence)))
    }
}

impl<R: BufRead> Iterator for FastaRecords<R> {
    type Item = Result<(String, String), ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
