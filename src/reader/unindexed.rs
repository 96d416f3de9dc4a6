use std::io::BufRead;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::header::Header;
use crate::core::range::Range;
use crate::error::ReaderError;
use crate::parsing::fasta::{open_fasta, FastaRecords};
use crate::reader::{ReaderOptions, Records, SequenceReader};

/// Sequential-only reader for FASTA files without an index.
///
/// Contigs are only discovered while scanning, so there is no header and
/// random access is refused with `ReaderError::UnsupportedOperation`.
#[derive(Debug, Clone)]
pub struct UnindexedReader {
    path: PathBuf,
    uppercase: bool,
}

impl UnindexedReader {
    /// Open `path` for sequential reading
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::Io` if the file does not exist or is unreadable.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReaderError> {
        Self::open_with(path, &ReaderOptions::default())
    }

    /// Open `path` with explicit options; only `uppercase` applies
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::Io` if the file does not exist or is unreadable.
    pub fn open_with(path: impl AsRef<Path>, options: &ReaderOptions) -> Result<Self, ReaderError> {
        let path = path.as_ref();
        std::fs::File::open(path)?;
        debug!("Opened {} for sequential reading", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            uppercase: options.uppercase,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A fresh scan over every record, in file order
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::Io` if the file cannot be reopened.
    pub fn iterate(&self) -> Result<FastaRecords<Box<dyn BufRead>>, ReaderError> {
        Ok(FastaRecords::new(open_fasta(&self.path)?).with_uppercase(self.uppercase))
    }

    /// Always fails: random access needs an index
    ///
    /// # Errors
    ///
    /// Always returns `ReaderError::UnsupportedOperation`.
    pub fn query(&self, range: &Range) -> Result<String, ReaderError> {
        Err(ReaderError::UnsupportedOperation(format!(
            "cannot query {range} from {}: random access requires a FASTA index",
            self.path.display()
        )))
    }
}

impl SequenceReader for UnindexedReader {
    fn header(&self) -> Result<&Header, ReaderError> {
        Err(ReaderError::UnsupportedOperation(format!(
            "{} has no header until it is fully scanned",
            self.path.display()
        )))
    }

    fn is_valid(&self, _range: &Range) -> bool {
        false
    }

    fn query(&mut self, range: &Range) -> Result<String, ReaderError> {
        UnindexedReader::query(self, range)
    }

    fn iterate(&mut self) -> Result<Records<'_>, ReaderError> {
        Ok(Box::new(UnindexedReader::iterate(self)?))
    }
}

impl std::fmt::Display for UnindexedReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UnindexedReader({})", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn write_fasta(content: &str) -> NamedTempFile {
        let temp = NamedTempFile::with_suffix(".fa").unwrap();
        std::fs::write(temp.path(), content).unwrap();
        temp
    }

    #[test]
    fn test_query_is_unsupported() {
        let fasta = write_fasta(">chrM\nGATCACAGG\n");
        let mut reader = UnindexedReader::open(fasta.path()).unwrap();

        assert!(matches!(
            reader.query(&Range::new("chrM", 1, 5)),
            Err(ReaderError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            SequenceReader::query(&mut reader, &Range::new("chrM", 1, 5)),
            Err(ReaderError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            reader.header(),
            Err(ReaderError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            reader.contig("chrM"),
            Err(ReaderError::UnsupportedOperation(_))
        ));
        assert!(!reader.is_valid(&Range::new("chrM", 1, 5)));
    }

    #[test]
    fn test_iterate_is_restartable() {
        let fasta = write_fasta(">chrM desc\nGATC\nAC\n>chr1\nacgt\n");
        let reader = UnindexedReader::open(fasta.path()).unwrap();

        let first: Vec<_> = reader.iterate().unwrap().collect::<Result<_, _>>().unwrap();
        let second: Vec<_> = reader.iterate().unwrap().collect::<Result<_, _>>().unwrap();
        assert_eq!(
            first,
            vec![
                ("chrM".to_string(), "GATCAC".to_string()),
                ("chr1".to_string(), "acgt".to_string()),
            ]
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            UnindexedReader::open("/nonexistent/ref.fa"),
            Err(ReaderError::Io(_))
        ));
    }
}
