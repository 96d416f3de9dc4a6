use std::collections::HashSet;

use tracing::debug;

use crate::core::contig::Contig;
use crate::core::header::Header;
use crate::core::range::Range;
use crate::error::ReaderError;
use crate::reader::{Records, SequenceReader};

/// Bases `[start_offset, end)` of one contig
#[derive(Debug, Clone)]
struct Fragment {
    start_offset: u64,
    end: u64,
    bases: String,
}

/// Reader over sequences held entirely in memory.
///
/// Each contig is a single fragment that may start past position 0, so a
/// slice of a longer contig can be served with its original coordinates.
/// Queries are read-only, which makes the reader safe to share across threads.
#[derive(Debug, Clone)]
pub struct InMemoryReader {
    header: Header,
    /// One fragment per contig, indexed by `Contig::id`
    fragments: Vec<Fragment>,
}

impl InMemoryReader {
    /// Build a reader from `(name, start_offset, bases)` records.
    ///
    /// Each contig's length is taken to be `start_offset + bases.len()`.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::DuplicateContig` if a name appears twice and
    /// `ReaderError::CorruptData` if any bases are not ASCII.
    pub fn new<I, N, B>(records: I) -> Result<Self, ReaderError>
    where
        I: IntoIterator<Item = (N, u64, B)>,
        N: Into<String>,
        B: Into<String>,
    {
        Self::build(records, None)
    }

    /// Build a reader whose contig lengths come from `source` where it
    /// declares them, so fragments keep the full length of the contig they
    /// were cut from.
    ///
    /// # Errors
    ///
    /// As [`InMemoryReader::new`], plus `ReaderError::InvalidRange` if a
    /// fragment extends past the length `source` declares.
    pub fn with_header<I, N, B>(source: &Header, records: I) -> Result<Self, ReaderError>
    where
        I: IntoIterator<Item = (N, u64, B)>,
        N: Into<String>,
        B: Into<String>,
    {
        Self::build(records, Some(source))
    }

    /// Materialize every contig of another reader, keeping its header lengths
    /// when it has a header.
    ///
    /// # Errors
    ///
    /// Propagates any error raised while iterating `reader`.
    pub fn load<R: SequenceReader + ?Sized>(reader: &mut R) -> Result<Self, ReaderError> {
        let source = reader.header().ok().cloned();
        let records = reader
            .iterate()?
            .map(|record| record.map(|(name, bases)| (name, 0, bases)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::build(records, source.as_ref())
    }

    fn build<I, N, B>(records: I, source: Option<&Header>) -> Result<Self, ReaderError>
    where
        I: IntoIterator<Item = (N, u64, B)>,
        N: Into<String>,
        B: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut contigs = Vec::new();
        let mut fragments = Vec::new();

        for (pos, (name, start_offset, bases)) in records.into_iter().enumerate() {
            let name: String = name.into();
            let bases: String = bases.into();
            let end = start_offset.checked_add(bases.len() as u64).ok_or_else(|| {
                ReaderError::invalid_range(
                    format!("{name}:{start_offset}"),
                    "fragment end overflows a 64-bit position",
                )
            })?;
            let fragment = Fragment {
                start_offset,
                end,
                bases,
            };

            if !seen.insert(name.clone()) {
                return Err(ReaderError::DuplicateContig(name));
            }
            if !fragment.bases.is_ascii() {
                return Err(ReaderError::CorruptData(format!(
                    "Non-ASCII bases in contig '{name}'"
                )));
            }

            let n_bases = match source.and_then(|h| h.get(&name)) {
                Some(declared) if fragment.end > declared.n_bases => {
                    return Err(ReaderError::invalid_range(
                        format!("{name}:{start_offset}-{}", fragment.end),
                        format!("fragment extends past declared length {}", declared.n_bases),
                    ));
                }
                Some(declared) => declared.n_bases,
                None => fragment.end,
            };

            contigs.push(Contig::new(name, n_bases, pos));
            fragments.push(fragment);
        }

        let header = Header::new(contigs)?;
        debug!("Loaded {} contigs into memory", header.len());
        Ok(Self { header, fragments })
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Look up a contig by name
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::UnknownContig` if the name is not loaded.
    pub fn contig(&self, name: &str) -> Result<&Contig, ReaderError> {
        self.header.contig(name)
    }

    /// Whether `range` is within its contig's declared bounds
    #[must_use]
    pub fn is_valid(&self, range: &Range) -> bool {
        self.header
            .get(&range.contig)
            .is_some_and(|c| c.contains(range.start, range.end))
    }

    /// The bases in `range`, which must lie within the loaded fragment
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::UnknownContig` for unloaded names and
    /// `ReaderError::InvalidRange` if the range is out of the contig's bounds
    /// or not fully inside the loaded fragment.
    pub fn query(&self, range: &Range) -> Result<String, ReaderError> {
        let contig = self.header.contig(&range.contig)?;
        let (start, end) = range.checked_bounds(contig.n_bases)?;

        let fragment = &self.fragments[contig.id];
        if start < fragment.start_offset || end > fragment.end {
            return Err(ReaderError::invalid_range(
                range,
                format!(
                    "only bases {}-{} are loaded",
                    fragment.start_offset,
                    fragment.end
                ),
            ));
        }

        let from = as_index(start - fragment.start_offset);
        let to = as_index(end - fragment.start_offset);
        Ok(fragment.bases[from..to].to_string())
    }

    /// Every loaded fragment as `(name, bases)`, in construction order
    pub fn iterate(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.header
            .contigs
            .iter()
            .zip(&self.fragments)
            .map(|(contig, fragment)| (contig.name.clone(), fragment.bases.clone()))
    }
}

#[allow(clippy::cast_possible_truncation)] // Bounded by the fragment length
fn as_index(offset: u64) -> usize {
    offset as usize
}

impl SequenceReader for InMemoryReader {
    fn header(&self) -> Result<&Header, ReaderError> {
        Ok(&self.header)
    }

    fn query(&mut self, range: &Range) -> Result<String, ReaderError> {
        InMemoryReader::query(self, range)
    }

    fn iterate(&mut self) -> Result<Records<'_>, ReaderError> {
        Ok(Box::new(InMemoryReader::iterate(self).map(Ok)))
    }
}

impl std::fmt::Display for InMemoryReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "InMemoryReader({} contigs, {} bases loaded)",
            self.header.len(),
            self.fragments.iter().map(|f| f.bases.len()).sum::<usize>()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_edge_cases() {
        let reader = InMemoryReader::new([("1", 0, "ACGT")]).unwrap();
        assert_eq!(reader.query(&Range::new("1", 0, 1)).unwrap(), "A");
        assert_eq!(reader.query(&Range::new("1", 3, 4)).unwrap(), "T");
        assert_eq!(reader.query(&Range::new("1", 0, 4)).unwrap(), "ACGT");
        assert_eq!(reader.query(&Range::new("1", 2, 2)).unwrap(), "");
    }

    #[test]
    fn test_non_zero_start_query() {
        let bases = "ACGTAACCGGTT";
        for start in 0..bases.len() {
            let reader = InMemoryReader::new([("1", start as u64, &bases[start..])]).unwrap();
            assert_eq!(reader.header().contigs[0].name, "1");
            assert_eq!(reader.header().contigs[0].n_bases, bases.len() as u64);

            for end in start..bases.len() {
                let range = Range::new("1", start as i64, end as i64);
                assert_eq!(reader.query(&range).unwrap(), &bases[start..end]);
            }
        }
    }

    #[test]
    fn test_bad_query_with_start() {
        let reader = InMemoryReader::new([("1", 10, "ACGT")]).unwrap();
        // Before the loaded bases, spanning into them, and off their end
        for (start, end) in [(0, 1), (8, 12), (12, 15)] {
            assert!(
                matches!(
                    reader.query(&Range::new("1", start, end)),
                    Err(ReaderError::InvalidRange { .. })
                ),
                "{start}-{end} should be rejected"
            );
        }
        assert_eq!(reader.query(&Range::new("1", 10, 14)).unwrap(), "ACGT");
    }

    #[test]
    fn test_fragment_end_overflow() {
        assert!(matches!(
            InMemoryReader::new([("x", u64::MAX, "AC")]),
            Err(ReaderError::InvalidRange { .. })
        ));
        let reader = InMemoryReader::new([("x", u64::MAX - 2, "AC")]).unwrap();
        assert_eq!(reader.contig("x").unwrap().n_bases, u64::MAX);
        assert!(matches!(
            reader.query(&Range::new("x", 0, 2)),
            Err(ReaderError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_duplicate_contig() {
        let result = InMemoryReader::new([("1", 10, "AC"), ("1", 20, "AC")]);
        let err = result.unwrap_err();
        assert!(matches!(&err, ReaderError::DuplicateContig(name) if name == "1"));
        assert!(err.to_string().contains("multiple ones were found on 1"));
    }

    #[test]
    fn test_with_header_keeps_declared_length() {
        let source = Header::new(vec![Contig::new("chr1", 100, 0)]).unwrap();
        let reader = InMemoryReader::with_header(&source, [("chr1", 40, "ACGT"), ("extra", 0, "GG")])
            .unwrap();

        assert_eq!(reader.contig("chr1").unwrap().n_bases, 100);
        assert_eq!(reader.contig("extra").unwrap().n_bases, 2);
        assert!(reader.is_valid(&Range::new("chr1", 0, 100)));
        // Valid for the contig, but outside the loaded fragment
        assert!(matches!(
            reader.query(&Range::new("chr1", 0, 100)),
            Err(ReaderError::InvalidRange { .. })
        ));
        assert_eq!(reader.query(&Range::new("chr1", 41, 43)).unwrap(), "CG");
    }

    #[test]
    fn test_with_header_rejects_overlong_fragment() {
        let source = Header::new(vec![Contig::new("chr1", 10, 0)]).unwrap();
        assert!(matches!(
            InMemoryReader::with_header(&source, [("chr1", 8, "ACGT")]),
            Err(ReaderError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_validation() {
        let reader = InMemoryReader::new([("chr1", 0, "ACGTACGTAC")]).unwrap();
        assert!(reader.is_valid(&Range::new("chr1", 0, 10)));
        assert!(!reader.is_valid(&Range::new("chr1", -1, 5)));
        assert!(!reader.is_valid(&Range::new("chr1", 5, 4)));
        assert!(!reader.is_valid(&Range::new("chr1", 0, 11)));
        assert!(!reader.is_valid(&Range::new("chr2", 0, 1)));

        assert!(matches!(
            reader.query(&Range::new("chr2", 0, 1)),
            Err(ReaderError::UnknownContig(_))
        ));
        assert!(matches!(
            reader.contig("chr2"),
            Err(ReaderError::UnknownContig(_))
        ));
    }

    #[test]
    fn test_iterate_in_construction_order() {
        let reader = InMemoryReader::new([("b", 0, "GG"), ("a", 5, "TT")]).unwrap();
        let records: Vec<_> = reader.iterate().collect();
        assert_eq!(
            records,
            vec![
                ("b".to_string(), "GG".to_string()),
                ("a".to_string(), "TT".to_string()),
            ]
        );
        assert_eq!(reader.contig("a").unwrap().pos_in_fasta, 1);
    }

    #[test]
    fn test_load_from_other_reader() {
        let mut source = InMemoryReader::new([("chr1", 0, "ACGT"), ("chr2", 0, "TTGA")]).unwrap();
        let copy = InMemoryReader::load(&mut source).unwrap();
        assert_eq!(copy.header().len(), 2);
        assert_eq!(copy.query(&Range::new("chr2", 1, 3)).unwrap(), "TG");
    }

    #[test]
    fn test_non_ascii_rejected() {
        assert!(matches!(
            InMemoryReader::new([("1", 0, "ACGTé")]),
            Err(ReaderError::CorruptData(_))
        ));
    }

    #[test]
    fn test_display() {
        let reader = InMemoryReader::new([("1", 0, "ACGT"), ("2", 3, "GG")]).unwrap();
        assert_eq!(reader.to_string(), "InMemoryReader(2 contigs, 6 bases loaded)");
    }
}
