use serde::{Deserialize, Serialize};

use crate::core::header::Header;
use crate::error::ReaderError;

/// A half-open, 0-based interval `[start, end)` on a named contig.
///
/// Coordinates are signed so that malformed requests (a negative start, for
/// instance) can be expressed by callers and rejected by readers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub contig: String,
    pub start: i64,
    pub end: i64,
}

impl Range {
    pub fn new(contig: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            contig: contig.into(),
            start,
            end,
        }
    }

    /// Number of bases covered, or zero for an inverted range
    #[must_use]
    pub fn len(&self) -> u64 {
        u64::try_from(self.end.saturating_sub(self.start)).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check `0 <= start <= end <= n_bases` and return the unsigned bounds.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::InvalidRange` describing the violated bound.
    pub fn checked_bounds(&self, n_bases: u64) -> Result<(u64, u64), ReaderError> {
        let start = u64::try_from(self.start)
            .map_err(|_| ReaderError::invalid_range(self, "start must be non-negative"))?;
        let end = u64::try_from(self.end)
            .map_err(|_| ReaderError::invalid_range(self, "end must be non-negative"))?;

        if end < start {
            return Err(ReaderError::invalid_range(self, "end is before start"));
        }
        if end > n_bases {
            return Err(ReaderError::invalid_range(
                self,
                format!("end exceeds contig length {n_bases}"),
            ));
        }

        Ok((start, end))
    }

    /// Parse a samtools-style region against a header.
    ///
    /// Accepts `name` (the whole contig), `name:beg` (to the end of the contig)
    /// and `name:beg-end`, where `beg` and `end` are 1-based and inclusive and
    /// may contain thousands separators. A name that itself contains `:` is
    /// matched whole before any coordinates are split off.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::UnknownContig` if the name is not in the header and
    /// `ReaderError::InvalidRange` if the coordinates cannot be parsed.
    pub fn parse_region(region: &str, header: &Header) -> Result<Self, ReaderError> {
        if let Some(contig) = header.get(region) {
            return Ok(Self::new(&contig.name, 0, to_signed(contig.n_bases)));
        }

        let Some((name, coords)) = region.rsplit_once(':') else {
            return Err(ReaderError::UnknownContig(region.to_string()));
        };
        let contig = header.contig(name)?;

        let parse = |s: &str| -> Result<i64, ReaderError> {
            s.replace(',', "")
                .parse::<i64>()
                .map_err(|_| ReaderError::invalid_range(region, format!("invalid coordinate '{s}'")))
        };

        let (beg, end) = match coords.split_once('-') {
            Some((beg, end)) => (parse(beg)?, parse(end)?),
            None => (parse(coords)?, to_signed(contig.n_bases)),
        };

        if beg < 1 {
            return Err(ReaderError::invalid_range(
                region,
                "region start is 1-based and must be at least 1",
            ));
        }

        Ok(Self::new(name, beg - 1, end))
    }
}

fn to_signed(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.end)
    }
}
