use thiserror::Error;

/// Errors raised while opening or querying a reference reader.
///
/// Every variant is a distinct failure kind; none of them is retried or
/// downgraded inside the library.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// The contig name is not present in the header or index
    #[error("Unknown contig: {0}")]
    UnknownContig(String),

    /// The range violates `0 <= start <= end <= n_bases`, or falls outside the
    /// bases actually loaded for an in-memory fragment
    #[error("Invalid range {range}: {reason}")]
    InvalidRange { range: String, reason: String },

    /// The `.fai` or `.gzi` index is structurally invalid
    #[error("Malformed index {source_name}: {reason}")]
    MalformedIndex { source_name: String, reason: String },

    /// Two in-memory records were supplied for the same contig
    #[error("Expected exactly one record per contig but multiple ones were found on {0}")]
    DuplicateContig(String),

    /// The operation is structurally impossible for this reader
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Fewer (or different) bases were recovered than the range implies
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// The backing store could not be read, or a compressed block is corrupt
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is compressed but cannot be randomly accessed
    #[error("Unsupported compression: {0}")]
    UnsupportedCompression(String),
}

impl ReaderError {
    pub(crate) fn invalid_range(range: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            range: range.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_index(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIndex {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}
