use serde::Serialize;
use std::collections::HashMap;

use crate::core::contig::Contig;
use crate::error::ReaderError;

/// The ordered set of contigs exposed by a reader
#[derive(Debug, Clone, Default, Serialize)]
pub struct Header {
    /// All contigs, in declaration order
    pub contigs: Vec<Contig>,

    /// Index: contig name -> position in `contigs`
    #[serde(skip)]
    name_to_index: HashMap<String, usize>,
}

impl Header {
    /// Build a header from contigs, rejecting repeated names
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::DuplicateContig` if two contigs share a name.
    pub fn new(contigs: Vec<Contig>) -> Result<Self, ReaderError> {
        let mut name_to_index = HashMap::with_capacity(contigs.len());
        for (index, contig) in contigs.iter().enumerate() {
            if name_to_index.insert(contig.name.clone(), index).is_some() {
                return Err(ReaderError::DuplicateContig(contig.name.clone()));
            }
        }

        Ok(Self {
            contigs,
            name_to_index,
        })
    }

    /// Look up a contig by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Contig> {
        self.name_to_index.get(name).map(|&index| &self.contigs[index])
    }

    /// Look up a contig by name, failing if it is absent
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::UnknownContig` if no contig has this name.
    pub fn contig(&self, name: &str) -> Result<&Contig, ReaderError> {
        self.get(name)
            .ok_or_else(|| ReaderError::UnknownContig(name.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    /// Total number of bases across all contigs
    #[must_use]
    pub fn total_bases(&self) -> u64 {
        self.contigs.iter().map(|c| c.n_bases).sum()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contigs.iter().map(|c| c.name.as_str())
    }
}
