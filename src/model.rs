use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// One repository to harvest from, with the sets of documents to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryTask {
    pub name: String,
    pub base_url: String,       // OAI-PMH endpoint, without the query string
    pub metadata_prefix: String, // e.g. "oai_dc"
    pub destination: PathBuf,
    pub sets: Vec<OutputSet>,
}

impl RepositoryTask {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        metadata_prefix: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            metadata_prefix: metadata_prefix.into(),
            destination: destination.into(),
            sets: Vec::new(),
        }
    }

    pub fn with_set(mut self, set: OutputSet) -> Self {
        self.sets.push(set);
        self
    }

    /// Total number of identifiers across all sets.
    pub fn document_count(&self) -> usize {
        self.sets.iter().map(|s| s.identifiers.len()).sum()
    }
}

/// A named group of identifiers that share an output directory.
///
/// Identifiers are kept in a `BTreeSet`, so iteration is always in ascending
/// order and duplicates collapse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSet {
    pub name: String,
    pub identifiers: BTreeSet<String>,
}

impl OutputSet {
    pub fn new<I, S>(name: impl Into<String>, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            identifiers: identifiers.into_iter().map(Into::into).collect(),
        }
    }
}
