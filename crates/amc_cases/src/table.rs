//! The immutable case table
//!
//! Built once by [`CaseTableBuilder`](crate::CaseTableBuilder) and shared by
//! every sweep. It can be dumped to and restored from RON for inspection.

use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;

use amc_core::Topology;

use crate::builder::validate_entry;
use crate::case::CaseEntry;
use crate::error::{CaseTableError, CaseTableLoadError, CaseTableSaveError};

/// Number of sign codes
pub const CASE_COUNT: usize = 256;

/// One validated entry per sign code, plus the topology it was built over
#[derive(Debug, Clone, PartialEq)]
pub struct CaseTable {
    topology: Topology,
    entries: Vec<CaseEntry>,
}

/// On-disk layout of a case table dump
#[derive(Serialize, Deserialize)]
struct CaseTableFile {
    cases: Vec<CaseEntry>,
}

impl CaseTable {
    /// Build the table with a freshly derived topology
    pub fn build() -> Result<Self, CaseTableError> {
        crate::CaseTableBuilder::new()?.build()
    }

    /// Wrap entries after checking there is exactly one valid entry per code
    pub fn from_entries(topology: Topology, entries: Vec<CaseEntry>) -> Result<Self, CaseTableError> {
        if entries.len() != CASE_COUNT {
            return Err(CaseTableError::MalformedTable {
                index: entries.len().min(CASE_COUNT),
                code: entries.get(CASE_COUNT).map(|e| e.code),
            });
        }
        for (index, entry) in entries.iter().enumerate() {
            if entry.code as usize != index {
                return Err(CaseTableError::MalformedTable { index, code: Some(entry.code) });
            }
            validate_entry(&topology, entry)?;
        }
        Ok(Self { topology, entries })
    }

    /// Topology the table was built over
    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Entry for a sign code
    #[inline]
    pub fn get(&self, code: u8) -> &CaseEntry {
        &self.entries[code as usize]
    }

    pub fn entries(&self) -> &[CaseEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaseEntry> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of template triangles over all cases
    pub fn total_triangles(&self) -> usize {
        self.entries.iter().map(CaseEntry::triangle_count).sum()
    }

    /// Largest triangle count of any single case
    pub fn max_triangles_per_case(&self) -> usize {
        self.entries.iter().map(CaseEntry::triangle_count).max().unwrap_or(0)
    }

    /// Number of cases requesting at least one cap
    pub fn capped_case_count(&self) -> usize {
        self.entries.iter().filter(|e| e.has_caps()).count()
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, CaseTableSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let file = CaseTableFile { cases: self.entries.clone() };
        Ok(ron::ser::to_string_pretty(&file, pretty)?)
    }

    /// Parse and validate a RON dump
    pub fn from_ron_str(contents: &str) -> Result<Self, CaseTableLoadError> {
        let file: CaseTableFile = ron::from_str(contents)?;
        let topology = Topology::new().map_err(CaseTableError::from)?;
        Ok(Self::from_entries(topology, file.cases)?)
    }

    /// Save the table to a RON file
    pub fn save_ron<P: AsRef<Path>>(&self, path: P) -> Result<(), CaseTableSaveError> {
        let contents = self.to_ron_string()?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Load a table from a RON file
    pub fn load_ron<P: AsRef<Path>>(path: P) -> Result<Self, CaseTableLoadError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }
}

impl<'a> IntoIterator for &'a CaseTable {
    type Item = &'a CaseEntry;
    type IntoIter = std::slice::Iter<'a, CaseEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
