//! Case table error types
//!
//! A case table is finite and derived once, so every build error is a defect
//! in the classification rules and is reported instead of silently producing
//! a table with holes. Load and save errors cover the RON dump.

use std::fmt;
use std::io;

use amc_core::TopologyError;

/// Error building or validating a case table
#[derive(Debug, Clone, PartialEq)]
pub enum CaseTableError {
    /// Cube topology could not be derived
    Topology(TopologyError),
    /// A code with corners on both sides produced no triangles
    Unclassified(u8),
    /// Code 0 or 255 produced triangles
    UnexpectedGeometry(u8),
    /// A triangle names an edge outside the cube
    EdgeOutOfRange { code: u8, triangle: usize },
    /// A triangle winds against its reference normal
    WindingMismatch { code: u8, triangle: usize },
    /// A crossed edge is unused, or a triangle uses an edge that is not crossed
    EdgeMismatch { code: u8, edge: usize },
    /// A plane is capped without alternating corners, or alternates without a cap
    CapMismatch { code: u8, plane: usize },
    /// A capped plane has boundary segments that share no corner
    CapWithoutCorner { code: u8, plane: usize },
    /// A table does not hold exactly one entry per code, in order
    MalformedTable { index: usize, code: Option<u8> },
}

impl fmt::Display for CaseTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseTableError::Topology(err) => write!(f, "Topology error: {}", err),
            CaseTableError::Unclassified(code) => {
                write!(f, "Case {} crosses the surface but has no triangles", code)
            }
            CaseTableError::UnexpectedGeometry(code) => {
                write!(f, "Case {} has no crossing but produced triangles", code)
            }
            CaseTableError::EdgeOutOfRange { code, triangle } => write!(
                f,
                "Case {} triangle {} names an edge outside the cube",
                code, triangle
            ),
            CaseTableError::WindingMismatch { code, triangle } => write!(
                f,
                "Case {} triangle {} winds against its reference normal",
                code, triangle
            ),
            CaseTableError::EdgeMismatch { code, edge } => write!(
                f,
                "Case {} edge {} usage does not match its crossing",
                code, edge
            ),
            CaseTableError::CapMismatch { code, plane } => write!(
                f,
                "Case {} plane {} cap does not match its corner signs",
                code, plane
            ),
            CaseTableError::CapWithoutCorner { code, plane } => write!(
                f,
                "Case {} plane {} cap segments share no corner",
                code, plane
            ),
            CaseTableError::MalformedTable { index, code: Some(code) } => {
                write!(f, "Table entry {} holds case {}", index, code)
            }
            CaseTableError::MalformedTable { index, code: None } => {
                write!(f, "Table ends after {} entries, expected 256", index)
            }
        }
    }
}

impl std::error::Error for CaseTableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaseTableError::Topology(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TopologyError> for CaseTableError {
    fn from(err: TopologyError) -> Self {
        CaseTableError::Topology(err)
    }
}

/// Error loading a case table dump
#[derive(Debug)]
pub enum CaseTableLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
    /// The file parsed but does not describe a valid table
    Invalid(CaseTableError),
}

impl From<io::Error> for CaseTableLoadError {
    fn from(e: io::Error) -> Self {
        CaseTableLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for CaseTableLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        CaseTableLoadError::Parse(e)
    }
}

impl From<CaseTableError> for CaseTableLoadError {
    fn from(e: CaseTableError) -> Self {
        CaseTableLoadError::Invalid(e)
    }
}

impl fmt::Display for CaseTableLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseTableLoadError::Io(e) => write!(f, "IO error: {}", e),
            CaseTableLoadError::Parse(e) => write!(f, "Parse error: {}", e),
            CaseTableLoadError::Invalid(e) => write!(f, "Invalid case table: {}", e),
        }
    }
}

impl std::error::Error for CaseTableLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaseTableLoadError::Io(e) => Some(e),
            CaseTableLoadError::Parse(e) => Some(e),
            CaseTableLoadError::Invalid(e) => Some(e),
        }
    }
}

/// Error saving a case table dump
#[derive(Debug)]
pub enum CaseTableSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for CaseTableSaveError {
    fn from(e: io::Error) -> Self {
        CaseTableSaveError::Io(e)
    }
}

impl From<ron::Error> for CaseTableSaveError {
    fn from(e: ron::Error) -> Self {
        CaseTableSaveError::Serialize(e)
    }
}

impl fmt::Display for CaseTableSaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseTableSaveError::Io(e) => write!(f, "IO error: {}", e),
            CaseTableSaveError::Serialize(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for CaseTableSaveError {}
