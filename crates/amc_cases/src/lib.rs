//! Algorithmic marching cubes case table
//!
//! Rather than a hand-typed 256-row table, every sign configuration is
//! classified by a small set of topological rules and validated on
//! construction:
//!
//! - [`CaseTableBuilder`] - Runs the rules for all 256 codes
//! - [`CaseTable`] - Immutable result, one [`CaseEntry`] per code
//! - [`CaseEntry`] - Template triangles over cell edges plus cap requests
//! - [`CapSign`] - Three-state cap encoding per cell face
//! - [`CaseRules`] - Which rules produced a case (inspection only)

mod case;
mod rules;
mod builder;
mod table;
mod error;

pub use case::{CapSign, CaseEntry, CaseRules, CaseTriangle};
pub use builder::{CaseTableBuilder, template_normal};
pub use table::{CaseTable, CASE_COUNT};
pub use error::{CaseTableError, CaseTableLoadError, CaseTableSaveError};
