//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```
//! use aur_depsolve::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let upstream = System::build([Package::new("tool", "1-1", PackageKind::Aur)])?;
//! assert!(upstream.contains("tool"));
//! # Ok(())
//! # }
//! ```

// Error handling
pub use crate::error::{DepsolveError as Error, Result};

// Data model
pub use crate::types::{DependencyAtom, Package, PackageKind, SolverProblem, VersionOp};

// Systems and diffs
pub use crate::system::{PlanSummary, System, SystemDelta, SystemDifferences, UpgradeEntry};

// Solver
pub use crate::solver::{DependencySolver, PlanAlternative, Resolution, review_plan, select_plan};

// Collaborator traits and their in-memory implementations
pub use crate::source::{
    DevelClassifier, MockRepoSource, MockUpstreamSource, PlanPrompt, RepoSource, ScriptedPrompt,
    SuffixDevelClassifier, UpstreamSource,
};

// Version arithmetic
pub use crate::version::{compare_versions, version_matches};
