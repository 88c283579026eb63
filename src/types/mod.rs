//! Shared data types for aur-depsolve.

pub mod atom;
pub mod package;
pub mod problem;

pub use atom::{DependencyAtom, VersionOp, strip_version};
pub use package::{Package, PackageKind};
pub use problem::SolverProblem;
