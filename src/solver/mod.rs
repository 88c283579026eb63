//! Backtracking dependency solver and plan selection.
//!
//! The solver walks the dependency graph of the requested packages depth
//! first, forking one branch per candidate provider wherever a dependency can
//! be satisfied in more than one way. Cycles, conflicts and unprovided
//! dependencies do not abort the search; they are recorded as soft
//! [`SolverProblem`](crate::types::SolverProblem)s and a branch that hit one
//! is abandoned only after the whole pass is over. When no branch survives a
//! pass, the driver widens the provider search around the problem packages
//! and retries.
//!
//! # Example
//!
//! ```
//! use aur_depsolve::{DependencySolver, Package, PackageKind, System};
//!
//! # fn main() -> aur_depsolve::Result<()> {
//! let installed = System::build([])?;
//! let upstream = System::build([
//!     Package::new("tool", "1.0-1", PackageKind::Aur).with_depends(&["lib"]),
//!     Package::new("lib", "2.0-1", PackageKind::Repo),
//! ])?;
//!
//! let requested = vec![upstream.get("tool").cloned().expect("tool is upstream")];
//! let resolution = DependencySolver::new(&installed, &upstream).solve(&requested)?;
//! assert_eq!(resolution.plans.len(), 1);
//! # Ok(())
//! # }
//! ```

mod resolve;
mod select;
mod solution;

pub use resolve::{DependencySolver, Resolution};
pub use select::{PlanAlternative, review_plan, select_plan};
