//! Dependency resolution core for Arch Linux AUR helpers.
//!
//! Given a set of requested packages, the currently installed system and an
//! upstream universe of available packages, this crate computes topologically
//! ordered installation plans that satisfy every dependency and conflict
//! constraint, detects cycles and unprovided dependencies, and helps the
//! caller pick among valid plans by diffing the hypothetical resulting
//! systems.
//!
//! The crate is deliberately self-contained: it never touches the network,
//! the package database or the terminal. Metadata comes in as [`Package`]
//! values (see the [`source`] traits for the expected collaborators), plans
//! and diagnostics come out as plain values.
//!
//! # Solving
//!
//! ```
//! use aur_depsolve::{DependencySolver, Package, PackageKind, System};
//!
//! # fn main() -> aur_depsolve::Result<()> {
//! let installed = System::build([])?;
//! let upstream = System::build([
//!     Package::new("paper-tool", "1.4.2-1", PackageKind::Aur)
//!         .with_depends(&["libpaper>=2"]),
//!     Package::new("libpaper", "2.1.0-1", PackageKind::Repo),
//! ])?;
//!
//! let requested = vec![upstream.get("paper-tool").cloned().expect("known package")];
//! let resolution = DependencySolver::new(&installed, &upstream).solve(&requested)?;
//!
//! let plan: Vec<&str> = resolution.plans[0].iter().map(|p| p.name.as_str()).collect();
//! assert_eq!(plan, ["libpaper", "paper-tool"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Choosing among plans
//!
//! ```
//! use aur_depsolve::solver::select_plan;
//! use aur_depsolve::source::ScriptedPrompt;
//! use aur_depsolve::{Package, PackageKind, System};
//!
//! # fn main() -> aur_depsolve::Result<()> {
//! let installed = System::build([])?;
//! let app = Package::new("app", "1-1", PackageKind::Aur);
//! let plans = vec![
//!     vec![Package::new("impl-a", "1-1", PackageKind::Aur), app.clone()],
//!     vec![Package::new("impl-b", "1-1", PackageKind::Aur), app.clone()],
//! ];
//!
//! let prompt = ScriptedPrompt::new().with_choice(1);
//! let chosen = select_plan(&installed, &plans, &[app], &prompt)?;
//! assert_eq!(chosen[0].name, "impl-b");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod solver;
pub mod source;
pub mod system;
pub mod types;
pub mod version;

/// Prelude module for convenient imports.
///
/// Re-exports the commonly used types and functions so a single
/// `use aur_depsolve::prelude::*;` is enough for most callers.
pub mod prelude;

// Re-export commonly used types
pub use error::{DepsolveError as Error, Result};
pub use solver::{DependencySolver, Resolution};
pub use system::System;
pub use types::{DependencyAtom, Package, PackageKind, SolverProblem, VersionOp};
