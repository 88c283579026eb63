//! Soft problem records produced while searching for installation plans.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::atom::DependencyAtom;
use crate::types::package::Package;

/// A problem encountered while expanding a dependency branch.
///
/// Problems are hypotheses, not failures: they are recorded while branches
/// are explored and dropped wholesale as soon as any valid branch survives.
/// Only when the whole search comes up empty do they reach the caller, and
/// their package names seed the adaptive widening retry in between.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverProblem {
    /// A dependency cycle among source-built packages.
    Cycle {
        /// The packages on the cycle in visit order; the package that closed
        /// the cycle appears both first and last.
        packages: Vec<Package>,
    },
    /// Packages that would have to coexist but conflict.
    Conflict {
        /// The mutually conflicting packages, sorted by name and version so
        /// equality behaves like set equality. Includes the package whose
        /// expansion closed the conflict.
        packages: Vec<Package>,
        /// Visited-package path from the first conflicting entry to the
        /// package that closed the conflict.
        path: Vec<Package>,
    },
    /// A dependency atom no package in the upstream universe provides.
    NotProvided {
        /// The unsatisfiable atom.
        atom: DependencyAtom,
        /// The package that requires it.
        required_by: Package,
    },
}

impl SolverProblem {
    /// Build a cycle record from the visited-path slice that closed on itself.
    #[must_use]
    pub const fn cycle(packages: Vec<Package>) -> Self {
        Self::Cycle { packages }
    }

    /// What: Build a conflict record.
    ///
    /// Inputs:
    /// - `packages`: The conflicting set, including the package that closed
    ///   the conflict.
    /// - `path`: The way to the conflict, ending in that same package.
    ///
    /// Details:
    /// - The set is sorted by name and version so two records over the same
    ///   packages compare and hash equal regardless of discovery order.
    #[must_use]
    pub fn conflict(mut packages: Vec<Package>, path: Vec<Package>) -> Self {
        packages.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version)));
        Self::Conflict { packages, path }
    }

    /// Build a record for a dependency nothing provides.
    #[must_use]
    pub const fn not_provided(atom: DependencyAtom, required_by: Package) -> Self {
        Self::NotProvided { atom, required_by }
    }

    /// What: The packages whose names seed the adaptive widening retry.
    ///
    /// Output:
    /// - Cycle and conflict problems yield their package sets; an unprovided
    ///   dependency yields the requiring package (not the atom itself).
    #[must_use]
    pub fn relevant_packages(&self) -> &[Package] {
        match self {
            Self::Cycle { packages } | Self::Conflict { packages, .. } => packages,
            Self::NotProvided { required_by, .. } => std::slice::from_ref(required_by),
        }
    }
}

/// Render a package list as `a-1 -> b-1 -> c-1`.
fn join_path(packages: &[Package]) -> String {
    packages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl fmt::Display for SolverProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cycle { packages } => {
                write!(f, "dependency cycle: {}", join_path(packages))
            }
            Self::Conflict { packages, path } => {
                let names = packages
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "conflict between {names}; way to conflict: {}", join_path(path))
            }
            Self::NotProvided { atom, required_by } => {
                write!(f, "{atom} is needed by {required_by} but nothing provides it")
            }
        }
    }
}
