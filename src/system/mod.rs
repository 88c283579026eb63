//! Indexed package collections and queries over them.
//!
//! A [`System`] models one coherent set of packages, either the currently
//! installed system or the upstream universe the solver draws from. It keeps
//! three indexes: by name (unique), by provided name, and by conflict name,
//! and answers the two questions the solver asks constantly: "who provides
//! this atom?" and "who conflicts with this package?".

mod diff;
mod hypothetical;

pub use diff::{PlanSummary, SystemDelta, SystemDifferences, UpgradeEntry};

use std::collections::HashMap;

use crate::error::{DepsolveError, Result};
use crate::source::UpstreamSource;
use crate::types::{DependencyAtom, Package, VersionOp, strip_version};

/// An indexed collection of packages with unique names.
#[derive(Clone, Debug, Default)]
pub struct System {
    /// Name to package; at most one package per name.
    packages: HashMap<String, Package>,
    /// Provided name to the names of packages declaring that provide, in
    /// insertion order.
    provides: HashMap<String, Vec<String>>,
    /// Conflict name to the names of packages declaring that conflict, in
    /// insertion order.
    conflicts: HashMap<String, Vec<String>>,
}

impl System {
    /// What: Build a system from a collection of packages.
    ///
    /// Inputs:
    /// - `packages`: The member packages.
    ///
    /// Output:
    /// - The indexed system.
    ///
    /// # Errors
    ///
    /// - [`DepsolveError::DuplicatePackage`] when two packages share a name.
    /// - [`DepsolveError::InvalidInput`] when a package has an empty name.
    pub fn build(packages: impl IntoIterator<Item = Package>) -> Result<Self> {
        let mut system = Self::default();
        system.insert_all(packages)?;
        Ok(system)
    }

    /// What: Append packages to this system, updating all three indexes.
    ///
    /// Inputs:
    /// - `packages`: The packages to append.
    ///
    /// # Errors
    ///
    /// - [`DepsolveError::DuplicatePackage`] when a package's name is already
    ///   present; the name indexes stay unique.
    /// - [`DepsolveError::InvalidInput`] when a package has an empty name.
    pub fn insert_all(&mut self, packages: impl IntoIterator<Item = Package>) -> Result<()> {
        for package in packages {
            if package.name.is_empty() {
                return Err(DepsolveError::InvalidInput(
                    "package with empty name".to_string(),
                ));
            }
            if self.packages.contains_key(&package.name) {
                tracing::error!("package {package} already known");
                return Err(DepsolveError::DuplicatePackage(package.to_string()));
            }
            for provide in &package.provides {
                self.provides
                    .entry(provide.name.clone())
                    .or_default()
                    .push(package.name.clone());
            }
            for conflict in &package.conflicts {
                self.conflicts
                    .entry(conflict.name.clone())
                    .or_default()
                    .push(package.name.clone());
            }
            self.packages.insert(package.name.clone(), package);
        }
        Ok(())
    }

    /// Look up a member package by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Whether a package of that name is a member.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Number of member packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the system has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Iterate over the member packages (unspecified order).
    #[must_use]
    pub fn members(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// What: Resolve the providers of a dependency atom.
    ///
    /// Inputs:
    /// - `atom`: The dependency to provide.
    ///
    /// Output:
    /// - Providers in a fixed order: the same-named package first (when its
    ///   version passes the atom's predicate), then provides-index candidates
    ///   in insertion order. No duplicates.
    ///
    /// Details:
    /// - A versioned atom is satisfied through a provide entry in two ways:
    ///   an `=`-versioned provide whose declared version passes the predicate,
    ///   or an unversioned provide whose owner's version passes it. Upstream
    ///   metadata declares the relation both ways, so both are honored.
    #[must_use]
    pub fn provided_by(&self, atom: &DependencyAtom) -> Vec<&Package> {
        let mut found: Vec<&Package> = Vec::new();

        if let Some(package) = self.packages.get(&atom.name)
            && atom.accepts(&package.version)
        {
            found.push(package);
        }

        if let Some(provider_names) = self.provides.get(&atom.name) {
            for name in provider_names {
                let Some(candidate) = self.packages.get(name) else {
                    continue;
                };
                if found.contains(&candidate) {
                    continue;
                }
                for provide in &candidate.provides {
                    if provide.name != atom.name {
                        continue;
                    }
                    let satisfied = match atom.op {
                        VersionOp::Any => true,
                        _ if provide.op == VersionOp::Eq => atom.accepts(&provide.version),
                        _ if provide.op == VersionOp::Any => atom.accepts(&candidate.version),
                        _ => false,
                    };
                    if satisfied {
                        found.push(candidate);
                        break;
                    }
                }
            }
        }

        found
    }

    /// What: Find the member packages conflicting with `package`.
    ///
    /// Inputs:
    /// - `package`: The package to check; it need not be a member.
    ///
    /// Output:
    /// - Conflicting members, duplicates suppressed.
    ///
    /// Details:
    /// - A member with the same name but a different version always conflicts.
    /// - The package's own `conflicts` entries are matched against members,
    ///   and symmetrically members' `conflicts` entries are matched against
    ///   the package, since metadata may declare the relation on either side.
    #[must_use]
    pub fn conflicting_with(&self, package: &Package) -> Vec<&Package> {
        let mut found: Vec<&Package> = Vec::new();

        if let Some(existing) = self.packages.get(&package.name)
            && existing.version != package.version
        {
            found.push(existing);
        }

        for conflict in &package.conflicts {
            let Some(candidate) = self.packages.get(&conflict.name) else {
                continue;
            };
            if found.contains(&candidate) {
                continue;
            }
            if conflict.accepts(&candidate.version) {
                found.push(candidate);
            }
        }

        if let Some(declarer_names) = self.conflicts.get(&package.name) {
            for name in declarer_names {
                let Some(candidate) = self.packages.get(name) else {
                    continue;
                };
                if found.contains(&candidate) {
                    continue;
                }
                for conflict in &candidate.conflicts {
                    if conflict.name != package.name {
                        continue;
                    }
                    if conflict.accepts(&package.version) {
                        found.push(candidate);
                        break;
                    }
                }
            }
        }

        found
    }

    /// Whether every relevant dependency of `package` has at least one
    /// provider in this system.
    #[must_use]
    pub fn all_deps_satisfied(&self, package: &Package) -> bool {
        package
            .relevant_deps()
            .iter()
            .all(|dep| !self.provided_by(dep).is_empty())
    }

    /// What: Populate this system from an upstream source until dependency
    /// closure is reached.
    ///
    /// Inputs:
    /// - `source`: The upstream metadata loader.
    /// - `names`: Requested names, possibly versioned; versioning is stripped.
    ///
    /// Details:
    /// - Loads the missing names, inserts whatever the source knows, then
    ///   repeats over the fetched packages' relevant dependencies. Names the
    ///   source does not know simply drop out of the iteration.
    ///
    /// # Errors
    ///
    /// - Propagates source failures and duplicate-name insertions.
    pub fn extend_transitively(
        &mut self,
        source: &dyn UpstreamSource,
        names: &[String],
    ) -> Result<()> {
        let mut pending: Vec<String> = Vec::new();
        for name in names {
            let stripped = strip_version(name).to_string();
            if !self.contains(&stripped) && !pending.contains(&stripped) {
                pending.push(stripped);
            }
        }

        while !pending.is_empty() {
            let fetched = source.load(&pending)?;
            if fetched.is_empty() {
                break;
            }

            let mut dep_names: Vec<String> = Vec::new();
            for package in &fetched {
                for dep in package.relevant_deps() {
                    if !dep_names.contains(&dep.name) {
                        dep_names.push(dep.name.clone());
                    }
                }
            }
            self.insert_all(fetched)?;
            pending = dep_names
                .into_iter()
                .filter(|name| !self.contains(name))
                .collect();
        }
        Ok(())
    }
}
