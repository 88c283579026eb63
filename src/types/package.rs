//! Package records for dependency resolution.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::types::atom::DependencyAtom;

/// Where a package record comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageKind {
    /// Binary repository package.
    Repo,
    /// User-repository package built from source.
    Aur,
    /// User-repository package tracking a development branch.
    Devel,
    /// Installed package known to neither the repositories nor the AUR.
    Foreign,
}

impl PackageKind {
    /// Whether packages of this kind are built from source, which makes their
    /// build- and check-time dependencies relevant for resolution.
    #[must_use]
    pub const fn is_source_built(self) -> bool {
        matches!(self, Self::Aur | Self::Devel)
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repo => write!(f, "repo"),
            Self::Aur => write!(f, "aur"),
            Self::Devel => write!(f, "devel"),
            Self::Foreign => write!(f, "foreign"),
        }
    }
}

/// One package as the solver sees it.
///
/// Identity is the `(name, version)` pair: equality and hashing ignore every
/// other field, so two records of the same package compare equal even when
/// one side carries richer metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Package {
    /// Package name, unique within a system.
    pub name: String,
    /// Version string, ordered by [`compare_versions`](crate::version::compare_versions).
    pub version: String,
    /// Classification of the package.
    pub kind: PackageKind,
    /// Runtime dependencies.
    pub depends: Vec<DependencyAtom>,
    /// Build-time dependencies (source-built packages only).
    pub make_depends: Vec<DependencyAtom>,
    /// Check-time dependencies (source-built packages only).
    pub check_depends: Vec<DependencyAtom>,
    /// Packages this one cannot coexist with. Never contains the package itself.
    pub conflicts: Vec<DependencyAtom>,
    /// Virtual names this package provides.
    pub provides: Vec<DependencyAtom>,
    /// Packages this one replaces.
    pub replaces: Vec<DependencyAtom>,
    /// Build-tree group key for source packages; equals `name` when the
    /// package is not part of a split build.
    pub base_name: String,
    /// Names of installed packages that require this one. Only populated for
    /// installed packages.
    pub required_by: Vec<String>,
}

impl Package {
    /// What: Create a package record with empty relation lists.
    ///
    /// Inputs:
    /// - `name`: Package name.
    /// - `version`: Version string.
    /// - `kind`: Package classification.
    ///
    /// Output:
    /// - A record with `base_name == name` and no dependencies, conflicts,
    ///   provides or replaces.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>, kind: PackageKind) -> Self {
        let name = name.into();
        Self {
            base_name: name.clone(),
            name,
            version: version.into(),
            kind,
            depends: Vec::new(),
            make_depends: Vec::new(),
            check_depends: Vec::new(),
            conflicts: Vec::new(),
            provides: Vec::new(),
            replaces: Vec::new(),
            required_by: Vec::new(),
        }
    }

    /// Parse a list of raw dependency specifications.
    fn parse_atoms(specs: &[&str]) -> Vec<DependencyAtom> {
        specs.iter().map(|spec| DependencyAtom::parse(spec)).collect()
    }

    /// Set the runtime dependencies from raw specifications.
    #[must_use]
    pub fn with_depends(mut self, specs: &[&str]) -> Self {
        self.depends = Self::parse_atoms(specs);
        self
    }

    /// Set the build-time dependencies from raw specifications.
    #[must_use]
    pub fn with_make_depends(mut self, specs: &[&str]) -> Self {
        self.make_depends = Self::parse_atoms(specs);
        self
    }

    /// Set the check-time dependencies from raw specifications.
    #[must_use]
    pub fn with_check_depends(mut self, specs: &[&str]) -> Self {
        self.check_depends = Self::parse_atoms(specs);
        self
    }

    /// Set the conflicts from raw specifications. A package never conflicts
    /// with itself, so entries naming the package are dropped.
    #[must_use]
    pub fn with_conflicts(mut self, specs: &[&str]) -> Self {
        self.conflicts = Self::parse_atoms(specs)
            .into_iter()
            .filter(|atom| atom.name != self.name)
            .collect();
        self
    }

    /// Set the provided virtual names from raw specifications.
    #[must_use]
    pub fn with_provides(mut self, specs: &[&str]) -> Self {
        self.provides = Self::parse_atoms(specs);
        self
    }

    /// Set the replaced packages from raw specifications.
    #[must_use]
    pub fn with_replaces(mut self, specs: &[&str]) -> Self {
        self.replaces = Self::parse_atoms(specs);
        self
    }

    /// Set the build-tree group key.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_name = base.into();
        self
    }

    /// Set the reverse-dependency names (installed packages only).
    #[must_use]
    pub fn with_required_by(mut self, names: &[&str]) -> Self {
        self.required_by = names.iter().map(|name| (*name).to_string()).collect();
        self
    }

    /// What: The dependencies that matter for resolving this package.
    ///
    /// Output:
    /// - `depends`, then `make_depends`, then `check_depends` for source-built
    ///   packages; `depends` alone otherwise.
    ///
    /// Details:
    /// - Declaration order is preserved; duplicates are tolerated, the solver
    ///   handles them.
    #[must_use]
    pub fn relevant_deps(&self) -> Vec<&DependencyAtom> {
        if self.kind.is_source_built() {
            self.depends
                .iter()
                .chain(&self.make_depends)
                .chain(&self.check_depends)
                .collect()
        } else {
            self.depends.iter().collect()
        }
    }
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version
    }
}

impl Eq for Package {}

impl Hash for Package {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version.hash(state);
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}
