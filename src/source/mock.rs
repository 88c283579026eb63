//! In-memory implementations of the collaborator traits.
//!
//! These back the crate's own tests and give downstream users a way to drive
//! the solver from data they already have, without wiring up real fetchers.

use std::cell::Cell;
use std::collections::HashMap;

use crate::error::Result;
use crate::solver::PlanAlternative;
use crate::source::{DevelClassifier, PlanPrompt, RepoSource, UpstreamSource};
use crate::system::PlanSummary;
use crate::types::{Package, PackageKind};

/// An [`UpstreamSource`] backed by a package map.
#[derive(Clone, Debug, Default)]
pub struct MockUpstreamSource {
    /// Known packages by name.
    packages: HashMap<String, Package>,
}

impl MockUpstreamSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package to the source, replacing any previous one of that name.
    #[must_use]
    pub fn with_package(mut self, package: Package) -> Self {
        self.packages.insert(package.name.clone(), package);
        self
    }

    /// What: Reclassify AUR records the classifier flags as devel.
    ///
    /// Inputs:
    /// - `classifier`: The devel classification to apply.
    ///
    /// Details:
    /// - Mirrors what a real loader does when it turns raw upstream metadata
    ///   into records: `Aur` becomes `Devel` for flagged names, everything
    ///   else is untouched.
    #[must_use]
    pub fn classified(mut self, classifier: &dyn DevelClassifier) -> Self {
        for package in self.packages.values_mut() {
            if package.kind == PackageKind::Aur && classifier.is_devel(&package.name) {
                package.kind = PackageKind::Devel;
            }
        }
        self
    }
}

impl UpstreamSource for MockUpstreamSource {
    fn load(&self, names: &[String]) -> Result<Vec<Package>> {
        Ok(names
            .iter()
            .filter_map(|name| self.packages.get(name).cloned())
            .collect())
    }
}

/// A [`RepoSource`] backed by two package maps.
#[derive(Clone, Debug, Default)]
pub struct MockRepoSource {
    /// Sync-database records by name.
    repo: HashMap<String, Package>,
    /// Installed records by name.
    installed: HashMap<String, Package>,
}

impl MockRepoSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sync-database record.
    #[must_use]
    pub fn with_repo_package(mut self, package: Package) -> Self {
        self.repo.insert(package.name.clone(), package);
        self
    }

    /// Add an installed record.
    #[must_use]
    pub fn with_installed_package(mut self, package: Package) -> Self {
        self.installed.insert(package.name.clone(), package);
        self
    }
}

/// Select from a map by names, or everything (name-sorted) for empty names.
fn select(map: &HashMap<String, Package>, names: &[String]) -> Vec<Package> {
    if names.is_empty() {
        let mut all: Vec<Package> = map.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    } else {
        names
            .iter()
            .filter_map(|name| map.get(name).cloned())
            .collect()
    }
}

impl RepoSource for MockRepoSource {
    fn load_repo(&self, names: &[String]) -> Result<Vec<Package>> {
        Ok(select(&self.repo, names))
    }

    fn load_installed(&self, names: &[String]) -> Result<Vec<Package>> {
        Ok(select(&self.installed, names))
    }
}

/// A [`DevelClassifier`] flagging names by suffix (`-git`, `-svn`, ...).
#[derive(Clone, Debug)]
pub struct SuffixDevelClassifier {
    /// Suffixes that mark a development package.
    suffixes: Vec<String>,
}

impl SuffixDevelClassifier {
    /// Create a classifier with the usual VCS suffixes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            suffixes: ["-bzr", "-cvs", "-git", "-hg", "-svn", "-nightly"]
                .iter()
                .map(|suffix| (*suffix).to_string())
                .collect(),
        }
    }

    /// Add a custom suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffixes.push(suffix.into());
        self
    }
}

impl Default for SuffixDevelClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DevelClassifier for SuffixDevelClassifier {
    fn is_devel(&self, name: &str) -> bool {
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }
}

/// A [`PlanPrompt`] answering from a script.
///
/// Choices are consumed in order; once the script is exhausted every further
/// question is answered with `0`. Confirmation always answers the configured
/// value (`true` by default).
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    /// Answers for [`PlanPrompt::choose_plan`], in order.
    choices: Vec<usize>,
    /// Position of the next scripted choice.
    cursor: Cell<usize>,
    /// Answer [`PlanPrompt::confirm_plan`] with `false`.
    decline: bool,
}

impl ScriptedPrompt {
    /// Create a prompt that confirms everything and picks index 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scripted answer for the next choice question.
    #[must_use]
    pub fn with_choice(mut self, choice: usize) -> Self {
        self.choices.push(choice);
        self
    }

    /// Set the confirmation answer.
    #[must_use]
    pub const fn with_confirm(mut self, confirm: bool) -> Self {
        self.decline = !confirm;
        self
    }
}

impl PlanPrompt for ScriptedPrompt {
    fn choose_plan(&self, _alternatives: &[PlanAlternative]) -> usize {
        let position = self.cursor.get();
        self.cursor.set(position + 1);
        self.choices.get(position).copied().unwrap_or(0)
    }

    fn confirm_plan(&self, _summary: &PlanSummary) -> bool {
        !self.decline
    }
}
