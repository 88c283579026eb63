//! Interfaces to the collaborators the solver core does not own.
//!
//! The core never fetches metadata, queries the package database, or talks
//! to a terminal itself. Those concerns live behind the traits in this
//! module; [`mock`] ships in-memory implementations for tests and for
//! consumers that load their data elsewhere.

mod mock;

pub use mock::{MockRepoSource, MockUpstreamSource, ScriptedPrompt, SuffixDevelClassifier};

use crate::error::Result;
use crate::solver::PlanAlternative;
use crate::system::PlanSummary;
use crate::types::Package;

/// Loader for user-repository package metadata.
pub trait UpstreamSource {
    /// What: Load package records for `names`.
    ///
    /// Inputs:
    /// - `names`: Package names without version constraints.
    ///
    /// Output:
    /// - Records classified as AUR or devel. Unknown names are simply absent
    ///   from the result; that is not an error.
    ///
    /// # Errors
    ///
    /// - Implementation-defined transport or decoding failures.
    fn load(&self, names: &[String]) -> Result<Vec<Package>>;
}

/// Query interface over the binary repositories and the local package
/// database.
pub trait RepoSource {
    /// Sync-database records for `names`; all known records when `names` is
    /// empty.
    ///
    /// # Errors
    ///
    /// - Implementation-defined query failures.
    fn load_repo(&self, names: &[String]) -> Result<Vec<Package>>;

    /// Installed-package records with `required_by` populated; all installed
    /// records when `names` is empty.
    ///
    /// # Errors
    ///
    /// - Implementation-defined query failures.
    fn load_installed(&self, names: &[String]) -> Result<Vec<Package>>;
}

/// Decides whether a package name refers to a development package.
pub trait DevelClassifier {
    /// True if `name` names a package tracking a development branch.
    fn is_devel(&self, name: &str) -> bool;
}

/// Channel through which the caller's user answers solver questions.
///
/// Rendering and input handling are the implementor's concern; the core only
/// hands over structured values and re-asks when a choice is out of range.
pub trait PlanPrompt {
    /// Pick one of `alternatives` by index.
    fn choose_plan(&self, alternatives: &[PlanAlternative]) -> usize;

    /// Approve or reject the summarized plan.
    fn confirm_plan(&self, summary: &PlanSummary) -> bool;
}
