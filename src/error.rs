//! Unified error type for aur-depsolve.

use thiserror::Error;

use crate::types::SolverProblem;

/// Unified error type for all aur-depsolve operations.
///
/// Soft solver problems (cycles, conflicts, unprovided dependencies) are not
/// errors: they are [`SolverProblem`] values carried alongside the search
/// results, and only end up in [`DepsolveError::NoValidPlan`] once the search
/// has exhausted every alternative.
#[derive(Error, Debug)]
pub enum DepsolveError {
    /// Two packages with the same name were inserted into one system.
    #[error("package {0} is already known")]
    DuplicatePackage(String),

    /// Malformed package record or request.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The solver exhausted adaptive widening without a surviving plan.
    #[error("no valid installation plan found ({} problem(s) recorded)", .problems.len())]
    NoValidPlan {
        /// Problems accumulated during the final widening pass.
        problems: Vec<SolverProblem>,
    },

    /// Every candidate plan loses a required package under hypothetical install.
    #[error("no solution keeps all required packages installed")]
    NoRequiredPresent,

    /// The user rejected the proposed installation plan.
    #[error("user declined the installation plan")]
    UserDeclined,
}

/// Result type alias for aur-depsolve operations.
pub type Result<T> = std::result::Result<T, DepsolveError>;
