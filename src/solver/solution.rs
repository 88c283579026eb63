//! Branch state for the dependency search.

use std::collections::HashSet;

use crate::types::Package;

/// One branch of the dependency search.
///
/// Forking a branch is a plain `clone`; branches never share mutable state,
/// so each recursive call operates on an independent snapshot.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Confirmed selections in post-order: every package appears after
    /// everything it depends on.
    pub packages: Vec<Package>,
    /// The current DFS path plus already-selected packages, in visit order.
    /// Used for cycle and conflict detection.
    pub visited_packages: Vec<Package>,
    /// Rendered atoms already satisfied (or declared unsatisfiable) on this
    /// branch, preventing re-expansion.
    pub visited_atoms: HashSet<String>,
    /// Cleared when the branch hits a conflict or an unprovided dependency.
    /// Invalid branches keep expanding so later problems still get recorded;
    /// they are discarded at the end of the pass.
    pub is_valid: bool,
}

impl Default for Solution {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            visited_packages: Vec::new(),
            visited_atoms: HashSet::new(),
            is_valid: true,
        }
    }
}
