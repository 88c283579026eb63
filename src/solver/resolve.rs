//! Recursive dependency expansion and the adaptive widening driver.

use std::collections::HashSet;

use crate::error::{DepsolveError, Result};
use crate::system::System;
use crate::types::{Package, PackageKind, SolverProblem};

use super::solution::Solution;

/// Outcome of a [`DependencySolver::solve`] run.
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    /// Surviving installation plans. Each plan is post-order: a package
    /// appears after everything it depends on.
    pub plans: Vec<Vec<Package>>,
    /// Problems from the final pass. Empty whenever at least one plan
    /// survived; problems along paths that had an alternative are not real.
    pub problems: Vec<SolverProblem>,
}

impl Resolution {
    /// What: Unwrap the plans, turning an empty result into an error.
    ///
    /// Output:
    /// - The plan list when at least one plan survived.
    ///
    /// # Errors
    ///
    /// - [`DepsolveError::NoValidPlan`] carrying the accumulated problems
    ///   when the search came up empty.
    pub fn require_plans(self) -> Result<Vec<Vec<Package>>> {
        if self.plans.is_empty() {
            Err(DepsolveError::NoValidPlan {
                problems: self.problems,
            })
        } else {
            Ok(self.plans)
        }
    }
}

/// Recursive backtracking solver over an installed system and an upstream
/// universe.
///
/// The solver is read-only over both systems and keeps no state between
/// [`solve`](Self::solve) calls.
#[derive(Clone, Copy, Debug)]
pub struct DependencySolver<'a> {
    /// The currently installed system.
    installed: &'a System,
    /// The universe of packages available for installation.
    upstream: &'a System,
    /// Skip dependencies the installed system already satisfies.
    only_unfulfilled: bool,
}

impl<'a> DependencySolver<'a> {
    /// Create a solver. By default dependencies already satisfied by the
    /// installed system are skipped.
    #[must_use]
    pub const fn new(installed: &'a System, upstream: &'a System) -> Self {
        Self {
            installed,
            upstream,
            only_unfulfilled: true,
        }
    }

    /// Control whether dependencies already satisfied by the installed
    /// system are skipped (`true`, the default) or re-resolved upstream.
    #[must_use]
    pub const fn only_unfulfilled(mut self, value: bool) -> Self {
        self.only_unfulfilled = value;
        self
    }

    /// What: Compute topologically ordered installation plans for `requested`.
    ///
    /// Inputs:
    /// - `requested`: Packages to install, expanded in order.
    ///
    /// Output:
    /// - A [`Resolution`]: the surviving plans, or the problems of the final
    ///   pass when none survived.
    ///
    /// Details:
    /// - Each requested package is expanded against every live branch; the
    ///   branch list is replaced by the concatenation of the results.
    /// - When a pass ends with no valid branch, the provider search is
    ///   widened around the names of the packages involved in the recorded
    ///   problems and the pass restarts. The widening set grows monotonically
    ///   and is bounded by the upstream universe, so the driver terminates.
    ///
    /// # Errors
    ///
    /// - Propagates fatal input errors (duplicate names while indexing a
    ///   branch path).
    pub fn solve(&self, requested: &[Package]) -> Result<Resolution> {
        let mut branches = vec![Solution::default()];
        let mut problems: Vec<SolverProblem> = Vec::new();
        let mut deep_check: HashSet<String> = HashSet::new();

        loop {
            for package in requested {
                let mut expanded = Vec::new();
                for branch in &branches {
                    expanded.extend(self.expand(package, branch, &mut problems, &deep_check)?);
                }
                branches = expanded;
            }

            branches.retain(|branch| branch.is_valid);
            if !branches.is_empty() {
                break;
            }

            // force every provider of the problem packages to be considered
            let before = deep_check.len();
            for problem in &problems {
                for package in problem.relevant_packages() {
                    deep_check.insert(package.name.clone());
                }
            }
            if deep_check.len() == before {
                break;
            }
            tracing::debug!(
                "no branch survived, retrying with {} deep-check name(s)",
                deep_check.len()
            );
            problems.clear();
            branches = vec![Solution::default()];
        }

        if branches.is_empty() {
            tracing::warn!(
                "no valid plan found, {} problem(s) recorded",
                problems.len()
            );
        } else {
            // surviving branches prove the recorded problems had a way around
            problems.clear();
        }

        Ok(Resolution {
            plans: branches.into_iter().map(|branch| branch.packages).collect(),
            problems,
        })
    }

    /// What: Expand one package on one branch, forking per provider choice.
    ///
    /// Output:
    /// - The branches replacing `branch`. May contain invalid branches; the
    ///   driver filters them at the end of the pass.
    #[allow(clippy::too_many_lines)]
    fn expand(
        &self,
        package: &Package,
        branch: &Solution,
        problems: &mut Vec<SolverProblem>,
        deep_check: &HashSet<String>,
    ) -> Result<Vec<Solution>> {
        if branch.packages.contains(package) {
            return Ok(vec![branch.clone()]);
        }

        if branch.visited_packages.contains(package) {
            // repo metadata occasionally carries benign mutual dependencies;
            // those never count as cycles and never trigger backtracking
            if package.kind == PackageKind::Repo {
                return Ok(vec![branch.clone()]);
            }
            if branch.is_valid
                && let Some(start) = branch.visited_packages.iter().position(|p| p == package)
            {
                let mut cycle = branch.visited_packages[start..].to_vec();
                cycle.push(package.clone());
                push_problem(problems, SolverProblem::cycle(cycle));
            }
            return Ok(Vec::new());
        }

        // conflicts against everything already on the path
        let path_system = System::build(branch.visited_packages.iter().cloned())?;
        let conflicting: Vec<Package> = path_system
            .conflicting_with(package)
            .into_iter()
            .cloned()
            .collect();
        let is_conflict = !conflicting.is_empty();
        if is_conflict && branch.is_valid {
            let first = branch
                .visited_packages
                .iter()
                .position(|p| conflicting.contains(p))
                .unwrap_or(0);
            let mut path = branch.visited_packages[first..].to_vec();
            path.push(package.clone());
            let mut packages = conflicting;
            packages.push(package.clone());
            push_problem(problems, SolverProblem::conflict(packages, path));
        }

        let mut forked = branch.clone();
        forked.visited_packages.push(package.clone());
        if is_conflict {
            // keep expanding anyway so later problems still get recorded
            forked.is_valid = false;
        }
        let mut current = vec![forked];

        // AND: every dependency has to be fulfilled
        for dep in package.relevant_deps() {
            if self.only_unfulfilled && !self.installed.provided_by(dep).is_empty() {
                continue;
            }

            let dep_key = dep.to_string();
            let mut providers = self.upstream.provided_by(dep);

            if providers.is_empty() {
                push_problem(
                    problems,
                    SolverProblem::not_provided(dep.clone(), package.clone()),
                );
                for solution in &mut current {
                    if !solution.visited_atoms.contains(&dep_key) {
                        solution.is_valid = false;
                        solution.visited_atoms.insert(dep_key.clone());
                    }
                }
            }

            // prefer the exact-named provider unless this dependency was
            // flagged for a deep check by a widening pass
            if !deep_check.contains(&dep_key)
                && providers.iter().any(|provider| provider.name == dep.name)
            {
                providers.retain(|provider| provider.name == dep.name);
            }

            // OR: at least one provider has to make it into each branch
            let mut finished = Vec::new();
            let mut pending = Vec::new();
            for mut solution in current {
                if solution.visited_atoms.contains(&dep_key) {
                    finished.push(solution);
                    continue;
                }
                solution.visited_atoms.insert(dep_key.clone());
                let chosen = System::build(solution.packages.iter().cloned())?;
                if chosen.provided_by(dep).is_empty() {
                    pending.push(solution);
                } else {
                    // something already selected on this branch provides it
                    finished.push(solution);
                }
            }

            current = finished;
            for solution in pending {
                for provider in &providers {
                    current.extend(self.expand(provider, &solution, problems, deep_check)?);
                }
            }
        }

        // any branch that stayed valid proves the recorded problems had a
        // way around them
        if current.iter().any(|solution| solution.is_valid) {
            problems.clear();
        }

        // the only place a package enters a plan, which keeps plans post-order
        for solution in &mut current {
            solution.packages.push(package.clone());
        }

        Ok(current)
    }
}

/// Record a problem unless an equal one is already known.
fn push_problem(problems: &mut Vec<SolverProblem>, problem: SolverProblem) {
    if !problems.contains(&problem) {
        tracing::debug!("recorded problem: {problem}");
        problems.push(problem);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DependencyAtom, PackageKind};

    fn repo(name: &str, version: &str) -> Package {
        Package::new(name, version, PackageKind::Repo)
    }

    fn aur(name: &str, version: &str) -> Package {
        Package::new(name, version, PackageKind::Aur)
    }

    fn plan_names(plan: &[Package]) -> Vec<&str> {
        plan.iter().map(|p| p.name.as_str()).collect()
    }

    fn solve(universe: Vec<Package>, requested: &[&str]) -> Resolution {
        let installed = System::build([]).expect("empty system");
        let upstream = System::build(universe).expect("valid universe");
        let requested: Vec<Package> = requested
            .iter()
            .map(|name| upstream.get(name).cloned().expect("requested is upstream"))
            .collect();
        DependencySolver::new(&installed, &upstream)
            .solve(&requested)
            .expect("solver run")
    }

    #[test]
    fn chain_resolves_in_post_order() {
        let resolution = solve(
            vec![
                aur("a", "1").with_depends(&["b"]),
                aur("b", "1").with_depends(&["c"]),
                aur("c", "1"),
            ],
            &["a"],
        );

        assert_eq!(resolution.plans.len(), 1);
        assert_eq!(plan_names(&resolution.plans[0]), ["c", "b", "a"]);
        assert!(resolution.problems.is_empty());
    }

    #[test]
    fn provider_choice_forks_branches() {
        let resolution = solve(
            vec![
                aur("a", "1").with_depends(&["x"]),
                repo("p1", "1").with_provides(&["x"]),
                repo("p2", "1").with_provides(&["x"]),
            ],
            &["a"],
        );

        assert_eq!(resolution.plans.len(), 2);
        for plan in &resolution.plans {
            assert_eq!(plan.len(), 2);
            assert_eq!(plan[1].name, "a");
            assert!(plan[0].name == "p1" || plan[0].name == "p2");
        }
        // providers are tried in insertion order
        assert_eq!(resolution.plans[0][0].name, "p1");
        assert_eq!(resolution.plans[1][0].name, "p2");
    }

    #[test]
    fn conflict_kills_the_only_branch() {
        let resolution = solve(
            vec![
                aur("a", "1").with_depends(&["b"]),
                aur("b", "1").with_conflicts(&["c"]),
                aur("c", "1"),
                aur("d", "1").with_depends(&["b", "c"]),
            ],
            &["d"],
        );

        assert!(resolution.plans.is_empty());
        assert!(resolution.problems.iter().any(|problem| {
            match problem {
                SolverProblem::Conflict { packages, .. } => {
                    let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
                    names.contains(&"b") && names.contains(&"c")
                }
                _ => false,
            }
        }));
    }

    #[test]
    fn cycle_among_source_packages_is_reported() {
        let resolution = solve(
            vec![
                aur("a", "1").with_depends(&["b"]),
                aur("b", "1").with_depends(&["a"]),
            ],
            &["a"],
        );

        assert!(resolution.plans.is_empty());
        let cycle = resolution
            .problems
            .iter()
            .find_map(|problem| match problem {
                SolverProblem::Cycle { packages } => Some(packages),
                _ => None,
            })
            .expect("a cycle problem");
        assert_eq!(plan_names(cycle), ["a", "b", "a"]);
    }

    #[test]
    fn cycle_among_repo_packages_is_tolerated() {
        let resolution = solve(
            vec![
                repo("mesa", "1").with_depends(&["libglvnd"]),
                repo("libglvnd", "1").with_depends(&["mesa"]),
            ],
            &["mesa"],
        );

        assert_eq!(resolution.plans.len(), 1);
        assert!(resolution.problems.is_empty());
        assert_eq!(plan_names(&resolution.plans[0]), ["libglvnd", "mesa"]);
    }

    #[test]
    fn version_constraint_picks_the_matching_provider() {
        let resolution = solve(
            vec![
                aur("a", "1").with_depends(&["b>=2"]),
                repo("b-old", "1").with_provides(&["b=1"]),
                repo("b", "2"),
            ],
            &["a"],
        );

        assert_eq!(resolution.plans.len(), 1);
        let plan = &resolution.plans[0];
        assert_eq!(plan_names(plan), ["b", "a"]);
        assert_eq!(plan[0].version, "2");
    }

    #[test]
    fn unprovided_dep_is_reported() {
        let resolution = solve(vec![aur("a", "1").with_depends(&["ghost>=1"])], &["a"]);

        assert!(resolution.plans.is_empty());
        assert_eq!(resolution.problems.len(), 1);
        match &resolution.problems[0] {
            SolverProblem::NotProvided { atom, required_by } => {
                assert_eq!(atom, &DependencyAtom::parse("ghost>=1"));
                assert_eq!(required_by.name, "a");
            }
            other => panic!("expected NotProvided, got {other}"),
        }
    }

    #[test]
    fn installed_deps_are_skipped_when_only_unfulfilled() {
        let installed = System::build([repo("b", "1")]).expect("installed");
        let upstream =
            System::build([aur("a", "1").with_depends(&["b"])]).expect("upstream");
        let requested = vec![upstream.get("a").cloned().expect("a is upstream")];

        let resolution = DependencySolver::new(&installed, &upstream)
            .solve(&requested)
            .expect("solver run");
        assert_eq!(resolution.plans.len(), 1);
        assert_eq!(plan_names(&resolution.plans[0]), ["a"]);
    }

    #[test]
    fn full_resolution_without_only_unfulfilled() {
        let installed = System::build([repo("b", "1")]).expect("installed");
        let upstream = System::build([
            aur("a", "1").with_depends(&["b"]),
            repo("b", "1"),
        ])
        .expect("upstream");
        let requested = vec![upstream.get("a").cloned().expect("a is upstream")];

        let resolution = DependencySolver::new(&installed, &upstream)
            .only_unfulfilled(false)
            .solve(&requested)
            .expect("solver run");
        assert_eq!(resolution.plans.len(), 1);
        assert_eq!(plan_names(&resolution.plans[0]), ["b", "a"]);
    }

    #[test]
    fn widening_recovers_from_a_bad_exact_name_match() {
        // the exact-named provider conflicts with the requester; only the
        // deep-check retry considers the alternative provider
        let resolution = solve(
            vec![
                aur("app", "1").with_depends(&["plugin"]),
                aur("plugin", "1").with_conflicts(&["app"]),
                aur("plugin-compat", "1").with_provides(&["plugin"]),
            ],
            &["app"],
        );

        assert_eq!(resolution.plans.len(), 1);
        assert_eq!(
            plan_names(&resolution.plans[0]),
            ["plugin-compat", "app"]
        );
        assert!(resolution.problems.is_empty());
    }

    #[test]
    fn widening_gives_up_when_nothing_grows() {
        let resolution = solve(
            vec![
                aur("a", "1").with_depends(&["b"]),
                aur("b", "1").with_conflicts(&["a"]),
            ],
            &["a"],
        );

        assert!(resolution.plans.is_empty());
        assert!(!resolution.problems.is_empty());
    }

    #[test]
    fn problems_are_suppressed_when_any_plan_survives() {
        // one provider conflicts, the other succeeds; the conflict problem
        // must not be visible afterwards
        let resolution = solve(
            vec![
                aur("app", "1").with_depends(&["plugin"]),
                aur("bad-plugin", "1")
                    .with_provides(&["plugin"])
                    .with_conflicts(&["app"]),
                aur("good-plugin", "1").with_provides(&["plugin"]),
            ],
            &["app"],
        );

        assert!(!resolution.plans.is_empty());
        assert!(resolution.problems.is_empty());
    }

    #[test]
    fn shared_dep_is_selected_once() {
        let resolution = solve(
            vec![
                aur("a", "1").with_depends(&["common"]),
                aur("b", "1").with_depends(&["common"]),
                repo("common", "1"),
            ],
            &["a", "b"],
        );

        assert_eq!(resolution.plans.len(), 1);
        assert_eq!(plan_names(&resolution.plans[0]), ["common", "a", "b"]);
    }

    #[test]
    fn make_and_check_depends_count_for_source_packages() {
        let resolution = solve(
            vec![
                aur("tool", "1")
                    .with_depends(&["runtime"])
                    .with_make_depends(&["builder"])
                    .with_check_depends(&["tester"]),
                repo("runtime", "1"),
                repo("builder", "1"),
                repo("tester", "1"),
            ],
            &["tool"],
        );

        assert_eq!(resolution.plans.len(), 1);
        assert_eq!(
            plan_names(&resolution.plans[0]),
            ["runtime", "builder", "tester", "tool"]
        );
    }

    #[test]
    fn require_plans_surfaces_problems() {
        let resolution = solve(vec![aur("a", "1").with_depends(&["ghost"])], &["a"]);
        match resolution.require_plans() {
            Err(DepsolveError::NoValidPlan { problems }) => assert_eq!(problems.len(), 1),
            other => panic!("expected NoValidPlan, got {other:?}"),
        }
    }
}
