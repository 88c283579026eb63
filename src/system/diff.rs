//! Set differences between candidate resulting systems.
//!
//! When several plans survive, the caller disambiguates them by what they do
//! to the installed system: the part every plan does (common) and the part
//! only some plans do (unique per plan). A single chosen plan is summarized
//! as install / remove / upgrade / reinstall partitions for display.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::system::System;
use crate::types::Package;

/// Packages a candidate system gains and loses relative to a base system.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemDelta {
    /// Present in the candidate, absent from the base system.
    pub installed: HashSet<Package>,
    /// Present in the base system, absent from the candidate.
    pub removed: HashSet<Package>,
}

impl SystemDelta {
    /// Whether the delta changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.installed.is_empty() && self.removed.is_empty()
    }
}

/// Differences between a base system and a set of candidate systems.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SystemDifferences {
    /// The delta every candidate shares.
    pub common: SystemDelta,
    /// Per-candidate deltas with the common part removed, in candidate order.
    pub unique: Vec<SystemDelta>,
}

/// One package upgraded in place by a plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeEntry {
    /// The currently installed package.
    pub from: Package,
    /// The package it becomes.
    pub to: Package,
}

/// How a plan changes the installed system, partitioned for display.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Newly installed packages, sorted by name.
    pub to_install: Vec<Package>,
    /// Removed packages, sorted by name.
    pub to_remove: Vec<Package>,
    /// Packages replaced by another version of themselves, sorted by name.
    pub to_upgrade: Vec<UpgradeEntry>,
    /// Plan members already installed at the same version; they are only
    /// rebuilt or reinstalled. Sorted by name.
    pub to_reinstall: Vec<Package>,
}

impl System {
    /// What: Evaluate the differences between this system and candidates.
    ///
    /// Inputs:
    /// - `others`: The candidate systems, usually hypothetical results.
    ///
    /// Output:
    /// - The delta shared by all candidates plus one residual delta per
    ///   candidate. Empty when `others` is empty.
    ///
    /// Details:
    /// - Each candidate's delta is the symmetric difference of the member
    ///   sets, partitioned into "new in the candidate" and "gone from self".
    /// - A package counts as the same only at the same version, so an
    ///   upgrade contributes to both sides of a delta.
    #[must_use]
    pub fn differences_between(&self, others: &[Self]) -> SystemDifferences {
        if others.is_empty() {
            return SystemDifferences::default();
        }

        let own: HashSet<&Package> = self.members().collect();
        let mut deltas: Vec<SystemDelta> = Vec::with_capacity(others.len());
        for other in others {
            let other_members: HashSet<&Package> = other.members().collect();
            let mut delta = SystemDelta::default();
            for differ in own.symmetric_difference(&other_members) {
                if own.contains(*differ) {
                    delta.removed.insert((*differ).clone());
                } else {
                    delta.installed.insert((*differ).clone());
                }
            }
            deltas.push(delta);
        }

        let mut common = deltas[0].clone();
        for delta in &deltas[1..] {
            common.installed.retain(|package| delta.installed.contains(package));
            common.removed.retain(|package| delta.removed.contains(package));
        }

        let unique = deltas
            .into_iter()
            .map(|delta| SystemDelta {
                installed: delta.installed.difference(&common.installed).cloned().collect(),
                removed: delta.removed.difference(&common.removed).cloned().collect(),
            })
            .collect();

        SystemDifferences { common, unique }
    }

    /// What: Summarize what a plan does to this system.
    ///
    /// Inputs:
    /// - `plan`: The installation plan, post-order.
    ///
    /// Output:
    /// - The install / remove / upgrade / reinstall partitions: upgrades are
    ///   names present on both sides at different versions, reinstalls are
    ///   plan members that change nothing.
    ///
    /// # Errors
    ///
    /// - Propagates failures of the underlying install simulation.
    pub fn plan_summary(&self, plan: &[Package]) -> Result<PlanSummary> {
        let result = self.hypothetical_install(plan)?;
        let delta = self
            .differences_between(std::slice::from_ref(&result))
            .common;

        let installed_names: HashSet<&str> =
            delta.installed.iter().map(|p| p.name.as_str()).collect();
        let removed_names: HashSet<&str> =
            delta.removed.iter().map(|p| p.name.as_str()).collect();
        let upgraded_names: HashSet<&str> = installed_names
            .intersection(&removed_names)
            .copied()
            .collect();

        let mut to_install: Vec<Package> = delta
            .installed
            .iter()
            .filter(|p| !upgraded_names.contains(p.name.as_str()))
            .cloned()
            .collect();
        to_install.sort_by(|a, b| a.name.cmp(&b.name));

        let mut to_remove: Vec<Package> = delta
            .removed
            .iter()
            .filter(|p| !upgraded_names.contains(p.name.as_str()))
            .cloned()
            .collect();
        to_remove.sort_by(|a, b| a.name.cmp(&b.name));

        let mut to_upgrade: Vec<UpgradeEntry> = upgraded_names
            .iter()
            .filter_map(|name| match (self.get(name), result.get(name)) {
                (Some(from), Some(to)) => Some(UpgradeEntry {
                    from: from.clone(),
                    to: to.clone(),
                }),
                _ => None,
            })
            .collect();
        to_upgrade.sort_by(|a, b| a.from.name.cmp(&b.from.name));

        let changed: HashSet<&str> = installed_names.union(&removed_names).copied().collect();
        let mut to_reinstall: Vec<Package> = Vec::new();
        for package in plan {
            if !changed.contains(package.name.as_str())
                && !to_reinstall.iter().any(|p| p.name == package.name)
            {
                to_reinstall.push(package.clone());
            }
        }
        to_reinstall.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(PlanSummary {
            to_install,
            to_remove,
            to_upgrade,
            to_reinstall,
        })
    }
}
