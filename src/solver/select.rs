//! Plan validation, de-duplication and user choice.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{DepsolveError, Result};
use crate::source::PlanPrompt;
use crate::system::{PlanSummary, System, SystemDelta};
use crate::types::Package;

/// One candidate plan as presented for disambiguation: the names only this
/// plan installs and removes, relative to what every candidate does anyway.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanAlternative {
    /// Names uniquely installed by this plan, sorted.
    pub installed: Vec<String>,
    /// Names uniquely removed by this plan, sorted.
    pub removed: Vec<String>,
}

/// What: Validate candidate plans against the required packages and pick one.
///
/// Inputs:
/// - `installed`: The currently installed system.
/// - `plans`: Candidate plans from the solver.
/// - `needed`: Packages that must still be present after applying a plan.
/// - `prompt`: The channel that answers the disambiguation question.
///
/// Output:
/// - The chosen plan.
///
/// Details:
/// - Each plan is applied hypothetically; plans whose resulting system loses
///   a needed package are discarded.
/// - A single survivor is returned without asking. So is the first plan when
///   all surviving plans produce the same resulting system.
/// - Plans whose unique installed-plus-removed sets coincide collapse into
///   one before the user is asked.
/// - An out-of-range answer is asked again.
///
/// # Errors
///
/// - [`DepsolveError::NoRequiredPresent`] when every plan loses a needed
///   package.
/// - Propagates install-simulation failures.
pub fn select_plan(
    installed: &System,
    plans: &[Vec<Package>],
    needed: &[Package],
    prompt: &dyn PlanPrompt,
) -> Result<Vec<Package>> {
    let mut result_systems = Vec::with_capacity(plans.len());
    for plan in plans {
        result_systems.push(installed.hypothetical_install(plan)?);
    }

    let mut valid_indices: Vec<usize> = Vec::new();
    let mut valid_systems: Vec<System> = Vec::new();
    for (index, system) in result_systems.into_iter().enumerate() {
        if needed.iter().all(|package| system.contains(&package.name)) {
            valid_indices.push(index);
            valid_systems.push(system);
        }
    }

    if valid_indices.is_empty() {
        tracing::error!("every candidate plan loses a required package");
        return Err(DepsolveError::NoRequiredPresent);
    }
    if valid_indices.len() == 1 {
        return Ok(plans[valid_indices[0]].clone());
    }

    let differences = installed.differences_between(&valid_systems);

    // different plans, identical resulting systems
    if differences.unique.iter().all(SystemDelta::is_empty) {
        return Ok(plans[valid_indices[0]].clone());
    }

    // collapse plans that lead to the same resulting system
    let mut kept_indices: Vec<usize> = Vec::new();
    let mut kept_systems: Vec<System> = Vec::new();
    let mut seen: HashSet<BTreeSet<(String, String)>> = HashSet::new();
    for (slot, index) in valid_indices.iter().copied().enumerate() {
        let key: BTreeSet<(String, String)> = differences.unique[slot]
            .installed
            .iter()
            .chain(&differences.unique[slot].removed)
            .map(|package| (package.name.clone(), package.version.clone()))
            .collect();
        if seen.insert(key) {
            kept_indices.push(index);
            kept_systems.push(valid_systems[slot].clone());
        }
    }
    let differences = installed.differences_between(&kept_systems);

    let alternatives: Vec<PlanAlternative> = differences
        .unique
        .iter()
        .map(|delta| {
            let mut installed_names: Vec<String> =
                delta.installed.iter().map(|p| p.name.clone()).collect();
            let mut removed_names: Vec<String> =
                delta.removed.iter().map(|p| p.name.clone()).collect();
            installed_names.sort();
            removed_names.sort();
            PlanAlternative {
                installed: installed_names,
                removed: removed_names,
            }
        })
        .collect();

    loop {
        let choice = prompt.choose_plan(&alternatives);
        if let Some(index) = kept_indices.get(choice) {
            return Ok(plans[*index].clone());
        }
        tracing::warn!("plan choice {choice} is out of range, asking again");
    }
}

/// What: Summarize a chosen plan and ask the user to confirm it.
///
/// Inputs:
/// - `installed`: The currently installed system.
/// - `plan`: The chosen plan.
/// - `prompt`: The confirmation channel.
///
/// Output:
/// - The plan summary the user approved.
///
/// # Errors
///
/// - [`DepsolveError::UserDeclined`] when the user rejects the plan.
/// - Propagates install-simulation failures.
pub fn review_plan(
    installed: &System,
    plan: &[Package],
    prompt: &dyn PlanPrompt,
) -> Result<PlanSummary> {
    let summary = installed.plan_summary(plan)?;
    if prompt.confirm_plan(&summary) {
        Ok(summary)
    } else {
        Err(DepsolveError::UserDeclined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScriptedPrompt;
    use crate::types::PackageKind;

    fn repo(name: &str, version: &str) -> Package {
        Package::new(name, version, PackageKind::Repo)
    }

    fn aur(name: &str, version: &str) -> Package {
        Package::new(name, version, PackageKind::Aur)
    }

    #[test]
    fn single_valid_plan_needs_no_prompt() {
        let installed = System::build([]).expect("empty system");
        let plans = vec![vec![aur("a", "1")]];
        let needed = vec![aur("a", "1")];

        // a prompt that would pick an out-of-range index; it must not be asked
        let prompt = ScriptedPrompt::new().with_choice(99);
        let chosen =
            select_plan(&installed, &plans, &needed, &prompt).expect("selection");
        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0].name, "a");
    }

    #[test]
    fn plans_losing_needed_packages_are_rejected() {
        // the plan conflicts the required package off the installed system
        let installed = System::build([repo("needed", "1")]).expect("valid system");
        let plans = vec![vec![aur("killer", "1").with_conflicts(&["needed"])]];
        let needed = vec![repo("needed", "1")];

        let prompt = ScriptedPrompt::new();
        let result = select_plan(&installed, &plans, &needed, &prompt);
        assert!(matches!(result, Err(DepsolveError::NoRequiredPresent)));
    }

    #[test]
    fn equivalent_plans_skip_the_prompt() {
        let installed = System::build([]).expect("empty system");
        // same membership, different order
        let plans = vec![
            vec![aur("a", "1"), aur("b", "1")],
            vec![aur("b", "1"), aur("a", "1")],
        ];
        let needed = vec![aur("a", "1")];

        let prompt = ScriptedPrompt::new().with_choice(99);
        let chosen =
            select_plan(&installed, &plans, &needed, &prompt).expect("selection");
        assert_eq!(chosen, plans[0]);
    }

    #[test]
    fn scripted_choice_picks_among_real_alternatives() {
        let installed = System::build([]).expect("empty system");
        let plans = vec![
            vec![aur("provider-one", "1"), aur("app", "1")],
            vec![aur("provider-two", "1"), aur("app", "1")],
        ];
        let needed = vec![aur("app", "1")];

        let prompt = ScriptedPrompt::new().with_choice(1);
        let chosen =
            select_plan(&installed, &plans, &needed, &prompt).expect("selection");
        assert_eq!(chosen, plans[1]);
    }

    #[test]
    fn out_of_range_choice_is_asked_again() {
        let installed = System::build([]).expect("empty system");
        let plans = vec![
            vec![aur("provider-one", "1"), aur("app", "1")],
            vec![aur("provider-two", "1"), aur("app", "1")],
        ];
        let needed = vec![aur("app", "1")];

        let prompt = ScriptedPrompt::new().with_choice(7).with_choice(0);
        let chosen =
            select_plan(&installed, &plans, &needed, &prompt).expect("selection");
        assert_eq!(chosen, plans[0]);
    }

    #[test]
    fn duplicate_outcomes_collapse() {
        let installed = System::build([]).expect("empty system");
        // plans one and two reach the same system, three differs
        let plans = vec![
            vec![aur("same", "1"), aur("app", "1")],
            vec![aur("app", "1"), aur("same", "1")],
            vec![aur("other", "1"), aur("app", "1")],
        ];
        let needed = vec![aur("app", "1")];

        // choice 1 must land on the "other" outcome, proving the first two
        // collapsed into a single alternative
        let prompt = ScriptedPrompt::new().with_choice(1);
        let chosen =
            select_plan(&installed, &plans, &needed, &prompt).expect("selection");
        assert_eq!(chosen, plans[2]);
    }

    #[test]
    fn review_accepts_and_declines() {
        let installed = System::build([repo("base", "1")]).expect("valid system");
        let plan = vec![aur("tool", "1")];

        let accepting = ScriptedPrompt::new();
        let summary = review_plan(&installed, &plan, &accepting).expect("review");
        assert_eq!(summary.to_install.len(), 1);

        let declining = ScriptedPrompt::new().with_confirm(false);
        let result = review_plan(&installed, &plan, &declining);
        assert!(matches!(result, Err(DepsolveError::UserDeclined)));
    }
}
