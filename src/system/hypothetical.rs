//! Hypothetical install simulation.
//!
//! Answers "what would the system look like after installing these packages?"
//! without touching anything: same-name members are displaced, conflicting
//! members are removed, and reverse dependencies of everything removed cascade
//! out until the membership reaches a fixed point.

use crate::error::Result;
use crate::system::System;
use crate::types::Package;

impl System {
    /// What: Compute the system that would result from installing `incoming`.
    ///
    /// Inputs:
    /// - `incoming`: Packages being installed, with unique names.
    ///
    /// Output:
    /// - The resulting system. `self` is untouched; the function is pure in
    ///   its inputs.
    ///
    /// Details:
    /// - Same-name members are displaced first (they are being replaced),
    ///   then members conflicting with any incoming package are removed.
    /// - Removal cascades: an installed package that listed a removed package
    ///   in `required_by` and no longer has all dependencies satisfied is
    ///   removed too, until nothing changes.
    /// - Finally the incoming packages themselves are re-checked; one whose
    ///   dependency cascaded out is removed as well, again until stable.
    ///
    /// # Errors
    ///
    /// - Propagates index-rebuild failures (duplicate names in `incoming`).
    pub fn hypothetical_install(&self, incoming: &[Package]) -> Result<Self> {
        // displace same-name members; they are being replaced
        let mut members = self.packages.clone();
        let mut deleted: Vec<Package> = Vec::new();
        for package in incoming {
            if let Some(existing) = members.remove(&package.name) {
                deleted.push(existing);
            }
        }
        let mut result = Self::build(members.into_values())?;

        // members conflicting with the incoming packages become casualties
        let mut casualties: Vec<Package> = Vec::new();
        for package in incoming {
            for conflicting in result.conflicting_with(package) {
                if !casualties.contains(conflicting) {
                    casualties.push(conflicting.clone());
                }
            }
        }
        result.insert_all(incoming.iter().cloned())?;

        // removing a package may orphan its reverse dependencies
        while !casualties.is_empty() || !deleted.is_empty() {
            for casualty in casualties.drain(..) {
                result.packages.remove(&casualty.name);
                deleted.push(casualty);
            }
            let remaining: Vec<Package> = result.packages.into_values().collect();
            result = Self::build(remaining)?;

            let mut dependents: Vec<Package> = Vec::new();
            for gone in &deleted {
                for name in &gone.required_by {
                    if let Some(dependent) = result.get(name)
                        && !dependents.contains(dependent)
                    {
                        dependents.push(dependent.clone());
                    }
                }
            }
            deleted.clear();

            for dependent in dependents {
                if !result.all_deps_satisfied(&dependent) && !casualties.contains(&dependent) {
                    tracing::debug!("{dependent} loses a dependency and cascades out");
                    casualties.push(dependent);
                }
            }
        }

        // an incoming package may have depended on something that cascaded out
        loop {
            let unsatisfied: Vec<String> = incoming
                .iter()
                .filter(|package| {
                    result.contains(&package.name) && !result.all_deps_satisfied(package)
                })
                .map(|package| package.name.clone())
                .collect();
            if unsatisfied.is_empty() {
                return Ok(result);
            }
            for name in unsatisfied {
                result.packages.remove(&name);
            }
            let remaining: Vec<Package> = result.packages.into_values().collect();
            result = Self::build(remaining)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PackageKind;

    fn repo(name: &str, version: &str) -> Package {
        Package::new(name, version, PackageKind::Repo)
    }

    fn aur(name: &str, version: &str) -> Package {
        Package::new(name, version, PackageKind::Aur)
    }

    #[test]
    fn plain_install_adds_members() {
        let system = System::build([repo("base", "1")]).expect("valid system");
        let result = system
            .hypothetical_install(&[aur("tool", "1")])
            .expect("install simulation");
        assert_eq!(result.len(), 2);
        assert!(result.contains("base"));
        assert!(result.contains("tool"));
    }

    #[test]
    fn same_name_is_displaced() {
        let system = System::build([repo("tool", "1")]).expect("valid system");
        let result = system
            .hypothetical_install(&[aur("tool", "2")])
            .expect("install simulation");
        assert_eq!(result.len(), 1);
        assert_eq!(result.get("tool").map(|p| p.version.as_str()), Some("2"));
    }

    #[test]
    fn conflicting_member_is_removed() {
        let system = System::build([repo("old-impl", "1")]).expect("valid system");
        let incoming = aur("new-impl", "1").with_conflicts(&["old-impl"]);
        let result = system
            .hypothetical_install(&[incoming])
            .expect("install simulation");
        assert!(!result.contains("old-impl"));
        assert!(result.contains("new-impl"));
    }

    #[test]
    fn removal_cascades_through_required_by() {
        // Y depends on X; removing X must take Y with it
        let system = System::build([
            repo("x", "1").with_required_by(&["y"]),
            repo("y", "1").with_depends(&["x"]),
        ])
        .expect("valid system");

        let incoming = aur("z", "1").with_conflicts(&["x"]);
        let result = system
            .hypothetical_install(&[incoming])
            .expect("install simulation");

        assert_eq!(result.len(), 1);
        assert!(result.contains("z"));
        assert!(!result.contains("x"));
        assert!(!result.contains("y"));
    }

    #[test]
    fn cascade_follows_chains() {
        // removing x orphans y, removing y orphans w
        let system = System::build([
            repo("x", "1").with_required_by(&["y"]),
            repo("y", "1").with_depends(&["x"]).with_required_by(&["w"]),
            repo("w", "1").with_depends(&["y"]),
            repo("bystander", "1"),
        ])
        .expect("valid system");

        let incoming = aur("z", "1").with_conflicts(&["x"]);
        let result = system
            .hypothetical_install(&[incoming])
            .expect("install simulation");

        assert!(result.contains("z"));
        assert!(result.contains("bystander"));
        assert!(!result.contains("x"));
        assert!(!result.contains("y"));
        assert!(!result.contains("w"));
    }

    #[test]
    fn survivor_with_alternate_provider_stays() {
        // y depends on virt, provided by both x and keeper
        let system = System::build([
            repo("x", "1").with_provides(&["virt"]).with_required_by(&["y"]),
            repo("keeper", "1").with_provides(&["virt"]),
            repo("y", "1").with_depends(&["virt"]),
        ])
        .expect("valid system");

        let incoming = aur("z", "1").with_conflicts(&["x"]);
        let result = system
            .hypothetical_install(&[incoming])
            .expect("install simulation");

        assert!(!result.contains("x"));
        assert!(result.contains("y"));
        assert!(result.contains("keeper"));
    }

    #[test]
    fn incoming_package_losing_its_dep_is_dropped() {
        // incoming "tool" depends on x, but incoming "z" conflicts x away
        let system = System::build([repo("x", "1")]).expect("valid system");
        let tool = aur("tool", "1").with_depends(&["x"]);
        let z = aur("z", "1").with_conflicts(&["x"]);

        let result = system
            .hypothetical_install(&[tool, z])
            .expect("install simulation");

        assert!(!result.contains("x"));
        assert!(!result.contains("tool"));
        assert!(result.contains("z"));
    }

    #[test]
    fn untouched_system_stays_untouched() {
        let system = System::build([repo("a", "1"), repo("b", "1")]).expect("valid system");
        let _ = system
            .hypothetical_install(&[aur("c", "1")])
            .expect("install simulation");
        assert_eq!(system.len(), 2);
        assert!(system.contains("a"));
        assert!(system.contains("b"));
    }
}
