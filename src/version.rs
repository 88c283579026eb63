//! Version comparison matching the host package manager.
//!
//! Versions have the shape `[epoch:]pkgver[-pkgrel]`. The epoch dominates,
//! the pkgver is compared by segmented alphanumeric runs, and the pkgrel only
//! breaks ties when both versions carry one. The run-by-run rules mirror the
//! package manager's comparison: digit runs compare numerically, a digit run
//! beats an alphabetic run, and a trailing alphabetic run marks a pre-release
//! (`1.0alpha` sorts before `1.0`).

use std::cmp::Ordering;

use crate::types::VersionOp;

/// What: Split a version string into epoch, pkgver and pkgrel.
///
/// Inputs:
/// - `version`: Full version string (e.g., `"2:1.4.2-1"`).
///
/// Output:
/// - `(epoch, pkgver, pkgrel)`; a missing epoch is `"0"`, a missing pkgrel is
///   `None`.
///
/// Details:
/// - The epoch is only recognized when everything before the first `:` is
///   digits; otherwise the `:` is treated as part of the pkgver.
/// - The pkgrel starts after the last `-`.
fn split_version(version: &str) -> (&str, &str, Option<&str>) {
    let (epoch, rest) = match version.find(':') {
        Some(idx) if idx > 0 && version[..idx].bytes().all(|b| b.is_ascii_digit()) => {
            (&version[..idx], &version[idx + 1..])
        }
        _ => ("0", version),
    };

    match rest.rfind('-') {
        Some(idx) => (epoch, &rest[..idx], Some(&rest[idx + 1..])),
        None => (epoch, rest, None),
    }
}

/// Length of the leading digit run.
fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Length of the leading alphabetic run.
fn alpha_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_alphabetic()).count()
}

/// What: Compare two digit runs numerically.
///
/// Details:
/// - Leading zeros are ignored; after that a longer run is larger, equal
///   lengths compare lexically. This avoids overflow on arbitrarily long
///   digit runs.
fn compare_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    let a = &a[a.iter().take_while(|byte| **byte == b'0').count()..];
    let b = &b[b.iter().take_while(|byte| **byte == b'0').count()..];
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// What: Compare two version fragments by segmented alphanumeric runs.
///
/// Inputs:
/// - `a`, `b`: Epoch, pkgver or pkgrel fragments.
///
/// Output:
/// - The ordering of `a` relative to `b`.
///
/// Details:
/// - Separators (anything non-alphanumeric) delimit runs and carry no
///   ordering weight of their own.
/// - Digit runs compare numerically; a digit run always beats an alphabetic
///   run at the same position.
/// - When one fragment runs out, the other wins unless its next run is
///   alphabetic, which marks a pre-release suffix.
fn compare_fragments(a: &str, b: &str) -> Ordering {
    let mut one = a.as_bytes();
    let mut two = b.as_bytes();

    while !one.is_empty() && !two.is_empty() {
        one = &one[one.iter().take_while(|b| !b.is_ascii_alphanumeric()).count()..];
        two = &two[two.iter().take_while(|b| !b.is_ascii_alphanumeric()).count()..];
        if one.is_empty() || two.is_empty() {
            break;
        }

        if one[0].is_ascii_digit() {
            let run_one = digit_run(one);
            let run_two = digit_run(two);
            if run_two == 0 {
                return Ordering::Greater;
            }
            match compare_digit_runs(&one[..run_one], &two[..run_two]) {
                Ordering::Equal => {}
                ordering => return ordering,
            }
            one = &one[run_one..];
            two = &two[run_two..];
        } else {
            if two[0].is_ascii_digit() {
                return Ordering::Less;
            }
            let run_one = alpha_run(one);
            let run_two = alpha_run(two);
            match one[..run_one].cmp(&two[..run_two]) {
                Ordering::Equal => {}
                ordering => return ordering,
            }
            one = &one[run_one..];
            two = &two[run_two..];
        }
    }

    match (one.is_empty(), two.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => {
            if two[0].is_ascii_alphabetic() {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (false, _) => {
            if one[0].is_ascii_alphabetic() {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
    }
}

/// What: Compare two full version strings.
///
/// Inputs:
/// - `a`: Left-hand version string.
/// - `b`: Right-hand version string.
///
/// Output:
/// - `Ordering::Less` if `a` is older, `Ordering::Greater` if newer,
///   `Ordering::Equal` otherwise.
///
/// Details:
/// - Epochs are compared first; a missing epoch counts as `0`.
/// - The pkgrel suffix only participates when both versions carry one, so
///   `1.2.3` and `1.2.3-2` compare equal.
///
/// # Example
///
/// ```
/// use aur_depsolve::version::compare_versions;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_versions("1.2.3", "1.2.4"), Ordering::Less);
/// assert_eq!(compare_versions("1:0.9", "2.0"), Ordering::Greater);
/// assert_eq!(compare_versions("1.0", "1.0alpha"), Ordering::Greater);
/// assert_eq!(compare_versions("1.2.3-1", "1.2.3"), Ordering::Equal);
/// ```
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (epoch_a, pkgver_a, pkgrel_a) = split_version(a);
    let (epoch_b, pkgver_b, pkgrel_b) = split_version(b);

    match compare_fragments(epoch_a, epoch_b) {
        Ordering::Equal => {}
        ordering => return ordering,
    }
    match compare_fragments(pkgver_a, pkgver_b) {
        Ordering::Equal => {}
        ordering => return ordering,
    }
    match (pkgrel_a, pkgrel_b) {
        (Some(rel_a), Some(rel_b)) => compare_fragments(rel_a, rel_b),
        _ => Ordering::Equal,
    }
}

/// What: Evaluate `version op required` under the package ordering.
///
/// Inputs:
/// - `version`: Concrete version to test.
/// - `op`: Comparison operator; [`VersionOp::Any`] matches everything.
/// - `required`: Version the operator compares against.
///
/// Output:
/// - `true` if the predicate holds.
///
/// # Example
///
/// ```
/// use aur_depsolve::types::VersionOp;
/// use aur_depsolve::version::version_matches;
///
/// assert!(version_matches("2.0", VersionOp::Ge, "1.5"));
/// assert!(!version_matches("1.0", VersionOp::Ge, "1.5"));
/// assert!(version_matches("1.0", VersionOp::Any, ""));
/// ```
#[must_use]
pub fn version_matches(version: &str, op: VersionOp, required: &str) -> bool {
    if op == VersionOp::Any {
        return true;
    }
    let ordering = compare_versions(version, required);
    match op {
        VersionOp::Any => true,
        VersionOp::Lt => ordering == Ordering::Less,
        VersionOp::Le => ordering != Ordering::Greater,
        VersionOp::Eq => ordering == Ordering::Equal,
        VersionOp::Ge => ordering != Ordering::Less,
        VersionOp::Gt => ordering == Ordering::Greater,
    }
}
