//! Dependency atom parsing and rendering.
//!
//! A dependency atom is an expression of the form `name` or `name op version`
//! as it appears in `depends`, `conflicts`, `provides` and friends, e.g.
//! `glibc`, `python>=3.12` or `libfoo.so=2`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::version_matches;

/// Comparison operator of a versioned dependency atom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionOp {
    /// No constraint; any version satisfies the atom.
    #[default]
    Any,
    /// Strictly older.
    Lt,
    /// Older or equal.
    Le,
    /// Equal (`=` and `==` are the same operator).
    Eq,
    /// Newer or equal.
    Ge,
    /// Strictly newer.
    Gt,
}

impl VersionOp {
    /// What: Render the operator the way dependency strings spell it.
    ///
    /// Output:
    /// - The operator token, or `""` for [`VersionOp::Any`].
    ///
    /// Details:
    /// - `Eq` always renders as `=`; the `==` spelling is accepted on parse only.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Ge => ">=",
            Self::Gt => ">",
        }
    }
}

impl fmt::Display for VersionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed dependency expression `name[op version]`.
///
/// `op` and `version` may be absent ([`VersionOp::Any`] with an empty version
/// string), meaning any version satisfies the atom.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyAtom {
    /// Package or virtual name the atom refers to.
    pub name: String,
    /// Version comparison operator.
    pub op: VersionOp,
    /// Version the operator compares against (empty for [`VersionOp::Any`]).
    pub version: String,
}

impl DependencyAtom {
    /// What: Parse a dependency specification into name, operator and version.
    ///
    /// Inputs:
    /// - `spec`: Raw dependency string (e.g., `"python>=3.12"`, `"glibc"`).
    ///
    /// Output:
    /// - The parsed atom. A spec without an operator yields [`VersionOp::Any`]
    ///   and an empty version.
    ///
    /// Details:
    /// - Splits on the first occurrence of any of `>=`, `<=`, `==`, `=`, `>`,
    ///   `<`; the longest operator at that position wins.
    /// - `=` and `==` both parse to [`VersionOp::Eq`].
    /// - Name and version are whitespace-trimmed.
    ///
    /// # Example
    ///
    /// ```
    /// use aur_depsolve::types::{DependencyAtom, VersionOp};
    ///
    /// let atom = DependencyAtom::parse("python>=3.12");
    /// assert_eq!(atom.name, "python");
    /// assert_eq!(atom.op, VersionOp::Ge);
    /// assert_eq!(atom.version, "3.12");
    ///
    /// let atom = DependencyAtom::parse("glibc");
    /// assert_eq!(atom.name, "glibc");
    /// assert_eq!(atom.op, VersionOp::Any);
    /// ```
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        let trimmed = spec.trim();
        let Some(pos) = trimmed.find(['<', '>', '=']) else {
            return Self::unversioned(trimmed);
        };

        let rest = &trimmed[pos..];
        let (op, op_len) = if rest.starts_with(">=") {
            (VersionOp::Ge, 2)
        } else if rest.starts_with("<=") {
            (VersionOp::Le, 2)
        } else if rest.starts_with("==") {
            (VersionOp::Eq, 2)
        } else if rest.starts_with('=') {
            (VersionOp::Eq, 1)
        } else if rest.starts_with('>') {
            (VersionOp::Gt, 1)
        } else {
            (VersionOp::Lt, 1)
        };

        Self {
            name: trimmed[..pos].trim().to_string(),
            op,
            version: trimmed[pos + op_len..].trim().to_string(),
        }
    }

    /// What: Create an atom without a version constraint.
    ///
    /// Inputs:
    /// - `name`: Package or virtual name.
    ///
    /// Output:
    /// - An atom that any version of `name` satisfies.
    #[must_use]
    pub fn unversioned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op: VersionOp::Any,
            version: String::new(),
        }
    }

    /// Whether the atom carries a version constraint.
    #[must_use]
    pub const fn is_versioned(&self) -> bool {
        !matches!(self.op, VersionOp::Any)
    }

    /// What: Check whether a concrete version satisfies this atom.
    ///
    /// Inputs:
    /// - `version`: Version string to test.
    ///
    /// Output:
    /// - `true` if `version op self.version` holds; always `true` for an
    ///   unversioned atom.
    #[must_use]
    pub fn accepts(&self, version: &str) -> bool {
        version_matches(version, self.op, &self.version)
    }
}

impl fmt::Display for DependencyAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, self.op.as_str(), self.version)
    }
}

/// What: Return only the name portion of a dependency specification.
///
/// Inputs:
/// - `spec`: Raw dependency string, possibly versioned.
///
/// Output:
/// - The name with any operator and version stripped.
///
/// # Example
///
/// ```
/// use aur_depsolve::types::strip_version;
///
/// assert_eq!(strip_version("python>=3.12"), "python");
/// assert_eq!(strip_version("glibc"), "glibc");
/// ```
#[must_use]
pub fn strip_version(spec: &str) -> &str {
    match spec.find(['<', '>', '=']) {
        Some(pos) => spec[..pos].trim(),
        None => spec.trim(),
    }
}
