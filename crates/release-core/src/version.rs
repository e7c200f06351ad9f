//! Semver increment kinds and result previews.
//!
//! The actual bump is delegated to `npm version`; this module only names
//! the increment kinds and predicts the outcome where that is possible
//! without replicating npm's prerelease logic.

use semver::Version;
use std::fmt;

/// Placeholder preview for increment kinds whose result we do not predict.
pub const PREVIEW_UNKNOWN: &str = "Couldn't Predict";

/// The semver increment kinds accepted by `npm version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Increment {
    Patch,
    Minor,
    Major,
    Prepatch,
    Preminor,
    Premajor,
    Prerelease,
}

impl Increment {
    /// All increment kinds, in the order they are offered for selection.
    pub const ALL: &'static [Increment] = &[
        Increment::Patch,
        Increment::Minor,
        Increment::Major,
        Increment::Prepatch,
        Increment::Preminor,
        Increment::Premajor,
        Increment::Prerelease,
    ];

    /// The subcommand argument passed to `npm version`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Increment::Patch => "patch",
            Increment::Minor => "minor",
            Increment::Major => "major",
            Increment::Prepatch => "prepatch",
            Increment::Preminor => "preminor",
            Increment::Premajor => "premajor",
            Increment::Prerelease => "prerelease",
        }
    }

    /// Predict the version `npm version` would produce for this increment.
    ///
    /// Only plain patch/minor/major bumps are predicted; the pre* kinds
    /// depend on prerelease counters we deliberately do not model, and
    /// return `None` so the UI can show [`PREVIEW_UNKNOWN`] instead.
    pub fn preview(&self, current: &Version) -> Option<Version> {
        match self {
            Increment::Patch => Some(Version::new(
                current.major,
                current.minor,
                current.patch + 1,
            )),
            Increment::Minor => Some(Version::new(current.major, current.minor + 1, 0)),
            Increment::Major => Some(Version::new(current.major + 1, 0, 0)),
            Increment::Prepatch
            | Increment::Preminor
            | Increment::Premajor
            | Increment::Prerelease => None,
        }
    }
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn patch_bumps_last_component_only() {
        assert_eq!(Increment::Patch.preview(&v("1.2.3")), Some(v("1.2.4")));
    }

    #[test]
    fn minor_bump_resets_patch() {
        assert_eq!(Increment::Minor.preview(&v("1.2.3")), Some(v("1.3.0")));
    }

    #[test]
    fn major_bump_resets_minor_and_patch() {
        assert_eq!(Increment::Major.preview(&v("1.2.3")), Some(v("2.0.0")));
        assert_eq!(Increment::Major.preview(&v("2.5.9")), Some(v("3.0.0")));
    }

    #[test]
    fn prerelease_kinds_have_no_prediction() {
        for inc in [
            Increment::Prepatch,
            Increment::Preminor,
            Increment::Premajor,
            Increment::Prerelease,
        ] {
            assert_eq!(inc.preview(&v("1.2.3")), None);
            assert_eq!(inc.preview(&v("0.0.1")), None);
        }
    }

    #[test]
    fn all_lists_seven_kinds_in_selection_order() {
        let names: Vec<&str> = Increment::ALL.iter().map(|i| i.as_str()).collect();
        assert_eq!(
            names,
            [
                "patch",
                "minor",
                "major",
                "prepatch",
                "preminor",
                "premajor",
                "prerelease"
            ]
        );
    }
}
