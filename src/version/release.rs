//! OS release arithmetic
//!
//! OS releases are compared on major.minor only, with the same base-component
//! order as [`compare_versions`](crate::version::compare_versions): `3.10` is
//! newer than `3.9` and `3.150` newer than `3.120`. The facet range walks
//! fixed-point hundredths (`3.20` → `320`) so stepping never drifts; it is
//! the only place a minor is limited to two digits.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::version::parser::parse_version;

/// Largest minor a hundredths step can represent
const MAX_STEPPED_MINOR: u64 = 99;

/// An OS release truncated to major.minor
///
/// Field order gives the derived ordering: major first, then minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OsRelease {
    major: u64,
    minor: u64,
}

impl OsRelease {
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    /// Parse a release from a version string, keeping major.minor
    ///
    /// Uses the version grammar, so "3.20.0.92" → 3.20, "3.5" → 3.5 (shown as
    /// 3.05) and non-numeric components → 0.
    pub fn parse(version: &str) -> Self {
        let parsed = parse_version(version);
        Self::new(parsed.component(0), parsed.component(1))
    }

    pub fn major(self) -> u64 {
        self.major
    }

    pub fn minor(self) -> u64 {
        self.minor
    }

    /// The release one 0.01 step below, `None` at 0.00
    ///
    /// Crossing a major boundary lands on minor 99.
    pub fn prev(self) -> Option<Self> {
        match (self.major, self.minor) {
            (0, 0) => None,
            (major, 0) => Some(Self::new(major - 1, MAX_STEPPED_MINOR)),
            (major, minor) => Some(Self::new(major, minor - 1)),
        }
    }

    /// Position on the 0.01 grid, minors above 99 pinned to 99
    fn hundredths(self) -> u64 {
        self.major
            .saturating_mul(100)
            .saturating_add(self.minor.min(MAX_STEPPED_MINOR))
    }

    fn from_hundredths(hundredths: u64) -> Self {
        Self::new(hundredths / 100, hundredths % 100)
    }
}

impl fmt::Display for OsRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

impl Serialize for OsRelease {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Enumerate every release in `[min, max]` in 0.01 steps, ascending
///
/// Each entry is formatted with two decimals. Returns an empty list when
/// `min > max`.
pub fn os_range(min: OsRelease, max: OsRelease) -> Vec<String> {
    (min.hundredths()..=max.hundredths())
        .map(|h| OsRelease::from_hundredths(h).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::compare::compare_versions;
    use rstest::rstest;

    #[rstest]
    #[case("3.20", 320)]
    #[case("3.20.0.92", 320)]
    #[case("3.5", 305)]
    #[case("3.05", 305)]
    #[case("3", 300)]
    #[case("3.150", 399)]
    #[case("beta", 0)]
    fn hundredths_pins_minor_to_two_digits(#[case] input: &str, #[case] hundredths: u64) {
        assert_eq!(OsRelease::parse(input).hundredths(), hundredths);
    }

    #[rstest]
    #[case("3.20.0.92", 3, 20)]
    #[case("3.5", 3, 5)]
    #[case("3.150", 3, 150)]
    #[case("99999999999.1", 99_999_999_999, 1)]
    fn parse_keeps_major_minor(#[case] input: &str, #[case] major: u64, #[case] minor: u64) {
        assert_eq!(OsRelease::parse(input), OsRelease::new(major, minor));
    }

    #[rstest]
    #[case(OsRelease::new(3, 0), "3.00")]
    #[case(OsRelease::new(3, 5), "3.05")]
    #[case(OsRelease::new(3, 20), "3.20")]
    #[case(OsRelease::new(10, 99), "10.99")]
    fn display_uses_two_decimals(#[case] release: OsRelease, #[case] expected: &str) {
        assert_eq!(release.to_string(), expected);
    }

    #[test]
    fn os_range_covers_closed_interval() {
        let range = os_range(OsRelease::parse("3.00"), OsRelease::parse("3.20"));

        assert_eq!(range.len(), 21);
        assert_eq!(range.first().map(String::as_str), Some("3.00"));
        assert_eq!(range[1], "3.01");
        assert_eq!(range[10], "3.10");
        assert_eq!(range.last().map(String::as_str), Some("3.20"));
    }

    #[test]
    fn os_range_crosses_major_boundary() {
        let range = os_range(OsRelease::new(2, 98), OsRelease::new(3, 1));

        assert_eq!(range, vec!["2.98", "2.99", "3.00", "3.01"]);
    }

    #[test]
    fn os_range_single_point() {
        let release = OsRelease::new(3, 14);

        assert_eq!(os_range(release, release), vec!["3.14"]);
    }

    #[test]
    fn os_range_empty_when_min_above_max() {
        assert!(os_range(OsRelease::new(3, 20), OsRelease::new(3, 19)).is_empty());
    }

    #[test]
    fn prev_steps_down_one_hundredth() {
        assert_eq!(OsRelease::new(4, 0).prev(), Some(OsRelease::new(3, 99)));
        assert_eq!(OsRelease::new(0, 0).prev(), None);
    }

    #[test]
    fn ordering_is_numeric_on_minor() {
        assert!(OsRelease::parse("3.10") > OsRelease::parse("3.9"));
        assert!(OsRelease::parse("3.150") > OsRelease::parse("3.120"));
        assert!(OsRelease::parse("3.100") > OsRelease::parse("3.99"));
    }

    #[rstest]
    #[case("3.9", "3.10")]
    #[case("3.120", "3.150")]
    #[case("3.99", "3.100")]
    #[case("2.99", "3")]
    #[case("3.5", "3.05")]
    fn ordering_matches_compare_versions(#[case] a: &str, #[case] b: &str) {
        assert_eq!(
            OsRelease::parse(a).cmp(&OsRelease::parse(b)),
            compare_versions(a, b)
        );
    }

    #[test]
    fn display_keeps_wide_minor() {
        assert_eq!(OsRelease::parse("3.150").to_string(), "3.150");
    }
}
