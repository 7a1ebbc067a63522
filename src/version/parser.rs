//! Version string decomposition
//!
//! Grammar (right to left): `<base>[_<suffix><num>][-r<revision>]`, e.g.
//! `1.2.3_rc1-r2` → base `[1, 2, 3]`, suffix `rc`, suffix number `1`,
//! revision `2`. Parsing never fails: anything that does not match a marker
//! stays in the base, and non-numeric base components become `0`.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

/// Trailing packaging revision: `-r<digits>`
static REVISION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-r(\d+)$").expect("revision pattern is valid"));

/// Trailing suffix marker: `_<letters><digits?>`
static SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([a-z]+)(\d*)$").expect("suffix pattern is valid"));

/// Weight given to a suffix tag outside the known set.
///
/// Ranks the same as "no suffix".
pub const UNKNOWN_SUFFIX_WEIGHT: i8 = 0;

/// Known pre/post-release suffix tags, in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SuffixKind {
    Alpha,
    Beta,
    Pre,
    Rc,
    Cvs,
    Svn,
    Git,
    Hg,
    P,
}

impl SuffixKind {
    /// Ordering weight relative to an unsuffixed version (weight 0)
    pub fn weight(self) -> i8 {
        match self {
            SuffixKind::Alpha => -4,
            SuffixKind::Beta => -3,
            SuffixKind::Pre => -2,
            SuffixKind::Rc => -1,
            SuffixKind::Cvs => 1,
            SuffixKind::Svn => 2,
            SuffixKind::Git => 3,
            SuffixKind::Hg => 4,
            SuffixKind::P => 5,
        }
    }

    /// Returns the tag as written in version strings
    pub fn as_str(&self) -> &'static str {
        match self {
            SuffixKind::Alpha => "alpha",
            SuffixKind::Beta => "beta",
            SuffixKind::Pre => "pre",
            SuffixKind::Rc => "rc",
            SuffixKind::Cvs => "cvs",
            SuffixKind::Svn => "svn",
            SuffixKind::Git => "git",
            SuffixKind::Hg => "hg",
            SuffixKind::P => "p",
        }
    }
}

impl FromStr for SuffixKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alpha" => Ok(SuffixKind::Alpha),
            "beta" => Ok(SuffixKind::Beta),
            "pre" => Ok(SuffixKind::Pre),
            "rc" => Ok(SuffixKind::Rc),
            "cvs" => Ok(SuffixKind::Cvs),
            "svn" => Ok(SuffixKind::Svn),
            "git" => Ok(SuffixKind::Git),
            "hg" => Ok(SuffixKind::Hg),
            "p" => Ok(SuffixKind::P),
            _ => Err(()),
        }
    }
}

/// Suffix tag found in a version string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Suffix {
    Known(SuffixKind),
    /// Letters matched the suffix marker but are not a known tag
    Unknown(String),
}

impl Suffix {
    fn from_tag(tag: &str) -> Self {
        tag.parse::<SuffixKind>()
            .map(Suffix::Known)
            .unwrap_or_else(|_| Suffix::Unknown(tag.to_string()))
    }

    pub fn weight(&self) -> i8 {
        match self {
            Suffix::Known(kind) => kind.weight(),
            Suffix::Unknown(_) => UNKNOWN_SUFFIX_WEIGHT,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Suffix::Known(kind) => kind.as_str(),
            Suffix::Unknown(tag) => tag,
        }
    }
}

/// Structured form of a version string
///
/// Equality and ordering follow the version order, not the field values:
/// `1.0` equals `1.0.0`, and an unknown suffix equals no suffix.
#[derive(Debug, Clone)]
pub struct ParsedVersion {
    pub base: Vec<u64>,
    pub suffix: Option<Suffix>,
    pub suffix_num: u64,
    pub revision: u64,
}

impl ParsedVersion {
    /// Weight of the suffix, `0` when there is none
    pub fn suffix_weight(&self) -> i8 {
        self.suffix.as_ref().map_or(0, Suffix::weight)
    }

    /// Base component at `index`, `0` when missing
    pub fn component(&self, index: usize) -> u64 {
        self.base.get(index).copied().unwrap_or(0)
    }

    /// Compares only the base vectors, padding the shorter one with zeros
    pub fn cmp_base(&self, other: &Self) -> Ordering {
        let len = self.base.len().max(other.base.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_base(other)
            .then_with(|| self.suffix_weight().cmp(&other.suffix_weight()))
            .then_with(|| self.suffix_num.cmp(&other.suffix_num))
            .then_with(|| self.revision.cmp(&other.revision))
    }
}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ParsedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for ParsedVersion {}

/// Decompose a raw version string
///
/// Examples:
/// - "1.2.3" -> base [1, 2, 3]
/// - "1.0_rc2" -> base [1, 0], suffix rc, suffix_num 2
/// - "0.4-r1" -> base [0, 4], revision 1
/// - "1.x" -> base [1, 0]
pub fn parse_version(version: &str) -> ParsedVersion {
    let mut remaining = version;

    let mut revision = 0;
    if let Some(caps) = REVISION_RE.captures(remaining) {
        revision = parse_number(&caps[1]);
        remaining = &remaining[..caps.get(0).map_or(remaining.len(), |m| m.start())];
    }

    let mut suffix = None;
    let mut suffix_num = 0;
    if let Some(caps) = SUFFIX_RE.captures(remaining) {
        suffix = Some(Suffix::from_tag(&caps[1]));
        suffix_num = parse_number(&caps[2]);
        remaining = &remaining[..caps.get(0).map_or(remaining.len(), |m| m.start())];
    }

    let base = remaining.split('.').map(parse_component).collect();

    ParsedVersion {
        base,
        suffix,
        suffix_num,
        revision,
    }
}

/// Leading digits of a component, `0` when there are none
fn parse_component(component: &str) -> u64 {
    let digits_end = component
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(component.len());
    parse_number(&component[..digits_end])
}

/// Parses an all-digit string, saturating on overflow and `0` when empty
fn parse_number(digits: &str) -> u64 {
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}
