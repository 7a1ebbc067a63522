//! Version ordering for sorting and latest-version selection

use std::cmp::Ordering;

use crate::version::parser::parse_version;

/// Compare two version strings under the package index order
///
/// Base components first (missing components count as 0), then suffix
/// weight, then suffix number, then revision.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    parse_version(a).cmp(&parse_version(b))
}

/// Sort version strings oldest first
///
/// Stable: versions that compare equal keep their relative order.
pub fn sort_versions<S: AsRef<str>>(versions: &mut [S]) {
    versions.sort_by_cached_key(|v| parse_version(v.as_ref()));
}

/// Find the maximum version from a list
///
/// When several strings rank equal (e.g. "1.0" and "1.0.0") the last one
/// in the input wins, as with a stable ascending sort read from the end.
pub fn find_latest<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .map(|v| (v, parse_version(v)))
        .reduce(|best, candidate| if candidate.1 >= best.1 { candidate } else { best })
        .map(|(original, _)| original)
}
