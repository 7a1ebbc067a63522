//! OS compatibility of a single package version

use crate::registry::types::PackageVersion;
use crate::version::release::OsRelease;

/// Check whether `record` can run on `release`
///
/// `os_min` is inclusive, `os_max` exclusive; a missing bound is open.
/// Bounds compare on major.minor base components, so `3.20.0.92` counts as
/// `3.20`.
pub fn is_compatible(record: &PackageVersion, release: OsRelease) -> bool {
    within_bounds(record.os_min_release(), record.os_max_release(), release)
}

fn within_bounds(min: Option<OsRelease>, max: Option<OsRelease>, release: OsRelease) -> bool {
    min.is_none_or(|min| min <= release) && max.is_none_or(|max| release < max)
}
