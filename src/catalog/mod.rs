//! Display-ready package listing
//!
//! Flattens the nested registry into one record per listable version, marks
//! each with its package's latest version, and collects the facets listing
//! UIs filter on (categories, devices, OS releases).
//!
//! # Modules
//!
//! - [`filter`]: Search and facet filters over flattened records
//! - [`detail`]: Helpers for rendering a single package version

pub mod detail;
pub mod filter;

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::registry::types::{Device, PackageVersion, RegistryDocument};
use crate::version::compare::{compare_versions, find_latest};
use crate::version::release::{OsRelease, os_range};

pub use filter::PackageFilter;

/// One listable package version joined with its package's identity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatPackage {
    pub name: String,
    pub version: String,
    /// Latest listable version of the package
    pub latest_version: String,
    #[serde(flatten)]
    pub record: PackageVersion,
}

impl FlatPackage {
    pub fn is_latest(&self) -> bool {
        self.version == self.latest_version
    }
}

/// Flattened listing plus filter facets
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    /// Records in document order
    pub packages: Vec<FlatPackage>,
    /// Sorted, deduplicated
    pub categories: Vec<String>,
    /// Sorted in device order
    pub devices: Vec<Device>,
    /// Inclusive bounds of the OS facet, `None` when no version declares any
    pub os_domain: Option<(OsRelease, OsRelease)>,
    /// Every release in the domain, newest first
    pub os_releases: Vec<String>,
    pub generated: String,
}

/// Running min/max of OS bounds across listable versions
#[derive(Debug, Default)]
struct OsBounds {
    min_lower: Option<OsRelease>,
    max_lower: Option<OsRelease>,
    min_upper: Option<OsRelease>,
    max_upper: Option<OsRelease>,
}

impl OsBounds {
    fn add(&mut self, record: &PackageVersion) {
        if let Some(lower) = record.os_min_release() {
            self.min_lower = Some(self.min_lower.map_or(lower, |m| m.min(lower)));
            self.max_lower = Some(self.max_lower.map_or(lower, |m| m.max(lower)));
        }
        if let Some(upper) = record.os_max_release() {
            self.min_upper = Some(self.min_upper.map_or(upper, |m| m.min(upper)));
            self.max_upper = Some(self.max_upper.map_or(upper, |m| m.max(upper)));
        }
    }

    /// Lowest `os_min` to one step below the highest (exclusive) `os_max`
    ///
    /// With only lower bounds the range ends at the highest `os_min`; with
    /// only upper bounds it starts one step below the lowest `os_max`.
    fn domain(&self) -> Option<(OsRelease, OsRelease)> {
        let lower = self
            .min_lower
            .or_else(|| self.min_upper.and_then(OsRelease::prev))?;
        let upper = self
            .max_upper
            .and_then(OsRelease::prev)
            .or(self.max_lower)?;
        Some((lower, upper))
    }
}

/// Build the listing and facets for a registry document
///
/// Versions flagged auto-install-only are left out; a package with no other
/// version is left out entirely.
pub fn aggregate(document: &RegistryDocument) -> Catalog {
    let mut packages = Vec::new();
    let mut categories = BTreeSet::new();
    let mut devices = BTreeSet::new();
    let mut bounds = OsBounds::default();

    for (name, versions) in document.packages.iter() {
        let listable: Vec<(&String, &PackageVersion)> = versions
            .iter()
            .filter(|(_, record)| record.is_listable())
            .collect();

        let Some(latest) = find_latest(listable.iter().map(|(v, _)| v.as_str())) else {
            debug!("Skipping {}: no listable version", name);
            continue;
        };
        let latest = latest.to_string();

        for (version, record) in listable {
            categories.extend(record.categories.iter().cloned());
            devices.extend(record.devices.iter().copied());
            bounds.add(record);

            packages.push(FlatPackage {
                name: name.clone(),
                version: version.clone(),
                latest_version: latest.clone(),
                record: record.clone(),
            });
        }
    }

    let os_domain = bounds.domain();
    let mut os_releases = os_domain
        .map(|(lower, upper)| os_range(lower, upper))
        .unwrap_or_default();
    os_releases.reverse();

    debug!(
        "Aggregated {} records, {} categories, {} OS releases",
        packages.len(),
        categories.len(),
        os_releases.len()
    );

    Catalog {
        packages,
        categories: categories.into_iter().collect(),
        devices: devices.into_iter().collect(),
        os_domain,
        os_releases,
        generated: document.generated.clone(),
    }
}

impl Catalog {
    /// Records that are their package's latest version
    pub fn latest_only(&self) -> Vec<&FlatPackage> {
        self.packages.iter().filter(|p| p.is_latest()).collect()
    }

    /// Latest records whose upstream author is `author`
    pub fn by_author(&self, author: &str) -> Vec<&FlatPackage> {
        self.packages
            .iter()
            .filter(|p| p.is_latest() && p.record.upstream_author == author)
            .collect()
    }

    /// All listable versions of a package, newest first
    pub fn versions_of(&self, name: &str) -> Vec<&FlatPackage> {
        let mut versions: Vec<&FlatPackage> =
            self.packages.iter().filter(|p| p.name == name).collect();
        versions.sort_by(|a, b| compare_versions(&b.version, &a.version));
        versions
    }

    /// The latest record of a package
    pub fn latest(&self, name: &str) -> Option<&FlatPackage> {
        self.packages
            .iter()
            .find(|p| p.name == name && p.is_latest())
    }

    /// The record of `version`, or the latest when `version` is `None` or
    /// not listed
    pub fn version_or_latest(&self, name: &str, version: Option<&str>) -> Option<&FlatPackage> {
        version
            .and_then(|v| {
                self.packages
                    .iter()
                    .find(|p| p.name == name && p.version == v)
            })
            .or_else(|| self.latest(name))
    }

    /// Records matching `filter`, in document order
    pub fn filter(&self, filter: &PackageFilter) -> Vec<&FlatPackage> {
        self.packages.iter().filter(|p| filter.matches(p)).collect()
    }
}

/// Keep the newest record of each package, sorted by package name
///
/// Used after filtering: the newest version that passed the filter stands
/// for its package, which may be older than the package's latest.
pub fn newest_per_package<'a, I>(records: I) -> Vec<&'a FlatPackage>
where
    I: IntoIterator<Item = &'a FlatPackage>,
{
    let mut sorted: Vec<&FlatPackage> = records.into_iter().collect();
    sorted.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| compare_versions(&b.version, &a.version))
    });
    sorted.dedup_by(|later, earlier| later.name == earlier.name);
    sorted
}
