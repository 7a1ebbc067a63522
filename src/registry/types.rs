//! Registry document model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::version::compare::compare_versions;
use crate::version::release::OsRelease;

/// Supported reMarkable device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// reMarkable 1
    Rm1,
    /// reMarkable 2
    Rm2,
    /// reMarkable Paper Pro
    Rmpp,
    /// reMarkable Paper Pro Move
    Rmppm,
}

impl Device {
    /// Returns the tag used in the registry document
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Rm1 => "rm1",
            Device::Rm2 => "rm2",
            Device::Rmpp => "rmpp",
            Device::Rmppm => "rmppm",
        }
    }

    /// Short badge label
    pub fn label(&self) -> &'static str {
        match self {
            Device::Rm1 => "RM1",
            Device::Rm2 => "RM2",
            Device::Rmpp => "RMPP",
            Device::Rmppm => "RMPPM",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Device::Rm1 => "reMarkable 1",
            Device::Rm2 => "reMarkable 2",
            Device::Rmpp => "reMarkable Paper Pro",
            Device::Rmppm => "reMarkable Paper Pro Move",
        }
    }
}

impl FromStr for Device {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rm1" => Ok(Device::Rm1),
            "rm2" => Ok(Device::Rm2),
            "rmpp" => Ok(Device::Rmpp),
            "rmppm" => Ok(Device::Rmppm),
            _ => Err(()),
        }
    }
}

/// CPU architecture a package is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    Aarch64,
    Armv7,
    /// Architecture independent; runs everywhere
    Noarch,
}

impl Architecture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::Aarch64 => "aarch64",
            Architecture::Armv7 => "armv7",
            Architecture::Noarch => "noarch",
        }
    }

    /// Whether a package built for `self` runs on `target`
    pub fn runs_on(&self, target: Architecture) -> bool {
        *self == Architecture::Noarch || *self == target
    }
}

impl FromStr for Architecture {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aarch64" => Ok(Architecture::Aarch64),
            "armv7" => Ok(Architecture::Armv7),
            "noarch" => Ok(Architecture::Noarch),
            _ => Err(()),
        }
    }
}

/// Version qualifier attached to a dependency, conflict or provides entry
///
/// Follows the apk notation: `name>=1.0`, `name<2`, `name=1.0-r1`,
/// `name~1.2` (fuzzy: any version whose base starts with `1.2`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionConstraint {
    /// `=1.0`
    Exact(String),
    /// `>=1.0`
    Gte(String),
    /// `>1.0`
    Gt(String),
    /// `<=1.0`
    Lte(String),
    /// `<1.0`
    Lt(String),
    /// `~1.0`
    Fuzzy(String),
}

impl VersionConstraint {
    /// Split an operator prefix off `spec`
    fn parse(spec: &str) -> Option<Self> {
        if let Some(rest) = spec.strip_prefix(">=") {
            Some(VersionConstraint::Gte(rest.to_string()))
        } else if let Some(rest) = spec.strip_prefix("<=") {
            Some(VersionConstraint::Lte(rest.to_string()))
        } else if let Some(rest) = spec.strip_prefix('>') {
            Some(VersionConstraint::Gt(rest.to_string()))
        } else if let Some(rest) = spec.strip_prefix('<') {
            Some(VersionConstraint::Lt(rest.to_string()))
        } else if let Some(rest) = spec.strip_prefix('~') {
            Some(VersionConstraint::Fuzzy(rest.to_string()))
        } else {
            spec.strip_prefix('=')
                .map(|rest| VersionConstraint::Exact(rest.to_string()))
        }
    }

    fn operator(&self) -> &'static str {
        match self {
            VersionConstraint::Exact(_) => "=",
            VersionConstraint::Gte(_) => ">=",
            VersionConstraint::Gt(_) => ">",
            VersionConstraint::Lte(_) => "<=",
            VersionConstraint::Lt(_) => "<",
            VersionConstraint::Fuzzy(_) => "~",
        }
    }

    pub fn version(&self) -> &str {
        match self {
            VersionConstraint::Exact(v)
            | VersionConstraint::Gte(v)
            | VersionConstraint::Gt(v)
            | VersionConstraint::Lte(v)
            | VersionConstraint::Lt(v)
            | VersionConstraint::Fuzzy(v) => v,
        }
    }

    /// Check whether `version` satisfies the qualifier
    pub fn matches(&self, version: &str) -> bool {
        let ord = compare_versions(version, self.version());
        match self {
            VersionConstraint::Exact(_) => ord.is_eq(),
            VersionConstraint::Gte(_) => ord.is_ge(),
            VersionConstraint::Gt(_) => ord.is_gt(),
            VersionConstraint::Lte(_) => ord.is_le(),
            VersionConstraint::Lt(_) => ord.is_lt(),
            VersionConstraint::Fuzzy(prefix) => fuzzy_matches(version, prefix),
        }
    }
}

/// `~1.2` matches `1.2`, `1.2.5`, `1.2_rc1` but not `1.20`
fn fuzzy_matches(version: &str, prefix: &str) -> bool {
    match version.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with(['.', '_', '-']),
        None => false,
    }
}

/// A `depends`, `conflicts` or `provides` entry
///
/// Only the name takes part in installability resolution; the qualifier is
/// kept for display and for flagging unmet qualifiers in detail views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub constraint: Option<VersionConstraint>,
}

impl Dependency {
    /// Parse an entry such as `libfoo>=1.2` or `/bin/sh`
    pub fn parse(entry: &str) -> Self {
        let entry = entry.trim();
        let split = entry
            .find(['<', '>', '=', '~'])
            .filter(|&i| i > 0)
            .unwrap_or(entry.len());
        let (name, spec) = entry.split_at(split);

        Self {
            name: name.to_string(),
            constraint: VersionConstraint::parse(spec),
        }
    }

    /// Whether `version` of the named package satisfies this entry
    pub fn is_satisfied_by(&self, version: &str) -> bool {
        self.constraint
            .as_ref()
            .is_none_or(|constraint| constraint.matches(version))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some(constraint) => write!(
                f,
                "{}{}{}",
                self.name,
                constraint.operator(),
                constraint.version()
            ),
            None => f.write_str(&self.name),
        }
    }
}

impl Serialize for Dependency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dependency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entry = String::deserialize(deserializer)?;
        Ok(Dependency::parse(&entry))
    }
}

/// Metadata of one published version of a package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageVersion {
    pub pkgdesc: String,
    pub upstream_author: String,
    pub maintainer: String,
    pub categories: Vec<String>,
    pub license: String,
    pub url: String,
    /// Inclusive lower OS bound
    pub os_min: Option<String>,
    /// Exclusive upper OS bound
    pub os_max: Option<String>,
    pub devices: Vec<Device>,
    pub depends: Vec<Dependency>,
    #[serde(default)]
    pub conflicts: Vec<Dependency>,
    #[serde(default)]
    pub provides: Vec<Dependency>,
    pub arch: Vec<Architecture>,
    /// Exists only to satisfy dependencies; hidden from listings
    #[serde(default, alias = "autoinstall")]
    pub auto_install_only: bool,
    /// Needs `vellum reenable` after OS updates
    #[serde(default)]
    pub modifies_system: bool,
}

impl PackageVersion {
    pub fn os_min_release(&self) -> Option<OsRelease> {
        self.os_min.as_deref().map(OsRelease::parse)
    }

    pub fn os_max_release(&self) -> Option<OsRelease> {
        self.os_max.as_deref().map(OsRelease::parse)
    }

    pub fn is_listable(&self) -> bool {
        !self.auto_install_only
    }

    pub fn supports_device(&self, device: Device) -> bool {
        self.devices.contains(&device)
    }

    pub fn supports_arch(&self, target: Architecture) -> bool {
        self.arch.iter().any(|a| a.runs_on(target))
    }
}

/// Package name → version string → version metadata, in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageRegistry {
    packages: IndexMap<String, IndexMap<String, PackageVersion>>,
}

impl PackageRegistry {
    pub fn new(packages: IndexMap<String, IndexMap<String, PackageVersion>>) -> Self {
        Self { packages }
    }

    /// All versions of a package, `None` when the name is unknown
    pub fn versions(&self, name: &str) -> Option<&IndexMap<String, PackageVersion>> {
        self.packages.get(name)
    }

    pub fn get(&self, name: &str, version: &str) -> Option<&PackageVersion> {
        self.packages.get(name)?.get(version)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &IndexMap<String, PackageVersion>)> {
        self.packages.iter()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// The registry document as published by the index generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryDocument {
    pub packages: PackageRegistry,
    #[serde(default)]
    pub generated: String,
}

impl RegistryDocument {
    /// Generation timestamp, when it is valid RFC 3339
    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.generated)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
