//! Listing filters

use crate::catalog::FlatPackage;
use crate::registry::compat::is_compatible;
use crate::registry::types::{Architecture, Device};
use crate::version::release::OsRelease;

/// Conditions a listed record must meet; `None` means "all"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageFilter {
    /// Case-insensitive substring of the name or description
    pub search: Option<String>,
    pub category: Option<String>,
    pub device: Option<Device>,
    pub arch: Option<Architecture>,
    /// Only versions compatible with this OS release
    pub os_release: Option<OsRelease>,
}

impl PackageFilter {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.trim().is_empty()).then_some(search);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }

    pub fn with_arch(mut self, arch: Architecture) -> Self {
        self.arch = Some(arch);
        self
    }

    pub fn with_os_release(mut self, release: OsRelease) -> Self {
        self.os_release = Some(release);
        self
    }

    pub fn matches(&self, package: &FlatPackage) -> bool {
        let record = &package.record;

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !package.name.to_lowercase().contains(&needle)
                && !record.pkgdesc.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if self
            .category
            .as_ref()
            .is_some_and(|category| !record.categories.contains(category))
        {
            return false;
        }

        if self.device.is_some_and(|device| !record.supports_device(device)) {
            return false;
        }

        if self.arch.is_some_and(|arch| !record.supports_arch(arch)) {
            return false;
        }

        self.os_release
            .is_none_or(|release| is_compatible(record, release))
    }
}
