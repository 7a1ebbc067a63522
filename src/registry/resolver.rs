//! Installability resolver trait
//!
//! Answers "can this package be installed on this OS release?" by walking the
//! `depends` graph. A package is installable when at least one of its
//! OS-compatible versions has every dependency installable in turn.
//!
//! Two rules keep the walk total:
//! - a name already being resolved on the current path counts as installable
//!   (cycles break optimistically)
//! - a name missing from the registry counts as installable (provided by the
//!   system, e.g. `/bin/sh`)

use std::time::Duration;

use crate::registry::compat::is_compatible;
use crate::registry::error::ResolveError;
use crate::registry::types::PackageRegistry;
use crate::version::release::OsRelease;

/// Limits for a single resolution query
///
/// The walk can be exponential on dense graphs. Exceeding a limit yields
/// [`ResolveError`] instead of an answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveBudget {
    /// Maximum number of package visits
    pub max_steps: Option<u64>,
    /// Wall-clock limit
    pub timeout: Option<Duration>,
}

impl ResolveBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Trait for installability resolution strategies
///
/// Implementations must agree on every answer; they differ only in cost.
pub trait InstallabilityResolver {
    /// The registry this resolver walks
    fn registry(&self) -> &PackageRegistry;

    /// Check whether any compatible version of `name` is installable on `release`
    ///
    /// # Returns
    /// * `Ok(true)` - installable, or `name` is not in the registry
    /// * `Ok(false)` - no compatible version has all dependencies installable
    /// * `Err(ResolveError)` - the budget ran out before an answer was reached
    fn is_installable(&self, name: &str, release: OsRelease) -> Result<bool, ResolveError>;

    /// Check whether one specific version of `name` is installable on `release`
    ///
    /// An unknown version of a known package is not installable.
    fn is_version_installable(
        &self,
        name: &str,
        version: &str,
        release: OsRelease,
    ) -> Result<bool, ResolveError>;

    /// Versions of `name` that are installable on `release`, in document order
    fn installable_versions(
        &self,
        name: &str,
        release: OsRelease,
    ) -> Result<Vec<String>, ResolveError> {
        let Some(versions) = self.registry().versions(name) else {
            return Ok(Vec::new());
        };

        let mut installable = Vec::new();
        for (version, record) in versions {
            if is_compatible(record, release)
                && self.is_version_installable(name, version, release)?
            {
                installable.push(version.clone());
            }
        }
        Ok(installable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_builders_set_limits() {
        let budget = ResolveBudget::unlimited()
            .with_max_steps(10)
            .with_timeout(Duration::from_millis(50));

        assert_eq!(budget.max_steps, Some(10));
        assert_eq!(budget.timeout, Some(Duration::from_millis(50)));
    }

    #[test]
    fn unlimited_budget_has_no_limits() {
        assert_eq!(
            ResolveBudget::unlimited(),
            ResolveBudget {
                max_steps: None,
                timeout: None
            }
        );
    }
}
