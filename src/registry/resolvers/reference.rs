//! Un-memoized resolver; defines the expected answers

use tracing::{debug, trace};

use crate::registry::compat::is_compatible;
use crate::registry::error::ResolveError;
use crate::registry::resolver::{InstallabilityResolver, ResolveBudget};
use crate::registry::resolvers::{Meter, VisitPath};
use crate::registry::types::{PackageRegistry, PackageVersion};
use crate::version::release::OsRelease;

/// Resolver that re-verifies every branch independently
///
/// Shared (diamond) dependencies are walked once per path that reaches
/// them, so cost grows exponentially with graph depth and fan-out.
pub struct ReferenceResolver<'r> {
    registry: &'r PackageRegistry,
    budget: ResolveBudget,
}

impl<'r> ReferenceResolver<'r> {
    pub fn new(registry: &'r PackageRegistry) -> Self {
        Self {
            registry,
            budget: ResolveBudget::unlimited(),
        }
    }

    pub fn with_budget(mut self, budget: ResolveBudget) -> Self {
        self.budget = budget;
        self
    }

    fn visit(
        &self,
        name: &str,
        release: OsRelease,
        path: Option<&VisitPath<'_>>,
        meter: &Meter,
    ) -> Result<bool, ResolveError> {
        meter.tick()?;

        if VisitPath::contains(path, name) {
            trace!("Cycle through {}, assuming installable", name);
            return Ok(true);
        }

        let Some(versions) = self.registry.versions(name) else {
            trace!("{} is not in the registry, assuming provided", name);
            return Ok(true);
        };

        let here = VisitPath::push(path, name);
        let mut compatible = versions
            .values()
            .filter(|record| is_compatible(record, release))
            .peekable();

        if compatible.peek().is_none() {
            debug!("No version of {} is compatible with {}", name, release);
            return Ok(false);
        }

        for record in compatible {
            if self.dependencies_installable(record, release, &here, meter)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn dependencies_installable(
        &self,
        record: &PackageVersion,
        release: OsRelease,
        here: &VisitPath<'_>,
        meter: &Meter,
    ) -> Result<bool, ResolveError> {
        for dep in &record.depends {
            if !self.visit(&dep.name, release, Some(here), meter)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl InstallabilityResolver for ReferenceResolver<'_> {
    fn registry(&self) -> &PackageRegistry {
        self.registry
    }

    fn is_installable(&self, name: &str, release: OsRelease) -> Result<bool, ResolveError> {
        let meter = Meter::new(self.budget);
        let result = self.visit(name, release, None, &meter);
        debug!(
            "Resolved {} on {} in {} steps: {:?}",
            name,
            release,
            meter.steps(),
            result
        );
        result
    }

    fn is_version_installable(
        &self,
        name: &str,
        version: &str,
        release: OsRelease,
    ) -> Result<bool, ResolveError> {
        let Some(versions) = self.registry.versions(name) else {
            return Ok(true);
        };
        let Some(record) = versions.get(version) else {
            return Ok(false);
        };
        if !is_compatible(record, release) {
            return Ok(false);
        }

        let meter = Meter::new(self.budget);
        meter.tick()?;
        let here = VisitPath::push(None, name);
        self.dependencies_installable(record, release, &here, &meter)
    }
}
