//! Resolver with a per-`(name, release)` answer cache

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::registry::compat::is_compatible;
use crate::registry::error::ResolveError;
use crate::registry::resolver::{InstallabilityResolver, ResolveBudget};
use crate::registry::resolvers::{Meter, VisitPath};
use crate::registry::types::{PackageRegistry, PackageVersion};
use crate::version::release::OsRelease;

/// Resolver that remembers answers across branches and queries
///
/// An answer for a name depends on the path that reached it only when the
/// name sits on a `depends` cycle. Answers for names outside every cycle are
/// cached and reused; names on a cycle are always walked like
/// [`super::ReferenceResolver`] does, so both resolvers agree.
///
/// The cache lives as long as the resolver. Not `Sync`.
pub struct MemoizedResolver<'r> {
    registry: &'r PackageRegistry,
    budget: ResolveBudget,
    answers: RefCell<HashMap<(String, OsRelease), bool>>,
    on_cycle: RefCell<HashMap<String, bool>>,
}

impl<'r> MemoizedResolver<'r> {
    pub fn new(registry: &'r PackageRegistry) -> Self {
        Self {
            registry,
            budget: ResolveBudget::unlimited(),
            answers: RefCell::new(HashMap::new()),
            on_cycle: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_budget(mut self, budget: ResolveBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Number of cached answers
    pub fn cached_answers(&self) -> usize {
        self.answers.borrow().len()
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
            return Ok(true);
        };

        let key = (name.to_string(), release);
        if let Some(&answer) = self.answers.borrow().get(&key) {
            trace!("Cached answer for {} on {}: {}", name, release, answer);
            return Ok(answer);
        }

        let here = VisitPath::push(path, name);
        let mut answer = false;
        for record in versions.values().filter(|r| is_compatible(r, release)) {
            if self.dependencies_installable(record, release, &here, meter)? {
                answer = true;
                break;
            }
        }

        if !self.is_on_cycle(name) {
            self.answers.borrow_mut().insert(key, answer);
        }
        Ok(answer)
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

    /// Whether `name` can reach itself through `depends` of any version
    fn is_on_cycle(&self, name: &str) -> bool {
        if let Some(&cached) = self.on_cycle.borrow().get(name) {
            return cached;
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = self.dependency_names(name).collect();
        let mut found = false;
        while let Some(next) = stack.pop() {
            if next == name {
                found = true;
                break;
            }
            if seen.insert(next) {
                stack.extend(self.dependency_names(next));
            }
        }

        self.on_cycle.borrow_mut().insert(name.to_string(), found);
        found
    }

    /// Registry-known dependency names across all versions of `name`
    fn dependency_names<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.registry
            .versions(name)
            .into_iter()
            .flat_map(|versions| versions.values())
            .flat_map(|record| record.depends.iter())
            .map(|dep| dep.name.as_str())
            .filter(|dep| self.registry.contains(dep))
    }
}

impl InstallabilityResolver for MemoizedResolver<'_> {
    fn registry(&self) -> &PackageRegistry {
        self.registry
    }

    fn is_installable(&self, name: &str, release: OsRelease) -> Result<bool, ResolveError> {
        let meter = Meter::new(self.budget);
        let result = self.visit(name, release, None, &meter);
        debug!(
            "Resolved {} on {} in {} steps ({} cached answers): {:?}",
            name,
            release,
            meter.steps(),
            self.cached_answers(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::resolvers::ReferenceResolver;
    use crate::registry::testing::{registry, version};

    fn release(s: &str) -> OsRelease {
        OsRelease::parse(s)
    }

    /// Layers of `width` packages, each depending on every package of the next layer
    fn dense_registry(depth: usize, width: usize) -> PackageRegistry {
        let names: Vec<Vec<String>> = (0..depth)
            .map(|d| (0..width).map(|w| format!("p{d}_{w}")).collect())
            .collect();

        let mut packages = Vec::new();
        for d in 0..depth {
            let deps: Vec<&str> = names
                .get(d + 1)
                .map(|layer| layer.iter().map(String::as_str).collect())
                .unwrap_or_default();
            for name in &names[d] {
                packages.push((name.as_str(), vec![("1.0", version(None, None, &deps))]));
            }
        }
        registry(packages)
    }

    #[test]
    fn shared_dependencies_are_resolved_once() {
        let registry = dense_registry(8, 4);
        let budget = ResolveBudget::unlimited().with_max_steps(500);

        let memoized = MemoizedResolver::new(&registry).with_budget(budget);
        let reference = ReferenceResolver::new(&registry).with_budget(budget);

        assert_eq!(memoized.is_installable("p0_0", release("3.10")), Ok(true));
        assert!(matches!(
            reference.is_installable("p0_0", release("3.10")),
            Err(ResolveError::BudgetExhausted { .. })
        ));
    }

    #[test]
    fn cycle_members_are_not_cached() {
        let registry = registry(vec![
            ("a", vec![("1.0", version(None, None, &["b"]))]),
            ("b", vec![("1.0", version(None, None, &["a", "leaf"]))]),
            ("leaf", vec![("1.0", version(None, None, &[]))]),
        ]);

        let resolver = MemoizedResolver::new(&registry);

        assert_eq!(resolver.is_installable("a", release("3.10")), Ok(true));
        assert_eq!(resolver.cached_answers(), 1);
        assert!(resolver.is_on_cycle("a"));
        assert!(resolver.is_on_cycle("b"));
        assert!(!resolver.is_on_cycle("leaf"));
    }

    #[test]
    fn answers_are_cached_per_release() {
        let registry = registry(vec![(
            "app",
            vec![("1.0", version(None, Some("3.10"), &[]))],
        )]);

        let resolver = MemoizedResolver::new(&registry);

        assert_eq!(resolver.is_installable("app", release("3.5")), Ok(true));
        assert_eq!(resolver.is_installable("app", release("3.15")), Ok(false));
        assert_eq!(resolver.cached_answers(), 2);
        assert_eq!(resolver.is_installable("app", release("3.5")), Ok(true));
    }
}
