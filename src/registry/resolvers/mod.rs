//! Installability resolver implementations

mod memoized;
mod reference;

pub use memoized::MemoizedResolver;
pub use reference::ReferenceResolver;

use std::cell::Cell;
use std::time::Instant;

use crate::registry::error::ResolveError;
use crate::registry::resolver::ResolveBudget;

/// Names being resolved on the current branch, innermost first
///
/// Lives on the call stack, so siblings never see each other's entries.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VisitPath<'a> {
    name: &'a str,
    parent: Option<&'a VisitPath<'a>>,
}

impl<'a> VisitPath<'a> {
    pub(crate) fn push(parent: Option<&'a VisitPath<'a>>, name: &'a str) -> Self {
        Self { name, parent }
    }

    pub(crate) fn contains(path: Option<&VisitPath<'_>>, name: &str) -> bool {
        let mut current = path;
        while let Some(node) = current {
            if node.name == name {
                return true;
            }
            current = node.parent;
        }
        false
    }
}

/// Counts visits and enforces a [`ResolveBudget`] for one query
#[derive(Debug)]
pub(crate) struct Meter {
    budget: ResolveBudget,
    steps: Cell<u64>,
    started: Instant,
}

impl Meter {
    pub(crate) fn new(budget: ResolveBudget) -> Self {
        Self {
            budget,
            steps: Cell::new(0),
            started: Instant::now(),
        }
    }

    /// Record one visit, failing once a limit is exceeded
    pub(crate) fn tick(&self) -> Result<(), ResolveError> {
        let steps = self.steps.get() + 1;
        self.steps.set(steps);

        if let Some(max_steps) = self.budget.max_steps.filter(|&max| steps > max) {
            return Err(ResolveError::BudgetExhausted { steps: max_steps });
        }

        if let Some(timeout) = self.budget.timeout {
            let elapsed = self.started.elapsed();
            if elapsed > timeout {
                return Err(ResolveError::TimedOut { elapsed });
            }
        }

        Ok(())
    }

    pub(crate) fn steps(&self) -> u64 {
        self.steps.get()
    }
}
