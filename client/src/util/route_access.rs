//! Project-scoped route classification.
//!
//! A route is project-scoped when its first path segment is in the scoped
//! set and not in the exclusion set. Scoped routes need a selected project;
//! everything else is always allowed.

#[cfg(test)]
#[path = "route_access_test.rs"]
mod route_access_test;

use std::collections::BTreeSet;

/// First path segments that need an active project by default.
pub const DEFAULT_PROJECT_SCOPED: &[&str] = &["project", "projects", "board", "backlog", "sprint", "contacts", "messages"];

/// Segments exempted from the scoped set by default. `/projects` is where a
/// project gets selected, so it cannot require one.
pub const DEFAULT_EXCLUDED: &[&str] = &["projects"];

/// Result of a single permission evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDecision {
    pub allowed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteAccess {
    scoped: BTreeSet<String>,
    excluded: BTreeSet<String>,
}

impl Default for RouteAccess {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT_SCOPED, DEFAULT_EXCLUDED)
    }
}

impl RouteAccess {
    pub fn new(scoped: &[&str], excluded: &[&str]) -> Self {
        Self {
            scoped: scoped.iter().map(|s| (*s).to_owned()).collect(),
            excluded: excluded.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Same scoped set with `segment` no longer excluded.
    #[must_use]
    pub fn including(mut self, segment: &str) -> Self {
        self.excluded.remove(segment);
        self
    }

    /// Same scoped set with `segment` excluded.
    #[must_use]
    pub fn excluding(mut self, segment: &str) -> Self {
        self.excluded.insert(segment.to_owned());
        self
    }

    pub fn is_project_scoped(&self, path: &str) -> bool {
        first_segment(path).is_some_and(|seg| self.scoped.contains(seg) && !self.excluded.contains(seg))
    }

    pub fn evaluate(&self, path: &str, selected_project_id: Option<&str>) -> RouteDecision {
        let allowed = !self.is_project_scoped(path) || selected_project_id.is_some_and(|id| !id.trim().is_empty());
        RouteDecision { allowed }
    }
}

/// First non-empty path segment, ignoring any query string or fragment.
pub fn first_segment(path: &str) -> Option<&str> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].split('/').find(|seg| !seg.is_empty())
}
