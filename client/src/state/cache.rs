//! Cached REST query results.
//!
//! DESIGN
//! ======
//! Pages read through this cache so returning to a view does not refetch.
//! Everything in it belongs to the signed-in user, which is why identity
//! switches and sign-out wipe it wholesale.

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use std::collections::HashMap;

use crate::net::types::Project;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryCache {
    /// Project list; `None` until fetched.
    pub projects: Option<Vec<Project>>,
    /// Project details keyed by id.
    pub project_details: HashMap<String, Project>,
}

impl QueryCache {
    pub fn store_projects(&mut self, projects: Vec<Project>) {
        for project in &projects {
            self.project_details.insert(project.id.clone(), project.clone());
        }
        self.projects = Some(projects);
    }

    /// Record a newly created or refetched project.
    pub fn store_project(&mut self, project: Project) {
        if let Some(list) = self.projects.as_mut() {
            match list.iter_mut().find(|p| p.id == project.id) {
                Some(existing) => *existing = project.clone(),
                None => list.push(project.clone()),
            }
        }
        self.project_details.insert(project.id.clone(), project);
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.project_details.get(project_id)
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_none() && self.project_details.is_empty()
    }

    pub fn clear(&mut self) {
        self.projects = None;
        self.project_details.clear();
    }
}
