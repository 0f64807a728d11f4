use super::*;

fn project(id: &str, name: &str) -> Project {
    Project {
        id: id.to_owned(),
        name: name.to_owned(),
        description: String::new(),
        owner_id: None,
    }
}

#[test]
fn default_cache_is_empty() {
    assert!(QueryCache::default().is_empty());
}

#[test]
fn store_projects_indexes_details() {
    let mut cache = QueryCache::default();
    cache.store_projects(vec![project("p1", "Hive"), project("p2", "Comb")]);
    assert_eq!(cache.projects.as_ref().map(Vec::len), Some(2));
    assert_eq!(cache.project("p2").map(|p| p.name.as_str()), Some("Comb"));
}

#[test]
fn store_project_updates_list_in_place() {
    let mut cache = QueryCache::default();
    cache.store_projects(vec![project("p1", "Hive")]);
    cache.store_project(project("p1", "Hive 2"));
    cache.store_project(project("p3", "New"));
    let names: Vec<_> = cache.projects.as_ref().unwrap().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Hive 2", "New"]);
}

#[test]
fn store_project_without_list_only_caches_details() {
    let mut cache = QueryCache::default();
    cache.store_project(project("p1", "Hive"));
    assert!(cache.projects.is_none());
    assert!(cache.project("p1").is_some());
}

#[test]
fn clear_drops_everything() {
    let mut cache = QueryCache::default();
    cache.store_projects(vec![project("p1", "Hive")]);
    cache.clear();
    assert!(cache.is_empty());
}
