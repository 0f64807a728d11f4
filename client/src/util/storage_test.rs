use super::*;

#[test]
fn memory_storage_reads_back_written_values() {
    let store = MemoryStorage::new();
    store.set("userId", "u1");
    assert_eq!(store.get("userId").as_deref(), Some("u1"));
}

#[test]
fn memory_storage_absent_key_is_none() {
    let store = MemoryStorage::new();
    assert_eq!(store.get("missing"), None);
}

#[test]
fn memory_storage_remove_deletes_entry() {
    let store = MemoryStorage::new();
    store.set("authToken", "t1");
    store.remove("authToken");
    assert_eq!(store.get("authToken"), None);
    assert!(store.is_empty());
}

#[test]
fn memory_storage_clones_share_entries() {
    let a = MemoryStorage::new();
    let b = a.clone();
    a.set("k", "v");
    assert_eq!(b.get("k").as_deref(), Some("v"));
    assert_eq!(b.len(), 1);
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn browser_storage_is_empty_outside_browser() {
    let store = BrowserStorage;
    store.set("userId", "u1");
    assert_eq!(store.get("userId"), None);
    store.remove("userId");
}
