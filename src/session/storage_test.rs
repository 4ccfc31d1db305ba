use super::*;

fn temp_path() -> PathBuf {
    std::env::temp_dir().join(format!("cms-storage-{}.json", uuid::Uuid::new_v4()))
}

// =============================================================================
// MemoryStorage
// =============================================================================

#[test]
fn memory_set_get_remove() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get("token").unwrap(), None);

    storage.set("token", "abc").unwrap();
    assert_eq!(storage.get("token").unwrap().as_deref(), Some("abc"));

    storage.remove("token").unwrap();
    assert_eq!(storage.get("token").unwrap(), None);
}

#[test]
fn memory_remove_missing_key_is_ok() {
    let storage = MemoryStorage::new();
    assert!(storage.remove("nope").is_ok());
}

// =============================================================================
// FileStorage
// =============================================================================

#[test]
fn file_missing_reads_as_empty() {
    let storage = FileStorage::new(temp_path());
    assert_eq!(storage.get("userData").unwrap(), None);
}

#[test]
fn file_values_survive_a_new_instance() {
    let path = temp_path();
    {
        let storage = FileStorage::new(&path);
        storage.set("token", "t-1").unwrap();
        storage.set("refresh", "r-1").unwrap();
    }

    let reopened = FileStorage::new(&path);
    assert_eq!(reopened.get("token").unwrap().as_deref(), Some("t-1"));
    assert_eq!(reopened.get("refresh").unwrap().as_deref(), Some("r-1"));

    let _ = std::fs::remove_file(path);
}

#[test]
fn file_remove_deletes_only_that_key() {
    let path = temp_path();
    let storage = FileStorage::new(&path);
    storage.set("token", "t").unwrap();
    storage.set("refresh", "r").unwrap();

    storage.remove("token").unwrap();

    assert_eq!(storage.get("token").unwrap(), None);
    assert_eq!(storage.get("refresh").unwrap().as_deref(), Some("r"));

    let _ = std::fs::remove_file(path);
}

#[test]
fn file_creates_parent_directories() {
    let dir = std::env::temp_dir().join(format!("cms-dir-{}", uuid::Uuid::new_v4()));
    let path = dir.join("nested").join("session.json");
    let storage = FileStorage::new(&path);

    storage.set("token", "t").unwrap();
    assert!(path.exists());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn file_corrupt_contents_error_on_read_and_reset_on_write() {
    let path = temp_path();
    std::fs::write(&path, b"{not json").unwrap();
    let storage = FileStorage::new(&path);

    assert!(matches!(storage.get("token"), Err(StoreError::Serialize(_))));

    storage.set("token", "fresh").unwrap();
    assert_eq!(storage.get("token").unwrap().as_deref(), Some("fresh"));

    let _ = std::fs::remove_file(path);
}
