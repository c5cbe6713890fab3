//! Tests for the Store handle
//!
//! These tests verify:
//! - Open/close lifecycle and re-open
//! - Durability inference from the path
//! - Point lookups and NotFound
//! - Merge folding in commit order
//! - Persistence across sessions

use tagkv::{Config, Durability, KvError, Store};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup_temp_store(name: &str) -> (TempDir, Store) {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let mut store = Store::new();
    store.open(temp_dir.path().join(name)).unwrap();
    (temp_dir, store)
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_open_twice_fails_with_already_open() {
    let (temp, mut store) = setup_temp_store("store.db");

    let err = store.open(temp.path().join("other.db")).unwrap_err();

    assert!(matches!(err, KvError::AlreadyOpen));
    assert!(store.is_open());
}

#[test]
fn test_close_is_idempotent() {
    let (_temp, mut store) = setup_temp_store("store.db");

    store.close().unwrap();
    store.close().unwrap();

    assert!(!store.is_open());
    assert_eq!(store.durability(), None);
}

#[test]
fn test_reopen_after_close() {
    let (temp, mut store) = setup_temp_store("store.db");
    let path = temp.path().join("store.db");

    store.set(b'T', "kept", "1").unwrap();
    store.commit().unwrap();
    store.set(b'T', "dropped", "2").unwrap();
    store.close().unwrap();

    store.open(&path).unwrap();

    assert_eq!(store.pending(), 0);
    assert_eq!(&store.get(b'T', "kept").unwrap()[..], b"1");
    assert!(store.get(b'T', "dropped").unwrap_err().is_not_found());
}

#[test]
fn test_open_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("dir").join("store.db");
    let mut store = Store::new();

    store.open(&path).unwrap();

    assert!(path.exists());
}

#[test]
fn test_engine_open_error_is_propagated() {
    let (temp, _store) = setup_temp_store("locked.db");
    let mut second = Store::new();

    let err = second.open(temp.path().join("locked.db")).unwrap_err();

    assert!(matches!(err, KvError::Database(_)), "got {:?}", err);
    assert!(!second.is_open());
}

#[test]
fn test_second_handle_opens_after_first_closes() {
    let (temp, mut first) = setup_temp_store("shared.db");
    first.set(b'S', "k", "v").unwrap();
    first.commit().unwrap();
    first.close().unwrap();

    let mut second = Store::new();
    second.open(temp.path().join("shared.db")).unwrap();

    assert_eq!(&second.get(b'S', "k").unwrap()[..], b"v");
}

// =============================================================================
// Durability Tests
// =============================================================================

#[test]
fn test_db_suffix_opens_durable() {
    let (_temp, store) = setup_temp_store("store.db");
    assert_eq!(store.durability(), Some(Durability::Durable));
}

#[test]
fn test_other_suffix_opens_fast() {
    let (_temp, store) = setup_temp_store("range.store");
    assert_eq!(store.durability(), Some(Durability::Fast));
}

#[test]
fn test_config_overrides_durability() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .path(temp.path().join("forced.store"))
        .durability(Durability::Durable)
        .cache_size(4 * 1024 * 1024)
        .build();
    let mut store = Store::new();

    store.open_with(config).unwrap();

    assert_eq!(store.durability(), Some(Durability::Durable));
}

#[test]
fn test_fast_mode_commits_survive_close() {
    let (temp, mut store) = setup_temp_store("fast.store");

    store.set(b'F', "k", "v").unwrap();
    store.commit().unwrap();
    store.close().unwrap();

    store.open(temp.path().join("fast.store")).unwrap();
    assert_eq!(&store.get(b'F', "k").unwrap()[..], b"v");
}

#[test]
fn test_fast_mode_flush() {
    let (_temp, mut store) = setup_temp_store("fast.store");

    store.set(b'F', "k", "v").unwrap();
    store.commit().unwrap();
    store.flush().unwrap();

    assert_eq!(&store.get(b'F', "k").unwrap()[..], b"v");
}

// =============================================================================
// Read/Write Tests
// =============================================================================

#[test]
fn test_get_missing_key_is_not_found() {
    let (_temp, store) = setup_temp_store("store.db");

    let err = store.get(b'T', "missing").unwrap_err();

    assert!(err.is_not_found());
}

#[test]
fn test_uncommitted_set_is_invisible() {
    let (_temp, mut store) = setup_temp_store("store.db");

    store.set(b'T', "k", "v").unwrap();

    assert_eq!(store.pending(), 1);
    assert!(store.get(b'T', "k").unwrap_err().is_not_found());

    store.commit().unwrap();

    assert_eq!(store.pending(), 0);
    assert_eq!(&store.get(b'T', "k").unwrap()[..], b"v");
}

#[test]
fn test_set_overwrites() {
    let (_temp, mut store) = setup_temp_store("store.db");

    store.set(b'T', "k", "old").unwrap();
    store.commit().unwrap();
    store.set(b'T', "k", "new").unwrap();
    store.commit().unwrap();

    assert_eq!(&store.get(b'T', "k").unwrap()[..], b"new");
}

#[test]
fn test_tags_isolate_equal_keys() {
    let (_temp, mut store) = setup_temp_store("store.db");

    store.set(b'A', "k", "from-a").unwrap();
    store.set(b'B', "k", "from-b").unwrap();
    store.commit().unwrap();

    assert_eq!(&store.get(b'A', "k").unwrap()[..], b"from-a");
    assert_eq!(&store.get(b'B', "k").unwrap()[..], b"from-b");
    assert!(store.get(b'C', "k").unwrap_err().is_not_found());
}

#[test]
fn test_delete_removes_key() {
    let (_temp, mut store) = setup_temp_store("store.db");
    store.set(b'T', "k", "v").unwrap();
    store.commit().unwrap();

    store.delete(b'T', "k").unwrap();
    store.delete(b'T', "never-existed").unwrap();
    store.commit().unwrap();

    assert!(store.get(b'T', "k").unwrap_err().is_not_found());
}

// =============================================================================
// Merge Tests
// =============================================================================

#[test]
fn test_merge_concatenates_across_commits() {
    let (_temp, mut store) = setup_temp_store("store.db");

    store.merge(b'T', "now", "now").unwrap();
    assert!(store.get(b'T', "now").unwrap_err().is_not_found());
    store.commit().unwrap();
    assert_eq!(&store.get(b'T', "now").unwrap()[..], b"now");

    store.merge(b'T', "now", " is ").unwrap();
    store.merge(b'T', "now", "later").unwrap();
    store.commit().unwrap();

    assert_eq!(&store.get(b'T', "now").unwrap()[..], b"now is later");
}

#[test]
fn test_merge_after_set_in_same_batch() {
    let (_temp, mut store) = setup_temp_store("store.db");

    store.set(b'T', "k", "base").unwrap();
    store.merge(b'T', "k", "+1").unwrap();
    store.commit().unwrap();

    assert_eq!(&store.get(b'T', "k").unwrap()[..], b"base+1");
}

#[test]
fn test_merge_is_order_sensitive_and_associative() {
    let (_temp, mut store) = setup_temp_store("store.db");

    // "a", "b", "c" in one commit
    for part in ["a", "b", "c"] {
        store.merge(b'M', "one-batch", part).unwrap();
    }
    store.commit().unwrap();

    // "a", then "bc" (itself the merge of "b" and "c")
    store.merge(b'M', "bc", "b").unwrap();
    store.merge(b'M', "bc", "c").unwrap();
    store.commit().unwrap();
    let bc = store.get(b'M', "bc").unwrap();
    store.merge(b'M', "two-batches", "a").unwrap();
    store.commit().unwrap();
    store.merge(b'M', "two-batches", &bc).unwrap();
    store.commit().unwrap();

    // "c", "b", "a" reordered
    for part in ["c", "b", "a"] {
        store.merge(b'M', "reordered", part).unwrap();
    }
    store.commit().unwrap();

    let one = store.get(b'M', "one-batch").unwrap();
    let two = store.get(b'M', "two-batches").unwrap();
    let reordered = store.get(b'M', "reordered").unwrap();

    assert_eq!(&one[..], b"abc");
    assert_eq!(one, two);
    assert_ne!(one, reordered);
}

#[test]
fn test_set_after_merge_overwrites() {
    let (_temp, mut store) = setup_temp_store("store.db");

    store.merge(b'T', "k", "x").unwrap();
    store.set(b'T', "k", "reset").unwrap();
    store.commit().unwrap();

    assert_eq!(&store.get(b'T', "k").unwrap()[..], b"reset");
}
