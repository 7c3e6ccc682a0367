//! Contract test helpers for validating TaskRepository implementations
//!
//! Any backend must pass these to be interchangeable behind the HTTP layer.
//! Every helper uses freshly generated names, so a shared database can be
//! reused across runs.

use crate::assertions::assert_subtasks;
use rand::Rng;
use task_core::{Task, TaskKey, TaskRepository};

/// Build a key no other test run will collide with
pub fn unique_key(prefix: &str) -> TaskKey {
    let suffix: u64 = rand::thread_rng().gen();
    TaskKey::new(format!("{prefix}-{suffix:016x}"), "2024-01-01")
}

fn task_for(key: &TaskKey, subtasks: &[&str]) -> Task {
    Task::new(
        key.name.clone(),
        key.date.clone(),
        subtasks.iter().map(|s| s.to_string()).collect(),
    )
}

/// Run every contract check against `repo`
pub async fn test_repository_contract<R: TaskRepository + ?Sized>(repo: &R) {
    test_insert_fetch_contract(repo).await;
    test_fetch_missing_contract(repo).await;
    test_empty_subtasks_contract(repo).await;
    test_update_contract(repo).await;
    test_delete_contract(repo).await;
    test_duplicate_key_contract(repo).await;
    test_health_check_contract(repo).await;
}

/// Inserted subtasks read back in order
pub async fn test_insert_fetch_contract<R: TaskRepository + ?Sized>(repo: &R) {
    let key = unique_key("insert");
    repo.insert(&task_for(&key, &["buy milk", "call bob"]))
        .await
        .expect("Insert should succeed");

    let fetched = repo.fetch_by_key(&key).await.expect("Fetch should succeed");
    assert_subtasks(&fetched, &["buy milk", "call bob"]);
}

/// Fetching an unknown key is an empty list, not an error
pub async fn test_fetch_missing_contract<R: TaskRepository + ?Sized>(repo: &R) {
    let fetched = repo
        .fetch_by_key(&unique_key("missing"))
        .await
        .expect("Fetch of unknown key should succeed");
    assert!(fetched.is_empty(), "Unknown key returned {fetched:?}");
}

/// A task stored with no subtasks reads back as an empty list
pub async fn test_empty_subtasks_contract<R: TaskRepository + ?Sized>(repo: &R) {
    let key = unique_key("empty");
    repo.insert(&task_for(&key, &[]))
        .await
        .expect("Insert should succeed");

    let fetched = repo.fetch_by_key(&key).await.expect("Fetch should succeed");
    assert!(fetched.is_empty(), "Empty task returned {fetched:?}");
}

/// Update replaces the list, and a missing key is a silent no-op
pub async fn test_update_contract<R: TaskRepository + ?Sized>(repo: &R) {
    let key = unique_key("update");
    repo.insert(&task_for(&key, &["buy milk", "call bob"]))
        .await
        .expect("Insert should succeed");

    let affected = repo
        .update(&key, &["walk dog".to_string()])
        .await
        .expect("Update should succeed");
    assert_eq!(affected, 1, "Update should touch the single row");

    let fetched = repo.fetch_by_key(&key).await.expect("Fetch should succeed");
    assert_subtasks(&fetched, &["walk dog"]);

    let affected = repo
        .update(&unique_key("update-missing"), &["x".to_string()])
        .await
        .expect("Update of unknown key should succeed");
    assert_eq!(affected, 0, "Update of unknown key should touch nothing");
}

/// Delete removes all rows and is idempotent
pub async fn test_delete_contract<R: TaskRepository + ?Sized>(repo: &R) {
    let key = unique_key("delete");
    repo.insert(&task_for(&key, &["a"]))
        .await
        .expect("Insert should succeed");

    assert_eq!(repo.delete(&key).await.expect("Delete should succeed"), 1);
    assert!(repo.fetch_by_key(&key).await.expect("Fetch should succeed").is_empty());
    assert_eq!(
        repo.delete(&key).await.expect("Second delete should succeed"),
        0,
        "Second delete should touch nothing"
    );
}

/// Rows sharing a key aggregate on fetch and are all hit by update and delete
pub async fn test_duplicate_key_contract<R: TaskRepository + ?Sized>(repo: &R) {
    let key = unique_key("dup");
    repo.insert(&task_for(&key, &["a"]))
        .await
        .expect("First insert should succeed");
    repo.insert(&task_for(&key, &["b", "c"]))
        .await
        .expect("Second insert should succeed");

    let mut fetched = repo.fetch_by_key(&key).await.expect("Fetch should succeed");
    fetched.sort();
    assert_subtasks(&fetched, &["a", "b", "c"]);

    let affected = repo
        .update(&key, &["z".to_string()])
        .await
        .expect("Update should succeed");
    assert_eq!(affected, 2, "Update should touch every row with the key");
    assert_subtasks(
        &repo.fetch_by_key(&key).await.expect("Fetch should succeed"),
        &["z", "z"],
    );

    assert_eq!(repo.delete(&key).await.expect("Delete should succeed"), 2);
}

/// A connected backend reports healthy
pub async fn test_health_check_contract<R: TaskRepository + ?Sized>(repo: &R) {
    repo.health_check()
        .await
        .expect("Health check should succeed");
}
