use bytes::Bytes;
use portfolio_backend::object_store::{LocalStore, ObjectStore};

fn test_store(dir: &tempfile::TempDir) -> LocalStore {
    LocalStore::new(dir.path(), "http://localhost:8080").unwrap()
}

#[tokio::test]
async fn test_local_store_put_get() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    let data = Bytes::from("hello world");
    store.put("test-key", data.clone()).await.unwrap();

    let retrieved = store.get("test-key").await.unwrap();
    assert_eq!(retrieved, data);
}

#[tokio::test]
async fn test_local_store_nested_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    // Media keys carry a prefix directory
    let key = "AchievementPictures/abc_trophy.png";
    store.put(key, Bytes::from("img")).await.unwrap();

    assert!(store.exists(key).await.unwrap());
    assert_eq!(store.get(key).await.unwrap(), Bytes::from("img"));
}

#[tokio::test]
async fn test_local_store_exists() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    assert!(!store.exists("missing").await.unwrap());

    store.put("present", Bytes::from("data")).await.unwrap();
    assert!(store.exists("present").await.unwrap());
}

#[tokio::test]
async fn test_local_store_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    store.put("to-delete", Bytes::from("data")).await.unwrap();
    assert!(store.exists("to-delete").await.unwrap());

    store.delete("to-delete").await.unwrap();
    assert!(!store.exists("to-delete").await.unwrap());
}

#[tokio::test]
async fn test_local_store_delete_nonexistent() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    // Deleting a nonexistent key should not error
    store.delete("nonexistent").await.unwrap();
}

#[tokio::test]
async fn test_local_store_get_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    let result = store.get("missing").await;
    assert!(result.is_err());
    assert!(matches!(
        result.unwrap_err(),
        portfolio_backend::object_store::ObjectStoreError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_local_store_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    store.put("key", Bytes::from("first")).await.unwrap();
    store.put("key", Bytes::from("second")).await.unwrap();

    let data = store.get("key").await.unwrap();
    assert_eq!(data, Bytes::from("second"));
}

#[test]
fn test_local_store_public_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path(), "http://cdn.example.com/").unwrap();

    assert_eq!(
        store.public_url("SlideShowPic/x_a.png"),
        "http://cdn.example.com/static/SlideShowPic/x_a.png"
    );
}
