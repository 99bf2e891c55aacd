use portfolio_backend::storage::{Database, ACHIEVEMENTS, APPROVED_REVIEWS, PENDING_REVIEWS};
use serde_json::{json, Value};

fn test_db() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("data")).unwrap();
    (dir, db)
}

#[test]
fn test_set_and_get_document() {
    let (_dir, db) = test_db();
    let doc = json!({"title": "First", "count": 3});

    db.set_document(ACHIEVEMENTS, "doc-1", &doc).unwrap();

    let retrieved: Value = db
        .get_document(ACHIEVEMENTS, "doc-1")
        .unwrap()
        .expect("document should exist");
    assert_eq!(retrieved["title"], "First");
    assert_eq!(retrieved["count"], 3);
}

#[test]
fn test_get_document_not_found() {
    let (_dir, db) = test_db();
    let missing: Option<Value> = db.get_document(ACHIEVEMENTS, "nonexistent").unwrap();
    assert!(missing.is_none());
}

#[test]
fn test_set_document_overwrites() {
    let (_dir, db) = test_db();
    db.set_document(ACHIEVEMENTS, "doc-2", &json!({"title": "Old"}))
        .unwrap();
    db.set_document(ACHIEVEMENTS, "doc-2", &json!({"title": "New"}))
        .unwrap();

    let doc: Value = db.get_document(ACHIEVEMENTS, "doc-2").unwrap().unwrap();
    assert_eq!(doc["title"], "New");
}

#[test]
fn test_add_document_generates_distinct_ids() {
    let (_dir, db) = test_db();
    let a = db
        .add_document(PENDING_REVIEWS, &json!({"name": "a"}))
        .unwrap();
    let b = db
        .add_document(PENDING_REVIEWS, &json!({"name": "b"}))
        .unwrap();
    assert_ne!(a, b);

    let doc: Value = db.get_document(PENDING_REVIEWS, &a).unwrap().unwrap();
    assert_eq!(doc["name"], "a");
}

#[test]
fn test_list_documents() {
    let (_dir, db) = test_db();
    db.set_document(ACHIEVEMENTS, "a", &json!({"title": "A"}))
        .unwrap();
    db.set_document(ACHIEVEMENTS, "b", &json!({"title": "B"}))
        .unwrap();

    let docs: Vec<(String, Value)> = db.list_documents(ACHIEVEMENTS).unwrap();
    assert_eq!(docs.len(), 2);
    let ids: Vec<&str> = docs.iter().map(|(id, _)| id.as_str()).collect();
    assert!(ids.contains(&"a"));
    assert!(ids.contains(&"b"));
}

#[test]
fn test_merge_document_preserves_other_fields() {
    let (_dir, db) = test_db();
    db.set_document(
        ACHIEVEMENTS,
        "doc-3",
        &json!({"title": "Keep", "description": "Old", "count": 7}),
    )
    .unwrap();

    let mut fields = serde_json::Map::new();
    fields.insert("description".to_string(), Value::from("New"));

    assert!(db.merge_document(ACHIEVEMENTS, "doc-3", &fields).unwrap());

    let doc: Value = db.get_document(ACHIEVEMENTS, "doc-3").unwrap().unwrap();
    assert_eq!(doc["title"], "Keep");
    assert_eq!(doc["description"], "New");
    assert_eq!(doc["count"], 7);
}

#[test]
fn test_merge_document_missing_returns_false() {
    let (_dir, db) = test_db();
    let mut fields = serde_json::Map::new();
    fields.insert("x".to_string(), Value::from(1));
    assert!(!db.merge_document(ACHIEVEMENTS, "nonexistent", &fields).unwrap());
}

#[test]
fn test_delete_document() {
    let (_dir, db) = test_db();
    db.set_document(ACHIEVEMENTS, "doc-4", &json!({"title": "Bye"}))
        .unwrap();

    assert!(db.delete_document(ACHIEVEMENTS, "doc-4").unwrap());
    assert!(!db.delete_document(ACHIEVEMENTS, "doc-4").unwrap());

    let missing: Option<Value> = db.get_document(ACHIEVEMENTS, "doc-4").unwrap();
    assert!(missing.is_none());
}

// ============================================================================
// Array-field set operations
// ============================================================================

#[test]
fn test_add_to_set_deduplicates() {
    let (_dir, db) = test_db();
    db.set_document(ACHIEVEMENTS, "set-1", &json!({"items": []}))
        .unwrap();

    let member = json!({"url": "http://x/a.png", "path": "a.png"});
    assert!(db.add_to_set(ACHIEVEMENTS, "set-1", "items", &member).unwrap());
    assert!(db.add_to_set(ACHIEVEMENTS, "set-1", "items", &member).unwrap());

    let doc: Value = db.get_document(ACHIEVEMENTS, "set-1").unwrap().unwrap();
    assert_eq!(doc["items"].as_array().unwrap().len(), 1);
}

#[test]
fn test_add_to_set_creates_missing_field() {
    let (_dir, db) = test_db();
    db.set_document(ACHIEVEMENTS, "set-2", &json!({"title": "no array yet"}))
        .unwrap();

    assert!(db
        .add_to_set(ACHIEVEMENTS, "set-2", "items", &json!("first"))
        .unwrap());

    let doc: Value = db.get_document(ACHIEVEMENTS, "set-2").unwrap().unwrap();
    assert_eq!(doc["items"], json!(["first"]));
}

#[test]
fn test_add_to_set_missing_document() {
    let (_dir, db) = test_db();
    assert!(!db
        .add_to_set(ACHIEVEMENTS, "nonexistent", "items", &json!(1))
        .unwrap());
}

#[test]
fn test_remove_from_set_structural_equality() {
    let (_dir, db) = test_db();
    let a = json!({"url": "http://x/a.png", "path": "a.png"});
    let b = json!({"url": "http://x/b.png", "path": "b.png"});
    db.set_document(ACHIEVEMENTS, "set-3", &json!({"items": [a, b]}))
        .unwrap();

    // A partial match is not a match
    let near_miss = json!({"url": "http://x/a.png", "path": "other.png"});
    assert!(!db
        .remove_from_set(ACHIEVEMENTS, "set-3", "items", &near_miss)
        .unwrap());

    let exact = json!({"url": "http://x/a.png", "path": "a.png"});
    assert!(db
        .remove_from_set(ACHIEVEMENTS, "set-3", "items", &exact)
        .unwrap());

    let doc: Value = db.get_document(ACHIEVEMENTS, "set-3").unwrap().unwrap();
    let items = doc["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["path"], "b.png");
}

#[test]
fn test_remove_from_set_no_match_returns_false() {
    let (_dir, db) = test_db();
    db.set_document(ACHIEVEMENTS, "set-4", &json!({"items": ["a"]}))
        .unwrap();
    assert!(!db
        .remove_from_set(ACHIEVEMENTS, "set-4", "items", &json!("z"))
        .unwrap());
}

// ============================================================================
// Cross-collection move
// ============================================================================

#[test]
fn test_move_document_transforms_and_relocates() {
    let (_dir, db) = test_db();
    db.set_document(PENDING_REVIEWS, "rev-1", &json!({"name": "Ada", "status": "pending"}))
        .unwrap();

    let moved = db
        .move_document(PENDING_REVIEWS, APPROVED_REVIEWS, "rev-1", |mut doc| {
            doc["status"] = Value::from("approved");
            doc
        })
        .unwrap()
        .expect("document should move");
    assert_eq!(moved["status"], "approved");

    let gone: Option<Value> = db.get_document(PENDING_REVIEWS, "rev-1").unwrap();
    assert!(gone.is_none());

    let landed: Value = db.get_document(APPROVED_REVIEWS, "rev-1").unwrap().unwrap();
    assert_eq!(landed["name"], "Ada");
    assert_eq!(landed["status"], "approved");
}

#[test]
fn test_move_document_missing_source() {
    let (_dir, db) = test_db();
    let moved = db
        .move_document(PENDING_REVIEWS, APPROVED_REVIEWS, "nonexistent", |doc| doc)
        .unwrap();
    assert!(moved.is_none());

    let untouched: Option<Value> = db.get_document(APPROVED_REVIEWS, "nonexistent").unwrap();
    assert!(untouched.is_none());
}
