use chrono::Utc;
use portfolio_backend::storage::models::{
    cap_photos, profile_word_count, sanitize_quote, validate_achievement, validate_profile,
    validate_quote, validate_rating, Review, ReviewStatus, MAX_ACHIEVEMENT_DESCRIPTION_CHARS,
    MAX_PROFILE_WORDS, MAX_QUOTE_CHARS,
};
use portfolio_backend::storage::Database;

fn test_db() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("data")).unwrap();
    (dir, db)
}

fn sample_review(name: &str) -> Review {
    Review {
        name: name.to_string(),
        title: "CEO".to_string(),
        quote: "Great work all around.".to_string(),
        rating: 9,
        profile_image_url: "http://localhost:8080/static/ProfileImages/x_p.png".to_string(),
        photos: vec![],
        status: ReviewStatus::Pending,
        is_hidden: false,
        created_at: Utc::now(),
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_submitted_review_is_pending() {
    let (_dir, db) = test_db();
    let id = db.add_pending_review(&sample_review("Ada")).unwrap();

    let pending = db.list_pending_reviews().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].0, id);
    assert_eq!(pending[0].1.status, ReviewStatus::Pending);

    assert!(db.list_approved_reviews().unwrap().is_empty());
}

#[test]
fn test_approve_moves_review_to_approved_set() {
    let (_dir, db) = test_db();
    let id = db.add_pending_review(&sample_review("Ada")).unwrap();

    let approved = db
        .approve_review(&id)
        .unwrap()
        .expect("pending review should approve");
    assert_eq!(approved.status, ReviewStatus::Approved);
    assert!(!approved.is_hidden);

    // Present in exactly one set
    assert!(db.get_pending_review(&id).unwrap().is_none());
    let stored = db.get_approved_review(&id).unwrap().expect("approved copy");
    assert_eq!(stored.name, "Ada");
    assert_eq!(stored.status, ReviewStatus::Approved);
    assert!(!stored.is_hidden);
}

#[test]
fn test_approve_unknown_review() {
    let (_dir, db) = test_db();
    assert!(db.approve_review("nonexistent").unwrap().is_none());
}

#[test]
fn test_decline_removes_from_both_sets() {
    let (_dir, db) = test_db();
    let id = db.add_pending_review(&sample_review("Bob")).unwrap();

    assert!(db.decline_review(&id).unwrap());

    assert!(db.get_pending_review(&id).unwrap().is_none());
    assert!(db.get_approved_review(&id).unwrap().is_none());
}

#[test]
fn test_decline_unknown_review() {
    let (_dir, db) = test_db();
    assert!(!db.decline_review("nonexistent").unwrap());
}

#[test]
fn test_hidden_review_leaves_public_listing() {
    let (_dir, db) = test_db();
    let id = db.add_pending_review(&sample_review("Cara")).unwrap();
    db.approve_review(&id).unwrap().unwrap();

    assert_eq!(db.list_visible_reviews().unwrap().len(), 1);

    let hidden = db
        .set_review_hidden(&id, true)
        .unwrap()
        .expect("review should exist");
    assert!(hidden.is_hidden);

    // A fresh fetch of the public listing no longer includes it
    assert!(db.list_visible_reviews().unwrap().is_empty());
    assert_eq!(db.list_approved_reviews().unwrap().len(), 1);

    // And back again
    let shown = db.set_review_hidden(&id, false).unwrap().unwrap();
    assert!(!shown.is_hidden);
    assert_eq!(db.list_visible_reviews().unwrap().len(), 1);
}

#[test]
fn test_toggle_visibility_preserves_other_fields() {
    let (_dir, db) = test_db();
    let id = db.add_pending_review(&sample_review("Dee")).unwrap();
    db.approve_review(&id).unwrap().unwrap();

    let updated = db.set_review_hidden(&id, true).unwrap().unwrap();
    assert_eq!(updated.name, "Dee");
    assert_eq!(updated.rating, 9);
    assert_eq!(updated.status, ReviewStatus::Approved);
}

#[test]
fn test_set_hidden_on_unknown_review() {
    let (_dir, db) = test_db();
    assert!(db.set_review_hidden("nonexistent", true).unwrap().is_none());
}

#[test]
fn test_delete_approved_review() {
    let (_dir, db) = test_db();
    let id = db.add_pending_review(&sample_review("Eve")).unwrap();
    db.approve_review(&id).unwrap().unwrap();

    assert!(db.delete_approved_review(&id).unwrap());
    assert!(db.get_approved_review(&id).unwrap().is_none());
    assert!(db.list_visible_reviews().unwrap().is_empty());
}

#[test]
fn test_approving_one_review_leaves_others_pending() {
    let (_dir, db) = test_db();
    let first = db.add_pending_review(&sample_review("One")).unwrap();
    let second = db.add_pending_review(&sample_review("Two")).unwrap();

    db.approve_review(&first).unwrap().unwrap();

    let pending = db.list_pending_reviews().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].0, second);
}

// ============================================================================
// Field validation
// ============================================================================

#[test]
fn test_quote_boundary() {
    let exactly = "x".repeat(MAX_QUOTE_CHARS);
    assert!(validate_quote(&exactly).is_ok());

    let over = "x".repeat(MAX_QUOTE_CHARS + 1);
    assert!(validate_quote(&over).is_err());

    assert!(validate_quote("").is_err());
}

#[test]
fn test_sanitize_quote_collapses_line_breaks() {
    assert_eq!(sanitize_quote("one\ntwo"), "one two");
    assert_eq!(sanitize_quote("one\r\ntwo\rthree"), "one two three");
    assert_eq!(sanitize_quote("  padded  "), "padded");
}

#[test]
fn test_rating_bounds() {
    assert!(validate_rating(0).is_err());
    assert!(validate_rating(1).is_ok());
    assert!(validate_rating(10).is_ok());
    assert!(validate_rating(11).is_err());
}

#[test]
fn test_photo_cap_truncates_to_three() {
    let mut photos = vec!["a", "b", "c", "d", "e"];
    assert_eq!(cap_photos(&mut photos), 2);
    assert_eq!(photos, vec!["a", "b", "c"]);

    let mut exactly_three = vec!["a", "b", "c"];
    assert_eq!(cap_photos(&mut exactly_three), 0);
    assert_eq!(exactly_three.len(), 3);

    let mut none: Vec<&str> = Vec::new();
    assert_eq!(cap_photos(&mut none), 0);
}

#[test]
fn test_achievement_description_boundary() {
    let exactly = "d".repeat(MAX_ACHIEVEMENT_DESCRIPTION_CHARS);
    assert!(validate_achievement("Title", &exactly).is_ok());

    let over = "d".repeat(MAX_ACHIEVEMENT_DESCRIPTION_CHARS + 1);
    assert!(validate_achievement("Title", &over).is_err());

    assert!(validate_achievement("", "desc").is_err());
    assert!(validate_achievement("Title", "").is_err());
}

#[test]
fn test_profile_word_count_boundary() {
    let words = |n: usize| vec!["word ".repeat(n).trim().to_string()];

    assert_eq!(profile_word_count(&words(MAX_PROFILE_WORDS)), MAX_PROFILE_WORDS);
    assert!(validate_profile("Name", "Title", &words(MAX_PROFILE_WORDS)).is_ok());
    assert!(validate_profile("Name", "Title", &words(MAX_PROFILE_WORDS + 1)).is_err());
}

#[test]
fn test_profile_word_count_spans_paragraphs() {
    let paragraphs = vec![
        "one two three".to_string(),
        String::new(),
        "four five".to_string(),
    ];
    assert_eq!(profile_word_count(&paragraphs), 5);
}

#[test]
fn test_profile_requires_name_title_and_paragraph() {
    let body = vec!["something".to_string()];
    assert!(validate_profile("", "Title", &body).is_err());
    assert!(validate_profile("Name", "", &body).is_err());
    assert!(validate_profile("Name", "Title", &[String::new()]).is_err());
    assert!(validate_profile("Name", "Title", &body).is_ok());
}
