use levelboard::{
    player::{PlayerRecord, ScoreSubmission, ValidationError, leaderboard_order},
    types::MAX_IDENTITY_CHARS,
};

fn sub(identity: &str, level: i64, image: Option<&str>) -> ScoreSubmission {
    ScoreSubmission::new(identity, level, image).expect("valid submission")
}

#[test]
fn identity_is_trimmed_and_truncated() {
    let long = format!("  {}  ", "x".repeat(80));
    assert_eq!(sub(&long, 3, None).identity.chars().count(), MAX_IDENTITY_CHARS);
    assert_eq!(sub("  Alice ", 3, None).identity, "Alice");
    assert_eq!(
        ScoreSubmission::new("   ", 3, None),
        Err(ValidationError::MissingIdentity)
    );
}

#[test]
fn truncation_counts_characters_not_bytes() {
    let name = "é".repeat(60);
    let s = sub(&name, 1, None);
    assert_eq!(s.identity, "é".repeat(MAX_IDENTITY_CHARS));
}

#[test]
fn level_bounds_are_inclusive() {
    assert!(ScoreSubmission::new("a", 1, None).is_ok());
    assert!(ScoreSubmission::new("a", 1000, None).is_ok());
    assert_eq!(
        ScoreSubmission::new("a", 0, None),
        Err(ValidationError::InvalidLevel)
    );
    assert_eq!(
        ScoreSubmission::new("a", 1001, None),
        Err(ValidationError::InvalidLevel)
    );
    assert_eq!(
        ScoreSubmission::new("a", -5, None),
        Err(ValidationError::InvalidLevel)
    );
}

#[test]
fn blank_image_counts_as_absent() {
    assert_eq!(sub("a", 2, Some("  ")).display_image, None);
    assert_eq!(sub("a", 2, Some("pic.png")).display_image.as_deref(), Some("pic.png"));
}

#[test]
fn apply_keeps_best_level_and_image_unless_replaced() {
    let mut rec = PlayerRecord::create(&sub("p", 7, Some("a.png")), 10, 1);
    assert_eq!(rec.play_count, 1);

    rec.apply_submission(&sub("p", 3, None), 20, 2);
    assert_eq!(rec.level, 7);
    assert_eq!(rec.display_image.as_deref(), Some("a.png"));
    assert_eq!(rec.play_count, 2);
    assert_eq!(rec.last_updated_ms, 20);
    assert_eq!(rec.created_at_ms, 10);

    rec.apply_submission(&sub("p", 9, Some("b.png")), 30, 3);
    assert_eq!(rec.level, 9);
    assert_eq!(rec.display_image.as_deref(), Some("b.png"));
    assert_eq!(rec.play_count, 3);
    assert_eq!(rec.update_seq, 3);
}

#[test]
fn ties_order_by_earlier_update() {
    let a = PlayerRecord::create(&sub("a", 5, None), 100, 2);
    let b = PlayerRecord::create(&sub("b", 5, None), 50, 3);
    let c = PlayerRecord::create(&sub("c", 6, None), 200, 4);
    let d = PlayerRecord::create(&sub("d", 5, None), 100, 1);

    let mut all = vec![a, b, c, d];
    all.sort_by(leaderboard_order);
    let ids: Vec<_> = all.iter().map(|r| r.identity.as_str()).collect();
    assert_eq!(ids, ["c", "b", "d", "a"]);
}
