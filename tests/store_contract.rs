use std::{sync::Arc, thread};

use levelboard::{
    core::store::MemoryPlayerStore,
    persist::{PlayerStore, sqlite::SqlitePlayerStore},
    player::ScoreSubmission,
};

fn sub(identity: &str, level: i64, image: Option<&str>) -> ScoreSubmission {
    ScoreSubmission::new(identity, level, image).expect("valid submission")
}

fn backends() -> Vec<(&'static str, Arc<dyn PlayerStore>)> {
    let memory: Arc<dyn PlayerStore> = Arc::new(MemoryPlayerStore::new());
    let single: Arc<dyn PlayerStore> = Arc::new(MemoryPlayerStore::with_shards(1));
    let sqlite: Arc<dyn PlayerStore> =
        Arc::new(SqlitePlayerStore::open_in_memory().expect("open sqlite"));
    vec![("memory", memory), ("memory-1-shard", single), ("sqlite", sqlite)]
}

#[test]
fn empty_store_reports_nothing() {
    for (name, store) in backends() {
        assert_eq!(store.count_all().unwrap(), 0, "{name}");
        assert_eq!(store.average_level().unwrap(), None, "{name}");
        assert_eq!(store.top_level().unwrap(), None, "{name}");
        assert!(store.top_by_level_descending(10).unwrap().is_empty(), "{name}");
        assert_eq!(store.find_by_identity("ghost").unwrap(), None, "{name}");
        assert_eq!(store.count_with_level_greater_than(0).unwrap(), 0, "{name}");
        store.ping().expect("ping");
    }
}

#[test]
fn upsert_reports_previous_state_and_applies_max_wins() {
    for (name, store) in backends() {
        let first = store.upsert(&sub("alice", 5, Some("a.png"))).unwrap();
        assert_eq!(first.previous, None, "{name}");
        assert_eq!(first.current.level, 5, "{name}");
        assert_eq!(first.current.play_count, 1, "{name}");
        assert_eq!(first.current.created_at_ms, first.current.last_updated_ms, "{name}");

        let second = store.upsert(&sub("alice", 3, None)).unwrap();
        assert_eq!(second.previous.as_ref().map(|r| r.level), Some(5), "{name}");
        assert_eq!(second.current.level, 5, "{name}");
        assert_eq!(second.current.play_count, 2, "{name}");
        assert_eq!(second.current.display_image.as_deref(), Some("a.png"), "{name}");
        assert_eq!(second.current.created_at_ms, first.current.created_at_ms, "{name}");
        assert!(second.current.update_seq > first.current.update_seq, "{name}");

        let third = store.upsert(&sub("alice", 9, Some("b.png"))).unwrap();
        assert_eq!(third.current.level, 9, "{name}");
        assert_eq!(third.current.play_count, 3, "{name}");
        assert_eq!(third.current.display_image.as_deref(), Some("b.png"), "{name}");

        let stored = store.find_by_identity("alice").unwrap().expect("stored");
        assert_eq!(stored, third.current, "{name}");
    }
}

#[test]
fn identities_are_case_sensitive() {
    for (name, store) in backends() {
        store.upsert(&sub("Bob", 4, None)).unwrap();
        store.upsert(&sub("bob", 6, None)).unwrap();
        assert_eq!(store.count_all().unwrap(), 2, "{name}");
        assert_eq!(store.find_by_identity("Bob").unwrap().unwrap().level, 4, "{name}");
    }
}

#[test]
fn ordering_counts_and_aggregates() {
    for (name, store) in backends() {
        store.upsert(&sub("a", 10, None)).unwrap();
        store.upsert(&sub("b", 30, None)).unwrap();
        store.upsert(&sub("c", 20, None)).unwrap();
        store.upsert(&sub("d", 30, None)).unwrap();
        store.upsert(&sub("e", 15, None)).unwrap();

        let top: Vec<_> = store
            .top_by_level_descending(3)
            .unwrap()
            .into_iter()
            .map(|r| r.identity)
            .collect();
        assert_eq!(top, ["b", "d", "c"], "{name}");

        assert_eq!(store.top_by_level_descending(0).unwrap().len(), 0, "{name}");
        assert_eq!(store.top_by_level_descending(100).unwrap().len(), 5, "{name}");
        assert_eq!(store.count_with_level_greater_than(20).unwrap(), 2, "{name}");
        assert_eq!(store.count_with_level_greater_than(30).unwrap(), 0, "{name}");
        assert_eq!(store.count_with_level_greater_than(9).unwrap(), 5, "{name}");
        assert_eq!(store.count_all().unwrap(), 5, "{name}");
        assert_eq!(store.average_level().unwrap(), Some(21.0), "{name}");
        assert_eq!(store.top_level().unwrap().unwrap().identity, "b", "{name}");
    }
}

#[test]
fn replaying_a_tied_level_moves_player_behind_earlier_achiever() {
    for (name, store) in backends() {
        store.upsert(&sub("first", 8, None)).unwrap();
        store.upsert(&sub("second", 8, None)).unwrap();
        store.upsert(&sub("first", 2, None)).unwrap();

        let top: Vec<_> = store
            .top_by_level_descending(2)
            .unwrap()
            .into_iter()
            .map(|r| r.identity)
            .collect();
        assert_eq!(top, ["second", "first"], "{name}");
        assert_eq!(store.top_level().unwrap().unwrap().identity, "second", "{name}");
    }
}

#[test]
fn concurrent_same_identity_upserts_lose_nothing() {
    for (name, store) in backends() {
        let levels: Vec<i64> = (1..=40).map(|i| (i * 37) % 997 + 1).collect();
        let max = *levels.iter().max().unwrap();

        thread::scope(|s| {
            for level in &levels {
                let store = Arc::clone(&store);
                s.spawn(move || {
                    store.upsert(&sub("racer", *level, None)).expect("upsert");
                });
            }
        });

        let rec = store.find_by_identity("racer").unwrap().expect("stored");
        assert_eq!(i64::from(rec.level), max, "{name}");
        assert_eq!(rec.play_count, levels.len() as u64, "{name}");
    }
}

#[test]
fn concurrent_distinct_identities_all_land() {
    for (name, store) in backends() {
        thread::scope(|s| {
            for i in 0..32i64 {
                let store = Arc::clone(&store);
                s.spawn(move || {
                    store
                        .upsert(&sub(&format!("p{i}"), i + 1, None))
                        .expect("upsert");
                });
            }
        });

        assert_eq!(store.count_all().unwrap(), 32, "{name}");
        assert_eq!(store.top_level().unwrap().unwrap().level, 32, "{name}");
    }
}
