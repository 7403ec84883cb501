use std::{
    hash::{BuildHasher, RandomState},
    sync::{
        RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use hashbrown::HashMap;

use crate::{
    persist::{PlayerStore, StoreError, StoreResult, now_ms},
    player::{PlayerRecord, ScoreSubmission, UpsertOutcome, leaderboard_order},
    types::Level,
};

const DEFAULT_SHARDS: usize = 16;

type Shard = RwLock<HashMap<String, PlayerRecord>>;

/// Player records held in memory, split across independently locked shards.
///
/// An upsert holds one shard's write lock for its whole read-decide-write
/// step, so submissions for the same identity serialize while submissions
/// landing in other shards proceed in parallel.
#[derive(Debug)]
pub struct MemoryPlayerStore {
    shards: Vec<Shard>,
    hasher: RandomState,
    next_seq: AtomicU64,
}

impl Default for MemoryPlayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPlayerStore {
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    pub fn with_shards(count: usize) -> Self {
        let count = count.max(1);
        Self {
            shards: (0..count).map(|_| RwLock::new(HashMap::new())).collect(),
            hasher: RandomState::new(),
            next_seq: AtomicU64::new(1),
        }
    }

    /// All records in leaderboard order.
    pub fn export_records(&self) -> StoreResult<Vec<PlayerRecord>> {
        let mut out = Vec::new();
        for shard in &self.shards {
            let map = shard.read().map_err(|_| StoreError::Poisoned)?;
            out.extend(map.values().cloned());
        }
        out.sort_unstable_by(leaderboard_order);
        Ok(out)
    }

    fn shard_for(&self, identity: &str) -> &Shard {
        let idx = (self.hasher.hash_one(identity) as usize) % self.shards.len();
        &self.shards[idx]
    }

    fn fold_records<T>(&self, init: T, mut f: impl FnMut(T, &PlayerRecord) -> T) -> StoreResult<T> {
        let mut acc = init;
        for shard in &self.shards {
            let map = shard.read().map_err(|_| StoreError::Poisoned)?;
            for rec in map.values() {
                acc = f(acc, rec);
            }
        }
        Ok(acc)
    }
}

impl PlayerStore for MemoryPlayerStore {
    fn upsert(&self, sub: &ScoreSubmission) -> StoreResult<UpsertOutcome> {
        let mut map = self
            .shard_for(&sub.identity)
            .write()
            .map_err(|_| StoreError::Poisoned)?;
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let now = now_ms();

        if let Some(rec) = map.get_mut(&sub.identity) {
            let previous = rec.clone();
            rec.apply_submission(sub, now, seq);
            return Ok(UpsertOutcome {
                previous: Some(previous),
                current: rec.clone(),
            });
        }

        let rec = PlayerRecord::create(sub, now, seq);
        map.insert(rec.identity.clone(), rec.clone());
        Ok(UpsertOutcome {
            previous: None,
            current: rec,
        })
    }

    fn find_by_identity(&self, identity: &str) -> StoreResult<Option<PlayerRecord>> {
        let map = self
            .shard_for(identity)
            .read()
            .map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(identity).cloned())
    }

    fn count_with_level_greater_than(&self, level: Level) -> StoreResult<u64> {
        self.fold_records(0u64, |n, rec| if rec.level > level { n + 1 } else { n })
    }

    fn top_by_level_descending(&self, limit: usize) -> StoreResult<Vec<PlayerRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut all = self.export_records()?;
        all.truncate(limit);
        Ok(all)
    }

    fn count_all(&self) -> StoreResult<u64> {
        let mut total = 0u64;
        for shard in &self.shards {
            total += shard.read().map_err(|_| StoreError::Poisoned)?.len() as u64;
        }
        Ok(total)
    }

    fn average_level(&self) -> StoreResult<Option<f64>> {
        let (count, sum) = self.fold_records((0u64, 0u64), |(n, s), rec| {
            (n + 1, s + u64::from(rec.level))
        })?;
        if count == 0 {
            return Ok(None);
        }
        Ok(Some(sum as f64 / count as f64))
    }

    fn top_level(&self) -> StoreResult<Option<PlayerRecord>> {
        self.fold_records(None::<PlayerRecord>, |best, rec| match best {
            Some(b) if leaderboard_order(&b, rec).is_le() => Some(b),
            _ => Some(rec.clone()),
        })
    }
}
