//! SQLite-backed player store.

use std::{
    path::Path,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, TransactionBehavior, params};

use crate::{
    player::{PlayerRecord, ScoreSubmission, UpsertOutcome},
    types::{Level, UpdateSeq},
};

use super::{PlayerStore, StoreError, StoreResult, now_ms};

const PLAYER_COLUMNS: &str =
    "identity, level, display_image, play_count, last_updated_ms, created_at_ms, update_seq";

const UPSERT_SQL: &str = "INSERT INTO players(identity, level, display_image, play_count, last_updated_ms, created_at_ms, update_seq)
     VALUES (?1, ?2, ?3, 1, ?4, ?4, ?5)
     ON CONFLICT(identity) DO UPDATE SET
         level = MAX(players.level, excluded.level),
         display_image = COALESCE(excluded.display_image, players.display_image),
         play_count = players.play_count + 1,
         last_updated_ms = excluded.last_updated_ms,
         update_seq = excluded.update_seq";

/// Read-only connections opened next to the writer for file databases.
pub const READ_CONNECTIONS: usize = 4;

/// SQLite implementation of [`crate::persist::PlayerStore`].
///
/// Upserts go through a single writer connection. A file database also gets
/// [`READ_CONNECTIONS`] read-only connections, so leaderboard, lookup and
/// stats reads do not queue behind writes. An in-memory database cannot be
/// shared between connections; there every call uses the writer.
pub struct SqlitePlayerStore {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    next_reader: AtomicUsize,
}

impl SqlitePlayerStore {
    /// Opens or creates a SQLite-backed store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let writer = Self::init_connection(Connection::open(path)?)?;
        let readers = (0..READ_CONNECTIONS)
            .map(|_| Self::open_reader(path).map(Mutex::new))
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Self::from_parts(writer, readers))
    }

    /// Opens an in-memory SQLite store.
    pub fn open_in_memory() -> StoreResult<Self> {
        let writer = Self::init_connection(Connection::open_in_memory()?)?;
        Ok(Self::from_parts(writer, Vec::new()))
    }

    /// Number of read-only connections; zero for an in-memory database.
    pub fn reader_count(&self) -> usize {
        self.readers.len()
    }

    fn from_parts(writer: Connection, readers: Vec<Mutex<Connection>>) -> Self {
        Self {
            writer: Mutex::new(writer),
            readers,
            next_reader: AtomicUsize::new(0),
        }
    }

    fn init_connection(conn: Connection) -> StoreResult<Connection> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(conn)
    }

    fn open_reader(path: &Path) -> StoreResult<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Ok(Connection::open_with_flags(path, flags)?)
    }

    fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> StoreResult<T>) -> StoreResult<T> {
        let mut conn = self.writer.lock().map_err(|_| StoreError::Poisoned)?;
        f(&mut conn)
    }

    /// Runs `f` on a read connection, round-robin; falls back to the writer
    /// when there are none.
    fn with_reader<T>(&self, f: impl FnOnce(&Connection) -> StoreResult<T>) -> StoreResult<T> {
        if self.readers.is_empty() {
            return self.with_conn(|conn| f(&*conn));
        }
        let idx = self.next_reader.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[idx]
            .lock()
            .map_err(|_| StoreError::Poisoned)?;
        f(&*conn)
    }
}

impl PlayerStore for SqlitePlayerStore {
    fn upsert(&self, sub: &ScoreSubmission) -> StoreResult<UpsertOutcome> {
        self.with_conn(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let previous = select_player(&tx, &sub.identity)?;
            let seq: i64 = tx.query_row(
                "SELECT COALESCE(MAX(update_seq), 0) + 1 FROM players",
                [],
                |row| row.get(0),
            )?;
            tx.execute(
                UPSERT_SQL,
                params![
                    sub.identity,
                    i64::from(sub.level),
                    sub.display_image,
                    now_ms() as i64,
                    seq,
                ],
            )?;
            let current = select_player(&tx, &sub.identity)?.ok_or_else(|| {
                StoreError::Message(format!("upserted player {} not readable", sub.identity))
            })?;
            tx.commit()?;
            Ok(UpsertOutcome { previous, current })
        })
    }

    fn find_by_identity(&self, identity: &str) -> StoreResult<Option<PlayerRecord>> {
        self.with_reader(|conn| select_player(conn, identity))
    }

    fn count_with_level_greater_than(&self, level: Level) -> StoreResult<u64> {
        self.with_reader(|conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM players WHERE level > ?1",
                params![i64::from(level)],
                |row| row.get(0),
            )?;
            Ok(n as u64)
        })
    }

    fn top_by_level_descending(&self, limit: usize) -> StoreResult<Vec<PlayerRecord>> {
        self.with_reader(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PLAYER_COLUMNS} FROM players
                 ORDER BY level DESC, last_updated_ms ASC, update_seq ASC
                 LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit as i64], row_to_record)?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }

    fn count_all(&self) -> StoreResult<u64> {
        self.with_reader(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))?;
            Ok(n as u64)
        })
    }

    fn average_level(&self) -> StoreResult<Option<f64>> {
        self.with_reader(|conn| {
            let avg: Option<f64> =
                conn.query_row("SELECT AVG(level) FROM players", [], |row| row.get(0))?;
            Ok(avg)
        })
    }

    fn ping(&self) -> StoreResult<()> {
        self.with_reader(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
    }

    fn flush(&self) -> StoreResult<()> {
        self.with_conn(|conn| {
            conn.execute_batch("PRAGMA wal_checkpoint(PASSIVE);")?;
            Ok(())
        })
    }
}

fn select_player(conn: &Connection, identity: &str) -> StoreResult<Option<PlayerRecord>> {
    let rec = conn
        .query_row(
            &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE identity = ?1"),
            params![identity],
            row_to_record,
        )
        .optional()?;
    Ok(rec)
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<PlayerRecord> {
    let level: i64 = row.get(1)?;
    let play_count: i64 = row.get(3)?;
    let last_updated_ms: i64 = row.get(4)?;
    let created_at_ms: i64 = row.get(5)?;
    let update_seq: i64 = row.get(6)?;
    Ok(PlayerRecord {
        identity: row.get(0)?,
        level: level as Level,
        display_image: row.get(2)?,
        play_count: play_count as u64,
        last_updated_ms: last_updated_ms as u64,
        created_at_ms: created_at_ms as u64,
        update_seq: update_seq as UpdateSeq,
    })
}
