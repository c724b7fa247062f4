//! SQLite run archive.
//!
//! RULE: only archive.rs talks to the database. The in-memory EventLog is
//! the authoritative history during a run; the archive is a write-behind
//! sink for replay and inspection tooling.

use crate::error::SimResult;
use crate::event::WorldEvent;
use crate::types::Tick;
use rusqlite::{params, Connection};

pub struct RunArchive {
    conn: Connection,
}

impl RunArchive {
    /// Open (or create) the archive database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance for inspection tools.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_kernel.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: u64,
        version: &str,
        started_at: &str,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, started_at],
        )?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    /// Store one event, payload as the boundary-contract JSON.
    pub fn append_event(&self, run_id: &str, event: &WorldEvent) -> SimResult<()> {
        let payload = serde_json::to_string(event)?;
        self.conn.execute(
            "INSERT INTO event_log (run_id, event_id, tick, category, subtype, significance, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run_id,
                event.id.0 as i64,
                event.timestamp as i64,
                event.category.name(),
                event.subtype,
                event.significance as i64,
                payload,
            ],
        )?;
        Ok(())
    }

    /// All archived events of a run, parsed, in id order.
    pub fn events_for_run(&self, run_id: &str) -> SimResult<Vec<WorldEvent>> {
        let mut events = Vec::new();
        for payload in self.payloads_for_run(run_id)? {
            events.push(serde_json::from_str(&payload)?);
        }
        Ok(events)
    }

    /// Raw payload strings in id order. Used for byte-exact determinism
    /// comparisons.
    pub fn payloads_for_run(&self, run_id: &str) -> SimResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM event_log WHERE run_id = ?1 ORDER BY event_id ASC",
        )?;
        let payloads = stmt
            .query_map(params![run_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(payloads)
    }

    pub fn events_for_tick(&self, run_id: &str, tick: Tick) -> SimResult<Vec<WorldEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM event_log
             WHERE run_id = ?1 AND tick = ?2
             ORDER BY event_id ASC",
        )?;
        let payloads = stmt
            .query_map(params![run_id, tick as i64], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;
        let mut events = Vec::new();
        for payload in payloads {
            events.push(serde_json::from_str(&payload)?);
        }
        Ok(events)
    }

    pub fn event_count(&self, run_id: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── Snapshot ───────────────────────────────────────────────

    pub fn save_snapshot(&self, run_id: &str, tick: Tick, state_json: &str) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO snapshot (run_id, tick, state_json) VALUES (?1, ?2, ?3)",
            params![run_id, tick as i64, state_json],
        )?;
        Ok(())
    }

    pub fn latest_snapshot_before(
        &self,
        run_id: &str,
        tick: Tick,
    ) -> SimResult<Option<(Tick, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT tick, state_json FROM snapshot
             WHERE run_id = ?1 AND tick <= ?2
             ORDER BY tick DESC LIMIT 1",
        )?;
        let result = stmt
            .query_row(params![run_id, tick as i64], |row| {
                Ok((row.get::<_, i64>(0)? as u64, row.get::<_, String>(1)?))
            })
            .ok();
        Ok(result)
    }
}
