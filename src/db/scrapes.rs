use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeRun {
    pub id: i64,
    pub query: String,
    pub city: String,
    pub requested: i64,
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub collected: Option<i64>,
    pub stop_reason: Option<String>,
    pub success: bool,
    pub error_message: Option<String>,
}

impl ScrapeRun {
    pub fn is_running(&self) -> bool {
        self.finished_at.is_none()
    }

    /// How many listings the run fell short of the requested count.
    pub fn shortfall(&self) -> Option<i64> {
        self.collected.map(|c| (self.requested - c).max(0))
    }
}

/// Outcome recorded when a run ends.
pub struct RunOutcome<'a> {
    pub collected: usize,
    pub stop_reason: &'a str,
    pub success: bool,
    pub error: Option<String>,
}

pub fn start_scrape_run(
    conn: &Connection,
    query: &str,
    city: &str,
    requested: usize,
    now: i64,
) -> Result<i64, ServerError> {
    conn.execute(
        "INSERT INTO scrape_runs (query, city, requested, started_at, success) VALUES (?, ?, ?, ?, 0)",
        params![query, city, requested as i64, now],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

pub fn end_scrape_run(
    conn: &Connection,
    run_id: i64,
    now: i64,
    outcome: &RunOutcome<'_>,
) -> Result<(), ServerError> {
    conn.execute(
        "UPDATE scrape_runs SET finished_at = ?, collected = ?, stop_reason = ?, success = ?, error_message = ? WHERE id = ?",
        params![
            now,
            outcome.collected as i64,
            outcome.stop_reason,
            outcome.success,
            outcome.error,
            run_id
        ],
    )
    .map_err(|e| ServerError::DbError(e.to_string()))?;
    Ok(())
}

const SELECT_RUNS: &str = "SELECT id, query, city, requested, started_at, finished_at, collected, stop_reason, success, error_message FROM scrape_runs";

fn map_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScrapeRun> {
    Ok(ScrapeRun {
        id: row.get(0)?,
        query: row.get(1)?,
        city: row.get(2)?,
        requested: row.get(3)?,
        started_at: row.get(4)?,
        finished_at: row.get(5)?,
        collected: row.get(6)?,
        stop_reason: row.get(7)?,
        success: row.get(8)?,
        error_message: row.get(9)?,
    })
}

pub fn get_latest_scrape(conn: &Connection) -> Result<Option<ScrapeRun>, ServerError> {
    conn.query_row(
        &format!("{SELECT_RUNS} ORDER BY started_at DESC, id DESC LIMIT 1"),
        [],
        map_run,
    )
    .optional()
    .map_err(|e| ServerError::DbError(e.to_string()))
}

pub fn get_recent_scrapes(conn: &Connection) -> Result<Vec<ScrapeRun>, ServerError> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_RUNS} ORDER BY started_at DESC, id DESC LIMIT 50"))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], map_run)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut runs = Vec::new();
    for r in rows {
        runs.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(runs)
}
