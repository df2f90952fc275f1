// scraper.rs
use crate::config::AppState;
use crate::db::scrapes::{end_scrape_run, start_scrape_run, RunOutcome};
use crate::domain::{Listing, ListingSet};
use crate::errors::ServerError;
use crate::scraper::extract::{extract_listings, reached_end_of_list};
use crate::scraper::{PageSource, ScraperError, ZenRowsSource};
use crate::store::save_listings;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

pub const DEFAULT_TOTAL: usize = 40;
pub const MAX_TOTAL: usize = 500;
const DEFAULT_MAX_SCROLLS: usize = 30;

// Only one scrape may write the data file at a time.
static SCRAPE_IN_PROGRESS: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeRequest {
    /// What to search for, e.g. "kuliner".
    pub query: String,
    /// Region appended to the search and stamped on every row.
    pub city: String,
    pub total: usize,
    pub max_scrolls: usize,
}

impl ScrapeRequest {
    pub fn new(query: impl Into<String>, city: impl Into<String>, total: usize) -> Self {
        Self {
            query: query.into(),
            city: city.into(),
            total,
            max_scrolls: DEFAULT_MAX_SCROLLS,
        }
    }

    pub fn search_term(&self) -> String {
        format!("{} {}", self.query.trim(), self.city.trim())
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    EndOfList,
    NoProgress,
    ScrollLimit,
    Failed,
}

impl StopReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::TargetReached => "target_reached",
            StopReason::EndOfList => "end_of_list",
            StopReason::NoProgress => "no_progress",
            StopReason::ScrollLimit => "scroll_limit",
            StopReason::Failed => "failed",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct ScrapeReport {
    pub listings: Vec<Listing>,
    pub requested: usize,
    pub scrolls: usize,
    pub stop_reason: StopReason,
    pub error: Option<ScraperError>,
}

impl ScrapeReport {
    pub fn collected(&self) -> usize {
        self.listings.len()
    }

    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.listings.len())
    }
}

/// Scroll the results feed until `request.total` unique listings are
/// collected or the feed stops giving us anything new.
///
/// A failed page load ends the run but keeps what was already collected;
/// the error travels back in the report.
pub fn run_scrape<S: PageSource>(source: &mut S, request: &ScrapeRequest) -> ScrapeReport {
    let term = request.search_term();
    let mut set = ListingSet::new();
    let mut scrolls = 0;

    let (stop_reason, error) = loop {
        if set.len() >= request.total {
            break (StopReason::TargetReached, None);
        }

        let html = match source.load(&term, scrolls) {
            Ok(html) => html,
            Err(e) => {
                log::error!("❌ Loading results for '{term}' failed after {scrolls} scrolls: {e}");
                break (StopReason::Failed, Some(e));
            }
        };

        let cards = match extract_listings(&html, &request.city) {
            Ok(cards) => cards,
            Err(e) => break (StopReason::Failed, Some(e)),
        };

        let before = set.len();
        for listing in cards {
            if set.len() >= request.total {
                break;
            }
            set.push(listing);
        }
        let added = set.len() - before;

        log::info!(
            "📄 Scroll {scrolls}: +{added} listings ({} / {})",
            set.len(),
            request.total
        );

        if set.len() >= request.total {
            break (StopReason::TargetReached, None);
        }
        if reached_end_of_list(&html) {
            break (StopReason::EndOfList, None);
        }
        if added == 0 {
            break (StopReason::NoProgress, None);
        }
        if scrolls >= request.max_scrolls {
            break (StopReason::ScrollLimit, None);
        }
        scrolls += 1;
    };

    let report = ScrapeReport {
        listings: set.into_vec(),
        requested: request.total,
        scrolls,
        stop_reason,
        error,
    };

    if report.shortfall() > 0 {
        log::warn!(
            "🏁 Stopped ({}) with {} of {} listings",
            report.stop_reason,
            report.collected(),
            report.requested
        );
    } else {
        log::info!("✅ Collected {} listings", report.collected());
    }

    report
}

/// Run a scrape end to end: record it, scroll, and overwrite the data file.
///
/// The data file is only replaced when at least one listing was collected,
/// so a failed run never wipes the previous data.
pub fn execute_scrape<S: PageSource>(
    state: &AppState,
    source: &mut S,
    request: &ScrapeRequest,
) -> Result<ScrapeReport, ServerError> {
    let guard = ScrapeGuard::acquire()?;
    record_scrape(&guard, state, source, request)
}

/// Body of a scrape. Only callable while the caller holds the guard.
fn record_scrape<S: PageSource>(
    _guard: &ScrapeGuard,
    state: &AppState,
    source: &mut S,
    request: &ScrapeRequest,
) -> Result<ScrapeReport, ServerError> {
    let run_id = state.db.with_conn(|conn| {
        start_scrape_run(
            conn,
            &request.query,
            &request.city,
            request.total,
            chrono::Utc::now().timestamp(),
        )
    })?;

    let report = run_scrape(source, request);

    let mut error = report.error.as_ref().map(|e| e.to_string());
    if !report.listings.is_empty() {
        if let Err(e) = save_listings(&state.config.data_path, &report.listings) {
            log::error!("Saving listings failed: {e}");
            error = Some(e.to_string());
        }
    }

    let outcome = RunOutcome {
        collected: report.collected(),
        stop_reason: report.stop_reason.as_str(),
        success: error.is_none(),
        error,
    };
    state
        .db
        .with_conn(|conn| end_scrape_run(conn, run_id, chrono::Utc::now().timestamp(), &outcome))?;

    Ok(report)
}

/// Start a ZenRows scrape on a background thread. Fails fast if the key is
/// missing or another scrape is running.
pub fn spawn_scrape(state: &AppState, request: ScrapeRequest) -> Result<(), ServerError> {
    if is_scrape_running() {
        return Err(ServerError::Conflict("a scrape is already running".into()));
    }
    let source = ZenRowsSource::new(state.config.zenrows_api_key.clone())
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;

    spawn_scrape_with(state, source, request).map(|_| ())
}

/// Claims the scrape slot on the calling thread, then hands it to the worker.
/// The slot is released when the worker finishes.
pub fn spawn_scrape_with<S: PageSource + Send + 'static>(
    state: &AppState,
    mut source: S,
    request: ScrapeRequest,
) -> Result<JoinHandle<()>, ServerError> {
    let guard = ScrapeGuard::acquire()?;

    let state = state.clone(); // cheap clone (paths only)
    let handle = std::thread::spawn(move || {
        log::info!("🧵 Scraper thread started for '{}'", request.search_term());
        if let Err(e) = record_scrape(&guard, &state, &mut source, &request) {
            log::error!("Scrape failed: {e}");
        }
    });

    Ok(handle)
}

pub fn is_scrape_running() -> bool {
    SCRAPE_IN_PROGRESS.load(Ordering::SeqCst)
}

struct ScrapeGuard;

impl ScrapeGuard {
    fn acquire() -> Result<Self, ServerError> {
        SCRAPE_IN_PROGRESS
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ScrapeGuard)
            .map_err(|_| ServerError::Conflict("a scrape is already running".into()))
    }
}

impl Drop for ScrapeGuard {
    fn drop(&mut self) {
        SCRAPE_IN_PROGRESS.store(false, Ordering::SeqCst);
    }
}
