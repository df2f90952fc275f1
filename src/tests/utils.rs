use crate::config::{AppConfig, AppState};
use crate::db::connection::init_db;
use crate::domain::{Listing, OpenStatus};
use crate::store::save_listings;
use astra::Response;
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

/// A path in the temp dir that no other test will use.
pub fn temp_path(prefix: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let thread = format!("{:?}", std::thread::current().id())
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>();
    std::env::temp_dir().join(format!("{prefix}_{nanos}_{thread}.{ext}"))
}

/// Fresh state with its own data file path and an initialized database.
pub fn init_test_state() -> AppState {
    let config = AppConfig::from_lookup(|key| match key {
        "UMKM_DATA_PATH" => Some(temp_path("umkm_data", "csv").to_string_lossy().into_owned()),
        "UMKM_DB_PATH" => Some(temp_path("umkm_db", "sqlite").to_string_lossy().into_owned()),
        _ => None,
    });
    let state = AppState::new(config);
    init_db(&state.db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    state
}

/// State whose data file already holds `listings`.
pub fn state_with_listings(listings: &[Listing]) -> AppState {
    let state = init_test_state();
    save_listings(&state.config.data_path, listings).expect("Failed to write test data");
    state
}

pub fn listing(name: &str, city: &str, category: &str, rating: Option<f64>) -> Listing {
    let mut l = Listing::new(name, city, category);
    l.rating = rating;
    l
}

/// A small West Java data set used across the dashboard tests.
pub fn sample_listings() -> Vec<Listing> {
    let mut kopi = listing("Kopi Braga", "Bandung", "Kopi", Some(4.0));
    kopi.status = Some(OpenStatus::Open);
    kopi.hours = Some("Tutup pukul 22.00".into());
    kopi.lat = Some(-6.9175);
    kopi.lng = Some(107.6091);

    let mut kopi2 = listing("Kopi Dago", "Bandung", "Kopi", Some(5.0));
    kopi2.status = Some(OpenStatus::Closed);
    kopi2.lat = Some(-6.8850);
    kopi2.lng = Some(107.6130);

    vec![
        kopi,
        kopi2,
        listing("Bakso Cihampelas", "Bandung", "Bakso", Some(3.0)),
        listing("Bakso Bogor Asli", "Bogor", "Bakso", Some(4.5)),
        listing("Cafe Margonda", "Depok", "Cafe", None),
    ]
}

/// Scrapes share one process-wide guard; tests that run one take this lock.
pub fn scrape_lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

pub fn read_body(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

/// `unwrap_err` without needing `Debug` on the response body.
pub fn expect_err(result: crate::errors::ResultResp) -> crate::errors::ServerError {
    match result {
        Ok(resp) => panic!("expected an error, got status {}", resp.status()),
        Err(e) => e,
    }
}
