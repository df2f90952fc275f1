pub mod extract;
mod scraper;
mod scraper_error;
pub mod source;

pub use self::scraper::{
    execute_scrape, is_scrape_running, run_scrape, spawn_scrape, spawn_scrape_with, ScrapeReport, ScrapeRequest,
    StopReason, DEFAULT_TOTAL, MAX_TOTAL,
};
pub use scraper_error::ScraperError;
pub use source::{PageSource, ZenRowsSource};
