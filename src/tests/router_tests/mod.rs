mod dashboard_tests;
mod scrape_tests;
