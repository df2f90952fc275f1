// source.rs
use crate::scraper::ScraperError;
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use std::collections::HashMap;
use std::time::Duration;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

const ZENROWS_ENDPOINT: &str = "https://api.zenrows.com/v1/";
const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// Something that can hand back the rendered results page after
/// `scrolls` scrolls of the results feed.
pub trait PageSource {
    fn load(&mut self, search_term: &str, scrolls: usize) -> Result<String, ScraperError>;
}

/// Renders the maps search page through ZenRows with JS enabled and
/// scrolls the results feed with injected JS instructions.
pub struct ZenRowsSource {
    client: Client,
    api_key: String,
}

impl ZenRowsSource {
    pub fn new(api_key: Option<String>) -> Result<Self, ScraperError> {
        let api_key = api_key.ok_or_else(|| {
            ScraperError::Config("ZENROWS_API_KEY environment variable not set".into())
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(360))
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Self { client, api_key })
    }

    fn try_load(&self, page_url: &str, scrolls: usize) -> Result<String, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));

        let mut params = HashMap::new();
        params.insert("url", page_url.to_string());
        params.insert("apikey", self.api_key.clone());
        params.insert("js_render", "true".to_string());
        params.insert("wait_for", r#"div[role="feed"]"#.to_string());
        params.insert("js_instructions", scroll_instructions(scrolls));
        params.insert("original_status", "true".to_string());

        let resp = self
            .client
            .get(ZENROWS_ENDPOINT)
            .headers(headers)
            .query(&params)
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        if status.as_u16() == 403 || status.as_u16() == 429 {
            return Err(ScraperError::Blocked(format!("ZenRows HTTP {status}")));
        }
        if !status.is_success() {
            return Err(ScraperError::Network(format!("ZenRows HTTP {status}: {text}")));
        }

        if text.starts_with('{') {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&text) {
                if json.get("code").is_some() {
                    return Err(ScraperError::Network(format!("ZenRows API error: {text}")));
                }
            }
        }

        Ok(text)
    }
}

impl PageSource for ZenRowsSource {
    fn load(&mut self, search_term: &str, scrolls: usize) -> Result<String, ScraperError> {
        const MAX_ATTEMPTS: u64 = 5;
        const MAX_BACKOFF_SECS: u64 = 10;
        const JITTER_MAX_SECS: u64 = 2;

        let page_url = search_url(search_term);
        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            let start = std::time::Instant::now();

            match self.try_load(&page_url, scrolls) {
                Ok(html) => {
                    log::debug!("ZenRows success attempt {attempt} in {:?}", start.elapsed());
                    return Ok(html);
                }
                Err(e) => {
                    log::warn!(
                        "⚠️ ZenRows attempt {attempt} failed in {:?}: {e}",
                        start.elapsed()
                    );
                    last_err = Some(e);

                    if attempt < MAX_ATTEMPTS {
                        let base = std::cmp::min(2 * attempt, MAX_BACKOFF_SECS);
                        let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_SECS);
                        std::thread::sleep(Duration::from_secs(base + jitter));
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| ScraperError::Network("ZenRows retry loop failed".into())))
    }
}

pub fn search_url(search_term: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(search_term.trim().as_bytes()).collect();
    format!("{MAPS_SEARCH_URL}{encoded}")
}

/// JS instructions that scroll the results feed `scrolls` times.
pub fn scroll_instructions(scrolls: usize) -> String {
    let mut steps = vec![serde_json::json!({ "wait": 3000 })];
    for _ in 0..scrolls {
        steps.push(serde_json::json!({
            "evaluate": r#"document.querySelector('div[role="feed"]').scrollBy(0, 10000)"#
        }));
        steps.push(serde_json::json!({ "wait": 2000 }));
    }
    serde_json::Value::Array(steps).to_string()
}
