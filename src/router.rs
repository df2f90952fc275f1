use crate::analysis::{filter_listings, summarize, SearchMode};
use crate::config::AppState;
use crate::db::scrapes::{get_latest_scrape, get_recent_scrapes};
use crate::domain::Listing;
use crate::errors::ServerError;
use crate::geos::city_center;
use crate::responses::{html_response, json_response, redirect_response, ResultResp};
use crate::scraper::{is_scrape_running, spawn_scrape, ScrapeRequest, DEFAULT_TOTAL, MAX_TOTAL};
use crate::spreadsheets::export_listings_xlsx;
use crate::store::{load_listings, StoreError};
use crate::templates;
use crate::templates::pages::{DashboardVm, DataState};
use astra::{Body, Request, ResponseBuilder};
use maud::html;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;

const DEFAULT_QUERY: &str = "Bandung";
const MAIN_CSS: &str = include_str!("../static/main.css");

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let params = parse_query(&req);

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => dashboard(&params, state),
        ("GET", "/api/markers") => markers(&params, state),
        ("GET", "/export") => export(&params, state),
        ("GET", "/runs") => runs(state),
        ("POST", "/scrape") => start_scrape(req, state),
        ("GET", "/static/main.css") => ResponseBuilder::new()
            .status(200)
            .header("Content-Type", "text/css; charset=utf-8")
            .body(Body::from(MAIN_CSS))
            .map_err(|_| ServerError::InternalError),
        _ => Err(ServerError::NotFound),
    }
}

/// The search the user asked for, from `?mode=&q=`.
struct Search {
    mode: SearchMode,
    query: String,
}

impl Search {
    fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            mode: SearchMode::from_param(params.get("mode").map(String::as_str)),
            // Only the very first visit defaults to Bandung; an explicitly
            // empty `q` means "show everything".
            query: params
                .get("q")
                .map(|q| q.trim().to_string())
                .unwrap_or_else(|| DEFAULT_QUERY.to_string()),
        }
    }

    fn apply<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        filter_listings(listings, self.mode.target(), &self.query)
    }
}

/// `None` when nothing has been scraped yet.
fn load_optional(state: &AppState) -> Result<Option<Vec<Listing>>, ServerError> {
    match load_listings(&state.config.data_path) {
        Ok(listings) => Ok(Some(listings)),
        Err(StoreError::Missing(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn dashboard(params: &HashMap<String, String>, state: &AppState) -> ResultResp {
    let search = Search::from_params(params);
    let listings = load_optional(state)?;

    let data = match &listings {
        None => DataState::Missing,
        Some(listings) => {
            let rows = search.apply(listings);
            let summary = summarize(&rows, search.mode.group_by());
            DataState::Loaded { rows, summary }
        }
    };

    let last_run = state
        .db
        .with_conn(|conn| get_latest_scrape(conn))
        .unwrap_or_else(|e| {
            log::warn!("Could not read last scrape run: {e}");
            None
        });

    let vm = DashboardVm {
        mode: search.mode,
        map_center: city_center(&search.query),
        query: search.query,
        data,
        last_run,
        scrape_running: is_scrape_running(),
    };

    html_response(templates::pages::dashboard_page(&vm))
}

#[derive(Debug, Serialize)]
struct MarkersResponse {
    center: [f64; 2],
    markers: Vec<Marker>,
}

#[derive(Debug, Serialize)]
struct Marker {
    name: String,
    lat: f64,
    lng: f64,
    color: &'static str,
    popup: String,
}

impl Marker {
    fn from_listing(listing: &Listing) -> Option<Self> {
        let (lat, lng) = listing.coordinates()?;
        let color = match listing.status {
            Some(crate::domain::OpenStatus::Open) => "blue",
            Some(crate::domain::OpenStatus::Closed) => "red",
            None => "gray",
        };
        let popup = html! {
            b { (listing.name) }
            br;
            "⭐ " (templates::components::rating_text(listing.rating))
            br;
            "🕒 " (templates::components::text_or_dash(listing.hours.as_deref()))
        };

        Some(Self {
            name: listing.name.clone(),
            lat,
            lng,
            color,
            popup: popup.into_string(),
        })
    }
}

fn markers(params: &HashMap<String, String>, state: &AppState) -> ResultResp {
    let search = Search::from_params(params);
    let listings = load_optional(state)?.unwrap_or_default();
    let (lat, lng) = city_center(&search.query);

    let body = MarkersResponse {
        center: [lat, lng],
        markers: search
            .apply(&listings)
            .into_iter()
            .filter_map(Marker::from_listing)
            .collect(),
    };

    json_response(&body)
}

fn export(params: &HashMap<String, String>, state: &AppState) -> ResultResp {
    let search = Search::from_params(params);
    let listings = load_optional(state)?
        .ok_or_else(|| ServerError::BadRequest("Data belum tersedia.".into()))?;

    let rows = search.apply(&listings);
    export_listings_xlsx(&rows, &export_filename(&search.query))
}

fn runs(state: &AppState) -> ResultResp {
    let runs = state.db.with_conn(|conn| get_recent_scrapes(conn))?;
    html_response(templates::pages::runs_page(&runs))
}

fn start_scrape(req: Request, state: &AppState) -> ResultResp {
    let mut body = String::new();
    req.into_body()
        .reader()
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("Unreadable form body: {e}")))?;
    let form = parse_form(&body);

    let request = scrape_request_from_form(&form)?;
    let city = request.city.clone();
    spawn_scrape(state, request)?;

    let location = url::form_urlencoded::Serializer::new(String::from("/?"))
        .append_pair("mode", SearchMode::City.as_param())
        .append_pair("q", &city)
        .finish();
    redirect_response(&location)
}

pub fn scrape_request_from_form(form: &HashMap<String, String>) -> Result<ScrapeRequest, ServerError> {
    let query = form
        .get("query")
        .map(|q| q.trim())
        .filter(|q| !q.is_empty())
        .unwrap_or("kuliner");
    let city = form.get("city").map(|c| c.trim()).unwrap_or("");

    let total = match form.get("total").map(|t| t.trim()).filter(|t| !t.is_empty()) {
        None => DEFAULT_TOTAL,
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=MAX_TOTAL).contains(n))
            .ok_or_else(|| {
                ServerError::BadRequest(format!("total must be between 1 and {MAX_TOTAL}"))
            })?,
    };

    Ok(ScrapeRequest::new(query, city, total))
}

fn export_filename(query: &str) -> String {
    let slug: String = query
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if slug.trim_matches('_').is_empty() {
        "umkm_semua.xlsx".to_string()
    } else {
        format!("umkm_{slug}.xlsx")
    }
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri().query().map(parse_form).unwrap_or_default()
}

fn parse_form(raw: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect()
}
