use crate::config::{AppConfig, AppState};
use crate::db::connection::init_db;
use crate::router::handle;
use crate::scraper::{execute_scrape, ScrapeRequest, ZenRowsSource, DEFAULT_TOTAL};
use astra::Server;

mod analysis;
mod config;
mod db;
mod domain;
mod errors;
mod geos;
mod responses;
mod router;
mod scraper;
mod spreadsheets;
mod store;
mod templates;

#[cfg(test)]
mod tests;

const USAGE: &str = "usage: umkm_dashboard [scrape <query> [--city <city>] [--total <n>]]";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1️⃣ Configuration + shared state
    let config = AppConfig::from_env();
    let state = AppState::new(config);

    // 2️⃣ Make sure the scrape_runs table exists
    if let Err(e) = init_db(&state.db) {
        log::error!("❌ Database initialization failed: {e}");
        std::process::exit(1);
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("serve") => serve(state),
        Some("scrape") => match parse_scrape_args(&args[1..]) {
            Ok(request) => scrape_once(&state, &request),
            Err(msg) => {
                eprintln!("{msg}\n{USAGE}");
                std::process::exit(2);
            }
        },
        Some(other) => {
            eprintln!("unknown command '{other}'\n{USAGE}");
            std::process::exit(2);
        }
    }
}

fn serve(state: AppState) {
    let addr = state.config.bind_addr;
    log::info!("Starting server at http://{addr}");

    let server = Server::bind(addr).max_workers(state.config.workers);

    // 3️⃣ Serve requests, passing the state into the closure
    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => responses::html_error_response(err),
    });

    if let Err(e) = result {
        log::error!("Server ended with error: {e}");
    }

    log::info!("Server shut down cleanly.");
}

fn scrape_once(state: &AppState, request: &ScrapeRequest) {
    let mut source = match ZenRowsSource::new(state.config.zenrows_api_key.clone()) {
        Ok(source) => source,
        Err(e) => {
            log::error!("Scraper init failed: {e}");
            std::process::exit(1);
        }
    };

    match execute_scrape(state, &mut source, request) {
        Ok(report) => {
            println!(
                "Data terkumpul: {} / {} ({})",
                report.collected(),
                report.requested,
                report.stop_reason
            );
            if let Some(e) = report.error {
                eprintln!("Scrape ended early: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            log::error!("Scrape failed: {e}");
            std::process::exit(1);
        }
    }
}

fn parse_scrape_args(args: &[String]) -> Result<ScrapeRequest, String> {
    let mut query = None;
    let mut city = String::new();
    let mut total = DEFAULT_TOTAL;

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--city" => {
                city = it.next().ok_or("--city needs a value")?.clone();
            }
            "--total" => {
                let raw = it.next().ok_or("--total needs a value")?;
                total = raw
                    .parse()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| format!("invalid --total '{raw}'"))?;
            }
            other if query.is_none() => query = Some(other.to_string()),
            other => return Err(format!("unexpected argument '{other}'")),
        }
    }

    let query = query.ok_or("missing search query")?;
    Ok(ScrapeRequest::new(query, city, total))
}
