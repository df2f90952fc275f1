// extract.rs
//
// Result cards on the search page look roughly like:
//
// div.Nv2PK
//  ├── a.hfpxzc [aria-label = name, href = ".../data=!3d<lat>!4d<lng>..."]
//  ├── span "4,6"  span "(1.234)"          <- rating + review count
//  ├── span "Restoran" · "Rp 25–50 rb" · "Jl. Braga No. 1"
//  └── span "Buka" · "Tutup pukul 21.00"   <- status + hours
//
// None of this is a stable contract, so every field is best-effort and
// anything we cannot read is left as `None`.
use crate::domain::{Listing, OpenStatus};
use crate::scraper::ScraperError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

const END_OF_LIST_MARKERS: &[&str] = &["reached the end of the list", "akhir daftar"];

fn rating_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d[.,]\d)\s*\(").expect("rating regex"))
}

fn coords_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!3d(-?\d+(?:\.\d+)?)!4d(-?\d+(?:\.\d+)?)").expect("coords regex"))
}

fn clock_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{1,2}[.:]\d{2}").expect("clock regex"))
}

// "pukul 21.00", "Opens 9 AM", "24 jam". Whole words only, so "Kedai Jamu"
// and "Restoran Jamur" stay categories.
fn hours_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:pukul|opens|closes|hours)\b|\b\d+\s*jam\b").expect("hours regex")
    })
}

fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::HtmlParse(format!("{css}: {e}")))
}

/// Every result card on the page, in page order. `city` is stamped on each row.
pub fn extract_listings(html: &str, city: &str) -> Result<Vec<Listing>, ScraperError> {
    let document = Html::parse_document(html);
    let card_sel = selector("div.Nv2PK")?;
    let link_sel = selector("a.hfpxzc")?;
    let stars_sel = selector(r#"span[role="img"][aria-label]"#)?;

    let mut out = Vec::new();
    for card in document.select(&card_sel) {
        let Some(link) = card.select(&link_sel).next() else {
            continue;
        };
        let Some(name) = link
            .value()
            .attr("aria-label")
            .map(str::trim)
            .filter(|n| !n.is_empty())
        else {
            continue;
        };

        // The name is repeated in the card's title; drop it so it is never
        // mistaken for a status word or category.
        let pieces: Vec<String> = text_pieces(card)
            .into_iter()
            .filter(|p| p != name)
            .collect();
        let joined = pieces.join(" ");

        let mut listing = Listing::new(name, city, "");
        listing.rating = parse_rating(&joined).or_else(|| {
            card.select(&stars_sel)
                .filter_map(|s| s.value().attr("aria-label"))
                .find_map(parse_star_label)
        });
        listing.price = pieces.iter().find(|p| is_price(p)).map(|p| p.to_string());
        let (status, hours) = parse_status_and_hours(&pieces);
        listing.status = status;
        listing.hours = hours;
        listing.category = guess_category(&pieces).unwrap_or_default();
        if let Some((lat, lng)) = link.value().attr("href").and_then(parse_coordinates) {
            listing.lat = Some(lat);
            listing.lng = Some(lng);
        }

        out.push(listing);
    }

    Ok(out)
}

/// Whether the feed says there is nothing more to load.
pub fn reached_end_of_list(html: &str) -> bool {
    let document = Html::parse_document(html);
    let text = document.root_element().text().collect::<String>().to_lowercase();
    END_OF_LIST_MARKERS.iter().any(|m| text.contains(m))
}

fn text_pieces(card: ElementRef<'_>) -> Vec<String> {
    card.text()
        .map(|t| t.trim().trim_matches(|c: char| c == '·' || c == '⋅').trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// A decimal number immediately followed by a review count in parentheses.
pub fn parse_rating(text: &str) -> Option<f64> {
    let caps = rating_re().captures(text)?;
    to_rating(&caps[1])
}

/// "4,5 bintang 1.234 Ulasan" / "4.5 stars".
fn parse_star_label(label: &str) -> Option<f64> {
    label.split_whitespace().next().and_then(to_rating)
}

fn to_rating(raw: &str) -> Option<f64> {
    raw.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|r| (0.0..=5.0).contains(r))
}

pub fn parse_coordinates(href: &str) -> Option<(f64, f64)> {
    let caps = coords_re().captures(href)?;
    let lat: f64 = caps[1].parse().ok()?;
    let lng: f64 = caps[2].parse().ok()?;
    ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)).then_some((lat, lng))
}

fn is_price(piece: &str) -> bool {
    piece.starts_with("Rp") || (!piece.is_empty() && piece.chars().all(|c| c == '$'))
}

fn status_of(piece: &str) -> Option<(OpenStatus, usize)> {
    let lower = piece.to_lowercase();
    // Longest prefixes first: "segera tutup" is still open.
    const PREFIXES: &[(&str, OpenStatus)] = &[
        ("segera tutup", OpenStatus::Open),
        ("closing soon", OpenStatus::Open),
        ("buka", OpenStatus::Open),
        ("open", OpenStatus::Open),
        ("tutup", OpenStatus::Closed),
        ("closed", OpenStatus::Closed),
    ];
    PREFIXES
        .iter()
        .find(|(p, _)| lower.starts_with(p))
        .map(|(p, s)| (*s, p.len()))
}

fn looks_like_hours(piece: &str) -> bool {
    hours_word_re().is_match(piece) || clock_re().is_match(piece)
}

/// First status word on the card, plus the hours text that follows it.
pub fn parse_status_and_hours(pieces: &[String]) -> (Option<OpenStatus>, Option<String>) {
    for (i, piece) in pieces.iter().enumerate() {
        let Some((status, prefix_len)) = status_of(piece) else {
            continue;
        };

        // "Buka 24 jam" carries its hours inline.
        let inline = piece.get(prefix_len..).map(str::trim).unwrap_or("");
        let hours = if !inline.is_empty() && looks_like_hours(inline) {
            Some(inline.to_string())
        } else {
            pieces
                .get(i + 1)
                .filter(|next| looks_like_hours(next))
                .map(|next| next.to_string())
        };

        return (Some(status), hours);
    }

    (None, None)
}

fn guess_category(pieces: &[String]) -> Option<String> {
    pieces
        .iter()
        .find(|p| {
            p.chars().any(char::is_alphabetic)
                && !is_price(p)
                && status_of(p).is_none()
                && !looks_like_hours(p)
                && !p.starts_with('(')
        })
        .map(|p| p.to_string())
}
