use maud::{html, Markup};

pub mod error;

pub use error::error_page;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn metric(label: &str, value: &str) -> Markup {
    html! {
        div class="metric" {
            p class="metric-label" { (label) }
            p class="metric-value" { (value) }
        }
    }
}

/// Rating with two decimals, or a dash when unknown.
pub fn rating_text(rating: Option<f64>) -> String {
    match rating {
        Some(r) => format!("{r:.2}"),
        None => "–".to_string(),
    }
}

/// Display name for a group value; scraped rows may have no category.
pub fn group_label(group: &str) -> &str {
    if group.trim().is_empty() {
        "(tidak diketahui)"
    } else {
        group
    }
}

pub fn text_or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "–",
    }
}
