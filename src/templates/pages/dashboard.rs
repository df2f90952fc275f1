use crate::analysis::{Aggregates, SearchMode, Summary};
use crate::db::scrapes::ScrapeRun;
use crate::domain::Listing;
use crate::templates::components::{group_label, rating_text};
use crate::templates::pages::listings_table;
use crate::templates::{card, desktop_layout, metric};
use maud::{html, Markup};

pub enum DataState<'a> {
    /// No data file yet; nothing has been scraped.
    Missing,
    Loaded {
        rows: Vec<&'a Listing>,
        summary: Summary,
    },
}

pub struct DashboardVm<'a> {
    pub mode: SearchMode,
    pub query: String,
    pub data: DataState<'a>,
    pub map_center: (f64, f64),
    pub last_run: Option<ScrapeRun>,
    pub scrape_running: bool,
}

impl DashboardVm<'_> {
    /// Query string that reproduces the current search.
    pub fn search_params(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("mode", self.mode.as_param())
            .append_pair("q", &self.query)
            .finish()
    }
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    desktop_layout(
        "Dashboard",
        html! {
            main class="container" {
                aside class="sidebar" {
                    (search_form(vm))
                    (refresh_form(vm))
                }

                section class="content" {
                    h1 { "🚀 Analisis Strategis UMKM: " (vm.query) }

                    @match &vm.data {
                        DataState::Missing => {
                            div class="alert warning" {
                                "Data belum tersedia. Klik 'Perbarui Data' di sidebar untuk mencari."
                            }
                        }
                        DataState::Loaded { rows, summary } => {
                            (insights(vm.mode, summary))
                            (map_section(vm, rows.len()))
                            @if let Some(aggregates) = summary.aggregates() {
                                (group_table(vm.mode, aggregates))
                            }
                            (card("Lihat Detail Data Mentah", listings_table(rows)))
                            p {
                                a href=(format!("/export?{}", vm.search_params())) { "⬇️ Unduh XLSX" }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn search_form(vm: &DashboardVm) -> Markup {
    html! {
        form method="get" action="/" class="search-form" {
            h3 { "🔍 Navigasi UMKM" }
            fieldset {
                legend { "Cari Berdasarkan:" }
                @for mode in [SearchMode::City, SearchMode::Category] {
                    label {
                        input type="radio" name="mode" value=(mode.as_param()) checked[vm.mode == mode];
                        " " (mode.label())
                    }
                }
            }
            label for="q" { "Masukkan " (vm.mode.label()) ":" }
            input type="text" id="q" name="q" value=(vm.query);
            button type="submit" { "Cari" }
        }
    }
}

fn refresh_form(vm: &DashboardVm) -> Markup {
    html! {
        form method="post" action="/scrape" class="refresh-form" {
            @match vm.mode {
                SearchMode::City => {
                    input type="hidden" name="query" value="kuliner";
                    input type="hidden" name="city" value=(vm.query);
                }
                // The search text is a category here, so the city has to be asked for.
                SearchMode::Category => {
                    input type="hidden" name="query" value=(vm.query);
                    label for="scrape-city" { "Kota:" }
                    input type="text" id="scrape-city" name="city" value="Bandung" required;
                }
            }
            input type="hidden" name="total" value=(crate::scraper::DEFAULT_TOTAL);
            @if vm.scrape_running {
                button type="submit" disabled { "Sedang mengambil data..." }
            } @else {
                button type="submit" { "Perbarui Data (Scraping)" }
            }
        }
        @if let Some(run) = &vm.last_run {
            (last_run_note(run))
        }
    }
}

fn last_run_note(run: &ScrapeRun) -> Markup {
    let started = chrono::DateTime::from_timestamp(run.started_at, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| run.started_at.to_string());

    html! {
        div class="last-run" {
            p { "Scraping terakhir: " strong { (run.city) } " · " (started) }
            @if run.is_running() {
                p { "⏳ Sedang berjalan..." }
            } @else {
                p {
                    "Terkumpul " (run.collected.unwrap_or(0)) " / " (run.requested)
                    @if let Some(short) = run.shortfall().filter(|s| *s > 0) {
                        " (kurang " (short) ")"
                    }
                }
                @if let Some(err) = &run.error_message {
                    p class="error" { "⚠️ " (err) }
                }
            }
        }
    }
}

fn insights(mode: SearchMode, summary: &Summary) -> Markup {
    html! {
        div class="alert info" {
            h3 { "💡 Kesimpulan Strategis Berbasis Data" }
            @match summary {
                Summary::NoData => {
                    p { "Tidak ada data yang cocok dengan pencarian ini." }
                }
                Summary::Data(aggregates) => {
                    div class="metrics" {
                        (metric("Kompetitor Dominan", group_label(&aggregates.dominant().group)))
                        (metric("Peluang Emas", group_label(&aggregates.opportunity().group)))
                        (metric(
                            "Rating Tertinggi",
                            aggregates.top_rated().map(|g| group_label(&g.group)).unwrap_or("–"),
                        ))
                    }
                    p class="microcopy" {
                        "Dikelompokkan per " (mode.group_by().label()) " · " (aggregates.total()) " tempat"
                    }
                }
            }
        }
    }
}

fn map_section(vm: &DashboardVm, row_count: usize) -> Markup {
    let (lat, lng) = vm.map_center;
    html! {
        section class="card" id="map" data-lat=(lat) data-lng=(lng)
            data-markers=(format!("/api/markers?{}", vm.search_params()))
        {
            h3 { "📍 Sebaran Kuliner di " (vm.query) }
            p { "Pusat peta: " (format!("{lat:.4}, {lng:.4}")) " · " (row_count) " tempat" }
        }
    }
}

fn group_table(mode: SearchMode, aggregates: &Aggregates) -> Markup {
    html! {
        section class="card" {
            h3 { "Jumlah & Rata-rata Rating per " (mode.group_by().label()) }
            table {
                thead {
                    tr {
                        th { (mode.group_by().label()) }
                        th { "Jumlah" }
                        th { "Rata-rata Rating" }
                    }
                }
                tbody {
                    @for g in aggregates.groups() {
                        tr {
                            td { (group_label(&g.group)) }
                            td { (g.count) }
                            td { (rating_text(g.mean_rating)) }
                        }
                    }
                }
            }
        }
    }
}
