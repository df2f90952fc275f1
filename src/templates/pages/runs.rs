use crate::db::scrapes::ScrapeRun;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn runs_page(runs: &[ScrapeRun]) -> Markup {
    desktop_layout(
        "Riwayat Scraping",
        html! {
            main class="container" {
                h1 { "Riwayat Scraping" }

                @if runs.is_empty() {
                    p { "Belum ada scraping yang dijalankan." }
                } @else {
                    div style="overflow-x: auto;" {
                        table style="width: 100%; border-collapse: collapse; font-size: 0.9em;" {
                            thead {
                                tr {
                                    th { "ID" }
                                    th { "Pencarian" }
                                    th { "Kota" }
                                    th { "Mulai" }
                                    th { "Status" }
                                    th { "Terkumpul" }
                                    th { "Alasan Berhenti" }
                                    th { "Error" }
                                }
                            }
                            tbody {
                                @for run in runs {
                                    tr {
                                        td { (run.id) }
                                        td { (run.query) }
                                        td { (run.city) }
                                        td {
                                            (chrono::DateTime::from_timestamp(run.started_at, 0)
                                                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                                                .unwrap_or_default())
                                        }
                                        td {
                                            @if run.is_running() {
                                                span style="color: #d97706;" { "Running" }
                                            } @else if run.success {
                                                span style="color: #059669;" { "Success" }
                                            } @else {
                                                span style="color: #dc2626;" { "Failed" }
                                            }
                                        }
                                        td { (run.collected.unwrap_or(0)) " / " (run.requested) }
                                        td { (run.stop_reason.as_deref().unwrap_or("–")) }
                                        td style="max-width: 320px; overflow: hidden; text-overflow: ellipsis;" {
                                            (run.error_message.as_deref().unwrap_or(""))
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
