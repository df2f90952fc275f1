use crate::domain::Listing;
use crate::templates::components::{rating_text, text_or_dash};
use maud::{html, Markup};

pub fn listings_table(listings: &[&Listing]) -> Markup {
    html! {
        div class="overflow-hidden border border-gray-200 rounded-lg shadow-sm" {
            p class="text-gray-700" { "Ditemukan " strong { (listings.len()) } " tempat." }
            table class="min-w-full divide-y divide-gray-200" {
                thead class="bg-gray-50" {
                    tr {
                        @for header in crate::store::HEADERS {
                            th scope="col" class="px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider" { (header) }
                        }
                    }
                }
                tbody class="bg-white divide-y divide-gray-200" {
                    @for listing in listings {
                        tr {
                            td class="px-4 py-3 text-sm text-gray-900" { (listing.name) }
                            td class="px-4 py-3 text-sm text-gray-500" { (text_or_dash(Some(listing.city.as_str()))) }
                            td class="px-4 py-3 text-sm text-gray-500" { (text_or_dash(Some(listing.category.as_str()))) }
                            td class="px-4 py-3 text-sm text-gray-500" { (rating_text(listing.rating)) }
                            td class="px-4 py-3 text-sm text-gray-500" { (text_or_dash(listing.price.as_deref())) }
                            td class="px-4 py-3 text-sm text-gray-500" { (text_or_dash(listing.hours.as_deref())) }
                            td class="px-4 py-3 text-sm text-gray-500" {
                                @match listing.status {
                                    Some(status) => span class="px-2 inline-flex text-xs leading-5 font-semibold rounded-full" { (status.label()) },
                                    None => "–",
                                }
                            }
                            td class="px-4 py-3 text-sm text-gray-500" { (coord_text(listing.lat)) }
                            td class="px-4 py-3 text-sm text-gray-500" { (coord_text(listing.lng)) }
                        }
                    }
                }
            }
        }
    }
}

fn coord_text(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.5}")).unwrap_or_else(|| "–".to_string())
}
