// src/tests/router_tests/dashboard_tests.rs

use crate::router::handle;
use crate::tests::utils::{expect_err, init_test_state, read_body, sample_listings, state_with_listings};
use astra::Body;
use http::{Method, Request};

fn get(uri: &str) -> astra::Request {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[test]
fn dashboard_shows_metrics_for_matching_city() {
    let state = state_with_listings(&sample_listings());

    let resp = handle(get("/?mode=city&q=Bandung"), &state).unwrap();
    assert_eq!(resp.status(), 200);

    let body = read_body(resp);
    assert!(body.contains("Analisis Strategis UMKM: Bandung"));
    assert!(body.contains("Kompetitor Dominan"));
    // Kopi has two rows in Bandung, Bakso one.
    assert!(body.contains("Kopi"));
    assert!(body.contains("Bakso Cihampelas"));
    assert!(!body.contains("Cafe Margonda"));
    assert!(body.contains("4.50"), "mean rating for Kopi should be shown");
}

#[test]
fn first_visit_defaults_to_bandung() {
    let state = state_with_listings(&sample_listings());

    let body = read_body(handle(get("/"), &state).unwrap());
    assert!(body.contains("Analisis Strategis UMKM: Bandung"));
    assert!(!body.contains("Bakso Bogor Asli"));
}

#[test]
fn empty_query_shows_everything() {
    let state = state_with_listings(&sample_listings());

    let body = read_body(handle(get("/?mode=city&q="), &state).unwrap());
    assert!(body.contains("Bakso Bogor Asli"));
    assert!(body.contains("Cafe Margonda"));
}

#[test]
fn category_search_is_url_decoded() {
    let mut listings = sample_listings();
    listings[4].category = "Street Food".into();
    let state = state_with_listings(&listings);

    let body = read_body(handle(get("/?mode=category&q=street+food"), &state).unwrap());
    assert!(body.contains("Cafe Margonda"));
    assert!(body.contains("Depok"));
}

#[test]
fn unmatched_query_renders_no_data_instead_of_failing() {
    let state = state_with_listings(&sample_listings());

    let resp = handle(get("/?mode=city&q=Cirebon"), &state).unwrap();
    assert_eq!(resp.status(), 200);

    let body = read_body(resp);
    assert!(body.contains("Tidak ada data yang cocok"));
    assert!(!body.contains("Kompetitor Dominan"));
}

#[test]
fn missing_data_file_renders_empty_state() {
    let state = init_test_state();

    let resp = handle(get("/"), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(read_body(resp).contains("Data belum tersedia"));
}

#[test]
fn markers_endpoint_returns_rows_with_coordinates() {
    let state = state_with_listings(&sample_listings());

    let resp = handle(get("/api/markers?mode=city&q=bandung"), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/json"
    );

    let json: serde_json::Value = serde_json::from_str(&read_body(resp)).unwrap();
    assert_eq!(json["center"][0].as_f64(), Some(-6.9175));

    let markers = json["markers"].as_array().unwrap();
    assert_eq!(markers.len(), 2, "only rows with coordinates become markers");
    assert_eq!(markers[0]["name"], "Kopi Braga");
    assert_eq!(markers[0]["color"], "blue");
    assert_eq!(markers[1]["color"], "red");
    assert!(markers[0]["popup"].as_str().unwrap().contains("<b>Kopi Braga</b>"));
}

#[test]
fn export_returns_a_spreadsheet() {
    let state = state_with_listings(&sample_listings());

    let resp = handle(get("/export?mode=city&q=Bandung"), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Disposition").unwrap().to_str().unwrap(),
        "attachment; filename=\"umkm_bandung.xlsx\""
    );

    let mut bytes = Vec::new();
    std::io::Read::read_to_end(&mut resp.into_body().reader(), &mut bytes).unwrap();
    // XLSX files are zip archives.
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn export_without_data_is_a_bad_request() {
    let state = init_test_state();

    let err = expect_err(handle(get("/export"), &state));
    assert_eq!(err.status(), 400);
}

#[test]
fn runs_page_lists_nothing_yet() {
    let state = init_test_state();

    let body = read_body(handle(get("/runs"), &state).unwrap());
    assert!(body.contains("Belum ada scraping"));
}

#[test]
fn unknown_route_is_not_found() {
    let state = init_test_state();

    let err = expect_err(handle(get("/admin"), &state));
    assert_eq!(err.status(), 404);

    let page = crate::responses::html_error_response(err);
    assert_eq!(page.status(), 404);
}

#[test]
fn raw_data_card_counts_the_rows() {
    let state = state_with_listings(&sample_listings());

    let body = read_body(handle(get("/?mode=city&q=Bandung"), &state).unwrap());
    assert!(body.contains("Ditemukan <strong>3</strong> tempat."));
}

#[test]
fn unknown_category_gets_a_label_in_the_metrics() {
    let mut listings = sample_listings();
    for l in &mut listings {
        l.category.clear();
    }
    let state = state_with_listings(&listings);

    let body = read_body(handle(get("/?mode=city&q=Bogor"), &state).unwrap());
    assert!(body.contains(r#"<p class="metric-value">(tidak diketahui)</p>"#));
    assert!(!body.contains(r#"<p class="metric-value"></p>"#));
}

#[test]
fn refresh_form_sends_the_city_only_in_city_mode() {
    let state = state_with_listings(&sample_listings());

    let body = read_body(handle(get("/?mode=city&q=Depok"), &state).unwrap());
    assert!(body.contains(r#"<input type="hidden" name="query" value="kuliner">"#));
    assert!(body.contains(r#"<input type="hidden" name="city" value="Depok">"#));

    let body = read_body(handle(get("/?mode=category&q=Kopi"), &state).unwrap());
    assert!(body.contains(r#"<input type="hidden" name="query" value="Kopi">"#));
    assert!(!body.contains(r#"name="city" value="Kopi""#));
    assert!(body.contains(r#"name="city" value="Bandung""#));
}
