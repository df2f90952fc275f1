use crate::router::{handle, scrape_request_from_form};
use crate::scraper::DEFAULT_TOTAL;
use crate::tests::utils::{expect_err, init_test_state, scrape_lock};
use astra::Body;
use http::{Method, Request};
use std::collections::HashMap;

fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn scrape_form_defaults() {
    let request = scrape_request_from_form(&form(&[("city", " Bekasi ")])).unwrap();

    assert_eq!(request.query, "kuliner");
    assert_eq!(request.city, "Bekasi");
    assert_eq!(request.total, DEFAULT_TOTAL);
    assert_eq!(request.search_term(), "kuliner Bekasi");
}

#[test]
fn scrape_form_rejects_bad_totals() {
    for total in ["0", "-3", "abc", "100000"] {
        let err = scrape_request_from_form(&form(&[("total", total)])).err().expect("total should be rejected");
        assert_eq!(err.status(), 400, "total={total}");
    }
}

#[test]
fn scrape_without_api_key_is_rejected() {
    let _lock = scrape_lock();
    let state = init_test_state();
    assert!(state.config.zenrows_api_key.is_none());

    let req = Request::builder()
        .method(Method::POST)
        .uri("/scrape")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from("query=kuliner&city=Bandung&total=10"))
        .unwrap();

    let err = expect_err(handle(req, &state));
    assert_eq!(err.status(), 400);
    assert!(err.to_string().contains("ZENROWS_API_KEY"));
}
