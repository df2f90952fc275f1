use crate::config::AppConfig;
use crate::geos::{city_center, DEFAULT_CENTER};
use std::path::PathBuf;

#[test]
fn defaults_apply_when_nothing_is_set() {
    let config = AppConfig::from_lookup(|_| None);

    assert_eq!(config.data_path, PathBuf::from("data_jabar_umkm.csv"));
    assert_eq!(config.db_path, PathBuf::from("umkm.sqlite3"));
    assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
    assert_eq!(config.workers, 8);
    assert!(config.zenrows_api_key.is_none());
}

#[test]
fn environment_overrides_and_malformed_values() {
    let config = AppConfig::from_lookup(|key| match key {
        "UMKM_DATA_PATH" => Some("/tmp/listings.csv".into()),
        "UMKM_BIND_ADDR" => Some("0.0.0.0:8080".into()),
        "UMKM_WORKERS" => Some("lots".into()),
        "ZENROWS_API_KEY" => Some("  ".into()),
        _ => None,
    });

    assert_eq!(config.data_path, PathBuf::from("/tmp/listings.csv"));
    assert_eq!(config.bind_addr.port(), 8080);
    assert_eq!(config.workers, 8);
    assert!(config.zenrows_api_key.is_none());
}

#[test]
fn known_cities_center_the_map() {
    assert_eq!(city_center("bekasi"), (-6.2383, 106.9756));
    assert_eq!(city_center(" Cirebon "), (-6.7320, 108.5523));
    assert_eq!(city_center("Garut"), DEFAULT_CENTER);
    assert_eq!(city_center(""), DEFAULT_CENTER);
}
