use crate::domain::OpenStatus;
use crate::store::{load_listings, save_listings, StoreError};
use crate::tests::utils::{sample_listings, temp_path};
use std::fs;

#[test]
fn written_listings_read_back_unchanged() {
    let path = temp_path("store_roundtrip", "csv");
    let mut listings = sample_listings();
    listings[0].price = Some("Rp 25–50 rb".into());
    listings[2].name = "Bakso \"Enggal\", Cabang 2".into();

    save_listings(&path, &listings).unwrap();
    let loaded = load_listings(&path).unwrap();

    assert_eq!(loaded, listings);
    // Unknown stays unknown: no zero or made-up filler.
    assert_eq!(loaded[4].rating, None);
    assert_eq!(loaded[4].status, None);
    assert_eq!(loaded[4].lat, None);

    let _ = fs::remove_file(&path);
}

#[test]
fn missing_file_is_reported_as_missing() {
    let path = temp_path("store_missing", "csv");

    match load_listings(&path) {
        Err(StoreError::Missing(p)) => assert_eq!(p, path),
        other => panic!("expected Missing, got {other:?}"),
    }
}

#[test]
fn empty_set_still_writes_a_header() {
    let path = temp_path("store_empty", "csv");

    save_listings(&path, &[]).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("Nama,Kota,Kategori,Rating,Harga,Jam,Status,lat,lng"));
    assert!(load_listings(&path).unwrap().is_empty());

    let _ = fs::remove_file(&path);
}

#[test]
fn save_overwrites_previous_content() {
    let path = temp_path("store_overwrite", "csv");
    let listings = sample_listings();

    save_listings(&path, &listings).unwrap();
    save_listings(&path, &listings[..1]).unwrap();

    assert_eq!(load_listings(&path).unwrap().len(), 1);
    let _ = fs::remove_file(&path);
}

#[test]
fn older_column_sets_still_load() {
    let path = temp_path("store_legacy", "csv");
    // No Kota column, a garbage rating and an English status.
    fs::write(
        &path,
        "Nama,Kategori,Rating,Harga,Jam,Status,lat,lng\n\
         Warung Sunda,Restoran,abc,Rp10rb - Rp50rb,09:00 - 21:00,Open,-6.91,107.61\n\
         Bakso Mantap,Bakso,4.7,,,Tutup,,\n",
    )
    .unwrap();

    let loaded = load_listings(&path).unwrap();
    assert_eq!(loaded.len(), 2);

    assert_eq!(loaded[0].city, "");
    assert_eq!(loaded[0].rating, None);
    assert_eq!(loaded[0].status, Some(OpenStatus::Open));
    assert_eq!(loaded[0].hours.as_deref(), Some("09:00 - 21:00"));
    assert_eq!(loaded[0].coordinates(), Some((-6.91, 107.61)));

    assert_eq!(loaded[1].rating, Some(4.7));
    assert_eq!(loaded[1].status, Some(OpenStatus::Closed));
    assert_eq!(loaded[1].price, None);
    assert_eq!(loaded[1].lat, None);

    let _ = fs::remove_file(&path);
}
