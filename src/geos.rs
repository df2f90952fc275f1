// West Java cities the map knows how to center on.
pub const CITY_CENTERS: &[(&str, (f64, f64))] = &[
    ("Bandung", (-6.9175, 107.6191)),
    ("Bekasi", (-6.2383, 106.9756)),
    ("Bogor", (-6.5971, 106.8060)),
    ("Depok", (-6.4025, 106.7942)),
    ("Cirebon", (-6.7320, 108.5523)),
    ("Sukabumi", (-6.9277, 106.9300)),
];

pub const DEFAULT_CENTER: (f64, f64) = (-6.9175, 107.6191);

/// Map center for a search query; Bandung when the query is not a known city.
pub fn city_center(query: &str) -> (f64, f64) {
    let query = query.trim();
    CITY_CENTERS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(query))
        .map(|(_, center)| *center)
        .unwrap_or(DEFAULT_CENTER)
}
