// store.rs
use crate::domain::Listing;
use crate::errors::ServerError;
use std::error::Error;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum StoreError {
    /// The data file has not been written yet.
    Missing(PathBuf),
    Io(String),
    Csv(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Missing(path) => write!(f, "Data file not found: {}", path.display()),
            StoreError::Io(msg) => write!(f, "I/O error: {msg}"),
            StoreError::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl Error for StoreError {}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        ServerError::DataError(err.to_string())
    }
}

/// Read every listing from the CSV data file.
pub fn load_listings(path: &Path) -> Result<Vec<Listing>, StoreError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::Missing(path.to_path_buf()))
        }
        Err(e) => return Err(StoreError::Io(format!("{}: {e}", path.display()))),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut listings = Vec::new();
    for (i, record) in reader.deserialize::<Listing>().enumerate() {
        match record {
            Ok(listing) => listings.push(listing),
            // A row without a name is useless to every view; skip it.
            Err(e) => log::warn!("Skipping row {} of {}: {e}", i + 2, path.display()),
        }
    }

    Ok(listings)
}

/// Overwrite the data file with `listings`.
///
/// Rows go to a sibling temp file first and are renamed into place, so a
/// reader never sees a half-written file.
pub fn save_listings(path: &Path, listings: &[Listing]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
    }

    let tmp_path = temp_path_for(path);
    let file = File::create(&tmp_path)
        .map_err(|e| StoreError::Io(format!("{}: {e}", tmp_path.display())))?;

    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    if listings.is_empty() {
        // serde only emits the header alongside the first record
        writer
            .write_record(HEADERS)
            .map_err(|e| StoreError::Csv(e.to_string()))?;
    }
    for listing in listings {
        writer
            .serialize(listing)
            .map_err(|e| StoreError::Csv(e.to_string()))?;
    }
    writer.flush().map_err(|e| StoreError::Io(e.to_string()))?;
    drop(writer);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        StoreError::Io(format!("rename into {}: {e}", path.display()))
    })?;

    log::info!("💾 Wrote {} listings to {}", listings.len(), path.display());
    Ok(())
}

pub const HEADERS: [&str; 9] = [
    "Nama", "Kota", "Kategori", "Rating", "Harga", "Jam", "Status", "lat", "lng",
];

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
