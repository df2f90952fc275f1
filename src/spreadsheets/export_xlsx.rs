use crate::domain::Listing;
use crate::errors::ServerError;
use crate::responses::{xlsx_response, ResultResp};
use crate::store::HEADERS;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

pub fn export_listings_xlsx(listings: &[&Listing], filename: &str) -> ResultResp {
    let buffer = listings_workbook(listings)?;
    xlsx_response(buffer, filename)
}

/// One header row plus one row per listing. Unknown values are left as blank cells.
pub fn listings_workbook(listings: &[&Listing]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, listing) in listings.iter().enumerate() {
        let r = (i + 1) as u32;
        write_listing(worksheet, r, listing)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write row {r}: {e}")))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}

fn write_listing(ws: &mut Worksheet, r: u32, listing: &Listing) -> Result<(), XlsxError> {
    ws.write_string(r, 0, &listing.name)?;
    ws.write_string(r, 1, &listing.city)?;
    ws.write_string(r, 2, &listing.category)?;
    if let Some(rating) = listing.rating {
        ws.write_number(r, 3, rating)?;
    }
    if let Some(price) = &listing.price {
        ws.write_string(r, 4, price)?;
    }
    if let Some(hours) = &listing.hours {
        ws.write_string(r, 5, hours)?;
    }
    if let Some(status) = listing.status {
        ws.write_string(r, 6, status.label())?;
    }
    if let Some(lat) = listing.lat {
        ws.write_number(r, 7, lat)?;
    }
    if let Some(lng) = listing.lng {
        ws.write_number(r, 8, lng)?;
    }
    Ok(())
}
