use astra::Response;
// errors.rs
use std::fmt;

/// Errors originating from either the server logic
/// (routing, bad input, etc.) or downstream layers (CSV file, DB, XLSX).
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    BadRequest(String),
    Conflict(String),
    DbError(String),
    DataError(String),
    XlsxError(String),
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Conflict(_) => 409,
            ServerError::DbError(_)
            | ServerError::DataError(_)
            | ServerError::XlsxError(_)
            | ServerError::InternalError => 500,
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            ServerError::DbError(msg) => write!(f, "Database Error: {msg}"),
            ServerError::DataError(msg) => write!(f, "Data File Error: {msg}"),
            ServerError::XlsxError(msg) => write!(f, "Spreadsheet Error: {msg}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}
