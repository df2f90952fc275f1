use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ScraperError {
    Config(String),
    Network(String),
    Blocked(String),
    HtmlParse(String),
}

impl fmt::Display for ScraperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScraperError::Config(msg) => write!(f, "Configuration error: {msg}"),
            ScraperError::Network(msg) => write!(f, "Network error: {msg}"),
            ScraperError::Blocked(msg) => write!(f, "Blocked by site: {msg}"),
            ScraperError::HtmlParse(msg) => write!(f, "HTML parse error: {msg}"),
        }
    }
}

impl Error for ScraperError {}
