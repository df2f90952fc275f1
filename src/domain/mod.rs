pub mod listing;

pub use listing::{Listing, ListingSet, OpenStatus};
