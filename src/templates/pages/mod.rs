pub mod dashboard;
pub mod listings;
pub mod runs;

pub use dashboard::{dashboard_page, DashboardVm, DataState};
pub use listings::listings_table;
pub use runs::runs_page;
