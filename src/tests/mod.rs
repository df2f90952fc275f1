mod config_tests;
mod router_tests;
mod store_tests;
mod utils;
