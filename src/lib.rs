pub mod api;
pub mod config;
pub mod models;
pub mod scoring;
pub mod scrapers;
pub mod store;

pub use api::{build_router, AppState};
