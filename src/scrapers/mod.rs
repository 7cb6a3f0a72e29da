pub mod extract;
pub mod fetcher;
pub mod listing;
pub mod source;
pub mod traits;
pub mod types;

pub use extract::extract;
pub use fetcher::HttpFetcher;
pub use listing::{extract_listing, scrape_listing};
pub use source::classify;
pub use traits::PageFetcher;
pub use types::ExtractedFields;
