use anyhow::Result;
use async_trait::async_trait;

/// Something that can download a listing page.
/// Lets the import pipeline run against canned pages in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Body of the final document after redirects
    async fn fetch(&self, url: &str) -> Result<String>;

    /// Name used in logs
    fn name(&self) -> &'static str;
}
