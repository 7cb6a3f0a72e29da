use crate::scrapers::extract::extract;
use crate::scrapers::source::classify;
use crate::scrapers::traits::PageFetcher;
use crate::scrapers::types::ExtractedFields;
use anyhow::Result;
use tracing::info;

/// Extract a page and tag it with the URL it came from.
///
/// When the page has no usable title a placeholder is built from the source.
pub fn extract_listing(url: &str, html: &str) -> ExtractedFields {
    let source = classify(url);
    let mut fields = extract(html);

    fields.url = Some(url.to_string());
    fields.source = Some(source);
    if fields.title.is_none() {
        fields.title = Some(format!("Annonce {source}"));
    }
    fields
}

/// Download a listing page and extract what we can from it.
///
/// Fetch errors are returned as is; there is no retry.
pub async fn scrape_listing(fetcher: &dyn PageFetcher, url: &str) -> Result<ExtractedFields> {
    let html = fetcher.fetch(url).await?;
    let fields = extract_listing(url, &html);

    info!(
        source = %fields.source.map(|s| s.as_str()).unwrap_or("other"),
        fetcher = fetcher.name(),
        "Scraped {} ({} bytes)",
        url,
        html.len()
    );
    Ok(fields)
}
