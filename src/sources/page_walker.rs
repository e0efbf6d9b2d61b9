//! Walks the paged volume listing and collects every issue.

use crate::models::{
    parse_source_date, ApiSettings, MetadataBuilder, NormalizedMetadata, VolumeIssuesRequest,
};
use crate::sources::{ComicVineApi, IssueSummary, MetadataError, VolumeIssuesPage};
use crate::utils::Throttle;

/// Fetch every issue of a volume, in API order.
///
/// Pages are requested until `offset + number_of_page_results` reaches
/// `number_of_total_results`, with `settings.delay` between consecutive pages.
/// Any failure aborts the walk and nothing collected so far is returned.
///
/// With `enrich_dates` set, each entry is followed by an issue-detail fetch
/// that fills in cover and store dates. Failures of that fetch are logged and
/// the entry keeps its listing data.
pub async fn walk_volume_issues<A, T>(
    api: &A,
    throttle: &T,
    request: &VolumeIssuesRequest,
) -> Result<Vec<NormalizedMetadata>, MetadataError>
where
    A: ComicVineApi + ?Sized,
    T: Throttle + ?Sized,
{
    request.validate()?;

    let settings = &request.settings;
    let volume_id = request.volume_id.trim();
    let mut result = Vec::new();
    let mut offset = 0;

    loop {
        tracing::debug!(
            "Fetching issues: API key={} volume id={} offset={}",
            settings.masked_api_key(),
            volume_id,
            offset
        );

        let page = api.volume_issues_page(settings, volume_id, offset).await?;

        // A server ignoring `offset` would replay the same page forever
        if page.offset != offset {
            return Err(MetadataError::transport(
                listing_endpoint(volume_id, offset),
                format!(
                    "Requested offset {} but received offset {}",
                    offset, page.offset
                ),
            ));
        }

        tracing::debug!(
            "Received: {} issue{}",
            page.issues.len(),
            if page.issues.len() == 1 { "" } else { "s" }
        );

        for summary in &page.issues {
            let mut entry = map_summary(&page, summary);
            if request.enrich_dates {
                enrich_dates(api, throttle, settings, &mut entry).await?;
            }
            result.push(entry);
        }

        if page.is_last() {
            break;
        }

        if page.page_result_count == 0 {
            return Err(MetadataError::transport(
                listing_endpoint(volume_id, offset),
                format!(
                    "Empty page with {} of {} results remaining",
                    page.total_result_count.saturating_sub(page.offset),
                    page.total_result_count
                ),
            ));
        }

        offset = page.next_offset();
        throttle.pause(settings.delay).await?;
    }

    Ok(result)
}

fn listing_endpoint(volume_id: &str, offset: u32) -> String {
    format!("volume 4050-{} offset {}", volume_id, offset)
}

/// Listing entry → record, with volume-level fields taken from the page
fn map_summary(page: &VolumeIssuesPage, summary: &IssueSummary) -> NormalizedMetadata {
    MetadataBuilder::new(summary.id.as_str())
        .publisher(page.publisher.as_deref().unwrap_or_default())
        .series(page.series.as_deref().unwrap_or_default())
        .volume(page.start_year.as_deref().unwrap_or_default())
        .issue_number(summary.issue_number.as_deref().unwrap_or_default())
        .title(summary.title.clone())
        .cover_date(parse_source_date(summary.cover_date.as_deref()))
        .store_date(parse_source_date(summary.store_date.as_deref()))
        .build()
}

async fn enrich_dates<A, T>(
    api: &A,
    throttle: &T,
    settings: &ApiSettings,
    entry: &mut NormalizedMetadata,
) -> Result<(), MetadataError>
where
    A: ComicVineApi + ?Sized,
    T: Throttle + ?Sized,
{
    throttle.pause(settings.delay).await?;

    tracing::trace!("Fetching issue metadata: id={}", entry.source_id);
    match api.issue_detail(settings, &entry.source_id).await {
        Ok(issue) => {
            if let Some(date) = parse_source_date(issue.cover_date.as_deref()) {
                entry.cover_date = Some(date);
            }
            if let Some(date) = parse_source_date(issue.store_date.as_deref()) {
                entry.store_date = Some(date);
            }
        }
        Err(e) => {
            tracing::error!(
                "Failed to get issue cover and store dates: id={} error={}",
                entry.source_id,
                e
            );
        }
    }

    Ok(())
}
