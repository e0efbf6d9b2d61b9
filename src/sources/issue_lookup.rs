//! Issues of a volume matching an issue number.

use crate::models::{parse_source_date, IssueLookupRequest, MetadataBuilder, NormalizedMetadata};
use crate::sources::{ComicVineApi, IssueSummary, MetadataError};

/// Find the issues of a volume carrying `issue_number`, in API order.
///
/// One request against the `issues/` list endpoint. Records carry the series
/// name from each entry's volume reference; publisher and start year are not
/// part of that endpoint and stay empty.
pub async fn lookup_issue<A>(
    api: &A,
    request: &IssueLookupRequest,
) -> Result<Vec<NormalizedMetadata>, MetadataError>
where
    A: ComicVineApi + ?Sized,
{
    request.validate()?;

    let settings = &request.settings;
    let volume_id = request.volume_id.trim();
    let issue_number = request.issue_number.trim();

    tracing::debug!(
        "Fetching issue: API key={} volume id={} issue number={}",
        settings.masked_api_key(),
        volume_id,
        issue_number
    );

    let issues = api
        .issues_for_volume(settings, volume_id, issue_number)
        .await?;

    tracing::debug!("Received: {} matching issue(s)", issues.len());

    Ok(issues.iter().map(map_listed_issue).collect())
}

fn map_listed_issue(summary: &IssueSummary) -> NormalizedMetadata {
    let series = summary
        .volume
        .as_ref()
        .and_then(|v| v.name.as_deref())
        .unwrap_or_default();

    MetadataBuilder::new(summary.id.as_str())
        .series(series)
        .issue_number(summary.issue_number.as_deref().unwrap_or_default())
        .title(summary.title.clone())
        .cover_date(parse_source_date(summary.cover_date.as_deref()))
        .store_date(parse_source_date(summary.store_date.as_deref()))
        .build()
}
