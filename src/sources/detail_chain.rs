//! Issue → volume → publisher detail chain.

use crate::models::{
    expand_credits, parse_source_date, ApiSettings, IssueDetailsRequest, MetadataBuilder,
    NormalizedMetadata,
};
use crate::sources::{
    ComicVineApi, IssueDetail, MetadataError, NamedRef, PublisherDetail, VolumeDetail,
};

/// Load one issue with its volume and publisher and flatten them into a record.
///
/// The three fetches run in order, each using a detail URL from the previous
/// response. The first failure ends the chain.
pub async fn fetch_issue_details<A>(
    api: &A,
    request: &IssueDetailsRequest,
) -> Result<NormalizedMetadata, MetadataError>
where
    A: ComicVineApi + ?Sized,
{
    request.validate()?;

    let settings = &request.settings;
    let issue_id = request.issue_id.trim();

    tracing::debug!(
        "Fetching issue details: API key={} issue id={}",
        settings.masked_api_key(),
        issue_id
    );

    let record = IssueStage::fetch(api, settings, issue_id)
        .await?
        .fetch_volume(api, settings)
        .await?
        .fetch_publisher(api, settings)
        .await?
        .flatten();

    Ok(record)
}

struct IssueStage {
    issue: IssueDetail,
}

struct VolumeStage {
    issue: IssueDetail,
    volume: VolumeDetail,
}

struct PublisherStage {
    issue: IssueDetail,
    volume: VolumeDetail,
    publisher: PublisherDetail,
}

impl IssueStage {
    async fn fetch<A: ComicVineApi + ?Sized>(
        api: &A,
        settings: &ApiSettings,
        issue_id: &str,
    ) -> Result<Self, MetadataError> {
        let issue = api.issue_detail(settings, issue_id).await?;
        Ok(Self { issue })
    }

    async fn fetch_volume<A: ComicVineApi + ?Sized>(
        self,
        api: &A,
        settings: &ApiSettings,
    ) -> Result<VolumeStage, MetadataError> {
        let detail_url = self
            .issue
            .volume
            .as_ref()
            .and_then(|v| v.api_detail_url.as_deref())
            .ok_or_else(|| {
                MetadataError::transport(
                    format!("issue 4000-{}", self.issue.id),
                    "Issue has no volume detail URL",
                )
            })?;

        tracing::trace!("Fetching volume details: url={}", detail_url);
        let volume = api.volume_detail(settings, detail_url).await?;
        Ok(VolumeStage {
            issue: self.issue,
            volume,
        })
    }
}

impl VolumeStage {
    async fn fetch_publisher<A: ComicVineApi + ?Sized>(
        self,
        api: &A,
        settings: &ApiSettings,
    ) -> Result<PublisherStage, MetadataError> {
        let detail_url = self
            .volume
            .publisher
            .as_ref()
            .and_then(|p| p.api_detail_url.as_deref())
            .ok_or_else(|| {
                MetadataError::transport(
                    format!("issue 4000-{}", self.issue.id),
                    "Volume has no publisher detail URL",
                )
            })?;

        tracing::trace!("Fetching publisher details: url={}", detail_url);
        let publisher = api.publisher_detail(settings, detail_url).await?;
        Ok(PublisherStage {
            issue: self.issue,
            volume: self.volume,
            publisher,
        })
    }
}

impl PublisherStage {
    fn flatten(self) -> NormalizedMetadata {
        let PublisherStage {
            issue,
            volume,
            publisher,
        } = self;

        let publisher_name = publisher
            .name
            .or_else(|| volume.publisher.and_then(|p| p.name))
            .unwrap_or_default();

        let credits = issue
            .people
            .iter()
            .filter_map(|person| {
                let name = person.name.as_deref()?;
                Some(expand_credits(name, person.role.as_deref().unwrap_or_default()))
            })
            .flatten()
            .collect();

        MetadataBuilder::new(issue.id)
            .publisher(publisher_name)
            .series(volume.name.unwrap_or_default())
            .volume(volume.start_year.unwrap_or_default())
            .issue_number(issue.issue_number.unwrap_or_default())
            .title(issue.title)
            .cover_date(parse_source_date(issue.cover_date.as_deref()))
            .store_date(parse_source_date(issue.store_date.as_deref()))
            .description(issue.description)
            .characters(names(issue.characters))
            .teams(names(issue.teams))
            .locations(names(issue.locations))
            .stories(names(issue.stories))
            .credits(credits)
            .build()
    }
}

fn names(refs: Vec<NamedRef>) -> Vec<String> {
    refs.into_iter().filter_map(|r| r.name).collect()
}
