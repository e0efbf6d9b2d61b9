//! Mock ComicVine API for testing purposes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::models::ApiSettings;
use crate::sources::{
    ComicVineApi, IssueDetail, IssueSummary, MetadataError, PublisherDetail, VolumeDetail,
    VolumeIssuesPage,
};
use crate::utils::Throttle;

/// A call received by [`MockComicVineApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    VolumePage { volume_id: String, offset: u32 },
    IssueList { volume_id: String, issue_number: String },
    Issue { issue_id: String },
    Volume { detail_url: String },
    Publisher { detail_url: String },
}

type Queue<T> = Mutex<VecDeque<Result<T, MetadataError>>>;

/// A mock API that replays queued responses in order and records every call.
///
/// A call whose queue is empty fails with a transport error.
#[derive(Debug, Default)]
pub struct MockComicVineApi {
    pages: Queue<VolumeIssuesPage>,
    issue_lists: Queue<Vec<IssueSummary>>,
    issues: Queue<IssueDetail>,
    volumes: Queue<VolumeDetail>,
    publishers: Queue<PublisherDetail>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockComicVineApi {
    /// Create a new mock with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, response: Result<VolumeIssuesPage, MetadataError>) {
        self.pages.lock().unwrap().push_back(response);
    }

    pub fn push_issue_list(&self, response: Result<Vec<IssueSummary>, MetadataError>) {
        self.issue_lists.lock().unwrap().push_back(response);
    }

    pub fn push_issue(&self, response: Result<IssueDetail, MetadataError>) {
        self.issues.lock().unwrap().push_back(response);
    }

    pub fn push_volume(&self, response: Result<VolumeDetail, MetadataError>) {
        self.volumes.lock().unwrap().push_back(response);
    }

    pub fn push_publisher(&self, response: Result<PublisherDetail, MetadataError>) {
        self.publishers.lock().unwrap().push_back(response);
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next<T>(&self, queue: &Queue<T>, call: ApiCall) -> Result<T, MetadataError> {
        let endpoint = format!("{:?}", call);
        self.calls.lock().unwrap().push(call);
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(MetadataError::transport(endpoint, "No mock response queued"))
            })
    }
}

#[async_trait]
impl ComicVineApi for MockComicVineApi {
    async fn volume_issues_page(
        &self,
        _settings: &ApiSettings,
        volume_id: &str,
        offset: u32,
    ) -> Result<VolumeIssuesPage, MetadataError> {
        self.next(
            &self.pages,
            ApiCall::VolumePage {
                volume_id: volume_id.to_string(),
                offset,
            },
        )
    }

    async fn issues_for_volume(
        &self,
        _settings: &ApiSettings,
        volume_id: &str,
        issue_number: &str,
    ) -> Result<Vec<IssueSummary>, MetadataError> {
        self.next(
            &self.issue_lists,
            ApiCall::IssueList {
                volume_id: volume_id.to_string(),
                issue_number: issue_number.to_string(),
            },
        )
    }

    async fn issue_detail(
        &self,
        _settings: &ApiSettings,
        issue_id: &str,
    ) -> Result<IssueDetail, MetadataError> {
        self.next(
            &self.issues,
            ApiCall::Issue {
                issue_id: issue_id.to_string(),
            },
        )
    }

    async fn volume_detail(
        &self,
        _settings: &ApiSettings,
        detail_url: &str,
    ) -> Result<VolumeDetail, MetadataError> {
        self.next(
            &self.volumes,
            ApiCall::Volume {
                detail_url: detail_url.to_string(),
            },
        )
    }

    async fn publisher_detail(
        &self,
        _settings: &ApiSettings,
        detail_url: &str,
    ) -> Result<PublisherDetail, MetadataError> {
        self.next(
            &self.publishers,
            ApiCall::Publisher {
                detail_url: detail_url.to_string(),
            },
        )
    }
}

/// A throttle that records requested pauses instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingThrottle {
    pauses: Mutex<Vec<Duration>>,
    interrupt_at: Option<usize>,
}

impl RecordingThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the pause with the given zero-based index as interrupted.
    pub fn interrupting_at(index: usize) -> Self {
        Self {
            pauses: Mutex::new(Vec::new()),
            interrupt_at: Some(index),
        }
    }

    /// Every pause requested so far.
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

#[async_trait]
impl Throttle for RecordingThrottle {
    async fn pause(&self, delay: Duration) -> Result<(), MetadataError> {
        let mut pauses = self.pauses.lock().unwrap();
        if self.interrupt_at == Some(pauses.len()) {
            return Err(MetadataError::Interrupted("mock interrupt".to_string()));
        }
        pauses.push(delay);
        Ok(())
    }
}

/// Helper function to create a listing entry for testing.
pub fn make_summary(id: &str, issue_number: &str) -> IssueSummary {
    IssueSummary {
        id: id.to_string(),
        issue_number: Some(issue_number.to_string()),
        title: Some(format!("Issue {}", issue_number.trim())),
        cover_date: None,
        store_date: None,
        volume: None,
    }
}

/// Helper function to create a listing page for testing.
pub fn make_page(
    offset: u32,
    page_count: u32,
    total: u32,
    issues: Vec<IssueSummary>,
) -> VolumeIssuesPage {
    VolumeIssuesPage {
        offset,
        page_result_count: page_count,
        total_result_count: total,
        issues,
        publisher: Some("Publisher Name".to_string()),
        series: Some("Series Name".to_string()),
        start_year: Some("2020".to_string()),
    }
}
