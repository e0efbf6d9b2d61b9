//! Integration tests for ComicVine Metadata
//!
//! These tests drive both flows end to end over HTTP against a local mock server.

use chrono::NaiveDate;
use comicvine_metadata::models::{
    ApiSettings, ComicTagType, IssueDetailsRequest, IssueLookupRequest, VolumeIssuesRequest,
};
use comicvine_metadata::sources::mock::RecordingThrottle;
use comicvine_metadata::sources::{ComicVineSource, HttpComicVineApi};
use comicvine_metadata::utils::{Interrupt, SignalThrottle};
use comicvine_metadata::MetadataError;
use mockito::{Matcher, Server};
use std::time::Duration;

const TEST_API_KEY: &str = "This.is.the.test.api.key";
const TEST_VOLUME_ID: &str = "219";
const TEST_ISSUE_NUMBER: &str = "989";
const TEST_BAD_RESPONSE_BODY: &str = "this is not JSON";

fn recording_source() -> ComicVineSource<HttpComicVineApi, RecordingThrottle> {
    ComicVineSource::with_parts(HttpComicVineApi::new().unwrap(), RecordingThrottle::new())
}

fn listing_body(offset: usize, count: usize, total: usize) -> String {
    let issues: Vec<String> = (offset..offset + count)
        .map(|n| {
            format!(
                r#"{{"id":{},"issue_number":"{}","name":"Issue {}","cover_date":"2020-01-01"}}"#,
                5000 + n,
                n + 1,
                n + 1
            )
        })
        .collect();

    format!(
        r#"{{"error":"OK","limit":100,"offset":{},"number_of_page_results":{},
            "number_of_total_results":{},"status_code":1,
            "results":{{"issues":[{}],"name":"Series Name",
            "publisher":{{"id":1,"name":"Publisher Name"}},"start_year":"2020"}}}}"#,
        offset,
        count,
        total,
        issues.join(",")
    )
}

fn offset_query(offset: u32) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("api_key".into(), TEST_API_KEY.into()),
        Matcher::UrlEncoded("format".into(), "json".into()),
        Matcher::UrlEncoded("offset".into(), offset.to_string()),
    ])
}

#[tokio::test]
async fn test_volume_walk_over_two_pages() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/volume/4050-219/")
        .match_query(offset_query(0))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing_body(0, 100, 150))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/volume/4050-219/")
        .match_query(offset_query(100))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(listing_body(100, 50, 150))
        .expect(1)
        .create_async()
        .await;

    let api = HttpComicVineApi::new().unwrap();
    let source = ComicVineSource::with_parts(api, RecordingThrottle::new());
    let settings = ApiSettings::new(TEST_API_KEY)
        .base_url(server.url())
        .delay_seconds(2);

    let records = tokio_test::assert_ok!(
        source
            .get_all_issues(&VolumeIssuesRequest::new(settings, "219"))
            .await
    );

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(records.len(), 150);
    assert_eq!(records[0].source_id, "5000");
    assert_eq!(records[149].source_id, "5149");
    assert_eq!(records[149].issue_number, "150");
    assert_eq!(records[0].publisher, "Publisher Name");
    assert_eq!(records[0].series, "Series Name");
    assert_eq!(records[0].volume, "2020");
    assert_eq!(source.throttle().pauses(), vec![Duration::from_secs(2)]);
}

#[tokio::test]
async fn test_volume_walk_with_real_throttle() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/volume/4050-7/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(listing_body(0, 1, 1))
        .create_async()
        .await;

    let (_tx, interrupt) = Interrupt::manual();
    let source = ComicVineSource::with_parts(
        HttpComicVineApi::new().unwrap(),
        SignalThrottle::with_interrupt(interrupt),
    );
    let settings = ApiSettings::new(TEST_API_KEY)
        .base_url(server.url())
        .delay_seconds(0);

    let records = source
        .get_all_issues(&VolumeIssuesRequest::new(settings, "7"))
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_volume_walk_aborts_on_bad_second_page() {
    let mut server = Server::new_async().await;
    let _first = server
        .mock("GET", "/volume/4050-219/")
        .match_query(offset_query(0))
        .with_status(200)
        .with_body(listing_body(0, 100, 150))
        .create_async()
        .await;
    let _second = server
        .mock("GET", "/volume/4050-219/")
        .match_query(offset_query(100))
        .with_status(200)
        .with_body("this is not JSON")
        .create_async()
        .await;

    let source = recording_source();
    let settings = ApiSettings::new(TEST_API_KEY).base_url(server.url());

    let error = tokio_test::assert_err!(
        source
            .get_all_issues(&VolumeIssuesRequest::new(settings, "219"))
            .await
    );
    assert!(matches!(error, MetadataError::Transport { .. }));
}

#[tokio::test]
async fn test_missing_api_key_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let source = recording_source();
    let settings = ApiSettings::new("").base_url(server.url());

    let walk = source
        .get_all_issues(&VolumeIssuesRequest::new(settings.clone(), "219"))
        .await;
    let detail = source
        .get_issue_details(&IssueDetailsRequest::new(settings, "71765"))
        .await;

    assert!(matches!(walk, Err(MetadataError::Configuration(_))));
    assert!(matches!(detail, Err(MetadataError::Configuration(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_issue_detail_chain_follows_detail_urls() {
    let mut server = Server::new_async().await;
    let base = server.url();

    let issue = server
        .mock("GET", "/issue/4000-71765/")
        .match_query(Matcher::UrlEncoded("api_key".into(), TEST_API_KEY.into()))
        .with_status(200)
        .with_body(format!(
            r#"{{"error":"OK","status_code":1,"results":{{
                "id":71765,"issue_number":"1","name":"Issue Title","cover_date":"2012-05-01",
                "store_date":null,"description":"<p>Issue description</p>",
                "volume":{{"id":66143,"name":"Volume Name",
                           "api_detail_url":"{base}/volume/4050-66143/"}},
                "character_credits":[{{"id":1,"name":"Character Name"}}],
                "team_credits":[{{"id":2,"name":"Team Name"}}],
                "location_credits":null,
                "story_arc_credits":[{{"id":3,"name":"Story Name"}}],
                "person_credits":[{{"id":4,"name":"Credit Name","role":"Penciller, Editor"}},
                                  {{"id":5,"name":"Other Name","role":"writer, gaffer"}}]
            }}}}"#
        ))
        .expect(1)
        .create_async()
        .await;

    let volume = server
        .mock("GET", "/volume/4050-66143/")
        .match_query(Matcher::UrlEncoded("format".into(), "json".into()))
        .with_status(200)
        .with_body(format!(
            r#"{{"error":"OK","status_code":1,"results":{{"name":"Volume Name","start_year":2012,
                "publisher":{{"id":10,"name":"Publisher Ref",
                              "api_detail_url":"{base}/publisher/4010-10/"}}}}}}"#
        ))
        .expect(1)
        .create_async()
        .await;

    let publisher = server
        .mock("GET", "/publisher/4010-10/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"error":"OK","status_code":1,"results":{"name":"Publisher Name"}}"#)
        .expect(1)
        .create_async()
        .await;

    let source = recording_source();
    let settings = ApiSettings::new(TEST_API_KEY).base_url(base.clone());

    let record = source
        .get_issue_details(&IssueDetailsRequest::new(settings, "71765"))
        .await
        .unwrap();

    issue.assert_async().await;
    volume.assert_async().await;
    publisher.assert_async().await;

    assert_eq!(record.source_id, "71765");
    assert_eq!(record.publisher, "Publisher Name");
    assert_eq!(record.series, "Volume Name");
    assert_eq!(record.volume, "2012");
    assert_eq!(record.issue_number, "1");
    assert_eq!(record.title.as_deref(), Some("Issue Title"));
    assert_eq!(record.characters, vec!["Character Name"]);
    assert_eq!(record.teams, vec!["Team Name"]);
    assert!(record.locations.is_empty());
    assert_eq!(record.stories, vec!["Story Name"]);

    let roles: Vec<(&str, ComicTagType)> = record
        .credits
        .iter()
        .map(|c| (c.name.as_str(), c.role))
        .collect();
    assert_eq!(
        roles,
        vec![
            ("Credit Name", ComicTagType::Penciller),
            ("Credit Name", ComicTagType::Editor),
            ("Other Name", ComicTagType::Writer),
        ]
    );
    assert!(source.throttle().pauses().is_empty());
}

#[tokio::test]
async fn test_issue_detail_chain_stops_on_volume_failure() {
    let mut server = Server::new_async().await;
    let base = server.url();

    let _issue = server
        .mock("GET", "/issue/4000-71765/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(format!(
            r#"{{"status_code":1,"results":{{"id":"71765",
                "volume":{{"api_detail_url":"{base}/volume/4050-66143/"}}}}}}"#
        ))
        .create_async()
        .await;
    let _volume = server
        .mock("GET", "/volume/4050-66143/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("null")
        .create_async()
        .await;
    let publisher = server
        .mock("GET", Matcher::Regex("^/publisher/".to_string()))
        .expect(0)
        .create_async()
        .await;

    let source = recording_source();
    let settings = ApiSettings::new(TEST_API_KEY).base_url(base.clone());

    let result = source
        .get_issue_details(&IssueDetailsRequest::new(settings, "71765"))
        .await;

    match result {
        Err(MetadataError::Transport { message, .. }) => {
            assert_eq!(message, "No response received");
        }
        other => panic!("Expected transport error, got {:?}", other),
    }
    publisher.assert_async().await;
}

fn lookup_request(server: &Server) -> IssueLookupRequest {
    IssueLookupRequest::new(
        ApiSettings::new(TEST_API_KEY).base_url(server.url()),
        TEST_VOLUME_ID,
        TEST_ISSUE_NUMBER,
    )
}

#[tokio::test]
async fn test_lookup_issue_without_api_key() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

    let mut request = lookup_request(&server);
    request.settings.api_key = String::new();

    let result = recording_source().lookup_issue(&request).await;

    assert!(matches!(result, Err(MetadataError::Configuration(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_lookup_issue_without_volume_id() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

    let mut request = lookup_request(&server);
    request.volume_id = String::new();

    let result = recording_source().lookup_issue(&request).await;

    assert!(matches!(result, Err(MetadataError::Configuration(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_lookup_issue_bad_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/issues/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TEST_BAD_RESPONSE_BODY)
        .create_async()
        .await;

    let result = recording_source()
        .lookup_issue(&lookup_request(&server))
        .await;

    let error = tokio_test::assert_err!(result);
    assert!(matches!(error, MetadataError::Transport { .. }));
}

#[tokio::test]
async fn test_lookup_issue() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/issues/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api_key".into(), TEST_API_KEY.into()),
            Matcher::UrlEncoded("format".into(), "json".into()),
            Matcher::UrlEncoded("filter".into(), "volume:219,issue_number:989".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"error":"OK","limit":100,"offset":0,"number_of_page_results":1,
                "number_of_total_results":1,"status_code":1,
                "results":[{"cover_date":"2012-05-01","description":null,"id":421092,
                    "image":{"icon_url":"https:\/\/comicvine1.cbsistatic.com\/uploads\/icon.jpg"},
                    "issue_number":"1","store_date":"2012-05-05",
                    "volume":{"id":66143,"name":"Action Lab Confidential",
                        "api_detail_url":"https://comicvine.gamespot.com/api/volume/4050-66143/"}}],
                "version":"1.0"}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let records = tokio_test::assert_ok!(
        recording_source()
            .lookup_issue(&lookup_request(&server))
            .await
    );

    mock.assert_async().await;
    assert!(!records.is_empty());
    assert_eq!(records[0].source_id, "421092");
    assert_eq!(records[0].series, "Action Lab Confidential");
    assert_eq!(records[0].issue_number, "1");
    assert_eq!(records[0].cover_date, NaiveDate::from_ymd_opt(2012, 5, 1));
    assert_eq!(records[0].store_date, NaiveDate::from_ymd_opt(2012, 5, 5));
}
