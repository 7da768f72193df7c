// tests/providers_news.rs
use chrono::{TimeZone, Utc};
use hot_bot::ingest::providers::news_rss::{parse_feed, NewsFeedClient};
use hot_bot::ingest::types::{HeadlineSource, NewsSource};
use std::fs;

fn fixture() -> String {
    fs::read_to_string("tests/fixtures/bbc_world.xml").expect("fixture")
}

#[test]
fn parses_bbc_fixture() {
    let fetched_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let items = parse_feed(&fixture(), fetched_at).expect("ok");

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].title, "Floods displace thousands in river delta");
    assert_eq!(
        items[0].published_at,
        Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()
    );
    assert_eq!(items[1].title, "Election results contested in capital");
    assert_eq!(items[1].source_url, "https://www.bbc.co.uk/news/world-2");
    assert_eq!(items[1].author.as_deref(), Some("Jane Reporter"));
    assert_eq!(items[1].published_at, fetched_at);
}

#[test]
fn every_named_source_has_a_feed() {
    for s in [NewsSource::Reuters, NewsSource::Bbc, NewsSource::Cnn, NewsSource::AlJazeera] {
        assert!(s.feed_url().starts_with("http"), "{s}");
        assert!(s.feed_url().contains("rss") || s.feed_url().contains("feed"), "{s}");
    }
}

#[tokio::test]
async fn fetch_truncates_after_parsing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/world/rss.xml")
        .match_header("user-agent", "hotnews")
        .with_status(200)
        .with_header("content-type", "application/rss+xml")
        .with_body(fixture())
        .create_async()
        .await;

    let client = NewsFeedClient::new(NewsSource::Bbc, "hotnews")
        .unwrap()
        .with_url_override(format!("{}/world/rss.xml", server.url()));
    let items = client.fetch_latest(2).await.expect("source available");

    mock.assert_async().await;
    let titles: Vec<_> = items.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(
        titles,
        [
            "Floods displace thousands in river delta",
            "Election results contested in capital"
        ]
    );
}

#[tokio::test]
async fn http_error_is_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/feed")
        .with_status(503)
        .create_async()
        .await;

    let client = NewsFeedClient::new(NewsSource::Cnn, "")
        .unwrap()
        .with_url_override(format!("{}/feed", server.url()));
    assert!(client.fetch_latest(8).await.is_none());
}

#[tokio::test]
async fn malformed_feed_is_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/feed")
        .with_status(200)
        .with_body("{\"not\": \"xml\"}")
        .create_async()
        .await;

    let client = NewsFeedClient::new(NewsSource::Reuters, "hotnews")
        .unwrap()
        .with_url_override(format!("{}/feed", server.url()));
    assert!(client.fetch_latest(8).await.is_none());
}
