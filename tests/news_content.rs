//! Content checks for the news pages: the home-page cap, listing order,
//! comment order and comment-form visibility.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, NaiveDate, Utc};
use common::TestApp;
use pressnote::config::ContentConfig;

#[tokio::test]
async fn homepage_shows_at_most_the_configured_count() {
    let app = TestApp::with_content(ContentConfig {
        news_count_on_home_page: 10,
    })
    .await;

    for i in 0..15 {
        app.create_news(&format!("News {}", i)).await;
    }

    let response = app.client().get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text().matches("news-card").count(), 10);
}

#[tokio::test]
async fn homepage_shows_everything_when_below_the_cap() {
    let app = TestApp::spawn().await;
    app.create_news("Only one").await;

    let response = app.client().get("/").await;
    assert_eq!(response.text().matches("news-card").count(), 1);
}

#[tokio::test]
async fn news_are_listed_newest_first() {
    let app = TestApp::spawn().await;
    let day = |d| NaiveDate::from_ymd_opt(2024, 10, d).unwrap();

    app.create_news_dated("Oldest story", day(21)).await;
    app.create_news_dated("Middle story", day(22)).await;
    app.create_news_dated("Newest story", day(23)).await;

    let body = app.client().get("/").await.text();
    let newest = body.find("Newest story").expect("newest shown");
    let middle = body.find("Middle story").expect("middle shown");
    let oldest = body.find("Oldest story").expect("oldest shown");
    assert!(newest < middle && middle < oldest, "expected newest first");
}

#[tokio::test]
async fn comments_are_listed_oldest_first() {
    let app = TestApp::spawn().await;
    let author = app.create_user("testuser", "password").await;
    let news = app.create_news("Test News").await;
    let base = Utc::now();

    app.create_comment(news.id, author.id, "Second comment", Some(base - Duration::days(1)))
        .await;
    app.create_comment(news.id, author.id, "Third comment", Some(base)).await;
    app.create_comment(news.id, author.id, "First comment", Some(base - Duration::days(2)))
        .await;

    let body = app.client().get(&format!("/news/{}/", news.id)).await.text();
    let first = body.find("First comment").expect("first shown");
    let second = body.find("Second comment").expect("second shown");
    let third = body.find("Third comment").expect("third shown");
    assert!(first < second && second < third, "expected oldest first");
}

#[tokio::test]
async fn anonymous_viewer_gets_no_comment_form() {
    let app = TestApp::spawn().await;
    let news = app.create_news("Test News").await;

    let response = app.client().get(&format!("/news/{}/", news.id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(!response.text().contains("comment_form"));
}

#[tokio::test]
async fn authenticated_viewer_gets_the_comment_form() {
    let app = TestApp::spawn().await;
    app.create_user("testuser", "password").await;
    let news = app.create_news("Test News").await;

    let client = app.login("testuser", "password").await;
    let response = client.get(&format!("/news/{}/", news.id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("comment_form"));
}
