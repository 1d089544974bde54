//! Behavior checks for comment submission and mutation: login gating,
//! moderation, and the author-only edit/delete rules.

mod common;

use axum::http::StatusCode;
use common::{location, TestApp};

#[tokio::test]
async fn anonymous_comment_is_bounced_to_login_and_not_stored() {
    let app = TestApp::spawn().await;
    let news = app.create_news("Test News").await;

    let response = app
        .client()
        .post(&format!("/news/{}/", news.id))
        .form(&[("text", "Test comment")])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        format!("/auth/login/?next=/news/{}/", news.id)
    );
    assert_eq!(app.comment_count().await, 0);
}

#[tokio::test]
async fn authorized_comment_is_stored_and_redirects_to_detail() {
    let app = TestApp::spawn().await;
    app.create_user("testuser", "password").await;
    let news = app.create_news("Test News").await;

    let client = app.login("testuser", "password").await;
    let response = client
        .post(&format!("/news/{}/", news.id))
        .form(&[("text", "Test comment")])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/news/{}/", news.id));
    assert_eq!(app.comment_count().await, 1);

    let detail = client.get(&format!("/news/{}/", news.id)).await.text();
    assert!(detail.contains("Test comment"));
}

#[tokio::test]
async fn comment_with_banned_word_is_rejected_with_form_error() {
    let app = TestApp::spawn().await;
    app.create_user("testuser", "password").await;
    let news = app.create_news("Test News").await;

    let client = app.login("testuser", "password").await;
    let response = client
        .post(&format!("/news/{}/", news.id))
        .form(&[("text", "редиска")])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Не ругайтесь!"));
    assert_eq!(app.comment_count().await, 0);
}

#[tokio::test]
async fn empty_comment_is_rejected_with_form_error() {
    let app = TestApp::spawn().await;
    app.create_user("testuser", "password").await;
    let news = app.create_news("Test News").await;

    let client = app.login("testuser", "password").await;
    let response = client
        .post(&format!("/news/{}/", news.id))
        .form(&[("text", "   ")])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Обязательное поле."));
    assert_eq!(app.comment_count().await, 0);
}

#[tokio::test]
async fn author_can_edit_and_delete_own_comment() {
    let app = TestApp::spawn().await;
    let author = app.create_user("author", "password").await;
    let news = app.create_news("Test News").await;
    let comment = app.create_comment(news.id, author.id, "Test comment", None).await;

    let client = app.login("author", "password").await;

    let edit = client
        .post(&format!("/edit_comment/{}/", comment.id))
        .form(&[("text", "Updated text")])
        .await;
    assert_eq!(edit.status_code(), StatusCode::FOUND);
    assert_eq!(location(&edit), format!("/news/{}/", news.id));

    let detail = client.get(&format!("/news/{}/", news.id)).await.text();
    assert!(detail.contains("Updated text"));

    let delete = client.post(&format!("/delete_comment/{}/", comment.id)).await;
    assert_eq!(delete.status_code(), StatusCode::FOUND);
    assert_eq!(app.comment_count().await, 0);
}

#[tokio::test]
async fn edit_with_banned_word_is_rejected() {
    let app = TestApp::spawn().await;
    let author = app.create_user("author", "password").await;
    let news = app.create_news("Test News").await;
    let comment = app.create_comment(news.id, author.id, "Before", None).await;

    let client = app.login("author", "password").await;
    let response = client
        .post(&format!("/edit_comment/{}/", comment.id))
        .form(&[("text", "ты негодяй")])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Не ругайтесь!"));

    let detail = client.get(&format!("/news/{}/", news.id)).await.text();
    assert!(detail.contains("Before"));
}

#[tokio::test]
async fn non_author_cannot_edit_or_delete_a_comment() {
    let app = TestApp::spawn().await;
    let author = app.create_user("author", "password").await;
    app.create_user("testuser", "password").await;
    let news = app.create_news("Test News").await;
    let comment = app.create_comment(news.id, author.id, "Test comment", None).await;

    let client = app.login("testuser", "password").await;

    let edit = client
        .post(&format!("/edit_comment/{}/", comment.id))
        .form(&[("text", "Updated text")])
        .await;
    assert_eq!(edit.status_code(), StatusCode::NOT_FOUND);

    let delete = client.post(&format!("/delete_comment/{}/", comment.id)).await;
    assert_eq!(delete.status_code(), StatusCode::NOT_FOUND);

    assert_eq!(app.comment_count().await, 1);
    let detail = client.get(&format!("/news/{}/", news.id)).await.text();
    assert!(detail.contains("Test comment"));
}
