//! Behavior checks for note creation and mutation: login gating, slug
//! derivation and the duplicate-slug rejection.

mod common;

use axum::http::StatusCode;
use common::{location, TestApp};

#[tokio::test]
async fn authenticated_user_can_create_a_note() {
    let app = TestApp::spawn().await;
    let user = app.create_user("user1", "pass1234").await;

    let client = app.login("user1", "pass1234").await;
    let response = client
        .post("/add/")
        .form(&[("title", "New Note"), ("text", "This is a new note")])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), "/done/");

    // Slug was derived from the title; the note belongs to the requester.
    let note = app.note_by_slug("new-note").await.expect("note stored");
    assert_eq!(note.title, "New Note");
    assert_eq!(note.author_id, user.id);
}

#[tokio::test]
async fn anonymous_user_cannot_create_a_note() {
    let app = TestApp::spawn().await;

    let response = app
        .client()
        .post("/add/")
        .form(&[("title", "Anonymous Note"), ("text", "This should not work")])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), "/auth/login/?next=/add/");
    assert!(app.note_by_slug("anonymous-note").await.is_none());
}

#[tokio::test]
async fn slug_must_be_unique() {
    let app = TestApp::spawn().await;
    app.create_user("user1", "pass1234").await;

    let client = app.login("user1", "pass1234").await;

    let first = client
        .post("/add/")
        .form(&[
            ("title", "First Note"),
            ("text", "This is the first note"),
            ("slug", "unique-slug"),
        ])
        .await;
    assert_eq!(first.status_code(), StatusCode::FOUND);

    let second = client
        .post("/add/")
        .form(&[
            ("title", "Second Note"),
            ("text", "This is the second note"),
            ("slug", "unique-slug"),
        ])
        .await;
    assert_eq!(second.status_code(), StatusCode::OK);
    assert!(second.text().contains(
        "unique-slug - такой slug уже существует, придумайте уникальное значение!"
    ));
    assert_eq!(app.note_count_by_slug("unique-slug").await, 1);
}

#[tokio::test]
async fn duplicate_slug_is_rejected_across_users_too() {
    let app = TestApp::spawn().await;
    let user1 = app.create_user("user1", "pass1234").await;
    app.create_user("user2", "pass1234").await;
    app.create_note(user1.id, "First", "unique-slug").await;

    let client = app.login("user2", "pass1234").await;
    let response = client
        .post("/add/")
        .form(&[("title", "Second"), ("text", "Text"), ("slug", "unique-slug")])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("такой slug уже существует"));
    assert_eq!(app.note_count_by_slug("unique-slug").await, 1);
}

#[tokio::test]
async fn blank_title_and_text_are_rejected() {
    let app = TestApp::spawn().await;
    app.create_user("user1", "pass1234").await;

    let client = app.login("user1", "pass1234").await;
    let response = client
        .post("/add/")
        .form(&[("title", ""), ("text", "")])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Обязательное поле."));
}

#[tokio::test]
async fn author_can_edit_a_note() {
    let app = TestApp::spawn().await;
    let user = app.create_user("user1", "pass1234").await;
    app.create_note(user.id, "Before", "my-note").await;

    let client = app.login("user1", "pass1234").await;
    let response = client
        .post("/edit/my-note/")
        .form(&[("title", "After"), ("text", "Updated"), ("slug", "my-note")])
        .await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), "/done/");

    let note = app.note_by_slug("my-note").await.expect("note kept");
    assert_eq!(note.title, "After");
}

#[tokio::test]
async fn non_author_edit_post_is_404_and_changes_nothing() {
    let app = TestApp::spawn().await;
    let user1 = app.create_user("user1", "pass1234").await;
    app.create_user("user2", "pass1234").await;
    app.create_note(user1.id, "Original", "my-note").await;

    let client = app.login("user2", "pass1234").await;
    let response = client
        .post("/edit/my-note/")
        .form(&[("title", "Hijacked"), ("text", "Updated"), ("slug", "my-note")])
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let note = app.note_by_slug("my-note").await.expect("note kept");
    assert_eq!(note.title, "Original");
}

#[tokio::test]
async fn author_can_delete_a_note() {
    let app = TestApp::spawn().await;
    let user = app.create_user("user1", "pass1234").await;
    app.create_note(user.id, "Doomed", "doomed").await;

    let client = app.login("user1", "pass1234").await;
    let response = client.post("/delete/doomed/").await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(location(&response), "/done/");
    assert_eq!(app.note_count_by_slug("doomed").await, 0);
}
