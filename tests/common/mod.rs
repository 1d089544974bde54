//! Shared fixtures for the HTTP-level suites.
//!
//! Each `TestApp` owns an isolated in-memory database with the schema
//! applied, plus the services and repositories needed to seed it. Clients
//! are cheap: every `client()` call is a fresh browser with its own cookie
//! jar over the same application.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use axum_test::{TestResponse, TestServer, TestServerConfig};
use chrono::{DateTime, NaiveDate, Utc};

use pressnote::{
    config::ContentConfig,
    db::{
        create_test_pool, migrations,
        repositories::{
            CommentRepository, NoteRepository, SqlxCommentRepository, SqlxNewsRepository,
            SqlxNoteRepository, SqlxSessionRepository, SqlxUserRepository,
        },
    },
    models::{Comment, CreateNewsInput, News, Note, NoteInput, User},
    services::{CommentService, NewsService, NoteService, SignupInput, UserService},
    web::{build_router, AppState, RequestStats, Templates},
};

pub struct TestApp {
    router: Router,
    pub users: Arc<UserService>,
    pub news: Arc<NewsService>,
    pub note_service: Arc<NoteService>,
    pub comments: Arc<dyn CommentRepository>,
    pub notes: Arc<dyn NoteRepository>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::with_content(ContentConfig::default()).await
    }

    pub async fn with_content(content: ContentConfig) -> Self {
        let pool = create_test_pool().await.expect("pool");
        migrations::run_migrations(&pool).await.expect("migrations");

        let user_repo = SqlxUserRepository::boxed(pool.clone());
        let session_repo = SqlxSessionRepository::boxed(pool.clone());
        let news_repo = SqlxNewsRepository::boxed(pool.clone());
        let comment_repo = SqlxCommentRepository::boxed(pool.clone());
        let note_repo = SqlxNoteRepository::boxed(pool.clone());

        let users = Arc::new(UserService::new(user_repo, session_repo));
        let news = Arc::new(NewsService::new(news_repo.clone()));
        let comment_service = Arc::new(CommentService::new(comment_repo.clone(), news_repo));
        let note_service = Arc::new(NoteService::new(note_repo.clone()));

        let state = AppState {
            user_service: users.clone(),
            news_service: news.clone(),
            comment_service,
            note_service: note_service.clone(),
            templates: Arc::new(Templates::new().expect("templates")),
            content: Arc::new(content),
            request_stats: Arc::new(RequestStats::new()),
        };

        TestApp {
            router: build_router(state),
            users,
            news,
            note_service,
            comments: comment_repo,
            notes: note_repo,
        }
    }

    /// A fresh anonymous client with its own cookie jar.
    pub fn client(&self) -> TestServer {
        let config = TestServerConfig {
            save_cookies: true,
            ..TestServerConfig::default()
        };
        TestServer::new_with_config(self.router.clone(), config).expect("test server")
    }

    pub async fn create_user(&self, username: &str, password: &str) -> User {
        self.users
            .signup(SignupInput::new(username, password))
            .await
            .expect("signup")
    }

    /// A client logged in as an existing user.
    pub async fn login(&self, username: &str, password: &str) -> TestServer {
        let client = self.client();
        let response = client
            .post("/auth/login/")
            .form(&[("username", username), ("password", password)])
            .await;
        assert_eq!(
            response.status_code(),
            StatusCode::FOUND,
            "login as {} should redirect",
            username
        );
        client
    }

    pub async fn create_news(&self, title: &str) -> News {
        self.news
            .create(CreateNewsInput::new(title, "Some text"))
            .await
            .expect("news")
    }

    pub async fn create_news_dated(&self, title: &str, date: NaiveDate) -> News {
        self.news
            .create(CreateNewsInput::dated(title, "Some text", date))
            .await
            .expect("news")
    }

    pub async fn create_comment(
        &self,
        news_id: i64,
        author_id: i64,
        text: &str,
        created: Option<DateTime<Utc>>,
    ) -> Comment {
        self.comments
            .create(news_id, author_id, text, created)
            .await
            .expect("comment")
    }

    pub async fn create_note(&self, author_id: i64, title: &str, slug: &str) -> Note {
        self.note_service
            .create(author_id, NoteInput::new(title, "Text").with_slug(slug))
            .await
            .expect("note")
    }

    pub async fn comment_count(&self) -> i64 {
        self.comments.count().await.expect("count")
    }

    pub async fn note_by_slug(&self, slug: &str) -> Option<Note> {
        self.notes.get_by_slug(slug).await.expect("query")
    }

    pub async fn note_count_by_slug(&self, slug: &str) -> i64 {
        self.notes.count_by_slug(slug).await.expect("count")
    }
}

/// The Location header of a redirect response.
pub fn location(response: &TestResponse) -> String {
    let headers = response.headers();
    headers
        .get(axum::http::header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii header")
        .to_string()
}
