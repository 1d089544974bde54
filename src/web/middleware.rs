//! Web middleware and shared state
//!
//! Authentication runs in two stages: `optional_auth` resolves the session
//! cookie into an `AuthenticatedUser` request extension for every route,
//! and `require_auth` turns its absence into a login redirect that carries
//! the original path in the `next` query parameter.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode, Uri},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::ContentConfig;
use crate::models::User;
use crate::services::comment::CommentServiceError;
use crate::services::note::NoteServiceError;
use crate::services::{CommentService, NewsService, NoteService, UserService};
use crate::web::templates::Templates;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Session cookie lifetime, kept in step with the server-side session TTL.
const SESSION_COOKIE_MAX_AGE: i64 = 14 * 24 * 60 * 60;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub news_service: Arc<NewsService>,
    pub comment_service: Arc<CommentService>,
    pub note_service: Arc<NoteService>,
    pub templates: Arc<Templates>,
    pub content: Arc<ContentConfig>,
    pub request_stats: Arc<RequestStats>,
}

/// Authenticated user extracted from the session cookie
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

// ============================================================================
// Errors
// ============================================================================

/// Terminal handler outcomes that are not rendered forms.
///
/// Authorization failures deliberately collapse into `NotFound`: a viewer
/// who does not own a comment or note must not be able to tell it exists.
#[derive(Debug)]
pub enum WebError {
    NotFound,
    Internal(anyhow::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound => (
                StatusCode::NOT_FOUND,
                Html(include_str!("../../templates/404.html")),
            )
                .into_response(),
            WebError::Internal(err) => {
                tracing::error!("Request failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl From<anyhow::Error> for WebError {
    fn from(err: anyhow::Error) -> Self {
        WebError::Internal(err)
    }
}

impl From<CommentServiceError> for WebError {
    fn from(err: CommentServiceError) -> Self {
        match err {
            CommentServiceError::NotFound | CommentServiceError::NewsNotFound => WebError::NotFound,
            CommentServiceError::ProhibitedWord => {
                WebError::Internal(anyhow::anyhow!("moderation rejection left unhandled"))
            }
            CommentServiceError::Internal(e) => WebError::Internal(e),
        }
    }
}

impl From<NoteServiceError> for WebError {
    fn from(err: NoteServiceError) -> Self {
        match err {
            NoteServiceError::NotFound => WebError::NotFound,
            NoteServiceError::SlugTaken(_) => {
                WebError::Internal(anyhow::anyhow!("slug collision left unhandled"))
            }
            NoteServiceError::Internal(e) => WebError::Internal(e),
        }
    }
}

// ============================================================================
// Redirects and cookies
// ============================================================================

/// A 302 redirect to the given location.
pub fn found(location: &str) -> Response {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .body(Body::empty())
        .expect("redirect response")
}

/// A 302 redirect that also sets a cookie.
pub fn found_with_cookie(location: &str, cookie: &str) -> Response {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .header(header::SET_COOKIE, cookie)
        .body(Body::empty())
        .expect("redirect response")
}

/// The login redirect for an anonymous request to `uri`.
///
/// The original path (including its query string) is passed through the
/// `next` parameter verbatim.
pub fn login_redirect(uri: &Uri) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    found(&format!("/auth/login/?next={}", target))
}

/// The `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, SESSION_COOKIE_MAX_AGE
    )
}

/// The `Set-Cookie` value removing the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Pull the session token out of the `Cookie` header, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for cookie in cookie_header.split(';') {
        let token = cookie
            .trim()
            .strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='));
        if let Some(token) = token {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }
    None
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolve the session cookie into an `AuthenticatedUser` extension.
///
/// Never rejects: anonymous and invalid-cookie requests simply proceed
/// without the extension.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = session_token(request.headers()) {
        if let Ok(Some(user)) = state.user_service.validate_session(&token).await {
            request.extensions_mut().insert(AuthenticatedUser(user));
        }
    }
    next.run(request).await
}

/// Gate a route on authentication.
///
/// Runs inside `optional_auth`; a request without the extension is
/// redirected to the login page with `next` set to the path it asked for.
pub async fn require_auth(request: Request, next: Next) -> Response {
    if request.extensions().get::<AuthenticatedUser>().is_none() {
        return login_redirect(request.uri());
    }
    next.run(request).await
}

// ============================================================================
// Request statistics
// ============================================================================

/// Lightweight request counters using atomics (no locks).
pub struct RequestStats {
    total_requests: AtomicU64,
    total_response_time_us: AtomicU64,
    start_time: Instant,
}

impl RequestStats {
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_response_time_us: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record one request and its duration.
    pub fn record(&self, duration_us: u64) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_response_time_us
            .fetch_add(duration_us, Ordering::Relaxed);
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    pub fn avg_response_time_us(&self) -> f64 {
        let total = self.total_requests.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        self.total_response_time_us.load(Ordering::Relaxed) as f64 / total as f64
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Record request count and latency for every request.
pub async fn request_stats_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let response = next.run(request).await;
    state
        .request_stats
        .record(start.elapsed().as_micros() as u64);
    response
}
