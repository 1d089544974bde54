//! Web layer - HTTP handlers and routing
//!
//! Server-rendered pages for the news feed, comments, notes and
//! authentication. Route paths keep their trailing slashes; they are part
//! of the contract (the login redirect reproduces them verbatim in `next`).

pub mod auth;
pub mod forms;
pub mod middleware;
pub mod news;
pub mod notes;
pub mod templates;

use axum::{
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

pub use middleware::{AppState, AuthenticatedUser, RequestStats, WebError};
pub use templates::Templates;

/// Build the complete application router.
pub fn build_router(state: AppState) -> Router {
    // Author-only and login-only pages; require_auth turns anonymous
    // access into a login redirect carrying the original path.
    let protected = Router::new()
        .route("/notes/", get(notes::list_notes))
        .route("/add/", get(notes::add_note_page).post(notes::create_note))
        .route("/note/{slug}/", get(notes::note_detail))
        .route("/edit/{slug}/", get(notes::edit_note_page).post(notes::update_note))
        .route(
            "/delete/{slug}/",
            get(notes::delete_note_page).post(notes::delete_note),
        )
        .route("/done/", get(notes::success_page))
        .route(
            "/edit_comment/{id}/",
            get(news::edit_comment_page).post(news::update_comment),
        )
        .route(
            "/delete_comment/{id}/",
            get(news::delete_comment_page).post(news::delete_comment),
        )
        .route_layer(axum_middleware::from_fn(middleware::require_auth));

    // Public pages. Comment submission handles its own login redirect so
    // the detail page itself stays readable by everyone.
    let public = Router::new()
        .route("/", get(news::home))
        .route("/news/{id}/", get(news::detail).post(news::post_comment))
        .route("/auth/signup/", get(auth::signup_page).post(auth::signup))
        .route("/auth/login/", get(auth::login_page).post(auth::login))
        .route("/auth/logout/", get(auth::logout_page).post(auth::logout));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::optional_auth,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::request_stats_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
