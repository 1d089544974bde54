//! News pages and comment handlers
//!
//! The home page and news detail are public; posting a comment requires a
//! login, and editing or deleting one is reserved for its author. The
//! comment form itself is only rendered for authenticated viewers.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    Extension, Form,
};

use crate::models::{News, User};
use crate::services::comment::CommentServiceError;
use crate::services::moderation::WARNING;
use crate::web::forms::{CommentForm, FormErrors, REQUIRED_FIELD};
use crate::web::middleware::{found, AppState, AuthenticatedUser, WebError};
use crate::web::templates::base_context;

fn viewer(user: &Option<Extension<AuthenticatedUser>>) -> Option<&User> {
    user.as_ref().map(|ext| &ext.0 .0)
}

/// GET / - the news feed, newest first, capped by configuration.
pub async fn home(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
) -> Result<Html<String>, WebError> {
    let news_list = state
        .news_service
        .home_page(state.content.news_count_on_home_page)
        .await?;

    let mut ctx = base_context(viewer(&user));
    ctx.insert("news_list", &news_list);
    Ok(Html(state.templates.render("news/home.html", &ctx)?))
}

/// GET /news/{id}/ - one news item with its comments, oldest first.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: Option<Extension<AuthenticatedUser>>,
) -> Result<Html<String>, WebError> {
    let news = state.news_service.get(id).await?.ok_or(WebError::NotFound)?;
    render_detail(&state, &news, viewer(&user), FormErrors::default(), "").await
}

/// POST /news/{id}/ - submit a comment.
///
/// Anonymous submissions bounce to the login page and store nothing. A
/// moderation or required-field failure re-renders the page with the bound
/// form (status 200); success redirects back to the detail page.
pub async fn post_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: Option<Extension<AuthenticatedUser>>,
    Form(form): Form<CommentForm>,
) -> Result<Response, WebError> {
    let Some(Extension(AuthenticatedUser(user))) = user else {
        return Ok(found(&format!("/auth/login/?next=/news/{}/", id)));
    };

    let news = state.news_service.get(id).await?.ok_or(WebError::NotFound)?;

    let text = form.text.trim();
    let mut errors = FormErrors::default();

    if text.is_empty() {
        errors.add_field("text", REQUIRED_FIELD);
    } else {
        match state.comment_service.create(id, user.id, text).await {
            Ok(_) => return Ok(found(&format!("/news/{}/", id))),
            Err(CommentServiceError::ProhibitedWord) => {
                errors.add_field("text", WARNING);
            }
            Err(err) => return Err(err.into()),
        }
    }

    let page = render_detail(&state, &news, Some(&user), errors, &form.text).await?;
    Ok(page.into_response())
}

async fn render_detail(
    state: &AppState,
    news: &News,
    user: Option<&User>,
    form_errors: FormErrors,
    form_text: &str,
) -> Result<Html<String>, WebError> {
    let comments = state.comment_service.list_for_news(news.id).await?;

    let mut ctx = base_context(user);
    ctx.insert("news", news);
    ctx.insert("comments", &comments);
    ctx.insert("form_errors", &form_errors);
    ctx.insert("form_text", form_text);
    Ok(Html(state.templates.render("news/detail.html", &ctx)?))
}

/// GET /edit_comment/{id}/ - the bound edit form, author-only.
pub async fn edit_comment_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Html<String>, WebError> {
    let comment = state.comment_service.get_for_author(id, user.id).await?;
    render_edit_form(&state, &user, &comment, FormErrors::default(), &comment.text)
}

/// POST /edit_comment/{id}/ - apply an edit, author-only.
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Form(form): Form<CommentForm>,
) -> Result<Response, WebError> {
    let comment = state.comment_service.get_for_author(id, user.id).await?;

    let text = form.text.trim();
    let mut errors = FormErrors::default();

    if text.is_empty() {
        errors.add_field("text", REQUIRED_FIELD);
    } else {
        match state.comment_service.edit(id, user.id, text).await {
            Ok(updated) => return Ok(found(&format!("/news/{}/", updated.news_id))),
            Err(CommentServiceError::ProhibitedWord) => {
                errors.add_field("text", WARNING);
            }
            Err(err) => return Err(err.into()),
        }
    }

    let page = render_edit_form(&state, &user, &comment, errors, &form.text)?;
    Ok(page.into_response())
}

fn render_edit_form(
    state: &AppState,
    user: &User,
    comment: &crate::models::Comment,
    form_errors: FormErrors,
    form_text: &str,
) -> Result<Html<String>, WebError> {
    let mut ctx = base_context(Some(user));
    ctx.insert("comment", comment);
    ctx.insert("form_errors", &form_errors);
    ctx.insert("form_text", form_text);
    Ok(Html(state.templates.render("news/edit_comment.html", &ctx)?))
}

/// GET /delete_comment/{id}/ - the confirmation page, author-only.
pub async fn delete_comment_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Html<String>, WebError> {
    let comment = state.comment_service.get_for_author(id, user.id).await?;

    let mut ctx = base_context(Some(&user));
    ctx.insert("comment", &comment);
    Ok(Html(state.templates.render("news/delete_comment.html", &ctx)?))
}

/// POST /delete_comment/{id}/ - delete, author-only.
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Response, WebError> {
    let comment = state.comment_service.get_for_author(id, user.id).await?;
    state.comment_service.delete(id, user.id).await?;
    Ok(found(&format!("/news/{}/", comment.news_id)))
}
