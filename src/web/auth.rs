//! Authentication pages
//!
//! Signup, login and logout are all publicly reachable. Login honors the
//! `next` query parameter set by the auth middleware; logout mutates only
//! on POST so the page itself stays safe to prefetch.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    Extension, Form,
};

use crate::models::User;
use crate::services::user::UserServiceError;
use crate::services::{LoginInput, SignupInput};
use crate::web::forms::{FormErrors, LoginForm, NextQuery, SignupForm, REQUIRED_FIELD};
use crate::web::middleware::{
    clear_session_cookie, found, found_with_cookie, session_cookie, session_token, AppState,
    AuthenticatedUser, WebError,
};
use crate::web::templates::base_context;

/// GET /auth/signup/ - the registration form.
pub async fn signup_page(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
) -> Result<Html<String>, WebError> {
    render_signup(&state, current(&user), "", FormErrors::default())
}

/// POST /auth/signup/ - register, then hand over to the login page.
pub async fn signup(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    Form(form): Form<SignupForm>,
) -> Result<Response, WebError> {
    let mut errors = FormErrors::default();

    if form.username.trim().is_empty() {
        errors.add_field("username", REQUIRED_FIELD);
    }
    if form.password.is_empty() {
        errors.add_field("password", REQUIRED_FIELD);
    }

    if errors.is_empty() {
        match state
            .user_service
            .signup(SignupInput::new(form.username.clone(), form.password.clone()))
            .await
        {
            Ok(_) => return Ok(found("/auth/login/")),
            Err(UserServiceError::UserExists(message)) => errors.add_field("username", message),
            Err(UserServiceError::Validation(message)) => errors.add_non_field(message),
            Err(err) => return Err(anyhow::Error::from(err).into()),
        }
    }

    let page = render_signup(&state, current(&user), &form.username, errors)?;
    Ok(page.into_response())
}

/// GET /auth/login/ - the login form, optionally carrying `next`.
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
    user: Option<Extension<AuthenticatedUser>>,
) -> Result<Html<String>, WebError> {
    render_login(&state, current(&user), &query, "", FormErrors::default())
}

/// POST /auth/login/ - open a session and follow `next`.
///
/// Bad credentials re-render the form with a non-field error, status 200.
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
    user: Option<Extension<AuthenticatedUser>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    match state
        .user_service
        .login(LoginInput::new(form.username.clone(), form.password.clone()))
        .await
    {
        Ok(session) => Ok(found_with_cookie(
            query.destination(),
            &session_cookie(&session.id),
        )),
        Err(UserServiceError::Authentication(_)) => {
            let mut errors = FormErrors::default();
            errors.add_non_field(
                "Пожалуйста, введите правильные имя пользователя и пароль.",
            );
            let page = render_login(&state, current(&user), &query, &form.username, errors)?;
            Ok(page.into_response())
        }
        Err(err) => Err(anyhow::Error::from(err).into()),
    }
}

/// GET /auth/logout/ - a page, not a mutation; public and always 200.
pub async fn logout_page(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
) -> Result<Html<String>, WebError> {
    let ctx = base_context(current(&user));
    Ok(Html(state.templates.render("auth/logout.html", &ctx)?))
}

/// POST /auth/logout/ - close the session and drop the cookie.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    if let Some(token) = session_token(&headers) {
        state
            .user_service
            .logout(&token)
            .await
            .map_err(anyhow::Error::from)?;
    }

    let ctx = base_context(None);
    let page = state.templates.render("auth/logout.html", &ctx)?;
    Ok((
        [(axum::http::header::SET_COOKIE, clear_session_cookie())],
        Html(page),
    )
        .into_response())
}

fn current<'a>(user: &'a Option<Extension<AuthenticatedUser>>) -> Option<&'a User> {
    user.as_ref().map(|ext| &ext.0 .0)
}

fn render_signup(
    state: &AppState,
    user: Option<&User>,
    form_username: &str,
    form_errors: FormErrors,
) -> Result<Html<String>, WebError> {
    let mut ctx = base_context(user);
    ctx.insert("form_username", form_username);
    ctx.insert("form_errors", &form_errors);
    Ok(Html(state.templates.render("auth/signup.html", &ctx)?))
}

fn render_login(
    state: &AppState,
    user: Option<&User>,
    query: &NextQuery,
    form_username: &str,
    form_errors: FormErrors,
) -> Result<Html<String>, WebError> {
    let mut ctx = base_context(user);
    ctx.insert("next", &query.next);
    ctx.insert("form_username", form_username);
    ctx.insert("form_errors", &form_errors);
    Ok(Html(state.templates.render("auth/login.html", &ctx)?))
}
