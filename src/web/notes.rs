//! Note pages
//!
//! Everything here sits behind `require_auth`, and every slug lookup goes
//! through the author-scoped service, so another user's note answers 404 on
//! every route. Successful mutations land on /done/.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    Extension, Form,
};

use crate::models::User;
use crate::services::note::NoteServiceError;
use crate::web::forms::{FormErrors, NoteForm, REQUIRED_FIELD};
use crate::web::middleware::{found, AppState, AuthenticatedUser, WebError};
use crate::web::templates::base_context;

/// GET /notes/ - the viewer's notes, nobody else's.
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Html<String>, WebError> {
    let notes = state.note_service.list(user.id).await?;

    let mut ctx = base_context(Some(&user));
    ctx.insert("notes", &notes);
    Ok(Html(state.templates.render("notes/list.html", &ctx)?))
}

/// GET /add/ - the empty note form.
pub async fn add_note_page(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Html<String>, WebError> {
    render_note_form(
        &state,
        &user,
        "Добавить заметку",
        "/add/",
        &NoteForm::default(),
        FormErrors::default(),
    )
}

/// POST /add/ - create a note.
///
/// A duplicate slug re-renders the form with a field error (status 200)
/// and leaves storage untouched.
pub async fn create_note(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Form(form): Form<NoteForm>,
) -> Result<Response, WebError> {
    let mut errors = validate_presence(&form);

    if errors.is_empty() {
        match state
            .note_service
            .create(user.id, form.clone().into_input())
            .await
        {
            Ok(_) => return Ok(found("/done/")),
            Err(NoteServiceError::SlugTaken(message)) => errors.add_field("slug", message),
            Err(err) => return Err(err.into()),
        }
    }

    let page = render_note_form(&state, &user, "Добавить заметку", "/add/", &form, errors)?;
    Ok(page.into_response())
}

/// GET /note/{slug}/ - note detail, author-only.
pub async fn note_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Html<String>, WebError> {
    let note = state.note_service.get(user.id, &slug).await?;

    let mut ctx = base_context(Some(&user));
    ctx.insert("note", &note);
    Ok(Html(state.templates.render("notes/detail.html", &ctx)?))
}

/// GET /edit/{slug}/ - the bound edit form, author-only.
pub async fn edit_note_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Html<String>, WebError> {
    let note = state.note_service.get(user.id, &slug).await?;

    let form = NoteForm {
        title: note.title.clone(),
        text: note.text.clone(),
        slug: note.slug.clone(),
    };
    render_note_form(
        &state,
        &user,
        "Редактировать заметку",
        &format!("/edit/{}/", slug),
        &form,
        FormErrors::default(),
    )
}

/// POST /edit/{slug}/ - apply an edit, author-only.
pub async fn update_note(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Form(form): Form<NoteForm>,
) -> Result<Response, WebError> {
    // Resolve ownership before looking at the payload, so a non-author
    // gets the same 404 a bad slug would give.
    state.note_service.get(user.id, &slug).await?;

    let mut errors = validate_presence(&form);

    if errors.is_empty() {
        match state
            .note_service
            .update(user.id, &slug, form.clone().into_input())
            .await
        {
            Ok(_) => return Ok(found("/done/")),
            Err(NoteServiceError::SlugTaken(message)) => errors.add_field("slug", message),
            Err(err) => return Err(err.into()),
        }
    }

    let page = render_note_form(
        &state,
        &user,
        "Редактировать заметку",
        &format!("/edit/{}/", slug),
        &form,
        errors,
    )?;
    Ok(page.into_response())
}

/// GET /delete/{slug}/ - the confirmation page, author-only.
pub async fn delete_note_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Html<String>, WebError> {
    let note = state.note_service.get(user.id, &slug).await?;

    let mut ctx = base_context(Some(&user));
    ctx.insert("note", &note);
    Ok(Html(state.templates.render("notes/confirm_delete.html", &ctx)?))
}

/// POST /delete/{slug}/ - delete, author-only.
pub async fn delete_note(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Response, WebError> {
    state.note_service.delete(user.id, &slug).await?;
    Ok(found("/done/"))
}

/// GET /done/ - landing page after a successful mutation.
pub async fn success_page(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Html<String>, WebError> {
    let ctx = base_context(Some(&user));
    Ok(Html(state.templates.render("notes/success.html", &ctx)?))
}

fn validate_presence(form: &NoteForm) -> FormErrors {
    let mut errors = FormErrors::default();
    if form.title.trim().is_empty() {
        errors.add_field("title", REQUIRED_FIELD);
    }
    if form.text.trim().is_empty() {
        errors.add_field("text", REQUIRED_FIELD);
    }
    errors
}

fn render_note_form(
    state: &AppState,
    user: &User,
    heading: &str,
    action: &str,
    form: &NoteForm,
    form_errors: FormErrors,
) -> Result<Html<String>, WebError> {
    let mut ctx = base_context(Some(user));
    ctx.insert("heading", heading);
    ctx.insert("form_action", action);
    ctx.insert("form_title", &form.title);
    ctx.insert("form_text", &form.text);
    ctx.insert("form_slug", &form.slug);
    ctx.insert("form_errors", &form_errors);
    Ok(Html(state.templates.render("notes/form.html", &ctx)?))
}
