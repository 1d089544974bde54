//! Template rendering
//!
//! All templates are embedded in the binary and compiled into one Tera
//! environment at startup, so a deployed binary has no template files to
//! lose track of.

use anyhow::{Context as AnyhowContext, Result};
use tera::{Context, Tera};

use crate::models::User;

/// The compiled template environment.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Compile the embedded templates.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", include_str!("../../templates/base.html")),
            ("news/home.html", include_str!("../../templates/news/home.html")),
            ("news/detail.html", include_str!("../../templates/news/detail.html")),
            (
                "news/edit_comment.html",
                include_str!("../../templates/news/edit_comment.html"),
            ),
            (
                "news/delete_comment.html",
                include_str!("../../templates/news/delete_comment.html"),
            ),
            ("notes/list.html", include_str!("../../templates/notes/list.html")),
            ("notes/form.html", include_str!("../../templates/notes/form.html")),
            ("notes/detail.html", include_str!("../../templates/notes/detail.html")),
            (
                "notes/confirm_delete.html",
                include_str!("../../templates/notes/confirm_delete.html"),
            ),
            ("notes/success.html", include_str!("../../templates/notes/success.html")),
            ("auth/login.html", include_str!("../../templates/auth/login.html")),
            ("auth/signup.html", include_str!("../../templates/auth/signup.html")),
            ("auth/logout.html", include_str!("../../templates/auth/logout.html")),
        ])
        .context("Failed to compile templates")?;

        Ok(Self { tera })
    }

    /// Render a template with the given context.
    pub fn render(&self, name: &str, ctx: &Context) -> Result<String> {
        self.tera
            .render(name, ctx)
            .with_context(|| format!("Failed to render template {}", name))
    }
}

/// Context pre-populated with what every page needs.
///
/// `current_user` is always present (null for anonymous viewers) because
/// the base template's navigation branches on it.
pub fn base_context(user: Option<&User>) -> Context {
    let mut ctx = Context::new();
    ctx.insert("current_user", &user);
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> Templates {
        Templates::new().expect("templates should compile")
    }

    #[test]
    fn test_all_templates_compile() {
        templates();
    }

    #[test]
    fn test_anonymous_base_context_renders() {
        let mut ctx = base_context(None);
        ctx.insert("news_list", &Vec::<crate::models::News>::new());
        let html = templates().render("news/home.html", &ctx).expect("render");
        assert!(html.contains("Войти"));
        assert!(!html.contains("Выйти"));
    }

    #[test]
    fn test_authenticated_base_context_shows_username() {
        let mut user = User::new("reader", "hash");
        user.id = 1;
        let mut ctx = base_context(Some(&user));
        ctx.insert("news_list", &Vec::<crate::models::News>::new());
        let html = templates().render("news/home.html", &ctx).expect("render");
        assert!(html.contains("reader"));
        assert!(html.contains("Выйти"));
    }
}
