//! HTML templates for the server-rendered board.
//!
//! Templates are embedded at compile time using `include_str!` and filled in
//! with plain `{{placeholder}}` substitution.

use sea_orm::Iterable;
use std::fmt::Display;

/// Page chrome with navigation and the error banner.
pub const LAYOUT_TEMPLATE: &str = include_str!("templates/layout.html");

/// Dashboard: per-status counts, recent tasks and the team.
pub const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

/// Task table with inline status/priority forms and the create form.
pub const TASKS_TEMPLATE: &str = include_str!("templates/tasks.html");

/// User table and the create form.
pub const USERS_TEMPLATE: &str = include_str!("templates/users.html");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Home,
    Tasks,
    Users,
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Replaces each `{{key}}` in `template` with its value in one pass.
///
/// Inserted values are never rescanned, so user text that looks like a
/// placeholder stays literal. Unknown keys are left as written.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Wraps page content in the layout. `error` is shown escaped above the content.
pub fn render_page(title: &str, nav: Nav, error: Option<&str>, content: &str) -> String {
    let active = |page: Nav| if page == nav { "active" } else { "" };
    let error_banner = error
        .filter(|message| !message.trim().is_empty())
        .map(|message| format!(r#"<div class="error">{}</div>"#, html_escape(message)))
        .unwrap_or_default();

    fill(
        LAYOUT_TEMPLATE,
        &[
            ("title", html_escape(title).as_str()),
            ("nav_home", active(Nav::Home)),
            ("nav_tasks", active(Nav::Tasks)),
            ("nav_users", active(Nav::Users)),
            ("error_banner", error_banner.as_str()),
            ("content", content),
        ],
    )
}

/// `<option>` list for every variant of an enum column, marking `selected`.
pub fn enum_options<E>(selected: Option<E>) -> String
where
    E: Iterable + Display + PartialEq + Copy,
{
    E::iter()
        .map(|variant| {
            let value = variant.to_string();
            let marker = if Some(variant) == selected { " selected" } else { "" };
            format!(
                r#"<option value="{value}"{marker}>{}</option>"#,
                humanize(&value)
            )
        })
        .collect()
}

/// `<option>` list from `(id, label)` pairs.
pub fn id_options<'a>(items: impl IntoIterator<Item = (i32, &'a str)>) -> String {
    items
        .into_iter()
        .map(|(id, label)| format!(r#"<option value="{id}">{}</option>"#, html_escape(label)))
        .collect()
}

/// `IN_PROGRESS` -> `In progress`.
pub fn humanize(wire: &str) -> String {
    let lower = wire.replace('_', " ").to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{TaskPriority, TaskStatus};

    #[test]
    fn html_escape_neutralises_markup() {
        assert_eq!(
            html_escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn humanize_wire_values() {
        assert_eq!(humanize("IN_PROGRESS"), "In progress");
        assert_eq!(humanize("TO_DO"), "To do");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn enum_options_marks_selected_variant() {
        let html = enum_options(Some(TaskStatus::Done));
        assert!(html.contains(r#"<option value="DONE" selected>Done</option>"#));
        assert!(html.contains(r#"<option value="PENDING">Pending</option>"#));
        assert_eq!(html.matches("<option").count(), 4);

        let none_selected = enum_options::<TaskPriority>(None);
        assert!(!none_selected.contains("selected"));
    }

    #[test]
    fn layout_highlights_nav_and_escapes_error() {
        let page = render_page("Tasks", Nav::Tasks, Some("<bad>"), "<p>body</p>");
        assert!(page.contains(r#"<a href="/tasks" class="active">"#));
        assert!(page.contains(r#"<a href="/users" class="">"#));
        assert!(page.contains(r#"<div class="error">&lt;bad&gt;</div>"#));
        assert!(page.contains("<p>body</p>"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn fill_does_not_expand_placeholders_inside_values() {
        let html = fill(
            "<h1>{{title}}</h1><p>{{team}}</p>{{unknown}}",
            &[("title", "{{team}}"), ("team", "<span>crew</span>")],
        );
        assert_eq!(html, "<h1>{{team}}</h1><p><span>crew</span></p>{{unknown}}");
        assert_eq!(fill("open {{brace", &[("brace", "x")]), "open {{brace");
    }

    #[test]
    fn error_text_cannot_inject_page_content() {
        let page = render_page("Tasks", Nav::Tasks, Some("{{content}}"), "<p>body</p>");
        assert_eq!(page.matches("<p>body</p>").count(), 1);
        assert!(page.contains(r#"<div class="error">{{content}}</div>"#));
    }

    #[test]
    fn blank_error_renders_no_banner() {
        let page = render_page("Users", Nav::Users, Some("  "), "");
        assert!(!page.contains(r#"class="error""#));
    }
}
