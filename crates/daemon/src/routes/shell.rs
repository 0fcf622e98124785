//! Authenticated admin shell pages
//!
//! Every page is the same document; the browser bundle mounts the activity
//! monitor around it and renders the section client-side.

use super::escape_html;
use axum::Router;
use axum::http::Uri;
use axum::response::Html;
use axum::routing::get;
use gnt_http::Session;

/// Sections of the admin shell
pub const SHELL_PATHS: &[&str] = &[
    "/",
    "/job-posts",
    "/job-categories",
    "/blog",
    "/plan",
    "/subscriber",
    "/payment-details",
    "/send-email",
    "/elevator-pitch",
];

pub fn router() -> Router {
    SHELL_PATHS
        .iter()
        .fold(Router::new(), |router, path| router.route(path, get(shell_page)))
}

pub async fn shell_page(session: Session, uri: Uri) -> Html<String> {
    let user = session.name.as_deref().unwrap_or(&session.subject);
    let nav = SHELL_PATHS
        .iter()
        .map(|path| format!(r#"<a href="{path}">{path}</a>"#))
        .collect::<Vec<_>>()
        .join(" ");

    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>GNT Admin</title></head>
<body>
<nav>{nav}</nav>
<main id="app" data-section="{section}" data-user="{user}"></main>
<script type="module">import init from "/assets/gnt_frontend.js"; init();</script>
</body>
</html>"#,
        section = escape_html(uri.path()),
        user = escape_html(user),
    ))
}
