//! Sign-in page. Public; the idle gate never intercepts it.

use super::escape_html;
use axum::extract::Query;
use axum::response::Html;
use serde::Deserialize;

pub const INACTIVE_NOTICE: &str = "You were signed out after 30 minutes of inactivity.";

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub reason: Option<String>,
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

impl LoginQuery {
    /// Post-login target. Only same-origin paths are honoured.
    pub fn callback(&self) -> &str {
        self.callback_url
            .as_deref()
            .filter(|target| target.starts_with('/') && !target.starts_with("//"))
            .unwrap_or("/")
    }

    pub fn inactive(&self) -> bool {
        self.reason.as_deref() == Some("inactive")
    }
}

pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    let notice = if query.inactive() {
        format!(r#"<p class="notice" role="status">{INACTIVE_NOTICE}</p>"#)
    } else {
        String::new()
    };

    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Sign in</title></head>
<body>
<main>
<h1>Sign in</h1>
{notice}
<form method="post" action="/api/auth/callback/credentials">
<input type="hidden" name="callbackUrl" value="{callback}">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Sign in</button>
</form>
<a href="/forgot-password">Forgot password?</a>
</main>
</body>
</html>"#,
        callback = escape_html(query.callback()),
    ))
}
