//! Embedded HTML pages.

use axum::response::Html;

const LOGIN_PAGE: &str = include_str!("../../../static/login.html");
const CHAT_PAGE: &str = include_str!("../../../static/chat.html");

/// Name and room selection page
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

/// Chat page (redirects to `/` when no identity is stored in the browser)
pub async fn chat_page() -> Html<&'static str> {
    Html(CHAT_PAGE)
}
