//! Static HTML pages.
//!
//! Both pages are self-contained (inline CSS and JS) and talk to the
//! `/api` routes with the key kept in `localStorage`.

use axum::response::Html;

const LOGIN_HTML: &str = include_str!("../assets/login.html");
const ADMIN_HTML: &str = include_str!("../assets/admin.html");

/// `GET /`
pub async fn login() -> Html<&'static str> {
    Html(LOGIN_HTML)
}

/// `GET /admin`
pub async fn admin() -> Html<&'static str> {
    Html(ADMIN_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_page_uses_every_endpoint() {
        for endpoint in [
            "/api/list-fonts",
            "/api/upload-font",
            "/api/delete-font",
            "/api/edit-font",
        ] {
            assert!(ADMIN_HTML.contains(endpoint), "admin page misses {endpoint}");
        }
    }

    #[test]
    fn test_pages_share_storage_key() {
        assert!(LOGIN_HTML.contains("fontPanelApiKey"));
        assert!(ADMIN_HTML.contains("fontPanelApiKey"));
    }
}
