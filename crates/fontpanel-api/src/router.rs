//! Route table.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Router, middleware};
use fontpanel_core::{AppState, ConfigProvider};
use tower_http::trace::TraceLayer;

use crate::{auth, handlers, pages};

/// Default cap on upload request bodies (32 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Knobs for [`router`].
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    /// Largest accepted `/api/upload-font` body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Build the panel application.
pub fn router<C: ConfigProvider>(state: AppState<C>, options: RouterOptions) -> Router {
    let api = Router::new()
        .route("/list-fonts", get(handlers::list_fonts::<C>))
        .route(
            "/upload-font",
            post(handlers::upload_font::<C>)
                .layer(DefaultBodyLimit::max(options.max_upload_bytes)),
        )
        .route("/delete-font", post(handlers::delete_font::<C>))
        .route("/edit-font", post(handlers::edit_font::<C>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key::<C>,
        ));

    Router::new()
        .route("/", get(pages::login))
        .route("/admin", get(pages::admin))
        .route("/health", get(handlers::health::<C>))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
