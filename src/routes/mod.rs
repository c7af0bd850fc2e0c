pub mod contact;
pub mod engagement;
pub mod gallery;
pub mod home;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::storage::PUBLIC_PREFIX;

/// The full application router.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(home::index))
        .route("/album/{album}", get(home::album))
        .route("/students", get(home::students))
        .merge(gallery::router())
        .merge(engagement::router())
        .merge(contact::router());

    if state.serves_local_uploads() {
        app = app.nest_service(PUBLIC_PREFIX, ServeDir::new(state.config.uploads_path()));
    }

    app.layer(DefaultBodyLimit::max(state.config.max_upload_bytes()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
