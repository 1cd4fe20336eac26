use axum::{
    Router,
    routing::get,
};

use crate::state::AppState;

use super::controller::{delete_posts, get_posts, sync_posts};

pub fn init_posts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_posts).delete(delete_posts))
        .route("/external", get(sync_posts))
}
