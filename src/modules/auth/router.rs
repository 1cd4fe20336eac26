use axum::{
    Router,
    routing::{delete, post},
};

use crate::state::AppState;

use super::controller::{login_user, logout_user, refresh_access_token, register_user};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/logout", delete(logout_user))
        .route("/refresh", post(refresh_access_token))
}
