use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::state::AppState;

use super::controller::{
    change_user_email, change_user_password, delete_user, get_all_users, get_user_by_email,
    get_user_by_id,
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/get-by-email", get(get_user_by_email))
        .route("/get-by-id/{id}", get(get_user_by_id))
        .route("/get-all", get(get_all_users))
        .route("/change-email", put(change_user_email))
        .route("/change-password", put(change_user_password))
        .route("/delete", delete(delete_user))
}
