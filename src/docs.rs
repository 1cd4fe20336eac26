use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, LogoutResponse, RefreshRequest, RefreshResponse, RegisterRequest,
};
use crate::modules::posts::model::{Post, PostsDeletedResponse, PostsListResponse};
use crate::modules::users::model::{
    ChangeEmailRequest, ChangePasswordRequest, MessageResponse, User, UsersListResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::refresh_access_token,
        crate::modules::users::controller::get_user_by_email,
        crate::modules::users::controller::get_user_by_id,
        crate::modules::users::controller::get_all_users,
        crate::modules::users::controller::change_user_email,
        crate::modules::users::controller::change_user_password,
        crate::modules::users::controller::delete_user,
        crate::modules::posts::controller::sync_posts,
        crate::modules::posts::controller::get_posts,
        crate::modules::posts::controller::delete_posts,
    ),
    components(
        schemas(
            User,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            LogoutResponse,
            RefreshRequest,
            RefreshResponse,
            ChangeEmailRequest,
            ChangePasswordRequest,
            UsersListResponse,
            MessageResponse,
            Post,
            PostsListResponse,
            PostsDeletedResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration, login and session management"),
        (name = "Users", description = "User management endpoints"),
        (name = "Posts", description = "External posts mirror"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
