use sqlx::PgPool;

use crate::config::database::init_db_pool;
use crate::config::jwt::JwtConfig;
use crate::config::password::PasswordConfig;
use crate::config::posts::PostsConfig;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub password_config: PasswordConfig,
    pub posts_config: PostsConfig,
    pub http: reqwest::Client,
}

pub async fn init_app_state() -> AppState {
    AppState {
        db: init_db_pool().await,
        jwt_config: JwtConfig::from_env(),
        password_config: PasswordConfig::from_env(),
        posts_config: PostsConfig::from_env(),
        http: reqwest::Client::new(),
    }
}
