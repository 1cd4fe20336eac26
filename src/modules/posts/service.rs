use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::config::posts::PostsConfig;
use crate::utils::errors::AppError;

use super::model::{ExternalPost, Post};

pub struct PostsService;

impl PostsService {
    /// Fetches the external feed and mirrors its head into the database.
    /// Posts whose id is already present are skipped, so re-syncing is
    /// idempotent. Returns the fetched slice regardless of how many rows
    /// were actually inserted.
    #[instrument(skip(db, http, config))]
    pub async fn sync_posts(
        db: &PgPool,
        http: &reqwest::Client,
        config: &PostsConfig,
    ) -> Result<Vec<Post>, AppError> {
        let mut fetched = http
            .get(&config.source_url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<ExternalPost>>()
            .await?;
        fetched.truncate(config.fetch_limit);

        let mut posts = Vec::with_capacity(fetched.len());
        for post in fetched {
            let existing = sqlx::query_as::<_, Post>(
                "SELECT id, user_id, title, body FROM posts WHERE id = $1",
            )
            .bind(post.id)
            .fetch_optional(db)
            .await?;

            if let Some(existing) = existing {
                warn!(post_id = post.id, "Post already exists, skipping");
                posts.push(existing);
                continue;
            }

            let saved = sqlx::query_as::<_, Post>(
                "INSERT INTO posts (id, user_id, title, body)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, user_id, title, body",
            )
            .bind(post.id)
            .bind(post.user_id)
            .bind(&post.title)
            .bind(&post.body)
            .fetch_one(db)
            .await?;

            info!(post_id = saved.id, "Post saved to database");
            posts.push(saved);
        }

        info!(count = posts.len(), "Posts synced from external feed");
        Ok(posts)
    }

    #[instrument(skip(db))]
    pub async fn get_posts(db: &PgPool) -> Result<Vec<Post>, AppError> {
        let posts =
            sqlx::query_as::<_, Post>("SELECT id, user_id, title, body FROM posts ORDER BY id")
                .fetch_all(db)
                .await?;

        Ok(posts)
    }

    #[instrument(skip(db))]
    pub async fn delete_posts(db: &PgPool) -> Result<(), AppError> {
        sqlx::query("DELETE FROM posts").execute(db).await?;
        info!("Posts deleted from database");
        Ok(())
    }
}
