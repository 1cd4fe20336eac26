use std::env;

#[derive(Clone, Debug)]
pub struct PostsConfig {
    /// URL of the external posts feed to mirror.
    pub source_url: String,
    /// How many posts from the head of the feed are persisted per sync.
    pub fetch_limit: usize,
}

impl PostsConfig {
    pub fn from_env() -> Self {
        Self {
            source_url: env::var("POSTS_SOURCE_URL")
                .unwrap_or_else(|_| "https://jsonplaceholder.typicode.com/posts".to_string()),
            fetch_limit: env::var("POSTS_FETCH_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        }
    }
}
