//! Feed post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A feed post that can be liked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Internal ID
    pub id: Uuid,
    /// Backend post identifier (the likeable-entity id)
    pub post_id: String,
    /// Author handle
    pub author_handle: String,
    /// Author display name
    pub author_name: String,
    /// Post content
    pub content: String,
    /// When the post was created
    pub created_at: DateTime<Utc>,
    /// Number of likes
    pub like_count: u32,
    /// Whether the current user has liked this post
    pub liked: bool,
}

impl Post {
    /// Create a post with empty author/content fields
    pub fn new(post_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id: post_id.to_string(),
            author_handle: String::new(),
            author_name: String::new(),
            content: String::new(),
            created_at: Utc::now(),
            like_count: 0,
            liked: false,
        }
    }

    /// Get a short preview of the content (for list display)
    pub fn preview(&self, max_len: usize) -> String {
        let content = self.content.replace('\n', " ");
        if content.len() <= max_len {
            content
        } else {
            format!("{}...", &content[..max_len.saturating_sub(3)])
        }
    }

    /// Get relative time string (e.g., "5m", "2h", "3d")
    pub fn relative_time(&self) -> String {
        let now = Utc::now();
        let duration = now.signed_duration_since(self.created_at);

        if duration.num_seconds() < 60 {
            format!("{}s", duration.num_seconds())
        } else if duration.num_minutes() < 60 {
            format!("{}m", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h", duration.num_hours())
        } else if duration.num_days() < 7 {
            format!("{}d", duration.num_days())
        } else {
            self.created_at.format("%b %d").to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates() {
        let mut post = Post::new("p1");
        post.content = "a\nlong line of text that keeps going".to_string();
        assert_eq!(post.preview(10), "a long ...");
        assert_eq!(post.preview(100), "a long line of text that keeps going");
    }
}
