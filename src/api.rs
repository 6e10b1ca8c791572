//! Posts API collaborator contract
//!
//! The engine never talks to a backend directly; it is handed something
//! implementing [`PostsApi`]. Implementations live with the hosting app
//! (HTTP, BaaS SDK, whatever) — a simulated in-memory one ships in
//! [`crate::demo`] and the tests use gated doubles.

use anyhow::Result;
use async_trait::async_trait;

/// Like/unlike calls plus the authoritative-count read used for
/// reconciliation.
///
/// The backend is expected to tolerate rapid like/unlike repetition on the
/// same post (duplicate-like protection is its job, not the client's).
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// Record a like for the post
    async fn like(&self, post_id: &str) -> Result<()>;

    /// Remove the user's like from the post
    async fn unlike(&self, post_id: &str) -> Result<()>;

    /// Fetch the post's current like count from the server
    async fn like_count(&self, post_id: &str) -> Result<u32>;
}
