//! Demo feed session against a simulated backend
//!
//! Runs the like engine end to end without a network: a latency- and
//! failure-simulating [`PostsApi`], a handful of seeded posts, and a burst of
//! toggle gestures per post. Useful for watching optimistic flips, count
//! reconciliation, and rollback happen in the log.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use tokio::time::sleep;

use crate::api::PostsApi;
use crate::config::Config;
use crate::engagement::{LikeCard, LikeController};
use crate::models::Post;

/// In-memory backend with fixed latency and a deterministic failure cadence
pub struct SimulatedApi {
    latency: Duration,
    fail_every: usize,
    state: Mutex<SimState>,
}

#[derive(Default)]
struct SimState {
    calls: usize,
    counts: HashMap<String, u32>,
    liked: HashSet<String>,
}

impl SimulatedApi {
    /// Create a backend seeded with the posts' starting counts
    pub fn new(posts: &[Post], latency_ms: u64, fail_every: usize) -> Self {
        let counts = posts
            .iter()
            .map(|p| (p.post_id.clone(), p.like_count))
            .collect();
        Self {
            latency: Duration::from_millis(latency_ms),
            fail_every,
            state: Mutex::new(SimState {
                calls: 0,
                counts,
                liked: HashSet::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Counts this call and reports whether the cadence says it fails
    fn next_call_fails(&self) -> bool {
        let mut state = self.lock();
        state.calls += 1;
        self.fail_every > 0 && state.calls % self.fail_every == 0
    }
}

#[async_trait]
impl PostsApi for SimulatedApi {
    async fn like(&self, post_id: &str) -> Result<()> {
        sleep(self.latency).await;
        if self.next_call_fails() {
            bail!("simulated backend error on like");
        }
        let mut state = self.lock();
        if state.liked.insert(post_id.to_string()) {
            *state.counts.entry(post_id.to_string()).or_insert(0) += 1;
        }
        Ok(())
    }

    async fn unlike(&self, post_id: &str) -> Result<()> {
        sleep(self.latency).await;
        if self.next_call_fails() {
            bail!("simulated backend error on unlike");
        }
        let mut state = self.lock();
        if state.liked.remove(post_id) {
            let count = state.counts.entry(post_id.to_string()).or_insert(0);
            *count = count.saturating_sub(1);
        }
        Ok(())
    }

    async fn like_count(&self, post_id: &str) -> Result<u32> {
        sleep(self.latency).await;
        if self.next_call_fails() {
            bail!("simulated backend error on count");
        }
        Ok(self.lock().counts.get(post_id).copied().unwrap_or(0))
    }
}

/// Seed a small feed of sample posts
pub fn seed_posts(count: usize) -> Vec<Post> {
    let authors = [
        ("mai.tran", "Mai Trần"),
        ("quan.le", "Quân Lê"),
        ("hana", "Hana"),
        ("felix", "Felix"),
    ];
    let contents = [
        "Sunrise over the bay this morning. No filter needed.",
        "Finally finished the trail loop — legs are done, views were worth it.",
        "New coffee spot downtown. The cold brew is dangerous.",
        "Weekend reading pile is officially a tower.",
    ];

    (0..count)
        .map(|i| {
            let (handle, name) = authors[i % authors.len()];
            let mut post = Post::new(&format!("post-{}", i + 1));
            post.author_handle = handle.to_string();
            post.author_name = name.to_string();
            post.content = contents[i % contents.len()].to_string();
            post.created_at = Utc::now() - chrono::Duration::minutes((i as i64 + 1) * 17);
            post.like_count = (i as u32 + 1) * 3;
            post
        })
        .collect()
}

/// Run a scripted feed session: toggle every card a few times, then tear one
/// view down mid-flight to show late completions being discarded.
pub async fn run(config: &Config) -> Result<()> {
    let posts = seed_posts(config.post_count.max(1));
    let api = Arc::new(SimulatedApi::new(
        &posts,
        config.latency_ms,
        config.fail_every,
    ));
    let controller = LikeController::new(Arc::clone(&api));

    let cards: Vec<LikeCard> = posts.iter().map(LikeCard::for_post).collect();

    let cadence = if config.fail_every == 0 {
        "no backend failures".to_string()
    } else {
        format!("every {} backend calls fail", config.fail_every)
    };
    println!(
        "kudos demo: {} posts, {}ms latency, {}\n",
        posts.len(),
        config.latency_ms,
        cadence
    );
    for post in &posts {
        println!(
            "  [{}] @{} ({}) — {}",
            post.post_id,
            post.author_handle,
            post.relative_time(),
            post.preview(48)
        );
    }
    println!();

    for round in 1..=config.toggle_rounds.max(1) {
        tracing::info!(round, "toggle round");
        let mut settlements = Vec::new();
        for card in &cards {
            let before = card.snapshot();
            let outcome = controller.toggle(card);
            let after = card.snapshot();
            println!(
                "round {round}: {} {} -> liked={} count={} (was liked={} count={})",
                card.post_id(),
                if outcome.is_accepted() { "toggled" } else { "busy" },
                after.is_liked,
                after.like_count,
                before.is_liked,
                before.like_count,
            );
            settlements.push(outcome);
        }
        for settlement in settlements {
            settlement.settled().await;
        }
        for card in &cards {
            let snap = card.snapshot();
            println!(
                "round {round}: {} settled -> liked={} count={}",
                card.post_id(),
                snap.is_liked,
                snap.like_count
            );
        }
        println!();
    }

    // Teardown demo: retire the first card while its confirmation is queued.
    if let Some(card) = cards.first() {
        let outcome = controller.toggle(card);
        card.lifetime().retire();
        outcome.settled().await;
        let snap = card.snapshot();
        println!(
            "teardown: {} retired mid-flight -> liked={} count={} (completion discarded)",
            card.post_id(),
            snap.is_liked,
            snap.like_count
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_api_tracks_server_counts() {
        let posts = seed_posts(1);
        let api = SimulatedApi::new(&posts, 0, 0);
        let id = &posts[0].post_id;
        let before = api.like_count(id).await.unwrap();

        api.like(id).await.unwrap();
        assert_eq!(api.like_count(id).await.unwrap(), before + 1);
        // Duplicate like does not double-count.
        api.like(id).await.unwrap();
        assert_eq!(api.like_count(id).await.unwrap(), before + 1);

        api.unlike(id).await.unwrap();
        assert_eq!(api.like_count(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_failure_cadence() {
        let posts = seed_posts(1);
        let api = SimulatedApi::new(&posts, 0, 2);
        let id = &posts[0].post_id;
        assert!(api.like(id).await.is_ok());
        assert!(api.like(id).await.is_err());
        assert!(api.like(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_demo_session_runs() {
        let config = Config {
            post_count: 2,
            latency_ms: 1,
            fail_every: 0,
            toggle_rounds: 1,
        };
        run(&config).await.unwrap();
    }
}
