//! Pending like/unlike actions and their staleness tokens

use chrono::{DateTime, Utc};

/// What the user intended the post's like state to become
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeIntent {
    /// The post should end up liked
    Like,
    /// The post should end up not liked
    Unlike,
}

impl LikeIntent {
    /// Intent implied by flipping the current liked state
    pub fn from_flip(currently_liked: bool) -> Self {
        if currently_liked { Self::Unlike } else { Self::Like }
    }

    /// The liked state this intent drives toward
    pub fn target(&self) -> bool {
        matches!(self, Self::Like)
    }

    /// Human-readable name (for logs)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Unlike => "unlike",
        }
    }
}

/// One queued or in-flight toggle for a post.
///
/// Carries a monotonic `token` issued by the owning card: a completion is
/// applied only while its token is still the card's current one. Rapid
/// double-toggles on the same post produce distinct tokens, so a match means
/// same post *and* same intended state, never just the former. The pre-toggle
/// snapshot travels with the action so a failed confirmation can restore the
/// exact values the optimistic flip replaced.
#[derive(Debug, Clone)]
pub struct PendingAction {
    /// Post this action targets
    pub post_id: String,
    /// Intended final state
    pub intent: LikeIntent,
    /// Monotonic per-card ordering token
    pub token: u64,
    /// When the user triggered the toggle
    pub created_at: DateTime<Utc>,
    /// Liked state before the optimistic flip
    pub prev_liked: bool,
    /// Like count before the optimistic flip
    pub prev_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_intent() {
        assert_eq!(LikeIntent::from_flip(false), LikeIntent::Like);
        assert_eq!(LikeIntent::from_flip(true), LikeIntent::Unlike);
        assert!(LikeIntent::Like.target());
        assert!(!LikeIntent::Unlike.target());
    }
}
