//! Per-post engagement state owned by the hosting view

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use crate::engagement::action::{LikeIntent, PendingAction};
use crate::engagement::lifetime::{LifetimeHandle, ViewLifetime};
use crate::models::Post;

/// What a renderer draws for the like button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementSnapshot {
    /// Whether the current user has liked the post
    pub is_liked: bool,
    /// Like count currently shown
    pub like_count: u32,
    /// Whether a confirmation is in flight (trigger disabled)
    pub loading: bool,
}

/// The `(is_liked, like_count, current action, loading)` tuple for one post.
///
/// Only three paths may mutate the visible fields: the optimistic flip in
/// [`CardState::begin`], server reconciliation in [`CardState::reconcile`],
/// and rollback in [`CardState::rollback`]. The latter two are token-guarded:
/// a completion whose token is no longer current writes nothing.
#[derive(Debug)]
pub(crate) struct CardState {
    is_liked: bool,
    like_count: u32,
    loading: bool,
    current: Option<u64>,
    next_token: u64,
}

impl CardState {
    fn new(liked: bool, like_count: u32) -> Self {
        Self {
            is_liked: liked,
            like_count,
            loading: false,
            current: None,
            next_token: 0,
        }
    }

    /// Apply the optimistic flip and mark the new action current.
    ///
    /// Returns `None` while a confirmation is already loading: the trigger
    /// boundary rejects re-entry, it does not queue a second action.
    pub(crate) fn begin(&mut self, post_id: &str) -> Option<PendingAction> {
        if self.loading || self.current.is_some() {
            return None;
        }

        let action = PendingAction {
            post_id: post_id.to_string(),
            intent: LikeIntent::from_flip(self.is_liked),
            token: self.next_token,
            created_at: Utc::now(),
            prev_liked: self.is_liked,
            prev_count: self.like_count,
        };
        self.next_token += 1;

        self.is_liked = action.intent.target();
        self.like_count = if self.is_liked {
            self.like_count + 1
        } else {
            self.like_count.saturating_sub(1)
        };
        self.loading = true;
        self.current = Some(action.token);
        Some(action)
    }

    /// Whether `token` identifies the card's current action
    pub(crate) fn is_current(&self, token: u64) -> bool {
        self.current == Some(token)
    }

    /// Overwrite the count with the server-authoritative value.
    ///
    /// No-op (returns false) if the action has been superseded.
    pub(crate) fn reconcile(&mut self, token: u64, server_count: u32) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.like_count = server_count;
        true
    }

    /// Restore the exact pre-toggle snapshot after a failed confirmation.
    ///
    /// No-op (returns false) if the action has been superseded.
    pub(crate) fn rollback(&mut self, action: &PendingAction) -> bool {
        if !self.is_current(action.token) {
            return false;
        }
        self.is_liked = action.prev_liked;
        self.like_count = action.prev_count;
        true
    }

    /// Clear the current marker and loading flag once the action settles.
    ///
    /// Guarded like the mutations: a superseded action must not clear the
    /// newer action's markers.
    pub(crate) fn finish(&mut self, token: u64) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.current = None;
        self.loading = false;
        true
    }

    fn snapshot(&self) -> EngagementSnapshot {
        EngagementSnapshot {
            is_liked: self.is_liked,
            like_count: self.like_count,
            loading: self.loading,
        }
    }
}

/// The view-side handle for one post's like button.
///
/// Owns the state tuple and the view lifetime. The card is what a post cell
/// holds on to; [`crate::LikeController::toggle`] is fed a reference to it on
/// each gesture, and dropping the card retires the lifetime so late
/// completions are discarded.
#[derive(Debug)]
pub struct LikeCard {
    post_id: String,
    state: Arc<Mutex<CardState>>,
    lifetime: ViewLifetime,
}

impl LikeCard {
    /// Create a card from the initial server-rendered state
    pub fn new(post_id: impl Into<String>, liked: bool, like_count: u32) -> Self {
        Self {
            post_id: post_id.into(),
            state: Arc::new(Mutex::new(CardState::new(liked, like_count))),
            lifetime: ViewLifetime::new(),
        }
    }

    /// Create a card for a feed post
    pub fn for_post(post: &Post) -> Self {
        Self::new(post.post_id.clone(), post.liked, post.like_count)
    }

    /// Post this card displays
    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    /// Current renderable state
    pub fn snapshot(&self) -> EngagementSnapshot {
        self.lock().snapshot()
    }

    /// Whether the post is currently shown as liked
    pub fn is_liked(&self) -> bool {
        self.snapshot().is_liked
    }

    /// Like count currently shown
    pub fn like_count(&self) -> u32 {
        self.snapshot().like_count
    }

    /// Whether a confirmation is in flight
    pub fn is_loading(&self) -> bool {
        self.snapshot().loading
    }

    /// The view lifetime owned by this card
    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    pub(crate) fn shared_state(&self) -> Arc<Mutex<CardState>> {
        Arc::clone(&self.state)
    }

    pub(crate) fn lifetime_handle(&self) -> LifetimeHandle {
        self.lifetime.handle()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lock a shared card state, ignoring poisoning.
///
/// State is only ever touched between await points; a poisoned lock means a
/// panic elsewhere, and the last written values are still the best answer.
pub(crate) fn lock_state(state: &Arc<Mutex<CardState>>) -> std::sync::MutexGuard<'_, CardState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
