//! Optimistic like-toggle controller
//!
//! `toggle` flips the card's state before any network round trip, then hands
//! the confirmation to the per-post lane. When the confirmation settles the
//! outcome is applied only if the action is still the card's current one and
//! the view is still mounted; otherwise the completion is discarded and the
//! server is left to its own (already correct) state.

use std::sync::{Arc, Mutex};

use crate::api::PostsApi;
use crate::engagement::action::{LikeIntent, PendingAction};
use crate::engagement::card::{CardState, LikeCard, lock_state};
use crate::engagement::lifetime::LifetimeHandle;
use crate::engagement::sequencer::{ActionSequencer, Completion};
use crate::notify::{LogNotifier, Notifier};

/// Message shown when a like/unlike could not be confirmed
pub const TOGGLE_FAILED_MESSAGE: &str = "Couldn't update your like. Please try again.";

/// Result of a toggle gesture
#[derive(Debug)]
pub enum ToggleOutcome {
    /// The flip was applied and a confirmation queued
    Accepted(Completion),
    /// A confirmation for this card is still loading; the gesture is a no-op
    AlreadyPending,
}

impl ToggleOutcome {
    /// Whether the gesture was accepted
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Wait for the queued confirmation to settle (immediately resolved for
    /// a rejected gesture)
    pub async fn settled(self) {
        if let Self::Accepted(completion) = self {
            completion.settled().await;
        }
    }
}

/// Drives optimistic like toggles for any number of cards.
///
/// One controller is shared across a feed; per-post ordering comes from its
/// [`ActionSequencer`], per-post state lives in each [`LikeCard`].
pub struct LikeController<A, N = LogNotifier> {
    api: Arc<A>,
    notifier: Arc<N>,
    sequencer: ActionSequencer,
}

impl<A: PostsApi + 'static> LikeController<A> {
    /// Create a controller that reports rollbacks through the log
    pub fn new(api: Arc<A>) -> Self {
        Self::with_notifier(api, Arc::new(LogNotifier))
    }
}

impl<A: PostsApi + 'static, N: Notifier + 'static> LikeController<A, N> {
    /// Create a controller with a custom notification surface
    pub fn with_notifier(api: Arc<A>, notifier: Arc<N>) -> Self {
        Self {
            api,
            notifier,
            sequencer: ActionSequencer::new(),
        }
    }

    /// Handle a like-button gesture on `card`.
    ///
    /// Applies the optimistic flip synchronously (the caller can re-render
    /// right away), then queues the network confirmation behind whatever is
    /// already pending for that post. While a confirmation is loading the
    /// gesture is rejected as a no-op. Never fails from the caller's point
    /// of view: confirmation errors are handled inside the queued unit.
    pub fn toggle(&self, card: &LikeCard) -> ToggleOutcome {
        let state = card.shared_state();
        let Some(action) = lock_state(&state).begin(card.post_id()) else {
            tracing::debug!(post_id = %card.post_id(), "toggle ignored, confirmation in flight");
            return ToggleOutcome::AlreadyPending;
        };

        tracing::debug!(
            post_id = %action.post_id,
            intent = action.intent.name(),
            token = action.token,
            "optimistic flip applied"
        );

        let completion = self.sequencer.enqueue(
            card.post_id(),
            confirm(
                Arc::clone(&self.api),
                Arc::clone(&self.notifier),
                state,
                card.lifetime_handle(),
                action,
            ),
        );
        ToggleOutcome::Accepted(completion)
    }

    /// Number of posts with a confirmation lane
    pub fn lane_count(&self) -> usize {
        self.sequencer.lane_count()
    }
}

/// One confirmation unit: toggle call, count reconciliation, rollback.
///
/// Runs inside the post's lane. Every state write is double-guarded: the
/// card must still consider this action current (token match) and the view
/// must still be alive. Errors never escape this function.
async fn confirm<A: PostsApi, N: Notifier>(
    api: Arc<A>,
    notifier: Arc<N>,
    state: Arc<Mutex<CardState>>,
    lifetime: LifetimeHandle,
    action: PendingAction,
) {
    let confirmed = match action.intent {
        LikeIntent::Like => api.like(&action.post_id).await,
        LikeIntent::Unlike => api.unlike(&action.post_id).await,
    };

    let settled = match confirmed {
        Ok(()) => reconcile(&*api, &state, &lifetime, &action).await,
        Err(error) => Err(error),
    };

    if let Err(error) = settled {
        apply_rollback(&*notifier, &state, &lifetime, &action, &error);
    }

    // Loading clears only if this action is still the current one and the
    // view can still observe it; a superseded action must not touch the
    // newer action's markers.
    if lifetime.is_alive() {
        lock_state(&state).finish(action.token);
    }
}

/// Pull the authoritative count and overwrite the optimistic guess.
///
/// Skipped entirely once the action is stale or the view is gone; the
/// like/unlike already landed server-side and nothing client-side wants the
/// answer anymore.
async fn reconcile<A: PostsApi + ?Sized>(
    api: &A,
    state: &Arc<Mutex<CardState>>,
    lifetime: &LifetimeHandle,
    action: &PendingAction,
) -> anyhow::Result<()> {
    let still_wanted = lifetime.is_alive() && lock_state(state).is_current(action.token);
    if !still_wanted {
        tracing::debug!(
            post_id = %action.post_id,
            token = action.token,
            "stale confirmation discarded"
        );
        return Ok(());
    }

    let count = api.like_count(&action.post_id).await?;

    // Re-check: the fetch suspended, the world may have moved on.
    if lifetime.is_alive() && lock_state(state).reconcile(action.token, count) {
        tracing::debug!(
            post_id = %action.post_id,
            like_count = count,
            "count reconciled from server"
        );
    }
    Ok(())
}

/// Restore the pre-toggle snapshot and tell the user, once, that the
/// gesture did not stick.
fn apply_rollback<N: Notifier + ?Sized>(
    notifier: &N,
    state: &Arc<Mutex<CardState>>,
    lifetime: &LifetimeHandle,
    action: &PendingAction,
    error: &anyhow::Error,
) {
    if !lifetime.is_alive() {
        tracing::debug!(post_id = %action.post_id, "failure after teardown, discarded");
        return;
    }
    if lock_state(state).rollback(action) {
        tracing::warn!(
            post_id = %action.post_id,
            intent = action.intent.name(),
            %error,
            "confirmation failed, rolled back"
        );
        notifier.error(TOGGLE_FAILED_MESSAGE);
    } else {
        tracing::debug!(post_id = %action.post_id, "stale failure discarded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    /// Scripted backend double. Calls are logged in order; each network call
    /// optionally waits on a gate the test releases.
    struct FakeApi {
        calls: Mutex<Vec<String>>,
        toggle_fails: bool,
        count_fails: bool,
        server_count: u32,
        gate: Option<Semaphore>,
    }

    impl FakeApi {
        fn ok(server_count: u32) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                toggle_fails: false,
                count_fails: false,
                server_count,
                gate: None,
            }
        }

        fn failing_toggle() -> Self {
            Self {
                toggle_fails: true,
                ..Self::ok(0)
            }
        }

        fn failing_count() -> Self {
            Self {
                count_fails: true,
                ..Self::ok(0)
            }
        }

        fn gated(server_count: u32) -> Self {
            Self {
                gate: Some(Semaphore::new(0)),
                ..Self::ok(server_count)
            }
        }

        fn release_one(&self) {
            if let Some(gate) = &self.gate {
                gate.add_permits(1);
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        async fn pass_gate(&self) {
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
        }
    }

    #[async_trait]
    impl PostsApi for FakeApi {
        async fn like(&self, post_id: &str) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(format!("like {post_id}"));
            self.pass_gate().await;
            if self.toggle_fails {
                bail!("like rejected");
            }
            Ok(())
        }

        async fn unlike(&self, post_id: &str) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(format!("unlike {post_id}"));
            self.pass_gate().await;
            if self.toggle_fails {
                bail!("unlike rejected");
            }
            Ok(())
        }

        async fn like_count(&self, post_id: &str) -> anyhow::Result<u32> {
            self.calls.lock().unwrap().push(format!("count {post_id}"));
            if self.count_fails {
                bail!("count unavailable");
            }
            Ok(self.server_count)
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        fired: AtomicUsize,
    }

    impl Notifier for CountingNotifier {
        fn error(&self, _message: &str) {
            self.fired.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_success_reconciles_to_server_count() {
        let api = Arc::new(FakeApi::ok(15));
        let controller = LikeController::new(Arc::clone(&api));
        let card = LikeCard::new("p1", false, 10);

        let outcome = controller.toggle(&card);
        // Optimistic flip is visible before any network settling.
        let snap = card.snapshot();
        assert!(snap.is_liked);
        assert_eq!(snap.like_count, 11);
        assert!(snap.loading);

        outcome.settled().await;
        let snap = card.snapshot();
        assert!(snap.is_liked);
        assert_eq!(snap.like_count, 15);
        assert!(!snap.loading);
        assert_eq!(api.calls(), vec!["like p1", "count p1"]);
    }

    #[tokio::test]
    async fn test_failed_unlike_rolls_back_and_notifies_once() {
        let api = Arc::new(FakeApi::failing_toggle());
        let notifier = Arc::new(CountingNotifier::default());
        let controller = LikeController::with_notifier(Arc::clone(&api), Arc::clone(&notifier));
        let card = LikeCard::new("p1", true, 5);

        let outcome = controller.toggle(&card);
        let snap = card.snapshot();
        assert!(!snap.is_liked);
        assert_eq!(snap.like_count, 4);

        outcome.settled().await;
        let snap = card.snapshot();
        assert!(snap.is_liked);
        assert_eq!(snap.like_count, 5);
        assert!(!snap.loading);
        assert_eq!(notifier.fired.load(Ordering::SeqCst), 1);
        assert_eq!(api.calls(), vec!["unlike p1"]);
    }

    #[tokio::test]
    async fn test_failed_count_fetch_rolls_back() {
        let api = Arc::new(FakeApi::failing_count());
        let notifier = Arc::new(CountingNotifier::default());
        let controller = LikeController::with_notifier(Arc::clone(&api), Arc::clone(&notifier));
        let card = LikeCard::new("p1", false, 10);

        controller.toggle(&card).settled().await;
        let snap = card.snapshot();
        assert!(!snap.is_liked);
        assert_eq!(snap.like_count, 10);
        assert!(!snap.loading);
        assert_eq!(notifier.fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_trigger_while_loading_is_a_no_op() {
        let api = Arc::new(FakeApi::gated(1));
        let controller = LikeController::new(Arc::clone(&api));
        let card = LikeCard::new("p1", false, 0);

        let first = controller.toggle(&card);
        assert!(first.is_accepted());

        let second = controller.toggle(&card);
        assert!(!second.is_accepted());
        // State reflects only the first flip and one queued call.
        let snap = card.snapshot();
        assert!(snap.is_liked);
        assert_eq!(snap.like_count, 1);

        api.release_one();
        first.settled().await;
        assert_eq!(api.calls(), vec!["like p1", "count p1"]);
        assert_eq!(card.like_count(), 1);
    }

    #[tokio::test]
    async fn test_teardown_discards_completion_without_writes() {
        let api = Arc::new(FakeApi::gated(99));
        let notifier = Arc::new(CountingNotifier::default());
        let controller = LikeController::with_notifier(Arc::clone(&api), Arc::clone(&notifier));
        let card = LikeCard::new("p1", false, 10);

        let outcome = controller.toggle(&card);
        card.lifetime().retire();
        api.release_one();
        outcome.settled().await;

        // Nothing after teardown: the flip values are frozen, untouched by
        // reconciliation, rollback, or the loading-flag clear.
        let snap = card.snapshot();
        assert!(snap.is_liked);
        assert_eq!(snap.like_count, 11);
        assert!(snap.loading);
        assert_eq!(notifier.fired.load(Ordering::SeqCst), 0);
        // The like call itself was allowed to finish against the backend.
        assert_eq!(api.calls(), vec!["like p1"]);
    }

    #[tokio::test]
    async fn test_toggle_settle_toggle_keeps_wire_order() {
        let api = Arc::new(FakeApi::ok(7));
        let controller = LikeController::new(Arc::clone(&api));
        let card = LikeCard::new("p1", false, 6);

        controller.toggle(&card).settled().await;
        controller.toggle(&card).settled().await;

        assert_eq!(
            api.calls(),
            vec!["like p1", "count p1", "unlike p1", "count p1"]
        );
        assert!(!card.is_liked());
        assert_eq!(card.like_count(), 7);
        assert_eq!(controller.lane_count(), 1);
    }
}
