//! Optimistic like-toggle engine
//!
//! Three cooperating parts:
//!
//! - [`controller`] — flips card state before the network round trip and
//!   defines the reconciliation/rollback rules when confirmations settle
//! - [`sequencer`] — one FIFO confirmation lane per post, so the backend
//!   sees toggles in gesture order even when the user hammers the button
//! - [`action`] + [`lifetime`] — the staleness guard: token-tagged pending
//!   actions and a view-liveness flag, checked before every deferred write
//!
//! Flow: gesture → optimistic flip + pending action recorded → confirmation
//! queued on the post's lane → on settle, apply reconciliation or rollback
//! only if the action is still current and the view is still mounted.

pub mod action;
pub mod card;
pub mod controller;
pub mod lifetime;
pub mod sequencer;

pub use action::{LikeIntent, PendingAction};
pub use card::{EngagementSnapshot, LikeCard};
pub use controller::{LikeController, TOGGLE_FAILED_MESSAGE, ToggleOutcome};
pub use lifetime::{LifetimeHandle, ViewLifetime};
pub use sequencer::{ActionSequencer, Completion};
