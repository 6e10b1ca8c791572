//! # kudos ❤️
//!
//! An optimistic like-toggle engine for social feed clients.
//!
//! ## Overview
//!
//! When a user taps the like button, the UI should flip instantly — the
//! network round trip comes later. kudos owns the machinery that makes that
//! safe: an immediate local flip, a per-post FIFO lane so the backend sees
//! toggles in gesture order, reconciliation against the server-authoritative
//! count, rollback on failure, and a staleness guard so completions from
//! superseded gestures or torn-down views never touch visible state.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       LikeController                        │
//! │   toggle(): optimistic flip, then queue the confirmation    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │    LikeCard     │ │ ActionSequencer │ │ Staleness guard │
//! │                 │ │                 │ │                 │
//! │ • is_liked      │ │ • lane per post │ │ • action tokens │
//! │ • like_count    │ │ • FIFO, no      │ │ • ViewLifetime  │
//! │ • loading flag  │ │   overlap       │ │ • discard stale │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!          │                   │                   │
//!          └───────────────────┴───────────────────┘
//!                              │
//!                    ┌─────────────────┐
//!                    │    PostsApi     │
//!                    │ like / unlike / │
//!                    │   like_count    │
//!                    └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] — the backend collaborator contract
//! - [`config`] — demo session configuration
//! - [`demo`] — simulated backend and scripted feed session
//! - [`engagement`] — controller, sequencer, cards, staleness guard
//! - [`models`] — data models (Post)
//! - [`notify`] — user-facing error notifications
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use kudos::{Config, LikeCard, LikeController};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let posts = kudos::demo::seed_posts(1);
//! let api = Arc::new(kudos::demo::SimulatedApi::new(&posts, 30, 0));
//! let controller = LikeController::new(api);
//!
//! let card = LikeCard::for_post(&posts[0]);
//! let outcome = controller.toggle(&card);
//! // The flip is already visible here; the confirmation settles later.
//! outcome.settled().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees
//!
//! - **Instant** — the flip lands before any I/O is queued
//! - **Ordered** — per-post confirmations run in gesture order, never
//!   overlapping; distinct posts are fully independent
//! - **Reconciled** — a successful toggle adopts the server's count
//! - **Reversible** — a failed toggle restores the exact pre-flip snapshot
//! - **Stale-safe** — superseded or post-teardown completions are discarded

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::return_self_not_must_use)]

pub mod api;
pub mod config;
pub mod demo;
pub mod engagement;
pub mod models;
pub mod notify;

// Re-export main types for convenience
pub use api::PostsApi;
pub use config::{Config, ConfigError};
pub use engagement::{
    ActionSequencer, Completion, EngagementSnapshot, LikeCard, LikeController, LikeIntent,
    PendingAction, ToggleOutcome, ViewLifetime,
};
pub use models::Post;
pub use notify::{LogNotifier, Notifier};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
