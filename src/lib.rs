//! # Prioritized Replay: experience storage and sampling for value-based RL
//!
//! Storage, prioritization, and sampling core for DQN-style training loops.
//! The environment adapter feeds `(state, action, reward)` transitions in
//! arrival order; the training step draws mini-batches ordered by TD-error
//! magnitude and reports refined errors back by index.
//!
//! ## Architecture Overview
//!
//! ```text
//! environment adapter                       training step
//!        │                                       ▲
//!        │ push / mark_terminal                  │ ReplayBatch
//!        ▼                                       │
//! ┌──────────────────────────────────────────────┴──────┐
//! │                 PrioritizedReplay                   │
//! ├──────────────────────────┬──────────────────────────┤
//! │    ExperienceBuffer      │       PriorityTree       │
//! │  (bounded transition     │  (max-priority BST over  │
//! │   store, u64 handles)    │   (priority, index))     │
//! └──────────────────────────┴──────────────────────────┘
//!                                       ▲
//!                                       │ update_priorities
//!                                       └── computed TD errors
//! ```
//!
//! Fresh transitions are registered at `+inf` priority so each is drawn at
//! least once; drawn entries leave the pool until the training step reports
//! their computed errors.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prioritized_replay::{PrioritizedReplay, PrioritizedReplayConfig};
//!
//! let config = PrioritizedReplayConfig::new()
//!     .with_capacity(100_000)
//!     .with_mini_batch_size(32);
//! let mut replay = PrioritizedReplay::new(config);
//!
//! // collection
//! replay.push(frame, action, reward);
//! if episode_over {
//!     replay.mark_terminal();
//! }
//! replay.trim();
//!
//! // training
//! if let Some(batch) = replay.sample_batch() {
//!     let td_errors = train_step(&batch);
//!     replay.update_priorities(&batch.indices, &td_errors);
//! }
//! ```

pub mod core;
pub mod policy;
pub mod replay;

pub use crate::core::transition::Transition;
pub use crate::policy::action_selector::{ActionSelector, ActionSelectorConfig, ExplorationPolicy};
pub use crate::replay::experience_buffer::{ExperienceBuffer, ExperienceView};
pub use crate::replay::prioritized_replay::{PrioritizedReplay, PrioritizedReplayConfig, ReplayBatch};
pub use crate::replay::priority_tree::PriorityTree;
pub use crate::replay::shared::{shared_replay, SharedPrioritizedReplay};
