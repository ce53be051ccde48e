//! Experience storage and prioritized sampling.
//!
//! The training loop sees one type, [`PrioritizedReplay`]; the pieces it
//! composes are public for callers with custom sampling needs:
//!
//! - [`PriorityTree`]: max-priority search tree over `(priority, index)` pairs
//! - [`ExperienceBuffer`]: bounded, insertion-ordered transition store with
//!   terminal markers
//! - [`PrioritizedReplay`]: the composition the training loop samples from
//! - [`shared_replay`]: coarse-locked handle for multi-worker callers

pub mod experience_buffer;
pub mod prioritized_replay;
pub mod priority_tree;
pub mod shared;

pub use experience_buffer::{ExperienceBuffer, ExperienceView};
pub use prioritized_replay::{PrioritizedReplay, PrioritizedReplayConfig, ReplayBatch};
pub use priority_tree::PriorityTree;
pub use shared::{shared_replay, SharedPrioritizedReplay};

#[cfg(test)]
mod tests;
