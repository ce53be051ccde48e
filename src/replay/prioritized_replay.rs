//! Prioritized replay store: a max-priority tree over a bounded experience
//! buffer.
//!
//! Key characteristics:
//! - Fresh transitions enter the tree at `+inf` priority so each is sampled
//!   at least once before it carries a computed TD error
//! - Sampling pops the tree: drawn entries leave the pool until the training
//!   step reports refined priorities back by index
//! - Registration lags appends by one index so a registered transition
//!   always has a stored successor; terminal marks register their own index
//! - Tree entries invalidated by a trim are consumed and skipped at sampling
//!   time

use serde::{Deserialize, Serialize};

use crate::replay::experience_buffer::ExperienceBuffer;
use crate::replay::priority_tree::PriorityTree;

/// Configuration for the prioritized replay store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizedReplayConfig {
    /// Maximum transitions retained after a trim.
    pub capacity: usize,
    /// Transitions per sampled mini-batch.
    pub mini_batch_size: usize,
}

impl Default for PrioritizedReplayConfig {
    fn default() -> Self {
        Self {
            capacity: 100_000,
            mini_batch_size: 32,
        }
    }
}

impl PrioritizedReplayConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the buffer capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the mini-batch size.
    pub fn with_mini_batch_size(mut self, mini_batch_size: usize) -> Self {
        self.mini_batch_size = mini_batch_size;
        self
    }
}

/// Mini-batch of prioritized samples as parallel arrays.
///
/// All vectors have equal length and are aligned by position: row `i`
/// describes the transition stored at `indices[i]`.
#[derive(Debug, Clone, Default)]
pub struct ReplayBatch {
    /// Sampled states, one row per entry.
    pub states: Vec<Vec<f32>>,
    /// Actions taken.
    pub actions: Vec<u32>,
    /// Rewards received.
    pub rewards: Vec<f32>,
    /// Successor states; zero-filled rows for terminal entries.
    pub next_states: Vec<Vec<f32>>,
    /// Terminal flags.
    pub terminals: Vec<bool>,
    /// Buffer indices of the sampled entries, in draw order. Hand these back
    /// to [`PrioritizedReplay::update_priorities`] with the computed errors.
    pub indices: Vec<u64>,
}

impl ReplayBatch {
    /// Number of sampled transitions.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the batch holds no transitions.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Dimensionality of one state row.
    pub fn state_len(&self) -> usize {
        self.states.first().map_or(0, |s| s.len())
    }

    /// Row-major flattening of `states`.
    pub fn states_flat(&self) -> Vec<f32> {
        self.states.iter().flat_map(|s| s.iter().copied()).collect()
    }

    /// Row-major flattening of `next_states`.
    pub fn next_states_flat(&self) -> Vec<f32> {
        self.next_states
            .iter()
            .flat_map(|s| s.iter().copied())
            .collect()
    }
}

/// Replay store that samples transitions by TD-error magnitude.
///
/// Composes [`PriorityTree`] and [`ExperienceBuffer`]; the tree holds plain
/// index handles into the buffer, and the store tracks the tree's entry
/// count since the two structures share lifecycle accounting.
#[derive(Debug, Clone)]
pub struct PrioritizedReplay {
    config: PrioritizedReplayConfig,
    buffer: ExperienceBuffer,
    tree: PriorityTree,
    /// Live tree entries, stale ones included until popped.
    tree_len: usize,
}

impl PrioritizedReplay {
    /// Create a store from a config.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` or `mini_batch_size` is zero.
    pub fn new(config: PrioritizedReplayConfig) -> Self {
        assert!(
            config.capacity > 0,
            "PrioritizedReplay: capacity must be positive"
        );
        assert!(
            config.mini_batch_size > 0,
            "PrioritizedReplay: mini_batch_size must be positive"
        );
        Self {
            buffer: ExperienceBuffer::new(config.capacity),
            tree: PriorityTree::new(),
            tree_len: 0,
            config,
        }
    }

    /// Append a transition and register its predecessor for sampling.
    ///
    /// The registered index lags the append by one so that the registered
    /// transition always has a stored successor; the first transition of a
    /// fill cycle is therefore never registered on its own append. Fresh
    /// registrations carry `+inf` priority, guaranteeing each transition is
    /// drawn at least once before it has a computed error.
    pub fn push(&mut self, state: Vec<f32>, action: u32, reward: f32) -> u64 {
        let index = self.buffer.push(state, action, reward);
        if self.buffer.len() > 1 {
            self.tree.insert(f32::INFINITY, index - 1);
            self.tree_len += 1;
        }
        index
    }

    /// Mark the newest transition terminal and register it for sampling.
    ///
    /// Terminal transitions have no successor, so they are registered
    /// immediately instead of waiting for the next append.
    pub fn mark_terminal(&mut self) {
        if let Some(index) = self.buffer.mark_terminal() {
            self.tree.insert(f32::INFINITY, index);
            self.tree_len += 1;
        }
    }

    /// Draw the `n` highest-priority transitions as a mini-batch.
    ///
    /// Returns `None` until the buffer holds more than `n` transitions;
    /// callers poll until enough experience accumulates. Drawn entries leave
    /// the tree and re-enter only through [`update_priorities`]. Entries
    /// whose payloads were invalidated by [`trim`] are consumed and skipped;
    /// if the tree runs dry early the batch is returned short.
    ///
    /// [`update_priorities`]: PrioritizedReplay::update_priorities
    /// [`trim`]: PrioritizedReplay::trim
    pub fn sample(&mut self, n: usize) -> Option<ReplayBatch> {
        if n == 0 {
            log::warn!("sample called with a zero mini-batch size");
            return None;
        }
        if self.buffer.len() <= n {
            return None;
        }

        let mut batch = ReplayBatch::default();
        while batch.len() < n {
            let Some((_, index)) = self.tree.pop_max() else {
                break;
            };
            self.tree_len -= 1;
            let Some(view) = self.buffer.get(index) else {
                log::debug!("skipping stale replay index {index}");
                continue;
            };
            batch.states.push(view.state.to_vec());
            batch.actions.push(view.action);
            batch.rewards.push(view.reward);
            batch.next_states.push(match view.next_state {
                Some(next) => next.to_vec(),
                None => vec![0.0; view.state.len()],
            });
            batch.terminals.push(view.terminal);
            batch.indices.push(index);
        }

        if batch.is_empty() {
            return None;
        }
        Some(batch)
    }

    /// Draw one mini-batch at the configured size.
    pub fn sample_batch(&mut self) -> Option<ReplayBatch> {
        self.sample(self.config.mini_batch_size)
    }

    /// Report refined priorities for previously sampled indices.
    ///
    /// Each `(index, priority)` pair re-enters the tree; this is how a
    /// training step returns transitions to the sampling pool with their
    /// computed TD errors instead of the insertion-time `+inf`.
    pub fn update_priorities(&mut self, indices: &[u64], priorities: &[f32]) {
        if indices.len() != priorities.len() {
            log::warn!(
                "update_priorities length mismatch: {} indices, {} priorities",
                indices.len(),
                priorities.len()
            );
        }
        for (&index, &priority) in indices.iter().zip(priorities.iter()) {
            self.tree.insert(priority, index);
            self.tree_len += 1;
        }
    }

    /// Discard oldest transitions beyond capacity.
    ///
    /// Tree entries referencing discarded indices stay behind as stale and
    /// are skipped when popped. Returns the number of transitions discarded.
    pub fn trim(&mut self) -> usize {
        self.buffer.trim()
    }

    /// Number of stored transitions.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer holds no transitions.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Live tree entries, stale ones included until popped.
    pub fn tree_len(&self) -> usize {
        self.tree_len
    }

    /// Whether a configured-size mini-batch can currently be drawn.
    pub fn is_ready(&self) -> bool {
        self.buffer.len() > self.config.mini_batch_size
    }

    /// Configured buffer capacity.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Borrow the configuration.
    pub fn config(&self) -> &PrioritizedReplayConfig {
        &self.config
    }

    /// Borrow the underlying experience buffer.
    pub fn buffer(&self) -> &ExperienceBuffer {
        &self.buffer
    }

    /// Drop all stored transitions and tree entries.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.tree.clear();
        self.tree_len = 0;
    }
}
