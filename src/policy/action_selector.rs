//! Exploration policies over a learner's action-value vector.
//!
//! Two stochastic selection modes, both with linear annealing of the
//! exploration value:
//!
//! - [`ExplorationPolicy::EpsilonGreedy`]: with probability epsilon, pick a
//!   uniformly random action instead of the argmax
//! - [`ExplorationPolicy::NoisyValues`]: add Gaussian noise scaled by the
//!   exploration value to the action values before taking the argmax
//!
//! The selector also maps between learner output positions and the
//! environment's legal action ids, which are arbitrary integers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Stochastic action-selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplorationPolicy {
    /// With probability epsilon, pick a uniformly random action.
    EpsilonGreedy,
    /// Perturb the action values with scaled Gaussian noise before argmax.
    NoisyValues,
}

/// Configuration for [`ActionSelector`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSelectorConfig {
    /// Selection mode.
    pub policy: ExplorationPolicy,
    /// Exploration value before any annealing (epsilon, or noise scale).
    pub initial_value: f32,
    /// Exploration value floor after annealing.
    pub final_value: f32,
    /// Number of [`ActionSelector::anneal`] calls from initial to final.
    pub anneal_steps: usize,
}

impl Default for ActionSelectorConfig {
    fn default() -> Self {
        Self {
            policy: ExplorationPolicy::EpsilonGreedy,
            initial_value: 1.0,
            final_value: 0.1,
            anneal_steps: 1_000_000,
        }
    }
}

impl ActionSelectorConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selection mode.
    pub fn with_policy(mut self, policy: ExplorationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the initial exploration value.
    pub fn with_initial_value(mut self, initial_value: f32) -> Self {
        self.initial_value = initial_value;
        self
    }

    /// Set the exploration floor.
    pub fn with_final_value(mut self, final_value: f32) -> Self {
        self.final_value = final_value;
        self
    }

    /// Set the annealing horizon.
    pub fn with_anneal_steps(mut self, anneal_steps: usize) -> Self {
        self.anneal_steps = anneal_steps;
        self
    }
}

/// Action selector with linearly annealed exploration.
///
/// Owns its RNG; construct with [`ActionSelector::with_seed`] for
/// reproducible runs.
#[derive(Debug)]
pub struct ActionSelector {
    config: ActionSelectorConfig,
    exploration_value: f32,
    step_size: f32,
    /// Legal action ids in learner output order; empty means identity.
    actions: Vec<u32>,
    selections: usize,
    random_selections: usize,
    rng: StdRng,
}

impl ActionSelector {
    /// Create a selector seeded from the OS.
    ///
    /// # Panics
    ///
    /// Panics on non-finite exploration values, a negative floor,
    /// `initial_value < final_value`, or `anneal_steps == 0`.
    pub fn new(config: ActionSelectorConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a deterministic selector for tests and reproducible runs.
    pub fn with_seed(config: ActionSelectorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ActionSelectorConfig, rng: StdRng) -> Self {
        assert!(
            config.initial_value.is_finite() && config.final_value.is_finite(),
            "ActionSelector: exploration values must be finite"
        );
        assert!(
            config.final_value >= 0.0,
            "ActionSelector: exploration floor must be non-negative"
        );
        assert!(
            config.initial_value >= config.final_value,
            "ActionSelector: initial exploration below the floor"
        );
        assert!(
            config.anneal_steps > 0,
            "ActionSelector: anneal_steps must be positive"
        );
        let step_size =
            (config.initial_value - config.final_value) / config.anneal_steps as f32;
        Self {
            exploration_value: config.initial_value,
            step_size,
            actions: Vec::new(),
            selections: 0,
            random_selections: 0,
            rng,
            config,
        }
    }

    /// Register the environment's legal action ids, in learner output order.
    pub fn set_legal_actions(&mut self, actions: &[u32]) {
        self.actions = actions.to_vec();
    }

    /// Number of legal actions currently registered.
    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }

    /// Select an action index with the configured exploration policy.
    ///
    /// Ties resolve to the first maximal index.
    pub fn select(&mut self, action_values: &[f32]) -> usize {
        if action_values.is_empty() {
            log::warn!("select called with an empty action-value vector");
            return 0;
        }
        self.selections += 1;
        match self.config.policy {
            ExplorationPolicy::EpsilonGreedy => {
                if self.rng.gen::<f32>() <= self.exploration_value {
                    self.random_selections += 1;
                    return self.rng.gen_range(0..action_values.len());
                }
                argmax(action_values)
            }
            ExplorationPolicy::NoisyValues => {
                let scale = self.exploration_value;
                let noisy: Vec<f32> = action_values
                    .iter()
                    .map(|&v| {
                        let noise: f32 = self.rng.sample(StandardNormal);
                        v + noise * scale
                    })
                    .collect();
                argmax(&noisy)
            }
        }
    }

    /// Plain argmax without exploration (evaluation mode).
    pub fn select_greedy(&self, action_values: &[f32]) -> usize {
        if action_values.is_empty() {
            log::warn!("select_greedy called with an empty action-value vector");
            return 0;
        }
        argmax(action_values)
    }

    /// Select with exploration and translate to the environment's action id.
    pub fn select_game_action(&mut self, action_values: &[f32]) -> u32 {
        let index = self.select(action_values);
        self.to_game_action(index)
    }

    /// Translate a learner output position to the environment's action id.
    ///
    /// Falls back to the raw index when no legal-action table is registered.
    pub fn to_game_action(&self, index: usize) -> u32 {
        self.actions.get(index).copied().unwrap_or(index as u32)
    }

    /// Translate an environment action id back to a learner output position.
    pub fn game_action_to_index(&self, action: u32) -> Option<usize> {
        self.actions.iter().position(|&a| a == action)
    }

    /// One linear annealing step toward the floor.
    pub fn anneal(&mut self) {
        self.exploration_value =
            (self.exploration_value - self.step_size).max(self.config.final_value);
    }

    /// Current exploration value (epsilon, or noise scale).
    pub fn exploration_value(&self) -> f32 {
        self.exploration_value
    }

    /// Fraction of selections so far that were random.
    pub fn random_fraction(&self) -> f32 {
        if self.selections == 0 {
            0.0
        } else {
            self.random_selections as f32 / self.selections as f32
        }
    }

    /// Borrow the configuration.
    pub fn config(&self) -> &ActionSelectorConfig {
        &self.config
    }
}

/// Index of the first maximal value.
fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
