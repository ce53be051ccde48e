//! Action-selection policies for the agent loop.

pub mod action_selector;

pub use action_selector::{ActionSelector, ActionSelectorConfig, ExplorationPolicy};
