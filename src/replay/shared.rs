//! Coarse-locked shared handle for multi-worker callers.
//!
//! The replay core is single-threaded by contract: every operation assumes
//! exclusive access for its full duration. Callers that feed or drain one
//! store from several worker threads serialize whole operations behind a
//! mutex; [`SharedPrioritizedReplay`] is that conventional handle.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::replay::prioritized_replay::{PrioritizedReplay, PrioritizedReplayConfig};

/// Thread-safe shared prioritized replay store.
pub type SharedPrioritizedReplay = Arc<Mutex<PrioritizedReplay>>;

/// Create a new shared prioritized replay store.
pub fn shared_replay(config: PrioritizedReplayConfig) -> SharedPrioritizedReplay {
    Arc::new(Mutex::new(PrioritizedReplay::new(config)))
}
