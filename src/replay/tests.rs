//! Cross-module test suite for the replay submodule.
//!
//! Exercises the composed store the way a training loop does, end to end:
//!
//! 1. Configuration defaults and builders
//! 2. Fill / sample / update-priorities lifecycle
//! 3. Episode boundaries (terminal marks, zero-filled successors)
//! 4. Capacity, trim, and stale-handle behavior under churn
//! 5. Batch layout helpers

use super::*;

const STATE_LEN: usize = 4;

/// State rows tagged with their index for easy verification.
fn tagged_state(tag: u64) -> Vec<f32> {
    let mut state = vec![tag as f32; STATE_LEN];
    state[STATE_LEN - 1] = tag as f32 * 0.5;
    state
}

fn make_replay(capacity: usize, mini_batch_size: usize) -> PrioritizedReplay {
    PrioritizedReplay::new(
        PrioritizedReplayConfig::new()
            .with_capacity(capacity)
            .with_mini_batch_size(mini_batch_size),
    )
}

/// Push one episode of `len` steps and mark its final step terminal.
fn push_episode(replay: &mut PrioritizedReplay, len: u64) {
    let start = replay.buffer().next_index();
    for i in start..start + len {
        replay.push(tagged_state(i), (i % 3) as u32, if i % 7 == 0 { 1.0 } else { 0.0 });
    }
    replay.mark_terminal();
}

// =============================================================================
// CONFIGURATION
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = PrioritizedReplayConfig::default();
    assert_eq!(config.capacity, 100_000);
    assert_eq!(config.mini_batch_size, 32);
}

#[test]
fn test_config_builders() {
    let config = PrioritizedReplayConfig::new()
        .with_capacity(5_000)
        .with_mini_batch_size(64);
    assert_eq!(config.capacity, 5_000);
    assert_eq!(config.mini_batch_size, 64);
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[test]
fn test_fresh_pool_draw_accounting() {
    // capacity 5, mini-batch 2: five appends (the last marked terminal)
    // register five tree entries at +inf; a draw of two leaves three.
    let mut replay = make_replay(5, 2);
    for i in 0..5u64 {
        replay.push(tagged_state(i), 0, 0.0);
    }
    replay.mark_terminal();
    assert_eq!(replay.tree_len(), 5);

    let batch = replay.sample(2).unwrap();
    assert_eq!(batch.len(), 2);
    assert_ne!(batch.indices[0], batch.indices[1]);
    assert_eq!(replay.tree_len(), 3);
}

#[test]
fn test_every_fresh_transition_sampled_once() {
    // +inf registration guarantees each registered index is drawn exactly
    // once before any scored entry re-enters.
    let mut replay = make_replay(32, 2);
    for i in 0..10u64 {
        replay.push(tagged_state(i), 0, 0.0);
    }

    let mut seen = Vec::new();
    while let Some(batch) = replay.sample(3) {
        seen.extend(batch.indices);
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..9).collect::<Vec<u64>>());
}

#[test]
fn test_training_loop_round_trip() {
    let mut replay = make_replay(64, 4);
    push_episode(&mut replay, 12);

    // simulated training steps: draw, compute errors, report back
    for step in 0..20 {
        let Some(batch) = replay.sample_batch() else {
            panic!("store should stay sampleable, failed at step {step}");
        };
        assert_eq!(batch.len(), 4);
        let errors: Vec<f32> = batch
            .indices
            .iter()
            .map(|&i| (i as f32 * 0.37).sin().abs())
            .collect();
        replay.update_priorities(&batch.indices, &errors);
    }

    // every entry drawn at least once went back scored; pool intact
    assert_eq!(replay.tree_len(), 12);
}

#[test]
fn test_scored_entries_resample_in_error_order() {
    let mut replay = make_replay(16, 2);
    for i in 0..6u64 {
        replay.push(tagged_state(i), 0, 0.0);
    }
    while replay.sample(4).is_some() {}

    replay.update_priorities(&[0, 1, 2, 3, 4], &[0.1, 0.8, 0.3, 0.9, 0.5]);
    let batch = replay.sample(5).unwrap();
    assert_eq!(batch.indices, vec![3, 1, 4, 2, 0]);
}

// =============================================================================
// EPISODE BOUNDARIES
// =============================================================================

#[test]
fn test_multiple_episodes_terminal_flags() {
    let mut replay = make_replay(64, 2);
    push_episode(&mut replay, 4); // terminal at 3
    push_episode(&mut replay, 3); // terminal at 6
    assert!(replay.buffer().is_terminal(3));
    assert!(replay.buffer().is_terminal(6));

    let mut drawn_terminals = Vec::new();
    while let Some(batch) = replay.sample(2) {
        for (row, &index) in batch.indices.iter().enumerate() {
            if batch.terminals[row] {
                drawn_terminals.push(index);
                assert_eq!(batch.next_states[row], vec![0.0; STATE_LEN]);
            } else {
                assert_eq!(
                    batch.next_states[row],
                    tagged_state(index + 1),
                    "non-terminal successor must be the next stored state"
                );
            }
        }
    }
    drawn_terminals.sort_unstable();
    // index 3 is drawn twice: once for its terminal mark, once more from the
    // registration lag of the next episode's first append
    assert_eq!(drawn_terminals, vec![3, 3, 6]);
}

// =============================================================================
// CAPACITY AND CHURN
// =============================================================================

#[test]
fn test_trim_keeps_length_bounded() {
    let mut replay = make_replay(20, 4);
    for round in 0..5u64 {
        for i in 0..15u64 {
            let tag = round * 15 + i;
            replay.push(tagged_state(tag), 0, 0.0);
        }
        replay.trim();
        assert!(replay.len() <= 20);
    }
}

#[test]
fn test_churn_never_yields_stale_rows() {
    // Steady state under a bounded buffer: old history is discarded while
    // its tree entries linger. Sampling must only ever surface live indices.
    let mut replay = make_replay(30, 4);
    let mut pushed = 0u64;

    for _ in 0..40 {
        for _ in 0..10 {
            replay.push(tagged_state(pushed), 0, 0.0);
            pushed += 1;
        }
        replay.trim();

        if let Some(batch) = replay.sample_batch() {
            let oldest = replay.buffer().oldest_index().unwrap();
            for (row, &index) in batch.indices.iter().enumerate() {
                assert!(index >= oldest, "stale index {index} surfaced");
                assert_eq!(batch.states[row], tagged_state(index));
            }
            let errors = vec![0.25; batch.len()];
            replay.update_priorities(&batch.indices, &errors);
        }
    }
}

// =============================================================================
// BATCH LAYOUT
// =============================================================================

#[test]
fn test_batch_flat_layout() {
    let mut replay = make_replay(16, 2);
    for i in 0..5u64 {
        replay.push(tagged_state(i), 0, 0.0);
    }
    let batch = replay.sample(3).unwrap();

    assert_eq!(batch.state_len(), STATE_LEN);
    let flat = batch.states_flat();
    assert_eq!(flat.len(), 3 * STATE_LEN);
    for (row, state) in batch.states.iter().enumerate() {
        assert_eq!(&flat[row * STATE_LEN..(row + 1) * STATE_LEN], state.as_slice());
    }
    assert_eq!(batch.next_states_flat().len(), 3 * STATE_LEN);
}

#[test]
fn test_empty_batch_helpers() {
    let batch = ReplayBatch::default();
    assert!(batch.is_empty());
    assert_eq!(batch.state_len(), 0);
    assert!(batch.states_flat().is_empty());
}
