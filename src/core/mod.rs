//! Core types shared across the crate.

pub mod transition;

pub use transition::Transition;
