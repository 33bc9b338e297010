//! Adapters Layer

pub mod bloom;

pub use bloom::{BloomCascade, BloomCascadeBuilder};
