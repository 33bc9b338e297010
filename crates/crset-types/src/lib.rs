//! # CRSet Types Crate
//!
//! Entities shared across the publication pipeline crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: records that cross a crate boundary are
//!   defined here and nowhere else.
//! - **Wire Compatibility**: `ProgressEvent` and `PublicationRecord` serialize
//!   to the camelCase JSON shape consumed by listeners and log readers.

pub mod entities;
pub mod hex_utils;
pub mod progress;

pub use entities::*;
pub use hex_utils::*;
pub use progress::*;
