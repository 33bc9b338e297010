//! Bloom filter cascade.
//!
//! Level 1 holds the (padded) valid ids. Each following level holds the
//! false positives of the previous one, drawn from the opposite set, until
//! a level produces none. Membership of any id from either set is then
//! exact.

mod cascade;
mod filter;
mod hashing;
mod parameters;

pub use cascade::{BloomCascade, BloomCascadeBuilder};
