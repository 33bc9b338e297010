//! Adapters Layer

#[cfg(feature = "kzg")]
pub mod kzg;

#[cfg(feature = "kzg")]
pub use kzg::CKzgProver;
