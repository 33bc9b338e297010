//! # Issuer Container
//!
//! Builds the issuer from configuration: status store, progress bus, blob
//! encoder, chain client and publication pipeline.

pub mod config;
pub mod issuer;

pub use config::{load_config, log_filter_directive, ConfigError, IssuerConfig};
pub use issuer::IssuerContainer;
