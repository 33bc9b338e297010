//! # CRSet Issuer Runtime
//!
//! Configuration, wiring and command line surface of the issuer.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and construction of the issuer
//! - `cli` - Subcommands over the issuer operations
//! - `import` - CSV reader for seeding status entries
//!
//! ## Startup Sequence
//!
//! 1. Parse the command line
//! 2. Initialize logging
//! 3. Load configuration from the environment
//! 4. Validate the signing key and overrides
//! 5. Wire store, encoder, chain client and pipeline
//! 6. Run the subcommand

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod cli;
pub mod container;
pub mod import;

#[cfg(test)]
mod test_support;

pub use cli::{Cli, Command};
pub use container::{
    load_config, log_filter_directive, ConfigError, IssuerConfig, IssuerContainer,
};
