//! # CS-04 Publication
//!
//! Publishes the current revocation state as a Bloom filter cascade carried
//! in blob data, and exposes the issuer operations around it.
//!
//! ## Pipeline
//!
//! ```text
//! StatusStore ──ids──► rHat ──► CascadeBuilder ──hex──► TransactionAssembler
//!                                                             │
//!                          PublicationLog ◄── CostAccountant ◄┘
//! ```
//!
//! Each stage reports `started`/`completed` on the progress bus. A failure
//! stops the run where it happened: no later events, no record.
//!
//! ## Known Races
//!
//! Two concurrent publishes may read different snapshots of the id sets and
//! size their cascades differently. This is accepted.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{BloomCascade, BloomCascadeBuilder};
pub use domain::{
    r_hat, CascadeError, PipelineStage, PublicationError, PublicationFailure, PublicationOutcome,
    RevokeOutcome, SerializedCascade,
};
pub use ports::{CascadeBuilder, IssuerApi};
pub use service::{IssuerService, PublicationOrchestrator};
