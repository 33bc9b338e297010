//! Domain layer: capacity rule, pipeline stages, cascade payload, errors,
//! outcomes.

pub mod capacity;
pub mod cascade;
pub mod errors;
pub mod outcome;
pub mod stage;

pub use capacity::{r_hat, round_seconds};
pub use cascade::{SerializedCascade, SALT_LEN};
pub use errors::{CascadeError, PublicationError, PublicationFailure};
pub use outcome::{PublicationOutcome, RevokeOutcome};
pub use stage::PipelineStage;
