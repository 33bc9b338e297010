//! Service Layer

mod issuer;
mod orchestrator;

#[cfg(test)]
pub(crate) mod test_support;

pub use issuer::IssuerService;
pub use orchestrator::PublicationOrchestrator;
