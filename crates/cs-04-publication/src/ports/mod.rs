//! Ports Layer
//!
//! - Driving Ports (inbound) - the issuer API
//! - Driven Ports (outbound) - cascade construction

pub mod inbound;
pub mod outbound;

pub use inbound::IssuerApi;
pub use outbound::CascadeBuilder;
