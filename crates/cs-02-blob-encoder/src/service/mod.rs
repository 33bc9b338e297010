//! Service Layer

mod encoder;

pub use encoder::BlobEncoder;
