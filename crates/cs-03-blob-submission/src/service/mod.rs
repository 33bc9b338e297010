//! Service Layer

mod assembler;

pub use assembler::{Submission, TransactionAssembler};
