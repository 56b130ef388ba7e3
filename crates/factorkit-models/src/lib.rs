//! factorkit Models - Concrete matrix factorization models.
//!
//! This crate provides the models factorization algorithms run on: the
//! single factor pair model used by standard NMF variants and the multiple
//! factor pair model used by algorithms that factor several targets against
//! a shared basis.

pub mod mmf;
pub mod smf;

// Re-export main models for convenience
pub use mmf::{Mmf, MMF_MODEL_NAME};
pub use smf::{Smf, SMF_MODEL_NAME};
