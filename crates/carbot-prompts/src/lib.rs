//! Carbot — the truth/dare prompt store.
//!
//! Owns the two prompt collections and serializes every mutation so that
//! positional removal stays consistent under concurrent commands.

pub mod store;

pub use store::{NO_DARES, NO_TRUTHS, PromptStore};
