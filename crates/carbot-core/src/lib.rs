//! Carbot Core — shared abstractions.
//!
//! This crate defines the prompt model, the repository contract both
//! persistence backends implement, and the clock/randomness seams the
//! rest of the bot depends on. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod gateway;
pub mod id;
pub mod prompt;
pub mod repository;
pub mod rng;
