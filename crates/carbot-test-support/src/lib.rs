//! Shared test mocks and utilities for the Carbot prompt bot.

mod clock;
mod gateway;
mod repository;
mod rng;

pub use clock::FixedClock;
pub use gateway::ScriptedVoiceGateway;
pub use repository::{FailingPromptRepository, InMemoryPromptRepository};
pub use rng::{FirstPick, SequencePick};
