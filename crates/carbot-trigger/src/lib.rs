//! Carbot — one-shot voice-channel relocation.
//!
//! Watches presence changes for one configured user and, the first time
//! that user joins the configured voice channel, herds everyone else in
//! the channel over to a second channel. Fires at most once per process.

pub mod automation;

pub use automation::{
    TriggerAutomation, TriggerConfig, TriggerOutcome, TriggerState, VoiceStateUpdate,
};
