//! Carbot — slash-command model and dispatcher.
//!
//! Sits between the platform gateway and the core components: parsed
//! commands come in as [`command::Invocation`]s, privilege is checked via
//! an injected capability query, and presence events are forwarded to the
//! one-shot trigger.

pub mod command;
pub mod dispatcher;

pub use command::{Command, Invocation, Reply};
pub use dispatcher::{Dispatcher, EventRouter, GatewayEvent};
