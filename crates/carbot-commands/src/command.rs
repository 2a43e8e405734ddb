//! The slash-command surface of the bot.

use carbot_core::id::UserId;
use uuid::Uuid;

/// A parsed slash command. Positions are 1-based, exactly as typed by
/// the user; the dispatcher converts before talking to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check that the bot is alive.
    Ping,
    /// Ask for a random truth.
    Truth,
    /// Ask for a random dare.
    Dare,
    /// Add a truth prompt (privileged).
    AddTruth {
        /// The prompt text as submitted.
        text: String,
    },
    /// Add a dare prompt (privileged).
    AddDare {
        /// The prompt text as submitted.
        text: String,
    },
    /// Remove a truth by its 1-based index (privileged).
    RemoveTruth {
        /// Index as typed by the user.
        position: i64,
    },
    /// Remove a dare by its 1-based index (privileged).
    RemoveDare {
        /// Index as typed by the user.
        position: i64,
    },
}

impl Command {
    /// The command name, for logging and routing.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "ping",
            Command::Truth => "truth",
            Command::Dare => "dare",
            Command::AddTruth { .. } => "addtruth",
            Command::AddDare { .. } => "adddare",
            Command::RemoveTruth { .. } => "removetruth",
            Command::RemoveDare { .. } => "removedare",
        }
    }
}

/// One command invocation as delivered by the gateway.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Correlation ID to trace this invocation through the system.
    pub correlation_id: Uuid,
    /// Who invoked the command.
    pub caller: UserId,
    /// The parsed command.
    pub command: Command,
}

/// A response handed back to the reply sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// The response text.
    pub text: String,
    /// Whether only the caller should see the response.
    pub ephemeral: bool,
}

impl Reply {
    /// A reply visible to everyone in the channel.
    pub fn public(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ephemeral: false,
        }
    }

    /// A reply visible only to the caller.
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ephemeral: true,
        }
    }
}
