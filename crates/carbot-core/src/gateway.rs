//! Voice gateway abstraction.
//!
//! The platform connection that actually talks to the chat service
//! implements this trait; the trigger automation only consumes it.

use async_trait::async_trait;
use thiserror::Error;

use crate::id::{ChannelId, GuildId, UserId};

/// Errors surfaced by voice gateway calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The platform rejected or failed the request.
    #[error("gateway request failed: {0}")]
    Request(String),
}

/// The voice-channel operations the bot needs from the platform.
#[async_trait]
pub trait VoiceGateway: Send + Sync {
    /// Resolves a voice channel by name within a guild.
    async fn find_channel(
        &self,
        guild: GuildId,
        name: &str,
    ) -> Result<Option<ChannelId>, GatewayError>;

    /// Users currently connected to a voice channel.
    async fn channel_members(
        &self,
        guild: GuildId,
        channel: ChannelId,
    ) -> Result<Vec<UserId>, GatewayError>;

    /// Moves a user into another voice channel of the same guild.
    async fn move_member(
        &self,
        guild: GuildId,
        user: UserId,
        channel: ChannelId,
    ) -> Result<(), GatewayError>;
}
