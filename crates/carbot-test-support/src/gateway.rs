//! Test gateway — a scripted `VoiceGateway` for trigger tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use carbot_core::gateway::{GatewayError, VoiceGateway};
use carbot_core::id::{ChannelId, GuildId, UserId};

/// A gateway whose channels and members are configured up front and
/// which records every move it is asked to perform. Moves for users in
/// the failing set return an error instead.
#[derive(Debug, Default)]
pub struct ScriptedVoiceGateway {
    channels: HashMap<(GuildId, String), ChannelId>,
    members: HashMap<ChannelId, Vec<UserId>>,
    failing: HashSet<UserId>,
    moves: Mutex<Vec<(UserId, ChannelId)>>,
}

impl ScriptedVoiceGateway {
    /// Create a gateway with no channels.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named voice channel in a guild.
    #[must_use]
    pub fn with_channel(mut self, guild: GuildId, name: &str, id: ChannelId) -> Self {
        self.channels.insert((guild, name.to_owned()), id);
        self
    }

    /// Sets the members currently connected to a channel.
    #[must_use]
    pub fn with_members(mut self, channel: ChannelId, members: Vec<UserId>) -> Self {
        self.members.insert(channel, members);
        self
    }

    /// Makes every `move_member` call for this user fail.
    #[must_use]
    pub fn with_failing_member(mut self, user: UserId) -> Self {
        self.failing.insert(user);
        self
    }

    /// Snapshot of all successfully recorded moves, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn moves(&self) -> Vec<(UserId, ChannelId)> {
        self.moves.lock().unwrap().clone()
    }
}

#[async_trait]
impl VoiceGateway for ScriptedVoiceGateway {
    async fn find_channel(
        &self,
        guild: GuildId,
        name: &str,
    ) -> Result<Option<ChannelId>, GatewayError> {
        Ok(self.channels.get(&(guild, name.to_owned())).copied())
    }

    async fn channel_members(
        &self,
        _guild: GuildId,
        channel: ChannelId,
    ) -> Result<Vec<UserId>, GatewayError> {
        Ok(self.members.get(&channel).cloned().unwrap_or_default())
    }

    async fn move_member(
        &self,
        _guild: GuildId,
        user: UserId,
        channel: ChannelId,
    ) -> Result<(), GatewayError> {
        if self.failing.contains(&user) {
            return Err(GatewayError::Request(format!(
                "cannot move user {user}: voice state unavailable"
            )));
        }
        self.moves.lock().unwrap().push((user, channel));
        Ok(())
    }
}
