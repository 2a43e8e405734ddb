//! The one-shot trigger state machine.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use carbot_core::gateway::VoiceGateway;
use carbot_core::id::{ChannelId, GuildId, UserId};
use tracing::{info, instrument, warn};

/// A presence-change notification as delivered by the platform gateway.
#[derive(Debug, Clone)]
pub struct VoiceStateUpdate {
    /// Guild the update belongs to.
    pub guild: GuildId,
    /// The user whose voice state changed.
    pub user: UserId,
    /// The channel the user left, if any.
    pub old_channel: Option<ChannelId>,
    /// The channel the user joined; `None` on disconnect.
    pub new_channel: Option<ChannelId>,
}

/// Fixed configuration for the trigger.
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// The user whose arrival fires the trigger.
    pub subject: UserId,
    /// Guild both channels live in.
    pub guild: GuildId,
    /// The channel the subject must join.
    pub source_channel: ChannelId,
    /// Name of the channel everyone else gets moved to, resolved within
    /// the same guild at fire time.
    pub target_channel: String,
}

/// The two states of the trigger. There is no transition back to `Armed`
/// short of a process restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// Waiting for the first qualifying event.
    Armed,
    /// Fired (or spent on a failed firing); every later event is ignored.
    Consumed,
}

const ARMED: u8 = 0;
const CONSUMED: u8 = 1;

/// What a delivered event amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The event did not qualify, or the trigger was already consumed.
    Ignored,
    /// The trigger fired but the target channel could not be resolved.
    TargetMissing,
    /// The trigger fired but nobody was eligible to move.
    NoEligibleMembers,
    /// The trigger fired and the batch ran.
    Relocated {
        /// Members moved into the target channel.
        moved: usize,
        /// Members whose move failed and was skipped.
        failed: usize,
    },
}

/// One-shot automation over presence events.
///
/// The armed flag is an atomic test-and-set: under concurrent delivery of
/// qualifying events, exactly one observes `Armed` and runs the batch.
/// The flag is consumed before the target channel is resolved, so a
/// missing target still spends the one shot — there is no retry path.
pub struct TriggerAutomation {
    config: TriggerConfig,
    gateway: Arc<dyn VoiceGateway>,
    state: AtomicU8,
}

impl TriggerAutomation {
    /// Create an armed trigger.
    #[must_use]
    pub fn new(config: TriggerConfig, gateway: Arc<dyn VoiceGateway>) -> Self {
        Self {
            config,
            gateway,
            state: AtomicU8::new(ARMED),
        }
    }

    /// Current state of the trigger.
    #[must_use]
    pub fn state(&self) -> TriggerState {
        if self.state.load(Ordering::Acquire) == ARMED {
            TriggerState::Armed
        } else {
            TriggerState::Consumed
        }
    }

    /// Intake for raw presence events. Non-qualifying events and events
    /// arriving after consumption are ignored.
    #[instrument(skip(self, update), fields(user = %update.user, guild = %update.guild))]
    pub async fn handle_voice_state(&self, update: &VoiceStateUpdate) -> TriggerOutcome {
        if !self.qualifies(update) {
            return TriggerOutcome::Ignored;
        }
        if !self.try_consume() {
            return TriggerOutcome::Ignored;
        }
        info!(subject = %self.config.subject, "trigger fired");
        self.relocate().await
    }

    fn qualifies(&self, update: &VoiceStateUpdate) -> bool {
        update.guild == self.config.guild
            && update.user == self.config.subject
            && update.new_channel == Some(self.config.source_channel)
    }

    /// Atomically moves `Armed -> Consumed`; returns whether this call
    /// won the transition.
    fn try_consume(&self) -> bool {
        self.state
            .compare_exchange(ARMED, CONSUMED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    async fn relocate(&self) -> TriggerOutcome {
        let guild = self.config.guild;
        let target = match self
            .gateway
            .find_channel(guild, &self.config.target_channel)
            .await
        {
            Ok(Some(id)) => id,
            Ok(None) => {
                warn!(name = %self.config.target_channel, "target channel not found");
                return TriggerOutcome::TargetMissing;
            }
            Err(err) => {
                warn!(name = %self.config.target_channel, error = %err, "target channel lookup failed");
                return TriggerOutcome::TargetMissing;
            }
        };

        let in_target: HashSet<UserId> = match self.gateway.channel_members(guild, target).await {
            Ok(members) => members.into_iter().collect(),
            Err(err) => {
                warn!(channel = %target, error = %err, "target member listing failed");
                HashSet::new()
            }
        };
        let in_source = match self
            .gateway
            .channel_members(guild, self.config.source_channel)
            .await
        {
            Ok(members) => members,
            Err(err) => {
                warn!(channel = %self.config.source_channel, error = %err, "source member listing failed");
                return TriggerOutcome::NoEligibleMembers;
            }
        };

        let relocation_set: Vec<UserId> = in_source
            .into_iter()
            .filter(|user| *user != self.config.subject && !in_target.contains(user))
            .collect();
        if relocation_set.is_empty() {
            info!("nobody to relocate");
            return TriggerOutcome::NoEligibleMembers;
        }

        let mut moved = 0;
        let mut failed = 0;
        for user in relocation_set {
            match self.gateway.move_member(guild, user, target).await {
                Ok(()) => moved += 1,
                Err(err) => {
                    // One stuck member must not strand the rest.
                    warn!(user = %user, error = %err, "member relocation failed");
                    failed += 1;
                }
            }
        }
        info!(moved, failed, "relocation batch finished");
        TriggerOutcome::Relocated { moved, failed }
    }
}

#[cfg(test)]
mod tests {
    use carbot_test_support::ScriptedVoiceGateway;

    use super::*;

    const GUILD: GuildId = GuildId(100);
    const SOURCE: ChannelId = ChannelId(200);
    const TARGET: ChannelId = ChannelId(201);
    const SUBJECT: UserId = UserId(1);

    fn config() -> TriggerConfig {
        TriggerConfig {
            subject: SUBJECT,
            guild: GUILD,
            source_channel: SOURCE,
            target_channel: "afk-corner".to_owned(),
        }
    }

    fn arrival(user: UserId, channel: ChannelId) -> VoiceStateUpdate {
        VoiceStateUpdate {
            guild: GUILD,
            user,
            old_channel: None,
            new_channel: Some(channel),
        }
    }

    fn gateway_with_members(members: Vec<UserId>) -> ScriptedVoiceGateway {
        ScriptedVoiceGateway::new()
            .with_channel(GUILD, "afk-corner", TARGET)
            .with_members(SOURCE, members)
    }

    #[tokio::test]
    async fn test_qualifying_event_relocates_everyone_but_the_subject() {
        // Arrange
        let gateway = Arc::new(gateway_with_members(vec![
            SUBJECT,
            UserId(2),
            UserId(3),
        ]));
        let trigger = TriggerAutomation::new(config(), gateway.clone());

        // Act
        let outcome = trigger.handle_voice_state(&arrival(SUBJECT, SOURCE)).await;

        // Assert
        assert_eq!(outcome, TriggerOutcome::Relocated { moved: 2, failed: 0 });
        assert_eq!(trigger.state(), TriggerState::Consumed);
        assert_eq!(
            gateway.moves(),
            vec![(UserId(2), TARGET), (UserId(3), TARGET)]
        );
    }

    #[tokio::test]
    async fn test_members_already_in_target_are_skipped() {
        // Arrange
        let gateway = Arc::new(
            gateway_with_members(vec![SUBJECT, UserId(2), UserId(3)])
                .with_members(TARGET, vec![UserId(3)]),
        );
        let trigger = TriggerAutomation::new(config(), gateway.clone());

        // Act
        let outcome = trigger.handle_voice_state(&arrival(SUBJECT, SOURCE)).await;

        // Assert
        assert_eq!(outcome, TriggerOutcome::Relocated { moved: 1, failed: 0 });
        assert_eq!(gateway.moves(), vec![(UserId(2), TARGET)]);
    }

    #[tokio::test]
    async fn test_one_failing_member_does_not_block_the_rest() {
        // Arrange
        let gateway = Arc::new(
            gateway_with_members(vec![SUBJECT, UserId(2), UserId(3), UserId(4)])
                .with_failing_member(UserId(3)),
        );
        let trigger = TriggerAutomation::new(config(), gateway.clone());

        // Act
        let outcome = trigger.handle_voice_state(&arrival(SUBJECT, SOURCE)).await;

        // Assert
        assert_eq!(outcome, TriggerOutcome::Relocated { moved: 2, failed: 1 });
        assert_eq!(
            gateway.moves(),
            vec![(UserId(2), TARGET), (UserId(4), TARGET)]
        );
    }

    #[tokio::test]
    async fn test_second_qualifying_event_is_ignored() {
        // Arrange
        let gateway = Arc::new(gateway_with_members(vec![SUBJECT, UserId(2)]));
        let trigger = TriggerAutomation::new(config(), gateway.clone());
        let update = arrival(SUBJECT, SOURCE);

        // Act
        let first = trigger.handle_voice_state(&update).await;
        let second = trigger.handle_voice_state(&update).await;

        // Assert
        assert_eq!(first, TriggerOutcome::Relocated { moved: 1, failed: 0 });
        assert_eq!(second, TriggerOutcome::Ignored);
        assert_eq!(gateway.moves().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_delivery_runs_at_most_one_batch() {
        // Arrange
        let gateway = Arc::new(gateway_with_members(vec![SUBJECT, UserId(2), UserId(3)]));
        let trigger = Arc::new(TriggerAutomation::new(config(), gateway.clone()));
        let update = arrival(SUBJECT, SOURCE);

        // Act — deliver the same qualifying event from two tasks at once.
        let a = tokio::spawn({
            let trigger = Arc::clone(&trigger);
            let update = update.clone();
            async move { trigger.handle_voice_state(&update).await }
        });
        let b = tokio::spawn({
            let trigger = Arc::clone(&trigger);
            async move { trigger.handle_voice_state(&update).await }
        });
        let (a, b) = (a.await.unwrap(), b.await.unwrap());

        // Assert — exactly one winner, one batch.
        let fired = [a, b]
            .iter()
            .filter(|o| matches!(o, TriggerOutcome::Relocated { .. }))
            .count();
        assert_eq!(fired, 1);
        assert_eq!(gateway.moves().len(), 2);
        assert_eq!(trigger.state(), TriggerState::Consumed);
    }

    #[tokio::test]
    async fn test_missing_target_still_consumes_the_trigger() {
        // Arrange — no channel registered under the target name.
        let gateway = Arc::new(
            ScriptedVoiceGateway::new().with_members(SOURCE, vec![SUBJECT, UserId(2)]),
        );
        let trigger = TriggerAutomation::new(config(), gateway.clone());

        // Act
        let outcome = trigger.handle_voice_state(&arrival(SUBJECT, SOURCE)).await;

        // Assert — spent with nothing moved, and no second chance.
        assert_eq!(outcome, TriggerOutcome::TargetMissing);
        assert_eq!(trigger.state(), TriggerState::Consumed);
        assert!(gateway.moves().is_empty());
        let again = trigger.handle_voice_state(&arrival(SUBJECT, SOURCE)).await;
        assert_eq!(again, TriggerOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_empty_relocation_set_is_informational_only() {
        // Arrange — the subject is alone in the source channel.
        let gateway = Arc::new(gateway_with_members(vec![SUBJECT]));
        let trigger = TriggerAutomation::new(config(), gateway.clone());

        // Act
        let outcome = trigger.handle_voice_state(&arrival(SUBJECT, SOURCE)).await;

        // Assert
        assert_eq!(outcome, TriggerOutcome::NoEligibleMembers);
        assert!(gateway.moves().is_empty());
    }

    #[tokio::test]
    async fn test_non_qualifying_events_leave_the_trigger_armed() {
        // Arrange
        let gateway = Arc::new(gateway_with_members(vec![SUBJECT, UserId(2)]));
        let trigger = TriggerAutomation::new(config(), gateway.clone());

        // Act & Assert — wrong user.
        let outcome = trigger.handle_voice_state(&arrival(UserId(2), SOURCE)).await;
        assert_eq!(outcome, TriggerOutcome::Ignored);

        // Wrong channel.
        let outcome = trigger
            .handle_voice_state(&arrival(SUBJECT, ChannelId(999)))
            .await;
        assert_eq!(outcome, TriggerOutcome::Ignored);

        // Wrong guild.
        let mut update = arrival(SUBJECT, SOURCE);
        update.guild = GuildId(101);
        let outcome = trigger.handle_voice_state(&update).await;
        assert_eq!(outcome, TriggerOutcome::Ignored);

        // Disconnect rather than arrival.
        let update = VoiceStateUpdate {
            guild: GUILD,
            user: SUBJECT,
            old_channel: Some(SOURCE),
            new_channel: None,
        };
        let outcome = trigger.handle_voice_state(&update).await;
        assert_eq!(outcome, TriggerOutcome::Ignored);

        assert_eq!(trigger.state(), TriggerState::Armed);
        assert!(gateway.moves().is_empty());
    }
}
