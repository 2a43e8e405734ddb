//! Command dispatch and gateway event routing.

use std::sync::Arc;

use carbot_core::error::StoreError;
use carbot_core::id::UserId;
use carbot_core::prompt::Category;
use carbot_prompts::PromptStore;
use carbot_trigger::{TriggerAutomation, VoiceStateUpdate};
use tracing::{error, info, instrument};

use crate::command::{Command, Invocation, Reply};

/// Reply for a store failure at the outermost layer.
const SOMETHING_WENT_WRONG: &str = "Something went wrong, try again later.";

/// Capability query: does this caller hold elevated privilege?
///
/// Implemented outside the core — an owner list, an administrator flag,
/// or a named role, depending on the deployment.
pub type PrivilegeCheck = dyn Fn(UserId) -> bool + Send + Sync;

/// Routes parsed commands to the prompt store.
pub struct Dispatcher {
    store: Arc<PromptStore>,
    is_privileged: Box<PrivilegeCheck>,
}

impl Dispatcher {
    /// Create a dispatcher over the store with the given capability query.
    pub fn new(
        store: Arc<PromptStore>,
        is_privileged: impl Fn(UserId) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            store,
            is_privileged: Box::new(is_privileged),
        }
    }

    /// Handles one command invocation and produces the reply to send.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when a mutation or read did not complete;
    /// the caller decides how to report that to the end user.
    #[instrument(
        skip(self, invocation),
        fields(
            command = invocation.command.name(),
            caller = %invocation.caller,
            correlation_id = %invocation.correlation_id,
        )
    )]
    pub async fn dispatch(&self, invocation: &Invocation) -> Result<Reply, StoreError> {
        info!("handling command");
        match &invocation.command {
            Command::Ping => Ok(Reply::public("Pong!")),
            Command::Truth => Ok(Reply::public(self.store.random_truth().await?)),
            Command::Dare => Ok(Reply::public(self.store.random_dare().await?)),
            Command::AddTruth { text } => {
                self.add(invocation.caller, Category::Truth, text).await
            }
            Command::AddDare { text } => self.add(invocation.caller, Category::Dare, text).await,
            Command::RemoveTruth { position } => {
                self.remove(invocation.caller, Category::Truth, *position)
                    .await
            }
            Command::RemoveDare { position } => {
                self.remove(invocation.caller, Category::Dare, *position)
                    .await
            }
        }
    }

    async fn add(
        &self,
        caller: UserId,
        category: Category,
        text: &str,
    ) -> Result<Reply, StoreError> {
        if !(self.is_privileged)(caller) {
            return Ok(Reply::ephemeral(
                "You don't have permission to add prompts.",
            ));
        }
        match category {
            Category::Truth => self.store.add_truth(text).await?,
            Category::Dare => self.store.add_dare(text).await?,
        }
        Ok(Reply::ephemeral(format!("Added new {category}: {text}")))
    }

    async fn remove(
        &self,
        caller: UserId,
        category: Category,
        position: i64,
    ) -> Result<Reply, StoreError> {
        if !(self.is_privileged)(caller) {
            return Ok(Reply::ephemeral(
                "You don't have permission to remove prompts.",
            ));
        }
        // Users address prompts 1-based; the store is 0-based.
        let index = position.saturating_sub(1);
        let removed = match category {
            Category::Truth => self.store.remove_truth_at(index).await?,
            Category::Dare => self.store.remove_dare_at(index).await?,
        };
        if removed {
            Ok(Reply::ephemeral(format!(
                "Removed {category} at index {position}"
            )))
        } else {
            Ok(Reply::ephemeral(format!(
                "Invalid {category} index: {position}"
            )))
        }
    }
}

/// A raw event as delivered by the platform connection.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// A slash-command invocation.
    Command(Invocation),
    /// A voice presence change.
    VoiceState(VoiceStateUpdate),
}

/// Top-level intake for gateway events: commands go to the dispatcher,
/// presence changes go to the trigger automation.
pub struct EventRouter {
    dispatcher: Dispatcher,
    trigger: Arc<TriggerAutomation>,
}

impl EventRouter {
    /// Create a router over the dispatcher and the trigger.
    #[must_use]
    pub fn new(dispatcher: Dispatcher, trigger: Arc<TriggerAutomation>) -> Self {
        Self {
            dispatcher,
            trigger,
        }
    }

    /// Routes one event. Commands yield a reply for the reply sink;
    /// presence events never do. A store failure is logged here and
    /// reported to the caller alone.
    pub async fn route(&self, event: GatewayEvent) -> Option<Reply> {
        match event {
            GatewayEvent::Command(invocation) => {
                match self.dispatcher.dispatch(&invocation).await {
                    Ok(reply) => Some(reply),
                    Err(err) => {
                        error!(
                            command = invocation.command.name(),
                            correlation_id = %invocation.correlation_id,
                            error = %err,
                            "command failed"
                        );
                        Some(Reply::ephemeral(SOMETHING_WENT_WRONG))
                    }
                }
            }
            GatewayEvent::VoiceState(update) => {
                self.trigger.handle_voice_state(&update).await;
                None
            }
        }
    }
}
