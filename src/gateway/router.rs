//! Conversation topic router — two-phase thread assignment.
//!
//! The topic of an inbound message is only known after the LLM call, but
//! the message must be in the log before that call so the model sees
//! chronological context. So the router attaches provisionally first and
//! resolves the thread afterwards, moving or relabeling as needed while
//! preserving the invariant of one open conversation per (user, topic).

use aura_core::{
    error::AuraError,
    model::{Modality, Role, DEFAULT_TOPIC},
};
use aura_store::Store;
use tracing::{info, warn};

/// Snapshot of where an inbound message was provisionally attached.
///
/// Resolution keys off this snapshot, never a re-query of "most recent
/// open conversation" — another message from the same user may have been
/// attached concurrently while the LLM call was in flight.
#[derive(Debug, Clone)]
pub struct ProvisionalAttach {
    pub user_id: i64,
    pub conversation_id: i64,
    pub message_id: i64,
    /// Topic of the provisional conversation at attach time.
    pub topic: String,
    /// True when the conversation was created for this message, i.e. the
    /// user had no open conversation and therefore no prior thread.
    pub created: bool,
}

/// Outcome of topic resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The final conversation — where the message lives and where any
    /// tool-created task must be attached.
    pub conversation_id: i64,
    /// Previous thread topic, set when the final topic differs from the
    /// one the user's prior message lived in. Drives the one-line
    /// topic-switch notice.
    pub switched_from: Option<String>,
}

/// Routes messages to conversation threads by topic.
pub struct TopicRouter {
    store: Store,
}

impl TopicRouter {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Phase one: append the message to the most recently started open
    /// conversation, creating a "General" one if none exists. Must
    /// complete before the classification call is issued.
    pub async fn provisional_attach(
        &self,
        user_id: i64,
        text: &str,
        modality: Modality,
    ) -> Result<ProvisionalAttach, AuraError> {
        let (conversation, created) = match self.store.latest_open_conversation(user_id).await? {
            Some(c) => (c, false),
            None => (
                self.store
                    .create_conversation(user_id, DEFAULT_TOPIC)
                    .await?,
                true,
            ),
        };

        let message_id = self
            .store
            .append_message(conversation.id, Role::User, text, modality)
            .await?;

        Ok(ProvisionalAttach {
            user_id,
            conversation_id: conversation.id,
            message_id,
            topic: conversation.topic,
            created,
        })
    }

    /// Phase two: settle the message into the thread matching the
    /// classified topic. Store errors fall back to the provisional
    /// conversation with the switch notice suppressed — delivery
    /// correctness outranks thread hygiene.
    pub async fn resolve(&self, provisional: &ProvisionalAttach, topic: &str) -> Resolution {
        match self.try_resolve(provisional, topic).await {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!(
                    "topic resolution failed, keeping provisional conversation {}: {e}",
                    provisional.conversation_id
                );
                Resolution {
                    conversation_id: provisional.conversation_id,
                    switched_from: None,
                }
            }
        }
    }

    async fn try_resolve(
        &self,
        p: &ProvisionalAttach,
        topic: &str,
    ) -> Result<Resolution, AuraError> {
        // Provisional thread already has the right topic.
        if topic == p.topic {
            return Ok(Resolution {
                conversation_id: p.conversation_id,
                switched_from: None,
            });
        }

        // An open thread for this topic exists: move the message there.
        if let Some(existing) = self
            .store
            .open_conversation_by_topic(p.user_id, topic)
            .await?
        {
            self.store.move_message(p.message_id, existing.id).await?;
            info!(
                "message {} moved to conversation {} (topic '{topic}')",
                p.message_id, existing.id
            );
            return Ok(Resolution {
                conversation_id: existing.id,
                switched_from: self.prior_topic(p),
            });
        }

        // The provisional thread is still an untouched default: relabel
        // in place instead of creating a duplicate and moving.
        if p.topic == DEFAULT_TOPIC {
            self.store
                .set_conversation_topic(p.conversation_id, topic)
                .await?;
            info!(
                "conversation {} relabeled '{}' -> '{topic}'",
                p.conversation_id, p.topic
            );
            return Ok(Resolution {
                conversation_id: p.conversation_id,
                switched_from: self.prior_topic(p),
            });
        }

        // New topic: open a fresh thread and move the message.
        let conversation = self.store.create_conversation(p.user_id, topic).await?;
        self.store
            .move_message(p.message_id, conversation.id)
            .await?;
        info!(
            "opened conversation {} (topic '{topic}') for message {}",
            conversation.id, p.message_id
        );
        Ok(Resolution {
            conversation_id: conversation.id,
            switched_from: self.prior_topic(p),
        })
    }

    /// Topic the user's prior message lived in, or `None` when the
    /// provisional thread was created for this very message.
    fn prior_topic(&self, p: &ProvisionalAttach) -> Option<String> {
        if p.created {
            None
        } else {
            Some(p.topic.clone())
        }
    }
}
