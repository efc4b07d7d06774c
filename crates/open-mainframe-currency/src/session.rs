//! Per-session identity.
//!
//! User and program identifiers used for auditing are captured once, when
//! the session's currency table is created, and travel with it.  Nothing is
//! read from process-wide state, so sessions stay independent.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Identity of one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Conversation (session) name.
    pub conversation_name: String,
    /// User running the conversation.
    pub user_id: String,
    /// Program that opened the conversation.
    pub program_id: String,
    /// Session start, milliseconds since the Unix epoch.
    pub started_at_epoch_ms: u64,
}

impl SessionContext {
    /// Capture a session identity, stamped with the current time.
    pub fn new(conversation_name: &str, user_id: &str, program_id: &str) -> Self {
        let started_at_epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        Self {
            conversation_name: conversation_name.to_string(),
            user_id: user_id.to_string(),
            program_id: program_id.to_string(),
            started_at_epoch_ms,
        }
    }

    /// Session with only a conversation name.
    pub fn named(conversation_name: &str) -> Self {
        Self::new(conversation_name, "", "")
    }
}
