//! Message vocabulary for the external messaging collaborator.
//!
//! Other plugins assign, clear, and query titles over the host's
//! message-passing layer; this module is the typed vocabulary only, the
//! transport belongs to the host. Requests are answered by
//! [`crate::overrides::OverrideStore::handle`].

use serde::{Deserialize, Serialize};

use crate::condition::CharacterId;
use crate::config::TitleDefinition;

/// Negotiated interface version. Peers seeing a different major value
/// must not send assignments.
pub const API_VERSION: u32 = 1;

/// Payload broadcast when a character's resolved title changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleChange {
    /// Plain title text (no styling).
    pub text: String,
    /// Whether the title renders before the character name.
    pub is_prefix: bool,
}

/// Requests another process may send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpcRequest {
    /// Assign an override title to a character.
    SetTitle {
        /// Target character.
        character: CharacterId,
        /// Title to display.
        title: TitleDefinition,
    },
    /// Remove a character's override.
    ClearTitle {
        /// Target character.
        character: CharacterId,
    },
    /// Read back a character's current override.
    QueryTitle {
        /// Target character.
        character: CharacterId,
    },
    /// Version negotiation.
    ApiVersion,
}

/// Replies to [`IpcRequest`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpcReply {
    /// The request was applied.
    Ack,
    /// The current override, if any.
    Title {
        /// Current override.
        title: Option<TitleDefinition>,
    },
    /// The negotiated interface version.
    ApiVersion {
        /// Version constant of the answering side.
        version: u32,
    },
    /// The request was rejected.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

/// Unsolicited notifications emitted toward other processes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpcEvent {
    /// The title system is initialized and accepting assignments.
    Ready,
    /// The title system is shutting down; assignments will be dropped.
    Disposing,
    /// A character's locally-resolved title changed.
    TitleChanged {
        /// The character whose title changed.
        character: CharacterId,
        /// The new plain title.
        change: TitleChange,
    },
}
