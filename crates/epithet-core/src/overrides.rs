//! Externally-injected title overrides, keyed by character identity.
//!
//! Other processes assign titles through the host's messaging layer; the
//! store keeps the current assignment per character and answers the
//! request vocabulary in [`crate::ipc`]. An override, once set, bypasses
//! the character's local configuration (see [`crate::resolve`]).

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::condition::CharacterId;
use crate::config::{TitleDefinition, TitleError};
use crate::ipc::{API_VERSION, IpcReply, IpcRequest};

/// Current externally-assigned title per character.
#[derive(Debug, Default)]
pub struct OverrideStore {
    titles: FxHashMap<CharacterId, TitleDefinition>,
}

impl OverrideStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign an override. Invalid titles are rejected so a malformed
    /// external assignment can never reach the encoder.
    pub fn set(
        &mut self,
        character: CharacterId,
        title: TitleDefinition,
    ) -> Result<(), TitleError> {
        title.validate()?;
        debug!(character = character.0, title = %title.text, "override set");
        self.titles.insert(character, title);
        Ok(())
    }

    /// Clear a character's override, returning the previous assignment.
    pub fn clear(&mut self, character: CharacterId) -> Option<TitleDefinition> {
        let previous = self.titles.remove(&character);
        if previous.is_some() {
            debug!(character = character.0, "override cleared");
        }
        previous
    }

    /// The current override for a character, if any.
    #[must_use]
    pub fn get(&self, character: CharacterId) -> Option<&TitleDefinition> {
        self.titles.get(&character)
    }

    /// Number of characters with an active override.
    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether no overrides are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Answer one request from the messaging collaborator.
    pub fn handle(&mut self, request: IpcRequest) -> IpcReply {
        match request {
            IpcRequest::SetTitle { character, title } => match self.set(character, title) {
                Ok(()) => IpcReply::Ack,
                Err(err) => IpcReply::Error { message: err.to_string() },
            },
            IpcRequest::ClearTitle { character } => {
                self.clear(character);
                IpcReply::Ack
            }
            IpcRequest::QueryTitle { character } => IpcReply::Title {
                title: self.get(character).cloned(),
            },
            IpcRequest::ApiVersion => IpcReply::ApiVersion { version: API_VERSION },
        }
    }
}
