#![forbid(unsafe_code)]

//! Epithet public facade crate.
//!
//! Epithet attaches a custom, styled title to character entities: an
//! ordered list of conditional candidates is resolved against the
//! character's runtime state, and the winner is encoded as a compact
//! binary styled-text sequence for the external rendering pipeline.
//!
//! This crate re-exports the common types from the internal crates and
//! drives the per-frame pipeline through [`NameplateGate`]: resolve,
//! encode, and suppress redraws whose byte sequences did not change.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::trace;

// --- Style re-exports ------------------------------------------------------

pub use epithet_style::{
    AnimationStyle, BlendMode, BlobError, FixedClock, GradientDef, GradientError,
    GradientStop, GradientTable, MonotonicClock, Paint, PaintKind, Palette, Rgb,
    TimeSource,
};

// --- Core re-exports -------------------------------------------------------

pub use epithet_core::{
    API_VERSION, CharacterConfig, CharacterId, CharacterSnapshot, Condition,
    ConditionKind, IpcEvent, IpcReply, IpcRequest, LocationFilter, OverrideStore, Role,
    StyleCache, TitleChange, TitleDefinition, TitleError, resolve, validate_title,
};

// --- Text re-exports -------------------------------------------------------

pub use epithet_text::{
    EncodedTitle, Quoting, TitleStyle, decode_chunks, encode, encode_definition,
};

// --- Errors ----------------------------------------------------------------

/// Top-level error type for Epithet hosts.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A gradient definition failed to build.
    Gradient(GradientError),
    /// An imported gradient blob failed to decode.
    Blob(BlobError),
    /// A title string failed validation.
    Title(TitleError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gradient(err) => write!(f, "{err}"),
            Self::Blob(err) => write!(f, "{err}"),
            Self::Title(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<GradientError> for Error {
    fn from(err: GradientError) -> Self {
        Self::Gradient(err)
    }
}

impl From<BlobError> for Error {
    fn from(err: BlobError) -> Self {
        Self::Blob(err)
    }
}

impl From<TitleError> for Error {
    fn from(err: TitleError) -> Self {
        Self::Title(err)
    }
}

/// Standard result type for Epithet APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Nameplate pipeline ----------------------------------------------------

/// Output of one [`NameplateGate::update`] call that requires action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameplateUpdate {
    /// Bytes to inject; an empty sequence clears the nameplate field.
    pub encoded: EncodedTitle,
    /// Whether the plain resolved title (text + prefix flag) differs
    /// from the previous resolution, i.e. whether to broadcast a
    /// [`TitleChange`] notification.
    pub title_changed: bool,
    /// The current plain title, when one resolved.
    pub title: Option<TitleChange>,
}

/// Per-character redraw suppression for the nameplate collaborator.
///
/// The gate remembers the last encoded byte sequence per character and
/// only reports an update when the new sequence differs byte-for-byte,
/// so an unchanged title never causes UI churn. It also tracks the
/// plain resolved title to drive change notifications toward the
/// messaging collaborator.
#[derive(Debug, Default)]
pub struct NameplateGate {
    last_encoded: FxHashMap<CharacterId, EncodedTitle>,
    last_title: FxHashMap<CharacterId, Option<TitleChange>>,
}

impl NameplateGate {
    /// Create an empty gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the pipeline for one character: resolve, encode, and compare
    /// against the previous frame.
    ///
    /// Returns `None` when the encoded bytes are identical to the last
    /// update, in which case the host must not touch the nameplate.
    pub fn update(
        &mut self,
        character: CharacterId,
        config: &CharacterConfig,
        snapshot: &CharacterSnapshot,
        override_title: Option<&TitleDefinition>,
        cache: &mut StyleCache,
        clock: &dyn TimeSource,
    ) -> Option<NameplateUpdate> {
        let resolved = resolve(config, snapshot, override_title);
        let encoded = match resolved {
            Some(def) => encode_definition(def, cache, clock.elapsed_ms(), Quoting::Quoted),
            None => EncodedTitle::empty(),
        };

        if self.last_encoded.get(&character) == Some(&encoded) {
            trace!(character = character.0, "nameplate unchanged");
            return None;
        }
        self.last_encoded.insert(character, encoded.clone());

        let title = resolved.map(|def| TitleChange {
            text: def.text.clone(),
            is_prefix: def.is_prefix,
        });
        let title_changed = self.last_title.get(&character) != Some(&title);
        if title_changed {
            self.last_title.insert(character, title.clone());
        }

        Some(NameplateUpdate {
            encoded,
            title_changed,
            title,
        })
    }

    /// Drop all remembered state for a character (e.g. on despawn).
    pub fn forget(&mut self, character: CharacterId) {
        self.last_encoded.remove(&character);
        self.last_title.remove(&character);
    }

    /// Drop all remembered state.
    pub fn clear(&mut self) {
        self.last_encoded.clear();
        self.last_title.clear();
    }
}

// --- Prelude ---------------------------------------------------------------

pub mod prelude {
    //! Day-to-day imports for Epithet hosts.

    pub use crate::{
        CharacterConfig, CharacterId, CharacterSnapshot, Condition, EncodedTitle, Error,
        GradientDef, GradientTable, MonotonicClock, NameplateGate, NameplateUpdate,
        OverrideStore, Palette, Quoting, Result, Rgb, Role, StyleCache, TimeSource,
        TitleChange, TitleDefinition, TitleStyle, encode, resolve,
    };

    pub use crate::{core, style, text};
}

pub use epithet_core as core;
pub use epithet_style as style;
pub use epithet_text as text;
