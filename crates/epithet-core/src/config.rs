//! Title definitions and per-character configuration.
//!
//! A [`CharacterConfig`] owns an ordered list of conditional title
//! candidates plus one always-present default title. Stored order is
//! priority order; reordering is an explicit user operation. The config
//! maintains one invariant across every mutation: at most one enabled
//! candidate per (condition kind, primary parameter) pair.
//!
//! Persistence is the host's concern; everything here derives serde and
//! [`CharacterConfig::normalize`] re-establishes the invariants after
//! deserializing data from an older or hand-edited file.

use std::fmt;

use serde::{Deserialize, Serialize};

use epithet_style::{Palette, Rgb};

use crate::condition::{Condition, ConditionKind};

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 32;

/// Why a title string is invalid. Resolution still returns such a title,
/// but the encoder refuses to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleError {
    /// The title exceeds [`MAX_TITLE_LEN`] characters.
    TooLong {
        /// Actual character count.
        len: usize,
        /// The limit it exceeds.
        max: usize,
    },
    /// The title contains a control character.
    ControlCharacter {
        /// Character index of the first offender.
        index: usize,
    },
}

impl fmt::Display for TitleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { len, max } => {
                write!(f, "title is {len} characters, the maximum is {max}")
            }
            Self::ControlCharacter { index } => {
                write!(f, "title contains a control character at index {index}")
            }
        }
    }
}

impl std::error::Error for TitleError {}

/// Validate a title string: bounded length, no control characters.
pub fn validate_title(text: &str) -> Result<(), TitleError> {
    let len = text.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(TitleError::TooLong { len, max: MAX_TITLE_LEN });
    }
    if let Some(index) = text.chars().position(char::is_control) {
        return Err(TitleError::ControlCharacter { index });
    }
    Ok(())
}

/// One conditionally-applicable styled title, owned by a single
/// [`CharacterConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDefinition {
    /// Unique id within the owning config.
    pub id: u64,
    /// Display string.
    pub text: String,
    /// Render before the character name instead of after it.
    pub is_prefix: bool,
    /// Single color for the whole title.
    pub color: Option<Rgb>,
    /// Single glow color for the whole title.
    pub glow: Option<Rgb>,
    /// Per-segment paint rules; takes precedence over `color`.
    pub palette: Option<Palette>,
    /// Id of a gradient definition in the style cache; takes precedence
    /// over `palette` and `color`.
    pub gradient: Option<u64>,
    /// Whether this candidate participates in resolution.
    pub enabled: bool,
    /// Predicate gating applicability.
    pub condition: Condition,
}

impl TitleDefinition {
    /// Create a plain, enabled, unconditional definition.
    #[must_use]
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            is_prefix: false,
            color: None,
            glow: None,
            palette: None,
            gradient: None,
            enabled: true,
            condition: Condition::None,
        }
    }

    /// Validate the display string.
    pub fn validate(&self) -> Result<(), TitleError> {
        validate_title(&self.text)
    }

    /// Whether the display string is renderable.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// The enable-exclusivity key.
    #[must_use]
    pub fn exclusivity_key(&self) -> (ConditionKind, u32) {
        (self.condition.kind(), self.condition.primary_param())
    }
}

/// Ordered title candidates plus the default title for one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterConfig {
    titles: Vec<TitleDefinition>,
    default_title: TitleDefinition,
}

impl CharacterConfig {
    /// Create a config whose default title shows `default_text`.
    #[must_use]
    pub fn new(default_text: impl Into<String>) -> Self {
        Self {
            titles: Vec::new(),
            default_title: TitleDefinition::new(0, default_text),
        }
    }

    /// The candidate list in priority order.
    #[must_use]
    pub fn titles(&self) -> &[TitleDefinition] {
        &self.titles
    }

    /// The always-present default title.
    #[must_use]
    pub fn default_title(&self) -> &TitleDefinition {
        &self.default_title
    }

    /// Mutable access to the default title. Its condition is pinned to
    /// [`Condition::None`] by [`Self::normalize`] and the setters here.
    pub fn default_title_mut(&mut self) -> &mut TitleDefinition {
        &mut self.default_title
    }

    /// Append a candidate at the lowest priority. An enabled candidate
    /// disables any sibling sharing its exclusivity key.
    pub fn push(&mut self, title: TitleDefinition) {
        if title.enabled {
            self.disable_key_siblings(title.exclusivity_key(), usize::MAX);
        }
        self.titles.push(title);
    }

    /// Remove the candidate at `index`, returning it.
    pub fn remove(&mut self, index: usize) -> Option<TitleDefinition> {
        if index < self.titles.len() {
            Some(self.titles.remove(index))
        } else {
            None
        }
    }

    /// Mutable access to one candidate.
    ///
    /// Callers editing `enabled` directly must go through
    /// [`Self::set_enabled`] instead; this accessor is for editing text
    /// and style fields.
    pub fn title_mut(&mut self, index: usize) -> Option<&mut TitleDefinition> {
        self.titles.get_mut(index)
    }

    /// Enable or disable the candidate at `index`. Enabling atomically
    /// disables every other enabled candidate sharing the same
    /// (condition kind, primary parameter) pair.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) {
        let Some(title) = self.titles.get(index) else {
            return;
        };
        if enabled {
            let key = title.exclusivity_key();
            self.disable_key_siblings(key, index);
        }
        self.titles[index].enabled = enabled;
    }

    /// Raise the candidate at `index` one step in priority.
    pub fn move_up(&mut self, index: usize) {
        if index > 0 && index < self.titles.len() {
            self.titles.swap(index - 1, index);
        }
    }

    /// Lower the candidate at `index` one step in priority.
    pub fn move_down(&mut self, index: usize) {
        if index + 1 < self.titles.len() {
            self.titles.swap(index, index + 1);
        }
    }

    /// Re-establish invariants after deserialization: the default title
    /// is pinned to [`Condition::None`], and for each exclusivity key
    /// only the first enabled candidate stays enabled.
    pub fn normalize(&mut self) {
        self.default_title.condition = Condition::None;
        let mut seen: Vec<(ConditionKind, u32)> = Vec::new();
        for title in &mut self.titles {
            if !title.enabled {
                continue;
            }
            let key = title.exclusivity_key();
            if seen.contains(&key) {
                title.enabled = false;
            } else {
                seen.push(key);
            }
        }
    }

    fn disable_key_siblings(&mut self, key: (ConditionKind, u32), keep: usize) {
        for (i, other) in self.titles.iter_mut().enumerate() {
            if i != keep && other.enabled && other.exclusivity_key() == key {
                other.enabled = false;
            }
        }
    }
}


#[cfg(test)]
mod invariant_props {
    use super::*;
    use proptest::prelude::*;

    fn arb_condition() -> impl Strategy<Value = Condition> {
        prop_oneof![
            Just(Condition::None),
            (0u32..8).prop_map(Condition::ClassJob),
            (0u32..8).prop_map(Condition::GearSet),
            (0u32..8).prop_map(Condition::TitleId),
        ]
    }

    fn at_most_one_enabled_per_key(config: &CharacterConfig) -> bool {
        let mut seen = std::collections::HashSet::new();
        config
            .titles()
            .iter()
            .filter(|t| t.enabled)
            .all(|t| seen.insert(t.exclusivity_key()))
    }

    proptest! {
        #[test]
        fn exclusivity_holds_after_any_mutation_sequence(
            conditions in proptest::collection::vec(arb_condition(), 1..8),
            toggles in proptest::collection::vec((0usize..8, any::<bool>()), 0..16),
        ) {
            let mut config = CharacterConfig::new("Adventurer");
            for (id, condition) in conditions.iter().enumerate() {
                let mut def = TitleDefinition::new(id as u64, format!("t{id}"));
                def.condition = *condition;
                config.push(def);
                prop_assert!(at_most_one_enabled_per_key(&config));
            }
            for (index, enabled) in toggles {
                config.set_enabled(index % conditions.len(), enabled);
                prop_assert!(at_most_one_enabled_per_key(&config));
            }
        }
    }
}
