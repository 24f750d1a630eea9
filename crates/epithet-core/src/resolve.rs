//! Title resolution: pick at most one applicable title for a character.
//!
//! Resolution is a first-match scan in stored order; the candidate
//! list's order is itself the priority ranking. An externally-injected
//! override bypasses local configuration entirely.

use tracing::trace;

use crate::condition::{CharacterSnapshot, ConditionKind};
use crate::config::{CharacterConfig, TitleDefinition};

/// Resolve the title to display for one character.
///
/// 1. An override, when present, wins unconditionally.
/// 2. Otherwise the first enabled candidate (in stored order) whose
///    condition is not `None` and matches the snapshot wins.
/// 3. Otherwise the default title, when enabled.
/// 4. Otherwise no title is displayed.
///
/// Deterministic: identical config and snapshot always resolve to the
/// same candidate.
#[must_use]
pub fn resolve<'a>(
    config: &'a CharacterConfig,
    snapshot: &CharacterSnapshot,
    override_title: Option<&'a TitleDefinition>,
) -> Option<&'a TitleDefinition> {
    if let Some(title) = override_title {
        trace!(title = %title.text, "resolved via override");
        return Some(title);
    }

    for candidate in config.titles() {
        if !candidate.enabled || candidate.condition.kind() == ConditionKind::None {
            continue;
        }
        if candidate.condition.matches(snapshot) {
            trace!(id = candidate.id, title = %candidate.text, "resolved candidate");
            return Some(candidate);
        }
    }

    if config.default_title().enabled {
        trace!("resolved to default title");
        return Some(config.default_title());
    }
    trace!("no title resolved");
    None
}
