#![forbid(unsafe_code)]

//! Title data model, condition evaluation, and resolution for Epithet.
//!
//! A character owns a [`CharacterConfig`]: an ordered list of
//! conditional title candidates plus a default. Each frame the host
//! captures a [`CharacterSnapshot`] and calls [`resolve`], which applies
//! the first-match priority scan (or an external override) and hands the
//! winning [`TitleDefinition`] to the encoder.
//!
//! # Example
//! ```
//! use epithet_core::{
//!     CharacterConfig, CharacterSnapshot, Condition, Role, TitleDefinition, resolve,
//! };
//!
//! let mut config = CharacterConfig::new("Adventurer");
//! let mut protector = TitleDefinition::new(1, "Protector");
//! protector.condition = Condition::JobRole(Role::Tank);
//! config.push(protector);
//!
//! let snapshot = CharacterSnapshot {
//!     is_local_player: true,
//!     class_job: 19,
//!     role: Role::Tank,
//!     gear_set: None,
//!     title_id: 0,
//!     territory: 0,
//!     ward: None,
//!     plot: None,
//!     room: None,
//! };
//! let resolved = resolve(&config, &snapshot, None).unwrap();
//! assert_eq!(resolved.text, "Protector");
//! ```

pub mod cache;
pub mod condition;
pub mod config;
pub mod ipc;
pub mod overrides;
pub mod resolve;

pub use cache::StyleCache;
pub use condition::{
    CharacterId, CharacterSnapshot, Condition, ConditionKind, HOUSING_TERRITORIES,
    LocationFilter, Role,
};
pub use config::{
    CharacterConfig, MAX_TITLE_LEN, TitleDefinition, TitleError, validate_title,
};
pub use ipc::{API_VERSION, IpcEvent, IpcReply, IpcRequest, TitleChange};
pub use overrides::OverrideStore;
pub use resolve::resolve;
