//! Runtime snapshots and the condition evaluator.
//!
//! A [`Condition`] is a closed tagged predicate gating a title
//! candidate's applicability. Evaluation is a pure exhaustive match over
//! a [`CharacterSnapshot`] supplied by the host once per resolution
//! call; missing data yields a non-match, never an error.

use serde::{Deserialize, Serialize};

/// Opaque character identity. Epithet does not model game-world
/// identification beyond this key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub u64);

/// Combat-role classification of a job. Derived externally from per-job
/// combat data; the evaluator only compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Role {
    /// No role; a condition on this never matches.
    None = 0,
    /// Tank.
    Tank = 1,
    /// Healer.
    Healer = 2,
    /// Melee DPS.
    Melee = 3,
    /// Physical ranged DPS.
    RangedPhysical = 4,
    /// Magical ranged DPS.
    RangedMagical = 5,
    /// Crafter.
    Crafter = 6,
    /// Gatherer.
    Gatherer = 7,
}

/// A character's current runtime state, captured by the host for one
/// resolution call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    /// Whether this snapshot describes the local player. Gearset data is
    /// only meaningful when set.
    pub is_local_player: bool,
    /// Current class/job id.
    pub class_job: u32,
    /// Role classification of the current job.
    pub role: Role,
    /// Current gearset index; populated only for the local player.
    pub gear_set: Option<u32>,
    /// Native title id currently displayed.
    pub title_id: u32,
    /// Current territory id.
    pub territory: u16,
    /// Housing ward, when in one.
    pub ward: Option<u16>,
    /// Housing plot, when on one.
    pub plot: Option<u16>,
    /// Housing room, when in one.
    pub room: Option<u16>,
}

/// Location data for a [`Condition::Location`]. Fields below the first
/// unset optional are ignored: a filter with no ward matches any ward in
/// the territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFilter {
    /// Territory id that must match.
    pub territory: u16,
    /// Ward that must match, if set.
    pub ward: Option<u16>,
    /// Plot that must match, if set.
    pub plot: Option<u16>,
    /// Room that must match, if set.
    pub room: Option<u16>,
}

/// Territory ids of the housing districts where plot/room refinement
/// applies. Outside this list a location match is territory/ward only.
pub const HOUSING_TERRITORIES: [u16; 5] = [339, 340, 341, 641, 979];

/// Predicate kinds, used as half of the enable-exclusivity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    /// Always applicable.
    None,
    /// Current class/job.
    ClassJob,
    /// Current job role.
    JobRole,
    /// Current gearset (local player only).
    GearSet,
    /// Native title currently displayed.
    TitleId,
    /// Current location.
    Location,
}

/// A tagged predicate gating one title candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// Always true.
    None,
    /// True while the given class/job is active.
    ClassJob(u32),
    /// True while a job of the given role is active.
    JobRole(Role),
    /// True while the local player has the given gearset equipped.
    GearSet(u32),
    /// True while the given native title is displayed.
    TitleId(u32),
    /// True while inside the described location. A missing filter never
    /// matches.
    Location(Option<LocationFilter>),
}

impl Condition {
    /// Evaluate this condition against a snapshot.
    #[must_use]
    pub fn matches(&self, snapshot: &CharacterSnapshot) -> bool {
        match *self {
            Self::None => true,
            Self::ClassJob(id) => snapshot.class_job == id,
            Self::JobRole(Role::None) => false,
            Self::JobRole(role) => snapshot.role == role,
            Self::GearSet(index) => {
                snapshot.is_local_player && snapshot.gear_set == Some(index)
            }
            Self::TitleId(id) => snapshot.title_id == id,
            Self::Location(None) => false,
            Self::Location(Some(filter)) => location_matches(&filter, snapshot),
        }
    }

    /// The predicate kind.
    #[must_use]
    pub const fn kind(&self) -> ConditionKind {
        match self {
            Self::None => ConditionKind::None,
            Self::ClassJob(_) => ConditionKind::ClassJob,
            Self::JobRole(_) => ConditionKind::JobRole,
            Self::GearSet(_) => ConditionKind::GearSet,
            Self::TitleId(_) => ConditionKind::TitleId,
            Self::Location(_) => ConditionKind::Location,
        }
    }

    /// The primary integer parameter, paired with [`Self::kind`] as the
    /// enable-exclusivity key: two enabled candidates never share a
    /// (kind, parameter) pair.
    #[must_use]
    pub fn primary_param(&self) -> u32 {
        match *self {
            Self::None => 0,
            Self::ClassJob(id) => id,
            Self::JobRole(role) => role as u32,
            Self::GearSet(index) => index,
            Self::TitleId(id) => id,
            Self::Location(filter) => {
                filter.map_or(0, |f| u32::from(f.territory))
            }
        }
    }
}

fn location_matches(filter: &LocationFilter, snapshot: &CharacterSnapshot) -> bool {
    if snapshot.territory != filter.territory {
        return false;
    }
    let Some(ward) = filter.ward else {
        return true;
    };
    if snapshot.ward != Some(ward) {
        return false;
    }
    // Plot/room refinement only exists in the housing districts.
    if !HOUSING_TERRITORIES.contains(&filter.territory) {
        return true;
    }
    let Some(plot) = filter.plot else {
        return true;
    };
    if snapshot.plot != Some(plot) {
        return false;
    }
    let Some(room) = filter.room else {
        return true;
    };
    snapshot.room == Some(room)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> CharacterSnapshot {
        CharacterSnapshot {
            is_local_player: true,
            class_job: 19,
            role: Role::Tank,
            gear_set: Some(4),
            title_id: 250,
            territory: 339,
            ward: Some(12),
            plot: Some(30),
            room: None,
        }
    }

    #[test]
    fn none_always_matches() {
        assert!(Condition::None.matches(&snapshot()));
    }

    #[test]
    fn class_job_compares_id() {
        assert!(Condition::ClassJob(19).matches(&snapshot()));
        assert!(!Condition::ClassJob(1).matches(&snapshot()));
    }

    #[test]
    fn role_none_never_matches() {
        let mut snap = snapshot();
        snap.role = Role::None;
        assert!(!Condition::JobRole(Role::None).matches(&snap));
    }

    #[test]
    fn role_compares_classification() {
        assert!(Condition::JobRole(Role::Tank).matches(&snapshot()));
        assert!(!Condition::JobRole(Role::Healer).matches(&snapshot()));
    }

    #[test]
    fn gearset_requires_local_player() {
        assert!(Condition::GearSet(4).matches(&snapshot()));

        let mut remote = snapshot();
        remote.is_local_player = false;
        assert!(!Condition::GearSet(4).matches(&remote));

        let mut unknown = snapshot();
        unknown.gear_set = None;
        assert!(!Condition::GearSet(4).matches(&unknown));
    }

    #[test]
    fn title_id_compares_native_title() {
        assert!(Condition::TitleId(250).matches(&snapshot()));
        assert!(!Condition::TitleId(251).matches(&snapshot()));
    }

    #[test]
    fn location_without_filter_never_matches() {
        assert!(!Condition::Location(None).matches(&snapshot()));
    }

    #[test]
    fn location_territory_only() {
        let cond = Condition::Location(Some(LocationFilter {
            territory: 339,
            ward: None,
            plot: None,
            room: None,
        }));
        assert!(cond.matches(&snapshot()));

        let mut elsewhere = snapshot();
        elsewhere.territory = 128;
        assert!(!cond.matches(&elsewhere));
    }

    #[test]
    fn location_refines_progressively() {
        let cond = Condition::Location(Some(LocationFilter {
            territory: 339,
            ward: Some(12),
            plot: Some(30),
            room: None,
        }));
        assert!(cond.matches(&snapshot()));

        let mut wrong_ward = snapshot();
        wrong_ward.ward = Some(13);
        assert!(!cond.matches(&wrong_ward));

        let mut wrong_plot = snapshot();
        wrong_plot.plot = Some(31);
        assert!(!cond.matches(&wrong_plot));
    }

    #[test]
    fn absent_filter_fields_match_anything() {
        let cond = Condition::Location(Some(LocationFilter {
            territory: 339,
            ward: Some(12),
            plot: None,
            room: None,
        }));
        let mut snap = snapshot();
        snap.plot = Some(60);
        snap.room = Some(3);
        assert!(cond.matches(&snap));
    }

    #[test]
    fn plot_check_is_skipped_outside_housing_districts() {
        let cond = Condition::Location(Some(LocationFilter {
            territory: 128,
            ward: Some(1),
            plot: Some(5),
            room: None,
        }));
        let mut snap = snapshot();
        snap.territory = 128;
        snap.ward = Some(1);
        snap.plot = Some(99); // Would fail the plot check if it applied.
        assert!(cond.matches(&snap));
    }

    #[test]
    fn exclusivity_key_uses_primary_param() {
        assert_eq!(Condition::ClassJob(19).primary_param(), 19);
        assert_eq!(Condition::JobRole(Role::Healer).primary_param(), 2);
        assert_eq!(Condition::None.primary_param(), 0);
        let location = Condition::Location(Some(LocationFilter {
            territory: 641,
            ward: Some(3),
            plot: None,
            room: None,
        }));
        assert_eq!(location.primary_param(), 641);
        assert_eq!(location.kind(), ConditionKind::Location);
    }
}
