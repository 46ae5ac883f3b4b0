//! Archetype stats, boss profiles and battle variants.

use duel_common::{Side, SkillType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::combatant::{BossProfile, CombatStats, Combatant};

/// Kind of battle being staged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleVariant {
    /// Both combatants walk on from opposite edges.
    #[default]
    Skirmish,
    /// The boss already holds its stance; only the player walks on.
    /// The profile overrides the opponent's stats and fixes its skill.
    Boss(BossProfile),
}

impl BattleVariant {
    /// Whether `side` walks on during the approach.
    #[must_use]
    pub const fn approaches(&self, side: Side) -> bool {
        match self {
            Self::Skirmish => true,
            Self::Boss(_) => matches!(side, Side::Player),
        }
    }

    /// Boss profile, if this is a boss battle.
    #[must_use]
    pub const fn boss(&self) -> Option<&BossProfile> {
        match self {
            Self::Skirmish => None,
            Self::Boss(profile) => Some(profile),
        }
    }
}

/// Battle parameters sourced from content data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    /// Base stats per archetype name
    pub archetypes: BTreeMap<String, CombatStats>,
    /// Boss overrides per boss name
    pub bosses: BTreeMap<String, BossProfile>,
}

impl Default for Roster {
    fn default() -> Self {
        let mut archetypes = BTreeMap::new();
        archetypes.insert("knight".to_string(), CombatStats::new(200, 1000, 100));
        archetypes.insert("ranger".to_string(), CombatStats::new(180, 800, 70));
        archetypes.insert("goblin".to_string(), CombatStats::new(200, 600, 80));

        let mut bosses = BTreeMap::new();
        bosses.insert(
            "ogre_king".to_string(),
            BossProfile {
                name: "ogre_king".to_string(),
                stats: CombatStats::new(200, 600, 120),
                skill: SkillType::FireBlast,
            },
        );
        bosses.insert(
            "storm_witch".to_string(),
            BossProfile {
                name: "storm_witch".to_string(),
                stats: CombatStats::new(240, 900, 60),
                skill: SkillType::LightningBolt,
            },
        );

        Self { archetypes, bosses }
    }
}

impl Roster {
    /// Base stats for an archetype.
    #[must_use]
    pub fn archetype(&self, name: &str) -> Option<&CombatStats> {
        self.archetypes.get(name)
    }

    /// Boss profile by name.
    #[must_use]
    pub fn boss(&self, name: &str) -> Option<&BossProfile> {
        self.bosses.get(name)
    }

    /// Build a combatant from an archetype's base stats.
    #[must_use]
    pub fn combatant(&self, side: Side, archetype: &str) -> Option<Combatant> {
        self.archetype(archetype)
            .map(|stats| Combatant::new(side, archetype, *stats))
    }

    /// Boss battle variant by boss name.
    #[must_use]
    pub fn boss_variant(&self, name: &str) -> Option<BattleVariant> {
        self.boss(name).cloned().map(BattleVariant::Boss)
    }
}
