//! Behavior tags and capability-specific data

use serde::{Deserialize, Serialize};

/// What kind of entity a character is
///
/// Combat and progression never branch on this tag except for enemy
/// rewards and despawn timers, which live in [`EnemyProfile`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    #[default]
    Player,
    Enemy(EnemyProfile),
    Npc(NpcProfile),
}

impl EntityKind {
    pub fn enemy_profile(&self) -> Option<&EnemyProfile> {
        match self {
            EntityKind::Enemy(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, EntityKind::Player)
    }
}

/// Movement/targeting behavior an external AI driver applies to an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiProfile {
    #[default]
    Passive,
    Aggressive,
    Patrol,
    Boss,
}

/// Enemy-only data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    /// Experience granted to whoever downs this enemy
    #[serde(default = "default_exp_reward")]
    pub exp_reward: u64,
    /// Seconds between being downed and being despawned
    #[serde(default = "default_respawn_time")]
    pub respawn_time: f64,
    #[serde(default)]
    pub ai: AiProfile,
    #[serde(default = "default_aggro_range")]
    pub aggro_range: f64,
    #[serde(default)]
    pub is_boss: bool,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        EnemyProfile {
            exp_reward: default_exp_reward(),
            respawn_time: default_respawn_time(),
            ai: AiProfile::default(),
            aggro_range: default_aggro_range(),
            is_boss: false,
        }
    }
}

fn default_exp_reward() -> u64 {
    50
}
fn default_respawn_time() -> f64 {
    30.0
}
fn default_aggro_range() -> f64 {
    200.0
}

/// NPC-only data (shops and dialog are driven outside the combat core)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NpcProfile {
    #[serde(default)]
    pub npc_type: String,
    #[serde(default)]
    pub dialog: Vec<String>,
    #[serde(default)]
    pub shop_items: Vec<String>,
    #[serde(default)]
    pub is_guard: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enemy_kind() {
        let toml = r#"
type = "enemy"
exp_reward = 80
ai = "aggressive"
"#;
        let kind: EntityKind = toml::from_str(toml).unwrap();
        let profile = kind.enemy_profile().unwrap();
        assert_eq!(profile.exp_reward, 80);
        assert_eq!(profile.ai, AiProfile::Aggressive);
        assert!((profile.respawn_time - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_player_has_no_enemy_profile() {
        assert!(EntityKind::Player.enemy_profile().is_none());
        assert!(EntityKind::Player.is_player());
    }
}
