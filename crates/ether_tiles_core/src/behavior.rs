//! Gameplay classification of tiles
//!
//! A placed tile belongs to exactly one gameplay group. The group is chosen by
//! a fixed precedence over its flags:
//!
//! `player_spawn` > `enemy` > `collectable` > `fall` > `breakable` > `healing` > static.
//!
//! Numeric companions (respawn timers, health) get the level loader's defaults
//! when absent.

use serde::{Deserialize, Serialize};

use crate::TileProperties;

/// Default seconds before a fallen tile reappears
pub const DEFAULT_FALL_RESPAWN_SECS: f64 = 5.0;
/// Default seconds before a used healing tile reactivates
pub const DEFAULT_HEALING_RESPAWN_SECS: f64 = 30.0;
/// Default hit points of a breakable tile
pub const DEFAULT_BREAKABLE_HEALTH: i64 = 1;

/// Enemy spawn descriptor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnemySpawn {
    /// Actor class, e.g. `MeleeGhost`, `RangedGhost`, `EtherJumperBoss`
    pub class: Option<String>,
    pub health: Option<i64>,
    pub damage: Option<f64>,
    pub knockback: Option<f64>,
}

/// A tile that gives way and later respawns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FallingTile {
    /// Starts falling when stood on
    pub on_stand: bool,
    /// Starts falling when something passes underneath
    pub on_pass_under: bool,
    pub respawn_time: f64,
    /// Damage dealt when it lands on something
    pub damage: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreakableTile {
    pub health: i64,
    pub collidable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealingTile {
    pub respawn_time: f64,
}

/// Terrain, hazards and platforms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StaticTile {
    pub collidable: bool,
    pub ground: bool,
    /// Passable from below
    pub platform: bool,
    /// Contact damage
    pub damage: Option<f64>,
    pub knockback: Option<f64>,
}

/// The gameplay group of a tile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TileBehavior {
    /// No declared properties
    #[default]
    Plain,
    PlayerSpawn,
    Enemy(EnemySpawn),
    Collectable,
    Falling(FallingTile),
    Breakable(BreakableTile),
    Healing(HealingTile),
    Static(StaticTile),
}

impl TileBehavior {
    /// Classify a property set
    pub fn classify(props: &TileProperties) -> Self {
        if props.is_empty() {
            return TileBehavior::Plain;
        }

        if props.flag("player_spawn") {
            TileBehavior::PlayerSpawn
        } else if props.flag("enemy") {
            TileBehavior::Enemy(EnemySpawn {
                class: props.get_str("type").map(str::to_string),
                health: props.get_int("health"),
                damage: props.get_float("damage"),
                knockback: props.get_float("knockback"),
            })
        } else if props.flag("collectable") {
            TileBehavior::Collectable
        } else if props.flag("fall") {
            TileBehavior::Falling(FallingTile {
                on_stand: props.flag_or("fall_on_stand", true),
                on_pass_under: props.flag_or("fall_on_pass_under", false),
                respawn_time: props
                    .get_float("respawn_time")
                    .unwrap_or(DEFAULT_FALL_RESPAWN_SECS),
                damage: props.get_float("damage"),
            })
        } else if props.flag("breakable") {
            TileBehavior::Breakable(BreakableTile {
                health: props.get_int("health").unwrap_or(DEFAULT_BREAKABLE_HEALTH),
                collidable: props.flag_or("collidable", true),
            })
        } else if props.flag("healing") {
            TileBehavior::Healing(HealingTile {
                respawn_time: props
                    .get_float("respawn_time")
                    .unwrap_or(DEFAULT_HEALING_RESPAWN_SECS),
            })
        } else {
            TileBehavior::Static(StaticTile {
                collidable: props.flag("collidable"),
                ground: props.flag("ground"),
                platform: props.flag("platform"),
                damage: props.get_float("damage"),
                knockback: props.get_float("knockback"),
            })
        }
    }

    /// Short name used in logs and tool output
    pub fn name(&self) -> &'static str {
        match self {
            TileBehavior::Plain => "plain",
            TileBehavior::PlayerSpawn => "player_spawn",
            TileBehavior::Enemy(_) => "enemy",
            TileBehavior::Collectable => "collectable",
            TileBehavior::Falling(_) => "falling",
            TileBehavior::Breakable(_) => "breakable",
            TileBehavior::Healing(_) => "healing",
            TileBehavior::Static(_) => "static",
        }
    }

    /// Whether this tile blocks movement from every side
    pub fn is_solid(&self) -> bool {
        match self {
            TileBehavior::Static(s) => s.collidable,
            TileBehavior::Breakable(b) => b.collidable,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_plain() {
        assert_eq!(TileBehavior::classify(&TileProperties::new()), TileBehavior::Plain);
    }

    #[test]
    fn test_enemy_descriptor() {
        let props = TileProperties::new()
            .with("damage", 1)
            .with("enemy", true)
            .with("health", 3)
            .with("type", "RangedGhost");
        assert_eq!(
            TileBehavior::classify(&props),
            TileBehavior::Enemy(EnemySpawn {
                class: Some("RangedGhost".to_string()),
                health: Some(3),
                damage: Some(1.0),
                knockback: None,
            })
        );
    }

    #[test]
    fn test_falling_defaults() {
        let props = TileProperties::new()
            .with("damage", 1.0)
            .with("fall", true)
            .with("fall_on_pass_under", true);
        let TileBehavior::Falling(falling) = TileBehavior::classify(&props) else {
            panic!("expected falling tile");
        };
        assert!(falling.on_stand);
        assert!(falling.on_pass_under);
        assert_eq!(falling.respawn_time, DEFAULT_FALL_RESPAWN_SECS);
        assert_eq!(falling.damage, Some(1.0));
    }

    #[test]
    fn test_healing_respawn() {
        let default = TileProperties::new().with("healing", true);
        let custom = TileProperties::new()
            .with("healing", true)
            .with("respawn_time", 15.0);
        assert_eq!(
            TileBehavior::classify(&default),
            TileBehavior::Healing(HealingTile { respawn_time: 30.0 })
        );
        assert_eq!(
            TileBehavior::classify(&custom),
            TileBehavior::Healing(HealingTile { respawn_time: 15.0 })
        );
    }

    #[test]
    fn test_breakable_defaults_to_solid() {
        let props = TileProperties::new().with("breakable", true);
        let behavior = TileBehavior::classify(&props);
        assert_eq!(
            behavior,
            TileBehavior::Breakable(BreakableTile {
                health: 1,
                collidable: true
            })
        );
        assert!(behavior.is_solid());
    }

    #[test]
    fn test_precedence() {
        // enemy wins over collectable, fall wins over breakable
        let props = TileProperties::new()
            .with("collectable", true)
            .with("enemy", true);
        assert_eq!(TileBehavior::classify(&props).name(), "enemy");

        let props = TileProperties::new()
            .with("breakable", true)
            .with("fall", true);
        assert_eq!(TileBehavior::classify(&props).name(), "falling");

        let props = TileProperties::new()
            .with("player_spawn", true)
            .with("enemy", true);
        assert_eq!(TileBehavior::classify(&props), TileBehavior::PlayerSpawn);
    }

    #[test]
    fn test_false_flags_fall_through_to_static() {
        let props = TileProperties::new()
            .with("enemy", false)
            .with("ground", true);
        assert_eq!(
            TileBehavior::classify(&props),
            TileBehavior::Static(StaticTile {
                ground: true,
                ..Default::default()
            })
        );
    }
}
