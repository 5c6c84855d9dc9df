//! Collision data derived from tile behavior
//!
//! - `CollisionShape` - None or the full tile box
//! - `OneWayDirection` - Side a one-way tile can be passed from
//! - `CollisionData` - Shape, one-way direction and contact damage

use serde::{Deserialize, Serialize};

use crate::TileBehavior;

/// Collision shape of a tile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CollisionShape {
    /// No collision
    #[default]
    None,
    /// Full tile bounding box
    Full,
}

impl CollisionShape {
    /// Check if this shape has collision
    pub fn has_collision(&self) -> bool {
        !matches!(self, CollisionShape::None)
    }
}

/// Direction for one-way tiles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OneWayDirection {
    /// Solid from all sides
    #[default]
    None,
    /// Pass through from below, land on top
    Top,
}

impl OneWayDirection {
    pub fn is_one_way(&self) -> bool {
        !matches!(self, OneWayDirection::None)
    }
}

/// How an engine should collide with a tile
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CollisionData {
    #[serde(default)]
    pub shape: CollisionShape,
    #[serde(default)]
    pub one_way: OneWayDirection,
    /// Damage applied on touch, for hazards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_damage: Option<f64>,
    /// Knockback applied together with contact damage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knockback: Option<f64>,
}

impl CollisionData {
    pub fn new(shape: CollisionShape) -> Self {
        Self {
            shape,
            ..Default::default()
        }
    }

    /// Solid full tile
    pub fn full() -> Self {
        Self::new(CollisionShape::Full)
    }

    pub fn none() -> Self {
        Self::new(CollisionShape::None)
    }

    /// Full tile that can only be landed on from above
    pub fn one_way_top() -> Self {
        Self::full().with_one_way(OneWayDirection::Top)
    }

    /// Derive collision for a classified tile
    pub fn for_behavior(behavior: &TileBehavior) -> Self {
        match behavior {
            TileBehavior::Static(tile) if tile.collidable => {
                let mut data = Self::full();
                data.contact_damage = tile.damage.filter(|d| *d > 0.0);
                data.knockback = data.contact_damage.and(tile.knockback);
                data
            }
            TileBehavior::Static(tile) if tile.platform => Self::one_way_top(),
            TileBehavior::Breakable(tile) if tile.collidable => Self::full(),
            TileBehavior::Falling(_) => Self::one_way_top(),
            _ => Self::none(),
        }
    }

    pub fn has_collision(&self) -> bool {
        self.shape.has_collision()
    }

    pub fn is_one_way(&self) -> bool {
        self.one_way.is_one_way()
    }

    pub fn with_one_way(mut self, one_way: OneWayDirection) -> Self {
        self.one_way = one_way;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.has_collision()
    }
}
