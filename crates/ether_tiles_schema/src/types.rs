//! Property definitions and the builtin property table

use ether_tiles_core::PropertyType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A recognized tile property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    /// Canonical type after normalization
    #[serde(default)]
    pub prop_type: PropertyType,
    /// Flags of which at least one must be set for this property to mean anything
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, prop_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            prop_type,
            requires: Vec::new(),
            description: None,
        }
    }

    pub fn requires(mut self, flags: &[&str]) -> Self {
        self.requires = flags.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Table of recognized properties, keyed by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySchema {
    properties: BTreeMap<String, PropertyDef>,
}

impl PropertySchema {
    /// Schema with no recognized properties
    pub fn empty() -> Self {
        Self::default()
    }

    /// The properties the platformer's tilesets use
    pub fn builtin() -> Self {
        use PropertyType::{Bool, Float, Int};

        let defs = [
            PropertyDef::new("collidable", Bool).describe("Blocks entity movement"),
            PropertyDef::new("ground", Bool).describe("Standable terrain"),
            PropertyDef::new("collectable", Bool).describe("Picked up on touch"),
            PropertyDef::new("healing", Bool).describe("Restores health, then recharges"),
            PropertyDef::new("fall", Bool).describe("Gives way after a delay"),
            PropertyDef::new("fall_on_stand", Bool).requires(&["fall"]),
            PropertyDef::new("fall_on_pass_under", Bool).requires(&["fall"]),
            PropertyDef::new("respawn_time", Float)
                .requires(&["fall", "healing"])
                .describe("Seconds until the tile returns"),
            PropertyDef::new("damage", Float),
            PropertyDef::new("knockback", Float),
            PropertyDef::new("platform", Bool).describe("Passable from below"),
            PropertyDef::new("breakable", Bool),
            PropertyDef::new("enemy", Bool).describe("Spawns an actor"),
            PropertyDef::new("health", Int).requires(&["enemy", "breakable"]),
            PropertyDef::new("type", PropertyType::String)
                .requires(&["enemy"])
                .describe("Actor class name"),
            PropertyDef::new("player_spawn", Bool),
        ];

        let mut schema = Self::empty();
        for def in defs {
            schema.insert(def);
        }
        schema
    }

    /// Add or replace a definition
    pub fn insert(&mut self, def: PropertyDef) {
        self.properties.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyDef> {
        self.properties.values()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
