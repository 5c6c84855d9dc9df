use ether_tiles_core::{
    CollisionShape, OneWayDirection, PropertyValue, TileBehavior, TilesetError,
};
use ether_tiles_tiled::{load_tileset, parse_tileset, write_tileset, Tileset, TilesetLoader};
use std::path::PathBuf;

const DECLARED: [u32; 24] = [
    8, 10, 12, 14, 15, 23, 24, 26, 28, 30, 40, 41, 42, 44, 45, 46, 47, 59, 60, 61, 62, 63, 71, 72,
];

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn sample() -> Tileset {
    load_tileset(&fixture("32-32.tsx")).unwrap()
}

#[test]
fn test_header() {
    let tileset = sample();
    assert_eq!(tileset.name, "32-32");
    assert_eq!((tileset.tile_width, tileset.tile_height), (32, 32));
    assert_eq!(tileset.tile_count, 80);
    assert_eq!(tileset.columns, 8);
    assert_eq!(tileset.rows(), 10);
    assert_eq!(tileset.image.source, "32-32.png");
    assert_eq!(tileset.tiled_version.as_deref(), Some("1.11.2"));
    assert_eq!(tileset.tiles.len(), DECLARED.len());
}

#[test]
fn test_plain_tiles_are_empty() {
    let tileset = sample();
    for id in (0..80).filter(|id| !DECLARED.contains(id)) {
        assert!(tileset.properties_of(id).unwrap().is_empty(), "tile {}", id);
    }
}

#[test]
fn test_ground_tile() {
    let tileset = sample();
    assert!(tileset.is_collidable(8).unwrap());
    assert!(tileset.is_ground(8).unwrap());
    assert!(!tileset.is_platform(8).unwrap());
    assert!(!tileset.is_fall(8).unwrap());
}

#[test]
fn test_melee_ghost() {
    let tileset = sample();
    let props = tileset.properties_of(62).unwrap();
    assert_eq!(props.len(), 4);
    assert_eq!(props.get_str("type"), Some("MeleeGhost"));
    assert_eq!(props.get("health"), Some(&PropertyValue::Int(3)));
    // tagged int in the document, normalized by the schema
    assert_eq!(props.get("damage"), Some(&PropertyValue::Float(1.0)));
    assert_eq!(props.get("enemy"), Some(&PropertyValue::Bool(true)));
    assert_eq!(tileset.actor_type(62).unwrap(), Some("MeleeGhost"));
}

#[test]
fn test_out_of_range() {
    let tileset = sample();
    let err = tileset.properties_of(80).unwrap_err();
    assert!(matches!(
        err,
        TilesetError::OutOfRange {
            id: 80,
            tile_count: 80
        }
    ));
    assert!(tileset.is_collidable(80).is_err());
    assert!(tileset.properties_of(79).is_ok());
}

#[test]
fn test_bools_are_typed() {
    let tileset = sample();
    let props = tileset.properties_of(72).unwrap();
    assert_eq!(props.get("breakable"), Some(&PropertyValue::Bool(true)));
    assert_ne!(
        props.get("breakable"),
        Some(&PropertyValue::String("true".to_string()))
    );
}

#[test]
fn test_accessors_default_false() {
    let tileset = sample();
    assert!(!tileset.is_collidable(0).unwrap());
    assert!(!tileset.is_enemy(8).unwrap());
    assert!(!tileset.is_player_spawn(62).unwrap());
    assert_eq!(tileset.respawn_time(8).unwrap(), None);
}

#[test]
fn test_reserialized_tileset_is_identical() {
    let tileset = sample();
    let xml = write_tileset(&tileset).unwrap();
    let reloaded = parse_tileset(&xml).unwrap();
    for id in 0..tileset.tile_count {
        assert_eq!(
            tileset.properties_of(id).unwrap(),
            reloaded.properties_of(id).unwrap(),
            "tile {}",
            id
        );
    }
    assert_eq!(reloaded, tileset);
}

#[test]
fn test_behaviors() {
    let tileset = sample();
    assert_eq!(tileset.behavior(0).unwrap(), TileBehavior::Plain);
    assert_eq!(tileset.behavior(14).unwrap(), TileBehavior::Collectable);

    match tileset.behavior(23).unwrap() {
        TileBehavior::Healing(healing) => assert_eq!(healing.respawn_time, 15.0),
        other => panic!("expected healing, got {:?}", other),
    }
    match tileset.behavior(15).unwrap() {
        TileBehavior::Healing(healing) => assert_eq!(healing.respawn_time, 30.0),
        other => panic!("expected healing, got {:?}", other),
    }
    match tileset.behavior(44).unwrap() {
        TileBehavior::Falling(falling) => {
            assert!(falling.on_pass_under);
            assert_eq!(falling.respawn_time, 5.0);
            assert_eq!(falling.damage, Some(1.0));
        }
        other => panic!("expected falling, got {:?}", other),
    }
    match tileset.behavior(72).unwrap() {
        TileBehavior::Breakable(breakable) => {
            assert_eq!(breakable.health, 1);
            assert!(breakable.collidable);
        }
        other => panic!("expected breakable, got {:?}", other),
    }
    match tileset.behavior(71).unwrap() {
        TileBehavior::Enemy(enemy) => {
            assert_eq!(enemy.class.as_deref(), Some("EtherJumperBoss"));
            assert_eq!(enemy.health, None);
        }
        other => panic!("expected enemy, got {:?}", other),
    }
}

#[test]
fn test_collision() {
    let tileset = sample();

    let hazard = tileset.collision(45).unwrap();
    assert_eq!(hazard.shape, CollisionShape::Full);
    assert_eq!(hazard.contact_damage, Some(1.0));
    assert_eq!(hazard.knockback, Some(5.0));

    let platform = tileset.collision(59).unwrap();
    assert_eq!(platform.one_way, OneWayDirection::Top);

    // collidable wins over platform
    let solid_platform = tileset.collision(61).unwrap();
    assert_eq!(solid_platform.one_way, OneWayDirection::None);
    assert!(solid_platform.has_collision());

    assert!(tileset.collision(40).unwrap().is_one_way());
    assert!(tileset.collision(14).unwrap().is_empty());
    assert!(tileset.collision(0).unwrap().is_empty());
}

#[test]
fn test_dependency_warnings_are_clean() {
    let xml = std::fs::read_to_string(fixture("32-32.tsx")).unwrap();
    let (_, report) = TilesetLoader::default()
        .parse_str_with_report(&xml)
        .unwrap();
    assert!(report.is_clean(), "{:?}", report.warnings);
}

#[test]
fn test_json_export() {
    let tileset = sample();
    let json = serde_json::to_value(&tileset).unwrap();
    assert_eq!(json["tile_count"], 80);
    assert_eq!(json["tiles"]["62"]["type"]["value"], "MeleeGhost");
    assert_eq!(json["tiles"]["62"]["damage"]["type"], "float");
}

#[test]
fn test_truncated_document() {
    let xml = std::fs::read_to_string(fixture("32-32.tsx")).unwrap();
    let truncated = &xml[..xml.len() / 2];
    assert!(matches!(
        parse_tileset(truncated),
        Err(TilesetError::MalformedAsset(_))
    ));
}
