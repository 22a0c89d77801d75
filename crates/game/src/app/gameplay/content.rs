use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::Vec2;
use serde::Deserialize;
use thiserror::Error;

use super::npc::{Npc, PatrolError};
use super::pickup::PickupKind;

pub(crate) const WORLD_CONTENT_FILE: &str = "world.json";

#[derive(Debug, Error)]
pub(crate) enum ContentError {
    #[error("failed to read world content '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse world content at {json_path}: {message}")]
    Parse { json_path: String, message: String },
    #[error("invalid world content at {json_path}: {message}")]
    Invalid { json_path: String, message: String },
    #[error("invalid world content at {json_path}: {source}")]
    Patrol {
        json_path: String,
        #[source]
        source: PatrolError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub(crate) struct ContentVec2 {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl From<ContentVec2> for Vec2 {
    fn from(value: ContentVec2) -> Self {
        Vec2::new(value.x, value.y)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct WorldContent {
    pub(crate) world: WorldDef,
    pub(crate) player: CharacterDef,
    pub(crate) pickups: Vec<PickupDef>,
    #[serde(default)]
    pub(crate) placements: Vec<PlacementDef>,
    #[serde(default)]
    pub(crate) npcs: Vec<NpcDef>,
    #[serde(default)]
    pub(crate) landmarks: Vec<LandmarkDef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct WorldDef {
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) view_width: u32,
    pub(crate) view_height: u32,
    pub(crate) view_origin: ContentVec2,
    pub(crate) ground_tile: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct CharacterDef {
    pub(crate) sprite: String,
    pub(crate) size: ContentVec2,
    pub(crate) walk_frames: u32,
    pub(crate) ticks_per_frame: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct CombineDef {
    pub(crate) partner: PickupKind,
    pub(crate) result: PickupKind,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct PickupDef {
    pub(crate) kind: PickupKind,
    pub(crate) sprite: String,
    pub(crate) size: ContentVec2,
    pub(crate) help_text: String,
    #[serde(default)]
    pub(crate) combines: Vec<CombineDef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct PlacementDef {
    pub(crate) kind: PickupKind,
    pub(crate) position: ContentVec2,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct NpcDef {
    pub(crate) name: String,
    #[serde(flatten)]
    pub(crate) character: CharacterDef,
    pub(crate) help_text: String,
    #[serde(default)]
    pub(crate) dialogue: Option<String>,
    pub(crate) patrol: Vec<ContentVec2>,
}

impl NpcDef {
    pub(crate) fn patrol_route(&self) -> Result<Npc, PatrolError> {
        Npc::new(self.patrol.iter().copied().map(Vec2::from).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct LandmarkDef {
    pub(crate) name: String,
    pub(crate) sprite: String,
    pub(crate) position: ContentVec2,
    pub(crate) size: ContentVec2,
    pub(crate) help_text: String,
    #[serde(default)]
    pub(crate) dialogue: Option<String>,
}

pub(crate) fn load_world_content(content_dir: &Path) -> Result<WorldContent, ContentError> {
    let path = content_dir.join(WORLD_CONTENT_FILE);
    let raw = fs::read_to_string(&path).map_err(|source| ContentError::Read {
        path: path.clone(),
        source,
    })?;
    let content = parse_world_content(&raw)?;
    validate_world_content(&content)?;
    Ok(content)
}

pub(crate) fn parse_world_content(raw: &str) -> Result<WorldContent, ContentError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, WorldContent>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let source = error.into_inner();
        ContentError::Parse {
            json_path: if path.is_empty() { ".".to_string() } else { path },
            message: source.to_string(),
        }
    })
}

fn invalid(json_path: impl Into<String>, message: impl Into<String>) -> ContentError {
    ContentError::Invalid {
        json_path: json_path.into(),
        message: message.into(),
    }
}

fn require_positive_size(json_path: &str, size: ContentVec2) -> Result<(), ContentError> {
    if size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0 {
        Ok(())
    } else {
        Err(invalid(
            json_path,
            format!("expected positive size, got {}x{}", size.x, size.y),
        ))
    }
}

fn require_finite_position(json_path: &str, position: ContentVec2) -> Result<(), ContentError> {
    if position.x.is_finite() && position.y.is_finite() {
        Ok(())
    } else {
        Err(invalid(json_path, "expected finite coordinates"))
    }
}

fn require_frames(json_path: &str, character: &CharacterDef) -> Result<(), ContentError> {
    if character.walk_frames == 0 {
        return Err(invalid(
            format!("{json_path}.walk_frames"),
            "expected at least one frame",
        ));
    }
    if character.ticks_per_frame == 0 {
        return Err(invalid(
            format!("{json_path}.ticks_per_frame"),
            "expected at least one tick per frame",
        ));
    }
    require_positive_size(&format!("{json_path}.size"), character.size)
}

pub(crate) fn validate_world_content(content: &WorldContent) -> Result<(), ContentError> {
    let world = &content.world;
    require_positive_size(
        "world",
        ContentVec2 {
            x: world.width,
            y: world.height,
        },
    )?;
    if world.view_width == 0 || world.view_height == 0 {
        return Err(invalid("world.view_width", "expected a non-empty view"));
    }
    require_finite_position("world.view_origin", world.view_origin)?;
    require_frames("player", &content.player)?;

    let mut defined = BTreeSet::new();
    for (index, pickup) in content.pickups.iter().enumerate() {
        let path = format!("pickups[{index}]");
        if !defined.insert(pickup.kind) {
            return Err(invalid(
                format!("{path}.kind"),
                format!("duplicate definition for {}", pickup.kind.label()),
            ));
        }
        require_positive_size(&format!("{path}.size"), pickup.size)?;
    }
    for (index, pickup) in content.pickups.iter().enumerate() {
        for (combine_index, combine) in pickup.combines.iter().enumerate() {
            let path = format!("pickups[{index}].combines[{combine_index}]");
            for (field, kind) in [("partner", combine.partner), ("result", combine.result)] {
                if !defined.contains(&kind) {
                    return Err(invalid(
                        format!("{path}.{field}"),
                        format!("undefined pickup kind {}", kind.label()),
                    ));
                }
            }
        }
    }
    for (index, placement) in content.placements.iter().enumerate() {
        let path = format!("placements[{index}]");
        if !defined.contains(&placement.kind) {
            return Err(invalid(
                format!("{path}.kind"),
                format!("undefined pickup kind {}", placement.kind.label()),
            ));
        }
        require_finite_position(&format!("{path}.position"), placement.position)?;
    }
    for (index, npc) in content.npcs.iter().enumerate() {
        let path = format!("npcs[{index}]");
        require_frames(&path, &npc.character)?;
        npc.patrol_route()
            .map_err(|source| ContentError::Patrol {
                json_path: format!("{path}.patrol"),
                source,
            })?;
        for (point_index, point) in npc.patrol.iter().enumerate() {
            require_finite_position(&format!("{path}.patrol[{point_index}]"), *point)?;
        }
    }
    for (index, landmark) in content.landmarks.iter().enumerate() {
        let path = format!("landmarks[{index}]");
        require_positive_size(&format!("{path}.size"), landmark.size)?;
        require_finite_position(&format!("{path}.position"), landmark.position)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const MINIMAL: &str = r#"{
        "world": {
            "width": 2000, "height": 1600,
            "view_width": 800, "view_height": 600,
            "view_origin": { "x": 0, "y": 0 },
            "ground_tile": "terrain/grass"
        },
        "player": {
            "sprite": "characters/player",
            "size": { "x": 20, "y": 30 },
            "walk_frames": 3, "ticks_per_frame": 8
        },
        "pickups": [
            { "kind": "lemon", "sprite": "items/lemon", "size": { "x": 8, "y": 8 },
              "help_text": "pick up the lemon" },
            { "kind": "lemonade_pitcher", "sprite": "items/lemonade_pitcher",
              "size": { "x": 18, "y": 21 }, "help_text": "pick up the pitcher" },
            { "kind": "water_bucket", "sprite": "items/water_bucket",
              "size": { "x": 20, "y": 22 }, "help_text": "pick up the bucket",
              "combines": [ { "partner": "lemon", "result": "lemonade_pitcher" } ] }
        ],
        "placements": [ { "kind": "lemon", "position": { "x": 750, "y": 750 } } ],
        "npcs": [
            { "name": "villager", "sprite": "characters/villager",
              "size": { "x": 25, "y": 36 }, "walk_frames": 3, "ticks_per_frame": 12,
              "help_text": "talk", "patrol": [ { "x": 1000, "y": 1000 } ] }
        ]
    }"#;

    #[test]
    fn minimal_content_parses_and_validates() {
        let content = parse_world_content(MINIMAL).expect("parse");
        validate_world_content(&content).expect("valid");
        assert_eq!(content.pickups.len(), 3);
        assert_eq!(content.npcs[0].character.walk_frames, 3);
        assert!(content.landmarks.is_empty());
    }

    #[test]
    fn parse_error_names_json_path() {
        let broken = MINIMAL.replace("\"kind\": \"lemon\", \"sprite\"", "\"kind\": \"melon\", \"sprite\"");
        let err = parse_world_content(&broken).expect_err("unknown kind");
        match err {
            ContentError::Parse { json_path, .. } => assert_eq!(json_path, "pickups[0].kind"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn placement_of_undefined_kind_is_rejected() {
        let mut content = parse_world_content(MINIMAL).expect("parse");
        content.placements.push(PlacementDef {
            kind: PickupKind::RatPoison,
            position: ContentVec2 { x: 1.0, y: 1.0 },
        });
        let err = validate_world_content(&content).expect_err("undefined kind");
        assert!(err.to_string().contains("placements[1].kind"), "{err}");
    }

    #[test]
    fn duplicate_pickup_definition_is_rejected() {
        let mut content = parse_world_content(MINIMAL).expect("parse");
        let duplicate = content.pickups[0].clone();
        content.pickups.push(duplicate);
        let err = validate_world_content(&content).expect_err("duplicate");
        assert!(err.to_string().contains("pickups[3].kind"), "{err}");
    }

    #[test]
    fn combine_result_must_be_defined() {
        let mut content = parse_world_content(MINIMAL).expect("parse");
        content.pickups[0].combines.push(CombineDef {
            partner: PickupKind::WaterBucket,
            result: PickupKind::LaundryBasin,
        });
        let err = validate_world_content(&content).expect_err("undefined result");
        assert!(
            err.to_string().contains("pickups[0].combines[0].result"),
            "{err}"
        );
    }

    #[test]
    fn empty_patrol_is_rejected() {
        let mut content = parse_world_content(MINIMAL).expect("parse");
        content.npcs[0].patrol.clear();
        let err = validate_world_content(&content).expect_err("empty patrol");
        assert!(matches!(
            err,
            ContentError::Patrol {
                source: PatrolError::EmptyPatrolPath,
                ..
            }
        ));
    }

    #[test]
    fn non_positive_size_is_rejected() {
        let mut content = parse_world_content(MINIMAL).expect("parse");
        content.player.size = ContentVec2 { x: 0.0, y: 30.0 };
        let err = validate_world_content(&content).expect_err("zero size");
        assert!(err.to_string().contains("player.size"), "{err}");
    }

    #[test]
    fn load_reads_world_file_from_content_dir() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join(WORLD_CONTENT_FILE), MINIMAL).expect("write");
        let content = load_world_content(dir.path()).expect("load");
        assert_eq!(content.world.view_width, 800);
    }

    #[test]
    fn shipped_world_content_is_valid() {
        let content_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/base");
        let content = load_world_content(&content_dir).expect("shipped content");
        assert_eq!(content.pickups.len(), 7);
        assert!(!content.npcs.is_empty());
    }

    #[test]
    fn missing_world_file_reports_path() {
        let dir = TempDir::new().expect("tempdir");
        let err = load_world_content(dir.path()).expect_err("missing");
        assert!(matches!(err, ContentError::Read { .. }));
        assert!(err.to_string().contains(WORLD_CONTENT_FILE));
    }
}
