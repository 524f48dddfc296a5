use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub(crate) const LAYOUT_FILE_NAME: &str = "layout.json";

#[derive(Debug, Error)]
pub(crate) enum LayoutError {
    #[error("failed to read layout file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse layout json at {field}: {source}")]
    Parse {
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid layout value at {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Authored scene layout. Positions and radii are design coordinates multiplied by `scale`;
/// player size and speed are already in scene pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LayoutConfig {
    pub scale: f32,
    pub design_size: Vec2,
    pub player: PlayerLayout,
    pub key: KeyLayout,
    pub chest: ChestLayout,
    pub gems: Vec<GemLayout>,
    pub obstacles: Vec<ObstacleLayout>,
    pub stars: Vec<Vec2>,
    pub containment: ContainmentLayout,
    pub win_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlayerLayout {
    pub spawn: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub sprite: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct KeyLayout {
    pub position: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ChestLayout {
    pub position: Vec2,
    pub size: Vec2,
    pub unlock_half_extents: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GemLayout {
    pub position: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ObstacleLayout {
    pub center: Vec2,
    pub radius_x: f32,
    pub radius_y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ContainmentLayout {
    pub enabled: bool,
    pub center: Vec2,
    pub semi_axis_x: f32,
    pub semi_axis_y: f32,
    pub threshold: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale: 700.0 / 400.0,
            design_size: Vec2::new(400.0, 480.0),
            player: PlayerLayout::default(),
            key: KeyLayout::default(),
            chest: ChestLayout::default(),
            gems: vec![
                GemLayout {
                    position: Vec2::new(200.0, 270.0),
                    radius: 6.0,
                },
                GemLayout {
                    position: Vec2::new(225.0, 285.0),
                    radius: 5.0,
                },
                GemLayout {
                    position: Vec2::new(175.0, 285.0),
                    radius: 5.5,
                },
            ],
            obstacles: vec![
                ObstacleLayout {
                    center: Vec2::new(150.0, 285.0),
                    radius_x: 18.0,
                    radius_y: 10.0,
                },
                ObstacleLayout {
                    center: Vec2::new(250.0, 300.0),
                    radius_x: 12.0,
                    radius_y: 7.0,
                },
                ObstacleLayout {
                    center: Vec2::new(170.0, 310.0),
                    radius_x: 9.0,
                    radius_y: 5.0,
                },
                ObstacleLayout {
                    center: Vec2::new(260.0, 275.0),
                    radius_x: 16.0,
                    radius_y: 9.0,
                },
            ],
            stars: vec![
                Vec2::new(40.0, 30.0),
                Vec2::new(95.0, 62.0),
                Vec2::new(150.0, 24.0),
                Vec2::new(212.0, 48.0),
                Vec2::new(268.0, 20.0),
                Vec2::new(330.0, 58.0),
                Vec2::new(372.0, 34.0),
                Vec2::new(60.0, 112.0),
                Vec2::new(182.0, 96.0),
                Vec2::new(300.0, 110.0),
            ],
            containment: ContainmentLayout::default(),
            win_delay_ms: 600,
        }
    }
}

impl Default for PlayerLayout {
    fn default() -> Self {
        Self {
            spawn: Vec2::new(120.0, 420.0),
            size: Vec2::new(34.0, 44.0),
            speed: 2.8,
            sprite: "sprites/player.png".to_string(),
        }
    }
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self {
            position: Vec2::new(320.0, 200.0),
            radius: 8.0,
        }
    }
}

impl Default for ChestLayout {
    fn default() -> Self {
        Self {
            position: Vec2::new(320.0, 260.0),
            size: Vec2::new(36.0, 22.0),
            unlock_half_extents: Vec2::new(28.0, 20.0),
        }
    }
}

impl Default for ContainmentLayout {
    fn default() -> Self {
        Self {
            enabled: false,
            center: Vec2::new(200.0, 260.0),
            semi_axis_x: 120.0,
            semi_axis_y: 40.0,
            threshold: 0.95,
        }
    }
}

/// Reads `<assets_dir>/layout.json`. A missing file yields the built-in layout.
pub(crate) fn load_layout(assets_dir: &Path) -> Result<LayoutConfig, LayoutError> {
    let path = assets_dir.join(LAYOUT_FILE_NAME);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "layout_file_missing_using_defaults");
            return Ok(LayoutConfig::default());
        }
        Err(source) => return Err(LayoutError::Read { path, source }),
    };
    let layout = parse_layout_json(&raw)?;
    validate_layout(&layout)?;
    info!(
        path = %path.display(),
        gems = layout.gems.len(),
        obstacles = layout.obstacles.len(),
        containment = layout.containment.enabled,
        "layout_loaded"
    );
    Ok(layout)
}

pub(crate) fn parse_layout_json(raw: &str) -> Result<LayoutConfig, LayoutError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, LayoutConfig>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let field = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        LayoutError::Parse {
            field,
            source: error.into_inner(),
        }
    })
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> LayoutError {
    LayoutError::Invalid {
        field: field.into(),
        message: message.into(),
    }
}

fn require_positive(field: &str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("expected a finite value > 0, got {value}")))
    }
}

fn require_finite_point(field: &str, value: Vec2) -> Result<(), LayoutError> {
    if value.x.is_finite() && value.y.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "coordinates must be finite"))
    }
}

pub(crate) fn validate_layout(layout: &LayoutConfig) -> Result<(), LayoutError> {
    require_positive("scale", layout.scale)?;
    require_positive("design_size.x", layout.design_size.x)?;
    require_positive("design_size.y", layout.design_size.y)?;

    require_finite_point("player.spawn", layout.player.spawn)?;
    require_positive("player.size.x", layout.player.size.x)?;
    require_positive("player.size.y", layout.player.size.y)?;
    require_positive("player.speed", layout.player.speed)?;
    if layout.player.sprite.trim().is_empty() {
        return Err(invalid("player.sprite", "sprite location must not be empty"));
    }

    require_finite_point("key.position", layout.key.position)?;
    require_positive("key.radius", layout.key.radius)?;

    require_finite_point("chest.position", layout.chest.position)?;
    require_positive("chest.size.x", layout.chest.size.x)?;
    require_positive("chest.size.y", layout.chest.size.y)?;
    require_positive(
        "chest.unlock_half_extents.x",
        layout.chest.unlock_half_extents.x,
    )?;
    require_positive(
        "chest.unlock_half_extents.y",
        layout.chest.unlock_half_extents.y,
    )?;

    for (index, gem) in layout.gems.iter().enumerate() {
        require_finite_point(&format!("gems[{index}].position"), gem.position)?;
        require_positive(&format!("gems[{index}].radius"), gem.radius)?;
    }
    for (index, obstacle) in layout.obstacles.iter().enumerate() {
        require_finite_point(&format!("obstacles[{index}].center"), obstacle.center)?;
        require_positive(&format!("obstacles[{index}].radius_x"), obstacle.radius_x)?;
        require_positive(&format!("obstacles[{index}].radius_y"), obstacle.radius_y)?;
    }
    for (index, star) in layout.stars.iter().enumerate() {
        require_finite_point(&format!("stars[{index}]"), *star)?;
    }

    let containment = &layout.containment;
    require_finite_point("containment.center", containment.center)?;
    require_positive("containment.semi_axis_x", containment.semi_axis_x)?;
    require_positive("containment.semi_axis_y", containment.semi_axis_y)?;
    require_positive("containment.threshold", containment.threshold)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn defaults_reproduce_the_authored_layout() {
        let layout = LayoutConfig::default();
        assert!((layout.scale - 1.75).abs() < f32::EPSILON);
        assert_eq!(layout.player.spawn.scaled(layout.scale), Vec2::new(210.0, 735.0));
        assert_eq!(layout.key.position.scaled(layout.scale), Vec2::new(560.0, 350.0));
        assert_eq!(layout.gems.len(), 3);
        assert_eq!(layout.obstacles.len(), 4);
        assert!(!layout.containment.enabled);
        assert_eq!(layout.win_delay_ms, 600);
        assert!(validate_layout(&layout).is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let raw = json!({
            "key": { "radius": 10.0 },
            "containment": { "enabled": true }
        })
        .to_string();
        let layout = parse_layout_json(&raw).expect("partial layout parses");
        assert_eq!(layout.key.radius, 10.0);
        assert_eq!(layout.key.position, Vec2::new(320.0, 200.0));
        assert!(layout.containment.enabled);
        assert_eq!(layout.containment.threshold, 0.95);
        assert_eq!(layout.gems, LayoutConfig::default().gems);
    }

    #[test]
    fn type_errors_report_the_field_path() {
        let raw = json!({ "key": { "radius": "wide" } }).to_string();
        let error = parse_layout_json(&raw).expect_err("must fail");
        match &error {
            LayoutError::Parse { field, .. } => assert_eq!(field, "key.radius"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(error.to_string().contains("key.radius"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = json!({ "player": { "sped": 3.0 } }).to_string();
        let error = parse_layout_json(&raw).expect_err("must fail");
        assert!(error.to_string().contains("player"));
        assert!(error.to_string().contains("sped"));
    }

    #[test]
    fn gem_entries_require_every_field() {
        let raw = json!({ "gems": [{ "position": { "x": 1.0, "y": 2.0 } }] }).to_string();
        let error = parse_layout_json(&raw).expect_err("must fail");
        let message = error.to_string();
        assert!(message.contains("gems[0]"), "{message}");
        assert!(message.contains("missing field"), "{message}");
    }

    #[test]
    fn validation_rejects_non_positive_radii() {
        let mut layout = LayoutConfig::default();
        layout.gems[1].radius = 0.0;
        let error = validate_layout(&layout).expect_err("must fail");
        assert!(error.to_string().contains("gems[1].radius"));

        let mut layout = LayoutConfig::default();
        layout.player.speed = f32::NAN;
        assert!(validate_layout(&layout)
            .expect_err("must fail")
            .to_string()
            .contains("player.speed"));
    }

    #[test]
    fn validation_rejects_blank_sprite_location() {
        let mut layout = LayoutConfig::default();
        layout.player.sprite = "  ".to_string();
        let error = validate_layout(&layout).expect_err("must fail");
        assert!(matches!(error, LayoutError::Invalid { ref field, .. } if field == "player.sprite"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let temp = TempDir::new().expect("temp");
        let layout = load_layout(temp.path()).expect("defaults");
        assert_eq!(layout, LayoutConfig::default());
    }

    #[test]
    fn file_on_disk_is_parsed_and_validated() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join(LAYOUT_FILE_NAME);
        fs::write(&path, json!({ "win_delay_ms": 250 }).to_string()).expect("write");
        assert_eq!(load_layout(temp.path()).expect("layout").win_delay_ms, 250);

        fs::write(&path, json!({ "scale": -1.0 }).to_string()).expect("write");
        let error = load_layout(temp.path()).expect_err("invalid scale");
        assert!(error.to_string().contains("scale"));
    }

    #[test]
    fn shipped_layout_file_matches_built_in_defaults() {
        let assets_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets");
        let layout = load_layout(&assets_dir).expect("shipped layout");
        assert_eq!(layout, LayoutConfig::default());
    }
}
