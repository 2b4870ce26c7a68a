//! Level layouts and the enemy spawn director

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{EnemyKind, GameState};
use crate::error::ConfigError;

/// A crate placement; `kind` is a tag resolved at load time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrateSpec {
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(rename = "type")]
    pub kind: String,
}

/// An initial enemy placement (top-left corner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub kind: String,
    pub x: f32,
    pub y: f32,
}

/// Static description of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    pub level_start: f32,
    /// Right edge of the playable level
    pub length: f32,
    pub height: f32,
    pub platforms: Vec<Rect>,
    pub hazards: Vec<Rect>,
    pub crates: Vec<CrateSpec>,
    pub enemies: Vec<EnemySpec>,
}

impl Default for LevelLayout {
    fn default() -> Self {
        let crate_at = |x: f32, kind: &str| CrateSpec {
            rect: Rect::new(x, 380.0, 32.0, 32.0),
            kind: kind.to_string(),
        };

        Self {
            level_start: 0.0,
            length: 2000.0,
            height: 1000.0,
            platforms: vec![
                // Ground
                Rect::new(0.0, 540.0, 5000.0, 60.0),
                Rect::new(200.0, 440.0, 120.0, 20.0),
                Rect::new(400.0, 340.0, 120.0, 20.0),
                Rect::new(600.0, 440.0, 120.0, 20.0),
                Rect::new(800.0, 340.0, 120.0, 20.0),
                Rect::new(1000.0, 440.0, 120.0, 20.0),
                Rect::new(1200.0, 340.0, 120.0, 20.0),
            ],
            hazards: vec![
                Rect::new(350.0, 520.0, 20.0, 20.0),
                Rect::new(750.0, 520.0, 20.0, 20.0),
                Rect::new(1150.0, 520.0, 20.0, 20.0),
            ],
            crates: vec![
                crate_at(300.0, "weapon"),
                crate_at(700.0, "armor"),
                crate_at(1100.0, "health"),
            ],
            enemies: (0..3)
                .map(|i| EnemySpec {
                    kind: "WALKER".to_string(),
                    x: 500.0 + i as f32 * 200.0,
                    y: 0.0,
                })
                .collect(),
        }
    }
}

impl LevelLayout {
    /// Parse a layout from JSON; omitted fields take the built-in level's values
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let layout: Self = serde_json::from_str(json)?;
        if !(layout.length > layout.level_start) {
            return Err(ConfigError::Invalid {
                field: "length",
                reason: format!("must exceed level_start ({})", layout.level_start),
            });
        }
        if !(layout.height > 0.0) {
            return Err(ConfigError::Invalid {
                field: "height",
                reason: "must be positive".into(),
            });
        }
        Ok(layout)
    }
}

/// Platforms an enemy may be dropped onto: high, wide, away from the player
fn can_spawn_on(platform: &Rect, player_x: f32) -> bool {
    platform.y < 400.0 && platform.w > 80.0 && (platform.x - player_x).abs() > 200.0
}

/// Periodically top up the enemy population.
///
/// Every `spawn_interval_secs` of world time, while fewer than
/// `max_enemies` are alive, a random variant is dropped on a random
/// eligible platform. Returns the new enemy's id when one spawned.
pub fn update_spawn_director(state: &mut GameState, dt: f32) -> Option<u32> {
    state.world.spawn_timer -= dt;
    if state.world.spawn_timer > 0.0 {
        return None;
    }
    state.world.spawn_timer += state.tuning.spawn_interval_secs;

    if state.world.enemies.len() >= state.tuning.max_enemies {
        return None;
    }

    let player_x = state.player.pos.x;
    let candidates: Vec<Rect> = state
        .world
        .platforms
        .iter()
        .filter(|p| can_spawn_on(p, player_x))
        .copied()
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let platform = candidates[state.rng.random_range(0..candidates.len())];
    let kind = EnemyKind::ALL[state.rng.random_range(0..EnemyKind::ALL.len())];
    let size = state.tuning.profile(kind).size;
    let pos = Vec2::new(platform.center().x - size / 2.0, platform.y - size);
    Some(state.spawn_enemy(kind, pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_default_layout() {
        let layout = LevelLayout::default();
        assert_eq!(layout.platforms[0], Rect::new(0.0, 540.0, 5000.0, 60.0));
        assert_eq!(layout.length, 2000.0);
        assert_eq!(layout.enemies.len(), 3);
    }

    #[test]
    fn test_layout_from_json() {
        let layout = LevelLayout::from_json(
            r#"{
                "length": 800,
                "platforms": [{ "x": 0, "y": 500, "w": 800, "h": 40 }],
                "crates": [{ "x": 10, "y": 20, "w": 32, "h": 32, "type": "armor" }],
                "enemies": [{ "kind": "TANK", "x": 300, "y": 0 }]
            }"#,
        )
        .unwrap();
        assert_eq!(layout.length, 800.0);
        assert_eq!(layout.height, 1000.0);
        assert_eq!(layout.platforms.len(), 1);
        assert_eq!(layout.crates[0].kind, "armor");
        assert_eq!(layout.crates[0].rect, Rect::new(10.0, 20.0, 32.0, 32.0));

        let err = LevelLayout::from_json(r#"{ "length": -5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "length", .. }));
    }

    #[test]
    fn test_spawn_director_respects_interval_and_cap() {
        let mut state = GameState::with_defaults(3);
        let before = state.world.enemies.len();

        assert!(update_spawn_director(&mut state, 1.0).is_none());
        let id = update_spawn_director(&mut state, 4.0).expect("spawn after interval");
        assert_eq!(state.world.enemies.len(), before + 1);

        let spawned = state.world.enemies.iter().find(|e| e.id == id).unwrap();
        // Resting on top of one of the high platforms
        assert!(state
            .world
            .platforms
            .iter()
            .any(|p| p.y < 400.0 && (spawned.pos.y + spawned.size.y - p.y).abs() < 1e-4));

        state.tuning = Tuning {
            max_enemies: state.world.enemies.len(),
            ..Tuning::default()
        };
        assert!(update_spawn_director(&mut state, 5.0).is_none());
    }

    #[test]
    fn test_spawn_platform_filter() {
        let high_wide = Rect::new(400.0, 340.0, 120.0, 20.0);
        assert!(can_spawn_on(&high_wide, 40.0));
        assert!(!can_spawn_on(&high_wide, 350.0));
        assert!(!can_spawn_on(&Rect::new(0.0, 540.0, 5000.0, 60.0), 40.0));
        assert!(!can_spawn_on(&Rect::new(400.0, 300.0, 60.0, 20.0), 40.0));
    }
}
