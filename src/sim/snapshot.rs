//! Read-only view of a run for renderers and HUDs

use glam::Vec2;
use serde::Serialize;

use super::equipment::Slot;
use super::rect::Rect;
use super::state::{CrateKind, EnemyKind, EnemyState, GamePhase, GameState, RunStats, Side};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub rect: Rect,
    /// Top-left at the start of the last step, for interpolation
    pub prev_pos: Vec2,
    pub facing: f32,
    pub on_ground: bool,
    pub invincible: bool,
    pub health: f32,
    pub max_health: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub rect: Rect,
    pub facing: f32,
    pub health: f32,
    pub max_health: f32,
    pub state: EnemyState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulletView {
    pub rect: Rect,
    pub owner: Side,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleView {
    pub rect: Rect,
    pub color: u32,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrateView {
    pub rect: Rect,
    pub kind: CrateKind,
}

/// Weapon readout for the HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponView {
    pub name: String,
    pub ammo: u32,
    /// 0 for unlimited
    pub magazine: u32,
    pub reloading: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartView {
    pub slot: Slot,
    pub name: String,
    pub style: String,
}

/// Everything a renderer needs to draw one frame, in level coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub time: f32,
    /// Top-left of the view; apply when drawing
    pub camera: Vec2,
    pub view: Vec2,
    pub shake: f32,
    pub level: Rect,
    pub player: PlayerView,
    pub weapon: Option<WeaponView>,
    pub parts: Vec<PartView>,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub particles: Vec<ParticleView>,
    pub platforms: Vec<Rect>,
    pub hazards: Vec<Rect>,
    pub crates: Vec<CrateView>,
    pub stats: RunStats,
    pub phase: GamePhase,
    pub paused: bool,
    pub game_over: bool,
    pub level_complete: bool,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let world = &state.world;
        let player = &state.player;

        let weapon = player.weapon.as_ref().map(|w| WeaponView {
            name: player
                .loadout
                .part(Slot::WEAPON)
                .map(|p| p.name().to_string())
                .unwrap_or_default(),
            ammo: w.ammo,
            magazine: w.magazine,
            reloading: w.reloading,
        });

        Self {
            time: world.time,
            camera: world.camera,
            view: world.view,
            shake: world.shake,
            level: world.bounds(),
            player: PlayerView {
                rect: player.rect(),
                prev_pos: player.prev_pos,
                facing: player.facing,
                on_ground: player.on_ground,
                invincible: player.invincible,
                health: player.health,
                max_health: player.max_health(),
            },
            weapon,
            parts: player
                .loadout
                .parts()
                .map(|p| PartView {
                    slot: p.slot(),
                    name: p.name().to_string(),
                    style: p.style().to_string(),
                })
                .collect(),
            enemies: world
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    kind: e.kind,
                    rect: e.rect(),
                    facing: e.facing,
                    health: e.health,
                    max_health: e.max_health,
                    state: e.state,
                })
                .collect(),
            bullets: world
                .bullets
                .iter()
                .map(|b| BulletView {
                    rect: b.rect(),
                    owner: b.owner,
                })
                .collect(),
            particles: world
                .particles
                .iter()
                .map(|p| ParticleView {
                    rect: Rect::around(p.pos, p.size / 2.0),
                    color: p.color,
                    alpha: p.alpha,
                })
                .collect(),
            platforms: world.platforms.clone(),
            hazards: world.hazards.clone(),
            crates: world
                .crates
                .iter()
                .map(|c| CrateView {
                    rect: c.rect,
                    kind: c.kind,
                })
                .collect(),
            stats: state.stats.clone(),
            phase: state.phase,
            paused: state.phase == GamePhase::Paused,
            game_over: state.phase == GamePhase::GameOver,
            level_complete: state.phase == GamePhase::LevelComplete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Particle;

    #[test]
    fn test_capture_default_run() {
        let state = GameState::with_defaults(8);
        let snap = RenderSnapshot::capture(&state);

        assert_eq!(snap.player.rect, Rect::new(40.0, 420.0, 26.0, 34.0));
        assert_eq!(snap.player.max_health, 200.0);
        assert_eq!(snap.enemies.len(), 3);
        assert_eq!(snap.crates.len(), 3);
        assert_eq!(snap.parts.len(), 3);
        assert_eq!(snap.level, Rect::new(0.0, 0.0, 2000.0, 1000.0));

        let weapon = snap.weapon.unwrap();
        assert_eq!(weapon.name, "Blaster Arm");
        assert_eq!(weapon.ammo, 7);
        assert!(!snap.paused && !snap.game_over && !snap.level_complete);
    }

    #[test]
    fn test_particle_rect_is_centered() {
        let mut state = GameState::with_defaults(8);
        state.world.particles.push(Particle {
            pos: Vec2::new(100.0, 200.0),
            vel: Vec2::ZERO,
            life: 1.0,
            size: 4.0,
            color: 0xffffff,
            alpha: 1.0,
        });
        let snap = RenderSnapshot::capture(&state);
        let rect = snap.particles.last().unwrap().rect;
        assert_eq!(rect, Rect::new(98.0, 198.0, 4.0, 4.0));
    }

    #[test]
    fn test_snapshot_serializes_for_js() {
        let state = GameState::with_defaults(8);
        let json = serde_json::to_value(RenderSnapshot::capture(&state)).unwrap();
        assert_eq!(json["phase"], "Playing");
        assert_eq!(json["enemies"][0]["kind"], "walker");
        assert_eq!(json["parts"][0]["slot"], "torso");
        assert_eq!(json["platforms"][0]["w"], 5000.0);
    }
}
