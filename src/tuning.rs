//! Game balance values
//!
//! Every constant the simulation reads lives here so a run can be re-tuned
//! from JSON without touching code. Missing fields fall back to the defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::state::EnemyKind;

/// Per-variant enemy stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub speed: f32,
    pub health: f32,
    /// Contact / melee / projectile damage
    pub damage: f32,
    /// Square body edge length
    pub size: f32,
    /// Distance at which the enemy turns toward the player
    pub aggro_range: f32,
    /// Distance at which the enemy attacks (melee or contact)
    pub attack_range: f32,
    /// Seconds between attacks, jumps or shots
    pub cooldown: f32,
    pub score: u64,
}

impl EnemyProfile {
    pub fn walker() -> Self {
        Self {
            speed: 0.5,
            health: 20.0,
            damage: 5.0,
            size: 24.0,
            aggro_range: 200.0,
            attack_range: 50.0,
            cooldown: 1.5,
            score: 200,
        }
    }

    pub fn jumper() -> Self {
        Self {
            speed: 1.2,
            health: 20.0,
            damage: 15.0,
            size: 20.0,
            aggro_range: 300.0,
            attack_range: 40.0,
            cooldown: 2.0,
            score: 200,
        }
    }

    pub fn tank() -> Self {
        Self {
            speed: 0.4,
            health: 100.0,
            damage: 25.0,
            size: 32.0,
            aggro_range: 400.0,
            attack_range: 400.0,
            cooldown: 2.5,
            score: 250,
        }
    }
}

/// Data-driven balance for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Vertical acceleration per simulated frame
    pub gravity: f32,
    /// Screen shake magnitude applied when the player is hit
    pub hit_shake: f32,
    /// Per-step shake decay factor
    pub shake_decay: f32,

    // === Player ===
    pub player_start: Vec2,
    pub player_size: Vec2,
    /// Vertical velocity set on jump (negative is up)
    pub jump_velocity: f32,
    /// Horizontal velocity factor per frame with no move input
    pub move_friction: f32,
    /// Horizontal velocity factor per frame for grounded jumpers and tanks
    pub ground_friction: f32,
    pub invincibility_secs: f32,

    // === Hazards and crates ===
    pub hazard_damage: f32,
    /// Horizontal magnitude and vertical impulse of spike knockback
    pub hazard_knockback: Vec2,
    pub crate_heal: f32,

    // === Projectiles ===
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    /// Spread used when the weapon part has none
    pub default_spread: f32,
    /// Rate of fire used when neither player nor weapon provide one
    pub default_fire_rate: f32,
    /// Reload seconds used when the weapon part has none
    pub default_reload_secs: f32,
    /// Bullet damage used when the weapon part has none
    pub default_bullet_damage: f32,
    /// Impulse applied to the player opposite the fire direction
    pub recoil: f32,
    pub enemy_bullet_speed: f32,
    pub enemy_bullet_radius: f32,
    /// Impulse applied to a tank opposite its fire direction
    pub tank_recoil: f32,

    // === Enemies ===
    pub walker: EnemyProfile,
    pub jumper: EnemyProfile,
    pub tank: EnemyProfile,
    /// Walker melee hitbox width in front of its body
    pub walker_reach: f32,
    /// Jumper launch velocity (x magnitude toward player, y up)
    pub jumper_launch: Vec2,

    // === Spawn director ===
    pub spawn_interval_secs: f32,
    pub max_enemies: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            hit_shake: 10.0,
            shake_decay: 0.9,

            player_start: Vec2::new(40.0, 420.0),
            player_size: Vec2::new(26.0, 34.0),
            jump_velocity: -12.0,
            move_friction: 0.9,
            ground_friction: 0.85,
            invincibility_secs: 1.5,

            hazard_damage: 50.0,
            hazard_knockback: Vec2::new(10.0, -5.0),
            crate_heal: 50.0,

            bullet_speed: 10.0,
            bullet_radius: 3.0,
            default_spread: 0.1,
            default_fire_rate: 5.0,
            default_reload_secs: 1.0,
            default_bullet_damage: 10.0,
            recoil: 0.5,
            enemy_bullet_speed: 5.0,
            enemy_bullet_radius: 5.0,
            tank_recoil: 2.0,

            walker: EnemyProfile::walker(),
            jumper: EnemyProfile::jumper(),
            tank: EnemyProfile::tank(),
            walker_reach: 30.0,
            jumper_launch: Vec2::new(4.0, -12.0),

            spawn_interval_secs: 5.0,
            max_enemies: 10,
        }
    }
}

impl Tuning {
    /// Stats for an enemy variant
    pub fn profile(&self, kind: EnemyKind) -> &EnemyProfile {
        match kind {
            EnemyKind::Walker => &self.walker,
            EnemyKind::Jumper => &self.jumper,
            EnemyKind::Tank => &self.tank,
        }
    }

    /// Parse tuning overrides from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning overrides from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values that would break the simulation outright
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {v}"),
                })
            }
        }

        if !self.gravity.is_finite() {
            return Err(ConfigError::Invalid {
                field: "gravity",
                reason: "must be finite".into(),
            });
        }
        positive("player_size.x", self.player_size.x)?;
        positive("player_size.y", self.player_size.y)?;
        positive("bullet_speed", self.bullet_speed)?;
        positive("bullet_radius", self.bullet_radius)?;
        positive("default_fire_rate", self.default_fire_rate)?;
        positive("default_bullet_damage", self.default_bullet_damage)?;
        positive("spawn_interval_secs", self.spawn_interval_secs)?;
        if self.invincibility_secs < 0.0 {
            return Err(ConfigError::Invalid {
                field: "invincibility_secs",
                reason: "must not be negative".into(),
            });
        }
        for (field, profile) in [
            ("walker", &self.walker),
            ("jumper", &self.jumper),
            ("tank", &self.tank),
        ] {
            positive(field, profile.health)?;
            positive(field, profile.size)?;
        }
        Ok(())
    }
}
