//! Game state and core simulation types
//!
//! `GameState` is the single simulation context for one run. It owns every
//! entity collection, the run RNG, pending events and deferred timers.
//! Restarting a run means building a fresh `GameState`; nothing survives.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::equipment::{Loadout, Part, Slot, Stats, WeaponId, WeaponState};
use super::events::GameEvent;
use super::level::LevelLayout;
use super::rect::Rect;
use super::timers::{Deferred, TimerQueue};
use crate::consts::{VIEW_HEIGHT, VIEW_WIDTH};
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen; deferred timers keep running
    Paused,
    /// Player died
    GameOver,
    /// Player reached the end of the level
    LevelComplete,
}

impl GamePhase {
    /// Phases in which the simulation step does nothing
    pub fn is_frozen(self) -> bool {
        !matches!(self, GamePhase::Playing)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::LevelComplete)
    }
}

/// Which side an entity fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Enemy,
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Walker,
    Jumper,
    Tank,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Walker, EnemyKind::Jumper, EnemyKind::Tank];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Walker => "walker",
            EnemyKind::Jumper => "jumper",
            EnemyKind::Tank => "tank",
        }
    }

    /// Parse a layout tag; unknown tags become a Walker
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "walker" => EnemyKind::Walker,
            "jumper" => EnemyKind::Jumper,
            "tank" => EnemyKind::Tank,
            other => {
                log::warn!("Unknown enemy type {other:?}, spawning a walker instead");
                EnemyKind::Walker
            }
        }
    }
}

/// Coarse AI state, exposed for rendering and debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyState {
    /// Patrolling or standing still, player out of range
    #[default]
    Idle,
    /// Player within aggro range
    Pursuing,
    /// Player within attack range
    Attacking,
}

/// An enemy entity
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
    pub speed: f32,
    /// +1 right, -1 left
    pub facing: f32,
    /// Attack, jump or shoot cooldown depending on kind (seconds)
    pub cooldown: f32,
    pub score: u64,
    pub grounded: bool,
    pub state: EnemyState,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// A projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    /// Center of the projectile
    pub pos: Vec2,
    /// Units per 60 Hz frame
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub owner: Side,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::around(self.pos, self.radius)
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub alpha: f32,
    /// 0-1, decreases over time
    pub life: f32,
}

/// Reward carried by a crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrateKind {
    Health,
    Weapon,
    Armor,
}

impl CrateKind {
    /// Parse a layout tag; unknown tags become a health crate
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "health" => CrateKind::Health,
            "weapon" => CrateKind::Weapon,
            "armor" => CrateKind::Armor,
            other => {
                log::warn!("Unknown crate type {other:?}, using a health crate instead");
                CrateKind::Health
            }
        }
    }
}

/// A pickup crate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crate {
    pub rect: Rect,
    pub kind: CrateKind,
}

/// The player's mech
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Position at the start of the last step
    pub prev_pos: Vec2,
    pub size: Vec2,
    /// +1 right, -1 left
    pub facing: f32,
    pub on_ground: bool,
    pub health: f32,
    pub invincible: bool,
    pub invincible_timer: f32,
    pub loadout: Loadout,
    /// Runtime state of the part in the weapon slot
    pub weapon: Option<WeaponState>,
}

impl Player {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            prev_pos: pos,
            size,
            facing: 1.0,
            on_ground: false,
            health: 0.0,
            invincible: false,
            invincible_timer: 0.0,
            loadout: Loadout::new(Stats::base()),
            weapon: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Derived stats (base + equipped parts)
    pub fn stats(&self) -> &Stats {
        self.loadout.derived()
    }

    pub fn max_health(&self) -> f32 {
        self.stats().max_health
    }
}

/// Aggregate run statistics for the HUD
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub score: u64,
    /// Accumulated |vx| * dt * 10
    pub distance: f32,
    pub kills: u32,
    pub crates_opened: u32,
}

/// Level geometry and dynamic entity collections
#[derive(Debug, Clone)]
pub struct World {
    /// Simulated seconds since the run started
    pub time: f32,
    /// Top-left of the view in level coordinates
    pub camera: Vec2,
    /// View size in level units, set by the host
    pub view: Vec2,
    pub level_start: f32,
    pub level_length: f32,
    pub level_height: f32,
    pub platforms: Vec<Rect>,
    pub hazards: Vec<Rect>,
    pub crates: Vec<Crate>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    /// Screen shake magnitude, decays every step
    pub shake: f32,
    /// Seconds until the spawn director next tries to spawn
    pub spawn_timer: f32,
}

impl World {
    pub fn new(layout: &LevelLayout) -> Self {
        Self {
            time: 0.0,
            camera: Vec2::ZERO,
            view: Vec2::new(VIEW_WIDTH, VIEW_HEIGHT),
            level_start: layout.level_start,
            level_length: layout.length,
            level_height: layout.height,
            platforms: layout.platforms.clone(),
            hazards: layout.hazards.clone(),
            crates: layout
                .crates
                .iter()
                .map(|c| Crate {
                    rect: c.rect,
                    kind: CrateKind::from_tag(&c.kind),
                })
                .collect(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            shake: 0.0,
            spawn_timer: 0.0,
        }
    }

    /// Whole level as a rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.level_start,
            0.0,
            self.level_length - self.level_start,
            self.level_height,
        )
    }

    /// True when a point lies within `[start, length] x [0, height]`
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.level_start
            && p.x <= self.level_length
            && p.y >= 0.0
            && p.y <= self.level_height
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub player: Player,
    pub world: World,
    pub stats: RunStats,
    /// Events emitted since the last drain, in order
    pub events: Vec<GameEvent>,
    /// Deferred actions on the host clock
    pub timers: TimerQueue,
    /// Latest host clock reading (seconds)
    pub host_time: f64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run with the given seed, balance and level
    pub fn new(seed: u64, tuning: Tuning, layout: &LevelLayout) -> Self {
        let player = Player::new(tuning.player_start, tuning.player_size);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            world: World::new(layout),
            tuning,
            phase: GamePhase::Playing,
            player,
            stats: RunStats::default(),
            events: Vec::new(),
            timers: TimerQueue::default(),
            host_time: 0.0,
            next_id: 1,
        };

        state.equip(Part::light_torso());
        state.equip(Part::blaster_arm());
        state.equip(Part::sprinter_legs());
        state.player.health = state.player.max_health();

        for spawn in &layout.enemies {
            let kind = EnemyKind::from_tag(&spawn.kind);
            state.spawn_enemy(kind, Vec2::new(spawn.x, spawn.y));
        }
        state.world.spawn_timer = state.tuning.spawn_interval_secs;

        log::info!(
            "Run started: seed {}, {} platforms, {} enemies",
            seed,
            state.world.platforms.len(),
            state.world.enemies.len()
        );
        state
    }

    /// A run on the built-in level with default tuning
    pub fn with_defaults(seed: u64) -> Self {
        Self::new(seed, Tuning::default(), &LevelLayout::default())
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn an enemy with its top-left corner at `pos`
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let profile = self.tuning.profile(kind).clone();
        let facing = if self.rng.random::<bool>() { 1.0 } else { -1.0 };
        self.world.enemies.push(Enemy {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            size: Vec2::splat(profile.size),
            health: profile.health,
            max_health: profile.health,
            damage: profile.damage,
            speed: profile.speed,
            facing,
            cooldown: 0.0,
            score: profile.score,
            grounded: false,
            state: EnemyState::Idle,
        });
        log::debug!("Spawned {} #{} at ({:.0}, {:.0})", kind.as_str(), id, pos.x, pos.y);
        id
    }

    /// Equip a part, replacing whatever occupied its slot.
    ///
    /// Derived stats are recomputed and health is clamped to the new maximum.
    /// Changing the weapon slot retires the old weapon instance and cancels
    /// its pending reload.
    pub fn equip(&mut self, part: Part) -> Option<Part> {
        let slot = part.slot();
        log::debug!("Equipping {} in {}", part.name(), slot.as_str());
        let replaced = self.player.loadout.equip(part);
        if slot == Slot::WEAPON {
            self.rearm();
        }
        self.player.health = self.player.health.min(self.player.max_health());
        replaced
    }

    /// Remove the part in `slot`, if any
    pub fn unequip(&mut self, slot: Slot) -> Option<Part> {
        let removed = self.player.loadout.unequip(slot);
        if slot == Slot::WEAPON {
            self.rearm();
        }
        self.player.health = self.player.health.min(self.player.max_health());
        removed
    }

    /// Replace the weapon runtime state with one for the current weapon part
    fn rearm(&mut self) {
        if let Some(old) = self.player.weapon.take() {
            let cancelled = self.cancel_reload(old.id);
            if cancelled > 0 {
                log::debug!("Cancelled reload for retired weapon {:?}", old.id);
            }
        }
        if let Some(part) = self.player.loadout.part(Slot::WEAPON).cloned() {
            let id = WeaponId(self.next_entity_id());
            self.player.weapon = Some(WeaponState::from_part(id, &part, &self.tuning));
        }
    }

    fn cancel_reload(&mut self, weapon: WeaponId) -> usize {
        self.timers.cancel(
            |action| matches!(action, Deferred::ReloadComplete { weapon: w } if *w == weapon),
        )
    }

    /// Advance the host clock and apply every deferred action that is due.
    ///
    /// Runs regardless of phase, so reloads finish while paused.
    pub fn advance_host_clock(&mut self, now: f64) {
        self.host_time = self.host_time.max(now);
        while let Some(action) = self.timers.pop_due(self.host_time) {
            self.apply_deferred(action);
        }
    }

    fn apply_deferred(&mut self, action: Deferred) {
        match action {
            Deferred::ReloadComplete { weapon } => match self.player.weapon.as_mut() {
                Some(w) if w.id == weapon => {
                    w.ammo = w.magazine;
                    w.reloading = false;
                    self.emit(GameEvent::ReloadComplete);
                }
                _ => log::debug!("Ignoring stale reload for weapon {weapon:?}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::equipment::Stat;

    #[test]
    fn test_new_run_defaults() {
        let state = GameState::with_defaults(1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.max_health(), 200.0);
        assert_eq!(state.player.health, 200.0);
        assert_eq!(state.world.enemies.len(), 3);
        assert!(state.world.enemies.iter().all(|e| e.kind == EnemyKind::Walker));
        let weapon = state.player.weapon.as_ref().unwrap();
        assert_eq!(weapon.magazine, 7);
        assert_eq!(weapon.ammo, 7);
    }

    #[test]
    fn test_unknown_tags_fall_back() {
        assert_eq!(EnemyKind::from_tag("DRAGON"), EnemyKind::Walker);
        assert_eq!(EnemyKind::from_tag("TANK"), EnemyKind::Tank);
        assert_eq!(CrateKind::from_tag("mystery"), CrateKind::Health);
        assert_eq!(CrateKind::from_tag("Armor"), CrateKind::Armor);
    }

    #[test]
    fn test_equip_clamps_health() {
        let mut state = GameState::with_defaults(1);
        state.unequip(Slot::Torso);
        assert_eq!(state.player.max_health(), 150.0);
        assert_eq!(state.player.health, 150.0);
    }

    #[test]
    fn test_weapon_swap_cancels_reload() {
        let mut state = GameState::with_defaults(1);
        let old_id = state.player.weapon.as_ref().unwrap().id;
        state
            .timers
            .schedule(1.0, Deferred::ReloadComplete { weapon: old_id });
        state.equip(Part::upgraded_blaster());

        assert!(state.timers.is_empty());
        let weapon = state.player.weapon.as_ref().unwrap();
        assert_ne!(weapon.id, old_id);
        assert_eq!(weapon.magazine, 12);
        let part = state.player.loadout.part(Slot::WEAPON).unwrap();
        assert_eq!(part.stat(Stat::Magazine), Some(12.0));
    }

    #[test]
    fn test_stale_reload_is_noop() {
        let mut state = GameState::with_defaults(1);
        {
            let weapon = state.player.weapon.as_mut().unwrap();
            weapon.ammo = 0;
        }
        // A completion for an instance that no longer exists
        state.timers.schedule(0.5, Deferred::ReloadComplete { weapon: WeaponId(9999) });
        state.advance_host_clock(1.0);

        assert_eq!(state.player.weapon.as_ref().unwrap().ammo, 0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_world_contains() {
        let state = GameState::with_defaults(1);
        assert!(state.world.contains(Vec2::new(10.0, 10.0)));
        assert!(!state.world.contains(Vec2::new(-1.0, 10.0)));
        assert!(!state.world.contains(Vec2::new(10.0, 1001.0)));
        assert!(!state.world.contains(Vec2::new(2001.0, 10.0)));
    }
}
