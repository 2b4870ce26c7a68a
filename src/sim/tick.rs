//! Fixed timestep simulation tick
//!
//! One call advances the run by one sub-step. Update order is fixed:
//! player, enemies, bullets, particles, spawn director, terminal check.
//! A stage that ends the run skips the stages after it.

use glam::Vec2;

use super::ai::update_enemies;
use super::collision::resolve_platforms;
use super::combat::{damage_player, kill_player, knock_back, update_particles};
use super::equipment::Part;
use super::events::GameEvent;
use super::level::update_spawn_director;
use super::state::{CrateKind, GamePhase, GameState};
use super::weapon::{cool_down, fire, start_reload, update_bullets};
use crate::error::SimError;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// -1 left, 0 none, +1 right
    pub move_axis: i8,
    /// Jump held
    pub jump: bool,
    /// Trigger held
    pub fire: bool,
    /// Manual reload (one-shot)
    pub reload: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Aim target in level coordinates
    pub aim: Vec2,
}

impl TickInput {
    /// Same input with the one-shot flags cleared
    pub fn held(&self) -> Self {
        Self {
            reload: false,
            pause: false,
            ..*self
        }
    }
}

/// Advance the game state by one step of `dt` seconds.
///
/// Does nothing while paused or after the run ended. Returns an error when
/// the step left an entity with a non-finite position or velocity.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), SimError> {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused at t={:.2}", state.world.time);
                return Ok(());
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if state.phase.is_frozen() {
        return Ok(());
    }

    state.world.shake *= state.tuning.shake_decay;
    if state.world.shake < 0.1 {
        state.world.shake = 0.0;
    }

    state.world.time += dt;
    state.stats.distance += state.player.vel.x.abs() * dt * 10.0;

    update_player(state, input, dt);
    if !state.phase.is_terminal() {
        update_enemies(state, dt);
    }
    if !state.phase.is_terminal() {
        update_bullets(state, dt);
    }
    if !state.phase.is_terminal() {
        update_particles(state, dt);
        update_spawn_director(state, dt);
    }

    if state.player.health <= 0.0 {
        kill_player(state);
    }

    check_finite(state)
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let speed = state.player.stats().speed;
    let player = &mut state.player;
    player.prev_pos = player.pos;

    match input.move_axis.signum() {
        0 => player.vel.x *= state.tuning.move_friction,
        axis => {
            let axis = f32::from(axis);
            player.vel.x = axis * speed;
            player.facing = axis;
        }
    }

    player.vel.y += state.tuning.gravity;
    let jumped = input.jump && player.on_ground;
    if jumped {
        player.vel.y = state.tuning.jump_velocity;
        player.on_ground = false;
    }

    player.pos += player.vel;
    if player.pos.x < state.world.level_start {
        player.pos.x = state.world.level_start;
        player.vel.x = player.vel.x.max(0.0);
    }

    let contacts = resolve_platforms(
        &mut player.pos,
        &mut player.vel,
        player.size,
        &state.world.platforms,
    );
    player.on_ground = contacts.ground;

    if jumped {
        state.emit(GameEvent::Jump);
    }

    touch_hazards(state);
    open_crates(state);

    let player = &mut state.player;
    if player.invincible {
        player.invincible_timer -= dt;
        if player.invincible_timer <= 0.0 {
            player.invincible = false;
            player.invincible_timer = 0.0;
        }
    }

    cool_down(state, dt);
    if input.reload {
        start_reload(state);
    }
    if input.fire {
        fire(state, input.aim);
    }

    if state.player.pos.y > state.world.level_height {
        log::info!("Player fell out of the level");
        kill_player(state);
    } else if state.player.rect().right() >= state.world.level_length
        && !state.phase.is_terminal()
    {
        state.phase = GamePhase::LevelComplete;
        state.emit(GameEvent::LevelComplete);
        log::info!(
            "Level complete: score {}, kills {}",
            state.stats.score,
            state.stats.kills
        );
    }
}

/// The first spike touched hurts and knocks the player back
fn touch_hazards(state: &mut GameState) {
    if state.player.invincible {
        return;
    }
    let body = state.player.rect();
    let Some(hazard) = state.world.hazards.iter().find(|h| h.overlaps(&body)).copied() else {
        return;
    };

    let damage = state.tuning.hazard_damage;
    damage_player(state, damage);
    knock_back(&mut state.player, &hazard, state.tuning.hazard_knockback);
}

fn open_crates(state: &mut GameState) {
    let body = state.player.rect();
    let mut i = state.world.crates.len();
    while i > 0 {
        i -= 1;
        if state.world.crates[i].rect.overlaps(&body) {
            let opened = state.world.crates.remove(i);
            apply_crate(state, opened.kind);
        }
    }
}

fn apply_crate(state: &mut GameState, kind: CrateKind) {
    match kind {
        CrateKind::Health => {
            let player = &mut state.player;
            player.health = (player.health + state.tuning.crate_heal).min(player.max_health());
        }
        CrateKind::Weapon => {
            state.equip(Part::upgraded_blaster());
        }
        CrateKind::Armor => {
            state.equip(Part::heavy_torso());
        }
    }
    state.stats.crates_opened += 1;
    state.emit(GameEvent::CrateOpened { kind });
    log::info!("Opened {kind:?} crate");
}

fn check_finite(state: &GameState) -> Result<(), SimError> {
    let p = &state.player;
    if !(p.pos.is_finite() && p.vel.is_finite() && p.health.is_finite()) {
        return Err(SimError::NonFinite { what: "player" });
    }
    if state
        .world
        .enemies
        .iter()
        .any(|e| !(e.pos.is_finite() && e.vel.is_finite()))
    {
        return Err(SimError::NonFinite { what: "enemy" });
    }
    if state
        .world
        .bullets
        .iter()
        .any(|b| !(b.pos.is_finite() && b.vel.is_finite()))
    {
        return Err(SimError::NonFinite { what: "bullet" });
    }
    Ok(())
}
