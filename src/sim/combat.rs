//! Damage, death accounting, knockback and combat effects

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::rect::Rect;
use super::state::{GamePhase, GameState, Particle, Player, Side};
use crate::consts::{FRAME_RATE, MAX_PARTICLES};
use crate::rand_range;

const PLAYER_SPARK_COLOR: u32 = 0xf1c40f;
const ENEMY_SPARK_COLOR: u32 = 0xff6b6b;
const EXPLOSION_COLORS: [u32; 3] = [0xf1c40f, 0xe67e22, 0xe74c3c];

/// Damage the player.
///
/// No-op while invincible. Otherwise deals `max(1, amount - armor)`, re-arms
/// the invincibility window, shakes the screen and ends the run at 0 health.
/// Returns the damage actually dealt.
pub fn damage_player(state: &mut GameState, amount: f32) -> Option<f32> {
    if state.player.invincible {
        return None;
    }

    let dealt = (amount - state.player.stats().armor).max(1.0);
    let player = &mut state.player;
    player.health -= dealt;
    player.invincible = true;
    player.invincible_timer = state.tuning.invincibility_secs;
    state.world.shake = state.tuning.hit_shake;
    state.emit(GameEvent::Hit {
        victim: Side::Player,
        amount: dealt,
    });

    if state.player.health <= 0.0 {
        state.player.health = 0.0;
        kill_player(state);
    }
    Some(dealt)
}

/// End the run with the player dead (idempotent)
pub fn kill_player(state: &mut GameState) {
    if state.phase.is_terminal() {
        return;
    }
    state.player.health = 0.0;
    state.phase = GamePhase::GameOver;
    state.emit(GameEvent::PlayerDeath);
    log::info!(
        "Game over: score {}, kills {}, distance {:.0}",
        state.stats.score,
        state.stats.kills,
        state.stats.distance / 100.0
    );
}

/// Damage the enemy at `index`; enemies take the raw amount.
///
/// At 0 health the enemy is removed immediately, its score and a kill are
/// credited and a death burst spawns at its center. Returns true on a kill.
pub fn damage_enemy(state: &mut GameState, index: usize, amount: f32) -> bool {
    let Some(enemy) = state.world.enemies.get_mut(index) else {
        return false;
    };
    enemy.health = (enemy.health - amount).max(0.0);
    state.emit(GameEvent::Hit {
        victim: Side::Enemy,
        amount,
    });

    if state.world.enemies[index].health > 0.0 {
        return false;
    }

    let enemy = state.world.enemies.remove(index);
    state.stats.score += enemy.score;
    state.stats.kills += 1;
    spawn_explosion(state, enemy.center());
    state.emit(GameEvent::EnemyKilled {
        kind: enemy.kind,
        score: enemy.score,
    });
    log::debug!("Killed {} #{} (+{})", enemy.kind.as_str(), enemy.id, enemy.score);
    true
}

/// Spike knockback: fixed shove away from the hazard plus a hop
pub fn knock_back(player: &mut Player, hazard: &Rect, impulse: Vec2) {
    let away = if player.pos.x < hazard.x { -1.0 } else { 1.0 };
    player.vel = Vec2::new(away * impulse.x, impulse.y);
}

fn push_particle(state: &mut GameState, particle: Particle) {
    if state.world.particles.len() < MAX_PARTICLES {
        state.world.particles.push(particle);
    }
}

/// Small directional burst where a bullet landed
pub fn spawn_hit_sparks(state: &mut GameState, pos: Vec2, direction: f32, owner: Side) {
    let color = match owner {
        Side::Player => PLAYER_SPARK_COLOR,
        Side::Enemy => ENEMY_SPARK_COLOR,
    };
    for _ in 0..5 {
        let vel = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * 3.0 + direction * 2.0,
            (state.rng.random::<f32>() - 0.5) * 3.0 - 2.0,
        );
        let size = rand_range(&mut state.rng, 1.0, 4.0);
        push_particle(
            state,
            Particle {
                pos,
                vel,
                size,
                color,
                alpha: 1.0,
                life: 1.0,
            },
        );
    }
}

/// Ring of debris when an enemy dies
pub fn spawn_explosion(state: &mut GameState, pos: Vec2) {
    for _ in 0..20 {
        let angle = rand_range(&mut state.rng, 0.0, std::f32::consts::TAU);
        let speed = rand_range(&mut state.rng, 1.0, 4.0);
        let size = rand_range(&mut state.rng, 2.0, 6.0);
        let color = EXPLOSION_COLORS[state.rng.random_range(0..EXPLOSION_COLORS.len())];
        push_particle(
            state,
            Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                size,
                color,
                alpha: 1.0,
                life: 1.0,
            },
        );
    }
}

/// Drift, fall and fade particles; drop the spent ones
pub fn update_particles(state: &mut GameState, dt: f32) {
    let frames = dt * FRAME_RATE;
    for p in &mut state.world.particles {
        p.pos += p.vel * frames;
        p.vel.y += 0.1 * frames;
        p.life -= 0.02 * frames;
        p.alpha = p.life.max(0.0);
    }
    state.world.particles.retain(|p| p.life > 0.0);
}
