//! Firing, reloading and projectile lifecycle

use glam::Vec2;
use rand::Rng;

use super::combat::{damage_enemy, damage_player, spawn_hit_sparks};
use super::events::GameEvent;
use super::state::{Bullet, GameState, Side};
use super::timers::Deferred;
use crate::consts::FRAME_RATE;

/// Why a trigger pull did or did not produce a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Fired,
    NoWeapon,
    CoolingDown,
    Reloading,
    /// Magazine was empty; a reload was started instead
    ReloadStarted,
}

/// Pull the trigger toward `aim` (level coordinates)
pub fn fire(state: &mut GameState, aim: Vec2) -> FireOutcome {
    let Some(weapon) = state.player.weapon.as_ref() else {
        return FireOutcome::NoWeapon;
    };
    if weapon.reloading {
        return FireOutcome::Reloading;
    }
    if weapon.cooldown > 0.0 {
        return FireOutcome::CoolingDown;
    }
    if weapon.has_magazine() && weapon.ammo == 0 {
        start_reload(state);
        return FireOutcome::ReloadStarted;
    }
    let spread = weapon.spread;
    let damage = weapon.damage;

    let origin = state.player.center();
    let to_aim = aim - origin;
    let base_angle = if to_aim.length_squared() > f32::EPSILON {
        to_aim.y.atan2(to_aim.x)
    } else if state.player.facing < 0.0 {
        std::f32::consts::PI
    } else {
        0.0
    };
    let angle = base_angle + (state.rng.random::<f32>() - 0.5) * spread;
    let dir = Vec2::new(angle.cos(), angle.sin());

    let fire_rate = match state.player.stats().fire_rate {
        r if r > 0.0 => r,
        _ => state.tuning.default_fire_rate,
    };

    state.world.bullets.push(Bullet {
        pos: origin,
        vel: dir * state.tuning.bullet_speed,
        radius: state.tuning.bullet_radius,
        damage,
        owner: Side::Player,
    });

    if let Some(weapon) = state.player.weapon.as_mut() {
        if weapon.has_magazine() {
            weapon.ammo -= 1;
        }
        weapon.cooldown = 1.0 / fire_rate;
    }
    state.player.vel -= dir * state.tuning.recoil;
    state.emit(GameEvent::Shoot);
    FireOutcome::Fired
}

/// Begin reloading the equipped weapon.
///
/// Completion is scheduled on the host clock against this weapon instance;
/// it is dropped if the weapon is swapped out first. Returns false when
/// there is nothing to reload.
pub fn start_reload(state: &mut GameState) -> bool {
    let Some(weapon) = state.player.weapon.as_mut() else {
        return false;
    };
    if !weapon.has_magazine() || weapon.reloading || weapon.ammo == weapon.magazine {
        return false;
    }
    weapon.reloading = true;
    let id = weapon.id;
    let due = state.host_time + f64::from(weapon.reload_secs);

    state.timers.schedule(due, Deferred::ReloadComplete { weapon: id });
    state.emit(GameEvent::ReloadStart);
    true
}

/// Tick the weapon cooldown
pub fn cool_down(state: &mut GameState, dt: f32) {
    if let Some(weapon) = state.player.weapon.as_mut() {
        weapon.cooldown = (weapon.cooldown - dt).max(0.0);
    }
}

/// Move bullets, cull the ones that left the level, resolve hits
pub fn update_bullets(state: &mut GameState, dt: f32) {
    let frames = dt * FRAME_RATE;

    let mut i = state.world.bullets.len();
    while i > 0 {
        i -= 1;
        let bullet = {
            let b = &mut state.world.bullets[i];
            b.pos += b.vel * frames;
            *b
        };

        if !state.world.contains(bullet.pos) {
            state.world.bullets.remove(i);
            continue;
        }

        let hit = match bullet.owner {
            Side::Enemy => {
                // Passes through the player during the invincibility window
                bullet.rect().overlaps(&state.player.rect())
                    && damage_player(state, bullet.damage).is_some()
            }
            Side::Player => {
                let target = state
                    .world
                    .enemies
                    .iter()
                    .position(|e| bullet.rect().overlaps(&e.rect()));
                match target {
                    Some(index) => {
                        damage_enemy(state, index, bullet.damage);
                        true
                    }
                    None => false,
                }
            }
        };

        if hit {
            let direction = if bullet.vel.x > 0.0 { 1.0 } else { -1.0 };
            spawn_hit_sparks(state, bullet.pos, direction, bullet.owner);
            state.world.bullets.remove(i);
        }
    }
}
