//! Enemy behavior
//!
//! Every variant shares the same body: gravity, landing on platforms (no
//! horizontal clipping) and a distance gate before any offense. The variant
//! decides how it moves and what it does once the player is close.

use glam::Vec2;

use super::collision::land_on_platforms;
use super::combat::damage_player;
use super::rect::Rect;
use super::state::{Bullet, Enemy, EnemyKind, EnemyState, GameState, Side};
use crate::tuning::{EnemyProfile, Tuning};

/// What an enemy wants to do to the player this step
#[derive(Debug, Clone, Copy, PartialEq)]
enum Attack {
    None,
    /// Melee or contact damage, resolved against the player immediately
    Strike(f32),
    Shoot(Bullet),
}

/// Update every enemy, then drop the ones that fell out of the level
pub fn update_enemies(state: &mut GameState, dt: f32) {
    for index in 0..state.world.enemies.len() {
        update_enemy(state, index, dt);
    }

    let floor = state.world.level_height;
    let before = state.world.enemies.len();
    state.world.enemies.retain(|e| e.pos.y <= floor);
    let culled = before - state.world.enemies.len();
    if culled > 0 {
        log::debug!("Culled {culled} enemies below the level");
    }
}

/// Single entry point for all enemy variants
pub fn update_enemy(state: &mut GameState, index: usize, dt: f32) {
    let target = state.player.rect();
    let player_pos = state.player.pos;
    let Some(enemy) = state.world.enemies.get_mut(index) else {
        return;
    };
    let profile = state.tuning.profile(enemy.kind);

    if enemy.kind == EnemyKind::Walker {
        patrol(enemy, state.world.level_start, state.world.level_length);
    }

    enemy.vel.y += state.tuning.gravity;
    enemy.pos += enemy.vel;
    enemy.grounded = land_on_platforms(
        &mut enemy.pos,
        &mut enemy.vel,
        enemy.size,
        &state.world.platforms,
    );
    if enemy.grounded && enemy.kind != EnemyKind::Walker {
        enemy.vel.x *= state.tuning.ground_friction;
    }

    let to_player = player_pos - enemy.pos;
    let dist = to_player.length();
    if dist < profile.aggro_range {
        enemy.facing = if to_player.x > 0.0 { 1.0 } else { -1.0 };
    }
    enemy.state = classify(dist, profile);

    let attack = match enemy.kind {
        EnemyKind::Walker => walker_attack(enemy, profile, &state.tuning, dist, &target),
        EnemyKind::Jumper => jumper_attack(enemy, profile, &state.tuning, dist),
        EnemyKind::Tank => tank_attack(enemy, profile, &state.tuning, to_player, dist),
    };

    if enemy.cooldown > 0.0 {
        enemy.cooldown -= dt;
    }

    match attack {
        Attack::None => {}
        Attack::Strike(damage) => {
            damage_player(state, damage);
        }
        Attack::Shoot(bullet) => state.world.bullets.push(bullet),
    }
}

fn classify(dist: f32, profile: &EnemyProfile) -> EnemyState {
    if dist < profile.aggro_range.min(profile.attack_range) {
        EnemyState::Attacking
    } else if dist < profile.aggro_range {
        EnemyState::Pursuing
    } else {
        EnemyState::Idle
    }
}

/// Walk at constant speed, turning around at either end of the level
fn patrol(enemy: &mut Enemy, level_start: f32, level_end: f32) {
    if enemy.pos.x <= level_start {
        enemy.facing = 1.0;
    } else if enemy.pos.x + enemy.size.x >= level_end {
        enemy.facing = -1.0;
    }
    enemy.vel.x = enemy.facing * enemy.speed;
}

/// Short-reach swing in the facing direction, gated by the cooldown
fn walker_attack(
    enemy: &mut Enemy,
    profile: &EnemyProfile,
    tuning: &Tuning,
    dist: f32,
    target: &Rect,
) -> Attack {
    if dist >= profile.attack_range || enemy.cooldown > 0.0 {
        return Attack::None;
    }

    let reach = tuning.walker_reach;
    let x = if enemy.facing > 0.0 {
        enemy.pos.x + enemy.size.x
    } else {
        enemy.pos.x - reach
    };
    let hitbox = Rect::new(x, enemy.pos.y, reach, enemy.size.y);
    enemy.cooldown = profile.cooldown;

    if hitbox.overlaps(target) {
        Attack::Strike(enemy.damage)
    } else {
        Attack::None
    }
}

/// Hop toward the player when grounded; hurt on contact every step
fn jumper_attack(enemy: &mut Enemy, profile: &EnemyProfile, tuning: &Tuning, dist: f32) -> Attack {
    if dist >= profile.aggro_range {
        return Attack::None;
    }

    if enemy.grounded && enemy.cooldown <= 0.0 {
        enemy.vel = Vec2::new(enemy.facing * tuning.jumper_launch.x, tuning.jumper_launch.y);
        enemy.cooldown = profile.cooldown;
    }

    // No cooldown on contact damage; only the player's invincibility gates it
    if dist < profile.attack_range {
        Attack::Strike(enemy.damage)
    } else {
        Attack::None
    }
}

/// Fire an aimed shot from the body center and recoil away from it
fn tank_attack(
    enemy: &mut Enemy,
    profile: &EnemyProfile,
    tuning: &Tuning,
    to_player: Vec2,
    dist: f32,
) -> Attack {
    if dist >= profile.aggro_range.min(profile.attack_range) || enemy.cooldown > 0.0 {
        return Attack::None;
    }

    let angle = to_player.y.atan2(to_player.x);
    let dir = Vec2::new(angle.cos(), angle.sin());
    enemy.cooldown = profile.cooldown;
    enemy.vel = -dir * tuning.tank_recoil;

    Attack::Shoot(Bullet {
        pos: enemy.center(),
        vel: dir * tuning.enemy_bullet_speed,
        radius: tuning.enemy_bullet_radius,
        damage: enemy.damage,
        owner: Side::Enemy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f32 = 1.0 / 60.0;

    /// Player standing on the ground near the start, no enemies
    fn state() -> GameState {
        let mut state = GameState::with_defaults(11);
        state.world.enemies.clear();
        state.player.pos = Vec2::new(40.0, 506.0);
        state
    }

    fn spawn_on_ground(state: &mut GameState, kind: EnemyKind, x: f32) -> usize {
        let size = state.tuning.profile(kind).size;
        state.spawn_enemy(kind, Vec2::new(x, 540.0 - size));
        state.world.enemies.len() - 1
    }

    #[test]
    fn test_walker_turns_at_level_start() {
        let mut state = state();
        state.player.pos = Vec2::new(1500.0, 506.0);
        let i = spawn_on_ground(&mut state, EnemyKind::Walker, 0.0);
        state.world.enemies[i].facing = -1.0;

        update_enemy(&mut state, i, STEP);
        let walker = &state.world.enemies[i];
        assert_eq!(walker.facing, 1.0);
        assert_eq!(walker.vel.x, 0.5);
        assert!(walker.grounded);
        assert_eq!(walker.state, EnemyState::Idle);
    }

    #[test]
    fn test_walker_melee_is_cooled_down() {
        let mut state = state();
        let i = spawn_on_ground(&mut state, EnemyKind::Walker, 70.0);

        update_enemy(&mut state, i, STEP);
        let walker = &state.world.enemies[i];
        assert_eq!(walker.facing, -1.0);
        assert_eq!(walker.state, EnemyState::Attacking);
        assert!(walker.cooldown > 1.4);
        assert_eq!(state.player.health, 195.0);

        // Vulnerable again, but the swing is still cooling down
        state.player.invincible = false;
        update_enemy(&mut state, i, STEP);
        assert_eq!(state.player.health, 195.0);
    }

    #[test]
    fn test_jumper_launches_toward_player() {
        let mut state = state();
        let i = spawn_on_ground(&mut state, EnemyKind::Jumper, 200.0);

        update_enemy(&mut state, i, STEP);
        let jumper = &state.world.enemies[i];
        assert_eq!(jumper.vel, Vec2::new(-4.0, -12.0));
        assert!(jumper.cooldown > 1.9);
        assert_eq!(jumper.state, EnemyState::Pursuing);
        assert_eq!(state.player.health, 200.0);

        // Airborne: no second launch
        update_enemy(&mut state, i, STEP);
        assert!(!state.world.enemies[i].grounded);
        assert!(state.world.enemies[i].vel.y > -12.0);
    }

    #[test]
    fn test_jumper_contact_damage_has_no_cooldown() {
        let mut state = state();
        let i = spawn_on_ground(&mut state, EnemyKind::Jumper, 60.0);
        state.world.enemies[i].cooldown = 10.0;

        update_enemy(&mut state, i, STEP);
        assert_eq!(state.player.health, 185.0);
        state.player.invincible = false;
        update_enemy(&mut state, i, STEP);
        assert_eq!(state.player.health, 170.0);
    }

    #[test]
    fn test_tank_shoots_and_recoils() {
        let mut state = state();
        let i = spawn_on_ground(&mut state, EnemyKind::Tank, 300.0);

        update_enemy(&mut state, i, STEP);
        assert_eq!(state.world.bullets.len(), 1);
        let bullet = state.world.bullets[0];
        assert_eq!(bullet.owner, Side::Enemy);
        assert_eq!(bullet.radius, 5.0);
        assert_eq!(bullet.damage, 25.0);
        assert!(bullet.vel.x < -4.9);
        assert_eq!(bullet.pos, state.world.enemies[i].center());

        let tank = &state.world.enemies[i];
        assert!(tank.vel.x > 1.9);
        assert_eq!(tank.state, EnemyState::Attacking);

        update_enemy(&mut state, i, STEP);
        assert_eq!(state.world.bullets.len(), 1);
    }

    #[test]
    fn test_far_enemies_stay_idle() {
        let mut state = state();
        let tank = spawn_on_ground(&mut state, EnemyKind::Tank, 900.0);
        let jumper = spawn_on_ground(&mut state, EnemyKind::Jumper, 900.0);

        for _ in 0..10 {
            update_enemies(&mut state, STEP);
        }
        assert!(state.world.bullets.is_empty());
        assert_eq!(state.world.enemies[tank].state, EnemyState::Idle);
        assert_eq!(state.world.enemies[jumper].vel.x, 0.0);
        assert_eq!(state.player.health, 200.0);
    }

    #[test]
    fn test_fallen_enemies_culled_without_score() {
        let mut state = state();
        state.spawn_enemy(EnemyKind::Walker, Vec2::new(1500.0, 1001.0));
        update_enemies(&mut state, STEP);
        assert!(state.world.enemies.is_empty());
        assert_eq!(state.stats.score, 0);
        assert_eq!(state.stats.kills, 0);
    }
}
