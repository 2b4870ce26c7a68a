//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Step length supplied by the caller, never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod combat;
pub mod equipment;
pub mod events;
pub mod level;
pub mod rect;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timers;
pub mod weapon;

pub use ai::{update_enemies, update_enemy};
pub use collision::{Contacts, land_on_platforms, resolve_platforms};
pub use combat::{damage_enemy, damage_player, kill_player, knock_back};
pub use equipment::{Loadout, Part, Slot, Stat, Stats, WeaponId, WeaponState};
pub use events::GameEvent;
pub use level::{CrateSpec, EnemySpec, LevelLayout, update_spawn_director};
pub use rect::Rect;
pub use snapshot::RenderSnapshot;
pub use state::{
    Bullet, Crate, CrateKind, Enemy, EnemyKind, EnemyState, GamePhase, GameState, Particle, Player,
    RunStats, Side, World,
};
pub use tick::{TickInput, tick};
pub use timers::{Deferred, TimerQueue};
pub use weapon::{FireOutcome, fire, start_reload, update_bullets};
