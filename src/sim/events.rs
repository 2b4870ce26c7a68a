//! Discrete gameplay events for audio and UI subscribers

use serde::Serialize;

use super::state::{CrateKind, EnemyKind, Side};

/// Something that happened during a step. Emitted in order, never awaited.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Jump,
    Shoot,
    ReloadStart,
    ReloadComplete,
    CrateOpened { kind: CrateKind },
    /// Damage actually dealt (after armor)
    Hit { victim: Side, amount: f32 },
    EnemyKilled { kind: EnemyKind, score: u64 },
    PlayerDeath,
    LevelComplete,
}
