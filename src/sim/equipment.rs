//! Mech parts, derived stats and weapon runtime state

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Equipment slots; each holds at most one part
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    Head,
    Torso,
    LeftArm,
    RightArm,
    Legs,
}

impl Slot {
    /// The slot whose part is fired
    pub const WEAPON: Slot = Slot::RightArm;

    pub const ALL: [Slot; 5] = [Slot::Head, Slot::Torso, Slot::LeftArm, Slot::RightArm, Slot::Legs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Head => "head",
            Slot::Torso => "torso",
            Slot::LeftArm => "leftArm",
            Slot::RightArm => "rightArm",
            Slot::Legs => "legs",
        }
    }
}

/// Stat names a part can modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stat {
    #[serde(rename = "hp")]
    Health,
    #[serde(rename = "speed")]
    Speed,
    #[serde(rename = "armor")]
    Armor,
    #[serde(rename = "rof", alias = "firerate")]
    FireRate,
    #[serde(rename = "dmg")]
    Damage,
    #[serde(rename = "kbResist")]
    KnockbackResist,
    // Weapon-only stats, read from the weapon part directly
    #[serde(rename = "spread")]
    Spread,
    #[serde(rename = "mag")]
    Magazine,
    #[serde(rename = "reload")]
    ReloadTime,
}

/// Player stat block
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub max_health: f32,
    pub speed: f32,
    pub armor: f32,
    /// Shots per second
    pub fire_rate: f32,
    pub damage: f32,
    pub knockback_resist: f32,
}

impl Stats {
    /// Bare chassis stats
    pub fn base() -> Self {
        Self {
            max_health: 150.0,
            speed: 2.8,
            armor: 0.0,
            fire_rate: 0.0,
            damage: 12.0,
            knockback_resist: 0.0,
        }
    }

    /// Add a part delta; weapon-only stats are ignored here
    pub fn apply(&mut self, stat: Stat, delta: f32) {
        match stat {
            Stat::Health => self.max_health += delta,
            Stat::Speed => self.speed += delta,
            Stat::Armor => self.armor += delta,
            Stat::FireRate => self.fire_rate += delta,
            Stat::Damage => self.damage += delta,
            Stat::KnockbackResist => self.knockback_resist += delta,
            Stat::Spread | Stat::Magazine | Stat::ReloadTime => {}
        }
    }
}

/// An equippable mech part. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    slot: Slot,
    name: String,
    stats: BTreeMap<Stat, f32>,
    /// Visual style tag for the renderer
    style: String,
}

impl Part {
    pub fn new(
        slot: Slot,
        name: impl Into<String>,
        stats: impl IntoIterator<Item = (Stat, f32)>,
        style: impl Into<String>,
    ) -> Self {
        Self {
            slot,
            name: name.into(),
            stats: stats.into_iter().collect(),
            style: style.into(),
        }
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn stat(&self, stat: Stat) -> Option<f32> {
        self.stats.get(&stat).copied()
    }

    pub fn stats(&self) -> impl Iterator<Item = (Stat, f32)> + '_ {
        self.stats.iter().map(|(s, v)| (*s, *v))
    }

    pub fn light_torso() -> Self {
        Self::new(
            Slot::Torso,
            "Light Torso",
            [(Stat::Health, 50.0), (Stat::Speed, 0.05)],
            "light",
        )
    }

    pub fn heavy_torso() -> Self {
        Self::new(
            Slot::Torso,
            "Heavy Torso",
            [(Stat::Health, 100.0), (Stat::Speed, -0.03), (Stat::Armor, 10.0)],
            "heavy",
        )
    }

    pub fn blaster_arm() -> Self {
        Self::new(
            Slot::RightArm,
            "Blaster Arm",
            [
                (Stat::Damage, 14.0),
                (Stat::FireRate, 7.0),
                (Stat::Spread, 0.03),
                (Stat::Magazine, 7.0),
                (Stat::ReloadTime, 1.0),
            ],
            "blaster",
        )
    }

    pub fn upgraded_blaster() -> Self {
        Self::new(
            Slot::RightArm,
            "Upgraded Blaster",
            [
                (Stat::Damage, 20.0),
                (Stat::FireRate, 10.0),
                (Stat::Spread, 0.02),
                (Stat::Magazine, 12.0),
                (Stat::ReloadTime, 0.8),
            ],
            "blaster2",
        )
    }

    pub fn sprinter_legs() -> Self {
        Self::new(Slot::Legs, "Sprinter Legs", [(Stat::Speed, 0.20)], "sprinter")
    }
}

/// Equipped parts and the stats derived from them
#[derive(Debug, Clone, PartialEq)]
pub struct Loadout {
    base: Stats,
    parts: BTreeMap<Slot, Part>,
    derived: Stats,
}

impl Loadout {
    pub fn new(base: Stats) -> Self {
        Self {
            base,
            parts: BTreeMap::new(),
            derived: base,
        }
    }

    /// Put `part` in its slot; returns the part it replaced
    pub fn equip(&mut self, part: Part) -> Option<Part> {
        let replaced = self.parts.insert(part.slot(), part);
        self.recalc();
        replaced
    }

    pub fn unequip(&mut self, slot: Slot) -> Option<Part> {
        let removed = self.parts.remove(&slot);
        self.recalc();
        removed
    }

    pub fn part(&self, slot: Slot) -> Option<&Part> {
        self.parts.get(&slot)
    }

    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    pub fn base(&self) -> &Stats {
        &self.base
    }

    pub fn derived(&self) -> &Stats {
        &self.derived
    }

    /// Derived = base + every equipped part's deltas
    fn recalc(&mut self) {
        let mut stats = self.base;
        for part in self.parts.values() {
            for (stat, delta) in part.stats() {
                stats.apply(stat, delta);
            }
        }
        self.derived = stats;
    }
}

/// Stable identity of one equipped weapon instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeaponId(pub u32);

/// Mutable state of the equipped weapon
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponState {
    pub id: WeaponId,
    pub ammo: u32,
    /// 0 means unlimited ammo
    pub magazine: u32,
    /// Seconds until the next shot is allowed
    pub cooldown: f32,
    pub reloading: bool,
    /// Total angular spread in radians
    pub spread: f32,
    pub reload_secs: f32,
    /// Damage carried by each bullet
    pub damage: f32,
}

impl WeaponState {
    /// Fresh weapon with a full magazine
    pub fn from_part(id: WeaponId, part: &Part, tuning: &Tuning) -> Self {
        let magazine = part.stat(Stat::Magazine).unwrap_or(0.0).max(0.0) as u32;
        Self {
            id,
            ammo: magazine,
            magazine,
            cooldown: 0.0,
            reloading: false,
            spread: part.stat(Stat::Spread).unwrap_or(tuning.default_spread),
            reload_secs: part
                .stat(Stat::ReloadTime)
                .unwrap_or(tuning.default_reload_secs),
            damage: part
                .stat(Stat::Damage)
                .filter(|d| *d > 0.0)
                .unwrap_or(tuning.default_bullet_damage),
        }
    }

    pub fn has_magazine(&self) -> bool {
        self.magazine > 0
    }
}
