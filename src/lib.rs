//! Mech Runner - A side-scrolling mech platform shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, AI, combat)
//! - `scheduler`: Clamped-timestep frame driver and fault recovery
//! - `platform`: Browser host glue
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod platform;
pub mod scheduler;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, SimError};
pub use scheduler::{FrameScheduler, RenderSink};
pub use tuning::Tuning;

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the scheduler accepts (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Fixed sub-step length (one 60 Hz frame)
    pub const SUBSTEP_DT: f32 = 1.0 / 60.0;
    /// Maximum sub-steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Bullets and particles are tuned in units per 60 Hz frame
    pub const FRAME_RATE: f32 = 60.0;

    /// Maximum live particles
    pub const MAX_PARTICLES: usize = 512;

    /// Default host viewport
    pub const VIEW_WIDTH: f32 = 960.0;
    pub const VIEW_HEIGHT: f32 = 600.0;
}

/// Clamp `v` into `[lo, hi]`.
///
/// Unlike `f32::clamp` this never panics when `lo > hi` (a level narrower
/// than the viewport); the lower bound wins.
#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    lo.max(hi.min(v))
}

/// Uniform random value in `[lo, hi)`
#[inline]
pub fn rand_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
        // Inverted bounds fall back to the lower bound
        assert_eq!(clamp(3.0, 10.0, 0.0), 10.0);
    }

    #[test]
    fn test_rand_range_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let v = rand_range(&mut rng, -2.0, 3.0);
            assert!((-2.0..3.0).contains(&v));
        }
    }
}
