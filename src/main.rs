//! Mech Runner entry point
//!
//! Native builds play a headless scripted run and log what happens, which is
//! handy for balance work: `RUST_LOG=info mech-runner [tuning.json]`.
//! The browser build is driven from JS through `platform::WebGame`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use mech_runner::sim::{GameEvent, GameState, LevelLayout, RenderSnapshot, TickInput};
    use mech_runner::{ConfigError, FrameScheduler, RenderSink, SimError, Tuning};

    /// Give up after five simulated minutes
    const MAX_FRAMES: u64 = 60 * 60 * 5;
    const FRAME_SECS: f64 = 1.0 / 60.0;

    /// Logs a status line once per simulated second
    #[derive(Default)]
    struct LogSink {
        frames: u64,
    }

    impl RenderSink for LogSink {
        fn present(&mut self, snapshot: &RenderSnapshot) -> Result<(), SimError> {
            self.frames += 1;
            if self.frames % 60 == 0 {
                let ammo = snapshot
                    .weapon
                    .as_ref()
                    .map(|w| format!("{}/{}", w.ammo, w.magazine))
                    .unwrap_or_else(|| "-".into());
                log::info!(
                    "t={:>5.1}s x={:>6.0} hp={:>3.0}/{:.0} ammo={} enemies={} score={}",
                    snapshot.time,
                    snapshot.player.rect.x,
                    snapshot.player.health,
                    snapshot.player.max_health,
                    ammo,
                    snapshot.enemies.len(),
                    snapshot.stats.score
                );
            }
            Ok(())
        }
    }

    /// Run right, hop over spikes, shoot whatever is closest
    fn autopilot(frame: u64, state: &GameState) -> TickInput {
        let player = &state.player;
        let center = player.center();
        let front = player.rect().right();

        let spike_ahead = state
            .world
            .hazards
            .iter()
            .any(|h| (0.0..40.0).contains(&(h.x - front)));

        let target = state
            .world
            .enemies
            .iter()
            .map(|e| e.center())
            .filter(|c| c.distance(center) < 400.0)
            .min_by(|a, b| a.distance(center).total_cmp(&b.distance(center)));

        let reload = player
            .weapon
            .as_ref()
            .is_some_and(|w| w.has_magazine() && w.ammo == 0 && !w.reloading);

        TickInput {
            move_axis: 1,
            jump: spike_ahead || frame % 90 == 0,
            fire: target.is_some(),
            reload,
            pause: false,
            aim: target.unwrap_or(center + Vec2::new(200.0, 0.0)),
        }
    }

    fn seed() -> Result<u64, ConfigError> {
        match std::env::var("MECH_RUNNER_SEED") {
            Ok(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
                field: "MECH_RUNNER_SEED",
                reason: format!("{e}"),
            }),
            Err(_) => Ok(1),
        }
    }

    pub fn run() -> Result<(), ConfigError> {
        let tuning = match std::env::args().nth(1) {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let seed = seed()?;

        let mut scheduler = FrameScheduler::new(seed, tuning, LevelLayout::default());
        scheduler.subscribe(|event| match event {
            GameEvent::EnemyKilled { .. }
            | GameEvent::CrateOpened { .. }
            | GameEvent::PlayerDeath
            | GameEvent::LevelComplete => log::info!("{event:?}"),
            _ => log::debug!("{event:?}"),
        });

        let mut sink = LogSink::default();
        for frame in 0..MAX_FRAMES {
            let input = autopilot(frame, scheduler.state());
            scheduler.set_input(input);
            scheduler.frame(frame as f64 * FRAME_SECS, &mut sink);

            if let Some(notice) = scheduler.notice() {
                log::warn!("{notice}");
                break;
            }
            if scheduler.state().phase.is_terminal() {
                break;
            }
        }

        let state = scheduler.state();
        println!(
            "{:?} after {:.1}s: score {}, kills {}, crates {}, distance {:.0}",
            state.phase,
            state.world.time,
            state.stats.score,
            state.stats.kills,
            state.stats.crates_opened,
            state.stats.distance / 100.0
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mech Runner (native, headless) starting...");

    if let Err(err) = headless::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
