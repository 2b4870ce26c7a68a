//! Frame driver
//!
//! Called once per display refresh by the host. Clamps the elapsed time,
//! drains it through an accumulator in fixed sub-steps, moves the camera,
//! hands a snapshot to the renderer and fans out the frame's events.
//!
//! A failing frame never takes the scheduler down: the run is rebuilt,
//! paused and a notice is raised for the UI. The host keeps calling
//! [`FrameScheduler::frame`] either way.

use glam::Vec2;

use crate::clamp;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SUBSTEP_DT};
use crate::error::SimError;
use crate::sim::{GameEvent, GamePhase, GameState, LevelLayout, RenderSnapshot, TickInput, tick};
use crate::tuning::Tuning;

/// Camera easing factor per frame
const CAMERA_LERP: f32 = 0.1;
/// How far ahead of the player the camera looks, in the facing direction
const CAMERA_LOOKAHEAD: f32 = 100.0;

/// Consumer of per-frame snapshots (canvas, GPU, log, test recorder)
pub trait RenderSink {
    fn present(&mut self, snapshot: &RenderSnapshot) -> Result<(), SimError>;
}

/// Callback invoked for every event, in emission order
pub type EventHandler = Box<dyn FnMut(&GameEvent)>;

/// Float slack when comparing the accumulator against one step
const STEP_EPSILON: f32 = 1e-5;

/// Frames-per-second over one-second windows
#[derive(Debug, Clone, Default)]
struct FpsCounter {
    window_start: Option<f64>,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    fn record(&mut self, now: f64) {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        let elapsed = now - start;
        if elapsed >= 1.0 {
            self.fps = (f64::from(self.frames) / elapsed).round() as u32;
            self.frames = 0;
            self.window_start = Some(now);
        }
    }
}

/// Owns the running game and drives it from host timestamps
pub struct FrameScheduler {
    state: GameState,
    tuning: Tuning,
    layout: LevelLayout,
    seed: u64,
    input: TickInput,
    last_time: Option<f64>,
    /// Unsimulated wall time carried to the next frame
    accumulator: f32,
    fps: FpsCounter,
    subscribers: Vec<EventHandler>,
    last_events: Vec<GameEvent>,
    notice: Option<String>,
}

impl FrameScheduler {
    pub fn new(seed: u64, tuning: Tuning, layout: LevelLayout) -> Self {
        let state = GameState::new(seed, tuning.clone(), &layout);
        Self {
            state,
            tuning,
            layout,
            seed,
            input: TickInput::default(),
            last_time: None,
            accumulator: 0.0,
            fps: FpsCounter::default(),
            subscribers: Vec::new(),
            last_events: Vec::new(),
            notice: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps
    }

    /// Message for the UI after a recovered fault
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Events emitted during the most recent frame
    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&GameEvent) + 'static) {
        self.subscribers.push(Box::new(handler));
    }

    /// Replace the held input; pending one-shot requests are kept
    pub fn set_input(&mut self, input: TickInput) {
        self.input = TickInput {
            reload: self.input.reload || input.reload,
            pause: self.input.pause || input.pause,
            ..input
        };
    }

    pub fn input_mut(&mut self) -> &mut TickInput {
        &mut self.input
    }

    /// Request a pause toggle on the next step
    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
        self.notice = None;
    }

    /// Request a manual reload on the next step
    pub fn request_reload(&mut self) {
        self.input.reload = true;
    }

    /// Viewport size in level units
    pub fn set_view(&mut self, width: f32, height: f32) {
        self.state.world.view = Vec2::new(width, height);
    }

    /// Throw the current run away and start a fresh one
    pub fn restart(&mut self) {
        self.seed = self.seed.wrapping_add(1);
        let host_time = self.state.host_time;
        let view = self.state.world.view;

        self.state = GameState::new(self.seed, self.tuning.clone(), &self.layout);
        self.state.host_time = host_time;
        self.state.world.view = view;
        self.input = self.input.held();
        self.accumulator = 0.0;
        log::info!("Run restarted with seed {}", self.seed);
    }

    /// Run one display frame at host time `now` (seconds)
    pub fn frame(&mut self, now: f64, sink: &mut dyn RenderSink) {
        self.state.advance_host_clock(now);

        let dt = match self.last_time {
            Some(last) => ((now - last) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_time = Some(now);
        self.fps.record(now);

        let result = self.run_frame(dt, sink);
        self.dispatch_events();

        if let Err(err) = result {
            self.recover(&err);
        }
    }

    fn run_frame(&mut self, dt: f32, sink: &mut dyn RenderSink) -> Result<(), SimError> {
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator + STEP_EPSILON >= SUBSTEP_DT && steps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SUBSTEP_DT)?;
            self.input = self.input.held();
            self.accumulator -= SUBSTEP_DT;
            steps += 1;

            if self.state.phase == GamePhase::Playing {
                self.update_camera();
            }
        }
        if steps == MAX_SUBSTEPS {
            // Backlog past the cap is dropped
            self.accumulator = 0.0;
        }
        self.accumulator = self.accumulator.max(0.0);

        sink.present(&RenderSnapshot::capture(&self.state))
    }

    /// Ease toward a point ahead of the player, kept inside the level
    fn update_camera(&mut self) {
        let world = &mut self.state.world;
        let player = &self.state.player;

        let target = Vec2::new(
            player.pos.x + player.facing * CAMERA_LOOKAHEAD - world.view.x / 2.0,
            player.pos.y - world.view.y / 3.0,
        );
        let camera = world.camera + (target - world.camera) * CAMERA_LERP;
        world.camera = Vec2::new(
            clamp(camera.x, world.level_start, world.level_length - world.view.x),
            clamp(camera.y, 0.0, world.level_height - world.view.y),
        );
    }

    fn dispatch_events(&mut self) {
        self.last_events = self.state.drain_events();
        for event in &self.last_events {
            for handler in &mut self.subscribers {
                handler(event);
            }
        }
    }

    fn recover(&mut self, err: &SimError) {
        log::error!("Frame failed: {err}; rebuilding the run");
        self.restart();
        self.state.phase = GamePhase::Paused;
        self.notice = Some(format!(
            "Something went wrong ({err}). The game was reset; unpause to continue."
        ));
    }
}
