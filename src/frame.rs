//! Frame driver
//!
//! The animation loop as an explicit state machine. The host owns the actual
//! scheduling primitive (requestAnimationFrame, a plain loop, a test) and
//! calls `tick` once per refresh; the driver decides whether that tick does
//! any work and asks the host to schedule the next one before doing it.
//!
//! ```text
//!   Idle --start--> Scheduled --tick--> Running --(render done)--> Scheduled
//!                     |   ^                                           |
//!                   pause start                                       |
//!                     v   |                                           |
//!                    Paused        any --cancel--> Cancelled (terminal)
//! ```

use crate::app::SceneContext;
use crate::camera::PerspectiveCamera;
use crate::consts::FRAME_STEP;
use crate::sim::SceneGraph;

/// The render step, as seen by the frame driver
pub trait SceneRenderer {
    type Error;

    /// Draw the scene as it is now
    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<(), Self::Error>;
}

/// Loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Never started
    Idle,
    /// Waiting for the next refresh
    Scheduled,
    /// Inside a tick
    Running,
    /// Stopped, can be started again
    Paused,
    /// Stopped for good
    Cancelled,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Shapes advanced and the renderer ran
    Rendered,
    /// The loop was not scheduled; nothing happened and nothing was rescheduled
    Skipped,
}

/// Controllable animation loop
#[derive(Debug, Clone)]
pub struct FrameDriver {
    state: FrameState,
    /// A host tick has been requested and not yet delivered
    pending: bool,
    /// Frames rendered so far
    frames: u64,
    /// Frames of motion per tick
    dt_frames: f32,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            state: FrameState::Idle,
            pending: false,
            frames: 0,
            dt_frames: FRAME_STEP,
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, FrameState::Scheduled | FrameState::Running)
    }

    /// Start or resume the loop.
    ///
    /// Returns true when the host must request a tick. If a request is
    /// still in flight it is reused instead.
    pub fn start(&mut self) -> bool {
        match self.state {
            FrameState::Idle | FrameState::Paused => {
                self.state = FrameState::Scheduled;
                log::info!("Frame loop started");
                if self.pending {
                    false
                } else {
                    self.pending = true;
                    true
                }
            }
            FrameState::Scheduled | FrameState::Running | FrameState::Cancelled => false,
        }
    }

    /// Stop after the current frame; the next delivered tick is a no-op
    pub fn pause(&mut self) {
        if self.is_active() {
            self.state = FrameState::Paused;
            log::info!("Frame loop paused after {} frames", self.frames);
        }
    }

    /// Pause if running, otherwise start. Returns true when the host must
    /// request a tick.
    pub fn toggle(&mut self) -> bool {
        if self.is_active() {
            self.pause();
            false
        } else {
            self.start()
        }
    }

    /// Stop for good
    pub fn cancel(&mut self) {
        if self.state != FrameState::Cancelled {
            self.state = FrameState::Cancelled;
            log::info!("Frame loop cancelled after {} frames", self.frames);
        }
    }

    /// Whether a host tick request is outstanding (for cancelling it)
    pub fn has_pending_tick(&self) -> bool {
        self.pending
    }

    /// Handle one host tick.
    ///
    /// When scheduled: enter Running, call `reschedule` so the loop keeps
    /// itself alive, advance every shape and the camera controls, then
    /// render. Render errors are returned after the state has settled, so
    /// the loop survives them.
    pub fn tick<R: SceneRenderer>(
        &mut self,
        ctx: &mut SceneContext,
        renderer: &mut R,
        reschedule: impl FnOnce(),
    ) -> Result<FrameOutcome, R::Error> {
        self.pending = false;
        if self.state != FrameState::Scheduled {
            return Ok(FrameOutcome::Skipped);
        }

        self.state = FrameState::Running;
        self.pending = true;
        reschedule();

        ctx.advance_frame(self.dt_frames);
        self.frames += 1;

        let result = renderer.render(&ctx.scene, &ctx.camera);

        if self.state == FrameState::Running {
            self.state = FrameState::Scheduled;
        }
        result.map(|()| FrameOutcome::Rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::settings::Settings;
    use std::cell::RefCell;

    /// Records what the renderer saw
    struct Recorder<'a> {
        log: &'a RefCell<Vec<String>>,
        angles: Vec<Vec<f32>>,
        fail: bool,
    }

    impl SceneRenderer for Recorder<'_> {
        type Error = &'static str;

        fn render(&mut self, scene: &SceneGraph, _camera: &PerspectiveCamera) -> Result<(), Self::Error> {
            self.log.borrow_mut().push("render".into());
            self.angles.push(scene.shapes.iter().map(|s| s.angle).collect());
            if self.fail { Err("surface lost") } else { Ok(()) }
        }
    }

    fn context() -> SceneContext {
        SceneContext::new(Settings::default(), Viewport::new(640, 480), 99).unwrap()
    }

    #[test]
    fn test_idle_tick_is_skipped() {
        let log = RefCell::new(Vec::new());
        let mut renderer = Recorder { log: &log, angles: Vec::new(), fail: false };
        let mut ctx = context();
        let mut driver = FrameDriver::new();
        let mut rescheduled = false;

        let outcome = driver.tick(&mut ctx, &mut renderer, || rescheduled = true).unwrap();
        assert_eq!(outcome, FrameOutcome::Skipped);
        assert!(!rescheduled);
        assert!(log.borrow().is_empty());
        assert_eq!(driver.frames(), 0);
    }

    #[test]
    fn test_tick_reschedules_then_advances_then_renders() {
        let log = RefCell::new(Vec::new());
        let mut renderer = Recorder { log: &log, angles: Vec::new(), fail: false };
        let mut ctx = context();
        let before: Vec<f32> = ctx.scene.shapes.iter().map(|s| s.angle).collect();
        let mut driver = FrameDriver::new();

        assert!(driver.start());
        let outcome = driver
            .tick(&mut ctx, &mut renderer, || log.borrow_mut().push("reschedule".into()))
            .unwrap();

        assert_eq!(outcome, FrameOutcome::Rendered);
        assert_eq!(*log.borrow(), ["reschedule", "render"]);
        assert_eq!(driver.state(), FrameState::Scheduled);
        assert_eq!(driver.frames(), 1);

        // The renderer saw every shape already advanced by one step
        for ((seen, old), shape) in renderer.angles[0].iter().zip(&before).zip(&ctx.scene.shapes) {
            assert!((seen - (old + shape.angular_speed)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_pause_and_resume() {
        let log = RefCell::new(Vec::new());
        let mut renderer = Recorder { log: &log, angles: Vec::new(), fail: false };
        let mut ctx = context();
        let mut driver = FrameDriver::new();

        driver.start();
        driver.tick(&mut ctx, &mut renderer, || {}).unwrap();
        driver.pause();
        assert_eq!(driver.state(), FrameState::Paused);

        // A tick requested before the pause arrives and does nothing
        let mut rescheduled = false;
        let outcome = driver.tick(&mut ctx, &mut renderer, || rescheduled = true).unwrap();
        assert_eq!(outcome, FrameOutcome::Skipped);
        assert!(!rescheduled);
        assert_eq!(driver.frames(), 1);

        assert!(driver.start());
        assert_eq!(
            driver.tick(&mut ctx, &mut renderer, || {}).unwrap(),
            FrameOutcome::Rendered
        );
        assert_eq!(driver.frames(), 2);
    }

    #[test]
    fn test_resume_reuses_pending_request() {
        let mut driver = FrameDriver::new();
        assert!(driver.start());
        driver.pause();
        // The first request has not been delivered yet
        assert!(!driver.start());
        assert!(driver.has_pending_tick());
    }

    #[test]
    fn test_cancel_is_terminal() {
        let log = RefCell::new(Vec::new());
        let mut renderer = Recorder { log: &log, angles: Vec::new(), fail: false };
        let mut ctx = context();
        let mut driver = FrameDriver::new();

        driver.start();
        driver.cancel();
        assert_eq!(driver.state(), FrameState::Cancelled);
        assert!(!driver.start());
        assert!(!driver.toggle());
        assert_eq!(
            driver.tick(&mut ctx, &mut renderer, || {}).unwrap(),
            FrameOutcome::Skipped
        );
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_render_error_keeps_loop_alive() {
        let log = RefCell::new(Vec::new());
        let mut renderer = Recorder { log: &log, angles: Vec::new(), fail: true };
        let mut ctx = context();
        let mut driver = FrameDriver::new();
        let mut rescheduled = 0;

        driver.start();
        assert_eq!(driver.tick(&mut ctx, &mut renderer, || rescheduled += 1), Err("surface lost"));
        assert_eq!(rescheduled, 1);
        assert_eq!(driver.state(), FrameState::Scheduled);
    }

    #[test]
    fn test_toggle() {
        let mut driver = FrameDriver::new();
        assert!(driver.toggle());
        assert!(driver.is_active());
        assert!(!driver.toggle());
        assert_eq!(driver.state(), FrameState::Paused);
    }
}
