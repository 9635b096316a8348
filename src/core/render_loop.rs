use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::camera::Camera;
use crate::error::{Result, ViewerError};
use crate::state::SceneState;
use crate::traits::{Controls, FrameScheduler, Renderer};

use super::animation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// What a delivered frame callback did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Loop was stopped; nothing ran
    Idle,
    /// A pending stop was honored before any work
    Cancelled,
    /// Controls, animation and draw all ran
    Rendered,
    /// Callback the loop never asked for; drawn again without advancing
    Redrawn,
}

/// Cooperative stop request, honored between ticks
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    fn take(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }

    fn clear(&self) {
        self.requested.store(false, Ordering::SeqCst);
    }
}

/// Stopped/Running state machine that owns the per-tick collaborators.
///
/// Each tick runs controls, then animation, then draw, and requests the next frame only once
/// all three are done, so at most one frame request is ever outstanding. A callback that
/// finds no outstanding request at the scheduler only redraws.
pub struct RenderLoop<R, C, S> {
    renderer: R,
    controls: C,
    scheduler: S,
    state: LoopState,
    stop: StopHandle,
    ticks: u64,
}

impl<R: Renderer, C: Controls, S: FrameScheduler> RenderLoop<R, C, S> {
    pub fn new(renderer: R, controls: C, scheduler: S) -> Self {
        Self {
            renderer,
            controls,
            scheduler,
            state: LoopState::Stopped,
            stop: StopHandle::default(),
            ticks: 0,
        }
    }

    /// Stopped → Running, requesting the first frame
    pub fn start(&mut self) -> Result<()> {
        if self.state == LoopState::Running {
            return Err(ViewerError::AlreadyRunning);
        }

        self.stop.clear();
        self.state = LoopState::Running;
        self.scheduler.request_frame();
        log::info!("render loop started");
        Ok(())
    }

    /// Ask the loop to stop; takes effect before the next tick does any work
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Handle one delivered frame callback
    pub fn tick(&mut self, state: &mut SceneState, camera: &mut Camera) -> Result<TickOutcome> {
        if self.state == LoopState::Stopped {
            return Ok(TickOutcome::Idle);
        }
        let requested = self.scheduler.frame_delivered();
        if self.stop.take() {
            self.halt("stop requested");
            return Ok(TickOutcome::Cancelled);
        }
        if !requested {
            return self.redraw(state, camera);
        }

        if let Err(e) = self.run_steps(state, camera) {
            self.halt("tick failed");
            log::error!("render loop stopped: {}", e);
            return Err(e);
        }
        self.ticks += 1;

        if self.stop.take() {
            self.halt("stop requested");
        } else {
            self.scheduler.request_frame();
        }
        Ok(TickOutcome::Rendered)
    }

    fn redraw(&mut self, state: &SceneState, camera: &Camera) -> Result<TickOutcome> {
        log::trace!("unrequested frame, redrawing only");
        if let Err(e) = self.renderer.render(&state.scene, camera) {
            self.halt("redraw failed");
            log::error!("render loop stopped: {}", e);
            return Err(e);
        }
        Ok(TickOutcome::Redrawn)
    }

    fn run_steps(&mut self, state: &mut SceneState, camera: &mut Camera) -> Result<()> {
        self.controls.update(camera);

        let rate = state.animation.rate;
        for node in state.scene.animated_mut() {
            animation::step(&mut node.transform, rate);
        }

        self.renderer.render(&state.scene, camera)
    }

    fn halt(&mut self, reason: &str) {
        self.state = LoopState::Stopped;
        log::info!("render loop stopped after {} ticks: {}", self.ticks, reason);
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Completed ticks since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn controls(&self) -> &C {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut C {
        &mut self.controls
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Color;
    use crate::scene::{BoxGeometry, Node, SceneGraph};
    use crate::traits::ManualScheduler;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct LoggingControls {
        log: Log,
    }

    impl Controls for LoggingControls {
        fn update(&mut self, _camera: &mut Camera) {
            self.log.borrow_mut().push("controls");
        }
    }

    struct LoggingRenderer {
        log: Log,
        fail_on: Option<usize>,
        stop_on: Option<(usize, StopHandle)>,
        calls: usize,
    }

    impl Renderer for LoggingRenderer {
        fn resize(&mut self, _width: u32, _height: u32) {}

        fn size(&self) -> (u32, u32) {
            (800, 600)
        }

        fn render(&mut self, _scene: &SceneGraph, _camera: &Camera) -> Result<()> {
            self.calls += 1;
            if self.fail_on == Some(self.calls) {
                return Err(ViewerError::SurfaceLost);
            }
            if let Some((call, handle)) = &self.stop_on {
                if *call == self.calls {
                    handle.stop();
                }
            }
            self.log.borrow_mut().push("render");
            Ok(())
        }
    }

    fn setup(fail_on: Option<usize>) -> (RenderLoop<LoggingRenderer, LoggingControls, ManualScheduler>, Log) {
        let log: Log = Rc::default();
        let render_loop = RenderLoop::new(
            LoggingRenderer {
                log: log.clone(),
                fail_on,
                stop_on: None,
                calls: 0,
            },
            LoggingControls { log: log.clone() },
            ManualScheduler::new(),
        );
        (render_loop, log)
    }

    fn state() -> SceneState {
        let mut scene = SceneGraph::new();
        scene
            .add_node(Node::mesh("box", BoxGeometry::new(1.0, 1.0, 1.0), Color::WHITE).animated())
            .unwrap();
        SceneState::new(scene, animation::AnimationState::new(0.01))
    }

    /// Deliver frames while one is requested, up to `limit`
    fn pump(
        render_loop: &mut RenderLoop<LoggingRenderer, LoggingControls, ManualScheduler>,
        state: &mut SceneState,
        camera: &mut Camera,
        limit: usize,
    ) -> Result<usize> {
        let mut delivered = 0;
        while delivered < limit && render_loop.scheduler().pending() > 0 {
            render_loop.tick(state, camera)?;
            delivered += 1;
        }
        Ok(delivered)
    }

    #[test]
    fn test_starts_stopped() {
        let (render_loop, _) = setup(None);
        assert_eq!(render_loop.state(), LoopState::Stopped);
        assert_eq!(render_loop.scheduler().requested(), 0);
    }

    #[test]
    fn test_start_requests_one_frame() {
        let (mut render_loop, _) = setup(None);
        render_loop.start().unwrap();
        assert!(render_loop.is_running());
        assert_eq!(render_loop.scheduler().pending(), 1);
    }

    #[test]
    fn test_double_start_rejected() {
        let (mut render_loop, _) = setup(None);
        render_loop.start().unwrap();

        let err = render_loop.start().unwrap_err();
        assert!(matches!(err, ViewerError::AlreadyRunning));
        assert_eq!(render_loop.scheduler().pending(), 1);
    }

    #[test]
    fn test_controls_before_render_every_tick() {
        let (mut render_loop, log) = setup(None);
        let mut state = state();
        let mut camera = Camera::default();

        render_loop.start().unwrap();
        pump(&mut render_loop, &mut state, &mut camera, 5).unwrap();

        let log = log.borrow();
        assert_eq!(log.len(), 10);
        for pair in log.chunks(2) {
            assert_eq!(pair, ["controls", "render"]);
        }
        assert_eq!(render_loop.ticks(), 5);
    }

    #[test]
    fn test_tick_while_stopped_is_idle() {
        let (mut render_loop, log) = setup(None);
        let mut state = state();
        let mut camera = Camera::default();

        let outcome = render_loop.tick(&mut state, &mut camera).unwrap();
        assert_eq!(outcome, TickOutcome::Idle);
        assert!(log.borrow().is_empty());
        assert_eq!(render_loop.scheduler().requested(), 0);
    }

    #[test]
    fn test_surface_lost_stops_loop() {
        let (mut render_loop, _) = setup(Some(3));
        let mut state = state();
        let mut camera = Camera::default();

        render_loop.start().unwrap();
        let err = pump(&mut render_loop, &mut state, &mut camera, 10).unwrap_err();

        assert!(matches!(err, ViewerError::SurfaceLost));
        assert_eq!(render_loop.state(), LoopState::Stopped);
        assert_eq!(render_loop.ticks(), 2);
        assert_eq!(render_loop.scheduler().pending(), 0);
    }

    #[test]
    fn test_stop_between_ticks() {
        let (mut render_loop, log) = setup(None);
        let mut state = state();
        let mut camera = Camera::default();

        render_loop.start().unwrap();
        pump(&mut render_loop, &mut state, &mut camera, 2).unwrap();
        render_loop.stop();

        assert_eq!(render_loop.scheduler().pending(), 1);
        let outcome = render_loop.tick(&mut state, &mut camera).unwrap();
        assert_eq!(outcome, TickOutcome::Cancelled);
        assert_eq!(render_loop.ticks(), 2);
        assert_eq!(log.borrow().len(), 4);
        assert_eq!(render_loop.scheduler().pending(), 0);
    }

    #[test]
    fn test_stop_handle_from_other_thread() {
        let (mut render_loop, _) = setup(None);
        let mut state = state();
        let mut camera = Camera::default();
        render_loop.start().unwrap();

        let handle = render_loop.stop_handle();
        std::thread::spawn(move || handle.stop()).join().unwrap();

        pump(&mut render_loop, &mut state, &mut camera, 10).unwrap();
        assert_eq!(render_loop.ticks(), 0);
        assert!(!render_loop.is_running());
    }

    #[test]
    fn test_restart_after_stop() {
        let (mut render_loop, _) = setup(None);
        let mut state = state();
        let mut camera = Camera::default();

        render_loop.start().unwrap();
        pump(&mut render_loop, &mut state, &mut camera, 1).unwrap();
        render_loop.stop();
        assert_eq!(render_loop.scheduler().pending(), 1);
        render_loop.tick(&mut state, &mut camera).unwrap();
        assert_eq!(render_loop.scheduler().pending(), 0);

        render_loop.start().unwrap();
        assert_eq!(render_loop.scheduler().pending(), 1);
        pump(&mut render_loop, &mut state, &mut camera, 3).unwrap();
        assert_eq!(render_loop.ticks(), 4);
    }

    #[test]
    fn test_animation_reads_rate_each_tick() {
        let (mut render_loop, _) = setup(None);
        let mut state = state();
        let mut camera = Camera::default();

        render_loop.start().unwrap();
        pump(&mut render_loop, &mut state, &mut camera, 1).unwrap();
        state.animation.rate = 0.1;
        pump(&mut render_loop, &mut state, &mut camera, 1).unwrap();

        let node = state.scene.all_nodes().next().unwrap();
        assert!((node.transform.rotation.x - 0.11).abs() < 1e-6);
        assert!((node.transform.rotation.y - 0.11).abs() < 1e-6);
    }

    #[test]
    fn test_stop_from_inside_render_finishes_tick() {
        let (mut render_loop, log) = setup(None);
        let mut state = state();
        let mut camera = Camera::default();
        let handle = render_loop.stop_handle();
        render_loop.renderer_mut().stop_on = Some((2, handle));

        render_loop.start().unwrap();
        pump(&mut render_loop, &mut state, &mut camera, 1).unwrap();

        assert_eq!(render_loop.scheduler().pending(), 1);
        let outcome = render_loop.tick(&mut state, &mut camera).unwrap();
        assert_eq!(outcome, TickOutcome::Rendered);
        assert_eq!(render_loop.ticks(), 2);
        assert_eq!(log.borrow().len(), 4);
        assert_eq!(render_loop.scheduler().pending(), 0);
        assert_eq!(render_loop.state(), LoopState::Stopped);
    }

    #[test]
    fn test_callbacks_never_stack_requests() {
        let (mut render_loop, _) = setup(None);
        let mut state = state();
        let mut camera = Camera::default();

        render_loop.start().unwrap();
        for _ in 0..5 {
            render_loop.tick(&mut state, &mut camera).unwrap();
            assert_eq!(render_loop.scheduler().pending(), 1);
        }
        assert_eq!(render_loop.ticks(), 5);
        assert_eq!(render_loop.scheduler().requested(), 6);
    }

    /// Host that never has a request outstanding when it calls back
    #[derive(Default)]
    struct UnaskedScheduler {
        requests: usize,
    }

    impl FrameScheduler for UnaskedScheduler {
        fn request_frame(&mut self) {
            self.requests += 1;
        }

        fn frame_delivered(&mut self) -> bool {
            false
        }
    }

    #[test]
    fn test_unrequested_callback_only_redraws() {
        let log: Log = Rc::default();
        let mut render_loop = RenderLoop::new(
            LoggingRenderer {
                log: log.clone(),
                fail_on: None,
                stop_on: None,
                calls: 0,
            },
            LoggingControls { log: log.clone() },
            UnaskedScheduler::default(),
        );
        let mut state = state();
        let mut camera = Camera::default();

        render_loop.start().unwrap();
        for _ in 0..3 {
            let outcome = render_loop.tick(&mut state, &mut camera).unwrap();
            assert_eq!(outcome, TickOutcome::Redrawn);
        }

        assert_eq!(*log.borrow(), ["render", "render", "render"]);
        assert_eq!(render_loop.ticks(), 0);
        assert_eq!(render_loop.scheduler().requests, 1);
        let node = state.scene.all_nodes().next().unwrap();
        assert_eq!(node.transform.rotation, glam::Vec3::ZERO);
        assert!(render_loop.is_running());
    }
}
