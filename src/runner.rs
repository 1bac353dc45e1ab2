//! Scene mount/teardown lifecycle
//!
//! A `SceneRunner` owns one scene together with its surface, frame host and
//! scheduler. Teardown is a single routine: stop the frame loop, cancel every
//! scene timer, drop nothing else. It runs at most once, and a torn-down
//! runner ignores frames, clicks and resizes.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::Viewport;
use crate::renderer::{DrawList, Surface, SurfaceManager};
use crate::scheduler::{Frame, FrameHost, FrameScheduler, FrameTicket};

/// Lifecycle signals a scene reports to its collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum SceneSignal {
    /// A floating symbol was popped
    Popped { glyph: &'static str, at: Vec2 },
    /// The scripted sequence reached its final phase
    Completed,
    /// The user dismissed the scene
    Dismissed,
}

/// A self-contained animated composition
pub trait Scene {
    /// Arm timers; called once on mount with the host clock
    fn start(&mut self, now_ms: f64);
    /// Advance every live entity by one frame
    fn update(&mut self, frame: &Frame);
    /// Emit this frame's draw ops, back to front
    fn render(&self, out: &mut DrawList);
    /// Pointer click in surface coordinates
    fn click(&mut self, at: Vec2, now_ms: f64);
    /// Pointer moved to `at` in surface coordinates
    fn pointer_move(&mut self, at: Vec2, now_ms: f64);
    fn resize(&mut self, viewport: Viewport);
    /// Cancel every pending timer. Idempotent.
    fn cancel_timers(&mut self);
    /// Signals raised since the last call
    fn take_signals(&mut self) -> Vec<SceneSignal>;
}

type Callback = Box<dyn FnMut()>;
type PopCallback = Box<dyn FnMut(&'static str, Vec2)>;

/// Collaborator callbacks. Completion and exit fire at most once each.
#[derive(Default)]
pub struct SceneCallbacks {
    on_complete: Option<Callback>,
    on_exit: Option<Callback>,
    on_pop: Option<PopCallback>,
}

impl SceneCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_complete(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn on_exit(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_exit = Some(Box::new(f));
        self
    }

    pub fn on_pop(mut self, f: impl FnMut(&'static str, Vec2) + 'static) -> Self {
        self.on_pop = Some(Box::new(f));
        self
    }

    pub fn dispatch(&mut self, signals: impl IntoIterator<Item = SceneSignal>) {
        for signal in signals {
            match signal {
                SceneSignal::Popped { glyph, at } => {
                    if let Some(f) = self.on_pop.as_mut() {
                        f(glyph, at);
                    }
                }
                SceneSignal::Completed => {
                    if let Some(mut f) = self.on_complete.take() {
                        f();
                    }
                }
                SceneSignal::Dismissed => {
                    if let Some(mut f) = self.on_exit.take() {
                        f();
                    }
                }
            }
        }
    }
}

/// Signals held back until the caller has released its borrows. A callback
/// run from here may freely unmount the scene that raised the signal.
#[must_use]
pub struct PendingDispatch {
    callbacks: Rc<RefCell<SceneCallbacks>>,
    signals: Vec<SceneSignal>,
}

impl PendingDispatch {
    pub fn new(callbacks: Rc<RefCell<SceneCallbacks>>, signals: Vec<SceneSignal>) -> Self {
        Self { callbacks, signals }
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn run(self) {
        self.callbacks.borrow_mut().dispatch(self.signals);
    }
}

pub struct SceneRunner<S: Scene, H: FrameHost, F: Surface> {
    scene: S,
    host: H,
    surface: Option<F>,
    surfaces: SurfaceManager,
    scheduler: FrameScheduler,
    draw_list: DrawList,
    mounted: bool,
    torn_down: bool,
}

impl<S: Scene, H: FrameHost, F: Surface> SceneRunner<S, H, F> {
    pub fn new(scene: S, host: H, viewport: Viewport) -> Self {
        Self {
            scene,
            host,
            surface: None,
            surfaces: SurfaceManager::new(viewport),
            scheduler: FrameScheduler::new(),
            draw_list: DrawList::new(),
            mounted: false,
            torn_down: false,
        }
    }

    /// Attach the rendering surface, sized to the current viewport
    pub fn attach_surface(&mut self, mut surface: F) {
        self.surfaces.attach(&mut surface);
        self.surface = Some(surface);
    }

    /// Start timers and the frame loop. Without a surface this is a no-op
    /// and returns false; mounting can be retried once one is attached.
    pub fn mount(&mut self, now_ms: f64) -> bool {
        if self.torn_down || self.mounted {
            return false;
        }
        if !self
            .scheduler
            .start(&mut self.host, self.surface.is_some())
        {
            log::warn!("Scene not mounted: no drawable surface");
            return false;
        }
        self.mounted = true;
        self.scene.start(now_ms);
        log::info!("Scene mounted");
        true
    }

    /// Run one update-then-render step for a delivered frame
    pub fn on_frame(&mut self, ticket: FrameTicket, now_ms: f64) -> Vec<SceneSignal> {
        if self.torn_down {
            return Vec::new();
        }
        let Some(frame) = self.scheduler.begin_frame(ticket, now_ms) else {
            return Vec::new();
        };

        self.scene.update(&frame);

        self.draw_list.clear();
        self.scene.render(&mut self.draw_list);
        if let Some(surface) = self.surface.as_mut() {
            self.draw_list.replay(surface);
        }

        self.scheduler.finish_frame(&mut self.host);
        self.scene.take_signals()
    }

    /// Forward a click. A dismissal tears the scene down before returning.
    pub fn click(&mut self, x: f32, y: f32, now_ms: f64) -> Vec<SceneSignal> {
        if self.torn_down || !self.mounted {
            return Vec::new();
        }
        self.scene.click(Vec2::new(x, y), now_ms);
        let signals = self.scene.take_signals();
        if signals.contains(&SceneSignal::Dismissed) {
            self.teardown();
        }
        signals
    }

    /// Forward a pointer move; ignored unless the scene is live
    pub fn pointer_move(&mut self, x: f32, y: f32, now_ms: f64) {
        if self.torn_down || !self.mounted {
            return;
        }
        self.scene.pointer_move(Vec2::new(x, y), now_ms);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if self.torn_down {
            return;
        }
        let viewport = self.surfaces.resize(width, height, self.surface.as_mut());
        self.scene.resize(viewport);
    }

    /// Dismiss from outside the scene (e.g. a host back button)
    pub fn exit(&mut self) -> Vec<SceneSignal> {
        if self.torn_down {
            return Vec::new();
        }
        self.teardown();
        vec![SceneSignal::Dismissed]
    }

    /// Stop the frame loop and cancel all timers. Runs once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.scheduler.stop(&mut self.host);
        self.scene.cancel_timers();
        log::info!("Scene torn down after {} frames", self.scheduler.frame_count());
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn frame_count(&self) -> u64 {
        self.scheduler.frame_count()
    }

    pub fn viewport(&self) -> Viewport {
        self.surfaces.viewport()
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn surface(&self) -> Option<&F> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut F> {
        self.surface.as_mut()
    }

    /// Ops from the most recent frame
    pub fn last_frame(&self) -> &DrawList {
        &self.draw_list
    }
}

impl<S: Scene, H: FrameHost, F: Surface> Drop for SceneRunner<S, H, F> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{ManualFrameHost, RecordingSurface};
    use crate::renderer::DrawOp;
    use crate::settings::Settings;
    use crate::sim::{AmbientScene, CelebrationPhase, CelebrationScene};
    use std::cell::Cell;

    type Runner<S> = SceneRunner<S, ManualFrameHost, RecordingSurface>;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn celebration() -> Runner<CelebrationScene> {
        let scene = CelebrationScene::new(viewport(), &Settings::default(), 7);
        let mut runner = SceneRunner::new(scene, ManualFrameHost::default(), viewport());
        runner.attach_surface(RecordingSurface::default());
        runner
    }

    /// Deliver pending frames 16ms apart, collecting signals
    fn pump<S: Scene>(runner: &mut Runner<S>, clock: &mut f64, frames: usize) -> Vec<SceneSignal> {
        let mut signals = Vec::new();
        for _ in 0..frames {
            let Some(ticket) = runner.host_mut().take_request() else {
                break;
            };
            *clock += 16.0;
            signals.extend(runner.on_frame(ticket, *clock));
        }
        signals
    }

    #[test]
    fn test_mount_without_surface_is_noop() {
        let scene = AmbientScene::new(viewport(), &Settings::default(), 1);
        let mut runner: Runner<AmbientScene> =
            SceneRunner::new(scene, ManualFrameHost::default(), viewport());
        assert!(!runner.mount(0.0));
        assert!(!runner.is_running());
        assert_eq!(runner.host().requested(), 0);
        assert!(runner.click(10.0, 10.0, 0.0).is_empty());

        runner.attach_surface(RecordingSurface::default());
        assert!(runner.mount(0.0));
        assert_eq!(runner.surface().map(|s| s.size()), Some((800, 600)));
    }

    #[test]
    fn test_each_frame_updates_then_renders() {
        let mut runner = celebration();
        assert!(runner.mount(0.0));
        let mut clock = 0.0;
        pump(&mut runner, &mut clock, 3);
        assert_eq!(runner.frame_count(), 3);
        let surface = runner.surface().unwrap();
        // Background fill opens every frame
        let fills = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::FillRect { .. }))
            .count();
        assert_eq!(fills, 3);
        assert_eq!(runner.host().pending(), Some(FrameTicket(4)));
    }

    #[test]
    fn test_full_celebration_completes_once() {
        let mut runner = celebration();
        runner.mount(0.0);
        let mut clock = 0.0;
        let signals = pump(&mut runner, &mut clock, 600);
        assert_eq!(runner.scene().phase(), CelebrationPhase::ControlsRevealed);
        assert_eq!(
            signals.iter().filter(|s| **s == SceneSignal::Completed).count(),
            1
        );
        assert!(runner.is_running());
    }

    #[test]
    fn test_exit_click_tears_down() {
        let mut runner = celebration();
        runner.mount(0.0);
        let mut clock = 0.0;
        pump(&mut runner, &mut clock, 600);

        let control = runner.scene().exit_control().center();
        let signals = runner.click(control.x, control.y, clock);
        assert_eq!(signals, vec![SceneSignal::Dismissed]);
        assert!(runner.is_torn_down());
        assert!(!runner.is_running());
        assert_eq!(runner.host().pending(), None);
        assert_eq!(runner.host().cancelled().len(), 1);

        // Nothing mutates after teardown
        let frames = runner.frame_count();
        let drawn = runner.surface().unwrap().total();
        assert!(runner.on_frame(FrameTicket(frames + 1), clock + 16.0).is_empty());
        assert!(runner.click(control.x, control.y, clock).is_empty());
        assert!(runner.exit().is_empty());
        assert_eq!(runner.frame_count(), frames);
        assert_eq!(runner.surface().unwrap().total(), drawn);
    }

    #[test]
    fn test_stale_ticket_after_teardown_is_inert() {
        let mut runner = celebration();
        runner.mount(0.0);
        let ticket = runner.host().pending().unwrap();
        runner.teardown();
        assert!(runner.on_frame(ticket, 16.0).is_empty());
        assert_eq!(runner.frame_count(), 0);
        assert_eq!(runner.scene().pending_timers(), 0);
    }

    #[test]
    fn test_exit_before_completion() {
        let mut runner = celebration();
        runner.mount(0.0);
        let mut clock = 0.0;
        pump(&mut runner, &mut clock, 100);
        let phase = runner.scene().phase();
        assert_eq!(runner.exit(), vec![SceneSignal::Dismissed]);
        assert_eq!(runner.scene().pending_timers(), 0);
        assert!(pump(&mut runner, &mut clock, 600).is_empty());
        assert_eq!(runner.scene().phase(), phase);
    }

    #[test]
    fn test_resize_updates_surface_and_scene() {
        let mut runner = celebration();
        runner.mount(0.0);
        runner.resize(1024.0, 768.0);
        assert_eq!(runner.viewport(), Viewport::new(1024.0, 768.0));
        assert_eq!(runner.surface().unwrap().size(), (1024, 768));
        assert_eq!(runner.scene().viewport(), Viewport::new(1024.0, 768.0));
    }

    #[test]
    fn test_ambient_pop_through_runner() {
        let scene = AmbientScene::new(viewport(), &Settings::default(), 3);
        let mut runner = SceneRunner::new(scene, ManualFrameHost::default(), viewport());
        runner.attach_surface(RecordingSurface::default());
        runner.mount(0.0);
        let at = runner.scene().symbols[0].pos;
        let signals = runner.click(at.x, at.y, 0.0);
        assert!(matches!(signals.as_slice(), [SceneSignal::Popped { .. }]));
        assert!(!runner.is_torn_down());
    }

    #[test]
    fn test_callbacks_fire_at_most_once() {
        let completed = Rc::new(Cell::new(0));
        let exited = Rc::new(Cell::new(0));
        let popped = Rc::new(Cell::new(0));
        let (c, e, p) = (completed.clone(), exited.clone(), popped.clone());
        let mut callbacks = SceneCallbacks::new()
            .on_complete(move || c.set(c.get() + 1))
            .on_exit(move || e.set(e.get() + 1))
            .on_pop(move |_, _| p.set(p.get() + 1));

        let pop = SceneSignal::Popped {
            glyph: "★",
            at: Vec2::ZERO,
        };
        callbacks.dispatch([SceneSignal::Completed, pop.clone(), SceneSignal::Dismissed]);
        callbacks.dispatch([SceneSignal::Completed, pop, SceneSignal::Dismissed]);
        assert_eq!(completed.get(), 1);
        assert_eq!(exited.get(), 1);
        assert_eq!(popped.get(), 2);
    }

    #[test]
    fn test_pointer_move_only_while_live() {
        let scene = AmbientScene::new(viewport(), &Settings::default(), 4);
        let mut runner: Runner<AmbientScene> =
            SceneRunner::new(scene, ManualFrameHost::default(), viewport());
        runner.pointer_move(10.0, 10.0, 0.0);
        assert!(runner.scene().sparkles.is_empty());

        runner.attach_surface(RecordingSurface::default());
        runner.mount(0.0);
        runner.pointer_move(10.0, 10.0, 0.0);
        runner.pointer_move(12.0, 10.0, 20.0);
        runner.pointer_move(14.0, 10.0, 60.0);
        assert_eq!(runner.scene().sparkles.len(), 2);

        runner.teardown();
        runner.pointer_move(16.0, 10.0, 200.0);
        assert_eq!(runner.scene().sparkles.len(), 2);
    }

    #[test]
    fn test_pending_dispatch_waits_for_run() {
        // Stands in for a host handle that the exit callback unmounts
        let handle = Rc::new(RefCell::new(Some(celebration())));
        let callbacks = {
            let handle = handle.clone();
            Rc::new(RefCell::new(SceneCallbacks::new().on_exit(move || {
                handle.borrow_mut().take();
            })))
        };

        let pending = {
            let mut guard = handle.borrow_mut();
            let runner = guard.as_mut().unwrap();
            runner.mount(0.0);
            PendingDispatch::new(callbacks.clone(), runner.exit())
        };
        assert!(!pending.is_empty());
        assert!(handle.borrow().is_some());

        pending.run();
        assert!(handle.borrow().is_none());

        // Exit already fired; a second dispatch is inert
        PendingDispatch::new(callbacks, vec![SceneSignal::Dismissed]).run();
        assert!(handle.borrow().is_none());
    }
}
