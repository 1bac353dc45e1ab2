//! Skyburst entry point
//!
//! On the web, installs logging and leaves mounting to the page (the
//! exported `AmbientBackground` and `CelebrationScreen` handles). Natively,
//! runs both scenes headless on a virtual clock and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    skyburst::platform::web::install_hooks();
    log::info!("Skyburst starting...");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Skyburst (native) starting...");
    log::info!("Rendering needs a browser canvas - build for wasm32 to see it");

    let settings = skyburst::Settings::load();
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);

    headless::celebration(&settings, seed);
    headless::ambient(&settings, seed);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::Cell;
    use std::rc::Rc;

    use skyburst::platform::headless::{ManualFrameHost, RecordingSurface};
    use skyburst::sim::{AmbientScene, CelebrationPhase, CelebrationScene};
    use skyburst::{Scene, SceneCallbacks, SceneRunner, SceneSignal, Settings, Viewport};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    type Runner<S> = SceneRunner<S, ManualFrameHost, RecordingSurface>;

    /// Deliver up to `frames` frames, stopping early once `done` holds
    fn pump<S: Scene>(
        runner: &mut Runner<S>,
        callbacks: &mut SceneCallbacks,
        clock: &mut f64,
        frames: usize,
        done: impl Fn(&S) -> bool,
    ) {
        for _ in 0..frames {
            let Some(ticket) = runner.host_mut().take_request() else {
                return;
            };
            *clock += FRAME_MS;
            let signals = runner.on_frame(ticket, *clock);
            callbacks.dispatch(signals);
            if done(runner.scene()) {
                return;
            }
        }
    }

    pub fn celebration(settings: &Settings, seed: u64) {
        let viewport = Viewport::default();
        let scene = CelebrationScene::new(viewport, settings, seed);
        let mut runner = SceneRunner::new(scene, ManualFrameHost::default(), viewport);
        runner.attach_surface(RecordingSurface::default());

        let mut callbacks = SceneCallbacks::new()
            .on_complete(|| log::info!("Celebration complete"))
            .on_exit(|| log::info!("Celebration exited"));

        let mut clock = 0.0;
        runner.mount(clock);
        pump(&mut runner, &mut callbacks, &mut clock, 1200, |s| {
            s.phase() == CelebrationPhase::ControlsRevealed
        });

        let scene = runner.scene();
        log::info!(
            "Reached {:?} after {} frames ({:.0}ms), {} sparks live",
            scene.phase(),
            runner.frame_count(),
            clock,
            scene.sparks.len()
        );

        // Let the background show run, then press the exit control
        pump(&mut runner, &mut callbacks, &mut clock, 120, |_| false);
        let exit = runner.scene().exit_control().center();
        let signals = runner.click(exit.x, exit.y, clock);
        callbacks.dispatch(signals);
        log::info!(
            "Torn down: {}, {} ops drawn in total",
            runner.is_torn_down(),
            runner.surface().map_or(0, RecordingSurface::total)
        );
    }

    pub fn ambient(settings: &Settings, seed: u64) {
        let viewport = Viewport::default();
        let scene = AmbientScene::new(viewport, settings, seed);
        let mut runner = SceneRunner::new(scene, ManualFrameHost::default(), viewport);
        runner.attach_surface(RecordingSurface::default());

        let pops = Rc::new(Cell::new(0u32));
        let counter = pops.clone();
        let mut callbacks = SceneCallbacks::new().on_pop(move |glyph, at| {
            counter.set(counter.get() + 1);
            log::info!("Popped {} at ({:.0}, {:.0})", glyph, at.x, at.y);
        });

        let mut clock = 0.0;
        runner.mount(clock);
        pump(&mut runner, &mut callbacks, &mut clock, 600, |_| false);

        // Sweep the pointer across the sky, one move per frame
        for step in 0..30 {
            runner.pointer_move(100.0 + step as f32 * 20.0, 300.0, clock);
            pump(&mut runner, &mut callbacks, &mut clock, 1, |_| false);
        }
        log::info!("{} sparkles trailing the pointer", runner.scene().sparkles.len());

        for _ in 0..3 {
            let Some(at) = runner.scene().symbols.last().map(|s| s.pos) else {
                break;
            };
            let signals = runner.click(at.x, at.y, clock);
            if !signals.iter().any(|s| matches!(s, SceneSignal::Popped { .. })) {
                log::warn!("Click at ({:.0}, {:.0}) missed", at.x, at.y);
            }
            callbacks.dispatch(signals);
            pump(&mut runner, &mut callbacks, &mut clock, 30, |_| false);
        }

        let scene = runner.scene();
        log::info!(
            "Ambient: {} symbols, {} fragments, {} pops after {} frames",
            scene.symbols.len(),
            scene.fragments.len(),
            pops.get(),
            runner.frame_count()
        );
        runner.teardown();
    }
}
