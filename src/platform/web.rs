//! Browser host
//!
//! - `CanvasSurface`: the surface contract on a `CanvasRenderingContext2d`
//! - `AnimationFrameHost`: frames via `requestAnimationFrame`
//! - `AmbientBackground` / `CelebrationScreen`: JS-facing handles that mount a
//!   scene onto a canvas by element id and remove every listener on unmount
//!
//! Collaborator callbacks always run after the runner borrow is released, so
//! a callback may unmount the scene that invoked it. `CelebrationScreen::exit`
//! defers its callback to a microtask for the same reason.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, MouseEvent, Window};

use crate::Viewport;
use crate::error::{SurfaceError, contained};
use crate::renderer::{DrawOp, Paint, Surface, Transform};
use crate::runner::{PendingDispatch, Scene, SceneCallbacks, SceneRunner};
use crate::scheduler::{FrameHost, FrameSlot, FrameTicket};
use crate::settings::Settings;
use crate::sim::{AmbientScene, CelebrationScene};

/// Install the panic hook and console logger. Safe to call repeatedly.
pub fn install_hooks() {
    console_error_panic_hook::set_once();
    // Already initialised on repeat calls
    let _ = console_log::init_with_level(log::Level::Info);
}

fn now_ms(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

/// Canvas 2D surface. Sizes are CSS pixels; the backing store is scaled by
/// the device pixel ratio.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
}

impl CanvasSurface {
    pub fn attach(window: &Window, canvas_id: &str) -> Result<Self, SurfaceError> {
        let document = window.document().ok_or(SurfaceError::NoWindow)?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| SurfaceError::CanvasNotFound(canvas_id.to_string()))?
            .dyn_into()
            .map_err(|_| SurfaceError::NotACanvas(canvas_id.to_string()))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into().ok())
            .ok_or(SurfaceError::ContextUnavailable)?;

        Ok(Self {
            canvas,
            ctx,
            dpr: window.device_pixel_ratio().max(1.0),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn apply_paint(&self, paint: &Paint) {
        let css = paint.color.css();
        self.ctx.set_global_alpha(paint.alpha as f64);
        self.ctx.set_fill_style_str(&css);
        if paint.glow > 0.0 {
            self.ctx.set_shadow_blur(paint.glow as f64);
            self.ctx.set_shadow_color(&css);
        } else {
            self.ctx.set_shadow_blur(0.0);
        }
    }

    fn apply_transform(&self, transform: &Transform) {
        let _ = self
            .ctx
            .translate(transform.translate.x as f64, transform.translate.y as f64);
        if transform.rotation != 0.0 {
            let _ = self.ctx.rotate(transform.rotation as f64);
        }
        if transform.scale != 1.0 {
            let s = transform.scale as f64;
            let _ = self.ctx.scale(s, s);
        }
    }
}

/// Drawable size of a canvas in CSS pixels, falling back to the window
fn client_viewport(window: &Window, canvas: &HtmlCanvasElement) -> Viewport {
    let (w, h) = (canvas.client_width(), canvas.client_height());
    if w > 0 && h > 0 {
        return Viewport::new(w as f32, h as f32);
    }
    let inner = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
    match (inner(window.inner_width()), inner(window.inner_height())) {
        (Some(w), Some(h)) => Viewport::new(w as f32, h as f32),
        _ => Viewport::default(),
    }
}

impl Surface for CanvasSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width((width as f64 * self.dpr) as u32);
        self.canvas.set_height((height as f64 * self.dpr) as u32);
        let _ = self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
    }

    fn draw(&mut self, op: &DrawOp) {
        let ctx = &self.ctx;
        ctx.save();
        match op {
            DrawOp::Clear => {
                let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
                ctx.clear_rect(
                    0.0,
                    0.0,
                    self.canvas.width() as f64,
                    self.canvas.height() as f64,
                );
            }
            DrawOp::FillRect { rect, paint } => {
                self.apply_paint(paint);
                ctx.fill_rect(
                    rect.min.x as f64,
                    rect.min.y as f64,
                    rect.size.x as f64,
                    rect.size.y as f64,
                );
            }
            DrawOp::Circle {
                center,
                radius,
                paint,
            } => {
                self.apply_paint(paint);
                ctx.begin_path();
                let _ = ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU);
                ctx.fill();
            }
            DrawOp::Text {
                text,
                transform,
                size_px,
                font,
                paint,
            } => {
                self.apply_paint(paint);
                self.apply_transform(transform);
                ctx.set_font(&format!("{}px {}", size_px, font.css_family()));
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                let _ = ctx.fill_text(text, 0.0, 0.0);
            }
        }
        ctx.restore();
    }
}

/// Display-refresh source backed by `requestAnimationFrame`. One callback
/// is created per host and handed to every request; it is released with the
/// host, so cancelled frames leave nothing behind.
pub struct AnimationFrameHost {
    window: Window,
    slot: Rc<FrameSlot>,
    callback: Closure<dyn FnMut(f64)>,
    handle: Option<i32>,
}

impl AnimationFrameHost {
    pub fn new(window: Window, on_frame: impl Fn(FrameTicket, f64) + 'static) -> Self {
        let slot = Rc::new(FrameSlot::default());
        let armed = slot.clone();
        let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            if let Some(ticket) = armed.take() {
                on_frame(ticket, time);
            }
        });
        Self {
            window,
            slot,
            callback,
            handle: None,
        }
    }
}

impl FrameHost for AnimationFrameHost {
    fn request_frame(&mut self, ticket: FrameTicket) {
        self.slot.arm(ticket);
        match self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
        {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => {
                self.slot.disarm(ticket);
                log::error!("requestAnimationFrame failed: {:?}", e);
            }
        }
    }

    fn cancel_frame(&mut self, ticket: FrameTicket) {
        if self.slot.disarm(ticket) {
            if let Some(handle) = self.handle.take() {
                let _ = self.window.cancel_animation_frame(handle);
            }
        }
    }
}

type WebRunner<S> = SceneRunner<S, AnimationFrameHost, CanvasSurface>;

/// DOM listener removed from its target on drop
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    fn add(
        target: &EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    ) -> Self {
        let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            kind,
            closure,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// A scene running on a canvas, with its listeners
struct Mounted<S: Scene + 'static> {
    window: Window,
    runner: Rc<RefCell<WebRunner<S>>>,
    callbacks: Rc<RefCell<SceneCallbacks>>,
    _listeners: Vec<Listener>,
}

impl<S: Scene + 'static> Mounted<S> {
    fn mount(
        canvas_id: &str,
        callbacks: SceneCallbacks,
        make_scene: impl FnOnce(Viewport) -> S,
    ) -> Result<Self, SurfaceError> {
        let window = web_sys::window().ok_or(SurfaceError::NoWindow)?;
        let surface = CanvasSurface::attach(&window, canvas_id)?;
        let canvas = surface.canvas().clone();
        let viewport = client_viewport(&window, &canvas);
        let callbacks = Rc::new(RefCell::new(callbacks));
        let scene = make_scene(viewport);

        let runner = Rc::new_cyclic(|weak: &Weak<RefCell<WebRunner<S>>>| {
            let weak = weak.clone();
            let callbacks = callbacks.clone();
            let host = AnimationFrameHost::new(window.clone(), move |ticket, time| {
                let Some(runner) = weak.upgrade() else {
                    return;
                };
                let signals = runner.borrow_mut().on_frame(ticket, time);
                callbacks.borrow_mut().dispatch(signals);
            });
            RefCell::new(SceneRunner::new(scene, host, viewport))
        });

        {
            let mut r = runner.borrow_mut();
            r.attach_surface(surface);
            r.mount(now_ms(&window));
        }

        let click = {
            let runner = Rc::downgrade(&runner);
            let callbacks = callbacks.clone();
            let window = window.clone();
            Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let (Some(runner), Some(event)) = (runner.upgrade(), event.dyn_ref::<MouseEvent>())
                else {
                    return;
                };
                let (x, y) = (event.offset_x() as f32, event.offset_y() as f32);
                let signals = runner.borrow_mut().click(x, y, now_ms(&window));
                callbacks.borrow_mut().dispatch(signals);
            })
        };

        let pointer = {
            let runner = Rc::downgrade(&runner);
            let window = window.clone();
            let canvas = canvas.clone();
            Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let (Some(runner), Some(event)) = (runner.upgrade(), event.dyn_ref::<MouseEvent>())
                else {
                    return;
                };
                let bounds = canvas.get_bounding_client_rect();
                let x = event.client_x() as f64 - bounds.left();
                let y = event.client_y() as f64 - bounds.top();
                runner
                    .borrow_mut()
                    .pointer_move(x as f32, y as f32, now_ms(&window));
            })
        };

        let canvas_target: EventTarget = canvas.clone().into();
        let resize = {
            let runner = Rc::downgrade(&runner);
            let window = window.clone();
            Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(runner) = runner.upgrade() else {
                    return;
                };
                let vp = client_viewport(&window, &canvas);
                runner.borrow_mut().resize(vp.width, vp.height);
            })
        };

        let listeners = vec![
            Listener::add(&canvas_target, "click", click),
            Listener::add(window.as_ref(), "mousemove", pointer),
            Listener::add(window.as_ref(), "resize", resize),
        ];

        log::info!("Mounted scene on #{}", canvas_id);
        Ok(Self {
            window,
            runner,
            callbacks,
            _listeners: listeners,
        })
    }

    /// Dismiss from the host side. The exit callback is left to the caller
    /// to run once its own borrows are gone.
    fn exit(&self) -> PendingDispatch {
        let signals = self.runner.borrow_mut().exit();
        PendingDispatch::new(self.callbacks.clone(), signals)
    }

    fn frame_count(&self) -> u64 {
        self.runner.borrow().frame_count()
    }
}

impl<S: Scene + 'static> Drop for Mounted<S> {
    fn drop(&mut self) {
        if let Ok(mut runner) = self.runner.try_borrow_mut() {
            runner.teardown();
        }
        log::info!("Unmounted scene at {:.0}ms", now_ms(&self.window));
    }
}

fn settings_and_seed() -> (Settings, u64) {
    (Settings::load(), js_sys::Date::now() as u64)
}

/// Decorative floating-symbol backdrop
#[wasm_bindgen]
pub struct AmbientBackground {
    inner: Option<Mounted<AmbientScene>>,
}

#[wasm_bindgen]
impl AmbientBackground {
    /// Mount onto the canvas with id `canvas_id`. `on_pop(glyph)` is called
    /// for every popped symbol. Never throws: without a usable canvas the
    /// handle comes back with `mounted == false`.
    pub fn mount(canvas_id: &str, on_pop: Option<js_sys::Function>) -> AmbientBackground {
        install_hooks();
        let (settings, seed) = settings_and_seed();
        let mut callbacks = SceneCallbacks::new();
        if let Some(f) = on_pop {
            callbacks = callbacks.on_pop(move |glyph, _| {
                let _ = f.call1(&JsValue::NULL, &JsValue::from_str(glyph));
            });
        }
        let inner = contained(
            Mounted::mount(canvas_id, callbacks, |vp| {
                AmbientScene::new(vp, &settings, seed)
            }),
            "Ambient background not mounted",
        );
        Self { inner }
    }

    /// Stop the frame loop, cancel timers and remove listeners. Idempotent.
    pub fn unmount(&mut self) {
        self.inner = None;
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.inner.is_some()
    }

    #[wasm_bindgen(getter)]
    pub fn frames(&self) -> f64 {
        self.inner.as_ref().map_or(0, Mounted::frame_count) as f64
    }
}

/// Scripted fireworks celebration
#[wasm_bindgen]
pub struct CelebrationScreen {
    inner: Option<Mounted<CelebrationScene>>,
}

#[wasm_bindgen]
impl CelebrationScreen {
    /// Mount onto the canvas with id `canvas_id`. `on_complete` fires once
    /// when the exit control appears; `on_exit` fires once on dismissal.
    /// Never throws: without a usable canvas the handle comes back with
    /// `mounted == false`.
    pub fn mount(
        canvas_id: &str,
        on_complete: Option<js_sys::Function>,
        on_exit: Option<js_sys::Function>,
    ) -> CelebrationScreen {
        install_hooks();
        let (settings, seed) = settings_and_seed();
        let mut callbacks = SceneCallbacks::new();
        if let Some(f) = on_complete {
            callbacks = callbacks.on_complete(move || {
                let _ = f.call0(&JsValue::NULL);
            });
        }
        if let Some(f) = on_exit {
            callbacks = callbacks.on_exit(move || {
                let _ = f.call0(&JsValue::NULL);
            });
        }
        let inner = contained(
            Mounted::mount(canvas_id, callbacks, |vp| {
                CelebrationScene::new(vp, &settings, seed)
            }),
            "Celebration not mounted",
        );
        Self { inner }
    }

    /// Dismiss as if the exit control were clicked. `on_exit` runs as a
    /// microtask after this returns, so it may call `unmount`.
    pub fn exit(&self) {
        let Some(inner) = &self.inner else {
            return;
        };
        let pending = inner.exit();
        if pending.is_empty() {
            return;
        }
        let task = Closure::once_into_js(move || pending.run());
        inner.window.queue_microtask(task.unchecked_ref());
    }

    /// Stop the frame loop, cancel timers and remove listeners. Idempotent.
    pub fn unmount(&mut self) {
        self.inner = None;
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.inner.is_some()
    }
}
