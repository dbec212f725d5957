//! Browser runtime: mounts a [`GameSession`] on a `<canvas>` and wires it up.
//!
//! - mouse and touch listeners feed pointer samples to the session;
//! - while a stroke is active an interval polls the character's mood, and the
//!   interval is cleared as soon as the stroke ends;
//! - a `requestAnimationFrame` loop blits the raster into the canvas whenever
//!   it changed;
//! - the exported functions below are the salon's buttons.
//!
//! Session state lives in a thread-local, like every other piece of wasm game
//! state in this crate. Listeners and the interval are owned guards: dropping
//! the state (see [`stop_game`]) detaches all of them.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{
    CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, ImageData, MouseEvent,
    TouchEvent, window,
};

use crate::brush::{Rgb, Tool};
use crate::config::GameConfig;
use crate::error::Error;
use crate::session::GameSession;
use crate::tracker::{PointerSample, SurfaceRect};

mod audio;
mod presenter;

use audio::WebAudio;
use presenter::DomPresenter;

/// An event listener that is removed again when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// A `setInterval` registration that is cleared when dropped.
struct IntervalGuard {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl IntervalGuard {
    fn start(period_ms: u32, tick: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let callback = Closure::wrap(Box::new(tick) as Box<dyn FnMut()>);
        let handle = win.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms.min(i32::MAX as u32) as i32,
        )?;
        Ok(Self {
            handle,
            _callback: callback,
        })
    }
}

impl Drop for IntervalGuard {
    fn drop(&mut self) {
        if let Some(win) = window() {
            win.clear_interval_with_handle(self.handle);
        }
    }
}

struct SalonState {
    session: GameSession,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    // Bumped on every start so a stale frame loop can tell it has been replaced.
    generation: u32,
    dirty: bool,
    mood_poll: Option<IntervalGuard>,
    _listeners: Vec<Listener>,
}

thread_local! {
    static SALON_STATE: RefCell<Option<SalonState>> = const { RefCell::new(None) };
    static GENERATION: std::cell::Cell<u32> = const { std::cell::Cell::new(0) };
}

/// Run `f` against the live session, then deliver queued presenter events.
fn with_salon<R>(f: impl FnOnce(&mut SalonState) -> R) -> Option<R> {
    let out = SALON_STATE.with(|cell| cell.borrow_mut().as_mut().map(f));
    presenter::flush();
    out
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn sample_at(state: &SalonState, client: Option<(f64, f64)>) -> PointerSample {
    let r = state.canvas.get_bounding_client_rect();
    SurfaceRect {
        left: r.left(),
        top: r.top(),
        width: r.width(),
        height: r.height(),
    }
    .sample(client, state.session.surface_size())
}

fn mouse_client(evt: &Event) -> Option<(f64, f64)> {
    evt.dyn_ref::<MouseEvent>()
        .map(|m| (m.client_x() as f64, m.client_y() as f64))
}

// Only the first touch point counts; multi-touch gestures are ignored.
fn touch_client(evt: &Event) -> Option<(f64, f64)> {
    evt.dyn_ref::<TouchEvent>()
        .and_then(|t| t.touches().get(0))
        .map(|t| (t.client_x() as f64, t.client_y() as f64))
}

fn on_down(client: Option<(f64, f64)>) {
    with_salon(|st| {
        let sample = sample_at(st, client);
        st.session.pointer_down(sample, now_ms());
        st.dirty = true;
        if st.session.is_drawing() {
            let cadence = st.session.config().mood_cadence_ms;
            // Replacing the guard clears any interval left over from a restart.
            st.mood_poll = match IntervalGuard::start(cadence, on_mood_tick) {
                Ok(guard) => Some(guard),
                Err(e) => {
                    log::warn!("mood poll unavailable: {e:?}");
                    None
                }
            };
        }
    });
}

fn on_move(client: Option<(f64, f64)>) {
    with_salon(|st| {
        let sample = sample_at(st, client);
        let drawing = st.session.is_drawing();
        st.session.pointer_move(sample);
        st.dirty |= drawing;
    });
}

fn on_up() {
    with_salon(|st| {
        st.session.pointer_up();
        st.mood_poll = None;
    });
}

fn on_mood_tick() {
    with_salon(|st| {
        st.session.poll_mood(now_ms());
    });
}

fn attach_listeners(canvas: &HtmlCanvasElement) -> Result<Vec<Listener>, JsValue> {
    let target: &EventTarget = canvas.as_ref();
    let touch = |handler: fn(Option<(f64, f64)>)| {
        move |evt: Event| {
            evt.prevent_default();
            handler(touch_client(&evt));
        }
    };
    Ok(vec![
        Listener::attach(target, "mousedown", |evt| on_down(mouse_client(&evt)))?,
        Listener::attach(target, "mousemove", |evt| on_move(mouse_client(&evt)))?,
        Listener::attach(target, "mouseup", |_| on_up())?,
        Listener::attach(target, "mouseleave", |_| on_up())?,
        Listener::attach(target, "touchstart", touch(on_down))?,
        Listener::attach(target, "touchmove", touch(on_move))?,
        Listener::attach(target, "touchend", |_| on_up())?,
        Listener::attach(target, "touchcancel", |_| on_up())?,
    ])
}

fn blit(state: &SalonState) -> Result<(), JsValue> {
    let Some(surface) = state.session.surface() else {
        return Ok(());
    };
    let image = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(surface.as_rgba()),
        surface.width(),
        surface.height(),
    )?;
    state.ctx.put_image_data(&image, 0.0, 0.0)
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_render_loop(generation: u32) {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        let alive = SALON_STATE.with(|cell| {
            let mut slot = cell.borrow_mut();
            match slot.as_mut() {
                Some(st) if st.generation == generation => {
                    if st.dirty {
                        if let Err(e) = blit(st) {
                            log::warn!("blit failed: {e:?}");
                        }
                        st.dirty = false;
                    }
                    true
                }
                _ => false,
            }
        });
        if !alive {
            // Break the self-reference so the closure can be freed.
            f.borrow_mut().take();
            return;
        }
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn mount_canvas(canvas_id: &str, config: &GameConfig) -> Result<HtmlCanvasElement, JsValue> {
    let doc = window()
        .and_then(|w| w.document())
        .ok_or_else(|| Error::Dom("no document".to_string()))?;
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(canvas_id) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(canvas_id);
        c.set_attribute("style", "touch-action:none; cursor:crosshair;")?;
        doc.body()
            .ok_or_else(|| Error::Dom("no body".to_string()))?
            .append_child(&c)?;
        c
    };
    canvas.set_width(config.surface_width);
    canvas.set_height(config.surface_height);
    Ok(canvas)
}

/// Mount the salon on the canvas with id `canvas_id` (created if missing).
/// `config_json` optionally overrides [`GameConfig`] fields.
#[wasm_bindgen]
pub fn start_game(canvas_id: &str, config_json: Option<String>) -> Result<(), JsValue> {
    stop_game();
    let config = match config_json.as_deref() {
        Some(json) => GameConfig::from_json(json)?,
        None => GameConfig::default(),
    };
    let canvas = mount_canvas(canvas_id, &config)?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| Error::Dom("2d context unavailable".to_string()))?
        .dyn_into()?;
    let session = GameSession::new(config, Box::new(WebAudio::new()), Box::new(DomPresenter))?;
    let listeners = attach_listeners(&canvas)?;
    let generation = GENERATION.with(|g| {
        g.set(g.get().wrapping_add(1));
        g.get()
    });
    SALON_STATE.with(|cell| {
        cell.replace(Some(SalonState {
            session,
            canvas,
            ctx,
            generation,
            dirty: true,
            mood_poll: None,
            _listeners: listeners,
        }))
    });
    presenter::flush();
    start_render_loop(generation);
    Ok(())
}

/// Tear the salon down: silence audio, cancel the mood poll, detach listeners.
#[wasm_bindgen]
pub fn stop_game() {
    let state = SALON_STATE.with(|cell| cell.borrow_mut().take());
    if let Some(mut st) = state {
        st.mood_poll = None;
        st.session.teardown();
    }
    presenter::flush();
}

#[wasm_bindgen]
pub fn set_brush_color(hex: &str) -> Result<(), JsValue> {
    let color = Rgb::from_hex(hex)?;
    with_salon(|st| st.session.set_color(color));
    Ok(())
}

#[wasm_bindgen]
pub fn set_brush_size(size: u32) {
    with_salon(|st| st.session.set_size(size));
}

/// `"paint"` / `"brush"` or `"erase"` / `"eraser"`.
#[wasm_bindgen]
pub fn set_tool(name: &str) -> Result<(), JsValue> {
    let tool = Tool::parse(name).ok_or_else(|| JsValue::from_str("unknown tool"))?;
    with_salon(|st| st.session.set_tool(tool));
    Ok(())
}

#[wasm_bindgen]
pub fn clear_canvas() {
    with_salon(|st| {
        st.session.clear();
        st.dirty = true;
    });
}

/// Score of the current canvas, 0 when nothing is mounted yet.
#[wasm_bindgen]
pub fn current_score() -> u8 {
    with_salon(|st| st.session.calculate_score().score).unwrap_or(0)
}

/// Confirm the current cut; returns the level the session moved to.
#[wasm_bindgen]
pub fn confirm_done() -> Option<String> {
    with_salon(|st| {
        let transition = st.session.confirm_done();
        if !st.session.is_drawing() {
            st.mood_poll = None;
        }
        st.dirty = true;
        transition.to().name().to_string()
    })
}

#[wasm_bindgen]
pub fn reset_game() {
    with_salon(|st| {
        st.session.reset();
        st.mood_poll = None;
        st.dirty = true;
    });
}

/// Call from any user gesture; browsers start audio suspended.
#[wasm_bindgen]
pub fn resume_audio() {
    with_salon(|st| st.session.resume_audio());
}

/// JSON snapshot of the level projection, for UIs that mount late.
#[wasm_bindgen]
pub fn level_state() -> Option<String> {
    with_salon(|st| serde_json::to_string(&st.session.level_view()).ok()).flatten()
}
