use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::{Arc, LazyLock};

use viewport_cat_core::svg::render_svg;
use viewport_cat_core::views::panel::{is_activation_key, render_panel};
use viewport_cat_core::{
    Clipboard, Environment, EnvironmentReading, PanelConfig, PanelController, RuleParser,
    SnapshotProvider, clipboard_text,
};
use viewport_cat_protocol::{PanelAction, Snapshot, Viewport};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, KeyboardEvent, Window};

/// Shared by every capture in this module instance; compiled on first use.
static PARSER: LazyLock<Arc<RuleParser>> = LazyLock::new(|| Arc::new(RuleParser::builtin()));

fn provider() -> SnapshotProvider {
    SnapshotProvider::new(PARSER.clone())
}

fn log(msg: &str) {
    web_sys::console::log_1(&format!("viewport.cat: {msg}").into());
}

fn warn(msg: &str) {
    web_sys::console::warn_1(&format!("viewport.cat: {msg}").into());
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

struct WebEnvironment {
    window: Window,
}

impl Environment for WebEnvironment {
    fn read(&self) -> EnvironmentReading {
        let px = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        EnvironmentReading {
            width: px(self.window.inner_width()),
            height: px(self.window.inner_height()),
            device_pixel_ratio: self.window.device_pixel_ratio(),
            user_agent: self.window.navigator().user_agent().unwrap_or_default(),
        }
    }
}

/// `navigator.clipboard.writeText`, not awaited by the caller. A rejection
/// is only logged.
struct NavigatorClipboard<'a> {
    window: &'a Window,
}

impl Clipboard for NavigatorClipboard<'_> {
    fn write_text(&mut self, text: &str) {
        let promise = self.window.navigator().clipboard().write_text(text);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                warn(&format!("clipboard write failed: {e:?}"));
            }
        });
    }
}

/// Capture the current window as snapshot JSON without mounting a panel.
#[wasm_bindgen]
pub fn capture_snapshot() -> Result<String, JsError> {
    let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
    let snapshot = provider().capture(&WebEnvironment { window });
    serde_json::to_string(&snapshot).map_err(js_error)
}

/// Clipboard text for a snapshot given as JSON.
#[wasm_bindgen]
pub fn format_snapshot(snapshot_json: &str) -> Result<String, JsError> {
    let snapshot: Snapshot = serde_json::from_str(snapshot_json).map_err(js_error)?;
    Ok(clipboard_text(&snapshot))
}

struct Listeners {
    resize: Closure<dyn FnMut()>,
    settle: Closure<dyn FnMut()>,
    click: Closure<dyn FnMut(Event)>,
    keydown: Closure<dyn FnMut(KeyboardEvent)>,
}

struct Inner {
    window: Window,
    env: WebEnvironment,
    container: Element,
    controller: RefCell<PanelController>,
    dark: bool,
    timer: Cell<Option<i32>>,
    /// `Some` while attached. The same closures are used to remove the
    /// listeners they were added with.
    listeners: RefCell<Option<Listeners>>,
}

impl Inner {
    fn now(&self) -> f64 {
        self.window
            .performance()
            .map_or_else(js_sys::Date::now, |p| p.now())
    }

    fn on_resize(&self) {
        let now = self.now();
        self.controller.borrow_mut().on_resize(now);
        self.reschedule(now);
    }

    /// Timer callback: let the controller catch up, then re-arm if it still
    /// has something scheduled (a timer that fired early, or a pending revert).
    fn settle(&self) {
        self.timer.set(None);
        let now = self.now();
        let changed = self.controller.borrow_mut().poll(now, &self.env);
        if changed {
            let (w, h) = {
                let c = self.controller.borrow();
                (c.snapshot().width, c.snapshot().height)
            };
            log(&format!("refreshed to {w}x{h}"));
            self.render(false);
        }
        self.reschedule(now);
    }

    /// Cancel the pending timer and start one for the controller's next
    /// wake-up, if any.
    fn reschedule(&self, now: f64) {
        self.clear_timer();
        let Some(delay) = self.controller.borrow().next_wakeup(now) else {
            return;
        };
        let listeners = self.listeners.borrow();
        let Some(listeners) = listeners.as_ref() else {
            return;
        };
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                listeners.settle.as_ref().unchecked_ref(),
                delay.ceil() as i32,
            ) {
            Ok(id) => self.timer.set(Some(id)),
            Err(e) => warn(&format!("failed to schedule refresh: {e:?}")),
        }
    }

    fn clear_timer(&self) {
        if let Some(id) = self.timer.take() {
            self.window.clear_timeout_with_handle(id);
        }
    }

    fn activate(&self, action: PanelAction, from_keyboard: bool) {
        match action {
            PanelAction::Copy => {
                let now = self.now();
                let issued = self.controller.borrow_mut().copy(
                    now,
                    &mut NavigatorClipboard {
                        window: &self.window,
                    },
                );
                if !issued {
                    return;
                }
                log("copy requested");
                self.render(from_keyboard);
                self.reschedule(now);
            }
        }
    }

    fn render(&self, refocus: bool) {
        let svg = {
            let controller = self.controller.borrow();
            let snapshot = controller.snapshot();
            let width = match self.container.client_width() {
                w if w > 0 => w as f64,
                _ => snapshot.width as f64,
            };
            let height = match self.container.client_height() {
                h if h > 0 => h as f64,
                _ => snapshot.height as f64,
            };
            let viewport = Viewport::new(width, height, self.window.device_pixel_ratio());
            render_svg(
                &render_panel(&controller.state(), &viewport),
                width,
                height,
                self.dark,
            )
        };
        self.container.set_inner_html(&svg);

        // Replacing the markup drops keyboard focus from the button.
        if refocus
            && let Ok(Some(el)) = self.container.query_selector("[data-action]")
            && let Ok(el) = el.dyn_into::<web_sys::SvgElement>()
        {
            let _ = el.focus();
        }
    }

    fn detach(&self) {
        let Some(listeners) = self.listeners.borrow_mut().take() else {
            return;
        };
        let _ = self.window.remove_event_listener_with_callback(
            "resize",
            listeners.resize.as_ref().unchecked_ref(),
        );
        let _ = self.container.remove_event_listener_with_callback(
            "click",
            listeners.click.as_ref().unchecked_ref(),
        );
        let _ = self.container.remove_event_listener_with_callback(
            "keydown",
            listeners.keydown.as_ref().unchecked_ref(),
        );
        self.clear_timer();
        self.controller.borrow_mut().detach();
        log("detached");
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.detach();
    }
}

/// The action of the control an event targeted, if any.
fn action_of(event: &Event) -> Option<PanelAction> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let control = target.closest("[data-action]").ok()??;
    PanelAction::from_str_opt(&control.get_attribute("data-action")?)
}

/// Register the window resize listener and the container's activation
/// listeners, once. Closures hold weak references so dropping the panel
/// frees it.
fn attach(inner: &Rc<Inner>) -> Result<(), JsValue> {
    let weak = Rc::downgrade(inner);
    let resize = Closure::<dyn FnMut()>::new({
        let weak = weak.clone();
        move || {
            if let Some(inner) = weak.upgrade() {
                inner.on_resize();
            }
        }
    });
    let settle = Closure::<dyn FnMut()>::new({
        let weak = weak.clone();
        move || {
            if let Some(inner) = weak.upgrade() {
                inner.settle();
            }
        }
    });
    let click = Closure::<dyn FnMut(Event)>::new({
        let weak = weak.clone();
        move |event: Event| {
            if let (Some(inner), Some(action)) = (weak.upgrade(), action_of(&event)) {
                inner.activate(action, false);
            }
        }
    });
    let keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        if !is_activation_key(&event.key()) {
            return;
        }
        if let (Some(inner), Some(action)) = (weak.upgrade(), action_of(&event)) {
            event.prevent_default();
            inner.activate(action, true);
        }
    });

    inner
        .window
        .add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
    inner
        .container
        .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
    inner
        .container
        .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;

    *inner.listeners.borrow_mut() = Some(Listeners {
        resize,
        settle,
        click,
        keydown,
    });
    Ok(())
}

/// A device-info panel mounted into a DOM element.
#[wasm_bindgen]
pub struct ViewportPanel {
    inner: Rc<Inner>,
}

#[wasm_bindgen]
impl ViewportPanel {
    /// Mount into the element with id `container_id`.
    ///
    /// `config` is optional JSON, e.g.
    /// `{"debounceMs": 300, "confirmation": {"mode": "revertAfter", "ms": 2000}}`.
    /// `dark` selects the palette (default dark).
    pub fn mount(
        container_id: &str,
        config: Option<String>,
        dark: Option<bool>,
    ) -> Result<ViewportPanel, JsError> {
        let config = match config.as_deref() {
            Some(json) => PanelConfig::from_json(json).map_err(js_error)?,
            None => PanelConfig::default(),
        };
        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("no document"))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsError::new(&format!("no element with id '{container_id}'")))?;

        let env = WebEnvironment {
            window: window.clone(),
        };
        let controller = PanelController::mount(provider(), &env, &config).map_err(js_error)?;
        let inner = Rc::new(Inner {
            window,
            env,
            container,
            controller: RefCell::new(controller),
            dark: dark.unwrap_or(true),
            timer: Cell::new(None),
            listeners: RefCell::new(None),
        });
        attach(&inner).map_err(|e| JsError::new(&format!("failed to attach listeners: {e:?}")))?;
        inner.render(false);

        {
            let c = inner.controller.borrow();
            log(&format!(
                "mounted at {}x{} (debounce {}ms)",
                c.snapshot().width,
                c.snapshot().height,
                c.debounce_ms()
            ));
        }
        Ok(ViewportPanel { inner })
    }

    /// The displayed snapshot as JSON.
    pub fn snapshot_json(&self) -> Result<String, JsError> {
        serde_json::to_string(self.inner.controller.borrow().snapshot()).map_err(js_error)
    }

    /// Text the copy action writes for the displayed snapshot.
    pub fn clipboard_text(&self) -> String {
        self.inner.controller.borrow().clipboard_text()
    }

    /// Whether the "copied" confirmation is showing.
    pub fn copied(&self) -> bool {
        self.inner.controller.borrow().is_copied()
    }

    pub fn attached(&self) -> bool {
        self.inner.controller.borrow().is_attached()
    }

    /// Same as activating the copy button. Does nothing once detached.
    pub fn copy(&self) {
        self.inner.activate(PanelAction::Copy, false);
    }

    /// Remove every listener and drop any pending refresh. Idempotent.
    pub fn detach(&self) {
        self.inner.detach();
    }
}
