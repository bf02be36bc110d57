use crate::cycle::CycleTimer;
use crate::dom;
use crate::gpu::GpuRenderer;
use crate::view::ControlPanel;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use viz_core::constants::CHANGE_DEBOUNCE_MS;
use viz_core::{ModeController, VizError};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Everything the widgets, timers and keyboard share with the engine.
pub struct Ui {
    pub controller: Rc<RefCell<ModeController>>,
    pub gpu: Rc<RefCell<Option<GpuRenderer>>>,
    /// GPU canvases, primary then fullscreen.
    pub gpu_canvases: [web::HtmlCanvasElement; 2],
    panels: Vec<ControlPanel>,
    cycle: RefCell<CycleTimer>,
    fullscreen: Cell<bool>,
    fullscreen_container: Option<web::HtmlElement>,
    flush_scheduled: Cell<bool>,
}

impl Ui {
    pub fn new(
        controller: Rc<RefCell<ModeController>>,
        gpu_canvases: [web::HtmlCanvasElement; 2],
        panels: Vec<ControlPanel>,
        fullscreen_container: Option<web::HtmlElement>,
    ) -> Self {
        Self {
            controller,
            gpu: Rc::new(RefCell::new(None)),
            gpu_canvases,
            panels,
            cycle: RefCell::new(CycleTimer::default()),
            fullscreen: Cell::new(false),
            fullscreen_container,
            flush_scheduled: Cell::new(false),
        }
    }

    pub fn panels(&self) -> &[ControlPanel] {
        &self.panels
    }

    #[inline]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.get()
    }

    /// Mutate the controller, then re-sync every view.
    pub fn update<R>(self: &Rc<Self>, f: impl FnOnce(&mut ModeController) -> R) -> R {
        let out = f(&mut *self.controller.borrow_mut());
        self.refresh();
        out
    }

    /// Mirror the controller into both panels and the cycle timer, start GPU
    /// init if a GPU mode asked for it, and arm the debounced save.
    pub fn refresh(self: &Rc<Self>) {
        let (snapshot, schedule, wants_gpu, pending) = {
            let mut c = self.controller.borrow_mut();
            (
                c.snapshot(),
                c.cycle_schedule(),
                c.take_gpu_request(),
                c.has_pending_change(),
            )
        };
        for panel in &self.panels {
            panel.sync(&snapshot);
        }
        self.cycle.borrow_mut().sync(schedule, self);
        if wants_gpu {
            self.request_gpu();
        }
        if pending {
            self.schedule_flush();
        }
    }

    fn schedule_flush(self: &Rc<Self>) {
        if self.flush_scheduled.replace(true) {
            return;
        }
        let Some(window) = web::window() else {
            return;
        };
        let ui = self.clone();
        let cb = Closure::once_into_js(move || {
            ui.flush_scheduled.set(false);
            let still_pending = {
                let mut c = ui.controller.borrow_mut();
                c.flush_changes(Instant::now());
                c.has_pending_change()
            };
            if still_pending {
                ui.schedule_flush();
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.unchecked_ref(),
            CHANGE_DEBOUNCE_MS as i32 + 10,
        );
    }

    fn request_gpu(self: &Rc<Self>) {
        let ui = self.clone();
        log::info!("[gpu] initializing");
        spawn_local(async move {
            let [primary, fullscreen] = &ui.gpu_canvases;
            match GpuRenderer::new(primary, fullscreen).await {
                Ok(renderer) => {
                    *ui.gpu.borrow_mut() = Some(renderer);
                    ui.controller.borrow_mut().gpu_ready();
                }
                Err(e) => {
                    let err = VizError::GpuUnavailable(format!("{:#}", e));
                    ui.controller.borrow_mut().gpu_unavailable(&err);
                }
            }
            ui.refresh();
        });
    }

    pub fn enter_fullscreen(self: &Rc<Self>) {
        if self.fullscreen.replace(true) {
            return;
        }
        if let Some(el) = &self.fullscreen_container {
            dom::set_display(el, true);
            let _ = el.request_fullscreen();
        }
        log::info!("[view] fullscreen on");
        self.refresh();
    }

    pub fn exit_fullscreen(self: &Rc<Self>) {
        if !self.fullscreen.replace(false) {
            return;
        }
        if let Some(el) = &self.fullscreen_container {
            dom::set_display(el, false);
        }
        if let Some(doc) = dom::window_document() {
            if doc.fullscreen_element().is_some() {
                doc.exit_fullscreen();
            }
        }
        log::info!("[view] fullscreen off");
        self.refresh();
    }

    pub fn toggle_fullscreen(self: &Rc<Self>) {
        if self.is_fullscreen() {
            self.exit_fullscreen();
        } else {
            self.enter_fullscreen();
        }
    }
}
