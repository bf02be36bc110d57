use crate::audio::AnalyserSource;
use crate::canvas::Canvas2dSurface;
use crate::dom;
use crate::ui::Ui;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use viz_core::{FrameScheduler, FrameTargets, SampleSource, ShaderRenderer, SurfaceSlot};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    ui: Rc<Ui>,
    source: Rc<RefCell<Option<AnalyserSource>>>,
    scheduler: FrameScheduler,
    /// 2D overlays, primary then fullscreen.
    surfaces: [Canvas2dSurface; 2],
    gpu_layer_visible: [Option<bool>; 2],
}

impl FrameContext {
    pub fn new(
        ui: Rc<Ui>,
        source: Rc<RefCell<Option<AnalyserSource>>>,
        surfaces: [Canvas2dSurface; 2],
        seed: u64,
    ) -> Self {
        Self {
            ui,
            source,
            scheduler: FrameScheduler::new(seed),
            surfaces,
            gpu_layer_visible: [None; 2],
        }
    }

    #[inline]
    fn slot(&self) -> SurfaceSlot {
        SurfaceSlot::for_fullscreen(self.ui.is_fullscreen())
    }

    /// Connect the analyser on first play, then resume the audio context.
    pub fn ensure_source(&mut self, media: &web::HtmlMediaElement) -> anyhow::Result<()> {
        let mut source = self.source.borrow_mut();
        if source.is_none() {
            *source = Some(AnalyserSource::connect(media)?);
            self.scheduler.invalidate_source();
            log::info!("[audio] analyser connected");
        }
        if let Some(s) = source.as_ref() {
            s.resume();
        }
        Ok(())
    }

    pub fn start(&mut self) {
        let i = self.slot() as usize;
        dom::sync_canvas_backing_size(self.surfaces[i].canvas());
        self.scheduler.start(&self.surfaces[i]);
    }

    pub fn stop(&mut self) {
        let i = self.slot() as usize;
        self.scheduler.stop(&mut self.surfaces[i]);
    }

    fn show_gpu_layer(&mut self, i: usize, visible: bool) {
        if self.gpu_layer_visible[i] == Some(visible) {
            return;
        }
        self.gpu_layer_visible[i] = Some(visible);
        dom::set_display(&self.ui.gpu_canvases[i], visible);
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let slot = self.slot();
        let i = slot as usize;
        dom::sync_canvas_backing_size(self.surfaces[i].canvas());
        dom::sync_canvas_backing_size(&self.ui.gpu_canvases[i]);

        let gpu_mode = self.ui.controller.borrow().mode().is_gpu();
        self.show_gpu_layer(i, gpu_mode);

        let controller = self.ui.controller.borrow();
        let mut source = self.source.borrow_mut();
        let mut gpu = self.ui.gpu.borrow_mut();
        let targets = FrameTargets {
            source: source.as_mut().map(|s| s as &mut dyn SampleSource),
            surface: &mut self.surfaces[i],
            gpu: gpu.as_mut().map(|g| g as &mut dyn ShaderRenderer),
            slot,
        };
        if let Err(e) = self.scheduler.tick(now, controller.state(), targets) {
            log::warn!("[frame] {}", e);
        }
    }
}

/// requestAnimationFrame loop that can be paused and resumed.
pub struct AnimationLoop {
    handle: Rc<Cell<Option<i32>>>,
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl AnimationLoop {
    pub fn new(frame_ctx: Rc<RefCell<FrameContext>>) -> Self {
        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let tick_clone = tick.clone();
        let handle_clone = handle.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if handle_clone.get().is_none() {
                return;
            }
            frame_ctx.borrow_mut().frame();
            handle_clone.set(request_frame(&tick_clone));
        }) as Box<dyn FnMut()>));
        Self { handle, tick }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.handle.get().is_some()
    }

    pub fn start(&self) {
        if self.is_running() {
            return;
        }
        self.handle.set(request_frame(&self.tick));
    }

    /// Cancels the pending callback. Idempotent.
    pub fn stop(&self) {
        if let Some(id) = self.handle.take() {
            if let Some(w) = web::window() {
                let _ = w.cancel_animation_frame(id);
            }
        }
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) -> Option<i32> {
    let w = web::window()?;
    let cb = tick.borrow();
    let cb = cb.as_ref()?;
    w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}
