#![cfg(target_arch = "wasm32")]
//! Browser host for the visualizer: canvas and WebGPU surfaces, the WebAudio
//! analyser, control panels, timers and keyboard wiring around `viz-core`.

pub mod audio;
pub mod canvas;
pub mod cycle;
pub mod dom;
pub mod events;
pub mod frame;
pub mod gpu;
pub mod storage;
pub mod ui;
pub mod view;

use std::cell::RefCell;
use std::rc::Rc;
use viz_core::{ModeController, Settings};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("viz-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

fn seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let media: web::HtmlMediaElement = dom::require(&document, "audioElement")?;
    let primary: web::HtmlCanvasElement = dom::require(&document, "visualizer")?;
    let fullscreen: web::HtmlCanvasElement = dom::require(&document, "fullscreenCanvas")?;
    let primary_gpu: web::HtmlCanvasElement = dom::require(&document, "visualizerGpu")?;
    let fullscreen_gpu: web::HtmlCanvasElement = dom::require(&document, "fullscreenCanvasGpu")?;
    let fullscreen_container = dom::element::<web::HtmlElement>(&document, "fullscreenVisualizer");
    for canvas in [&primary, &fullscreen, &primary_gpu, &fullscreen_gpu] {
        dom::sync_canvas_backing_size(canvas);
    }
    dom::set_display(&primary_gpu, false);
    dom::set_display(&fullscreen_gpu, false);

    let panel_ids = [&view::INLINE_PANEL, &view::FULLSCREEN_PANEL];
    let panels = panel_ids
        .iter()
        .map(|ids| {
            view::populate_mode_select(&document, ids.mode);
            view::ControlPanel::find(&document, ids)
        })
        .collect();

    let controller = Rc::new(RefCell::new(ModeController::new(seed())));
    {
        let mut c = controller.borrow_mut();
        c.apply_settings(&storage::load_settings());
        c.subscribe(|state| storage::save_settings(&Settings::from(state)));
        log::info!("[settings] restored mode={}", c.mode());
    }

    let ui = Rc::new(ui::Ui::new(
        controller,
        [primary_gpu, fullscreen_gpu],
        panels,
        fullscreen_container,
    ));
    for (panel, ids) in ui.panels().iter().zip(panel_ids) {
        panel.wire(&document, ids, &ui);
    }

    let surfaces = [
        canvas::Canvas2dSurface::new(primary)?,
        canvas::Canvas2dSurface::new(fullscreen)?,
    ];
    let source = Rc::new(RefCell::new(None));
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        ui.clone(),
        source,
        surfaces,
        seed(),
    )));
    let anim = Rc::new(frame::AnimationLoop::new(frame_ctx.clone()));

    events::wire_global_keydown(&document, &ui);
    events::wire_fullscreen_buttons(&document, &ui);
    events::wire_transport(&media, &frame_ctx, &anim);

    ui.refresh();
    log::info!("[init] ready");
    Ok(())
}
