use crate::dom;
use crate::frame::{AnimationLoop, FrameContext};
use crate::ui::Ui;
use std::cell::RefCell;
use std::rc::Rc;
use viz_core::{action_for_key, apply_key_action, KeyAction};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Text-like inputs keep their keystrokes, except Escape.
fn typing_into_field(ev: &web::KeyboardEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
        .map(|input| matches!(input.type_().as_str(), "text" | "number" | "search"))
        .unwrap_or(false)
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, ui: &Rc<Ui>) {
    let key = ev.key();
    if key != "Escape" && typing_into_field(ev) {
        return;
    }
    let Some(action) = action_for_key(&key, ui.is_fullscreen()) else {
        return;
    };
    match action {
        KeyAction::ToggleFullscreen => {
            ev.prevent_default();
            ui.toggle_fullscreen();
        }
        KeyAction::ExitFullscreen => ui.exit_fullscreen(),
        other => {
            ui.update(|c| apply_key_action(c, other));
        }
    }
}

pub fn wire_global_keydown(document: &web::Document, ui: &Rc<Ui>) {
    let ui = ui.clone();
    dom::listen(document, "keydown", move |ev| {
        if let Some(ev) = ev.dyn_ref::<web::KeyboardEvent>() {
            handle_global_keydown(ev, &ui);
        }
    });
}

pub fn wire_fullscreen_buttons(document: &web::Document, ui: &Rc<Ui>) {
    {
        let ui = ui.clone();
        dom::add_click_listener(document, "fullscreenBtn", move || ui.enter_fullscreen());
    }
    {
        let ui = ui.clone();
        dom::add_click_listener(document, "exitFullscreenBtn", move || ui.exit_fullscreen());
    }
    // Browser-level exit (Esc handled by the browser) never reaches keydown.
    let ui = ui.clone();
    let doc = document.clone();
    dom::listen(document, "fullscreenchange", move |_| {
        if doc.fullscreen_element().is_none() && ui.is_fullscreen() {
            ui.exit_fullscreen();
        }
    });
}

/// play -> connect analyser once, resume and start drawing;
/// pause / ended -> stop the loop and leave a single fade.
pub fn wire_transport(
    media: &web::HtmlMediaElement,
    frame_ctx: &Rc<RefCell<FrameContext>>,
    anim: &Rc<AnimationLoop>,
) {
    {
        let media_el = media.clone();
        let frame_ctx = frame_ctx.clone();
        let anim = anim.clone();
        dom::listen(media, "play", move |_| {
            if let Err(e) = frame_ctx.borrow_mut().ensure_source(&media_el) {
                log::error!("[audio] {:#}", e);
                return;
            }
            frame_ctx.borrow_mut().start();
            anim.start();
        });
    }
    for event in ["pause", "ended"] {
        let frame_ctx = frame_ctx.clone();
        let anim = anim.clone();
        dom::listen(media, event, move |_| {
            anim.stop();
            frame_ctx.borrow_mut().stop();
        });
    }
}
