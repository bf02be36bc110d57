use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Typed lookup; `None` when the element is missing or of another type.
pub fn element<T: JsCast>(document: &web::Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

pub fn require<T: JsCast>(document: &web::Document, id: &str) -> anyhow::Result<T> {
    element(document, id).ok_or_else(|| anyhow::anyhow!("missing #{}", id))
}

/// Attach a listener for the element's lifetime.
pub fn listen(target: &web::EventTarget, event: &str, handler: impl FnMut(web::Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
    let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        listen(&el, "click", move |_| handler());
    }
}

/// Match the backing store to CSS size times devicePixelRatio. Returns true
/// when the size changed.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> bool {
    let Some(w) = web::window() else {
        return false;
    };
    let dpr = w.device_pixel_ratio();
    let rect = canvas.get_bounding_client_rect();
    let w_px = ((rect.width() * dpr) as u32).max(1);
    let h_px = ((rect.height() * dpr) as u32).max(1);
    if canvas.width() == w_px && canvas.height() == h_px {
        return false;
    }
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    true
}

pub fn set_display(el: &web::HtmlElement, visible: bool) {
    let _ = el
        .style()
        .set_property("display", if visible { "block" } else { "none" });
}
