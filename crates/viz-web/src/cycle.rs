use crate::ui::Ui;
use std::rc::Rc;
use viz_core::CycleSchedule;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// The single `setInterval` driving auto-cycle. It mirrors whatever schedule
/// the controller currently asks for.
#[derive(Default)]
pub struct CycleTimer {
    live: Option<(CycleSchedule, i32)>,
    _tick: Option<Closure<dyn FnMut()>>,
}

impl CycleTimer {
    pub fn sync(&mut self, wanted: Option<CycleSchedule>, ui: &Rc<Ui>) {
        if self.live.map(|(s, _)| s) == wanted {
            return;
        }
        self.cancel();
        let Some(schedule) = wanted else {
            return;
        };
        let Some(window) = web::window() else {
            return;
        };
        let ui = ui.clone();
        let tick = Closure::wrap(Box::new(move || {
            let advanced = ui.controller.borrow_mut().on_cycle_timer(schedule.generation);
            if advanced {
                ui.refresh();
            }
        }) as Box<dyn FnMut()>);
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            schedule.period.as_millis() as i32,
        ) {
            Ok(id) => {
                self.live = Some((schedule, id));
                self._tick = Some(tick);
            }
            Err(e) => log::error!("[cycle] setInterval failed: {:?}", e),
        }
    }

    fn cancel(&mut self) {
        if let Some((_, id)) = self.live.take() {
            if let Some(window) = web::window() {
                window.clear_interval_with_handle(id);
            }
        }
        self._tick = None;
    }
}
