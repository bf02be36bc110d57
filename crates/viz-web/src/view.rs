use crate::dom;
use crate::ui::Ui;
use std::rc::Rc;
use viz_core::{CycleOrder, EngineSnapshot, GpuStatus, RenderMode};
use web_sys as web;

/// Element ids of one control panel.
pub struct PanelIds {
    pub mode: &'static str,
    pub particles: &'static str,
    pub sensitivity: &'static str,
    pub auto_cycle: &'static str,
    pub interval: &'static str,
    pub order: &'static str,
    pub filter_prefix: &'static str,
    pub filter_all: &'static str,
    pub filter_none: &'static str,
    pub randomize: &'static str,
    pub reset: &'static str,
}

pub const INLINE_PANEL: PanelIds = PanelIds {
    mode: "vizType",
    particles: "showParticles",
    sensitivity: "sensitivity",
    auto_cycle: "autoCycle",
    interval: "autoCycleInterval",
    order: "cycleMode",
    filter_prefix: "modeFilter-",
    filter_all: "modeFilterAll",
    filter_none: "modeFilterNone",
    randomize: "randomizeModeBtn",
    reset: "resetDefaultsBtn",
};

pub const FULLSCREEN_PANEL: PanelIds = PanelIds {
    mode: "fullscreenVizType",
    particles: "fullscreenShowParticles",
    sensitivity: "fullscreenSensitivity",
    auto_cycle: "fullscreenAutoCycle",
    interval: "fullscreenAutoCycleInterval",
    order: "fullscreenCycleMode",
    filter_prefix: "fullscreenModeFilter-",
    filter_all: "fullscreenModeFilterAll",
    filter_none: "fullscreenModeFilterNone",
    randomize: "fullscreenRandomizeModeBtn",
    reset: "fullscreenResetDefaultsBtn",
};

/// Stateless projection of the engine state onto one set of widgets. Missing
/// widgets are skipped.
pub struct ControlPanel {
    mode: Option<web::HtmlSelectElement>,
    particles: Option<web::HtmlInputElement>,
    sensitivity: Option<web::HtmlInputElement>,
    auto_cycle: Option<web::HtmlInputElement>,
    interval: Option<web::HtmlInputElement>,
    order: Option<web::HtmlSelectElement>,
    filter: Vec<(RenderMode, web::HtmlInputElement)>,
}

impl ControlPanel {
    pub fn find(document: &web::Document, ids: &PanelIds) -> Self {
        let filter = RenderMode::ALL
            .into_iter()
            .filter_map(|m| {
                let id = format!("{}{}", ids.filter_prefix, m.id());
                dom::element::<web::HtmlInputElement>(document, &id).map(|cb| (m, cb))
            })
            .collect();
        Self {
            mode: dom::element(document, ids.mode),
            particles: dom::element(document, ids.particles),
            sensitivity: dom::element(document, ids.sensitivity),
            auto_cycle: dom::element(document, ids.auto_cycle),
            interval: dom::element(document, ids.interval),
            order: dom::element(document, ids.order),
            filter,
        }
    }

    pub fn sync(&self, s: &EngineSnapshot) {
        let gpu_off = s.gpu == GpuStatus::Unsupported;
        if let Some(el) = &self.mode {
            for mode in RenderMode::ALL.into_iter().filter(|m| m.is_gpu()) {
                let selector = format!("option[value=\"{}\"]", mode.id());
                if let Ok(Some(option)) = el.query_selector(&selector) {
                    let _ = if gpu_off {
                        option.set_attribute("disabled", "")
                    } else {
                        option.remove_attribute("disabled")
                    };
                }
            }
            el.set_value(s.mode.id());
        }
        if let Some(el) = &self.particles {
            el.set_checked(s.particles);
        }
        if let Some(el) = &self.sensitivity {
            el.set_value(&format!("{:.1}", s.sensitivity));
        }
        if let Some(el) = &self.auto_cycle {
            el.set_checked(s.auto_cycle);
        }
        if let Some(el) = &self.interval {
            el.set_value(&s.cycle_interval_sec.to_string());
        }
        if let Some(el) = &self.order {
            el.set_value(s.cycle_order.id());
        }
        for (mode, cb) in &self.filter {
            cb.set_checked(s.filter.contains(*mode));
            cb.set_disabled(gpu_off && mode.is_gpu());
        }
    }

    pub fn wire(&self, document: &web::Document, ids: &PanelIds, ui: &Rc<Ui>) {
        if let Some(el) = &self.mode {
            let ui = ui.clone();
            let select = el.clone();
            dom::listen(el, "change", move |_| {
                let id = select.value();
                let result = ui.controller.borrow_mut().set_mode_by_id(&id);
                if let Err(e) = result {
                    log::warn!("[mode] {}", e);
                }
                ui.refresh();
            });
        }
        if let Some(el) = &self.particles {
            let ui = ui.clone();
            let input = el.clone();
            dom::listen(el, "change", move |_| {
                ui.update(|c| c.set_particles_enabled(input.checked()));
            });
        }
        if let Some(el) = &self.sensitivity {
            let ui = ui.clone();
            let input = el.clone();
            dom::listen(el, "input", move |_| {
                if let Ok(v) = input.value().parse::<f32>() {
                    ui.update(|c| c.set_sensitivity(v));
                }
            });
        }
        if let Some(el) = &self.auto_cycle {
            let ui = ui.clone();
            let input = el.clone();
            dom::listen(el, "change", move |_| {
                let on = input.checked();
                ui.update(|c| {
                    if on {
                        let secs = c.state().cycle_interval_sec;
                        c.start_auto_cycle(secs);
                    } else {
                        c.stop_auto_cycle();
                    }
                });
            });
        }
        if let Some(el) = &self.interval {
            let ui = ui.clone();
            let input = el.clone();
            dom::listen(el, "input", move |_| {
                let secs = input
                    .value()
                    .parse::<f64>()
                    .map(|v| v.max(0.0) as u32)
                    .unwrap_or(viz_core::constants::CYCLE_INTERVAL_DEFAULT_SEC);
                ui.update(|c| c.set_cycle_interval(secs));
            });
        }
        if let Some(el) = &self.order {
            let ui = ui.clone();
            let select = el.clone();
            dom::listen(el, "change", move |_| {
                let order = CycleOrder::from_id(&select.value());
                ui.update(|c| c.set_cycle_order(order));
            });
        }
        for (mode, cb) in &self.filter {
            let ui = ui.clone();
            let mode = *mode;
            let input = cb.clone();
            dom::listen(cb, "change", move |_| {
                ui.update(|c| c.set_mode_enabled(mode, input.checked()));
            });
        }
        {
            let ui = ui.clone();
            dom::add_click_listener(document, ids.filter_all, move || {
                ui.update(|c| c.set_mode_filter_all(true));
            });
        }
        {
            let ui = ui.clone();
            dom::add_click_listener(document, ids.filter_none, move || {
                ui.update(|c| c.set_mode_filter_all(false));
            });
        }
        {
            let ui = ui.clone();
            dom::add_click_listener(document, ids.randomize, move || {
                ui.update(|c| {
                    c.pick_random_mode();
                });
            });
        }
        {
            let ui = ui.clone();
            dom::add_click_listener(document, ids.reset, move || {
                ui.update(|c| c.reset_mode_defaults());
            });
        }
    }
}

/// Fill a `<select>` with one option per registered mode, if it is empty.
pub fn populate_mode_select(document: &web::Document, id: &str) {
    let Some(select) = dom::element::<web::HtmlSelectElement>(document, id) else {
        return;
    };
    if select.length() > 0 {
        return;
    }
    for mode in RenderMode::ALL {
        let Ok(option) = document.create_element("option") else {
            continue;
        };
        let _ = option.set_attribute("value", mode.id());
        option.set_text_content(Some(mode.label()));
        let _ = select.append_child(&option);
    }
}
