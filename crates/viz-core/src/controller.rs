//! Mode selection, filtering and auto-cycling.
//!
//! The controller owns the single [`EngineState`]. It never touches widgets or
//! storage: views re-read [`ModeController::snapshot`] after each mutation and
//! persistence subscribes to the debounced change event.
//!
//! Auto-cycle timing belongs to the host, but the controller decides whether a
//! timer tick counts. Each (re)start bumps a generation number and ticks
//! carrying an older generation are ignored, so at most one timer is live.

use crate::constants::CHANGE_DEBOUNCE_MS;
use crate::error::{Result, VizError};
use crate::modes::RenderMode;
use crate::notify::ChangeNotifier;
use crate::settings::Settings;
use crate::state::*;
use instant::Instant;
use rand::prelude::*;
use std::time::Duration;

/// What the host timer should currently be doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleSchedule {
    pub generation: u64,
    pub period: Duration,
}

pub struct ModeController {
    state: EngineState,
    rng: StdRng,
    cycle_generation: u64,
    gpu_requested: bool,
    changes: ChangeNotifier,
}

impl ModeController {
    pub fn new(seed: u64) -> Self {
        Self {
            state: EngineState::default(),
            rng: StdRng::seed_from_u64(seed),
            cycle_generation: 0,
            gpu_requested: false,
            changes: ChangeNotifier::new(Duration::from_millis(CHANGE_DEBOUNCE_MS)),
        }
    }

    #[inline]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    #[inline]
    pub fn mode(&self) -> RenderMode {
        self.state.mode
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.state.clone()
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.changes.revision()
    }

    fn changed(&mut self) {
        self.changes.mark(Instant::now());
    }

    // ---------------- Mode selection ----------------

    /// Activate `mode` and apply its defaults. Ignored when the mode is not in
    /// the filter. A GPU mode picked after the GPU was ruled out lands on the
    /// default 2D mode instead. Returns whether anything was activated.
    pub fn set_mode(&mut self, mode: RenderMode) -> bool {
        if !self.state.is_available(mode) {
            self.activate(mode);
            return true;
        }
        if !self.state.filter.contains(mode) && !self.state.filter.is_empty() {
            log::debug!("[mode] {} not in filter; ignored", mode);
            return false;
        }
        self.activate(mode);
        true
    }

    /// Like [`set_mode`](Self::set_mode) but from a string id. Unregistered
    /// ids are an error.
    pub fn set_mode_by_id(&mut self, id: &str) -> Result<bool> {
        let mode: RenderMode = id.parse()?;
        Ok(self.set_mode(mode))
    }

    fn activate(&mut self, mode: RenderMode) {
        let mode = if self.state.is_available(mode) {
            mode
        } else {
            log::info!("[gpu] {} unavailable; using {}", mode, RenderMode::DEFAULT);
            RenderMode::DEFAULT
        };
        if mode.is_gpu() && self.state.gpu == GpuStatus::Unknown {
            self.state.gpu = GpuStatus::Pending;
            self.gpu_requested = true;
        }
        self.state.filter.insert(mode);
        self.state.mode = mode;
        self.apply_tuning();
        log::info!("[mode] active={}", mode);
        self.changed();
    }

    fn apply_tuning(&mut self) {
        let tuning = self.state.mode.tuning();
        self.state.sensitivity = tuning.sensitivity;
        self.state.particles = tuning.particles;
        self.state.analysis = tuning.into();
    }

    /// Re-apply the active mode's default tuning.
    pub fn reset_mode_defaults(&mut self) {
        self.apply_tuning();
        self.changed();
    }

    pub fn set_sensitivity(&mut self, value: f32) {
        self.state.sensitivity = clamp_sensitivity(value);
        self.changed();
    }

    pub fn adjust_sensitivity(&mut self, delta: f32) {
        self.set_sensitivity(self.state.sensitivity + delta);
    }

    pub fn set_particles_enabled(&mut self, enabled: bool) {
        self.state.particles = enabled;
        self.changed();
    }

    /// Choose uniformly among the filtered modes, never re-picking the current
    /// mode while an alternative exists.
    pub fn pick_random_mode(&mut self) -> RenderMode {
        let modes = self.state.filtered_modes();
        let current = self.state.mode;
        let next = match modes.len() {
            0 => return current,
            1 => modes[0],
            _ => {
                let others: Vec<RenderMode> =
                    modes.iter().copied().filter(|m| *m != current).collect();
                others.choose(&mut self.rng).copied().unwrap_or(current)
            }
        };
        self.activate(next);
        next
    }

    /// Next filtered mode in registry order, wrapping. If the current mode is
    /// no longer in the filter the first filtered mode is used.
    pub fn advance_ordered_mode(&mut self) -> RenderMode {
        let modes = self.state.filtered_modes();
        if modes.is_empty() {
            return self.state.mode;
        }
        let next = match modes.iter().position(|m| *m == self.state.mode) {
            Some(i) => modes[(i + 1) % modes.len()],
            None => modes[0],
        };
        self.activate(next);
        next
    }

    // ---------------- Filter ----------------

    pub fn filtered_modes(&self) -> Vec<RenderMode> {
        self.state.filtered_modes()
    }

    /// Replace the eligible set. An empty set re-admits the active mode.
    pub fn set_mode_filter(&mut self, modes: impl IntoIterator<Item = RenderMode>) {
        let mut filter = ModeFilter::empty();
        for m in modes {
            if self.state.is_available(m) {
                filter.insert(m);
            }
        }
        self.state.filter = filter;
        self.after_filter_change();
    }

    pub fn set_mode_filter_all(&mut self, enabled: bool) {
        if enabled {
            let available = self.state.available_modes();
            self.set_mode_filter(available);
        } else {
            self.set_mode_filter(std::iter::empty());
        }
    }

    pub fn set_mode_enabled(&mut self, mode: RenderMode, enabled: bool) {
        let mut filter = self.state.filter;
        if enabled {
            filter.insert(mode);
        } else {
            filter.remove(mode);
        }
        self.set_mode_filter(filter.iter().collect::<Vec<_>>());
    }

    fn after_filter_change(&mut self) {
        if self.state.filter.is_empty() {
            log::info!("[mode] filter emptied; keeping {}", self.state.mode);
            self.state.filter.insert(self.state.mode);
        }
        if !self.state.filter.contains(self.state.mode) {
            if let Some(first) = self.state.filter.first() {
                self.activate(first);
            }
        }
        self.changed();
        self.restart_auto_cycle();
    }

    // ---------------- Auto-cycle ----------------

    /// Advance immediately, then expect a timer tick every `seconds` (clamped
    /// to [2, 60]). Replaces any running cycle.
    pub fn start_auto_cycle(&mut self, seconds: u32) -> CycleSchedule {
        self.state.cycle_interval_sec = clamp_cycle_interval(seconds);
        self.state.auto_cycle = true;
        self.cycle_generation += 1;
        log::info!(
            "[cycle] start every {}s ({})",
            self.state.cycle_interval_sec,
            self.state.cycle_order.id()
        );
        self.cycle_step();
        self.changed();
        self.schedule()
    }

    pub fn stop_auto_cycle(&mut self) {
        if !self.state.auto_cycle {
            return;
        }
        self.state.auto_cycle = false;
        self.cycle_generation += 1;
        log::info!("[cycle] stop");
        self.changed();
    }

    fn restart_auto_cycle(&mut self) {
        if self.state.auto_cycle {
            self.start_auto_cycle(self.state.cycle_interval_sec);
        }
    }

    pub fn set_cycle_interval(&mut self, seconds: u32) {
        self.state.cycle_interval_sec = clamp_cycle_interval(seconds);
        self.changed();
        self.restart_auto_cycle();
    }

    pub fn set_cycle_order(&mut self, order: CycleOrder) {
        self.state.cycle_order = order;
        self.changed();
        self.restart_auto_cycle();
    }

    fn schedule(&self) -> CycleSchedule {
        CycleSchedule {
            generation: self.cycle_generation,
            period: Duration::from_secs(self.state.cycle_interval_sec as u64),
        }
    }

    /// The timer the host should have running, if any.
    pub fn cycle_schedule(&self) -> Option<CycleSchedule> {
        self.state.auto_cycle.then(|| self.schedule())
    }

    /// Host timer callback. Stale generations are ignored.
    pub fn on_cycle_timer(&mut self, generation: u64) -> bool {
        if !self.state.auto_cycle || generation != self.cycle_generation {
            return false;
        }
        self.cycle_step();
        true
    }

    fn cycle_step(&mut self) {
        match self.state.cycle_order {
            CycleOrder::Ordered => self.advance_ordered_mode(),
            CycleOrder::Random => self.pick_random_mode(),
        };
    }

    // ---------------- GPU availability ----------------

    /// One-shot: true the first time a GPU mode needs the device.
    pub fn take_gpu_request(&mut self) -> bool {
        std::mem::take(&mut self.gpu_requested)
    }

    pub fn gpu_ready(&mut self) {
        self.state.gpu = GpuStatus::Ready;
        log::info!("[gpu] ready");
        self.changed();
    }

    /// Drop GPU modes from eligibility and fall back to the default 2D mode.
    pub fn gpu_unavailable(&mut self, err: &VizError) {
        log::warn!("[gpu] {}", err);
        self.state.gpu = GpuStatus::Unsupported;
        self.gpu_requested = false;
        for m in RenderMode::ALL.into_iter().filter(|m| m.is_gpu()) {
            self.state.filter.remove(m);
        }
        if self.state.mode.is_gpu() {
            self.activate(RenderMode::DEFAULT);
        }
        if self.state.filter.is_empty() {
            self.state.filter.insert(self.state.mode);
        }
        self.changed();
    }

    // ---------------- Notifications ----------------

    pub fn subscribe(&mut self, listener: impl FnMut(&EngineState) + 'static) {
        self.changes.subscribe(listener);
    }

    pub fn has_pending_change(&self) -> bool {
        self.changes.is_pending()
    }

    /// Deliver the debounced change event if the quiet window has elapsed.
    pub fn flush_changes(&mut self, now: Instant) -> bool {
        self.changes.flush(now, &self.state)
    }

    // ---------------- Persistence record ----------------

    pub fn to_settings(&self) -> Settings {
        Settings::from(&self.state)
    }

    /// Restore a persisted record. Unknown ids are skipped; persisted
    /// sensitivity and particle choices override the mode defaults.
    pub fn apply_settings(&mut self, settings: &Settings) {
        if let Some(ids) = &settings.mode_filter {
            let modes: Vec<RenderMode> = ids
                .iter()
                .filter_map(|id| RenderMode::from_id(id))
                .collect();
            if !modes.is_empty() {
                self.state.filter = ModeFilter::from_modes(modes);
            }
        }
        if let Some(id) = &settings.mode {
            match id.parse::<RenderMode>() {
                Ok(mode) => self.activate(mode),
                Err(e) => log::warn!("[settings] {}", e),
            }
        }
        if !self.state.filter.contains(self.state.mode) {
            if let Some(first) = self.state.filter.first() {
                self.activate(first);
            }
        }
        if let Some(v) = settings.sensitivity {
            self.state.sensitivity = clamp_sensitivity(v);
        }
        if let Some(p) = settings.particles {
            self.state.particles = p;
        }
        if let Some(order) = &settings.cycle_order {
            self.state.cycle_order = CycleOrder::from_id(order);
        }
        if let Some(secs) = settings.auto_cycle_seconds {
            self.state.cycle_interval_sec = clamp_cycle_interval(secs);
        }
        self.changed();
        if settings.auto_cycle == Some(true) {
            self.start_auto_cycle(self.state.cycle_interval_sec);
        }
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(0x5EED_CAFE)
    }
}

/// Parse a list of ids, failing on the first unregistered one.
pub fn parse_mode_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Result<Vec<RenderMode>> {
    ids.into_iter()
        .map(|id| RenderMode::from_id(id).ok_or_else(|| VizError::UnknownMode(id.to_string())))
        .collect()
}
