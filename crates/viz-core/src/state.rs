//! Engine state shared with the view layer.
//!
//! These types avoid any platform API so the web frontend and host tests can
//! both use them. The view layer reads an [`EngineState`] snapshot and mirrors
//! it into whichever control panel is visible.

use crate::constants::*;
use crate::modes::{ModeTuning, RenderMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CycleOrder {
    Ordered,
    #[default]
    Random,
}

impl CycleOrder {
    pub const fn id(self) -> &'static str {
        match self {
            CycleOrder::Ordered => "ordered",
            CycleOrder::Random => "random",
        }
    }

    /// Anything other than `ordered` means random.
    pub fn from_id(id: &str) -> Self {
        if id == "ordered" {
            CycleOrder::Ordered
        } else {
            CycleOrder::Random
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GpuStatus {
    #[default]
    Unknown,
    Pending,
    Ready,
    Unsupported,
}

/// Analyser configuration forwarded to the sample source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalysisSettings {
    pub fft_size: u32,
    pub smoothing: f32,
}

impl From<ModeTuning> for AnalysisSettings {
    fn from(t: ModeTuning) -> Self {
        Self {
            fft_size: t.fft_size,
            smoothing: t.smoothing,
        }
    }
}

/// Set of modes, iterated in registry order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ModeFilter(u32);

impl ModeFilter {
    pub fn all() -> Self {
        Self::from_modes(RenderMode::ALL)
    }

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn from_modes(modes: impl IntoIterator<Item = RenderMode>) -> Self {
        let mut f = Self::empty();
        for m in modes {
            f.insert(m);
        }
        f
    }

    #[inline]
    fn bit(mode: RenderMode) -> u32 {
        1 << mode.index()
    }

    #[inline]
    pub fn contains(&self, mode: RenderMode) -> bool {
        self.0 & Self::bit(mode) != 0
    }

    #[inline]
    pub fn insert(&mut self, mode: RenderMode) {
        self.0 |= Self::bit(mode);
    }

    #[inline]
    pub fn remove(&mut self, mode: RenderMode) {
        self.0 &= !Self::bit(mode);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = RenderMode> + '_ {
        RenderMode::ALL.into_iter().filter(|m| self.contains(*m))
    }

    pub fn first(&self) -> Option<RenderMode> {
        self.iter().next()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineState {
    pub mode: RenderMode,
    pub sensitivity: f32,
    pub particles: bool,
    pub analysis: AnalysisSettings,
    pub filter: ModeFilter,
    pub auto_cycle: bool,
    pub cycle_interval_sec: u32,
    pub cycle_order: CycleOrder,
    pub gpu: GpuStatus,
}

/// What the views read to mirror the engine into their widgets.
pub type EngineSnapshot = EngineState;

impl Default for EngineState {
    fn default() -> Self {
        let mode = RenderMode::DEFAULT;
        let tuning = mode.tuning();
        Self {
            mode,
            sensitivity: tuning.sensitivity,
            particles: tuning.particles,
            analysis: tuning.into(),
            filter: ModeFilter::all(),
            auto_cycle: false,
            cycle_interval_sec: CYCLE_INTERVAL_DEFAULT_SEC,
            cycle_order: CycleOrder::default(),
            gpu: GpuStatus::default(),
        }
    }
}

impl EngineState {
    /// Whether `mode` can be offered at all, independent of the filter.
    #[inline]
    pub fn is_available(&self, mode: RenderMode) -> bool {
        !(mode.is_gpu() && self.gpu == GpuStatus::Unsupported)
    }

    /// Modes the UI should offer as selectable.
    pub fn available_modes(&self) -> Vec<RenderMode> {
        RenderMode::ALL
            .into_iter()
            .filter(|m| self.is_available(*m))
            .collect()
    }

    /// Filtered modes in registry order.
    pub fn filtered_modes(&self) -> Vec<RenderMode> {
        self.filter.iter().filter(|m| self.is_available(*m)).collect()
    }
}

#[inline]
pub fn clamp_cycle_interval(seconds: u32) -> u32 {
    seconds.clamp(CYCLE_INTERVAL_MIN_SEC, CYCLE_INTERVAL_MAX_SEC)
}

#[inline]
pub fn clamp_sensitivity(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX)
    } else {
        RenderMode::DEFAULT.tuning().sensitivity
    }
}
