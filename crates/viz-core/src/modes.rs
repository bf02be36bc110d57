//! Registry of selectable visualization modes.
//!
//! Every mode is a variant of the closed [`RenderMode`] enum. Ids are stable
//! string keys shared with the control panels and the settings record; parsing
//! an id that is not registered is an error rather than a silent fallback.

use crate::error::VizError;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderMode {
    Bars,
    Wave,
    Circle,
    Spiral,
    Particles,
    DualBars,
    RadialBars,
    Spectrogram,
    Lissajous,
    Tunnel,
    Ring,
    FlowField,
    PulseGrid,
    CenterFlow,
}

/// Analysis and visual defaults applied when a mode becomes active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeTuning {
    pub fft_size: u32,
    pub smoothing: f32,
    pub sensitivity: f32,
    pub particles: bool,
}

impl RenderMode {
    /// Mode that GPU failures and fresh state fall back to.
    pub const DEFAULT: RenderMode = RenderMode::Bars;

    /// All modes in fixed registry order. Ordered cycling follows this order.
    pub const ALL: [RenderMode; 14] = [
        RenderMode::Bars,
        RenderMode::Wave,
        RenderMode::Circle,
        RenderMode::Spiral,
        RenderMode::Particles,
        RenderMode::DualBars,
        RenderMode::RadialBars,
        RenderMode::Spectrogram,
        RenderMode::Lissajous,
        RenderMode::Tunnel,
        RenderMode::Ring,
        RenderMode::FlowField,
        RenderMode::PulseGrid,
        RenderMode::CenterFlow,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            RenderMode::Bars => "bars",
            RenderMode::Wave => "wave",
            RenderMode::Circle => "circle",
            RenderMode::Spiral => "spiral",
            RenderMode::Particles => "particles",
            RenderMode::DualBars => "dualBars",
            RenderMode::RadialBars => "radialBars",
            RenderMode::Spectrogram => "spectrogram",
            RenderMode::Lissajous => "lissajous",
            RenderMode::Tunnel => "tunnel",
            RenderMode::Ring => "ring",
            RenderMode::FlowField => "flowField",
            RenderMode::PulseGrid => "pulseGrid",
            RenderMode::CenterFlow => "centerFlow",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RenderMode::Bars => "Frequency Bars",
            RenderMode::Wave => "Waveform",
            RenderMode::Circle => "Circular",
            RenderMode::Spiral => "Spiral",
            RenderMode::Particles => "Particles",
            RenderMode::DualBars => "Dual Bars",
            RenderMode::RadialBars => "Radial Bars",
            RenderMode::Spectrogram => "Spectrogram",
            RenderMode::Lissajous => "Lissajous",
            RenderMode::Tunnel => "Tunnel",
            RenderMode::Ring => "Neon Ring",
            RenderMode::FlowField => "Flow Field",
            RenderMode::PulseGrid => "Pulse Grid",
            RenderMode::CenterFlow => "Center Flow",
        }
    }

    /// Shader program index for GPU-backed modes.
    pub const fn gpu_program(self) -> Option<u32> {
        match self {
            RenderMode::Ring => Some(0),
            RenderMode::FlowField => Some(1),
            RenderMode::PulseGrid => Some(2),
            RenderMode::CenterFlow => Some(3),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_gpu(self) -> bool {
        self.gpu_program().is_some()
    }

    /// Spectrogram keeps its own pixel history and must not be faded.
    #[inline]
    pub const fn owns_persistence(self) -> bool {
        matches!(self, RenderMode::Spectrogram)
    }

    pub const fn tuning(self) -> ModeTuning {
        let (fft_size, smoothing, sensitivity, particles) = match self {
            RenderMode::Bars => (256, 0.65, 1.2, true),
            RenderMode::DualBars => (512, 0.65, 1.1, true),
            RenderMode::RadialBars => (512, 0.7, 1.0, true),
            RenderMode::Circle => (512, 0.7, 1.0, true),
            RenderMode::Spiral => (512, 0.75, 1.2, true),
            RenderMode::Wave => (2048, 0.85, 1.0, false),
            RenderMode::Lissajous => (2048, 0.85, 1.0, false),
            RenderMode::Spectrogram => (2048, 0.9, 1.0, false),
            RenderMode::Tunnel => (256, 0.7, 1.3, true),
            RenderMode::Particles => (256, 0.65, 1.1, true),
            RenderMode::Ring => (512, 0.8, 1.0, false),
            RenderMode::FlowField => (512, 0.8, 1.0, false),
            RenderMode::PulseGrid => (256, 0.75, 1.1, false),
            RenderMode::CenterFlow => (512, 0.8, 1.0, false),
        };
        ModeTuning {
            fft_size,
            smoothing,
            sensitivity,
            particles,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.id() == id)
    }
}

impl FromStr for RenderMode {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| VizError::UnknownMode(s.to_string()))
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
