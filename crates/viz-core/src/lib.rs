//! Platform-independent core of the audio visualizer: the mode registry,
//! engine state and controller, 2D renderers, particle overlay, GPU uniform
//! packing and the per-frame scheduler.

pub mod constants;
pub mod controller;
pub mod error;
pub mod gpu;
pub mod input;
pub mod modes;
pub mod notify;
pub mod particles;
pub mod render2d;
pub mod scheduler;
pub mod settings;
pub mod state;
pub mod surface;

pub use controller::*;
pub use error::VizError;
pub use gpu::*;
pub use input::*;
pub use modes::*;
pub use particles::{mean_level, Particle, ParticleSystem};
pub use scheduler::*;
pub use settings::Settings;
pub use state::*;
pub use surface::*;
