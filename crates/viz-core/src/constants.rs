// Shared visual tuning constants used by the engine and the web frontend.

// Per-frame fade-trail fill, rgba(0, 4, 40, 0.1)
pub const FADE_FILL_RGB: [u8; 3] = [0, 4, 40];
pub const FADE_FILL_ALPHA: f32 = 0.1;

// Particle pool
pub const PARTICLE_CAP: usize = 200;
pub const PARTICLE_SEED_COUNT: usize = 50;
pub const PARTICLE_MAX_LIFE: f32 = 100.0;
pub const PARTICLE_SPAWN_STRIDE: usize = 8; // sample every 8th bin when spawning
pub const PARTICLE_SPAWN_THRESHOLD: f32 = 0.3;
pub const PARTICLE_SPEED_SCALE: f32 = 5.0;
pub const PARTICLE_MAX_RADIUS: f32 = 3.0;

// Bars
pub const BAR_WIDTH_FACTOR: f32 = 2.5;
pub const BAR_GAP_PX: f32 = 1.0;
pub const BAR_GLOW: f32 = 10.0;
pub const DUAL_BAR_WIDTH_FACTOR: f32 = 2.2;
pub const DUAL_BAR_SCALE: f32 = 0.45;
pub const DUAL_BAR_GLOW: f32 = 12.0;

// Radial / circular layouts, expressed as fractions of min(cx, cy)
pub const RADIAL_BASE_RADIUS: f32 = 0.3;
pub const RADIAL_MAX_EXTRA: f32 = 0.6;
pub const RADIAL_DISC_SCALE: f32 = 0.6;
pub const RADIAL_DISC_PULSE_PX: f32 = 20.0;
pub const CIRCLE_RING_RADIUS: f32 = 0.8;

// Traces
pub const WAVE_LINE_WIDTH: f32 = 3.0;
pub const WAVE_GLOW: f32 = 20.0;
pub const SPIRAL_TURNS: f32 = 4.0;
pub const SPIRAL_MAX_RADIUS: f32 = 0.8;
pub const SPIRAL_WOBBLE_PX: f32 = 50.0;
pub const LISSAJOUS_DELAY_FRACTION: f32 = 0.25;
pub const LISSAJOUS_EXTENT: f32 = 0.45;
pub const LISSAJOUS_GLOW: f32 = 12.0;

// Tunnel
pub const TUNNEL_LAYERS: usize = 20;
pub const TUNNEL_SIDES: usize = 24;
pub const TUNNEL_WOBBLE_PX: f32 = 10.0;
pub const TUNNEL_WOBBLE_PERIOD_SEC: f32 = 0.4;
pub const TUNNEL_HUE_DEG_PER_SEC: f32 = 20.0;

// Spectrogram
pub const SPECTROGRAM_ROW_PX: u32 = 2;
pub const SPECTROGRAM_GAMMA: f32 = 0.8;
pub const SPECTROGRAM_LIGHTNESS_MIN: f32 = 30.0;
pub const SPECTROGRAM_LIGHTNESS_MAX: f32 = 85.0;
pub const SPECTROGRAM_DIM_ALPHA: f32 = 0.05;
pub const SPECTROGRAM_DIM_RGB: [u8; 3] = [0, 4, 40]; // #000428

// Mode control
pub const SENSITIVITY_MIN: f32 = 0.1;
pub const SENSITIVITY_MAX: f32 = 3.0;
pub const SENSITIVITY_STEP: f32 = 0.1;
pub const CYCLE_INTERVAL_MIN_SEC: u32 = 2;
pub const CYCLE_INTERVAL_MAX_SEC: u32 = 60;
pub const CYCLE_INTERVAL_DEFAULT_SEC: u32 = 10;
pub const CHANGE_DEBOUNCE_MS: u64 = 250;
