//! Audio-reactive particle pool.
//!
//! Particles live in a FIFO ring: new ones are pushed at the back and the pool
//! is capped at [`PARTICLE_CAP`] by evicting from the front, so the oldest
//! particle always goes first.

use crate::constants::*;
use crate::surface::{Color, Surface};
use glam::Vec2;
use rand::prelude::*;
use std::collections::VecDeque;
use std::f32::consts::TAU;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub hue: f32,
}

impl Particle {
    #[inline]
    pub fn life_fraction(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }

    #[inline]
    fn is_alive_within(&self, width: f32, height: f32) -> bool {
        self.life > 0.0
            && self.pos.x >= 0.0
            && self.pos.x <= width
            && self.pos.y >= 0.0
            && self.pos.y <= height
    }
}

pub struct ParticleSystem {
    pool: VecDeque<Particle>,
    rng: StdRng,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            pool: VecDeque::with_capacity(PARTICLE_CAP),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.pool.iter()
    }

    /// Replace the pool with a scatter of slow random particles across the surface.
    pub fn reseed(&mut self, width: f32, height: f32) {
        self.pool.clear();
        for _ in 0..PARTICLE_SEED_COUNT {
            let p = Particle {
                pos: Vec2::new(
                    self.rng.gen::<f32>() * width,
                    self.rng.gen::<f32>() * height,
                ),
                vel: Vec2::new(
                    (self.rng.gen::<f32>() - 0.5) * 2.0,
                    (self.rng.gen::<f32>() - 0.5) * 2.0,
                ),
                life: self.rng.gen::<f32>() * PARTICLE_MAX_LIFE,
                max_life: PARTICLE_MAX_LIFE,
                hue: self.rng.gen::<f32>() * 360.0,
            };
            self.push(p);
        }
    }

    pub fn push(&mut self, particle: Particle) {
        self.pool.push_back(particle);
        while self.pool.len() > PARTICLE_CAP {
            self.pool.pop_front();
        }
    }

    /// Emit particles from `origin` for every 8th bin whose scaled amplitude
    /// crosses the spawn threshold. Returns how many were emitted.
    pub fn spawn_from_spectrum(&mut self, freq: &[u8], sensitivity: f32, origin: Vec2) -> usize {
        let n = freq.len();
        let mut spawned = 0;
        for i in (0..n).step_by(PARTICLE_SPAWN_STRIDE) {
            let amplitude = freq[i] as f32 / 255.0 * sensitivity;
            if amplitude <= PARTICLE_SPAWN_THRESHOLD {
                continue;
            }
            let angle = self.rng.gen::<f32>() * TAU;
            let speed = amplitude * PARTICLE_SPEED_SCALE;
            self.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: PARTICLE_MAX_LIFE,
                max_life: PARTICLE_MAX_LIFE,
                hue: i as f32 / n as f32 * 360.0,
            });
            spawned += 1;
        }
        spawned
    }

    /// Advance one frame: move, age, jitter by the mean amplitude, then drop
    /// particles that expired or left the `width` x `height` bounds.
    pub fn update(&mut self, mean_amplitude: f32, sensitivity: f32, width: f32, height: f32) {
        let jitter = mean_amplitude * sensitivity;
        for p in self.pool.iter_mut() {
            p.pos += p.vel;
            p.life -= 1.0;
            p.vel.x += (self.rng.gen::<f32>() - 0.5) * jitter;
            p.vel.y += (self.rng.gen::<f32>() - 0.5) * jitter;
        }
        self.pool.retain(|p| p.is_alive_within(width, height));
        while self.pool.len() > PARTICLE_CAP {
            self.pool.pop_front();
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for p in &self.pool {
            let alpha = p.life_fraction();
            let radius = alpha * PARTICLE_MAX_RADIUS;
            surface.fill_circle(p.pos, radius, Color::hsla(p.hue, 100.0, 50.0, alpha));
            surface.set_glow(radius * 2.0, Color::hsl(p.hue, 100.0, 50.0));
            surface.fill_circle(p.pos, radius, Color::hsla(p.hue, 100.0, 50.0, alpha));
            surface.clear_glow();
        }
    }

    /// Shared per-frame overlay step used by every mode when particles are on.
    pub fn step(&mut self, surface: &mut dyn Surface, freq: &[u8], sensitivity: f32) {
        let (w, h) = surface.size();
        self.update(mean_level(freq), sensitivity, w as f32, h as f32);
        self.draw(surface);
    }
}

/// Mean magnitude normalized to [0, 1]; 0 for an empty buffer.
pub fn mean_level(data: &[u8]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: u32 = data.iter().map(|&v| v as u32).sum();
    sum as f32 / data.len() as f32 / 255.0
}
