use crate::compositing::Rgba8;
use crate::util::rng::SimpleRng;
use serde::{Deserialize, Serialize};

/// Life lost per tick, one 60Hz frame.
pub const TICK_MS: f32 = 16.67;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticleSettings {
    pub max_particles: usize,
    /// Milliseconds a particle lives
    pub lifespan_ms: f32,
    pub palette: Vec<Rgba8>,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            max_particles: 100,
            lifespan_ms: 3000.0,
            palette: vec![
                Rgba8::new(0xFF, 0x6B, 0x6B, 255),
                Rgba8::new(0x4E, 0xCD, 0xC4, 255),
                Rgba8::new(0x45, 0xB7, 0xD1, 255),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Milliseconds left
    pub life: f32,
    pub size: f32,
    pub color: Rgba8,
}

impl Particle {
    /// Remaining life as a fraction of `lifespan_ms`, for fading.
    pub fn life_fraction(&self, lifespan_ms: f32) -> f32 {
        if lifespan_ms <= 0.0 {
            return 0.0;
        }
        (self.life / lifespan_ms).clamp(0.0, 1.0)
    }
}

/// Pointer-driven sparkles over the canvas. Positions are in screen points.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    settings: ParticleSettings,
    particles: Vec<Particle>,
    rng: SimpleRng,
}

impl ParticleSystem {
    pub fn new(settings: ParticleSettings, seed: u64) -> Self {
        Self {
            settings,
            particles: Vec::new(),
            rng: SimpleRng::new(seed),
        }
    }

    pub fn settings(&self) -> &ParticleSettings {
        &self.settings
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Adds a particle at `(x, y)` unless the system is full.
    pub fn spawn(&mut self, x: f32, y: f32) -> bool {
        if self.particles.len() >= self.settings.max_particles {
            return false;
        }
        let color = match self.settings.palette.len() {
            0 => Rgba8::WHITE,
            n => self.settings.palette[self.rng.next_below(n)],
        };
        self.particles.push(Particle {
            x,
            y,
            vx: self.rng.next_centered() * 2.0,
            vy: self.rng.next_centered() * 2.0,
            life: self.settings.lifespan_ms,
            size: self.rng.next_f32() * 4.0 + 1.0,
            color,
        });
        true
    }

    /// Moves every particle by its velocity and drops the dead ones.
    pub fn tick(&mut self) {
        for particle in &mut self.particles {
            particle.x += particle.vx;
            particle.y += particle.vy;
            particle.life -= TICK_MS;
        }
        self.particles.retain(|particle| particle.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_respects_the_cap() {
        let settings = ParticleSettings {
            max_particles: 3,
            ..Default::default()
        };
        let mut system = ParticleSystem::new(settings, 5);
        for _ in 0..10 {
            system.spawn(0.0, 0.0);
        }
        assert_eq!(system.len(), 3);
    }

    #[test]
    fn spawned_particles_are_in_range() {
        let mut system = ParticleSystem::new(ParticleSettings::default(), 11);
        for _ in 0..100 {
            system.spawn(10.0, 20.0);
        }
        let palette = &system.settings().palette;
        for p in system.particles() {
            assert!((-1.0..1.0).contains(&p.vx) && (-1.0..1.0).contains(&p.vy));
            assert!((1.0..5.0).contains(&p.size));
            assert!(palette.contains(&p.color));
        }
    }

    #[test]
    fn particles_move_and_expire() {
        let settings = ParticleSettings {
            lifespan_ms: 50.0,
            ..Default::default()
        };
        let mut system = ParticleSystem::new(settings, 3);
        system.spawn(0.0, 0.0);
        let first = system.particles()[0].clone();

        system.tick();
        let moved = &system.particles()[0];
        assert_eq!(moved.x, first.x + first.vx);
        assert_eq!(moved.life, 50.0 - TICK_MS);

        system.tick();
        system.tick();
        assert!(system.is_empty());
    }
}
