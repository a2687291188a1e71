//! Discrete-time text animation. The render loop calls [`AnimationState::step`]
//! once per frame and draws the layer with the returned [`Pose`].
//!
//! Motion is expressed in scene units; one unit is roughly two font sizes.

use crate::layer::AnimationKind;
use crate::util::rng::SimpleRng;

/// Animation clock advance per second at speed 1.
pub const CLOCK_RATE: f32 = 0.96;
/// Radians per second for `Rotate`.
pub const ROTATE_RATE: f32 = 0.6;
pub const FLOAT_AMPLITUDE: f32 = 0.1;
pub const PULSE_AMPLITUDE: f32 = 0.05;
pub const WAVE_AMPLITUDE: f32 = 0.1;
/// Phase step between neighbouring characters in a wave.
pub const WAVE_PHASE: f32 = 0.5;
pub const BOUNCE_HEIGHT: f32 = 0.2;
pub const SPIRAL_RADIUS: f32 = 0.2;
/// Chance per 60Hz frame that a glitch starts.
pub const GLITCH_CHANCE: f32 = 0.05;
pub const GLITCH_JITTER: f32 = 0.1;
pub const GLITCH_HOLD_SECS: f32 = 0.05;

const FRAME_SECS: f32 = 1.0 / 60.0;

/// Offset of a layer from its rest position for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
    pub rot_x: f32,
    pub rot_y: f32,
    pub scale: f32,
    /// Vertical offset per character, empty unless the text waves
    pub char_lift: Vec<f32>,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            dz: 0.0,
            rot_x: 0.0,
            rot_y: 0.0,
            scale: 1.0,
            char_lift: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimationState {
    kind: AnimationKind,
    speed: f32,
    clock: f32,
    rotation: f32,
    glitch: Option<Glitch>,
    rng: SimpleRng,
}

#[derive(Debug, Clone, Copy)]
struct Glitch {
    dx: f32,
    dy: f32,
    remaining: f32,
}

impl AnimationState {
    pub fn new(kind: AnimationKind, seed: u64) -> Self {
        Self {
            kind,
            speed: 1.0,
            clock: 0.0,
            rotation: 0.0,
            glitch: None,
            rng: SimpleRng::new(seed),
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed.max(0.0);
        self
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    /// Switches animation, restarting from the rest pose.
    pub fn set_kind(&mut self, kind: AnimationKind) {
        if self.kind != kind {
            self.kind = kind;
            self.clock = 0.0;
            self.rotation = 0.0;
            self.glitch = None;
        }
    }

    /// Advances by `dt` seconds and returns the pose for a text of `chars` characters.
    pub fn step(&mut self, dt: f32, chars: usize) -> Pose {
        let dt = dt.max(0.0);
        self.clock += dt * CLOCK_RATE * self.speed;
        let t = self.clock;

        let mut pose = Pose::default();
        match self.kind {
            AnimationKind::None => {}
            AnimationKind::Rotate => {
                self.rotation += dt * ROTATE_RATE * self.speed;
                pose.rot_y = self.rotation;
            }
            AnimationKind::Float => pose.dy = t.sin() * FLOAT_AMPLITUDE,
            AnimationKind::Pulse => pose.scale = 1.0 + (t * 2.0).sin() * PULSE_AMPLITUDE,
            AnimationKind::Wave => {
                pose.char_lift = (0..chars)
                    .map(|i| (t * 2.0 + i as f32 * WAVE_PHASE).sin() * WAVE_AMPLITUDE)
                    .collect();
            }
            AnimationKind::Bounce => {
                let height = (t * 3.0).sin().abs();
                pose.dy = height * BOUNCE_HEIGHT;
                pose.rot_x = height * 0.1;
            }
            AnimationKind::Spiral => {
                pose.dx = t.cos() * SPIRAL_RADIUS;
                pose.dz = t.sin() * SPIRAL_RADIUS;
                pose.rot_y = t;
            }
            AnimationKind::Glitch => self.step_glitch(dt, &mut pose),
        }
        pose
    }

    fn step_glitch(&mut self, dt: f32, pose: &mut Pose) {
        if let Some(glitch) = &mut self.glitch {
            glitch.remaining -= dt;
            if glitch.remaining <= 0.0 {
                self.glitch = None;
            }
        }
        if self.glitch.is_none() {
            // Scale the per-frame chance to the elapsed frames
            let frames = (dt / FRAME_SECS).max(0.0);
            let chance = 1.0 - (1.0 - GLITCH_CHANCE).powf(frames);
            if self.rng.next_f32() < chance {
                self.glitch = Some(Glitch {
                    dx: self.rng.next_centered() * GLITCH_JITTER,
                    dy: self.rng.next_centered() * GLITCH_JITTER,
                    remaining: GLITCH_HOLD_SECS,
                });
            }
        }
        if let Some(glitch) = self.glitch {
            pose.dx = glitch.dx;
            pose.dy = glitch.dy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn none_stays_at_rest() {
        let mut state = AnimationState::new(AnimationKind::None, 1);
        for _ in 0..10 {
            assert_eq!(state.step(FRAME_SECS, 3), Pose::default());
        }
    }

    #[test]
    fn rotate_accumulates() {
        let mut state = AnimationState::new(AnimationKind::Rotate, 1);
        let mut pose = Pose::default();
        for _ in 0..60 {
            pose = state.step(FRAME_SECS, 0);
        }
        assert_relative_eq!(pose.rot_y, ROTATE_RATE, epsilon = 1e-4);
    }

    #[test]
    fn float_and_pulse_stay_within_amplitude() {
        for kind in [AnimationKind::Float, AnimationKind::Pulse, AnimationKind::Bounce] {
            let mut state = AnimationState::new(kind, 1);
            for _ in 0..600 {
                let pose = state.step(FRAME_SECS, 0);
                assert!(pose.dy.abs() <= BOUNCE_HEIGHT + 1e-6);
                assert!((pose.scale - 1.0).abs() <= PULSE_AMPLITUDE + 1e-6);
            }
        }
    }

    #[test]
    fn wave_lifts_each_character() {
        let mut state = AnimationState::new(AnimationKind::Wave, 1);
        let pose = state.step(0.5, 4);
        assert_eq!(pose.char_lift.len(), 4);
        assert_ne!(pose.char_lift[0], pose.char_lift[1]);
        assert!(pose.char_lift.iter().all(|lift| lift.abs() <= WAVE_AMPLITUDE));
    }

    #[test]
    fn spiral_keeps_its_radius() {
        let mut state = AnimationState::new(AnimationKind::Spiral, 1);
        let pose = state.step(1.3, 0);
        assert_relative_eq!((pose.dx * pose.dx + pose.dz * pose.dz).sqrt(), SPIRAL_RADIUS, epsilon = 1e-5);
    }

    #[test]
    fn glitch_jitters_briefly() {
        let mut state = AnimationState::new(AnimationKind::Glitch, 9);
        let mut jittered = 0;
        for _ in 0..2000 {
            let pose = state.step(FRAME_SECS, 0);
            assert!(pose.dx.abs() <= GLITCH_JITTER / 2.0 && pose.dy.abs() <= GLITCH_JITTER / 2.0);
            if pose.dx != 0.0 || pose.dy != 0.0 {
                jittered += 1;
            }
        }
        assert!(jittered > 0);
        assert!(jittered < 1000);
    }

    #[test]
    fn switching_kind_resets_the_clock() {
        let mut state = AnimationState::new(AnimationKind::Rotate, 1);
        state.step(1.0, 0);
        state.set_kind(AnimationKind::Float);
        let pose = state.step(0.0, 0);
        assert_eq!(pose.dy, 0.0);
        assert_eq!(pose.rot_y, 0.0);
    }
}
