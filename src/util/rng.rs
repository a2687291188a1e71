/// Small deterministic generator for noise, particles and glitch jitter.
///
/// MINSTD linear congruential parameters; good enough for visual effects and
/// reproducible from a seed in tests.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

const MODULUS: u64 = 2_147_483_647;

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        // Zero is a fixed point of the recurrence
        let state = seed % MODULUS;
        SimpleRng {
            state: if state == 0 { 1 } else { state },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(48271) % MODULUS;
        self.state as u32
    }

    /// Uniform in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        let v = ((self.next_u32() as f64 - 1.0) / (MODULUS - 1) as f64) as f32;
        // The f32 cast can round the top of the range up to 1.0
        v.min(1.0 - f32::EPSILON)
    }

    /// Uniform in [-0.5, 0.5).
    pub fn next_centered(&mut self) -> f32 {
        self.next_f32() - 0.5
    }

    /// Uniform integer in `0..bound`; `bound` must be non-zero.
    pub fn next_below(&mut self, bound: usize) -> usize {
        ((self.next_f32() * bound as f32) as usize).min(bound - 1)
    }
}
