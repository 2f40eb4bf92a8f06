use crate::{Float, ONE_MINUS_EPSILON};

const PCG32_DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
const PCG32_DEFAULT_STREAM: u64 = 0xda3e39cb94b95bdb;
const PCG32_MULT: u64 = 0x5851f42d4c957f2d;

/// PCG32 generator; deterministic per sequence index.
#[derive(Copy, Clone)]
pub struct RNG {
    state: u64,
    inc: u64,
}

impl RNG {
    pub fn new(sequence_index: u64) -> Self {
        let mut rng = RNG::default();
        rng.set_sequence(sequence_index);
        rng
    }

    pub fn set_sequence(&mut self, sequence_index: u64) {
        self.state = 0;
        self.inc = sequence_index << 1 | 1;
        self.uniform_u32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_u32();
    }

    pub fn uniform_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xor_shifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xor_shifted.rotate_right(rot)
    }

    pub fn uniform_u32_bounded(&mut self, b: u32) -> u32 {
        let threshold = b.wrapping_neg() % b;
        loop {
            let r = self.uniform_u32();
            if r >= threshold {
                return r % b;
            }
        }
    }

    pub fn uniform_float(&mut self) -> Float {
        ONE_MINUS_EPSILON.min(self.uniform_u32() as Float * 2.3283064365386963e-10)
    }

    /// Uniform sample in `[low, high)`.
    pub fn uniform_range(&mut self, low: Float, high: Float) -> Float {
        low + (high - low) * self.uniform_float()
    }

    pub fn shuffle<T>(&mut self, t: &mut [T]) {
        for i in (1..t.len()).rev() {
            t.swap(i, self.uniform_u32_bounded(i as u32 + 1) as usize)
        }
    }
}

impl Default for RNG {
    fn default() -> Self {
        Self {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}
