use rand::rngs::{StdRng, ThreadRng};
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub trait RandomSource {
    /// Uniform draw from `[0, bound)`. A `bound` of 0 or 1 yields 0.
    fn next_int(&mut self, bound: usize) -> usize;

    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.next_int(i + 1);
            items.swap(i, j);
        }
    }
}

/// Seeded mulberry32 generator; identical seeds replay identical rounds.
#[derive(Clone, Debug)]
pub struct Rng {
    seed: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn next_f64(&mut self) -> f64 {
        self.seed = self.seed.wrapping_add(0x6d2b79f5);
        let mut t = self.seed;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        let out = t ^ (t >> 14);
        out as f64 / 4_294_967_296.0
    }

    pub fn int(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        min + self.pick_index(max - min + 1)
    }

    pub fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        ((self.next_f64() * len as f64).floor() as usize).min(len - 1)
    }
}

impl RandomSource for Rng {
    fn next_int(&mut self, bound: usize) -> usize {
        self.pick_index(bound)
    }
}

/// Adapter exposing any `rand` generator as a [`RandomSource`].
#[derive(Clone, Debug)]
pub struct SystemRandom<R = ThreadRng> {
    inner: R,
}

impl SystemRandom<ThreadRng> {
    pub fn new() -> Self {
        Self { inner: rand::rng() }
    }
}

impl Default for SystemRandom<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemRandom<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: rand::Rng> RandomSource for SystemRandom<R> {
    fn next_int(&mut self, bound: usize) -> usize {
        if bound <= 1 {
            return 0;
        }
        self.inner.random_range(0..bound)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
