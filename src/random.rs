use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

const MULTIPLIER_A: u64 = 1103515245;
const INCREMENT_C: u64 = 12345;
const MODULUS: u64 = i32::MAX as u64;
const DEFAULT_SEED: u64 = 3819201;

/// The single source of randomness used by the search.
///
/// Every random choice the engine makes (selection tie-breaks, the expanded
/// move, rollout moves and the final tie-break) is derived from
/// [`RandomSource::next_int`] modulo the number of candidates, so replacing the
/// source makes a whole search reproducible.
pub trait RandomSource {
    /// Returns the next non-negative integer.
    fn next_int(&mut self) -> u64;

    /// Returns an index in `0..len`. `len` must not be zero.
    fn pick_index(&mut self, len: usize) -> usize {
        (self.next_int() % len as u64) as usize
    }

    /// Returns a random element of `items`, or `None` if it is empty.
    fn choose<'a, K>(&mut self, items: &'a [K]) -> Option<&'a K> {
        if items.is_empty() {
            return None;
        }
        items.get(self.pick_index(items.len()))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_int(&mut self) -> u64 {
        (**self).next_int()
    }
}

/// Random source backed by [`StdRng`].
pub struct StandardRandomSource {
    rng: StdRng,
}

impl Default for StandardRandomSource {
    fn default() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl StandardRandomSource {
    /// A reproducible source for the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StandardRandomSource {
    fn next_int(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

/// Linear congruential generator. Deterministic and the same on every platform.
pub struct LcgRandomSource {
    seed: u64,
}

impl Default for LcgRandomSource {
    fn default() -> Self {
        LcgRandomSource::new(DEFAULT_SEED)
    }
}

impl LcgRandomSource {
    pub const fn new(seed: u64) -> Self {
        Self {
            seed: seed % MODULUS,
        }
    }
}

impl RandomSource for LcgRandomSource {
    fn next_int(&mut self) -> u64 {
        self.seed = (self.seed * MULTIPLIER_A + INCREMENT_C) % MODULUS;
        self.seed
    }
}

/// Replays a fixed sequence of integers, starting over when it runs out.
/// An empty script always yields 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandomSource {
    values: Vec<u64>,
    position: usize,
}

impl ScriptedRandomSource {
    pub fn new(values: impl Into<Vec<u64>>) -> Self {
        Self {
            values: values.into(),
            position: 0,
        }
    }

    /// A source that always yields `value`.
    pub fn constant(value: u64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandomSource {
    fn next_int(&mut self) -> u64 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position = (self.position + 1) % self.values.len();
        value
    }
}
