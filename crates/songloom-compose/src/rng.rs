//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! Every random decision in composition flows through a single `&mut R`
//! passed down the call chain, so a fixed seed reproduces a song exactly.
//! Independent stages (such as sample kit selection) get their own stream via
//! [`derive_component_seed`] so they never perturb the composition stream.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Draws a fresh seed from the operating system.
pub fn entropy_seed() -> u32 {
    rand::thread_rng().gen()
}

/// Derives a seed for a named component from the base seed.
///
/// Uses BLAKE3 over the little-endian base seed followed by the UTF-8 key and
/// keeps the first four bytes of the hash.
pub fn derive_component_seed(base_seed: u32, key: &str) -> u32 {
    let mut input = Vec::with_capacity(4 + key.len());
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(key.as_bytes());

    let hash = blake3::hash(&input);
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Creates an RNG for a named component.
pub fn create_component_rng(base_seed: u32, key: &str) -> Pcg32 {
    create_rng(derive_component_seed(base_seed, key))
}

/// One Bernoulli draw. `p <= 0` never fires and `p >= 1` always fires; the
/// draw is consumed either way so stream positions do not depend on `p`.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    let draw: f64 = rng.gen();
    draw < p
}

/// Picks one element uniformly, `None` for an empty slice.
pub fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        Some(&items[rng.gen_range(0..items.len())])
    }
}
