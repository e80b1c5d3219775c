use rand::prelude::{SeedableRng, StdRng};

/// Deterministic generator for tables that must be identical across runs, such as Zobrist
/// constants.
pub fn create_rng_from_seed(seed: u64) -> StdRng {
    let mut bytes = [0; 32];
    for (i, chunk) in bytes.chunks_mut(8).enumerate() {
        let word = seed.wrapping_add(i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        chunk.clone_from_slice(&word.to_le_bytes());
    }

    let seedable_rng: StdRng = SeedableRng::from_seed(bytes);

    seedable_rng
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = create_rng_from_seed(1234);
        let mut b = create_rng_from_seed(1234);

        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_different_seed_different_sequence() {
        let mut a = create_rng_from_seed(1234);
        let mut b = create_rng_from_seed(1235);

        assert_ne!(a.next_u64(), b.next_u64());
    }
}
