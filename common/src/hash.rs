use rand::RngCore;
use std::fmt;
use std::ops::{BitXor, BitXorAssign};

/// A 128 bit hash made of two independent 64 bit halves.
#[derive(Hash, Eq, PartialEq, Clone, Copy, Default)]
pub struct Hash128 {
    pub hash0: u64,
    pub hash1: u64,
}

impl Hash128 {
    pub const fn new(hash0: u64, hash1: u64) -> Self {
        Self { hash0, hash1 }
    }

    pub fn random(rng: &mut impl RngCore) -> Self {
        let hash0 = rng.next_u64();
        let hash1 = rng.next_u64();

        Self { hash0, hash1 }
    }
}

impl BitXor for Hash128 {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self {
            hash0: self.hash0 ^ rhs.hash0,
            hash1: self.hash1 ^ rhs.hash1,
        }
    }
}

impl BitXorAssign for Hash128 {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.hash0 ^= rhs.hash0;
        self.hash1 ^= rhs.hash1;
    }
}

impl fmt::Display for Hash128 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:016X}{:016X}", self.hash1, self.hash0)
    }
}

impl fmt::Debug for Hash128 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Finalizer of MurmurHash3, a bijective avalanche over 64 bits.
pub fn murmur_mix(x: u64) -> u64 {
    let mut x = x;
    x ^= x >> 33;
    x = x.wrapping_mul(0xff51_afd7_ed55_8ccd);
    x ^= x >> 33;
    x = x.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    x ^= x >> 33;
    x
}

pub fn basic_lcong(x: u64) -> u64 {
    x.wrapping_mul(2_862_933_555_777_941_757)
        .wrapping_add(3_037_000_493)
}

pub fn basic_lcong2(x: u64) -> u64 {
    x.wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407)
}
