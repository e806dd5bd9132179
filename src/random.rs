// Deterministic field element sampling for tests and benches

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::field::{Field, Fp, Fp2, Fp2Elt, FpElt, Nat};

/// Seeded element generator. Draws are uniform below the modulus by
/// rejection on the raw limbs.
pub struct EltRng {
    rng: ChaCha20Rng,
}

impl EltRng {
    pub fn new(seed: u64) -> Self {
        let mut s = [0u8; 32];
        s[..8].copy_from_slice(&seed.to_le_bytes());
        Self {
            rng: ChaCha20Rng::from_seed(s),
        }
    }

    pub fn next_fp<const W: usize>(&mut self, f: &Fp<W>) -> FpElt<W> {
        loop {
            let mut n = Nat::<W>::zero();
            for l in n.limb.iter_mut() {
                *l = self.rng.gen();
            }
            if n < *f.modulus() {
                return f.to_montgomery(&n);
            }
        }
    }

    pub fn next_nonzero_fp<const W: usize>(&mut self, f: &Fp<W>) -> FpElt<W> {
        loop {
            let e = self.next_fp(f);
            if e != f.zero() {
                return e;
            }
        }
    }

    pub fn next_fp2<const W: usize>(&mut self, c: &Fp2<W>) -> Fp2Elt<W> {
        Fp2Elt {
            re: self.next_fp(c.base_field()),
            im: self.next_fp(c.base_field()),
        }
    }
}
