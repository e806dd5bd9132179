// Root-of-unity rerooting and power tables

use crate::field::Field;

/// Adjusts a root of declared order down to a transform of length `n`:
/// returns `omega^(omega_order / n)`, a primitive n-th root.
pub fn reroot<F: Field>(omega: &F::Elt, omega_order: u64, n: usize, f: &F) -> F::Elt {
    assert!(n.is_power_of_two(), "transform length must be a power of two");
    assert!(
        omega_order % n as u64 == 0,
        "root order not divisible by transform length"
    );
    f.powf(omega, omega_order / n as u64)
}

/// Precomputed powers w[j] = omega_n^j, enough for every twiddle a
/// length-n transform consumes (indices stay below n/2).
pub struct Twiddle<F: Field> {
    pub w: Vec<F::Elt>,
}

impl<F: Field> Twiddle<F> {
    pub fn new(n: usize, omega_n: &F::Elt, f: &F) -> Self {
        let len = std::cmp::max(1, n / 2);
        let mut w = Vec::with_capacity(len);
        let mut cur = f.one();
        for _ in 0..len {
            w.push(cur);
            f.mul(&mut cur, omega_n);
        }
        Self { w }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crt::{OMEGA_17, OMEGA_ORDER, PRIMES_17};
    use crate::field::{Fp, Nat};

    #[test]
    fn test_reroot_order() {
        let f = Fp::<1>::from_modulus(Nat::from_u64(PRIMES_17[0]));
        let omega = f.of_scalar(OMEGA_17[0]);
        let w16 = reroot(&omega, OMEGA_ORDER, 16, &f);
        assert_eq!(f.powf(&w16, 16), f.one());
        assert_ne!(f.powf(&w16, 8), f.one());
    }

    #[test]
    fn test_twiddle_powers() {
        let f = Fp::<1>::from_modulus(Nat::from_u64(PRIMES_17[1]));
        let omega = f.of_scalar(OMEGA_17[1]);
        let wn = reroot(&omega, OMEGA_ORDER, 32, &f);
        let roots = Twiddle::new(32, &wn, &f);
        assert_eq!(roots.w.len(), 16);
        assert_eq!(roots.w[0], f.one());
        for j in 1..16 {
            assert_eq!(roots.w[j], f.powf(&wn, j as u64));
        }
    }
}
