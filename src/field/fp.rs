// Montgomery-form prime field with a runtime modulus
// One type covers the 64-bit CRT base primes (W = 1) and the wide
// ambient fields: W = 4 for 256-bit moduli, 6 for 384, 9 for 521.

use std::fmt;

use num_bigint::BigUint;
use num_traits::One;

use super::nat::{inv_mod_b, Nat};
use super::traits::Field;

/// Element of `Fp<W>`, held in Montgomery form (value * 2^{64W} mod m).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FpElt<const W: usize> {
    pub(crate) n: Nat<W>,
}

impl<const W: usize> fmt::Debug for FpElt<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FpElt({:#x?})", self.limbs())
    }
}

impl<const W: usize> FpElt<W> {
    /// Raw Montgomery-form limbs.
    pub fn limbs(&self) -> [u64; W] {
        self.n.limb
    }
}

/// Per-limb scale table for reducing `WIDE`-limb naturals modulo a
/// single-limb prime: entry i is 2^{64(i+2)} mod p, so that one
/// Montgomery multiply folds limb i into a Montgomery-form residue.
#[derive(Clone, Copy)]
pub struct ReduceScale<const WIDE: usize> {
    s: [FpElt<1>; WIDE],
}

/// Prime field of `W` 64-bit limbs. The modulus is a runtime value;
/// all per-element operations are pure limb arithmetic.
#[derive(Clone, Debug)]
pub struct Fp<const W: usize> {
    m: Nat<W>,
    mprime: u64, // -m^{-1} mod 2^64
    rsquare: Nat<W>,
    m_minus_2: Nat<W>, // Fermat exponent for inversion
    k_zero: FpElt<W>,
    k_one: FpElt<W>,
    k_two: FpElt<W>,
    k_half: FpElt<W>,
}

impl<const W: usize> Fp<W> {
    /// Field of the given odd prime modulus, in decimal or 0x-hex.
    pub fn new(modulus: &str) -> Self {
        Self::from_modulus(Nat::of_string(modulus))
    }

    pub fn from_modulus(m: Nat<W>) -> Self {
        assert!(!m.is_zero(), "zero modulus");
        assert!(m.limb[0] & 1 == 1, "modulus must be odd");

        // Montgomery constants are computed once here; everything on
        // the per-element paths below sticks to limb arithmetic.
        let mb = m.to_biguint();
        let r = BigUint::one() << (64 * W);
        let mont = |x: BigUint| FpElt {
            n: Nat::from_biguint(&((x << (64 * W)) % &mb)),
        };
        let rsquare = Nat::from_biguint(&((&r * &r) % &mb));
        let k_zero = FpElt { n: Nat::zero() };
        let k_one = mont(BigUint::one());
        let k_two = mont(BigUint::from(2u32));
        let k_half = mont((&mb + 1u32) >> 1);

        let mut m_minus_2 = m;
        m_minus_2.sub_with_borrow(&Nat::from_u64(2));

        Self {
            m,
            mprime: inv_mod_b(m.limb[0]).wrapping_neg(),
            rsquare,
            m_minus_2,
            k_zero,
            k_one,
            k_two,
            k_half,
        }
    }

    pub fn modulus(&self) -> &Nat<W> {
        &self.m
    }

    /// CIOS Montgomery product a * b * 2^{-64W} mod m. Accepts any
    /// a < 2^{64W}; the result is canonical.
    fn mont_mul(&self, a: &Nat<W>, b: &Nat<W>) -> Nat<W> {
        let mut t = [0u64; W];
        let mut t_hi = 0u64;
        for i in 0..W {
            let ai = a.limb[i];
            let mut carry = 0u64;
            for j in 0..W {
                let s = t[j] as u128 + ai as u128 * b.limb[j] as u128 + carry as u128;
                t[j] = s as u64;
                carry = (s >> 64) as u64;
            }
            let s = t_hi as u128 + carry as u128;
            t_hi = s as u64;
            let t_top = (s >> 64) as u64;

            let u = t[0].wrapping_mul(self.mprime);
            let s = t[0] as u128 + u as u128 * self.m.limb[0] as u128;
            let mut carry = (s >> 64) as u64;
            for j in 1..W {
                let s = t[j] as u128 + u as u128 * self.m.limb[j] as u128 + carry as u128;
                t[j - 1] = s as u64;
                carry = (s >> 64) as u64;
            }
            let s = t_hi as u128 + carry as u128;
            t[W - 1] = s as u64;
            t_hi = t_top + (s >> 64) as u64;
        }
        let mut r = Nat::new(t);
        if t_hi != 0 || r >= self.m {
            r.sub_with_borrow(&self.m);
        }
        r
    }

    fn pow_nat(&self, x: &FpElt<W>, e: &Nat<W>) -> FpElt<W> {
        let mut acc = self.k_one;
        for i in (0..64 * W).rev() {
            let t = acc;
            self.mul(&mut acc, &t);
            if e.bit(i) == 1 {
                self.mul(&mut acc, x);
            }
        }
        acc
    }

    pub fn to_montgomery(&self, n: &Nat<W>) -> FpElt<W> {
        FpElt {
            n: self.mont_mul(n, &self.rsquare),
        }
    }

    /// Canonical natural value of an element, in [0, m).
    pub fn from_montgomery(&self, e: &FpElt<W>) -> Nat<W> {
        self.mont_mul(&e.n, &Nat::from_u64(1))
    }

    pub fn of_scalar(&self, x: u64) -> FpElt<W> {
        self.to_montgomery(&Nat::from_u64(x))
    }

    pub fn of_string(&self, s: &str) -> FpElt<W> {
        self.to_montgomery(&Nat::of_string(s))
    }

    /// Prepares a Montgomery element for `dot`: one more Montgomery
    /// scaling, so a natural word folds straight into Montgomery form.
    pub fn prescale_for_dot(&self, g: &FpElt<W>) -> FpElt<W> {
        FpElt {
            n: self.mont_mul(&g.n, &self.rsquare),
        }
    }

    /// Fused accumulation sum_i v[i] * g[i] of natural-form words
    /// against pre-scaled elements, reduced into this field.
    pub fn dot(&self, v: &[Nat<1>], g: &[FpElt<W>]) -> FpElt<W> {
        assert_eq!(v.len(), g.len());
        let mut acc = self.k_zero;
        for (vi, gi) in v.iter().zip(g.iter()) {
            let term = FpElt {
                n: self.mont_mul(&Nat::from_u64(vi.limb[0]), &gi.n),
            };
            self.add(&mut acc, &term);
        }
        acc
    }
}

// Single-limb specializations: wide-natural reduction and the
// natural-form helpers of the Garner inner loop. The latter
// deliberately break the Montgomery abstraction: the subtrahend is a
// natural in [0, p), the multiplier is Montgomery, and the product
// lands back in natural form, saving a conversion on every step.
impl Fp<1> {
    /// Scale table sized for reducing `WIDE`-limb naturals mod this
    /// single-limb prime.
    pub fn reduce_scale<const WIDE: usize>(&self) -> ReduceScale<WIDE> {
        let mut s = [FpElt { n: Nat::zero() }; WIDE];
        // 2^{128} mod p, advanced by one limb per entry.
        let mut cur = self.rsquare;
        for si in s.iter_mut() {
            *si = FpElt { n: cur };
            cur = self.mont_mul(&cur, &self.rsquare);
        }
        ReduceScale { s }
    }

    /// Reduces a `WIDE`-limb natural modulo this single-limb prime,
    /// returning a Montgomery-form residue.
    pub fn reduce<const WIDE: usize>(
        &self,
        n: &Nat<WIDE>,
        scale: &ReduceScale<WIDE>,
    ) -> FpElt<1> {
        let mut acc = self.k_zero;
        for i in 0..WIDE {
            let term = FpElt {
                n: self.mont_mul(&Nat::from_u64(n.limb[i]), &scale.s[i].n),
            };
            self.add(&mut acc, &term);
        }
        acc
    }

    /// (x - y) mod p on naturals; y must already be below p.
    pub fn sub_nat(&self, x: &mut Nat<1>, y: &Nat<1>) {
        debug_assert!(*y < self.m);
        if x.sub_with_borrow(y) != 0 {
            x.add_with_carry(&self.m);
        }
    }

    /// x *= c with x natural and c Montgomery; x stays natural.
    pub fn mul_nat_mont(&self, x: &mut Nat<1>, c: &FpElt<1>) {
        *x = self.mont_mul(x, &c.n);
    }
}

impl<const W: usize> Field for Fp<W> {
    type Elt = FpElt<W>;

    fn zero(&self) -> FpElt<W> {
        self.k_zero
    }

    fn one(&self) -> FpElt<W> {
        self.k_one
    }

    fn two(&self) -> FpElt<W> {
        self.k_two
    }

    fn half(&self) -> FpElt<W> {
        self.k_half
    }

    fn add(&self, x: &mut FpElt<W>, y: &FpElt<W>) {
        let carry = x.n.add_with_carry(&y.n);
        if carry != 0 || x.n >= self.m {
            x.n.sub_with_borrow(&self.m);
        }
    }

    fn sub(&self, x: &mut FpElt<W>, y: &FpElt<W>) {
        if x.n.sub_with_borrow(&y.n) != 0 {
            x.n.add_with_carry(&self.m);
        }
    }

    fn mul(&self, x: &mut FpElt<W>, y: &FpElt<W>) {
        x.n = self.mont_mul(&x.n, &y.n);
    }

    fn neg(&self, x: &mut FpElt<W>) {
        if !x.n.is_zero() {
            let mut t = self.m;
            t.sub_with_borrow(&x.n);
            x.n = t;
        }
    }

    fn invert(&self, x: &mut FpElt<W>) {
        assert!(!x.n.is_zero(), "non-invertible element");
        *x = self.pow_nat(x, &self.m_minus_2);
    }
}
