// Quadratic extension F[i]/(i^2 + 1)

use super::fp::{Fp, FpElt};
use super::traits::Field;

/// Element re + im * i of the extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fp2Elt<const W: usize> {
    pub re: FpElt<W>,
    pub im: FpElt<W>,
}

/// Degree-2 extension of a prime field with i^2 = -1. Requires the
/// base modulus to be 3 mod 4, so that -1 is a non-residue.
pub struct Fp2<'a, const W: usize> {
    base: &'a Fp<W>,
    k_i: Fp2Elt<W>,
}

impl<'a, const W: usize> Fp2<'a, W> {
    pub fn new(base: &'a Fp<W>) -> Self {
        assert!(
            base.modulus().limb[0] & 3 == 3,
            "base modulus must be 3 mod 4 for i^2 = -1"
        );
        let k_i = Fp2Elt {
            re: base.zero(),
            im: base.one(),
        };
        Self { base, k_i }
    }

    pub fn base_field(&self) -> &'a Fp<W> {
        self.base
    }

    /// The positive imaginary unit (0, 1).
    pub fn i(&self) -> Fp2Elt<W> {
        self.k_i
    }

    pub fn of_base(&self, re: FpElt<W>) -> Fp2Elt<W> {
        Fp2Elt {
            re,
            im: self.base.zero(),
        }
    }

    pub fn of_scalar(&self, x: u64) -> Fp2Elt<W> {
        self.of_base(self.base.of_scalar(x))
    }

    pub fn of_string(&self, re: &str, im: &str) -> Fp2Elt<W> {
        Fp2Elt {
            re: self.base.of_string(re),
            im: self.base.of_string(im),
        }
    }

    pub fn conj(&self, x: &mut Fp2Elt<W>) {
        self.base.neg(&mut x.im);
    }

    pub fn conjf(&self, mut x: Fp2Elt<W>) -> Fp2Elt<W> {
        self.conj(&mut x);
        x
    }
}

impl<const W: usize> Field for Fp2<'_, W> {
    type Elt = Fp2Elt<W>;

    fn zero(&self) -> Fp2Elt<W> {
        Fp2Elt {
            re: self.base.zero(),
            im: self.base.zero(),
        }
    }

    fn one(&self) -> Fp2Elt<W> {
        Fp2Elt {
            re: self.base.one(),
            im: self.base.zero(),
        }
    }

    fn two(&self) -> Fp2Elt<W> {
        Fp2Elt {
            re: self.base.two(),
            im: self.base.zero(),
        }
    }

    fn half(&self) -> Fp2Elt<W> {
        Fp2Elt {
            re: self.base.half(),
            im: self.base.zero(),
        }
    }

    fn add(&self, x: &mut Fp2Elt<W>, y: &Fp2Elt<W>) {
        self.base.add(&mut x.re, &y.re);
        self.base.add(&mut x.im, &y.im);
    }

    fn sub(&self, x: &mut Fp2Elt<W>, y: &Fp2Elt<W>) {
        self.base.sub(&mut x.re, &y.re);
        self.base.sub(&mut x.im, &y.im);
    }

    /// Karatsuba: three base multiplications.
    fn mul(&self, x: &mut Fp2Elt<W>, y: &Fp2Elt<W>) {
        let f = self.base;
        let p0 = f.mulf(x.re, &y.re);
        let p1 = f.mulf(x.im, &y.im);
        let a01 = f.addf(x.re, &x.im);
        let b01 = f.addf(y.re, &y.im);
        x.re = f.subf(p0, &p1);
        let mut t = f.mulf(a01, &b01);
        f.sub(&mut t, &p0);
        f.sub(&mut t, &p1);
        x.im = t;
    }

    fn neg(&self, x: &mut Fp2Elt<W>) {
        self.base.neg(&mut x.re);
        self.base.neg(&mut x.im);
    }

    /// conj(x) / (re^2 + im^2); the norm vanishes only at zero.
    fn invert(&self, x: &mut Fp2Elt<W>) {
        let f = self.base;
        let mut norm = f.mulf(x.re, &x.re);
        f.add(&mut norm, &f.mulf(x.im, &x.im));
        let ninv = f.invertf(norm);
        x.re = f.mulf(x.re, &ninv);
        x.im = f.negf(f.mulf(x.im, &ninv));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Fp<1> {
        // 2^61 - 1
        Fp::new("2305843009213693951")
    }

    #[test]
    fn test_i_squared() {
        let f0 = base();
        let f = Fp2::new(&f0);
        let ii = f.mulf(f.i(), &f.i());
        assert_eq!(ii, f.negf(f.one()));
    }

    #[test]
    fn test_mul_against_schoolbook() {
        let f0 = base();
        let f = Fp2::new(&f0);
        let a = Fp2Elt {
            re: f0.of_scalar(12345),
            im: f0.of_scalar(67890),
        };
        let b = Fp2Elt {
            re: f0.of_scalar(11111),
            im: f0.of_scalar(22222),
        };
        // (ac - bd, ad + bc)
        let want = Fp2Elt {
            re: f0.subf(f0.mulf(a.re, &b.re), &f0.mulf(a.im, &b.im)),
            im: f0.addf(f0.mulf(a.re, &b.im), &f0.mulf(a.im, &b.re)),
        };
        assert_eq!(f.mulf(a, &b), want);
    }

    #[test]
    fn test_inverse() {
        let f0 = base();
        let f = Fp2::new(&f0);
        let a = Fp2Elt {
            re: f0.of_scalar(987654321),
            im: f0.of_scalar(123456789),
        };
        assert_eq!(f.mulf(a, &f.invertf(a)), f.one());
    }

    #[test]
    fn test_conj_norm() {
        let f0 = base();
        let f = Fp2::new(&f0);
        let a = Fp2Elt {
            re: f0.of_scalar(31337),
            im: f0.of_scalar(271828),
        };
        let n = f.mulf(a, &f.conjf(a));
        assert_eq!(n.im, f0.zero());
    }
}
