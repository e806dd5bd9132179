// Field abstraction shared by the prime fields, the quadratic
// extension and the CRT engine

use std::fmt::Debug;

/// Capability set required of a coefficient field.
///
/// Methods live on the field value rather than on elements because the
/// CRT basis instantiates many fields of the same type with different
/// runtime moduli. Elements are plain data; equality is bitwise.
pub trait Field {
    type Elt: Clone + Copy + Debug + PartialEq + Eq;

    fn zero(&self) -> Self::Elt;
    fn one(&self) -> Self::Elt;
    fn two(&self) -> Self::Elt;
    /// Multiplicative inverse of two.
    fn half(&self) -> Self::Elt;

    /// x += y
    fn add(&self, x: &mut Self::Elt, y: &Self::Elt);
    /// x -= y
    fn sub(&self, x: &mut Self::Elt, y: &Self::Elt);
    /// x *= y
    fn mul(&self, x: &mut Self::Elt, y: &Self::Elt);
    /// x = -x
    fn neg(&self, x: &mut Self::Elt);
    /// x = 1/x; fails on a non-invertible element.
    fn invert(&self, x: &mut Self::Elt);

    fn addf(&self, mut x: Self::Elt, y: &Self::Elt) -> Self::Elt {
        self.add(&mut x, y);
        x
    }

    fn subf(&self, mut x: Self::Elt, y: &Self::Elt) -> Self::Elt {
        self.sub(&mut x, y);
        x
    }

    fn mulf(&self, mut x: Self::Elt, y: &Self::Elt) -> Self::Elt {
        self.mul(&mut x, y);
        x
    }

    fn negf(&self, mut x: Self::Elt) -> Self::Elt {
        self.neg(&mut x);
        x
    }

    fn invertf(&self, mut x: Self::Elt) -> Self::Elt {
        self.invert(&mut x);
        x
    }

    /// x^e by square and multiply.
    fn powf(&self, x: &Self::Elt, e: u64) -> Self::Elt {
        let mut result = self.one();
        let mut base = *x;
        let mut e = e;
        while e > 0 {
            if e & 1 == 1 {
                self.mul(&mut result, &base);
            }
            let t = base;
            self.mul(&mut base, &t);
            e >>= 1;
        }
        result
    }
}
