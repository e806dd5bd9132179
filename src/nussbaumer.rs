// Negacyclic, linear and middle-product convolutions using only field
// arithmetic (Knuth TAOCP 4.6.4, exercise 59). No root of unity is
// needed in the coefficient field: the outer FFT works in
// F[t]/(t^r + 1), where t is a principal 2r-th root of unity and
// multiplying by a power of t is a rotation with sign flips.
//
// The layering keeps workspace allocation at the entry points:
// negacyclic() allocates, negacyclic_with_workspace() lifts the
// problem into an m x r matrix of polynomials, negacyclic_lifted()
// runs the polynomial FFT and recurses on the slots.

use crate::field::Field;

const NUSSBAUMER_SMALL: usize = 64;
const KARATSUBA_SMALL: usize = 4;

/// z = x * y mod (t^n + 1); n = x.len(), a power of two.
pub fn negacyclic<F: Field>(z: &mut [F::Elt], x: &[F::Elt], y: &[F::Elt], f: &F) {
    let n = x.len();
    assert!(n.is_power_of_two(), "length must be a power of two");
    assert_eq!(y.len(), n);
    assert_eq!(z.len(), n);
    if n <= NUSSBAUMER_SMALL {
        karatsuba_negacyclic(n, z, x, y, f);
    } else {
        let mut zz = vec![f.zero(); 2 * n];
        let mut xx = vec![f.zero(); 2 * n];
        let mut yy = vec![f.zero(); 2 * n];
        negacyclic_with_workspace(n, z, x, y, &mut zz, &mut xx, &mut yy, f);
    }
}

/// z = x * y as polynomials; z.len() = 2n (the top coefficient is
/// zero, kept for uniformity).
pub fn linear<F: Field>(z: &mut [F::Elt], x: &[F::Elt], y: &[F::Elt], f: &F) {
    let n = x.len();
    assert!(n.is_power_of_two(), "length must be a power of two");
    assert_eq!(y.len(), n);
    assert_eq!(z.len(), 2 * n);
    if n <= NUSSBAUMER_SMALL {
        karatsuba(n, z, x, y, f);
    } else {
        // One workspace pool serves both the cyclic and the
        // negacyclic half.
        let mut xx = vec![f.zero(); 2 * n];
        let mut yy = vec![f.zero(); 2 * n];
        let mut zz = vec![f.zero(); 2 * n];

        xx[..n].copy_from_slice(x);
        yy[..n].copy_from_slice(y);
        {
            let (xd, xw) = xx.split_at_mut(n);
            let (yd, yw) = yy.split_at_mut(n);
            cyclic_with_workspace(n, &mut z[..n], xd, yd, &mut zz[n..], xw, yw, f);
        }

        negacyclic_with_workspace(n, &mut z[n..], x, y, &mut xx, &mut yy, &mut zz, f);

        for i in 0..n {
            inverse_butterfly(z, i, n + i, f);
        }
    }
}

/// Middle product z[k] = sum_j x[n + k - j] * y[j]; x.len() = 2n.
/// For fixed y, linear() is a linear map from x to z and middle()
/// computes its transpose.
pub fn middle<F: Field>(z: &mut [F::Elt], x: &[F::Elt], y: &[F::Elt], f: &F) {
    let n = y.len();
    assert!(n.is_power_of_two(), "length must be a power of two");
    assert_eq!(x.len(), 2 * n);
    assert_eq!(z.len(), n);
    if n <= NUSSBAUMER_SMALL {
        basecase_middle(n, z, x, y, f);
    } else {
        let mut xx = vec![f.zero(); 2 * n];
        let mut yy = vec![f.zero(); 2 * n];
        let mut zz = vec![f.zero(); 2 * n];

        for i in 0..n {
            // copy y because cyclic destroys its inputs
            xx[i] = f.addf(x[i], &x[i + n]);
            yy[i] = y[i];
        }
        {
            let (xd, xw) = xx.split_at_mut(n);
            let (yd, yw) = yy.split_at_mut(n);
            cyclic_with_workspace(n, z, xd, yd, &mut zz[n..], xw, yw, f);
        }

        let (m, r) = choose_radix(n);

        // combined half-butterfly and lift of x
        for i in 0..m {
            for j in 0..r {
                xx[r * i + j] = f.subf(x[m * j + i], &x[m * j + i + n]);
            }
        }

        lift(&mut yy, y, m, r);
        negacyclic_lifted(m, r, &mut zz, &mut xx, &mut yy, f);

        // combined inverse half-butterfly and unlift of z
        for i in 0..m {
            for j in 0..r {
                let t = zz[r * i + j];
                f.sub(&mut z[m * j + i], &t);
                f.mul(&mut z[m * j + i], &f.half());
            }
        }
    }
}

fn butterfly<F: Field>(a: &mut [F::Elt], i0: usize, i1: usize, f: &F) {
    let t = a[i1];
    a[i1] = a[i0];
    f.add(&mut a[i0], &t);
    f.sub(&mut a[i1], &t);
}

fn inverse_butterfly<F: Field>(a: &mut [F::Elt], i0: usize, i1: usize, f: &F) {
    let t = a[i1];
    a[i1] = a[i0];
    f.add(&mut a[i0], &t);
    f.mul(&mut a[i0], &f.half());
    f.sub(&mut a[i1], &t);
    f.mul(&mut a[i1], &f.half());
}

fn negate<F: Field>(xs: &mut [F::Elt], f: &F) {
    for e in xs.iter_mut() {
        f.neg(e);
    }
}

fn negacyclic_with_workspace<F: Field>(
    n: usize,
    z: &mut [F::Elt],
    x: &[F::Elt],
    y: &[F::Elt],
    zz: &mut [F::Elt],
    xx: &mut [F::Elt],
    yy: &mut [F::Elt],
    f: &F,
) {
    let (m, r) = choose_radix(n);
    lift(xx, x, m, r);
    lift(yy, y, m, r);
    negacyclic_lifted(m, r, zz, xx, yy, f);
    unlift(zz, z, m, r);
}

fn negacyclic_lifted<F: Field>(
    m: usize,
    r: usize,
    zz: &mut [F::Elt],
    xx: &mut [F::Elt],
    yy: &mut [F::Elt],
    f: &F,
) {
    zerolift(xx, m, r, f);
    fft(xx, 2 * m, r, f);

    zerolift(yy, m, r, f);
    fft(yy, 2 * m, r, f);

    for i in 0..2 * m {
        negacyclic(
            &mut zz[i * r..(i + 1) * r],
            &xx[i * r..(i + 1) * r],
            &yy[i * r..(i + 1) * r],
            f,
        );
    }

    ifft(zz, 2 * m, r, f);

    // fold back down with t^r = -1
    for i in 0..m {
        let t = zz[r * (m + i) + (r - 1)];
        f.sub(&mut zz[r * i], &t);
        for j in 1..r {
            let t = zz[r * (m + i) + (j - 1)];
            f.add(&mut zz[r * i + j], &t);
        }
    }
}

/// Cyclic convolution by halving with butterflies until the basecase.
/// Destroys x and y; zz, xx, yy are workspace for the negacyclic
/// halves (each needs 2k entries at size k <= n/2).
fn cyclic_with_workspace<F: Field>(
    n: usize,
    z: &mut [F::Elt],
    x: &mut [F::Elt],
    y: &mut [F::Elt],
    zz: &mut [F::Elt],
    xx: &mut [F::Elt],
    yy: &mut [F::Elt],
    f: &F,
) {
    let mut m = n;
    while m > KARATSUBA_SMALL {
        m /= 2;
        for k in 0..m {
            butterfly(x, k, m + k, f);
            butterfly(y, k, m + k, f);
        }
        negacyclic_with_workspace(
            m,
            &mut z[m..2 * m],
            &x[m..2 * m],
            &y[m..2 * m],
            &mut zz[..2 * m],
            &mut xx[..2 * m],
            &mut yy[..2 * m],
            f,
        );
    }
    basecase_cyclic(m, z, x, y, f);
    while m < n {
        for k in 0..m {
            inverse_butterfly(z, k, m + k, f);
        }
        m *= 2;
    }
}

/// Length-m2 FFT whose scalars are length-r polynomials: butterflies
/// are vector adds, twiddles are rotations with negated wraparound.
fn fft<F: Field>(xx: &mut [F::Elt], m2: usize, r: usize, f: &F) {
    let mut j = m2 / 2;
    while j >= 1 {
        for s in (0..m2).step_by(2 * j) {
            for t in 0..j {
                let shift = (r / j) * t;
                for l in 0..r {
                    butterfly(xx, r * (s + t) + l, r * (s + t + j) + l, f);
                }
                let hi = &mut xx[r * (s + t + j)..r * (s + t + j) + r];
                negate(&mut hi[..shift], f);
                hi.rotate_left(shift);
            }
        }
        j /= 2;
    }
}

fn ifft<F: Field>(xx: &mut [F::Elt], m2: usize, r: usize, f: &F) {
    let mut scale = f.one();
    let mut j = 1;
    while j < m2 {
        f.mul(&mut scale, &f.half());
        for s in (0..m2).step_by(2 * j) {
            for t in 0..j {
                let shift = (r / j) * t;
                let hi = &mut xx[r * (s + t + j)..r * (s + t + j) + r];
                hi.rotate_right(shift);
                negate(&mut hi[..shift], f);
                for l in 0..r {
                    butterfly(xx, r * (s + t) + l, r * (s + t + j) + l, f);
                }
            }
        }
        j *= 2;
    }
    for e in xx[..r * m2].iter_mut() {
        f.mul(e, &scale);
    }
}

/// Reshapes a length-mr sequence into an m x r matrix of coefficients
/// of polynomials in t^m.
fn lift<T: Copy>(xx: &mut [T], x: &[T], m: usize, r: usize) {
    for i in 0..m {
        for j in 0..r {
            xx[r * i + j] = x[m * j + i];
        }
    }
}

fn zerolift<F: Field>(xx: &mut [F::Elt], m: usize, r: usize, f: &F) {
    for i in 0..m {
        for j in 0..r {
            xx[r * (i + m) + j] = f.zero();
        }
    }
}

fn unlift<T: Copy>(zz: &[T], z: &mut [T], m: usize, r: usize) {
    for i in 0..m {
        for j in 0..r {
            z[m * j + i] = zz[r * i + j];
        }
    }
}

fn basecase_cyclic<F: Field>(n: usize, z: &mut [F::Elt], x: &[F::Elt], y: &[F::Elt], f: &F) {
    for k in 0..n {
        let mut s = f.zero();
        for j in 0..=k {
            f.add(&mut s, &f.mulf(x[j], &y[k - j]));
        }
        for j in k + 1..n {
            f.add(&mut s, &f.mulf(x[j], &y[n + k - j]));
        }
        z[k] = s;
    }
}

fn basecase_negacyclic<F: Field>(n: usize, z: &mut [F::Elt], x: &[F::Elt], y: &[F::Elt], f: &F) {
    for k in 0..n {
        let mut s = f.zero();
        for j in 0..=k {
            f.add(&mut s, &f.mulf(x[j], &y[k - j]));
        }
        for j in k + 1..n {
            f.sub(&mut s, &f.mulf(x[j], &y[n + k - j]));
        }
        z[k] = s;
    }
}

fn basecase_linear<F: Field>(n: usize, z: &mut [F::Elt], x: &[F::Elt], y: &[F::Elt], f: &F) {
    for k in 0..n {
        let mut s = f.zero();
        for j in 0..=k {
            f.add(&mut s, &f.mulf(x[j], &y[k - j]));
        }
        z[k] = s;
    }
    for k in n..2 * n {
        let mut s = f.zero();
        for j in k - n + 1..n {
            f.add(&mut s, &f.mulf(x[j], &y[k - j]));
        }
        z[k] = s;
    }
}

fn basecase_middle<F: Field>(n: usize, z: &mut [F::Elt], x: &[F::Elt], y: &[F::Elt], f: &F) {
    for k in 0..n {
        let mut s = f.zero();
        for j in 0..n {
            f.add(&mut s, &f.mulf(x[n + k - j], &y[j]));
        }
        z[k] = s;
    }
}

fn karatsuba<F: Field>(n: usize, z: &mut [F::Elt], x: &[F::Elt], y: &[F::Elt], f: &F) {
    if n <= KARATSUBA_SMALL {
        basecase_linear(n, z, x, y, f);
    } else {
        let h = n / 2;
        let mut x01 = [f.zero(); NUSSBAUMER_SMALL / 2];
        let mut y01 = [f.zero(); NUSSBAUMER_SMALL / 2];
        let mut p = [f.zero(); NUSSBAUMER_SMALL];
        // The subtractive variant keeps the recombination all
        // additions, so there are no signs to track.
        for i in 0..h {
            x01[i] = f.subf(x[i], &x[i + h]);
            y01[i] = f.subf(y[i + h], &y[i]);
        }
        karatsuba(h, &mut z[..n], &x[..h], &y[..h], f);
        karatsuba(h, &mut z[n..2 * n], &x[h..], &y[h..], f);
        karatsuba(h, &mut p[..n], &x01[..h], &y01[..h], f);
        for i in 0..h {
            let t = z[i + n];
            f.add(&mut z[i + h], &t);
            z[i + n] = z[i + h];
            let t = p[i];
            f.add(&mut z[i + h], &t);
            let t = z[i];
            f.add(&mut z[i + h], &t);
            let t = p[i + h];
            f.add(&mut z[i + n], &t);
            let t = z[i + n + h];
            f.add(&mut z[i + n], &t);
        }
    }
}

fn karatsuba_negacyclic<F: Field>(n: usize, z: &mut [F::Elt], x: &[F::Elt], y: &[F::Elt], f: &F) {
    if n <= KARATSUBA_SMALL {
        basecase_negacyclic(n, z, x, y, f);
    } else {
        let h = n / 2;
        let mut x01 = [f.zero(); NUSSBAUMER_SMALL / 2];
        let mut y01 = [f.zero(); NUSSBAUMER_SMALL / 2];
        let mut p = [f.zero(); NUSSBAUMER_SMALL];
        let mut q = [f.zero(); NUSSBAUMER_SMALL];
        for i in 0..h {
            x01[i] = f.subf(x[i], &x[i + h]);
            y01[i] = f.subf(y[i + h], &y[i]);
        }
        karatsuba(h, &mut z[..n], &x[..h], &y[..h], f);
        karatsuba(h, &mut q[..n], &x[h..], &y[h..], f);
        karatsuba(h, &mut p[..n], &x01[..h], &y01[..h], f);
        for i in 0..h {
            let t = q[i];
            f.add(&mut z[i + h], &t);
            let t = q[i + h];
            f.sub(&mut z[i], &t);

            // not quite a butterfly: (lo, hi) <- (lo - hi, hi + lo)
            let zi = z[i];
            let t = z[i + h];
            f.sub(&mut z[i], &t);
            f.add(&mut z[i + h], &zi);

            let t = p[i];
            f.add(&mut z[i + h], &t);
            let t = p[i + h];
            f.sub(&mut z[i], &t);
        }
    }
}

/// Factors n = m * r with both powers of two, r >= m and m as large as
/// possible.
fn choose_radix(n: usize) -> (usize, usize) {
    let mut m = n;
    let mut r = 1;
    while r < m {
        r *= 2;
        m /= 2;
    }
    (m, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Fp, FpElt};

    fn ref_negacyclic(
        n: usize,
        z: &mut [FpElt<1>],
        x: &[FpElt<1>],
        y: &[FpElt<1>],
        f: &Fp<1>,
    ) {
        for k in 0..n {
            let mut s = f.zero();
            for j in 0..=k {
                f.add(&mut s, &f.mulf(x[j], &y[k - j]));
            }
            for j in k + 1..n {
                f.sub(&mut s, &f.mulf(x[j], &y[n + k - j]));
            }
            z[k] = s;
        }
    }

    #[test]
    fn test_choose_radix() {
        assert_eq!(choose_radix(2), (1, 2));
        assert_eq!(choose_radix(8), (2, 4));
        assert_eq!(choose_radix(64), (8, 8));
        assert_eq!(choose_radix(128), (8, 16));
        assert_eq!(choose_radix(4096), (64, 64));
    }

    #[test]
    fn test_negacyclic_fixed_n8() {
        // 2^61 - 1; ascending-integer inputs
        let f = Fp::<1>::new("2305843009213693951");
        let n = 8;
        let x: Vec<_> = (0..n).map(|i| f.of_scalar(i as u64 + 1)).collect();
        let y: Vec<_> = (0..n).map(|i| f.of_scalar(2 * i as u64 + 3)).collect();
        let mut z = vec![f.zero(); n];
        let mut zr = vec![f.zero(); n];
        negacyclic(&mut z, &x, &y, &f);
        ref_negacyclic(n, &mut zr, &x, &y, &f);
        assert_eq!(z, zr);
    }

    #[test]
    fn test_negacyclic_crosses_karatsuba_threshold() {
        let f = Fp::<1>::new("2305843009213693951");
        for n in [1usize, 2, 4, 8, 16, 32, 64, 128, 256] {
            let x: Vec<_> = (0..n).map(|i| f.of_scalar((i * i + 1) as u64)).collect();
            let y: Vec<_> = (0..n).map(|i| f.of_scalar((3 * i + 7) as u64)).collect();
            let mut z = vec![f.zero(); n];
            let mut zr = vec![f.zero(); n];
            negacyclic(&mut z, &x, &y, &f);
            ref_negacyclic(n, &mut zr, &x, &y, &f);
            assert_eq!(z, zr, "n = {}", n);
        }
    }

    #[test]
    fn test_linear_small() {
        let f = Fp::<1>::new("2305843009213693951");
        // (1 + 2t)(3 + 4t) = 3 + 10t + 8t^2
        let x = [f.of_scalar(1), f.of_scalar(2)];
        let y = [f.of_scalar(3), f.of_scalar(4)];
        let mut z = vec![f.zero(); 4];
        linear(&mut z, &x, &y, &f);
        assert_eq!(z[0], f.of_scalar(3));
        assert_eq!(z[1], f.of_scalar(10));
        assert_eq!(z[2], f.of_scalar(8));
        assert_eq!(z[3], f.zero());
    }

    #[test]
    fn test_middle_small() {
        let f = Fp::<1>::new("2305843009213693951");
        let n = 4;
        let x: Vec<_> = (0..2 * n).map(|i| f.of_scalar(i as u64 + 1)).collect();
        let y: Vec<_> = (0..n).map(|i| f.of_scalar(i as u64 + 1)).collect();
        let mut z = vec![f.zero(); n];
        middle(&mut z, &x, &y, &f);
        for k in 0..n {
            let mut s = f.zero();
            for j in 0..n {
                f.add(&mut s, &f.mulf(x[n + k - j], &y[j]));
            }
            assert_eq!(z[k], s);
        }
    }
}
