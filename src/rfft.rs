// Real FFT and its inverse, in half-complex storage
//
// The FFT of a real input is conjugate-symmetric, so it fits back
// into a real array of the same length (FFTW's half-complex format):
//
//   HC[j] = (2j <= n) ? real(F[j]) : imag(F[n - j])
//
// r2hc is the real -> half-complex transform, hc2r its inverse up to
// a factor of n. The algorithm is radix-4 Cooley-Tukey over the
// quadratic extension: with i^2 = -1 a size-4 transform needs no
// multiplications, and when log2 n is odd the first (twiddle-free)
// level runs radix 2. A half-complex array carries two excess real
// slots (F[0] and F[n/2]), so each level needs two special real-input
// butterflies besides the main complex one: the first butterfly of a
// block has trivial twiddles (r2hc_i_4), the last has eighth-root
// twiddles (r2hc_ii_4, a type-II transform).

use crate::fft::{bitrev, reroot, Twiddle};
use crate::field::{Field, Fp, Fp2, Fp2Elt, FpElt};

// Only roots on the unit circle work here: twiddles are applied by
// multiplying with the conjugate instead of the inverse.
fn validate_root<const W: usize>(omega: &Fp2Elt<W>, c: &Fp2<W>) {
    assert!(
        c.mulf(*omega, &c.conjf(*omega)) == c.one(),
        "root of unity not on the unit circle"
    );
}

// The radix-4 butterflies hardcode omega^{n/4} == (0, 1). The
// conjugate root is a fine root of unity but flips every sign.
fn validate_i<const W: usize>(ii: &Fp2Elt<W>, c: &Fp2<W>) {
    assert!(*ii == c.i(), "wrong sign for i(), need the conjugate root");
}

/// Forward real to half-complex in-place transform; the length of `a`
/// must be a power of two dividing `omega_order`.
pub fn r2hc<const W: usize>(a: &mut [FpElt<W>], omega: &Fp2Elt<W>, omega_order: u64, c: &Fp2<W>) {
    let f = c.base_field();
    validate_root(omega, c);
    let n = a.len();
    if n == 2 {
        r2hc_i_2(a, 0, 1, f);
    } else if n >= 4 {
        let omega_n = reroot(omega, omega_order, n, c);
        let roots = Twiddle::new(n, &omega_n, c);
        validate_i(&roots.w[n / 4], c);

        bitrev(a);

        let mut m = n;
        while m > 4 {
            m /= 4;
        }

        if m == 2 {
            for k in (0..n).step_by(2) {
                r2hc_i_2(a, k, 1, f);
            }
        } else {
            for k in (0..n).step_by(4) {
                r2hc_i_4(a, k, 1, f);
            }
        }

        while m < n {
            let ws = n / (4 * m);
            for k in (0..n).step_by(4 * m) {
                r2hc_i_4(a, k, m, f); // j == 0

                let mut j = 1;
                while j + j < m {
                    hc2hcf_4(
                        a,
                        k + j,
                        k + m - j,
                        m,
                        &roots.w[j * ws],
                        &roots.w[2 * j * ws],
                        &roots.w[3 * j * ws],
                        f,
                    );
                    j += 1;
                }

                r2hc_ii_4(a, k + j, m, &roots.w[j * ws], f); // j == m/2
            }
            m *= 4;
        }
    }
}

/// Backward half-complex to real in-place transform; composing with
/// `r2hc` yields n times the input.
pub fn hc2r<const W: usize>(a: &mut [FpElt<W>], omega: &Fp2Elt<W>, omega_order: u64, c: &Fp2<W>) {
    let f = c.base_field();
    validate_root(omega, c);
    let n = a.len();
    if n == 2 {
        hc2r_i_2(a, 0, 1, f);
    } else if n >= 4 {
        let omega_n = reroot(omega, omega_order, n, c);
        let roots = Twiddle::new(n, &omega_n, c);
        validate_i(&roots.w[n / 4], c);

        let mut m = n;
        while m > 4 {
            m /= 4;
            let ws = n / (4 * m);
            for k in (0..n).step_by(4 * m) {
                hc2r_i_4(a, k, m, f); // j == 0

                let mut j = 1;
                while j + j < m {
                    hc2hcb_4(
                        a,
                        k + j,
                        k + m - j,
                        m,
                        &roots.w[j * ws],
                        &roots.w[2 * j * ws],
                        &roots.w[3 * j * ws],
                        f,
                    );
                    j += 1;
                }

                hc2r_iii_4(a, k + j, m, &roots.w[j * ws], f); // j == m/2
            }
        }

        if m == 2 {
            for k in (0..n).step_by(2) {
                hc2r_i_2(a, k, 1, f);
            }
        } else {
            for k in (0..n).step_by(4) {
                hc2r_i_4(a, k, 1, f);
            }
        }

        bitrev(a);
    }
}

// ------------------------------------------------------------
// Forward butterflies (decimation in time: twiddles first).
// ------------------------------------------------------------

fn r2hc_i_2<const W: usize>(a: &mut [FpElt<W>], o: usize, s: usize, f: &Fp<W>) {
    let t = a[o + s];
    a[o + s] = a[o];
    f.add(&mut a[o], &t);
    f.sub(&mut a[o + s], &t);
}

fn r2hc_i_4<const W: usize>(a: &mut [FpElt<W>], o: usize, s: usize, f: &Fp<W>) {
    let x0 = a[o];
    let x1 = a[o + s];
    let z0 = f.addf(x0, &x1);
    let x2 = a[o + 2 * s];
    let x3 = a[o + 3 * s];
    let z1 = f.addf(x2, &x3);
    a[o] = f.addf(z0, &z1);
    a[o + 2 * s] = f.subf(z0, &z1);
    a[o + s] = f.subf(x0, &x1);
    a[o + 3 * s] = f.subf(x3, &x2);
}

// j = m/2 butterfly of the main loop, where w8^2 = i
fn r2hc_ii_4<const W: usize>(a: &mut [FpElt<W>], o: usize, s: usize, w8: &Fp2Elt<W>, f: &Fp<W>) {
    let x2 = a[o + 2 * s];
    let x3 = a[o + 3 * s];
    let mut z0 = f.addf(x2, &x3);
    let mut z1 = f.subf(x2, &x3);
    f.mul(&mut z0, &w8.im);
    f.mul(&mut z1, &w8.re);
    let x0 = a[o];
    let x1 = a[o + s];
    a[o] = f.addf(x0, &z1);
    a[o + s] = f.subf(x0, &z1);
    a[o + 2 * s] = f.subf(x1, &z0);
    a[o + 3 * s] = f.addf(x1, &z0);
    f.neg(&mut a[o + 3 * s]);
}

fn hc2hcf_4<const W: usize>(
    a: &mut [FpElt<W>],
    ar: usize,
    ai: usize,
    s: usize,
    tw1: &Fp2Elt<W>,
    tw2: &Fp2Elt<W>,
    tw3: &Fp2Elt<W>,
    f: &Fp<W>,
) {
    cmulj(a, ar + s, ai + s, &tw2.re, &tw2.im, f);
    let y0r = f.addf(a[ar], &a[ar + s]);
    let y0i = f.addf(a[ai], &a[ai + s]);
    let y1r = f.subf(a[ar], &a[ar + s]);
    let y1i = f.subf(a[ai], &a[ai + s]);
    cmulj(a, ar + 2 * s, ai + 2 * s, &tw1.re, &tw1.im, f);
    cmulj(a, ar + 3 * s, ai + 3 * s, &tw3.re, &tw3.im, f);
    let y2r = f.addf(a[ar + 3 * s], &a[ar + 2 * s]);
    let y3r = f.subf(a[ar + 3 * s], &a[ar + 2 * s]);
    let y2i = f.addf(a[ai + 2 * s], &a[ai + 3 * s]);
    let y3i = f.subf(a[ai + 2 * s], &a[ai + 3 * s]);
    a[ar] = f.addf(y0r, &y2r);
    a[ai + s] = f.subf(y0r, &y2r);
    a[ar + s] = f.addf(y1r, &y3i);
    a[ai] = f.subf(y1r, &y3i);
    a[ai + 3 * s] = f.addf(y2i, &y0i);
    a[ar + 2 * s] = f.subf(y2i, &y0i);
    a[ai + 2 * s] = f.addf(y3r, &y1i);
    a[ar + 3 * s] = f.subf(y3r, &y1i);
}

// ------------------------------------------------------------
// Backward butterflies (decimation in frequency: twiddles last).
// hc2r_iii_4 is the inverse of the type-II forward butterfly.
// ------------------------------------------------------------

fn hc2r_i_2<const W: usize>(a: &mut [FpElt<W>], o: usize, s: usize, f: &Fp<W>) {
    let t = a[o + s];
    a[o + s] = a[o];
    f.add(&mut a[o], &t);
    f.sub(&mut a[o + s], &t);
}

fn hc2r_i_4<const W: usize>(a: &mut [FpElt<W>], o: usize, s: usize, f: &Fp<W>) {
    let y0 = f.addf(a[o], &a[o + 2 * s]);
    let y1 = f.subf(a[o], &a[o + 2 * s]);
    let y2 = f.addf(a[o + s], &a[o + s]);
    let y3 = f.addf(a[o + 3 * s], &a[o + 3 * s]);
    a[o] = f.addf(y0, &y2);
    a[o + s] = f.subf(y0, &y2);
    a[o + 2 * s] = f.subf(y1, &y3);
    a[o + 3 * s] = f.addf(y1, &y3);
}

fn hc2r_iii_4<const W: usize>(a: &mut [FpElt<W>], o: usize, s: usize, w8: &Fp2Elt<W>, f: &Fp<W>) {
    let x0 = f.addf(a[o], &a[o]);
    let x1 = f.addf(a[o + s], &a[o + s]);
    let x2 = f.addf(a[o + 2 * s], &a[o + 2 * s]);
    let x3 = f.addf(a[o + 3 * s], &a[o + 3 * s]);
    a[o] = f.addf(x0, &x1);
    a[o + s] = f.subf(x2, &x3);
    let mut z0 = f.subf(x0, &x1);
    f.mul(&mut z0, &w8.re);
    let mut z1 = f.addf(x3, &x2);
    f.mul(&mut z1, &w8.im);
    a[o + 2 * s] = f.subf(z0, &z1);
    a[o + 3 * s] = f.addf(z0, &z1);
    f.neg(&mut a[o + 3 * s]);
}

fn hc2hcb_4<const W: usize>(
    a: &mut [FpElt<W>],
    ar: usize,
    ai: usize,
    s: usize,
    tw1: &Fp2Elt<W>,
    tw2: &Fp2Elt<W>,
    tw3: &Fp2Elt<W>,
    f: &Fp<W>,
) {
    let z0 = f.addf(a[ar], &a[ai + s]);
    let z1 = f.subf(a[ar], &a[ai + s]);
    let z2 = f.addf(a[ar + s], &a[ai]);
    let z3 = f.subf(a[ar + s], &a[ai]);
    let z4 = f.addf(a[ai + 3 * s], &a[ar + 2 * s]);
    let z5 = f.subf(a[ai + 3 * s], &a[ar + 2 * s]);
    let z6 = f.addf(a[ai + 2 * s], &a[ar + 3 * s]);
    let z7 = f.subf(a[ai + 2 * s], &a[ar + 3 * s]);
    a[ar] = f.addf(z0, &z2);
    a[ai] = f.addf(z5, &z7);
    a[ar + s] = f.subf(z0, &z2);
    a[ai + s] = f.subf(z5, &z7);
    cmul(a, ar + s, ai + s, &tw2.re, &tw2.im, f);
    a[ar + 2 * s] = f.subf(z1, &z6);
    a[ai + 2 * s] = f.addf(z4, &z3);
    cmul(a, ar + 2 * s, ai + 2 * s, &tw1.re, &tw1.im, f);
    a[ar + 3 * s] = f.addf(z1, &z6);
    a[ai + 3 * s] = f.subf(z4, &z3);
    cmul(a, ar + 3 * s, ai + 3 * s, &tw3.re, &tw3.im, f);
}

/// (a[xr], a[xi]) *= (br, bi), Karatsuba: 3 mul + 5 add.
fn cmul<const W: usize>(
    a: &mut [FpElt<W>],
    xr: usize,
    xi: usize,
    br: &FpElt<W>,
    bi: &FpElt<W>,
    f: &Fp<W>,
) {
    let p0 = f.mulf(a[xr], br);
    let p1 = f.mulf(a[xi], bi);
    let a01 = f.addf(a[xr], &a[xi]);
    let b01 = f.addf(*br, bi);
    a[xr] = f.subf(p0, &p1);
    let mut t = f.mulf(a01, &b01);
    f.sub(&mut t, &p0);
    f.sub(&mut t, &p1);
    a[xi] = t;
}

/// (a[xr], a[xi]) *= conj((br, bi)).
fn cmulj<const W: usize>(
    a: &mut [FpElt<W>],
    xr: usize,
    xi: usize,
    br: &FpElt<W>,
    bi: &FpElt<W>,
    f: &Fp<W>,
) {
    let p0 = f.mulf(a[xr], br);
    let p1 = f.mulf(a[xi], bi);
    let a01 = f.addf(a[xr], &a[xi]);
    let b01 = f.subf(*br, bi);
    a[xr] = f.addf(p0, &p1);
    let mut t = f.mulf(a01, &b01);
    f.sub(&mut t, &p0);
    f.add(&mut t, &p1);
    a[xi] = t;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p256() -> Fp<4> {
        Fp::new(
            "115792089210356248762697446949407573530086143415290314195533631308867097853951",
        )
    }

    fn omega(c: &Fp2<4>) -> Fp2Elt<4> {
        c.of_string(
            "112649224146410281873500457609690258373018840430489408729223714171582664680802",
            "84087994358540907695740461427818660560182168997182378749313018254450460212908",
        )
    }

    const OMEGA_ORDER: u64 = 1 << 31;

    #[test]
    fn test_round_trip_small() {
        let f0 = p256();
        let c = Fp2::new(&f0);
        let w = omega(&c);
        for n in [1usize, 2, 4, 8, 16, 32, 64] {
            let mut a: Vec<_> = (0..n).map(|i| f0.of_scalar(i as u64 * 5 + 3)).collect();
            let want = a.clone();
            r2hc(&mut a, &w, OMEGA_ORDER, &c);
            hc2r(&mut a, &w, OMEGA_ORDER, &c);
            let scale = f0.of_scalar(n as u64);
            for (got, want) in a.iter().zip(want.iter()) {
                assert_eq!(*got, f0.mulf(scale, want), "n = {}", n);
            }
        }
    }

    #[test]
    fn test_delta_input() {
        // r2hc of a delta at position 1 gives the root powers with a
        // minus-sign exponent: (1, 0, -1, -1) at n = 4.
        let f0 = p256();
        let c = Fp2::new(&f0);
        let w = omega(&c);
        let mut a = vec![f0.zero(); 4];
        a[1] = f0.one();
        r2hc(&mut a, &w, OMEGA_ORDER, &c);
        assert_eq!(a[0], f0.one());
        assert_eq!(a[1], f0.zero());
        assert_eq!(a[2], f0.negf(f0.one()));
        assert_eq!(a[3], f0.negf(f0.one()));
    }

    #[test]
    #[should_panic(expected = "unit circle")]
    fn test_rejects_off_circle_root() {
        let f0 = p256();
        let c = Fp2::new(&f0);
        let bad = c.of_scalar(3);
        let mut a = vec![f0.zero(); 8];
        r2hc(&mut a, &bad, OMEGA_ORDER, &c);
    }

    #[test]
    #[should_panic(expected = "wrong sign")]
    fn test_rejects_conjugate_root() {
        let f0 = p256();
        let c = Fp2::new(&f0);
        let w = c.conjf(omega(&c));
        let mut a = vec![f0.zero(); 8];
        r2hc(&mut a, &w, OMEGA_ORDER, &c);
    }
}
