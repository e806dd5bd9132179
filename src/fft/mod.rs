// In-place radix-2 transforms over any Field
//
// The same code runs as an NTT over the CRT representation (where the
// root is a vector of per-prime roots), as an NTT over a prime field,
// and as a complex FFT over the quadratic extension.

mod twiddle;

pub use twiddle::{reroot, Twiddle};

use crate::field::Field;

/// Bit-reversal permutation of a power-of-two-length slice.
pub fn bitrev<T>(a: &mut [T]) {
    let n = a.len();
    debug_assert!(n.is_power_of_two());
    if n <= 2 {
        return;
    }
    let shift = usize::BITS - n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> shift;
        if i < j {
            a.swap(i, j);
        }
    }
}

/// Forward transform with the primitive root `omega^(omega_order / n)`.
pub fn fftf<F: Field>(a: &mut [F::Elt], omega: &F::Elt, omega_order: u64, f: &F) {
    let w = reroot(omega, omega_order, a.len(), f);
    transform(a, &w, f);
}

/// Backward transform: inverse root, no 1/n scaling. Composing with
/// `fftf` yields n times the input.
pub fn fftb<F: Field>(a: &mut [F::Elt], omega: &F::Elt, omega_order: u64, f: &F) {
    let w = f.invertf(reroot(omega, omega_order, a.len(), f));
    transform(a, &w, f);
}

fn transform<F: Field>(a: &mut [F::Elt], w: &F::Elt, f: &F) {
    let n = a.len();
    if n <= 1 {
        return;
    }
    bitrev(a);
    let mut m = 1;
    while m < n {
        let wm = f.powf(w, (n / (2 * m)) as u64);
        for k in (0..n).step_by(2 * m) {
            let mut tw = f.one();
            for j in 0..m {
                let t = f.mulf(a[k + j + m], &tw);
                let u = a[k + j];
                a[k + j] = f.addf(u, &t);
                a[k + j + m] = f.subf(u, &t);
                f.mul(&mut tw, &wm);
            }
        }
        m *= 2;
    }
}
