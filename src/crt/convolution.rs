// Fixed-operand convolution through the CRT basis
//
// The second operand y is transformed once at construction; every
// convolution call then costs two transforms and a pointwise product.

use num_bigint::BigUint;
use num_traits::One;

use super::{Crt, CrtElt, OMEGA_ORDER, PRIMES_17};
use crate::fft;
use crate::field::{Field, Fp, FpElt};

pub struct CrtConvolution<'a, const VS: usize, const W: usize> {
    crt: Crt<'a, VS, W>,
    n: usize,
    m: usize,
    padding: usize,
    y_fft: Vec<CrtElt<VS>>,
    omega: CrtElt<VS>,
    omega_order: u64,
}

impl<'a, const VS: usize, const W: usize> CrtConvolution<'a, VS, W> {
    /// Convolver for a fixed y of length m against inputs of length n.
    /// The transform length is the smallest power of two >= m.
    pub fn new(n: usize, m: usize, f: &'a Fp<W>, y: &[FpElt<W>]) -> Self {
        assert_eq!(y.len(), m);
        assert!(n >= 1 && n <= m);
        let padding = m.next_power_of_two();
        assert!(
            padding as u64 <= OMEGA_ORDER,
            "convolution length exceeds the root order"
        );

        // The basis must cover padding * q^2, the largest coefficient
        // the transform can produce before reconstruction.
        let basis = PRIMES_17[..VS]
            .iter()
            .fold(BigUint::one(), |acc, &p| acc * p);
        let q = f.modulus().to_biguint();
        assert!(
            basis > &q * &q * padding,
            "CRT basis too small for this field"
        );

        let crt = Crt::new(f);
        let omega = crt.omega();
        let omega_order = crt.omega_order();

        // Pre-scale y by 1/padding to compensate for the unscaled
        // backward transform.
        let pni = crt.invertf(crt.to_crt(&f.of_scalar(padding as u64)));
        let mut y_fft = vec![crt.zero(); padding];
        for (yf, yi) in y_fft.iter_mut().zip(y.iter()) {
            *yf = crt.mulf(pni, &crt.to_crt(yi));
        }
        fft::fftf(&mut y_fft, &omega, omega_order, &crt);

        Self {
            crt,
            n,
            m,
            padding,
            y_fft,
            omega,
            omega_order,
        }
    }

    /// Writes into z the first m entries of the convolution of x with
    /// y: z[k] = sum_i x[i] * y[k - i], indices wrapping modulo the
    /// transform length.
    pub fn convolution(&self, x: &[FpElt<W>], z: &mut [FpElt<W>]) {
        assert_eq!(x.len(), self.n);
        assert_eq!(z.len(), self.m);

        let mut x_fft = vec![self.crt.zero(); self.padding];
        for (xf, xi) in x_fft.iter_mut().zip(x.iter()) {
            *xf = self.crt.to_crt(xi);
        }
        fft::fftf(&mut x_fft, &self.omega, self.omega_order, &self.crt);

        for (xf, yf) in x_fft.iter_mut().zip(self.y_fft.iter()) {
            self.crt.mul(xf, yf);
        }

        fft::fftb(&mut x_fft, &self.omega, self.omega_order, &self.crt);

        for (zi, xf) in z.iter_mut().zip(x_fft.iter()) {
            *zi = self.crt.to_field(xf);
        }
    }

    pub fn crt(&self) -> &Crt<'a, VS, W> {
        &self.crt
    }
}
