// CRT-accelerated polynomial convolution over large prime fields
//
// Products of long polynomials over 256/384/521-bit prime fields are
// lifted into a residue-number system built from 17 fixed 64-bit
// primes, transformed with an NTT whose root has order 2^22, and
// reconstructed with Garner's method. A field-only Nussbaumer
// convolution and a half-complex real FFT over a quadratic extension
// cover the fields where no cheap high-order root of unity exists.

pub mod crt;
pub mod fft;
pub mod field;
pub mod nussbaumer;
pub mod random;
pub mod rfft;

pub use crt::{
    Crt, Crt256, Crt384, Crt521, CrtConvolution, CrtElt, BASIS_SIZE, OMEGA_17, OMEGA_ORDER,
    PRIMES_17,
};
pub use field::{Field, Fp, Fp2, Fp2Elt, FpElt, Nat, ReduceScale};
pub use random::EltRng;
