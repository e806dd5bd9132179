// CRT residue representation over a fixed basis of 64-bit primes
//
// Mimics the field interface of an ambient prime field Fp with a
// vector of residues modulo the basis primes, so that wide arithmetic
// turns into independent 64-bit operations. Valid as long as every
// sequence of operations performed before to_field stays below the
// product of the first VS basis primes.

mod convolution;

pub use convolution::CrtConvolution;

use crate::field::{Field, Fp, FpElt, Nat, ReduceScale};

pub const BASIS_SIZE: usize = 17;
pub const OMEGA_ORDER: u64 = 1 << 22;

/// 17 primes just below 2^64 with 2^22 | p - 1, in ascending order.
/// The product of the first 9 covers 256-bit fields, 13 covers 384,
/// all 17 cover 521.
pub const PRIMES_17: [u64; BASIS_SIZE] = [
    18446744072195407873,
    18446744072237350913,
    18446744072245739521,
    18446744072325431297,
    18446744072589672449,
    18446744072623226881,
    18446744072790999041,
    18446744073113960449,
    18446744073290121217,
    18446744073327869953,
    18446744073332064257,
    18446744073344647169,
    18446744073420144641,
    18446744073457893377,
    18446744073516613633,
    18446744073520807937,
    18446744073692774401,
];

/// A root of unity of order 2^22 in each corresponding prime field.
pub const OMEGA_17: [u64; BASIS_SIZE] = [
    436037131817,
    2773676930123,
    2768111518080,
    34106487772798,
    1302264167001,
    5572414085664,
    4170236488818,
    10930506752996,
    13447610733542,
    366878793395,
    10535270759408,
    2630106726088,
    2766923619799,
    6957320847870,
    10540913985379,
    15095618916269,
    3150424293220,
];

/// Residue vector: component i lives in the field of the i-th basis
/// prime, in Montgomery form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrtElt<const VS: usize> {
    pub r: [FpElt<1>; VS],
}

/// CRT engine over the first `VS` basis primes, lifting values of the
/// ambient field `Fp<W>`. Construction performs all precomputation;
/// the engine is immutable afterwards and may be shared for reads.
pub struct Crt<'a, const VS: usize, const W: usize> {
    f: &'a Fp<W>,
    bf: [Fp<1>; VS],
    k: [CrtElt<VS>; 3],
    k_half: CrtElt<VS>,
    reduce_scale: [ReduceScale<W>; VS],
    // garner[i] is prod_{j<i} p_j in the ambient field, pre-scaled for
    // the fused dot product in to_field.
    garner: [FpElt<W>; VS],
    // cij[i][j] = (p_j mod p_i)^{-1} in basis field i, Montgomery
    // form; defined for j < i.
    cij: [[FpElt<1>; VS]; VS],
}

pub type Crt256<'a, const W: usize> = Crt<'a, 9, W>;
pub type Crt384<'a, const W: usize> = Crt<'a, 13, W>;
pub type Crt521<'a, const W: usize> = Crt<'a, 17, W>;

impl<'a, const VS: usize, const W: usize> Crt<'a, VS, W> {
    pub fn new(f: &'a Fp<W>) -> Self {
        assert!(VS <= BASIS_SIZE, "basis size exceeds the fixed prime list");

        let bf: [Fp<1>; VS] =
            std::array::from_fn(|b| Fp::from_modulus(Nat::from_u64(PRIMES_17[b])));

        let k = [
            CrtElt {
                r: std::array::from_fn(|b| bf[b].zero()),
            },
            CrtElt {
                r: std::array::from_fn(|b| bf[b].one()),
            },
            CrtElt {
                r: std::array::from_fn(|b| bf[b].two()),
            },
        ];
        let k_half = CrtElt {
            r: std::array::from_fn(|b| bf[b].half()),
        };

        let reduce_scale: [ReduceScale<W>; VS] =
            std::array::from_fn(|b| bf[b].reduce_scale::<W>());

        let garner: [FpElt<W>; VS] = std::array::from_fn(|i| {
            let mut g = f.one();
            for j in 0..i {
                f.mul(&mut g, &f.of_scalar(PRIMES_17[j]));
            }
            f.prescale_for_dot(&g)
        });

        let mut cij = [[bf[0].zero(); VS]; VS];
        for i in 0..VS {
            for j in 0..i {
                cij[i][j] = bf[i].invertf(bf[i].of_scalar(PRIMES_17[j]));
            }
        }

        Self {
            f,
            bf,
            k,
            k_half,
            reduce_scale,
            garner,
            cij,
        }
    }

    /// Projects an ambient element onto the basis: one wide-natural
    /// reduction per prime.
    pub fn to_crt(&self, e: &FpElt<W>) -> CrtElt<VS> {
        let n = self.f.from_montgomery(e);
        CrtElt {
            r: std::array::from_fn(|b| self.bf[b].reduce(&n, &self.reduce_scale[b])),
        }
    }

    /// Garner reconstruction. With cij * p_j = 1 mod p_i:
    ///   v1 = x1
    ///   v2 = (x2 - v1) * c21 mod p2
    ///   v3 = ((x3 - v1) * c31 - v2) * c32 mod p3
    ///   ...
    ///   u  = v1 + v2 * p1 + v3 * p2 * p1 + ...
    /// u is the unique value in [0, prod p_i) matching every residue,
    /// and the final accumulation reduces it into the ambient field in
    /// the same pass, as a dot product against the pre-scaled partial
    /// products.
    pub fn to_field(&self, x: &CrtElt<VS>) -> FpElt<W> {
        // The vi are kept as naturals in [0, p_i), not Montgomery: sub
        // works on naturals directly, and because cij is Montgomery
        // the product lands back in natural form.
        let mut vi: [Nat<1>; VS] = std::array::from_fn(|j| self.bf[j].from_montgomery(&x.r[j]));

        // Loop order makes every inner step independent: iteration j
        // folds v_{j-1} into all later lanes at once.
        for j in 1..VS {
            let vj = vi[j - 1];
            for i in j..VS {
                let fi = &self.bf[i];
                fi.sub_nat(&mut vi[i], &vj);
                fi.mul_nat_mont(&mut vi[i], &self.cij[i][j - 1]);
            }
        }

        self.f.dot(&vi, &self.garner)
    }

    /// Textbook reconstruction sum_i x_i * (M/p_i) * ((M/p_i)^{-1} mod
    /// p_i) mod M, reduced into the ambient field. Slower than Garner;
    /// kept as a cross-check baseline for debug builds.
    #[cfg(debug_assertions)]
    pub fn to_field_reference(&self, x: &CrtElt<VS>) -> FpElt<W> {
        use num_bigint::BigUint;
        use num_traits::One;

        let m_total = PRIMES_17[..VS]
            .iter()
            .fold(BigUint::one(), |acc, &p| acc * p);
        let mut acc = BigUint::default();
        for i in 0..VS {
            let xi = self.bf[i].from_montgomery(&x.r[i]).limb[0];
            let pi = BigUint::from(PRIMES_17[i]);
            let mi = &m_total / &pi;
            let inv = mi.modpow(&(&pi - 2u32), &pi);
            acc += mi * inv * xi;
        }
        let v = (acc % &m_total) % self.f.modulus().to_biguint();
        self.f.to_montgomery(&Nat::from_biguint(&v))
    }

    /// The basis-wide root of unity: component i is the order-2^22
    /// root of prime i.
    pub fn omega(&self) -> CrtElt<VS> {
        CrtElt {
            r: std::array::from_fn(|b| self.bf[b].of_scalar(OMEGA_17[b])),
        }
    }

    pub fn omega_order(&self) -> u64 {
        OMEGA_ORDER
    }

    pub fn field(&self) -> &'a Fp<W> {
        self.f
    }
}

impl<const VS: usize, const W: usize> Field for Crt<'_, VS, W> {
    type Elt = CrtElt<VS>;

    fn zero(&self) -> CrtElt<VS> {
        self.k[0]
    }

    fn one(&self) -> CrtElt<VS> {
        self.k[1]
    }

    fn two(&self) -> CrtElt<VS> {
        self.k[2]
    }

    fn half(&self) -> CrtElt<VS> {
        self.k_half
    }

    fn add(&self, x: &mut CrtElt<VS>, y: &CrtElt<VS>) {
        for i in 0..VS {
            self.bf[i].add(&mut x.r[i], &y.r[i]);
        }
    }

    fn sub(&self, x: &mut CrtElt<VS>, y: &CrtElt<VS>) {
        for i in 0..VS {
            self.bf[i].sub(&mut x.r[i], &y.r[i]);
        }
    }

    fn mul(&self, x: &mut CrtElt<VS>, y: &CrtElt<VS>) {
        for i in 0..VS {
            self.bf[i].mul(&mut x.r[i], &y.r[i]);
        }
    }

    fn neg(&self, x: &mut CrtElt<VS>) {
        for i in 0..VS {
            self.bf[i].neg(&mut x.r[i]);
        }
    }

    fn invert(&self, x: &mut CrtElt<VS>) {
        for i in 0..VS {
            assert!(x.r[i] != self.bf[i].zero(), "non-invertible element");
            self.bf[i].invert(&mut x.r[i]);
        }
    }
}
