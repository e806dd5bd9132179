// Nussbaumer convolutions against the naive formulas over Fp2 of
// 2^61 - 1, a field with no high-order two-adic root of unity

use polyconv::{nussbaumer, EltRng, Field, Fp, Fp2, Fp2Elt};

const MAX_N: usize = 1 << 12;

fn ref_negacyclic(n: usize, z: &mut [Fp2Elt<1>], x: &[Fp2Elt<1>], y: &[Fp2Elt<1>], f: &Fp2<1>) {
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

fn ref_linear(n: usize, z: &mut [Fp2Elt<1>], x: &[Fp2Elt<1>], y: &[Fp2Elt<1>], f: &Fp2<1>) {
    // really 2n - 1 coefficients; the top one is zero
    for k in 0..2 * n {
        let mut s = f.zero();
        for j in 0..=k {
            if j < n && k - j < n {
                f.add(&mut s, &f.mulf(x[j], &y[k - j]));
            }
        }
        z[k] = s;
    }
}

fn ref_middle(n: usize, z: &mut [Fp2Elt<1>], x: &[Fp2Elt<1>], y: &[Fp2Elt<1>], f: &Fp2<1>) {
    for k in 0..n {
        let mut s = f.zero();
        for j in 0..n {
            f.add(&mut s, &f.mulf(x[n + k - j], &y[j]));
        }
        z[k] = s;
    }
}

#[test]
fn negacyclic_matches_naive() {
    let f0 = Fp::<1>::new("2305843009213693951");
    let f = Fp2::new(&f0);
    let mut rng = EltRng::new(1);

    let mut n = 1;
    while n < MAX_N {
        let x: Vec<_> = (0..n).map(|_| rng.next_fp2(&f)).collect();
        let y: Vec<_> = (0..n).map(|_| rng.next_fp2(&f)).collect();
        let mut z = vec![f.zero(); n];
        let mut zr = vec![f.zero(); n];
        nussbaumer::negacyclic(&mut z, &x, &y, &f);
        ref_negacyclic(n, &mut zr, &x, &y, &f);
        assert_eq!(z, zr, "n = {}", n);
        n *= 2;
    }
}

#[test]
fn linear_matches_naive() {
    let f0 = Fp::<1>::new("2305843009213693951");
    let f = Fp2::new(&f0);
    let mut rng = EltRng::new(2);

    let mut n = 1;
    while n < MAX_N {
        let x: Vec<_> = (0..n).map(|_| rng.next_fp2(&f)).collect();
        let y: Vec<_> = (0..n).map(|_| rng.next_fp2(&f)).collect();
        let mut z = vec![f.zero(); 2 * n];
        let mut zr = vec![f.zero(); 2 * n];
        nussbaumer::linear(&mut z, &x, &y, &f);
        ref_linear(n, &mut zr, &x, &y, &f);
        assert_eq!(z, zr, "n = {}", n);
        n *= 2;
    }
}

#[test]
fn middle_matches_naive() {
    let f0 = Fp::<1>::new("2305843009213693951");
    let f = Fp2::new(&f0);
    let mut rng = EltRng::new(3);

    let mut n = 1;
    while n < MAX_N {
        let x: Vec<_> = (0..2 * n).map(|_| rng.next_fp2(&f)).collect();
        let y: Vec<_> = (0..n).map(|_| rng.next_fp2(&f)).collect();
        let mut z = vec![f.zero(); n];
        let mut zr = vec![f.zero(); n];
        nussbaumer::middle(&mut z, &x, &y, &f);
        ref_middle(n, &mut zr, &x, &y, &f);
        assert_eq!(z, zr, "n = {}", n);
        n *= 2;
    }
}

#[test]
fn negacyclic_ascending_integers_n8() {
    let f0 = Fp::<1>::new("2305843009213693951");
    let f = Fp2::new(&f0);
    let n = 8;
    let x: Vec<_> = (0..n).map(|i| f.of_scalar(i as u64 + 1)).collect();
    let y: Vec<_> = (0..n).map(|i| f.of_scalar(i as u64 + 9)).collect();
    let mut z = vec![f.zero(); n];
    let mut zr = vec![f.zero(); n];
    nussbaumer::negacyclic(&mut z, &x, &y, &f);
    ref_negacyclic(n, &mut zr, &x, &y, &f);
    assert_eq!(z, zr);
}

#[test]
fn negacyclic_over_the_base_field() {
    // the algorithms only assume a field with a half(); run one size
    // directly over Fp to cover the non-extension path
    let f = Fp::<1>::new("2305843009213693951");
    let mut rng = EltRng::new(4);
    let n = 512;
    let x: Vec<_> = (0..n).map(|_| rng.next_fp(&f)).collect();
    let y: Vec<_> = (0..n).map(|_| rng.next_fp(&f)).collect();
    let mut z = vec![f.zero(); n];
    let mut zr = vec![f.zero(); n];
    nussbaumer::negacyclic(&mut z, &x, &y, &f);
    for k in 0..n {
        let mut s = f.zero();
        for j in 0..=k {
            f.add(&mut s, &f.mulf(x[j], &y[k - j]));
        }
        for j in k + 1..n {
            f.sub(&mut s, &f.mulf(x[j], &y[n + k - j]));
        }
        zr[k] = s;
    }
    assert_eq!(z, zr);
}
