// Field arithmetic module

mod fp;
mod fp2;
mod nat;
mod traits;

pub use fp::{Fp, FpElt, ReduceScale};
pub use fp2::{Fp2, Fp2Elt};
pub use nat::{inv_mod_b, Nat};
pub use traits::Field;
