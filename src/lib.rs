//! Dedekind number computation over antichains of finite sets.
//!
//! The crate is layered the way the computation is: [`algebra`] holds the
//! set and antichain lattice with its canonical codes and permutation
//! symmetry, [`interval`] enumerates and counts slabs of that lattice,
//! [`classes`] folds the lattice into equivalence classes, and
//! [`aggregate`] streams the final sum through a bounded worker pool.

#![deny(unsafe_op_in_unsafe_fn)]

pub mod aggregate;
pub mod algebra;
pub mod classes;
pub mod interval;

/// Prelude for convenient imports of primary API types.
pub mod prelude {
    pub use crate::aggregate::{dedekind, pair_coefficient, TermPool, Totals};
    pub use crate::algebra::{AntiChain, AntiChainBuilder, SmallSet};
    pub use crate::classes::equivalence_classes;
    pub use crate::interval::AntiChainInterval;
}

// Re-export primary types at crate root for convenience.
pub use aggregate::{dedekind, DedekindError, PoolError, TermPool, Totals};
pub use algebra::{AntiChain, AntiChainBuilder, CodeError, SetError, SmallSet, MAX_ELEMENT};
pub use classes::{equivalence_classes, ClassMultiplicities};
pub use interval::AntiChainInterval;
