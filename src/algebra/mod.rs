//! Set and antichain algebra. Everything is an immutable value; lattice laws
//! do the rest.

pub mod antichain;
pub mod code;
pub mod lattice;
pub mod permutation;
pub mod set;

pub use antichain::{AntiChain, AntiChainBuilder};
pub use code::CodeError;
pub use lattice::{BoundedLattice, JoinSemilattice, MeetSemilattice};
pub use permutation::{permutations_of, Permutation, Permutations};
pub use set::{SetError, SmallSet, WideSet, MAX_ELEMENT};
