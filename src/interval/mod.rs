//! Intervals of the antichain lattice: lazy enumeration and exact counting.

pub mod enumerate;
pub(crate) mod leveled;
pub mod size;

pub use enumerate::AntiChainInterval;
