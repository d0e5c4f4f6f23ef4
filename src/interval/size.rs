//! Interval cardinality without enumeration. An antichain in `[bottom, top]`
//! is determined by the down-set it cuts out of the difference poset, so the
//! size is a down-set count, delegated to the leveled counter.

use std::collections::BTreeSet;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::algebra::antichain::AntiChain;
use crate::algebra::set::SmallSet;
use crate::interval::enumerate::AntiChainInterval;
use crate::interval::leveled::{count_down_sets, LevelMemo};

impl AntiChainInterval {
    /// Number of antichains in the interval, honoring the open/closed flags.
    pub fn size(&self) -> BigUint {
        if !self.bottom().le(self.top()) {
            return BigUint::zero();
        }
        if self.bottom() == self.top() {
            // A degenerate interval holds its one element only when both
            // ends are closed; either open flag excludes it.
            return if self.is_closed_below() && self.is_closed_above() {
                BigUint::one()
            } else {
                BigUint::zero()
            };
        }
        let mut total = closed_size(self.bottom(), self.top());
        if !self.is_closed_below() {
            total -= 1u32;
        }
        if !self.is_closed_above() {
            total -= 1u32;
        }
        total
    }
}

/// `|[bottom, top]|` for `bottom ≤ top`: the down-set count of the
/// difference poset of the bounds.
fn closed_size(bottom: &AntiChain, top: &AntiChain) -> BigUint {
    let poset = difference_poset(bottom, top);
    let mut memo = LevelMemo::new();
    count_down_sets(&poset, &mut memo)
}

/// The poset of sets below some top member but below no bottom member. Its
/// down-sets correspond one-to-one to the antichains of the closed interval.
fn difference_poset(bottom: &AntiChain, top: &AntiChain) -> BTreeSet<SmallSet> {
    let mut poset = BTreeSet::new();
    for member in top.members() {
        for s in member.subsets() {
            if !bottom.dominates(s) {
                poset.insert(s);
            }
        }
    }
    poset
}
