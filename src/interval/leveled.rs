//! Down-set counting over the difference poset, organized by levels. The
//! poset is graded by member size, so a down-set is fixed by choosing, level
//! by level from the bottom, which elements to leave out; leaving one out
//! forces every superset out as well. The count branches over those choices
//! on the lowest level, multiplies across the connected pieces the poset
//! falls apart into, and memoizes on the surviving element set.

use std::collections::{BTreeSet, HashMap};

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::algebra::set::SmallSet;

pub(crate) type LevelMemo = HashMap<Vec<u16>, BigUint>;

/// Widest lowest level the subset branch enumerates directly. Wider levels
/// fall back to the two-way branch on a maximal element.
const LEVEL_BRANCH_LIMIT: usize = 6;

/// Number of down-sets of `poset` under the subset relation.
pub(crate) fn count_down_sets(poset: &BTreeSet<SmallSet>, memo: &mut LevelMemo) -> BigUint {
    if poset.is_empty() {
        return BigUint::one();
    }
    if poset.len() == 1 {
        return BigUint::from(2u32);
    }
    let key: Vec<u16> = poset.iter().map(|s| s.bits()).collect();
    if let Some(hit) = memo.get(&key) {
        return hit.clone();
    }
    let parts = components(poset);
    let count = if parts.len() > 1 {
        parts.iter().map(|p| count_down_sets(p, memo)).product()
    } else {
        branch_connected(poset, memo)
    };
    memo.insert(key, count.clone());
    count
}

/// Connected posets branch on the lowest level: every down-set keeps some
/// subset of the minimal-size elements and drops the rest, and each dropped
/// element evicts its supersets from the remainder.
fn branch_connected(poset: &BTreeSet<SmallSet>, memo: &mut LevelMemo) -> BigUint {
    let least = poset
        .iter()
        .map(|s| s.len())
        .min()
        .expect("connected posets are non-empty");
    let level: Vec<SmallSet> = poset
        .iter()
        .copied()
        .filter(|s| s.len() == least)
        .collect();
    if level.len() > LEVEL_BRANCH_LIMIT {
        return branch_on_maximal(poset, memo);
    }
    let rest: BTreeSet<SmallSet> = poset
        .iter()
        .copied()
        .filter(|s| s.len() != least)
        .collect();
    let mut total = BigUint::zero();
    for choice in 0u32..(1 << level.len()) {
        let dropped: Vec<SmallSet> = level
            .iter()
            .enumerate()
            .filter(|(i, _)| choice >> i & 1 == 1)
            .map(|(_, s)| *s)
            .collect();
        let surviving: BTreeSet<SmallSet> = rest
            .iter()
            .copied()
            .filter(|s| !dropped.iter().any(|t| t.is_subset_of(*s)))
            .collect();
        total += count_down_sets(&surviving, memo);
    }
    total
}

/// Two-way branch: down-sets either omit a maximal element or contain its
/// whole down-closure. A strict subset has a strictly smaller bit pattern,
/// so the numerically largest element is maximal.
fn branch_on_maximal(poset: &BTreeSet<SmallSet>, memo: &mut LevelMemo) -> BigUint {
    let Some(x) = poset.iter().next_back().copied() else {
        unreachable!("empty posets return early");
    };
    let mut without_x = poset.clone();
    without_x.remove(&x);
    let without_down: BTreeSet<SmallSet> = poset
        .iter()
        .copied()
        .filter(|s| !s.is_subset_of(x))
        .collect();
    count_down_sets(&without_x, memo) + count_down_sets(&without_down, memo)
}

/// Connected components under comparability.
fn components(poset: &BTreeSet<SmallSet>) -> Vec<BTreeSet<SmallSet>> {
    let elements: Vec<SmallSet> = poset.iter().copied().collect();
    let mut assigned = vec![usize::MAX; elements.len()];
    let mut parts: Vec<BTreeSet<SmallSet>> = Vec::new();
    for start in 0..elements.len() {
        if assigned[start] != usize::MAX {
            continue;
        }
        let id = parts.len();
        let mut part = BTreeSet::new();
        let mut stack = vec![start];
        assigned[start] = id;
        while let Some(i) = stack.pop() {
            part.insert(elements[i]);
            for j in 0..elements.len() {
                if assigned[j] == usize::MAX
                    && (elements[i].is_subset_of(elements[j])
                        || elements[j].is_subset_of(elements[i]))
                {
                    assigned[j] = id;
                    stack.push(j);
                }
            }
        }
        parts.push(part);
    }
    parts
}
