//! Equivalence classes of antichains under permutation of the underlying
//! elements, built inductively one element at a time. Level `k` holds one
//! canonical representative per orbit together with the orbit size, so later
//! stages sum over representatives instead of the whole lattice.

use std::collections::BTreeMap;

use num_bigint::BigUint;

use crate::algebra::antichain::AntiChain;
use crate::algebra::set::{SetError, SmallSet};
use crate::interval::AntiChainInterval;

/// Canonical code of a representative mapped to the size of its orbit.
pub type ClassMultiplicities = BTreeMap<BigUint, u64>;

/// Orbit representatives with multiplicities for every level `0..=n`.
///
/// Level 0 holds the two antichains on no elements. Level `k` extends level
/// `k−1`: every antichain not using element `k` is inherited, and every one
/// that does lies in exactly one interval `[τ ∨ {{k}}, τ↑k]` for the
/// antichain τ it projects to on the elements below `k`. Interval elements
/// are first folded under the symmetry group of the interval bottom, then
/// the survivors are folded under the full permutation group.
pub fn equivalence_classes(n: u8) -> Result<Vec<ClassMultiplicities>, SetError> {
    Ok(class_representatives(n)?
        .iter()
        .map(encode_level)
        .collect())
}

pub(crate) fn class_representatives(
    n: u8,
) -> Result<Vec<BTreeMap<AntiChain, u64>>, SetError> {
    SmallSet::universe(n)?;
    let mut reps: BTreeMap<AntiChain, u64> = BTreeMap::new();
    reps.insert(AntiChain::empty(SmallSet::EMPTY), 1);
    reps.insert(AntiChain::empty_set_function(SmallSet::EMPTY), 1);
    let mut levels = vec![reps.clone()];
    for k in 1..=n {
        let universe = SmallSet::universe(k)?;
        let newcomer = AntiChain::of_member(SmallSet::singleton(k)?, universe);
        let mut next = reps.clone();
        for (tau, mult) in &reps {
            let tau = tau.with_universe(universe);
            let bottom = tau.plus(&newcomer);
            let top = tau.lift(k);
            if !bottom.le(&top) {
                continue;
            }
            let group = bottom.symmetry_group();
            let mut local: BTreeMap<AntiChain, u64> = BTreeMap::new();
            for x in AntiChainInterval::closed(bottom, top).fast_iter() {
                *local.entry(x.standard_under(&group)).or_insert(0) += 1;
            }
            for (x, count) in local {
                *next.entry(x.standard()).or_insert(0) += count * mult;
            }
        }
        reps = next;
        tracing::debug!(
            level = k,
            classes = reps.len(),
            "equivalence classes extended"
        );
        levels.push(reps.clone());
    }
    Ok(levels)
}

fn encode_level(reps: &BTreeMap<AntiChain, u64>) -> ClassMultiplicities {
    reps.iter().map(|(a, m)| (a.encode(), *m)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_total(level: &ClassMultiplicities) -> u64 {
        level.values().sum()
    }

    #[test]
    fn multiplicities_sum_to_dedekind_numbers() {
        let levels = equivalence_classes(4).unwrap();
        let expected = [2u64, 3, 6, 20, 168];
        for (level, want) in levels.iter().zip(expected) {
            assert_eq!(level_total(level), want);
        }
    }

    #[test]
    fn level_two_classes_are_known() {
        let levels = class_representatives(2).unwrap();
        let got: BTreeMap<String, u64> = levels[2]
            .iter()
            .map(|(a, m)| (a.to_string(), *m))
            .collect();
        let want: BTreeMap<String, u64> = [
            ("{}", 1),
            ("{[]}", 1),
            ("{[1]}", 2),
            ("{[1], [2]}", 1),
            ("{[1, 2]}", 1),
        ]
        .into_iter()
        .map(|(s, m)| (s.to_string(), m))
        .collect();
        assert_eq!(got, want);
    }

    #[test]
    fn representatives_are_canonical() {
        let levels = class_representatives(3).unwrap();
        for level in &levels {
            for rep in level.keys() {
                assert_eq!(rep.standard(), *rep);
            }
        }
    }

    #[test]
    fn earlier_levels_embed_into_later_ones() {
        let levels = class_representatives(3).unwrap();
        for k in 1..levels.len() {
            for (rep, mult) in &levels[k - 1] {
                assert!(levels[k].get(rep).is_some_and(|m| m >= mult));
            }
        }
    }
}
