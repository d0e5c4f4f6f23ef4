//! Relabeling symmetry. Permutations are values carrying forward and inverse
//! element maps; the generator yields an independent pair per step, exactly
//! n! of them for a span of size n.

use std::sync::OnceLock;

use super::antichain::AntiChain;
use super::set::{SmallSet, MAX_ELEMENT};

const MAP_LEN: usize = MAX_ELEMENT as usize + 1;

/// A relabeling of elements. Identity outside the span it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    forward: [u8; MAP_LEN],
    inverse: [u8; MAP_LEN],
}

impl Permutation {
    pub fn identity() -> Permutation {
        let mut forward = [0u8; MAP_LEN];
        for (e, slot) in forward.iter_mut().enumerate() {
            *slot = e as u8;
        }
        Permutation {
            forward,
            inverse: forward,
        }
    }

    /// Permutation sending `domain[i]` to `image[i]`. Both slices must list
    /// the same number of distinct elements and describe a bijection.
    fn from_mapping(domain: &[u8], image: &[u8]) -> Permutation {
        debug_assert_eq!(domain.len(), image.len());
        let mut p = Permutation::identity();
        for (&from, &to) in domain.iter().zip(image.iter()) {
            p.forward[from as usize] = to;
            p.inverse[to as usize] = from;
        }
        p
    }

    #[inline]
    pub fn map(&self, element: u8) -> u8 {
        self.forward[element as usize]
    }

    #[inline]
    pub fn unmap(&self, element: u8) -> u8 {
        self.inverse[element as usize]
    }

    pub fn apply_set(&self, s: SmallSet) -> SmallSet {
        let mut out = SmallSet::EMPTY;
        for e in s.iter() {
            out = out
                .with(self.map(e))
                .expect("permutation maps within capacity");
        }
        out
    }

    /// `self` after `other`: the composite sends `e` to
    /// `self.map(other.map(e))`.
    pub fn compose(&self, other: &Permutation) -> Permutation {
        let mut forward = [0u8; MAP_LEN];
        let mut inverse = [0u8; MAP_LEN];
        for e in 0..MAP_LEN {
            forward[e] = self.forward[other.forward[e] as usize];
            inverse[e] = other.inverse[self.inverse[e] as usize];
        }
        Permutation { forward, inverse }
    }

    pub fn inverted(&self) -> Permutation {
        Permutation {
            forward: self.inverse,
            inverse: self.forward,
        }
    }

    pub fn apply(&self, a: &AntiChain) -> AntiChain {
        // A bijection preserves incomparability, so the conditional inserts
        // in the rebuild never reject or evict a member.
        let members = a.members().map(|m| self.apply_set(m));
        AntiChain::from_sets(members, self.apply_set(a.universe().union(a.span())))
    }
}

/// Order-preserving permutation sending the span onto the initial segment
/// {1..k}; displaced elements shift upward to keep the map a bijection.
fn span_normalizer(span: SmallSet) -> Permutation {
    let mut domain: Vec<u8> = span.iter().collect();
    domain.extend((1..=MAX_ELEMENT).filter(|e| !span.contains(*e)));
    let image: Vec<u8> = (1..=MAX_ELEMENT).collect();
    Permutation::from_mapping(&domain, &image)
}

/// Lexicographic-successor generator over the rearrangements of a span.
#[derive(Debug, Clone)]
pub struct Permutations {
    domain: Vec<u8>,
    image: Option<Vec<u8>>,
}

/// All permutations of the elements of `span`. A span of size n yields
/// exactly n! values; the empty span yields the identity alone.
pub fn permutations_of(span: SmallSet) -> Permutations {
    let domain: Vec<u8> = span.iter().collect();
    let image = Some(domain.clone());
    Permutations { domain, image }
}

impl Iterator for Permutations {
    type Item = Permutation;

    fn next(&mut self) -> Option<Permutation> {
        let image = self.image.as_mut()?;
        let yielded = Permutation::from_mapping(&self.domain, image);
        // Advance to the lexicographic successor; stop after the last one.
        let n = image.len();
        let pivot = (0..n.saturating_sub(1)).rev().find(|&i| image[i] < image[i + 1]);
        match pivot {
            Some(i) => {
                let j = (i + 1..n)
                    .rev()
                    .find(|&j| image[j] > image[i])
                    .expect("successor exists");
                image.swap(i, j);
                image[i + 1..].reverse();
            }
            None => self.image = None,
        }
        Some(yielded)
    }
}

/// Widest initial segment whose permutations are kept in the shared table.
/// The tables up to 8! together hold under fifty thousand permutations.
const CACHED_SEGMENTS: usize = 8;

static SEGMENT_TABLES: OnceLock<Vec<Vec<Permutation>>> = OnceLock::new();

/// Shared table of all permutations of the initial segment {1..k}, built
/// once per process on first use. Wider segments are not cached.
fn segment_permutations(k: usize) -> Option<&'static [Permutation]> {
    if k > CACHED_SEGMENTS {
        return None;
    }
    let tables = SEGMENT_TABLES.get_or_init(|| {
        (0..=CACHED_SEGMENTS as u8)
            .map(|n| {
                let span = SmallSet::universe(n).expect("cached widths fit capacity");
                permutations_of(span).collect()
            })
            .collect()
    });
    Some(&tables[k])
}

impl AntiChain {
    /// Canonical representative: the span is renamed onto {1..k} and, over
    /// every permutation of that segment, the relabeling with the
    /// lexicographically smallest code wins. Ties broken by code order
    /// alone, so isomorphic antichains on any span share one standard form.
    pub fn standard(&self) -> AntiChain {
        let span = self.span();
        let normalized = span_normalizer(span).apply(self);
        if let Some(table) = segment_permutations(span.len() as usize) {
            return normalized.standard_under(table);
        }
        let segment = SmallSet::universe(span.len() as u8).expect("span within capacity");
        let mut best_code = normalized.encode();
        let mut best = normalized.clone();
        for p in permutations_of(segment) {
            let candidate = p.apply(&normalized);
            let code = candidate.encode();
            if code < best_code {
                best_code = code;
                best = candidate;
            }
        }
        best
    }

    /// Cheapest representative within a supplied subgroup. The input itself
    /// is always a candidate, so the result never exceeds the input's code.
    pub fn standard_under(&self, group: &[Permutation]) -> AntiChain {
        let mut best_code = self.encode();
        let mut best = self.clone();
        for p in group {
            let candidate = p.apply(self);
            let code = candidate.encode();
            if code < best_code {
                best_code = code;
                best = candidate;
            }
        }
        best
    }

    /// Exhaustive search for the permutations of the span that leave the
    /// code unchanged. The group used to deduplicate enumerations.
    pub fn symmetry_group(&self) -> Vec<Permutation> {
        let own = self.encode();
        permutations_of(self.span())
            .filter(|p| p.apply(self).encode() == own)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(elements: &[u8]) -> SmallSet {
        SmallSet::from_elements(elements.iter().copied()).unwrap()
    }

    fn ac(members: &[&[u8]], universe: &[u8]) -> AntiChain {
        AntiChain::from_sets(members.iter().map(|m| set(m)), set(universe))
    }

    #[test]
    fn generator_emits_factorial_many() {
        for n in 0u8..=4 {
            let span = SmallSet::universe(n).unwrap();
            let all: Vec<Permutation> = permutations_of(span).collect();
            let expected: usize = (1..=n as usize).product::<usize>().max(1);
            assert_eq!(all.len(), expected);
            // No repetitions.
            for (i, p) in all.iter().enumerate() {
                for q in &all[i + 1..] {
                    assert_ne!(p, q);
                }
            }
        }
    }

    #[test]
    fn compose_and_invert_behave_like_a_group() {
        let span = set(&[1, 2, 3]);
        let all: Vec<Permutation> = permutations_of(span).collect();
        for p in &all {
            assert_eq!(p.compose(&p.inverted()), Permutation::identity());
            for q in &all {
                let pq = p.compose(q);
                for e in span.iter() {
                    assert_eq!(pq.map(e), p.map(q.map(e)));
                }
                assert!(all.contains(&pq));
            }
        }
    }

    #[test]
    fn symmetry_groups_are_closed_under_composition() {
        let a = ac(&[&[1], &[2], &[3, 4]], &[1, 2, 3, 4]);
        let group = a.symmetry_group();
        for p in &group {
            assert!(group.contains(&p.inverted()));
            for q in &group {
                assert!(group.contains(&p.compose(q)));
            }
        }
    }

    #[test]
    fn apply_maps_members_one_to_one() {
        let a = ac(&[&[1, 2], &[3]], &[1, 2, 3]);
        for p in permutations_of(a.span()) {
            let image = p.apply(&a);
            assert_eq!(image.member_count(), a.member_count());
            assert!(image.is_antichain());
        }
    }

    #[test]
    fn segment_tables_cover_small_widths() {
        for k in 0..=4usize {
            let table = segment_permutations(k).unwrap();
            let expected: usize = (1..=k).product::<usize>().max(1);
            assert_eq!(table.len(), expected);
        }
        assert!(segment_permutations(CACHED_SEGMENTS + 1).is_none());
    }

    #[test]
    fn cached_standard_matches_streaming_minimum() {
        let a = ac(&[&[1, 3], &[2, 4], &[3, 4]], &[1, 2, 3, 4]);
        let streamed = permutations_of(a.span())
            .map(|p| p.apply(&a).encode())
            .min()
            .unwrap();
        assert_eq!(a.standard().encode(), streamed);
    }

    #[test]
    fn forward_inverse_agree() {
        let span = set(&[2, 5, 7]);
        for p in permutations_of(span) {
            for e in span.iter() {
                assert_eq!(p.unmap(p.map(e)), e);
            }
            // Identity outside the span.
            assert_eq!(p.map(1), 1);
            assert_eq!(p.map(9), 9);
        }
    }

    #[test]
    fn standard_is_idempotent() {
        let a = ac(&[&[2, 3], &[4]], &[2, 3, 4]);
        let s = a.standard();
        assert_eq!(s.standard(), s);
        assert!(s.encode() <= a.encode());
    }

    #[test]
    fn standard_merges_spans() {
        // {{2}} and {{1}} are the same function up to relabeling.
        let one = ac(&[&[1]], &[1]);
        let two = ac(&[&[2]], &[2]);
        assert_eq!(two.standard(), one.standard());
        assert_eq!(one.standard(), one);
    }

    #[test]
    fn standard_collapses_relabelings() {
        let a = ac(&[&[1], &[2, 3]], &[1, 2, 3]);
        for p in permutations_of(a.span()) {
            assert_eq!(p.apply(&a).standard(), a.standard());
        }
    }

    #[test]
    fn reserved_forms_are_fixed_points() {
        let empty = AntiChain::empty(SmallSet::EMPTY);
        let esf = AntiChain::empty_set_function(SmallSet::EMPTY);
        assert_eq!(empty.standard(), empty);
        assert_eq!(esf.standard(), esf);
    }

    #[test]
    fn symmetry_group_sizes() {
        // {{1},{2}} is invariant under both permutations of {1,2}.
        let sym = ac(&[&[1], &[2]], &[1, 2]);
        assert_eq!(sym.symmetry_group().len(), 2);
        // {{1},{2,3}} only under the identity and the 2<->3 swap.
        let partial = ac(&[&[1], &[2, 3]], &[1, 2, 3]);
        assert_eq!(partial.symmetry_group().len(), 2);
    }

    #[test]
    fn subgroup_then_full_canonicalization_matches_direct() {
        let a = ac(&[&[1, 2], &[3]], &[1, 2, 3]);
        let group = a.symmetry_group();
        for p in permutations_of(a.span()) {
            let x = p.apply(&a);
            assert_eq!(x.standard_under(&group).standard(), x.standard());
        }
    }
}
