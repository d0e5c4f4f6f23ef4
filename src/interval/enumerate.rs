//! Interval enumeration. Divide and conquer over the span: split, enumerate
//! the projected sub-intervals, recombine through plus/times/dot. The fast
//! iterator instead peels the largest span element and rebuilds candidates
//! from the two-part decomposition.

use std::iter;

use crate::algebra::antichain::AntiChain;
use crate::algebra::set::SmallSet;

/// A closed-or-open slab of the antichain lattice between two bounds.
/// Non-empty intervals keep `bottom ≤ top`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntiChainInterval {
    bottom: AntiChain,
    top: AntiChain,
    closed_below: bool,
    closed_above: bool,
}

type BoxedIter = Box<dyn Iterator<Item = AntiChain>>;

impl AntiChainInterval {
    pub fn closed(bottom: AntiChain, top: AntiChain) -> AntiChainInterval {
        AntiChainInterval {
            bottom,
            top,
            closed_below: true,
            closed_above: true,
        }
    }

    pub fn with_bounds(
        bottom: AntiChain,
        top: AntiChain,
        closed_below: bool,
        closed_above: bool,
    ) -> AntiChainInterval {
        AntiChainInterval {
            bottom,
            top,
            closed_below,
            closed_above,
        }
    }

    pub fn bottom(&self) -> &AntiChain {
        &self.bottom
    }

    pub fn top(&self) -> &AntiChain {
        &self.top
    }

    pub fn is_closed_below(&self) -> bool {
        self.closed_below
    }

    pub fn is_closed_above(&self) -> bool {
        self.closed_above
    }

    /// Whether `x` lies in the interval, honoring the boundary flags.
    pub fn contains(&self, x: &AntiChain) -> bool {
        if !(self.bottom.le(x) && x.le(&self.top)) {
            return false;
        }
        (self.closed_below || *x != self.bottom) && (self.closed_above || *x != self.top)
    }

    /// Lazy, finite, non-restartable walk of every antichain in the
    /// interval. Complete and duplicate-free; the order is unspecified.
    pub fn iter(&self) -> BoxedIter {
        self.filtered(enumerate_closed(self.bottom.clone(), self.top.clone()))
    }

    /// Same set as [`AntiChainInterval::iter`], produced by the
    /// largest-element decomposition. Roughly a quarter of the lattice
    /// operations on typical intervals; the order differs.
    pub fn fast_iter(&self) -> BoxedIter {
        self.filtered(fast_closed(self.bottom.clone(), self.top.clone()))
    }

    fn filtered(&self, inner: BoxedIter) -> BoxedIter {
        let skip_bottom = (!self.closed_below).then(|| self.bottom.clone());
        let skip_top = (!self.closed_above).then(|| self.top.clone());
        if skip_bottom.is_none() && skip_top.is_none() {
            return inner;
        }
        Box::new(inner.filter(move |x| {
            skip_bottom.as_ref() != Some(x) && skip_top.as_ref() != Some(x)
        }))
    }
}

fn empty_iter() -> BoxedIter {
    Box::new(iter::empty())
}

/// The general recursive enumeration of the closed interval `[bottom, top]`.
fn enumerate_closed(bottom: AntiChain, top: AntiChain) -> BoxedIter {
    if !bottom.le(&top) {
        return empty_iter();
    }
    if bottom == top {
        return Box::new(iter::once(bottom));
    }
    // Lift an empty bottom one step so every antichain below has a member;
    // the split arguments rely on that.
    if bottom.is_empty() {
        let raised = AntiChain::empty_set_function(top.universe());
        return Box::new(iter::once(bottom).chain(enumerate_closed(raised, top)));
    }
    let span = top.span();
    if span.len() <= 1 {
        return small_span(bottom, top, span);
    }
    if is_irreducible_pair(&bottom, &top, span) {
        return Box::new([bottom, top].into_iter());
    }
    let (p1, p2) = best_split(&bottom, &top, span);
    let left: Vec<AntiChain> =
        enumerate_closed(bottom.project(p1), top.project(p1)).collect();
    let bottom2 = bottom.project(p2);
    let top2 = top.project(p2);
    Box::new(left.into_iter().flat_map(move |x| {
        let bottom = bottom.clone();
        let top = top.clone();
        enumerate_closed(bottom2.clone(), top2.clone()).flat_map(move |y| {
            enumerate_closed(x.plus(&y).plus(&bottom), x.times(&y).dot(&top))
        })
    }))
}

/// Spans of size 0 or 1 leave at most three candidates; filter them.
fn small_span(bottom: AntiChain, top: AntiChain, span: SmallSet) -> BoxedIter {
    let universe = top.universe();
    let mut candidates = vec![
        AntiChain::empty(universe),
        AntiChain::empty_set_function(universe),
    ];
    if let Some(e) = span.largest() {
        let singleton = SmallSet::from_bits(1 << (e - 1));
        candidates.push(AntiChain::of_member(singleton, universe));
    }
    Box::new(
        candidates
            .into_iter()
            .filter(move |c| bottom.le(c) && c.le(&top)),
    )
}

/// Bottom is the full rim of (s−1)-subsets under a single-member top: the
/// interval holds exactly its two endpoints and no split can separate them.
fn is_irreducible_pair(bottom: &AntiChain, top: &AntiChain, span: SmallSet) -> bool {
    top.member_count() == 1
        && bottom.span() == span
        && bottom.member_count() == span.len() as usize
        && bottom.min_member_size() == Some(span.len() - 1)
}

/// Partition the span so both projected sub-intervals are strictly smaller.
/// The chosen part is never fully dominated by the bottom, which guarantees
/// the sub-interval on it has at least two elements.
fn best_split(bottom: &AntiChain, top: &AntiChain, span: SmallSet) -> (SmallSet, SmallSet) {
    let target = span.len() as i64;
    let mut best: Option<(i64, SmallSet)> = None;
    let mut consider = |candidate: SmallSet| {
        let badness = (2 * candidate.len() as i64 - target).abs();
        match best {
            Some((b, _)) if b <= badness => {}
            _ => best = Some((badness, candidate)),
        }
    };
    if top.member_count() > 1 {
        for m in top.members() {
            if !bottom.dominates(m) {
                consider(m);
            }
        }
    } else {
        // Single-member top: exhaustive subset search over the span.
        for s in span.subsets() {
            if !s.is_empty() && s != span && !bottom.dominates(s) {
                consider(s);
            }
        }
    }
    let (_, p1) = best.expect("degenerate intervals are handled before splitting");
    (p1, span.minus(p1))
}

/// Fast enumeration of the closed interval: peel the largest span element,
/// enumerate the reduced interval, and rebuild with the join/lift identity.
fn fast_closed(bottom: AntiChain, top: AntiChain) -> BoxedIter {
    if !bottom.le(&top) {
        return empty_iter();
    }
    if bottom == top {
        return Box::new(iter::once(bottom));
    }
    let span = top.span();
    let m = match span.largest() {
        Some(m) => m,
        None => return small_span(bottom, top, span),
    };
    let (t0, t1) = top.reduce(m);
    let (b0, b1) = bottom.reduce(m);
    Box::new(fast_closed(b0, t0).flat_map(move |x0| {
        let inner_top = t1.dot(&x0);
        fast_closed(b1.clone(), inner_top).map(move |x1| x0.plus(&x1.lift(m)))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn set(elements: &[u8]) -> SmallSet {
        SmallSet::from_elements(elements.iter().copied()).unwrap()
    }

    fn ac(members: &[&[u8]], universe: &[u8]) -> AntiChain {
        AntiChain::from_sets(members.iter().map(|m| set(m)), set(universe))
    }

    fn full_lattice(n: u8) -> AntiChainInterval {
        let u = SmallSet::universe(n).unwrap();
        AntiChainInterval::closed(AntiChain::empty(u), AntiChain::universe_function(u))
    }

    fn collect_sorted(it: BoxedIter) -> Vec<AntiChain> {
        let mut v: Vec<AntiChain> = it.collect();
        v.sort();
        v
    }

    #[test]
    fn empty_interval() {
        let b = ac(&[&[1, 2]], &[1, 2]);
        let t = ac(&[&[1]], &[1, 2]);
        assert_eq!(AntiChainInterval::closed(b, t).iter().count(), 0);
    }

    #[test]
    fn singleton_interval() {
        let a = ac(&[&[1], &[2]], &[1, 2]);
        let got: Vec<AntiChain> = AntiChainInterval::closed(a.clone(), a.clone()).iter().collect();
        assert_eq!(got, vec![a]);
    }

    #[test]
    fn full_lattices_have_dedekind_counts() {
        // |[⊥, ⊤]| on n elements is the Dedekind number D(n).
        assert_eq!(full_lattice(0).iter().count(), 2);
        assert_eq!(full_lattice(1).iter().count(), 3);
        assert_eq!(full_lattice(2).iter().count(), 6);
        assert_eq!(full_lattice(3).iter().count(), 20);
        assert_eq!(full_lattice(4).iter().count(), 168);
    }

    #[test]
    fn fast_iter_matches_general_iter() {
        for n in 0..=4u8 {
            let interval = full_lattice(n);
            let slow = collect_sorted(interval.iter());
            let fast = collect_sorted(interval.fast_iter());
            assert_eq!(slow, fast);
        }
        let b = ac(&[&[1], &[2]], &[1, 2, 3]);
        let t = ac(&[&[1, 2], &[1, 3], &[2, 3]], &[1, 2, 3]);
        let interval = AntiChainInterval::closed(b, t);
        assert_eq!(collect_sorted(interval.iter()), collect_sorted(interval.fast_iter()));
    }

    #[test]
    fn no_duplicates_and_all_within_bounds() {
        let b = AntiChain::empty_set_function(set(&[1, 2, 3]));
        let t = AntiChain::universe_function(set(&[1, 2, 3]));
        let interval = AntiChainInterval::closed(b.clone(), t.clone());
        let mut seen = BTreeSet::new();
        for x in interval.iter() {
            assert!(b.le(&x) && x.le(&t));
            assert!(x.is_antichain());
            assert!(seen.insert(x.encode()), "duplicate antichain enumerated");
        }
        assert_eq!(seen.len(), 19); // D(3) minus the empty function
    }

    #[test]
    fn single_member_top_splits_exhaustively() {
        // Bottom of singletons forces the subset-search split; the interval
        // is every full-span antichain on three elements, nine in all.
        let b = ac(&[&[1], &[2], &[3]], &[1, 2, 3]);
        let t = ac(&[&[1, 2, 3]], &[1, 2, 3]);
        let interval = AntiChainInterval::closed(b, t);
        let got = collect_sorted(interval.iter());
        assert_eq!(got.len(), 9);
        assert_eq!(got, collect_sorted(interval.fast_iter()));
        for x in &got {
            assert_eq!(x.span(), set(&[1, 2, 3]));
        }
    }

    #[test]
    fn irreducible_two_element_interval() {
        let b = ac(&[&[1, 2], &[1, 3], &[2, 3]], &[1, 2, 3]);
        let t = ac(&[&[1, 2, 3]], &[1, 2, 3]);
        let got = collect_sorted(AntiChainInterval::closed(b.clone(), t.clone()).iter());
        assert_eq!(got, collect_sorted(Box::new([b, t].into_iter())));
    }

    #[test]
    fn contains_honors_boundary_flags() {
        let b = AntiChain::empty(set(&[1, 2]));
        let t = AntiChain::universe_function(set(&[1, 2]));
        let mid = ac(&[&[1]], &[1, 2]);
        let closed = AntiChainInterval::closed(b.clone(), t.clone());
        assert!(closed.contains(&b) && closed.contains(&mid) && closed.contains(&t));
        let open = AntiChainInterval::with_bounds(b.clone(), t.clone(), false, false);
        assert!(!open.contains(&b) && open.contains(&mid) && !open.contains(&t));
        let outside = ac(&[&[1, 2, 3]], &[1, 2, 3]);
        assert!(!closed.contains(&outside));
    }

    #[test]
    fn iterators_yield_exactly_the_contained_antichains() {
        let all = full_lattice(2);
        let b = AntiChain::empty_set_function(set(&[1, 2]));
        let t = AntiChain::universe_function(set(&[1, 2]));
        for (below, above) in [(true, true), (true, false), (false, true), (false, false)] {
            let interval = AntiChainInterval::with_bounds(b.clone(), t.clone(), below, above);
            let walked: BTreeSet<AntiChain> = interval.iter().collect();
            for x in all.iter() {
                assert_eq!(walked.contains(&x), interval.contains(&x), "{x}");
            }
        }
    }

    #[test]
    fn open_bounds_drop_endpoints() {
        let b = AntiChain::empty(set(&[1, 2]));
        let t = AntiChain::universe_function(set(&[1, 2]));
        let closed = AntiChainInterval::closed(b.clone(), t.clone());
        assert_eq!(closed.iter().count(), 6);
        let half_open = AntiChainInterval::with_bounds(b.clone(), t.clone(), true, false);
        assert_eq!(half_open.iter().count(), 5);
        let open = AntiChainInterval::with_bounds(b, t, false, false);
        assert_eq!(open.iter().count(), 4);
        for x in open.iter() {
            assert!(!x.is_empty());
        }
    }
}
