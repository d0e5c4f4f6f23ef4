//! Antichains of finite sets: no member contains another. Immutable values;
//! construction goes through [`AntiChainBuilder`] so the invariant holds
//! after every insert.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::collections::BTreeSet;

use super::lattice::{JoinSemilattice, MeetSemilattice};
use super::set::SmallSet;

/// An antimonotonic function over a bounded universe, represented by its
/// maximal sets. Members iterate in canonical (encoding) order.
#[derive(Debug, Clone)]
pub struct AntiChain {
    members: BTreeSet<SmallSet>,
    universe: SmallSet,
}

impl AntiChain {
    /// The empty function: no member at all, the lattice bottom.
    pub fn empty(universe: SmallSet) -> AntiChain {
        AntiChain {
            members: BTreeSet::new(),
            universe,
        }
    }

    /// The function containing only the empty set, one step above bottom.
    pub fn empty_set_function(universe: SmallSet) -> AntiChain {
        let mut members = BTreeSet::new();
        members.insert(SmallSet::EMPTY);
        AntiChain { members, universe }
    }

    /// The lattice top on `universe`: the single member `universe` itself.
    pub fn universe_function(universe: SmallSet) -> AntiChain {
        let mut members = BTreeSet::new();
        members.insert(universe);
        AntiChain { members, universe }
    }

    /// Antichain with a single member set.
    pub fn of_member(member: SmallSet, universe: SmallSet) -> AntiChain {
        debug_assert!(member.is_subset_of(universe));
        let mut members = BTreeSet::new();
        members.insert(member);
        AntiChain { members, universe }
    }

    /// Reduce an arbitrary family of sets to its maximal members.
    pub fn from_sets<I: IntoIterator<Item = SmallSet>>(sets: I, universe: SmallSet) -> AntiChain {
        let mut b = AntiChainBuilder::new(universe);
        for s in sets {
            b.insert(s);
        }
        b.build()
    }

    #[inline]
    pub fn universe(&self) -> SmallSet {
        self.universe
    }

    /// Same members, re-bounded to a wider universe.
    pub fn with_universe(&self, universe: SmallSet) -> AntiChain {
        debug_assert!(self.span().is_subset_of(universe));
        AntiChain {
            members: self.members.clone(),
            universe,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> impl Iterator<Item = SmallSet> + '_ {
        self.members.iter().copied()
    }

    #[inline]
    pub fn contains_member(&self, s: SmallSet) -> bool {
        self.members.contains(&s)
    }

    /// Union of all members.
    pub fn span(&self) -> SmallSet {
        self.members
            .iter()
            .fold(SmallSet::EMPTY, |acc, m| acc.union(*m))
    }

    /// Size of the smallest member, or None for the empty function.
    pub fn min_member_size(&self) -> Option<u32> {
        self.members.iter().map(|m| m.len()).min()
    }

    /// Does some member of `self` contain `s`?
    pub fn dominates(&self, s: SmallSet) -> bool {
        self.members.iter().any(|m| s.is_subset_of(*m))
    }

    /// Antichain order: every member of `self` below some member of `other`.
    pub fn le(&self, other: &AntiChain) -> bool {
        self.members.iter().all(|m| other.dominates(*m))
    }

    pub fn ge(&self, other: &AntiChain) -> bool {
        other.le(self)
    }

    pub fn lt(&self, other: &AntiChain) -> bool {
        self.le(other) && self != other
    }

    pub fn gt(&self, other: &AntiChain) -> bool {
        other.lt(self)
    }

    /// Lattice join: union of members, dominated ones evicted.
    pub fn plus(&self, other: &AntiChain) -> AntiChain {
        let universe = self.universe.union(other.universe);
        let mut b = AntiChainBuilder::with_members(self.members.clone(), universe);
        for m in other.members() {
            b.insert(m);
        }
        b.build()
    }

    /// Lattice meet: all pairwise intersections, reduced.
    pub fn dot(&self, other: &AntiChain) -> AntiChain {
        let universe = self.universe.union(other.universe);
        let mut b = AntiChainBuilder::new(universe);
        for x in self.members() {
            for y in other.members() {
                b.insert(x.intersection(y));
            }
        }
        b.build()
    }

    /// Generalized product: the largest antichain whose projection on either
    /// operand's span stays below that operand.
    ///
    /// Empty-operand cases follow the reference behavior exactly: an empty
    /// operand yields the *other* operand, except when both spans are empty
    /// the result is empty. Not derivable from the general formula.
    pub fn times(&self, other: &AntiChain) -> AntiChain {
        let universe = self.universe.union(other.universe);
        if self.is_empty() || other.is_empty() {
            if self.span().is_empty() && other.span().is_empty() {
                return AntiChain::empty(universe);
            }
            let survivor = if self.is_empty() { other } else { self };
            return survivor.with_universe(universe);
        }
        let sp_left = self.span();
        let sp_right = other.span();
        let mut b = AntiChainBuilder::new(universe);
        for x in self.members() {
            for y in other.members() {
                b.insert(x.minus(sp_right).union(y.minus(sp_left)).union(x.intersection(y)));
            }
        }
        b.build()
    }

    /// Every member raised by one extra element. Used by the fast interval
    /// iterator to rebuild `X0 ∨ (X1 × {{m}})` without tripping the `times`
    /// empty-operand cases: an empty antichain lifts to itself.
    pub fn lift(&self, element: u8) -> AntiChain {
        debug_assert!(!self.span().contains(element));
        let single = SmallSet::singleton(element).expect("element within capacity");
        let members = self.members.iter().map(|m| m.union(single)).collect();
        AntiChain {
            members,
            universe: self.universe.union(single),
        }
    }

    /// Dual with respect to this antichain's universe:
    /// `sup{A | ∀ k ∈ self: universe∖k ⊄ A}`. An involution.
    pub fn dual(&self) -> AntiChain {
        self.dual_of(self.universe)
    }

    /// Dual with respect to an explicit universe. The span must fit it.
    pub fn dual_of(&self, universe: SmallSet) -> AntiChain {
        debug_assert!(self.span().is_subset_of(universe));
        let n = universe;
        let mut current: BTreeSet<SmallSet> = BTreeSet::new();
        current.insert(n);
        for k in self.members() {
            let complement = n.minus(k);
            let mut b = AntiChainBuilder::new(n);
            for a in current {
                if !complement.is_subset_of(a) {
                    b.insert(a);
                } else {
                    for i in complement.iter() {
                        b.insert(a.without(i));
                    }
                }
            }
            current = b.into_members();
        }
        AntiChain {
            members: current,
            universe: n,
        }
    }

    /// Members cut down to `onto`, reduced. The projection onto a sub-span.
    pub fn project(&self, onto: SmallSet) -> AntiChain {
        let mut b = AntiChainBuilder::new(self.universe);
        for m in self.members() {
            b.insert(m.intersection(onto));
        }
        b.build()
    }

    /// The largest antichain on `universe` whose meet with `alfa` is `tau`.
    /// Requires `tau ≤ alfa`; an empty `tau` has no such antichain except
    /// the empty one.
    pub fn omicron(tau: &AntiChain, alfa: &AntiChain, universe: SmallSet) -> AntiChain {
        debug_assert!(tau.le(alfa), "omicron requires tau <= alfa");
        if tau.is_empty() {
            return AntiChain::empty(universe);
        }
        let extra = universe.minus(alfa.span());
        let members = tau.members.iter().map(|m| m.union(extra)).collect();
        AntiChain { members, universe }
    }

    /// Decomposition by the element `m`: `(projection deleting m, members
    /// that carried m, with m removed)`. Any antichain equals
    /// `a0.plus(&a1.lift(m))` with `a1 ≤ a0` for its own decomposition.
    pub fn reduce(&self, m: u8) -> (AntiChain, AntiChain) {
        let sub_universe = self.universe.without(m);
        let mut projected = AntiChainBuilder::new(sub_universe);
        let mut carried = AntiChainBuilder::new(sub_universe);
        for s in self.members() {
            projected.insert(s.without(m));
            if s.contains(m) {
                carried.insert(s.without(m));
            }
        }
        (projected.build(), carried.build())
    }

    /// Least upper bound of a family. Empty family gives bottom.
    pub fn sup<'a, I: IntoIterator<Item = &'a AntiChain>>(family: I, universe: SmallSet) -> AntiChain {
        family
            .into_iter()
            .fold(AntiChain::empty(universe), |acc, x| acc.plus(x))
    }

    /// Greatest lower bound of a family. Empty family gives top.
    pub fn inf<'a, I: IntoIterator<Item = &'a AntiChain>>(family: I, universe: SmallSet) -> AntiChain {
        family
            .into_iter()
            .fold(AntiChain::universe_function(universe), |acc, x| acc.dot(x))
    }

    /// Antichain invariant: no member below another. Cheap enough to assert
    /// in tests; always true for values built through the builder.
    pub fn is_antichain(&self) -> bool {
        for a in self.members() {
            for b in self.members() {
                if a != b && a.is_subset_of(b) {
                    return false;
                }
            }
        }
        true
    }
}

// Equality and order ignore the universe bound: two antichains are the same
// function iff they have the same member sets.
impl PartialEq for AntiChain {
    fn eq(&self, other: &AntiChain) -> bool {
        self.members == other.members
    }
}

impl Eq for AntiChain {}

impl Hash for AntiChain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for m in &self.members {
            m.hash(state);
        }
    }
}

impl PartialOrd for AntiChain {
    fn partial_cmp(&self, other: &AntiChain) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AntiChain {
    fn cmp(&self, other: &AntiChain) -> Ordering {
        self.members.iter().cmp(other.members.iter())
    }
}

impl JoinSemilattice for AntiChain {
    fn join(&self, other: &Self) -> Self {
        self.plus(other)
    }

    fn leq(&self, other: &Self) -> bool {
        self.le(other)
    }
}

impl MeetSemilattice for AntiChain {
    fn meet(&self, other: &Self) -> Self {
        self.dot(other)
    }
}

impl fmt::Display for AntiChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, m) in self.members().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{m}")?;
        }
        write!(f, "}}")
    }
}

/// Accumulates conditional inserts, then freezes into an [`AntiChain`].
/// Insertion discards a dominated candidate and evicts members the candidate
/// dominates, so the antichain invariant holds after every step.
#[derive(Debug, Clone)]
pub struct AntiChainBuilder {
    members: BTreeSet<SmallSet>,
    universe: SmallSet,
}

impl AntiChainBuilder {
    pub fn new(universe: SmallSet) -> AntiChainBuilder {
        AntiChainBuilder {
            members: BTreeSet::new(),
            universe,
        }
    }

    fn with_members(members: BTreeSet<SmallSet>, universe: SmallSet) -> AntiChainBuilder {
        AntiChainBuilder { members, universe }
    }

    /// Conditional insert. Returns false when the candidate was dominated.
    pub fn insert(&mut self, candidate: SmallSet) -> bool {
        debug_assert!(candidate.is_subset_of(self.universe));
        if self.members.iter().any(|m| candidate.is_subset_of(*m)) {
            return false;
        }
        let evicted: Vec<SmallSet> = self
            .members
            .iter()
            .copied()
            .filter(|m| m.is_subset_of(candidate))
            .collect();
        for m in evicted {
            self.members.remove(&m);
        }
        self.members.insert(candidate);
        true
    }

    pub fn build(self) -> AntiChain {
        AntiChain {
            members: self.members,
            universe: self.universe,
        }
    }

    fn into_members(self) -> BTreeSet<SmallSet> {
        self.members
    }
}
