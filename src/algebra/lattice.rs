//! Lattice trait seam. Join = LUB, meet = GLB; laws are checked in tests.

use super::set::{SmallSet, WideSet, MAX_ELEMENT, WIDE_CAPACITY};

pub trait JoinSemilattice: Sized {
    fn join(&self, other: &Self) -> Self;
    fn leq(&self, other: &Self) -> bool;
}

pub trait MeetSemilattice: Sized {
    fn meet(&self, other: &Self) -> Self;
}

pub trait BoundedLattice: JoinSemilattice + MeetSemilattice {
    fn bottom() -> Self;
    fn top() -> Self;
}

impl JoinSemilattice for SmallSet {
    #[inline(always)]
    fn join(&self, other: &Self) -> Self {
        self.union(*other)
    }

    #[inline(always)]
    fn leq(&self, other: &Self) -> bool {
        self.is_subset_of(*other)
    }
}

impl MeetSemilattice for SmallSet {
    #[inline(always)]
    fn meet(&self, other: &Self) -> Self {
        self.intersection(*other)
    }
}

impl BoundedLattice for SmallSet {
    fn bottom() -> Self {
        SmallSet::EMPTY
    }

    fn top() -> Self {
        // MAX_ELEMENT never exceeds the word width.
        SmallSet::universe(MAX_ELEMENT).unwrap()
    }
}

impl JoinSemilattice for WideSet {
    #[inline(always)]
    fn join(&self, other: &Self) -> Self {
        self.union(*other)
    }

    #[inline(always)]
    fn leq(&self, other: &Self) -> bool {
        self.is_subset_of(*other)
    }
}

impl MeetSemilattice for WideSet {
    #[inline(always)]
    fn meet(&self, other: &Self) -> Self {
        self.intersection(*other)
    }
}

impl BoundedLattice for WideSet {
    fn bottom() -> Self {
        WideSet::EMPTY
    }

    fn top() -> Self {
        WideSet::universe(WIDE_CAPACITY).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_set_lattice_laws() {
        let a = SmallSet::from_elements([1, 4]).unwrap();
        let b = SmallSet::from_elements([2, 4]).unwrap();
        let c = SmallSet::from_elements([3]).unwrap();
        assert_eq!(a.join(&b), b.join(&a));
        assert_eq!(a.join(&b).join(&c), a.join(&b.join(&c)));
        assert_eq!(a.join(&a), a);
        assert_eq!(a.meet(&a), a);
        assert!(a.leq(&a.join(&b)));
        assert!(a.meet(&b).leq(&a));
        assert!(SmallSet::bottom().leq(&a));
        assert!(a.leq(&SmallSet::top()));
    }

    #[test]
    fn wide_set_lattice_laws() {
        let a = WideSet::singleton(17)
            .unwrap()
            .union(WideSet::singleton(250).unwrap());
        let b = WideSet::singleton(250).unwrap();
        assert_eq!(a.join(&b), b.join(&a));
        assert_eq!(a.join(&a), a);
        assert!(b.leq(&a));
        assert!(a.meet(&b).leq(&a));
        assert!(WideSet::bottom().leq(&a));
        assert!(a.leq(&WideSet::top()));
    }

    #[test]
    fn absorption() {
        let a = SmallSet::from_elements([1, 2]).unwrap();
        let b = SmallSet::from_elements([2, 3]).unwrap();
        assert_eq!(a.join(&a.meet(&b)), a);
        assert_eq!(a.meet(&a.join(&b)), a);
    }
}
