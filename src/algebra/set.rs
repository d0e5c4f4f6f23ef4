//! Finite sets as bit vectors. Immutable: every op returns a new value.

use core::fmt;

use thiserror::Error;

/// Largest element the fast representation accepts.
pub const MAX_ELEMENT: u8 = 12;

/// Construction refused. The bit vector never truncates silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetError {
    /// Element outside 1..=capacity.
    #[error("element {element} outside 1..={capacity}")]
    ElementOutOfRange { element: u16, capacity: u16 },
}

/// Set over elements 1..=12, one bit per element. The workhorse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SmallSet {
    bits: u16,
}

impl SmallSet {
    pub const EMPTY: SmallSet = SmallSet { bits: 0 };

    /// The set {1, .., n}.
    pub fn universe(n: u8) -> Result<SmallSet, SetError> {
        if n > MAX_ELEMENT {
            return Err(SetError::ElementOutOfRange {
                element: n as u16,
                capacity: MAX_ELEMENT as u16,
            });
        }
        Ok(SmallSet {
            bits: (1u16 << n) - 1,
        })
    }

    pub fn singleton(element: u8) -> Result<SmallSet, SetError> {
        if element == 0 || element > MAX_ELEMENT {
            return Err(SetError::ElementOutOfRange {
                element: element as u16,
                capacity: MAX_ELEMENT as u16,
            });
        }
        Ok(SmallSet {
            bits: 1 << (element - 1),
        })
    }

    pub fn from_elements<I: IntoIterator<Item = u8>>(elements: I) -> Result<SmallSet, SetError> {
        let mut s = SmallSet::EMPTY;
        for e in elements {
            s = s.with(e)?;
        }
        Ok(s)
    }

    /// Raw constructor for in-crate use. Bits above `MAX_ELEMENT` are a
    /// caller bug; checked in debug builds.
    #[inline(always)]
    pub(crate) const fn from_bits(bits: u16) -> SmallSet {
        debug_assert!(bits < (1 << MAX_ELEMENT));
        SmallSet { bits }
    }

    #[inline(always)]
    pub(crate) const fn bits(self) -> u16 {
        self.bits
    }

    pub fn with(self, element: u8) -> Result<SmallSet, SetError> {
        Ok(self.union(SmallSet::singleton(element)?))
    }

    #[inline(always)]
    pub fn without(self, element: u8) -> SmallSet {
        if element == 0 || element > MAX_ELEMENT {
            return self;
        }
        SmallSet {
            bits: self.bits & !(1 << (element - 1)),
        }
    }

    #[inline(always)]
    pub const fn union(self, other: SmallSet) -> SmallSet {
        SmallSet {
            bits: self.bits | other.bits,
        }
    }

    #[inline(always)]
    pub const fn intersection(self, other: SmallSet) -> SmallSet {
        SmallSet {
            bits: self.bits & other.bits,
        }
    }

    #[inline(always)]
    pub const fn minus(self, other: SmallSet) -> SmallSet {
        SmallSet {
            bits: self.bits & !other.bits,
        }
    }

    #[inline(always)]
    pub const fn contains(self, element: u8) -> bool {
        element >= 1 && element <= MAX_ELEMENT && (self.bits >> (element - 1)) & 1 == 1
    }

    #[inline(always)]
    pub const fn is_subset_of(self, other: SmallSet) -> bool {
        self.bits & !other.bits == 0
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[inline(always)]
    pub const fn len(self) -> u32 {
        self.bits.count_ones()
    }

    /// Largest element, or None when empty.
    #[inline(always)]
    pub const fn largest(self) -> Option<u8> {
        if self.bits == 0 {
            None
        } else {
            Some(16 - self.bits.leading_zeros() as u8)
        }
    }

    /// Elements in ascending order.
    pub fn iter(self) -> Elements {
        Elements { bits: self.bits }
    }

    /// Every subset, the full set and the empty set included.
    pub fn subsets(self) -> Subsets {
        Subsets {
            mask: self.bits,
            next: Some(self.bits),
        }
    }
}

impl fmt::Display for SmallSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{e}")?;
        }
        write!(f, "]")
    }
}

/// Ascending element iterator over a `SmallSet`.
#[derive(Debug, Clone)]
pub struct Elements {
    bits: u16,
}

impl Iterator for Elements {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        if self.bits == 0 {
            return None;
        }
        let e = self.bits.trailing_zeros() as u8 + 1;
        self.bits &= self.bits - 1;
        Some(e)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

/// Submask walk: yields every subset of the mask exactly once, descending.
#[derive(Debug, Clone)]
pub struct Subsets {
    mask: u16,
    next: Option<u16>,
}

impl Iterator for Subsets {
    type Item = SmallSet;

    fn next(&mut self) -> Option<SmallSet> {
        let cur = self.next?;
        self.next = if cur == 0 {
            None
        } else {
            Some((cur - 1) & self.mask)
        };
        Some(SmallSet::from_bits(cur))
    }
}

/// Capacity of the wide representation.
pub const WIDE_CAPACITY: u16 = 256;

/// Wide variant for universes past the fast path. Same algebra, four words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WideSet {
    bits: [u64; 4],
}

impl WideSet {
    pub const EMPTY: WideSet = WideSet { bits: [0; 4] };

    pub fn singleton(element: u16) -> Result<WideSet, SetError> {
        if element == 0 || element > WIDE_CAPACITY {
            return Err(SetError::ElementOutOfRange {
                element,
                capacity: WIDE_CAPACITY,
            });
        }
        let idx = (element - 1) as usize;
        let mut bits = [0u64; 4];
        bits[idx >> 6] = 1 << (idx & 63);
        Ok(WideSet { bits })
    }

    pub fn universe(n: u16) -> Result<WideSet, SetError> {
        let mut s = WideSet::EMPTY;
        for e in 1..=n {
            s = s.union(WideSet::singleton(e)?);
        }
        Ok(s)
    }

    pub fn from_elements<I: IntoIterator<Item = u16>>(elements: I) -> Result<WideSet, SetError> {
        let mut s = WideSet::EMPTY;
        for e in elements {
            s = s.with(e)?;
        }
        Ok(s)
    }

    pub fn with(self, element: u16) -> Result<WideSet, SetError> {
        Ok(self.union(WideSet::singleton(element)?))
    }

    pub fn without(self, element: u16) -> WideSet {
        if element == 0 || element > WIDE_CAPACITY {
            return self;
        }
        let idx = (element - 1) as usize;
        let mut bits = self.bits;
        bits[idx >> 6] &= !(1 << (idx & 63));
        WideSet { bits }
    }

    #[inline]
    pub fn union(self, other: WideSet) -> WideSet {
        let mut bits = [0u64; 4];
        for i in 0..4 {
            bits[i] = self.bits[i] | other.bits[i];
        }
        WideSet { bits }
    }

    #[inline]
    pub fn intersection(self, other: WideSet) -> WideSet {
        let mut bits = [0u64; 4];
        for i in 0..4 {
            bits[i] = self.bits[i] & other.bits[i];
        }
        WideSet { bits }
    }

    #[inline]
    pub fn minus(self, other: WideSet) -> WideSet {
        let mut bits = [0u64; 4];
        for i in 0..4 {
            bits[i] = self.bits[i] & !other.bits[i];
        }
        WideSet { bits }
    }

    #[inline]
    pub fn is_subset_of(self, other: WideSet) -> bool {
        (0..4).all(|i| self.bits[i] & !other.bits[i] == 0)
    }

    #[inline]
    pub fn contains(self, element: u16) -> bool {
        if element == 0 || element > WIDE_CAPACITY {
            return false;
        }
        let idx = (element - 1) as usize;
        (self.bits[idx >> 6] >> (idx & 63)) & 1 == 1
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.bits == [0; 4]
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Largest element, or None when empty.
    pub fn largest(self) -> Option<u16> {
        for (i, w) in self.bits.iter().enumerate().rev() {
            if *w != 0 {
                return Some((i as u16) * 64 + 64 - w.leading_zeros() as u16);
            }
        }
        None
    }

    /// Elements in ascending order.
    pub fn iter(self) -> WideElements {
        WideElements {
            bits: self.bits,
            word: 0,
        }
    }
}

impl fmt::Display for WideSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{e}")?;
        }
        write!(f, "]")
    }
}

/// Ascending element iterator over a `WideSet`.
#[derive(Debug, Clone)]
pub struct WideElements {
    bits: [u64; 4],
    word: usize,
}

impl Iterator for WideElements {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        while self.word < 4 {
            let w = self.bits[self.word];
            if w == 0 {
                self.word += 1;
                continue;
            }
            let offset = w.trailing_zeros() as u16;
            self.bits[self.word] &= w - 1;
            return Some((self.word as u16) * 64 + offset + 1);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n: usize = self.bits[self.word..]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum();
        (n, Some(n))
    }
}
