//! Canonical integer codes. Each member is a run of nibble-encoded elements
//! closed by a zero nibble; two reserved codes cover the functions with no
//! nonempty member. The code doubles as the total order for deduplication
//! and as the canonicalization target.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use thiserror::Error;

use super::antichain::{AntiChain, AntiChainBuilder};
use super::set::SmallSet;

/// Rejected code. Codes are produced by [`AntiChain::encode`]; anything else
/// is reported, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodeError {
    /// A zero nibble closed a run with no elements in it.
    #[error("empty member group in code")]
    EmptyMemberGroup,
    /// Elements of a member must be distinct and ascending.
    #[error("member elements not strictly ascending")]
    ElementsOutOfOrder,
    /// A nibble exceeded the fast-path capacity.
    #[error("element nibble outside 1..=12")]
    ElementOutOfRange,
    /// The code did not end on a member separator.
    #[error("missing trailing member separator")]
    MissingSeparator,
    /// Member groups were comparable; a code always names an antichain.
    #[error("member groups do not form an antichain")]
    NotAnAntichain,
}

impl AntiChain {
    /// Canonical arbitrary-precision code. Zero encodes the empty function,
    /// one the empty-set function; everything else packs members in
    /// iteration order.
    pub fn encode(&self) -> BigUint {
        if self.is_empty() {
            return BigUint::zero();
        }
        if self.member_count() == 1 && self.contains_member(SmallSet::EMPTY) {
            return BigUint::one();
        }
        let mut code = BigUint::zero();
        for member in self.members() {
            for element in member.iter() {
                code = (code << 4u8) + BigUint::from(element);
            }
            code <<= 4u8; // member separator
        }
        code
    }

    /// Inverse of [`AntiChain::encode`]. The decoded universe is the span.
    pub fn decode(code: &BigUint) -> Result<AntiChain, CodeError> {
        if code.is_zero() {
            return Ok(AntiChain::empty(SmallSet::EMPTY));
        }
        if code.is_one() {
            return Ok(AntiChain::empty_set_function(SmallSet::EMPTY));
        }
        let nibbles = code.to_radix_be(16);
        if *nibbles.last().expect("nonzero code has digits") != 0 {
            return Err(CodeError::MissingSeparator);
        }
        let mut groups: Vec<SmallSet> = Vec::new();
        let mut current = SmallSet::EMPTY;
        let mut previous: u8 = 0;
        for &nibble in &nibbles {
            if nibble == 0 {
                if current.is_empty() {
                    return Err(CodeError::EmptyMemberGroup);
                }
                groups.push(current);
                current = SmallSet::EMPTY;
                previous = 0;
            } else {
                if nibble > super::set::MAX_ELEMENT {
                    return Err(CodeError::ElementOutOfRange);
                }
                if nibble <= previous {
                    return Err(CodeError::ElementsOutOfOrder);
                }
                current = current.with(nibble).expect("nibble checked in range");
                previous = nibble;
            }
        }
        let span = groups.iter().fold(SmallSet::EMPTY, |acc, s| acc.union(*s));
        let mut b = AntiChainBuilder::new(span);
        for g in &groups {
            b.insert(*g);
        }
        let decoded = b.build();
        if decoded.member_count() != groups.len() {
            return Err(CodeError::NotAnAntichain);
        }
        Ok(decoded)
    }
}
