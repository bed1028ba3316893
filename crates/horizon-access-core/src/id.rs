//! Node identity.

use std::fmt;

/// The identifier of a node within one accessibility tree.
///
/// A `NodeId` is a 128-bit value chosen by whoever produces the node. It
/// must be unique within the tree that contains it and is otherwise opaque:
/// no ordering or structure is implied by its bit pattern.
///
/// Across the binding boundary the value travels as two 64-bit halves,
/// see [`NodeId::from_parts`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct NodeId(u128);

static_assertions::assert_eq_size!(NodeId, u128);

impl NodeId {
    /// Create an identifier from its low and high 64-bit halves.
    #[inline]
    pub const fn from_parts(low: u64, high: u64) -> Self {
        Self(((high as u128) << 64) | (low as u128))
    }

    /// Create an identifier from the signed halves used by binding layers
    /// whose only 64-bit integer type is signed.
    ///
    /// The bits are reinterpreted, not converted.
    #[inline]
    pub const fn from_signed_parts(low: i64, high: i64) -> Self {
        Self::from_parts(low as u64, high as u64)
    }

    /// The low 64 bits.
    #[inline]
    pub const fn low(self) -> u64 {
        self.0 as u64
    }

    /// The high 64 bits.
    #[inline]
    pub const fn high(self) -> u64 {
        (self.0 >> 64) as u64
    }

    /// The full 128-bit value.
    #[inline]
    pub const fn as_u128(self) -> u128 {
        self.0
    }
}

impl From<u128> for NodeId {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl From<NodeId> for u128 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.high() == 0 {
            write!(f, "#{}", self.low())
        } else {
            write!(f, "#{:x}:{:016x}", self.high(), self.low())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parts_layout() {
        let id = NodeId::from_parts(1, 0);
        assert_eq!(id.as_u128(), 1);

        let id = NodeId::from_parts(0, 1);
        assert_eq!(id.as_u128(), 1u128 << 64);
    }

    #[test]
    fn test_signed_parts_reinterpret_bits() {
        let id = NodeId::from_signed_parts(-1, i64::MIN);
        assert_eq!(id.low(), u64::MAX);
        assert_eq!(id.high(), 1u64 << 63);
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeId::from_parts(42, 0).to_string(), "#42");
        assert_eq!(
            NodeId::from_parts(0xff, 0x1).to_string(),
            "#1:00000000000000ff"
        );
    }

    proptest! {
        #[test]
        fn parts_round_trip(low in any::<u64>(), high in any::<u64>()) {
            let id = NodeId::from_parts(low, high);
            prop_assert_eq!(id.low(), low);
            prop_assert_eq!(id.high(), high);
        }

        #[test]
        fn signed_parts_round_trip(low in any::<i64>(), high in any::<i64>()) {
            let id = NodeId::from_signed_parts(low, high);
            prop_assert_eq!(id.low() as i64, low);
            prop_assert_eq!(id.high() as i64, high);
        }
    }
}
