//! Opaque ID newtypes for graph entities.
//!
//! [`NodeId`] and [`EdgeId`] are arena indices into a [`Graph`](crate::Graph);
//! [`PortId`] is an opaque tag naming a destination pin on a node, drawn
//! from the device catalog's port vocabulary.

use serde::{Deserialize, Serialize};
use weft_common::ArenaId;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a node in a graph.
    ///
    /// A `NodeId` is only meaningful relative to the graph that allocated
    /// it; a node's mate field holds a `NodeId` into the *companion* graph.
    NodeId
);

define_id!(
    /// Opaque, copyable ID for an edge in a graph.
    EdgeId
);

define_id!(
    /// Opaque tag naming which input pin of the destination an edge feeds.
    PortId
);

impl ArenaId for NodeId {
    fn from_raw(index: u32) -> Self {
        NodeId::from_raw(index)
    }
    fn as_raw(self) -> u32 {
        NodeId::as_raw(self)
    }
}

impl ArenaId for EdgeId {
    fn from_raw(index: u32) -> Self {
        EdgeId::from_raw(index)
    }
    fn as_raw(self) -> u32 {
        EdgeId::as_raw(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn roundtrip() {
        assert_eq!(NodeId::from_raw(42).as_raw(), 42);
        assert_eq!(EdgeId::from_raw(7).as_raw(), 7);
        assert_eq!(PortId::from_raw(0).as_raw(), 0);
    }

    #[test]
    fn equality_and_hash() {
        let a = NodeId::from_raw(3);
        let b = NodeId::from_raw(3);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(PortId::from_raw(1));
        set.insert(PortId::from_raw(2));
        set.insert(PortId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_is_bare_index() {
        assert_eq!(format!("{}", NodeId::from_raw(12)), "12");
        assert_eq!(format!("{}", PortId::from_raw(2)), "2");
    }

    #[test]
    fn serde_roundtrip() {
        let id = EdgeId::from_raw(55);
        let json = serde_json::to_string(&id).unwrap();
        let restored: EdgeId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }
}
