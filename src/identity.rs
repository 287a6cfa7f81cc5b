//! Structural identities for nodes and edges.
//!
//! Identities are derived purely from position, never from construction
//! order or randomness, so two networks built from the same layer
//! specification agree on every identity. That agreement is what makes
//! edge-by-edge comparison between networks meaningful.
//!
//! - Nodes: `(depth << 16) | index_in_layer`
//! - Edges: `(source_identity << 32) | destination_identity`

/// Largest number of nodes a single layer may hold.
pub const MAX_LAYER_WIDTH: usize = 1 << 16;

/// Largest number of layers a network may hold.
pub const MAX_LAYER_COUNT: usize = 1 << 16;

/// Compute the identity of the node at `index` within the layer at `depth`.
///
/// Both arguments must fit in 16 bits; `LayerSpec` guarantees this for every
/// node it describes.
#[inline]
#[must_use]
pub fn node_identity(depth: u16, index: u16) -> u32 {
    (u32::from(depth) << 16) | u32::from(index)
}

/// Compute the identity of the edge running from `source` to `destination`.
///
/// The source occupies the high 32 bits, so identities sort by source node
/// first and destination second.
#[inline]
#[must_use]
pub fn edge_identity(source: u32, destination: u32) -> u64 {
    (u64::from(source) << 32) | u64::from(destination)
}

/// Recover `(depth, index)` from a node identity.
#[inline]
#[must_use]
pub fn split_node_identity(identity: u32) -> (u16, u16) {
    ((identity >> 16) as u16, (identity & 0xFFFF) as u16)
}

/// Recover `(source, destination)` node identities from an edge identity.
#[inline]
#[must_use]
pub fn split_edge_identity(identity: u64) -> (u32, u32) {
    ((identity >> 32) as u32, (identity & 0xFFFF_FFFF) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_identity_layout() {
        assert_eq!(node_identity(0, 0), 0);
        assert_eq!(node_identity(0, 7), 7);
        assert_eq!(node_identity(1, 0), 0x0001_0000);
        assert_eq!(node_identity(3, 5), 0x0003_0005);
        assert_eq!(split_node_identity(node_identity(42, 9)), (42, 9));
    }

    #[test]
    fn test_edge_identity_order_matters() {
        let a = node_identity(0, 1);
        let b = node_identity(1, 0);
        assert_ne!(edge_identity(a, b), edge_identity(b, a));
        assert_eq!(split_edge_identity(edge_identity(a, b)), (a, b));
    }

    #[test]
    fn test_edge_identity_unique_over_full_layer_pair() {
        let mut ids: Vec<u64> = (0..32u16)
            .flat_map(|i| (0..32u16).map(move |j| edge_identity(node_identity(0, i), node_identity(1, j))))
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total, "edge identities must not collide");
    }

    #[test]
    fn test_extreme_positions() {
        let last = node_identity(u16::MAX, u16::MAX);
        assert_eq!(last, u32::MAX);
        assert_eq!(split_edge_identity(edge_identity(last, 0)), (u32::MAX, 0));
    }
}
