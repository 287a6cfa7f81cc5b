//! Node and edge types for dendrite networks.
//!
//! This module defines the two building blocks every [`Network`](crate::Network)
//! is assembled from:
//! - [`Node`]: an activation value plus the keys of its incoming and outgoing edges
//! - [`Edge`]: a weighted, directed link between nodes of adjacent layers
//!
//! Both live in `SlotMap` arenas owned by the network. They refer to each
//! other only through [`NodeId`] / [`EdgeId`] keys, so the graph has no
//! ownership cycles.

use rand::Rng;
use slotmap::new_key_type;

use crate::config::NetworkConfig;
use crate::identity::edge_identity;

new_key_type! {
    /// Arena key of a node within a network.
    pub struct NodeId;

    /// Arena key of an edge within a network.
    pub struct EdgeId;
}

/// A neuron at a fixed position in a layered network.
///
/// Activation accumulates additively from incoming signals and saturates at
/// `1.0`; see [`Node::signal`].
#[derive(Debug, Clone)]
pub struct Node {
    /// Structural identity: layer depth in the high 16 bits, index in the low 16.
    pub identity: u32,
    /// Depth of the owning layer (0 = input layer).
    pub depth: u16,
    /// Current activation, never above `1.0`.
    pub activation: f32,
    /// Edges arriving from the previous layer. Empty for input nodes.
    pub incoming: Vec<EdgeId>,
    /// Edges leaving towards the next layer. Empty for output nodes.
    pub outgoing: Vec<EdgeId>,
}

impl Node {
    /// Create an unconnected node with zero activation.
    #[must_use]
    pub fn new(identity: u32, depth: u16) -> Self {
        Self {
            identity,
            depth,
            activation: 0.0,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    /// Accumulate an incoming signal.
    ///
    /// The value is normalized by `incoming.len() * fill_rate^depth` before
    /// being added. Sparse layers lose signal geometrically with depth and
    /// the divisor compensates for that. The sum saturates at `1.0`, so the
    /// order in which edges fire does not matter.
    #[inline]
    pub fn signal(&mut self, value: f32, fill_rate: f32) {
        let fan_in = self.incoming.len().max(1) as f32;
        let divisor = fan_in * fill_rate.powi(i32::from(self.depth));
        self.activation = (self.activation + value / divisor).min(1.0);
    }

    /// Seed an input node directly, bypassing normalization.
    #[inline]
    pub fn set_initial(&mut self, value: f32) {
        self.activation = value.min(1.0);
    }

    /// Clear the activation. Connectivity is left untouched.
    #[inline]
    pub fn reset(&mut self) {
        self.activation = 0.0;
    }

    /// Structural equality: same identity, depth and fan-in/fan-out.
    ///
    /// Activations are ignored.
    #[must_use]
    pub fn structurally_eq(&self, other: &Self) -> bool {
        self.identity == other.identity
            && self.depth == other.depth
            && self.incoming.len() == other.incoming.len()
            && self.outgoing.len() == other.outgoing.len()
    }
}

/// A weighted, directed connection between two nodes in adjacent layers.
///
/// A weight of exactly `0.0` marks a dead connection that never fires.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Identity derived from the endpoints; see [`edge_identity`].
    pub identity: u64,
    /// Node the signal is read from.
    pub source: NodeId,
    /// Node the signal is delivered to.
    pub destination: NodeId,
    /// Connection strength.
    pub weight: f32,
}

impl Edge {
    /// Create an edge between two nodes with a freshly randomized strength.
    ///
    /// Registration on the endpoints' edge lists is done by the owning
    /// network, which holds the node arena.
    pub fn new<R: Rng>(
        source: (NodeId, u32),
        destination: (NodeId, u32),
        config: &NetworkConfig,
        rng: &mut R,
    ) -> Self {
        let mut edge = Self {
            identity: edge_identity(source.1, destination.1),
            source: source.0,
            destination: destination.0,
            weight: 0.0,
        };
        edge.randomize_strength(config, rng);
        edge
    }

    /// Re-roll the weight.
    ///
    /// With probability `fill_rate` the weight is drawn uniformly from
    /// `[min_strength, max_strength)`; otherwise the edge goes dead (`0.0`).
    pub fn randomize_strength<R: Rng>(&mut self, config: &NetworkConfig, rng: &mut R) {
        self.weight = random_strength(config, rng);
    }

    /// Whether the edge can ever carry a signal.
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.weight != 0.0
    }
}

/// Draw a connection strength according to the fill-rate policy.
pub(crate) fn random_strength<R: Rng>(config: &NetworkConfig, rng: &mut R) -> f32 {
    if rng.random::<f32>() < config.fill_rate {
        let unit = rng.random::<f32>();
        config.min_strength + unit * (config.max_strength - config.min_strength)
    } else {
        0.0
    }
}
